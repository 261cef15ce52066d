// Transform utilities for Mat4
//
// Extends glam::Mat4 with bounds helpers for the scene graph.
// Note: glam::Mat4 already provides transform_point3(), transform_vector3() and inverse()

use glam::{Mat4, Vec3};
use crate::Aabb;

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;

    /// Express a world-space point in the space this matrix maps from.
    fn inverse_transform_point3(&self, point: Vec3) -> Vec3;
}

impl Mat4Ext for Mat4 {
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        if aabb.is_empty() {
            return Aabb::empty();
        }

        let mut result_min = Vec3::splat(f32::INFINITY);
        let mut result_max = Vec3::splat(f32::NEG_INFINITY);

        for corner in aabb.corners() {
            let p = self.transform_point3(corner);
            result_min = result_min.min(p);
            result_max = result_max.max(p);
        }

        Aabb::from_points(result_min, result_max)
    }

    fn inverse_transform_point3(&self, point: Vec3) -> Vec3 {
        self.inverse().transform_point3(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn test_transform_aabb_translation() {
        let mat = Mat4::from_translation(Vec3::new(5.0, 5.0, 5.0));
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        let transformed = mat.transform_aabb(&aabb);

        assert!((transformed.min() - Vec3::new(5.0, 5.0, 5.0)).length() < 0.001);
        assert!((transformed.max() - Vec3::new(6.0, 6.0, 6.0)).length() < 0.001);
    }

    #[test]
    fn test_transform_aabb_scale() {
        let mat = Mat4::from_scale(Vec3::new(2.0, 3.0, 1.0));
        let aabb = Aabb::from_size(Vec3::new(1.0, 1.0, 0.0));
        let transformed = mat.transform_aabb(&aabb);

        assert!((transformed.size() - Vec3::new(2.0, 3.0, 0.0)).length() < 0.001);
    }

    #[test]
    fn test_transform_aabb_rotation_grows_box() {
        use std::f32::consts::FRAC_PI_4;

        let mat = Mat4::from_quat(Quat::from_rotation_z(FRAC_PI_4));
        let aabb = Aabb::from_size(Vec3::new(2.0, 2.0, 0.0));
        let transformed = mat.transform_aabb(&aabb);

        let diag = 2.0_f32.sqrt() * 2.0;
        assert!((transformed.x.size() - diag).abs() < 0.001);
    }

    #[test]
    fn test_transform_empty_aabb() {
        let mat = Mat4::from_translation(Vec3::ONE);
        assert!(mat.transform_aabb(&Aabb::empty()).is_empty());
    }

    #[test]
    fn test_inverse_transform_point3() {
        let mat = Mat4::from_scale_rotation_translation(
            Vec3::splat(2.0),
            Quat::IDENTITY,
            Vec3::new(10.0, 20.0, 30.0),
        );
        let back = mat.inverse_transform_point3(Vec3::new(12.0, 22.0, 32.0));
        assert!((back - Vec3::ONE).length() < 0.001);
    }
}
