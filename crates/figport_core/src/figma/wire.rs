//! Closed enums of the Figma file format and their wire strings.
//!
//! Every enum maps to a fixed UPPER_SNAKE_CASE string. The mapping is
//! strict in both directions: an unknown string is a [`SchemaError`], never
//! a silent fallback.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::decode::SchemaError;

/// Declares an enum together with its bidirectional wire table.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The string used for this value in Figma JSON.
            pub fn as_wire(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }

            /// Look up a value by its Figma JSON string.
            pub fn from_wire(value: &str) -> Result<Self, SchemaError> {
                match value {
                    $($wire => Ok($name::$variant),)+
                    other => Err(SchemaError::UnknownWireValue {
                        kind: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_wire())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_wire())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = String::deserialize(deserializer)?;
                $name::from_wire(&value).map_err(serde::de::Error::custom)
            }
        }
    };
}

wire_enum! {
    /// The type of a node in the document tree.
    NodeType {
        Boolean => "BOOLEAN_OPERATION",
        Canvas => "CANVAS",
        Component => "COMPONENT",
        ComponentSet => "COMPONENT_SET",
        Document => "DOCUMENT",
        Ellipse => "ELLIPSE",
        Frame => "FRAME",
        Group => "GROUP",
        Instance => "INSTANCE",
        Line => "LINE",
        Rectangle => "RECTANGLE",
        RegularPolygon => "REGULAR_POLYGON",
        Slice => "SLICE",
        Star => "STAR",
        Text => "TEXT",
        Vector => "VECTOR",
    }
}

impl NodeType {
    /// Short tag appended to scene node names, e.g. `Frame` or `ComponentSet`.
    pub fn tag(self) -> &'static str {
        match self {
            NodeType::Boolean => "Boolean",
            NodeType::Canvas => "Canvas",
            NodeType::Component => "Component",
            NodeType::ComponentSet => "ComponentSet",
            NodeType::Document => "Document",
            NodeType::Ellipse => "Ellipse",
            NodeType::Frame => "Frame",
            NodeType::Group => "Group",
            NodeType::Instance => "Instance",
            NodeType::Line => "Line",
            NodeType::Rectangle => "Rectangle",
            NodeType::RegularPolygon => "RegularPolygon",
            NodeType::Slice => "Slice",
            NodeType::Star => "Star",
            NodeType::Text => "Text",
            NodeType::Vector => "Vector",
        }
    }
}

wire_enum! {
    /// How a layer blends with layers behind it.
    BlendMode {
        Color => "COLOR",
        ColorBurn => "COLOR_BURN",
        ColorDodge => "COLOR_DODGE",
        Darken => "DARKEN",
        Difference => "DIFFERENCE",
        Exclusion => "EXCLUSION",
        HardLight => "HARD_LIGHT",
        Hue => "HUE",
        Lighten => "LIGHTEN",
        LinearBurn => "LINEAR_BURN",
        LinearDodge => "LINEAR_DODGE",
        Luminosity => "LUMINOSITY",
        Multiply => "MULTIPLY",
        Normal => "NORMAL",
        Overlay => "OVERLAY",
        PassThrough => "PASS_THROUGH",
        Saturation => "SATURATION",
        Screen => "SCREEN",
        SoftLight => "SOFT_LIGHT",
    }
}

wire_enum! {
    /// Horizontal layout constraint relative to the containing frame.
    Horizontal {
        Center => "CENTER",
        Left => "LEFT",
        LeftRight => "LEFT_RIGHT",
        Right => "RIGHT",
        Scale => "SCALE",
    }
}

wire_enum! {
    /// Vertical layout constraint relative to the containing frame.
    Vertical {
        Bottom => "BOTTOM",
        Center => "CENTER",
        Scale => "SCALE",
        Top => "TOP",
        TopBottom => "TOP_BOTTOM",
    }
}

wire_enum! {
    EffectType {
        BackgroundBlur => "BACKGROUND_BLUR",
        DropShadow => "DROP_SHADOW",
        InnerShadow => "INNER_SHADOW",
        LayerBlur => "LAYER_BLUR",
    }
}

wire_enum! {
    /// Sizing constraint of an image export.
    ConstraintType {
        Height => "HEIGHT",
        Scale => "SCALE",
        Width => "WIDTH",
    }
}

wire_enum! {
    /// Image export format.
    Format {
        Jpg => "JPG",
        Png => "PNG",
        Svg => "SVG",
    }
}

wire_enum! {
    /// Kind of paint used for fills and strokes.
    FillType {
        Emoji => "EMOJI",
        GradientAngular => "GRADIENT_ANGULAR",
        GradientDiamond => "GRADIENT_DIAMOND",
        GradientLinear => "GRADIENT_LINEAR",
        GradientRadial => "GRADIENT_RADIAL",
        Image => "IMAGE",
        Solid => "SOLID",
    }
}

wire_enum! {
    /// Layout grid alignment.
    Alignment {
        Center => "CENTER",
        Max => "MAX",
        Min => "MIN",
        Stretch => "STRETCH",
    }
}

wire_enum! {
    Pattern {
        Columns => "COLUMNS",
        Grid => "GRID",
        Rows => "ROWS",
    }
}

wire_enum! {
    StrokeAlign {
        Center => "CENTER",
        Inside => "INSIDE",
        Outside => "OUTSIDE",
    }
}

wire_enum! {
    TextAlignHorizontal {
        Center => "CENTER",
        Justified => "JUSTIFIED",
        Left => "LEFT",
        Right => "RIGHT",
    }
}

wire_enum! {
    TextAlignVertical {
        Bottom => "BOTTOM",
        Center => "CENTER",
        Top => "TOP",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_type_wire_table_is_bijective() {
        for &ty in NodeType::ALL {
            assert_eq!(NodeType::from_wire(ty.as_wire()).unwrap(), ty);
        }
        assert_eq!(NodeType::from_wire("BOOLEAN_OPERATION").unwrap(), NodeType::Boolean);
        assert_eq!(NodeType::ComponentSet.as_wire(), "COMPONENT_SET");
    }

    #[test]
    fn test_unknown_wire_value_is_an_error() {
        let err = EffectType::from_wire("GLOW").unwrap_err();
        match err {
            SchemaError::UnknownWireValue { kind, value } => {
                assert_eq!(kind, "EffectType");
                assert_eq!(value, "GLOW");
            }
            other => panic!("unexpected error: {other}"),
        }

        // Wire strings are case sensitive
        assert!(EffectType::from_wire("drop_shadow").is_err());
    }

    #[test]
    fn test_serde_uses_wire_strings() {
        let json = serde_json::to_string(&EffectType::DropShadow).unwrap();
        assert_eq!(json, "\"DROP_SHADOW\"");

        let parsed: BlendMode = serde_json::from_str("\"PASS_THROUGH\"").unwrap();
        assert_eq!(parsed, BlendMode::PassThrough);

        let err = serde_json::from_str::<BlendMode>("\"PASSTHROUGH\"").unwrap_err();
        assert!(err.to_string().contains("PASSTHROUGH"));
    }

    #[test]
    fn test_node_type_tags() {
        assert_eq!(NodeType::RegularPolygon.tag(), "RegularPolygon");
        assert_eq!(NodeType::Frame.to_string(), "FRAME");
    }
}
