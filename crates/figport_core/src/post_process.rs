//! Prefab post-processing.
//!
//! After a prefab replaces an INSTANCE node it is adjusted to the source
//! node: button labels come from nested text, backplates and sliders are
//! resized to the source bounding box.

use figport_math::Vec3;
use thiserror::Error;

use crate::custom_map::PostProcessKind;
use crate::figma::Node;
use crate::scene::{NodeId, Scene};
use crate::settings::ImportSettings;

/// Reasons a post-process step was skipped. None of them abort an import.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PostProcessError {
    #[error("prefab has no '{0}' container")]
    MissingContainer(String),

    #[error("prefab has no button label component")]
    MissingLabel,

    #[error("prefab has {slots} buttons but the source only labels {texts}")]
    LabelCountMismatch { slots: usize, texts: usize },

    #[error("source node '{0}' has no bounding box")]
    MissingBoundingBox(String),
}

/// Result type for post-processing.
pub type PostProcessResult<T> = Result<T, PostProcessError>;

/// Adjust the instance rooted at `root` to match `source`.
pub fn post_process(
    kind: PostProcessKind,
    source: &Node,
    scene: &mut Scene,
    root: NodeId,
    settings: &ImportSettings,
) -> PostProcessResult<()> {
    match kind {
        PostProcessKind::Default => Ok(()),
        PostProcessKind::Button => label_button(source, scene, root),
        PostProcessKind::ButtonCollection => label_collection(source, scene, root, settings),
        PostProcessKind::Backplate => fit_backplate(source, scene, root, settings),
        PostProcessKind::Slider => fit_slider(source, scene, root, settings),
    }
}

fn label_button(source: &Node, scene: &mut Scene, root: NodeId) -> PostProcessResult<()> {
    let target = if scene.node(root).button.is_some() {
        root
    } else {
        *scene
            .buttons_in_subtree(root)
            .first()
            .ok_or(PostProcessError::MissingLabel)?
    };

    let text = source.find_text().map(str::to_string);
    if text.is_none() {
        log::debug!("Button '{}' has no text; clearing its label", source.name);
    }
    if let Some(button) = scene.node_mut(target).button.as_mut() {
        button.main_label = text;
    }
    Ok(())
}

fn label_collection(
    source: &Node,
    scene: &mut Scene,
    root: NodeId,
    settings: &ImportSettings,
) -> PostProcessResult<()> {
    let container = scene
        .find_child(root, &settings.button_collection_container)
        .ok_or_else(|| PostProcessError::MissingContainer(settings.button_collection_container.clone()))?;
    let slots = scene.buttons_in_subtree(container);

    let texts: Vec<Option<String>> = source
        .children()
        .iter()
        .filter(|group| group.name == settings.button_source_group)
        .flat_map(|group| group.children())
        .map(|item| item.find_text().map(str::to_string))
        .collect();

    // Checked up front so a short source leaves every slot untouched
    if texts.len() < slots.len() {
        return Err(PostProcessError::LabelCountMismatch {
            slots: slots.len(),
            texts: texts.len(),
        });
    }

    for (slot, text) in slots.into_iter().zip(texts) {
        if let Some(button) = scene.node_mut(slot).button.as_mut() {
            button.main_label = text;
        }
    }
    Ok(())
}

fn fit_backplate(
    source: &Node,
    scene: &mut Scene,
    root: NodeId,
    settings: &ImportSettings,
) -> PostProcessResult<()> {
    let bbox = source
        .absolute_bounding_box
        .ok_or_else(|| PostProcessError::MissingBoundingBox(source.name.clone()))?;

    let scale = &mut scene.node_mut(root).transform.scale;
    *scale = Vec3::new(
        bbox.width * settings.position_scale,
        bbox.height * settings.position_scale,
        scale.z,
    );
    Ok(())
}

fn fit_slider(
    source: &Node,
    scene: &mut Scene,
    root: NodeId,
    settings: &ImportSettings,
) -> PostProcessResult<()> {
    let bbox = source
        .absolute_bounding_box
        .ok_or_else(|| PostProcessError::MissingBoundingBox(source.name.clone()))?;

    let factor = bbox.width / settings.slider_default_width;
    scene.node_mut(root).transform.scale *= factor;
    Ok(())
}
