//! Asset registries
//!
//! Keyed lookup for the three asset categories the engine works with: nodes,
//! materials and viewports. Registries are plain values handed to whoever
//! needs lookup — there is no process-wide registry state.

mod registry;

pub use registry::{AssetError, Registry};

use crate::render::Material;
use crate::scene::NodeKey;

/// Registries the scene and renderer share
///
/// Viewports live in their own [`Registry`] owned by the embedding
/// application, since drawing needs the viewport mutably while reading
/// materials from here.
#[derive(Debug, Default)]
pub struct Assets {
    /// Scene nodes by registered name
    pub nodes: Registry<NodeKey>,
    /// Material resources by name
    pub materials: Registry<Material>,
}

impl Assets {
    /// Create empty registries
    pub fn new() -> Self {
        Self::default()
    }
}
