//! Rendering layer
//!
//! High-level, backend-agnostic rendering built on the graphics capability
//! surface defined in [`api`]. The [`Viewport`] walks a scene tree and
//! issues draw calls; concrete surfaces live in [`backends`].

pub mod api;
pub mod backends;

mod material;
mod texture;
mod viewport;

use thiserror::Error;

use crate::assets::AssetError;
use crate::scene::SceneError;

pub use api::{
    AttributeLocation, BufferHandle, GraphicsSurface, ProgramHandle, TextureHandle,
    UniformLocation, VertexArrayHandle,
};
pub use material::{Material, ShaderProgram};
pub use texture::Texture;
pub use viewport::Viewport;

/// Rendering error types
#[derive(Debug, Error)]
pub enum RenderError {
    /// The graphics surface failed to produce a required handle or location
    ///
    /// Fatal for the initialization step that hit it; a missing handle
    /// leaves the viewport unusable.
    #[error("graphics assertion failed: {0}")]
    Assertion(String),

    /// A structural scenegraph error surfaced during rendering setup
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// An asset registry error surfaced during rendering setup
    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
