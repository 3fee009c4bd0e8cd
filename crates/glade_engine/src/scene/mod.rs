//! Scenegraph core
//!
//! Nodes live in a [`SceneTree`] arena and carry attachable components from a
//! closed set: [`Transform`], [`Pivot`], [`Mesh`], [`MaterialRef`] and
//! [`Camera`]. All structural mutation (parenting, component attachment) goes
//! through the tree so that parent/child and component/container back
//! references can never disagree.

mod camera;
mod component;
mod error;
mod graph;
mod material;
mod mesh;
mod node;
mod transform;

pub use camera::Camera;
pub use component::{Component, ComponentData, ComponentKind};
pub use error::SceneError;
pub use graph::{ComponentKey, NodeKey, SceneTree};
pub use material::MaterialRef;
pub use mesh::{BufferElement, BufferLayout, Mesh};
pub use node::Node;
pub use transform::{Pivot, Transform};

/// Result type for scenegraph operations
pub type SceneResult<T> = Result<T, SceneError>;
