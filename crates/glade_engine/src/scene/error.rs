//! Structural error types for the scenegraph

use thiserror::Error;

use super::component::ComponentKind;

/// Errors raised by structural scenegraph operations
///
/// These surface immediately at the offending call site; once a scene has
/// been assembled and a viewport initialized, steady-state frames are not
/// expected to produce any of them.
#[derive(Debug, Error)]
pub enum SceneError {
    /// A sibling or registry entry with the same name already exists
    #[error("a child named '{name}' already exists in node '{parent}'")]
    DuplicateName {
        /// Name of the parent node
        parent: String,
        /// The colliding child name
        name: String,
    },

    /// A node, child or component could not be located
    #[error("{0}")]
    NotFound(String),

    /// A second instance of a singleton component type was attached
    #[error("a singleton {kind} component is already attached to node '{node}'")]
    DuplicateSingleton {
        /// Name of the target node
        node: String,
        /// The singleton component kind
        kind: ComponentKind,
    },

    /// Mesh position data does not divide evenly into vertices
    #[error("position data length {len} is not divisible by vertex size {size}")]
    ShapeMismatch {
        /// Number of floats supplied
        len: usize,
        /// Declared components per vertex
        size: u32,
    },

    /// Appending the node would make it its own ancestor
    #[error("appending '{child}' to '{parent}' would create a cycle")]
    Cycle {
        /// Name of the would-be parent
        parent: String,
        /// Name of the would-be child
        child: String,
    },
}
