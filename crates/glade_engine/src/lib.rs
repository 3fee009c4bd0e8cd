//! # Glade Engine
//!
//! A lightweight scenegraph rendering engine written in Rust.
//!
//! ## Features
//!
//! - **Scenegraph**: arena-owned nodes with attachable components
//! - **Transform Propagation**: per-frame world-matrix pass over the tree
//! - **Backend Agnostic**: rendering goes through a graphics capability
//!   surface; backends are swappable
//! - **Asset Registries**: injected keyed registries, no global state
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use glade_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut tree = SceneTree::new();
//!     let mut assets = Assets::new();
//!     let mut surface = HeadlessSurface::new(800, 640);
//!
//!     let root = tree.create_node("root");
//!     let shape = tree.create_node("shape");
//!     tree.append_child(root, shape)?;
//!     tree.attach_component(
//!         shape,
//!         ComponentData::Mesh(Mesh::from_positions(vec![
//!             0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0,
//!         ])?),
//!     )?;
//!
//!     let eye = tree.create_node("eye");
//!     tree.append_child(root, eye)?;
//!     let mut camera = Camera::new();
//!     camera.project_central(800.0 / 640.0, 45.0);
//!     let camera_key = tree.attach_component(eye, ComponentData::Camera(camera))?;
//!
//!     let mut viewport =
//!         Viewport::new("main", root, camera_key, &mut tree, &mut assets, &mut surface)?;
//!     viewport.draw_scene(&mut tree, &mut assets, &mut surface)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod config;
pub mod foundation;
pub mod render;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::assets::{AssetError, Assets, Registry};
    pub use crate::config::{ConfigError, EngineConfig};
    pub use crate::foundation::math::{Mat4, Mat4Ext, Vec3, Vec3Ext};
    pub use crate::render::backends::HeadlessSurface;
    pub use crate::render::{
        GraphicsSurface, Material, RenderError, RenderResult, Texture, Viewport,
    };
    pub use crate::scene::{
        Camera, Component, ComponentData, ComponentKey, ComponentKind, MaterialRef, Mesh, Node,
        NodeKey, Pivot, SceneError, SceneTree, Transform,
    };
}
