//! Foundation layer - math types and logging
//!
//! Low-level utilities shared by every other subsystem. Nothing in here
//! knows about nodes, components or rendering.

pub mod logging;
pub mod math;

pub use math::{Mat4, Mat4Ext, Vec3, Vec3Ext};
