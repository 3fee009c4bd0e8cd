//! Graphics surface implementations
//!
//! Concrete backends for the capability surface in [`crate::render::api`].
//! The headless backend records every operation in memory; real GPU
//! bindings slot in beside it without touching the engine core.

mod headless;

pub use headless::{DrawCall, HeadlessSurface};
