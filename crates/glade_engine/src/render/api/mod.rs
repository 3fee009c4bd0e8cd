//! Backend abstraction for the rendering system
//!
//! Defines the capability surface a graphics backend must implement for the
//! high-level renderer, plus the opaque handle types that keep backend
//! resources out of engine data structures.

mod surface;

pub use surface::{
    assert_handle, AttributeLocation, BufferHandle, GraphicsSurface, ProgramHandle,
    TextureHandle, UniformLocation, VertexArrayHandle,
};
