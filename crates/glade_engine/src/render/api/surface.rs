//! Graphics capability surface
//!
//! The engine core issues all GPU work through this trait and never touches
//! a concrete graphics API. Handles are opaque newtypes; what they refer to
//! is entirely the backend's business.

use crate::scene::BufferLayout;

use super::super::{RenderError, RenderResult};

/// Handle to a vertex buffer owned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u64);

/// Handle to a vertex array object owned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexArrayHandle(pub u64);

/// Handle to a linked shader program owned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u64);

/// Handle to a texture object owned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Location of a vertex attribute within a program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeLocation(pub u32);

/// Location of a uniform within a program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

/// Turn an optional handle into a hard requirement
///
/// Mirrors the assertion style the renderer applies to the surface: a
/// missing handle where a valid one is required aborts the current
/// initialization step.
pub fn assert_handle<T>(value: Option<T>, message: &str) -> RenderResult<T> {
    value.ok_or_else(|| RenderError::Assertion(message.to_string()))
}

/// Capability surface a rendering backend provides to the engine
///
/// Buffer and texture uploads target the most recently bound object, in the
/// style of GL-family APIs. Creation methods fail with
/// [`RenderError::Assertion`] when the backend cannot produce a handle;
/// location lookups return `None` and leave the decision to the caller.
pub trait GraphicsSurface {
    /// Current drawable size in pixels (width, height)
    fn surface_size(&self) -> (u32, u32);

    /// Set the rectangle rendering maps onto
    fn set_viewport_rect(&mut self, x: i32, y: i32, width: u32, height: u32);

    /// Clear color and depth buffers with the given RGBA color
    fn clear(&mut self, color: [f32; 4]);

    /// Enable or disable depth testing
    fn set_depth_test(&mut self, enabled: bool);

    /// Enable or disable back-face culling
    fn set_backface_culling(&mut self, enabled: bool);

    /// Create a vertex buffer
    fn create_buffer(&mut self) -> RenderResult<BufferHandle>;

    /// Bind a vertex buffer as the upload target
    fn bind_buffer(&mut self, buffer: BufferHandle);

    /// Upload float data to the bound buffer
    fn upload_f32(&mut self, data: &[f32]);

    /// Upload byte data to the bound buffer
    fn upload_u8(&mut self, data: &[u8]);

    /// Create a vertex array object
    fn create_vertex_array(&mut self) -> RenderResult<VertexArrayHandle>;

    /// Bind a vertex array object
    fn bind_vertex_array(&mut self, vertex_array: VertexArrayHandle);

    /// The backend's built-in standard program
    ///
    /// Shader source and compilation are the backend's concern; the engine
    /// only requires that some standard program exists for fallback
    /// materials.
    fn standard_program(&mut self) -> RenderResult<ProgramHandle>;

    /// Compile and link a program from caller-supplied sources
    fn compile_program(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> RenderResult<ProgramHandle>;

    /// Activate a program for subsequent draws
    fn use_program(&mut self, program: ProgramHandle);

    /// Look up a vertex attribute location by name
    fn attribute_location(&mut self, program: ProgramHandle, name: &str)
        -> Option<AttributeLocation>;

    /// Look up a uniform location by name
    fn uniform_location(&mut self, program: ProgramHandle, name: &str) -> Option<UniformLocation>;

    /// Enable an attribute and describe how it pulls from the bound buffer
    fn enable_attribute(&mut self, location: AttributeLocation, layout: &BufferLayout);

    /// Upload a 4x4 matrix, column-major, to a uniform
    fn upload_matrix(&mut self, location: UniformLocation, matrix: &[f32; 16]);

    /// Draw a range of the bound vertex array as a triangle list
    fn draw_triangles(&mut self, first: u32, count: u32);

    /// Create a texture object
    fn create_texture(&mut self) -> RenderResult<TextureHandle>;

    /// Bind a texture as the upload target
    fn bind_texture(&mut self, texture: TextureHandle);

    /// Upload RGBA pixel data to the bound texture
    fn upload_texture_rgba(&mut self, width: u32, height: u32, pixels: &[u8]);

    /// Generate mipmaps for the bound texture
    fn generate_mipmaps(&mut self);
}
