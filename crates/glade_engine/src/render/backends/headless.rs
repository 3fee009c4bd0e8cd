//! In-memory graphics surface
//!
//! Records every operation instead of talking to a GPU. Serves as the test
//! double for the renderer and as a stand-in target for demos running
//! without a display.

use std::collections::{HashMap, HashSet};

use log::trace;

use crate::scene::BufferLayout;

use super::super::api::{
    AttributeLocation, BufferHandle, GraphicsSurface, ProgramHandle, TextureHandle,
    UniformLocation, VertexArrayHandle,
};
use super::super::RenderResult;

/// One recorded draw, including the matrix that was current when it was
/// issued
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    /// First vertex of the range
    pub first: u32,
    /// Number of vertices drawn
    pub count: u32,
    /// Program active at draw time
    pub program: ProgramHandle,
    /// Vertex array bound at draw time
    pub vertex_array: Option<VertexArrayHandle>,
    /// Last matrix uploaded before the draw, column-major
    pub matrix: [f32; 16],
}

/// Recording implementation of [`GraphicsSurface`]
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    size: (u32, u32),
    next_handle: u64,
    standard_program: Option<ProgramHandle>,
    bound_buffer: Option<BufferHandle>,
    bound_vertex_array: Option<VertexArrayHandle>,
    bound_texture: Option<TextureHandle>,
    active_program: Option<ProgramHandle>,
    last_matrix: [f32; 16],
    float_buffers: HashMap<u64, Vec<f32>>,
    byte_buffers: HashMap<u64, Vec<u8>>,
    texture_images: HashMap<u64, (u32, u32, Vec<u8>)>,
    mipmapped_textures: HashSet<u64>,
    buffer_count: usize,
    viewport_rects: Vec<(i32, i32, u32, u32)>,
    clears: Vec<[f32; 4]>,
    draw_calls: Vec<DrawCall>,
    enabled_attributes: Vec<(AttributeLocation, BufferLayout)>,
    depth_test: bool,
    backface_culling: bool,
}

impl HeadlessSurface {
    /// Create a surface with the given drawable size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            ..Self::default()
        }
    }

    /// Change the drawable size, as a window resize would
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    /// All recorded draw calls, in order
    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.draw_calls
    }

    /// All recorded clears, in order
    pub fn clears(&self) -> &[[f32; 4]] {
        &self.clears
    }

    /// All recorded viewport rectangles, in order
    pub fn viewport_rects(&self) -> &[(i32, i32, u32, u32)] {
        &self.viewport_rects
    }

    /// Number of buffers created so far
    pub const fn buffer_count(&self) -> usize {
        self.buffer_count
    }

    /// Float data last uploaded to a buffer
    pub fn float_buffer(&self, buffer: BufferHandle) -> Option<&[f32]> {
        self.float_buffers.get(&buffer.0).map(Vec::as_slice)
    }

    /// Byte data last uploaded to a buffer
    pub fn byte_buffer(&self, buffer: BufferHandle) -> Option<&[u8]> {
        self.byte_buffers.get(&buffer.0).map(Vec::as_slice)
    }

    /// Image last uploaded to a texture
    pub fn texture_image(&self, texture: TextureHandle) -> Option<&(u32, u32, Vec<u8>)> {
        self.texture_images.get(&texture.0)
    }

    /// Whether mipmaps were generated for a texture
    pub fn has_mipmaps(&self, texture: TextureHandle) -> bool {
        self.mipmapped_textures.contains(&texture.0)
    }

    /// Whether depth testing is currently enabled
    pub const fn depth_test(&self) -> bool {
        self.depth_test
    }

    /// Whether back-face culling is currently enabled
    pub const fn backface_culling(&self) -> bool {
        self.backface_culling
    }

    /// Attributes enabled so far, with their layouts
    pub fn enabled_attributes(&self) -> &[(AttributeLocation, BufferLayout)] {
        &self.enabled_attributes
    }

    fn next_handle(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl GraphicsSurface for HeadlessSurface {
    fn surface_size(&self) -> (u32, u32) {
        self.size
    }

    fn set_viewport_rect(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.viewport_rects.push((x, y, width, height));
    }

    fn clear(&mut self, color: [f32; 4]) {
        self.clears.push(color);
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.depth_test = enabled;
    }

    fn set_backface_culling(&mut self, enabled: bool) {
        self.backface_culling = enabled;
    }

    fn create_buffer(&mut self) -> RenderResult<BufferHandle> {
        let handle = BufferHandle(self.next_handle());
        self.buffer_count += 1;
        trace!("created buffer {handle:?}");
        Ok(handle)
    }

    fn bind_buffer(&mut self, buffer: BufferHandle) {
        self.bound_buffer = Some(buffer);
    }

    fn upload_f32(&mut self, data: &[f32]) {
        if let Some(buffer) = self.bound_buffer {
            self.float_buffers.insert(buffer.0, data.to_vec());
        }
    }

    fn upload_u8(&mut self, data: &[u8]) {
        if let Some(buffer) = self.bound_buffer {
            self.byte_buffers.insert(buffer.0, data.to_vec());
        }
    }

    fn create_vertex_array(&mut self) -> RenderResult<VertexArrayHandle> {
        Ok(VertexArrayHandle(self.next_handle()))
    }

    fn bind_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        self.bound_vertex_array = Some(vertex_array);
    }

    fn standard_program(&mut self) -> RenderResult<ProgramHandle> {
        if let Some(program) = self.standard_program {
            return Ok(program);
        }
        let program = ProgramHandle(self.next_handle());
        self.standard_program = Some(program);
        Ok(program)
    }

    fn compile_program(
        &mut self,
        _vertex_source: &str,
        _fragment_source: &str,
    ) -> RenderResult<ProgramHandle> {
        Ok(ProgramHandle(self.next_handle()))
    }

    fn use_program(&mut self, program: ProgramHandle) {
        self.active_program = Some(program);
    }

    fn attribute_location(
        &mut self,
        _program: ProgramHandle,
        name: &str,
    ) -> Option<AttributeLocation> {
        match name {
            "a_position" => Some(AttributeLocation(0)),
            "a_color" => Some(AttributeLocation(1)),
            "a_texcoord" => Some(AttributeLocation(2)),
            _ => None,
        }
    }

    fn uniform_location(&mut self, _program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        match name {
            "u_matrix" => Some(UniformLocation(0)),
            _ => None,
        }
    }

    fn enable_attribute(&mut self, location: AttributeLocation, layout: &BufferLayout) {
        self.enabled_attributes.push((location, *layout));
    }

    fn upload_matrix(&mut self, _location: UniformLocation, matrix: &[f32; 16]) {
        self.last_matrix = *matrix;
    }

    fn draw_triangles(&mut self, first: u32, count: u32) {
        let Some(program) = self.active_program else {
            trace!("draw without an active program ignored");
            return;
        };
        self.draw_calls.push(DrawCall {
            first,
            count,
            program,
            vertex_array: self.bound_vertex_array,
            matrix: self.last_matrix,
        });
    }

    fn create_texture(&mut self) -> RenderResult<TextureHandle> {
        Ok(TextureHandle(self.next_handle()))
    }

    fn bind_texture(&mut self, texture: TextureHandle) {
        self.bound_texture = Some(texture);
    }

    fn upload_texture_rgba(&mut self, width: u32, height: u32, pixels: &[u8]) {
        if let Some(texture) = self.bound_texture {
            self.texture_images
                .insert(texture.0, (width, height, pixels.to_vec()));
        }
    }

    fn generate_mipmaps(&mut self) {
        if let Some(texture) = self.bound_texture {
            self.mipmapped_textures.insert(texture.0);
        }
    }
}
