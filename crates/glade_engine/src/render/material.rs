//! Material resource and shader program bindings

use crate::foundation::math::Vec3;
use crate::scene::BufferLayout;

use super::api::{assert_handle, AttributeLocation, GraphicsSurface, ProgramHandle, UniformLocation};
use super::RenderResult;

/// A linked program plus the attribute and uniform locations the renderer
/// feeds each frame
///
/// Resolution happens once at material construction; a program missing any
/// required location is rejected with an assertion failure rather than
/// discovered mid-frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderProgram {
    program: ProgramHandle,
    position_attribute: AttributeLocation,
    color_attribute: AttributeLocation,
    texture_coordinate_attribute: AttributeLocation,
    matrix_uniform: UniformLocation,
}

impl ShaderProgram {
    /// Resolve all required locations of `program`
    pub fn resolve(
        surface: &mut dyn GraphicsSurface,
        program: ProgramHandle,
    ) -> RenderResult<Self> {
        let position_attribute = assert_handle(
            surface.attribute_location(program, "a_position"),
            "program has no 'a_position' attribute",
        )?;
        let color_attribute = assert_handle(
            surface.attribute_location(program, "a_color"),
            "program has no 'a_color' attribute",
        )?;
        let texture_coordinate_attribute = assert_handle(
            surface.attribute_location(program, "a_texcoord"),
            "program has no 'a_texcoord' attribute",
        )?;
        let matrix_uniform = assert_handle(
            surface.uniform_location(program, "u_matrix"),
            "program has no 'u_matrix' uniform",
        )?;

        Ok(Self {
            program,
            position_attribute,
            color_attribute,
            texture_coordinate_attribute,
            matrix_uniform,
        })
    }

    /// The underlying program handle
    pub const fn program(&self) -> ProgramHandle {
        self.program
    }

    /// Location of the position attribute
    pub const fn position_attribute(&self) -> AttributeLocation {
        self.position_attribute
    }

    /// Location of the color attribute
    pub const fn color_attribute(&self) -> AttributeLocation {
        self.color_attribute
    }

    /// Location of the texture coordinate attribute
    pub const fn texture_coordinate_attribute(&self) -> AttributeLocation {
        self.texture_coordinate_attribute
    }

    /// Location of the object view-projection matrix uniform
    pub const fn matrix_uniform(&self) -> UniformLocation {
        self.matrix_uniform
    }
}

/// Color and shader bindings shared by the nodes referencing this material
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    name: String,
    color: Vec3,
    shader: ShaderProgram,
    color_layout: BufferLayout,
    texture_coordinate_layout: BufferLayout,
    texture_enabled: bool,
    texture_source: String,
}

impl Material {
    /// Registry name of the lazily created fallback material
    pub const STANDARD: &'static str = "standard";

    /// Create a material over an already-linked program
    pub fn new(
        name: impl Into<String>,
        color: Vec3,
        surface: &mut dyn GraphicsSurface,
        program: ProgramHandle,
    ) -> RenderResult<Self> {
        let shader = ShaderProgram::resolve(surface, program)?;
        Ok(Self {
            name: name.into(),
            color,
            shader,
            color_layout: BufferLayout::colors(),
            texture_coordinate_layout: BufferLayout::texture_coordinates(),
            texture_enabled: false,
            texture_source: String::new(),
        })
    }

    /// Create the white fallback material over the surface's standard program
    pub fn standard(surface: &mut dyn GraphicsSurface) -> RenderResult<Self> {
        let program = surface.standard_program()?;
        Self::new(Self::STANDARD, Vec3::new(1.0, 1.0, 1.0), surface, program)
    }

    /// The material's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The base color
    pub const fn color(&self) -> Vec3 {
        self.color
    }

    /// Set the base color
    pub fn set_color(&mut self, color: Vec3) {
        self.color = color;
    }

    /// The resolved shader bindings
    pub const fn shader(&self) -> &ShaderProgram {
        &self.shader
    }

    /// Layout of the per-vertex color buffer
    pub const fn color_layout(&self) -> &BufferLayout {
        &self.color_layout
    }

    /// Layout of the texture coordinate buffer
    pub const fn texture_coordinate_layout(&self) -> &BufferLayout {
        &self.texture_coordinate_layout
    }

    /// Whether texturing is enabled
    pub const fn texture_enabled(&self) -> bool {
        self.texture_enabled
    }

    /// Path or URL of the texture image
    pub fn texture_source(&self) -> &str {
        &self.texture_source
    }

    /// Enable texturing with the given source
    pub fn add_texture(&mut self, source: impl Into<String>) {
        self.texture_enabled = true;
        self.texture_source = source.into();
    }

    /// Disable texturing and clear the source
    pub fn remove_texture(&mut self) {
        self.texture_enabled = false;
        self.texture_source.clear();
    }
}
