//! Mesh component and vertex buffer layout descriptions

use crate::foundation::math::{Vec3, Vec3Ext};

use super::error::SceneError;

/// Element type of a vertex buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferElement {
    /// 32-bit floating point
    Float32,
    /// Unsigned byte
    Uint8,
}

/// How a buffer's data is pulled per vertex
///
/// Backend-agnostic description the graphics surface translates into its own
/// attribute pointer calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferLayout {
    /// Components per vertex
    pub size: u32,
    /// Element type
    pub element: BufferElement,
    /// Whether integer data is normalized to [0, 1]
    pub normalized: bool,
    /// Byte stride between vertices (0 = tightly packed)
    pub stride: u32,
    /// Offset of the first vertex in the buffer
    pub offset: u32,
}

impl BufferLayout {
    /// Layout of a position buffer: three floats per vertex
    pub const fn positions(size: u32) -> Self {
        Self {
            size,
            element: BufferElement::Float32,
            normalized: false,
            stride: 0,
            offset: 0,
        }
    }

    /// Layout of a color buffer: three normalized bytes per vertex
    pub const fn colors() -> Self {
        Self {
            size: 3,
            element: BufferElement::Uint8,
            normalized: true,
            stride: 0,
            offset: 0,
        }
    }

    /// Layout of a texture coordinate buffer: two floats per vertex
    pub const fn texture_coordinates() -> Self {
        Self {
            size: 2,
            element: BufferElement::Float32,
            normalized: true,
            stride: 0,
            offset: 0,
        }
    }
}

/// Vertex data for drawing one node
///
/// Positions are a flat, non-indexed triangle list. Normals are derived
/// eagerly at construction: each consecutive group of nine floats is treated
/// as one triangle and its face normal is replicated to all three vertices.
/// Any other topology produces meaningless normals.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    positions: Vec<f32>,
    layout: BufferLayout,
    vertex_count: usize,
    normals: Vec<f32>,
}

impl Mesh {
    /// Create a mesh from flat position data
    ///
    /// Fails with [`SceneError::ShapeMismatch`] when the data length does not
    /// divide evenly into vertices of `size` components.
    pub fn new(
        positions: Vec<f32>,
        size: u32,
        element: BufferElement,
        normalized: bool,
    ) -> Result<Self, SceneError> {
        if size == 0 || positions.len() % size as usize != 0 {
            return Err(SceneError::ShapeMismatch {
                len: positions.len(),
                size,
            });
        }

        let vertex_count = positions.len() / size as usize;
        let normals = compute_flat_normals(&positions);
        let layout = BufferLayout {
            size,
            element,
            normalized,
            stride: 0,
            offset: 0,
        };

        Ok(Self {
            positions,
            layout,
            vertex_count,
            normals,
        })
    }

    /// Create a mesh with the default layout: three floats per vertex
    pub fn from_positions(positions: Vec<f32>) -> Result<Self, SceneError> {
        Self::new(positions, 3, BufferElement::Float32, false)
    }

    /// The flat position data
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// The buffer layout of the position data
    pub const fn layout(&self) -> &BufferLayout {
        &self.layout
    }

    /// Number of vertices
    pub const fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// One normal triplet per vertex, replicated per triangle
    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    /// Fill a color buffer with the given color repeated per vertex
    ///
    /// Components are clamped to [0, 1] and quantized to bytes for a
    /// normalized unsigned-byte color attribute.
    pub fn vertex_colors(&self, color: Vec3) -> Vec<u8> {
        let r = quantize(color.x);
        let g = quantize(color.y);
        let b = quantize(color.z);

        let mut colors = Vec::with_capacity(self.vertex_count * 3);
        for _ in 0..self.vertex_count {
            colors.extend_from_slice(&[r, g, b]);
        }
        colors
    }

    /// Generate texture coordinates for quad-shaped geometry
    ///
    /// Emits the fixed two-triangle UV pattern for every six vertices.
    pub fn texture_coordinates(&self) -> Vec<f32> {
        const QUAD_PATTERN: [f32; 12] = [
            0.0, 1.0, 1.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 1.0, 1.0, 0.0,
        ];

        let quad_count = self.vertex_count / 6;
        let mut coordinates = Vec::with_capacity(quad_count * QUAD_PATTERN.len());
        for _ in 0..quad_count {
            coordinates.extend_from_slice(&QUAD_PATTERN);
        }
        coordinates
    }
}

fn quantize(component: f32) -> u8 {
    (component.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn compute_flat_normals(positions: &[f32]) -> Vec<f32> {
    let mut normals = Vec::with_capacity(positions.len());
    for triangle in positions.chunks_exact(9) {
        let origin = Vec3::new(triangle[0], triangle[1], triangle[2]);
        let edge1 = Vec3::new(triangle[3], triangle[4], triangle[5]) - origin;
        let edge2 = Vec3::new(triangle[6], triangle[7], triangle[8]) - origin;
        let normal = edge1.cross(&edge2).normalize_or_zero();

        for _ in 0..3 {
            normals.extend_from_slice(&[normal.x, normal.y, normal.z]);
        }
    }
    normals
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_triangle() -> Vec<f32> {
        vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
    }

    #[test]
    fn rejects_positions_not_divisible_by_size() {
        let result = Mesh::new(vec![0.0; 10], 3, BufferElement::Float32, false);

        assert!(matches!(
            result,
            Err(SceneError::ShapeMismatch { len: 10, size: 3 })
        ));
    }

    #[test]
    fn accepts_one_triangle_and_replicates_its_normal() {
        let mesh = Mesh::from_positions(unit_triangle()).unwrap();

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.normals().len(), 9);
        // Counter-clockwise in the XY plane faces +Z.
        for vertex in mesh.normals().chunks_exact(3) {
            assert_relative_eq!(vertex[0], 0.0);
            assert_relative_eq!(vertex[1], 0.0);
            assert_relative_eq!(vertex[2], 1.0);
        }
    }

    #[test]
    fn vertex_colors_repeat_per_vertex() {
        let mesh = Mesh::from_positions(unit_triangle()).unwrap();

        let colors = mesh.vertex_colors(Vec3::new(1.0, 0.0, 0.5));
        assert_eq!(colors.len(), 9);
        assert_eq!(&colors[..3], &[255, 0, 128]);
        assert_eq!(&colors[6..], &[255, 0, 128]);
    }

    #[test]
    fn texture_coordinates_cover_full_quads_only() {
        // Two triangles = one quad = 12 coordinate floats.
        let quad: Vec<f32> = (0..18).map(|i| i as f32).collect();
        let mesh = Mesh::from_positions(quad).unwrap();
        assert_eq!(mesh.texture_coordinates().len(), 12);

        // A lone triangle yields no quad and no coordinates.
        let triangle = Mesh::from_positions(unit_triangle()).unwrap();
        assert!(triangle.texture_coordinates().is_empty());
    }
}
