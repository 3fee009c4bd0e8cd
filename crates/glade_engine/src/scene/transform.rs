//! Pivot and transform components

use crate::foundation::math::{Mat4, Mat4Ext, Vec3};

/// Local affine transform applied to a node's mesh without affecting
/// descendants
///
/// Every helper composes the elementary transform on the right, so new
/// transforms apply in the frame of the current local orientation rather
/// than along the global axes. Angles are in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Pivot {
    matrix: Mat4,
}

impl Pivot {
    /// Create an identity pivot
    pub fn new() -> Self {
        Self {
            matrix: Mat4::identity(),
        }
    }

    /// The local matrix
    pub const fn matrix(&self) -> &Mat4 {
        &self.matrix
    }

    /// The local position (translation column)
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.matrix[(0, 3)], self.matrix[(1, 3)], self.matrix[(2, 3)])
    }

    /// Reset the local matrix to identity
    pub fn reset(&mut self) {
        self.matrix = Mat4::identity();
    }

    /// Translate along all three axes
    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.matrix *= Mat4::translation(x, y, z);
    }

    /// Translate along the local x-axis
    pub fn translate_x(&mut self, x: f32) {
        self.translate(x, 0.0, 0.0);
    }

    /// Translate along the local y-axis
    pub fn translate_y(&mut self, y: f32) {
        self.translate(0.0, y, 0.0);
    }

    /// Translate along the local z-axis
    pub fn translate_z(&mut self, z: f32) {
        self.translate(0.0, 0.0, z);
    }

    /// Rotate around the local x-axis
    pub fn rotate_x(&mut self, angle_degrees: f32) {
        self.matrix *= Mat4::rotation_x(angle_degrees);
    }

    /// Rotate around the local y-axis
    pub fn rotate_y(&mut self, angle_degrees: f32) {
        self.matrix *= Mat4::rotation_y(angle_degrees);
    }

    /// Rotate around the local z-axis
    pub fn rotate_z(&mut self, angle_degrees: f32) {
        self.matrix *= Mat4::rotation_z(angle_degrees);
    }

    /// Scale along all three axes
    pub fn scale(&mut self, x: f32, y: f32, z: f32) {
        self.matrix *= Mat4::scaling(x, y, z);
    }

    /// Scale along the local x-axis
    pub fn scale_x(&mut self, factor: f32) {
        self.scale(factor, 1.0, 1.0);
    }

    /// Scale along the local y-axis
    pub fn scale_y(&mut self, factor: f32) {
        self.scale(1.0, factor, 1.0);
    }

    /// Scale along the local z-axis
    pub fn scale_z(&mut self, factor: f32) {
        self.scale(1.0, 1.0, factor);
    }

    /// Rebuild the matrix so the local z-axis faces `target`, keeping the
    /// current position
    ///
    /// Known limitation: the result does not compose correctly with ancestor
    /// transforms, since only the local position enters the construction.
    pub fn look_at(&mut self, target: Vec3) {
        self.matrix = Mat4::look_at_from(self.position(), target);
    }
}

impl Default for Pivot {
    fn default() -> Self {
        Self::new()
    }
}

/// Local transform affecting the node and all its descendants, plus the
/// cached world matrix
///
/// The world matrix is written exclusively by the propagation pass; it holds
/// identity-derived data until the first
/// [`SceneTree::update_world_matrices`](super::SceneTree::update_world_matrices)
/// call.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    local: Pivot,
    world: Mat4,
}

impl Transform {
    /// Create an identity transform
    pub fn new() -> Self {
        Self {
            local: Pivot::new(),
            world: Mat4::identity(),
        }
    }

    /// Borrow the local transform
    pub const fn local(&self) -> &Pivot {
        &self.local
    }

    /// Borrow the local transform mutably
    pub fn local_mut(&mut self) -> &mut Pivot {
        &mut self.local
    }

    /// The cached world matrix
    pub const fn world(&self) -> &Mat4 {
        &self.world
    }

    pub(crate) fn set_world(&mut self, world: Mat4) {
        self.world = world;
    }

    /// The world position (world matrix translation column)
    pub fn world_position(&self) -> Vec3 {
        Vec3::new(self.world[(0, 3)], self.world[(1, 3)], self.world[(2, 3)])
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn helpers_compose_on_the_right() {
        let mut pivot = Pivot::new();
        pivot.translate(5.0, 0.0, 0.0);
        pivot.rotate_y(90.0);

        // Rotating after translating must not move the pivot.
        assert_relative_eq!(pivot.position(), Vec3::new(5.0, 0.0, 0.0), epsilon = 1e-5);

        // A subsequent local x-translation now runs along the rotated axis.
        pivot.translate_x(2.0);
        assert_relative_eq!(pivot.position(), Vec3::new(5.0, 0.0, -2.0), epsilon = 1e-5);
    }

    #[test]
    fn look_at_preserves_position() {
        let mut pivot = Pivot::new();
        pivot.translate(1.0, 2.0, 3.0);
        pivot.look_at(Vec3::zeros());

        assert_relative_eq!(pivot.position(), Vec3::new(1.0, 2.0, 3.0), epsilon = 1e-5);
    }

    #[test]
    fn world_matrix_starts_as_identity() {
        let mut transform = Transform::new();
        transform.local_mut().translate(4.0, 0.0, 0.0);

        assert_eq!(*transform.world(), Mat4::identity());
        assert_eq!(transform.world_position(), Vec3::zeros());
    }
}
