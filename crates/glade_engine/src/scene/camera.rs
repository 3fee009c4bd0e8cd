//! Camera component

use crate::config::{EngineConfig, OrthographicConfig, ProjectionConfig};
use crate::foundation::math::{Mat4, Mat4Ext, Vec3};

/// Projection data and render settings for viewing a scene from the node the
/// camera is attached to
///
/// The view half of the view-projection is derived from the container's
/// transform by [`SceneTree::view_projection`](super::SceneTree::view_projection);
/// a camera without a container (or without a transform) renders with the
/// bare projection.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    active: bool,
    orthographic: bool,
    projection: Mat4,
    field_of_view: f32,
    background: Vec3,
    background_enabled: bool,
    clip: ProjectionConfig,
    orthographic_clip: OrthographicConfig,
}

impl Camera {
    /// Create a camera with default settings: active, perspective mode,
    /// identity projection, black background
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    /// Create a camera taking clip planes and default field of view from
    /// configuration
    pub fn with_config(config: &EngineConfig) -> Self {
        Self {
            active: true,
            orthographic: false,
            projection: Mat4::identity(),
            field_of_view: config.projection.field_of_view,
            background: Vec3::zeros(),
            background_enabled: true,
            clip: config.projection,
            orthographic_clip: config.orthographic,
        }
    }

    /// Switch the camera on or off; an inactive camera suppresses its
    /// viewport's frame entirely
    pub fn activate(&mut self, on: bool) {
        self.active = on;
    }

    /// Whether this camera renders
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the projection is orthographic
    pub const fn is_orthographic(&self) -> bool {
        self.orthographic
    }

    /// The current projection matrix
    pub const fn projection(&self) -> &Mat4 {
        &self.projection
    }

    /// The field of view in degrees used by the central projection
    pub const fn field_of_view(&self) -> f32 {
        self.field_of_view
    }

    /// The background color
    pub const fn background(&self) -> Vec3 {
        self.background
    }

    /// Set the background color
    pub fn set_background(&mut self, color: Vec3) {
        self.background = color;
    }

    /// Whether the background is cleared opaquely
    pub const fn background_enabled(&self) -> bool {
        self.background_enabled
    }

    /// Enable or disable the opaque background
    pub fn set_background_enabled(&mut self, enabled: bool) {
        self.background_enabled = enabled;
    }

    /// Switch to perspective projection, replacing the projection matrix
    pub fn project_central(&mut self, aspect: f32, fov_degrees: f32) {
        self.field_of_view = fov_degrees;
        self.orthographic = false;
        self.projection =
            Mat4::central_projection(aspect, fov_degrees, self.clip.near, self.clip.far);
    }

    /// Switch to orthographic projection, replacing the projection matrix
    pub fn project_orthographic(&mut self, left: f32, right: f32, bottom: f32, top: f32) {
        self.orthographic = true;
        self.projection = Mat4::orthographic_projection(
            left,
            right,
            bottom,
            top,
            self.orthographic_clip.near,
            self.orthographic_clip.far,
        );
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults_match_configuration() {
        let camera = Camera::new();

        assert!(camera.is_active());
        assert!(!camera.is_orthographic());
        assert_relative_eq!(camera.field_of_view(), 45.0);
        assert_eq!(*camera.projection(), Mat4::identity());
    }

    #[test]
    fn switching_modes_replaces_the_projection() {
        let mut camera = Camera::new();

        camera.project_central(1.5, 60.0);
        assert!(!camera.is_orthographic());
        assert_relative_eq!(camera.field_of_view(), 60.0);
        let perspective = *camera.projection();

        camera.project_orthographic(0.0, 800.0, 640.0, 0.0);
        assert!(camera.is_orthographic());
        assert_ne!(*camera.projection(), perspective);
    }
}
