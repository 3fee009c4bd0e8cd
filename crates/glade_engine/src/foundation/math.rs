//! Math utilities and types
//!
//! Provides the fundamental math types for the scenegraph and renderer.
//! Matrices are column-major `nalgebra` values; `a * b` composes so that `b`
//! is applied first, which is the order the transform and camera code relies
//! on throughout.

pub use nalgebra::{Matrix4, Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;

    /// Length below which a vector is treated as zero
    pub const LENGTH_EPSILON: f32 = 1e-5;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }
}

/// Extension trait for [`Vec3`] with engine-specific constructors
///
/// The axis constructors build a fresh value on every call; callers must not
/// rely on identity.
pub trait Vec3Ext {
    /// World up axis (0, 1, 0)
    fn up() -> Vec3;

    /// World down axis (0, -1, 0)
    fn down() -> Vec3;

    /// World forward axis (0, 0, 1)
    fn forward() -> Vec3;

    /// World backward axis (0, 0, -1)
    fn backward() -> Vec3;

    /// World right axis (1, 0, 0)
    fn right() -> Vec3;

    /// World left axis (-1, 0, 0)
    fn left() -> Vec3;

    /// Normalize, yielding the zero vector for near-zero input instead of
    /// dividing by zero
    fn normalize_or_zero(&self) -> Vec3;
}

impl Vec3Ext for Vec3 {
    fn up() -> Vec3 {
        Vec3::new(0.0, 1.0, 0.0)
    }

    fn down() -> Vec3 {
        Vec3::new(0.0, -1.0, 0.0)
    }

    fn forward() -> Vec3 {
        Vec3::new(0.0, 0.0, 1.0)
    }

    fn backward() -> Vec3 {
        Vec3::new(0.0, 0.0, -1.0)
    }

    fn right() -> Vec3 {
        Vec3::new(1.0, 0.0, 0.0)
    }

    fn left() -> Vec3 {
        Vec3::new(-1.0, 0.0, 0.0)
    }

    fn normalize_or_zero(&self) -> Vec3 {
        let length = self.magnitude();
        if length > constants::LENGTH_EPSILON {
            self / length
        } else {
            Vec3::zeros()
        }
    }
}

/// Extension trait for [`Mat4`] with engine-specific constructors
///
/// Rotation angles and fields of view are taken in degrees, matching the
/// public transform API.
pub trait Mat4Ext {
    /// Create a translation matrix
    fn translation(x: f32, y: f32, z: f32) -> Mat4;

    /// Create a non-uniform scaling matrix
    fn scaling(x: f32, y: f32, z: f32) -> Mat4;

    /// Create a rotation matrix around the X axis
    fn rotation_x(angle_degrees: f32) -> Mat4;

    /// Create a rotation matrix around the Y axis
    fn rotation_y(angle_degrees: f32) -> Mat4;

    /// Create a rotation matrix around the Z axis
    fn rotation_z(angle_degrees: f32) -> Mat4;

    /// Create a perspective projection matrix
    ///
    /// `f = cot(fov / 2)` with the near/far planes folded in through
    /// `1 / (near - far)`.
    fn central_projection(aspect: f32, fov_degrees: f32, near: f32, far: f32) -> Mat4;

    /// Create an orthographic projection matrix mapping the given box onto
    /// the canonical clip cube
    fn orthographic_projection(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Mat4;

    /// Create a matrix whose rotation aligns the Z axis with the direction
    /// from `target` to `eye` and whose translation is `eye`
    ///
    /// Falls back to a basis derived from the world forward axis when the
    /// view direction is parallel to the world up axis.
    fn look_at_from(eye: Vec3, target: Vec3) -> Mat4;

    /// General cofactor-expansion inverse
    ///
    /// A numerically singular matrix yields non-finite entries, mirroring
    /// floating-point division-by-zero; it never panics.
    fn cofactor_inverse(&self) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn translation(x: f32, y: f32, z: f32) -> Mat4 {
        Mat4::new_translation(&Vec3::new(x, y, z))
    }

    fn scaling(x: f32, y: f32, z: f32) -> Mat4 {
        Mat4::new_nonuniform_scaling(&Vec3::new(x, y, z))
    }

    fn rotation_x(angle_degrees: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::x_axis(), utils::deg_to_rad(angle_degrees))
    }

    fn rotation_y(angle_degrees: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::y_axis(), utils::deg_to_rad(angle_degrees))
    }

    fn rotation_z(angle_degrees: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::z_axis(), utils::deg_to_rad(angle_degrees))
    }

    fn central_projection(aspect: f32, fov_degrees: f32, near: f32, far: f32) -> Mat4 {
        let fov = utils::deg_to_rad(fov_degrees);
        let f = 1.0 / (fov * 0.5).tan();
        let range_inv = 1.0 / (near - far);

        Mat4::new(
            f / aspect, 0.0, 0.0, 0.0,
            0.0, f, 0.0, 0.0,
            0.0, 0.0, (near + far) * range_inv, near * far * range_inv * 2.0,
            0.0, 0.0, -1.0, 0.0,
        )
    }

    fn orthographic_projection(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Mat4 {
        Mat4::new(
            2.0 / (right - left), 0.0, 0.0, (left + right) / (left - right),
            0.0, 2.0 / (top - bottom), 0.0, (bottom + top) / (bottom - top),
            0.0, 0.0, 2.0 / (near - far), (near + far) / (near - far),
            0.0, 0.0, 0.0, 1.0,
        )
    }

    fn look_at_from(eye: Vec3, target: Vec3) -> Mat4 {
        let world_up = Vec3::up();
        let mut forward = (eye - target).normalize_or_zero();

        let right;
        let up;
        if forward.cross(&world_up).magnitude() > constants::LENGTH_EPSILON {
            right = world_up.cross(&forward).normalize_or_zero();
            up = forward.cross(&right).normalize_or_zero();
        } else {
            // Looking straight along the up axis: build the basis from the
            // world forward axis instead to avoid a degenerate cross product.
            right = forward;
            up = Vec3::forward().cross(&right).normalize_or_zero();
            forward = right.cross(&up).normalize_or_zero();
        }

        Mat4::new(
            right.x, up.x, forward.x, eye.x,
            right.y, up.y, forward.y, eye.y,
            right.z, up.z, forward.z, eye.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    fn cofactor_inverse(&self) -> Mat4 {
        let m = self.as_slice();
        let mut inv = [0.0f32; 16];

        inv[0] = m[5] * m[10] * m[15] - m[5] * m[11] * m[14] - m[9] * m[6] * m[15]
            + m[9] * m[7] * m[14]
            + m[13] * m[6] * m[11]
            - m[13] * m[7] * m[10];
        inv[4] = -m[4] * m[10] * m[15] + m[4] * m[11] * m[14] + m[8] * m[6] * m[15]
            - m[8] * m[7] * m[14]
            - m[12] * m[6] * m[11]
            + m[12] * m[7] * m[10];
        inv[8] = m[4] * m[9] * m[15] - m[4] * m[11] * m[13] - m[8] * m[5] * m[15]
            + m[8] * m[7] * m[13]
            + m[12] * m[5] * m[11]
            - m[12] * m[7] * m[9];
        inv[12] = -m[4] * m[9] * m[14] + m[4] * m[10] * m[13] + m[8] * m[5] * m[14]
            - m[8] * m[6] * m[13]
            - m[12] * m[5] * m[10]
            + m[12] * m[6] * m[9];
        inv[1] = -m[1] * m[10] * m[15] + m[1] * m[11] * m[14] + m[9] * m[2] * m[15]
            - m[9] * m[3] * m[14]
            - m[13] * m[2] * m[11]
            + m[13] * m[3] * m[10];
        inv[5] = m[0] * m[10] * m[15] - m[0] * m[11] * m[14] - m[8] * m[2] * m[15]
            + m[8] * m[3] * m[14]
            + m[12] * m[2] * m[11]
            - m[12] * m[3] * m[10];
        inv[9] = -m[0] * m[9] * m[15] + m[0] * m[11] * m[13] + m[8] * m[1] * m[15]
            - m[8] * m[3] * m[13]
            - m[12] * m[1] * m[11]
            + m[12] * m[3] * m[9];
        inv[13] = m[0] * m[9] * m[14] - m[0] * m[10] * m[13] - m[8] * m[1] * m[14]
            + m[8] * m[2] * m[13]
            + m[12] * m[1] * m[10]
            - m[12] * m[2] * m[9];
        inv[2] = m[1] * m[6] * m[15] - m[1] * m[7] * m[14] - m[5] * m[2] * m[15]
            + m[5] * m[3] * m[14]
            + m[13] * m[2] * m[7]
            - m[13] * m[3] * m[6];
        inv[6] = -m[0] * m[6] * m[15] + m[0] * m[7] * m[14] + m[4] * m[2] * m[15]
            - m[4] * m[3] * m[14]
            - m[12] * m[2] * m[7]
            + m[12] * m[3] * m[6];
        inv[10] = m[0] * m[5] * m[15] - m[0] * m[7] * m[13] - m[4] * m[1] * m[15]
            + m[4] * m[3] * m[13]
            + m[12] * m[1] * m[7]
            - m[12] * m[3] * m[5];
        inv[14] = -m[0] * m[5] * m[14] + m[0] * m[6] * m[13] + m[4] * m[1] * m[14]
            - m[4] * m[2] * m[13]
            - m[12] * m[1] * m[6]
            + m[12] * m[2] * m[5];
        inv[3] = -m[1] * m[6] * m[11] + m[1] * m[7] * m[10] + m[5] * m[2] * m[11]
            - m[5] * m[3] * m[10]
            - m[9] * m[2] * m[7]
            + m[9] * m[3] * m[6];
        inv[7] = m[0] * m[6] * m[11] - m[0] * m[7] * m[10] - m[4] * m[2] * m[11]
            + m[4] * m[3] * m[10]
            + m[8] * m[2] * m[7]
            - m[8] * m[3] * m[6];
        inv[11] = -m[0] * m[5] * m[11] + m[0] * m[7] * m[9] + m[4] * m[1] * m[11]
            - m[4] * m[3] * m[9]
            - m[8] * m[1] * m[7]
            + m[8] * m[3] * m[5];
        inv[15] = m[0] * m[5] * m[10] - m[0] * m[6] * m[9] - m[4] * m[1] * m[10]
            + m[4] * m[2] * m[9]
            + m[8] * m[1] * m[6]
            - m[8] * m[2] * m[5];

        let det = m[0] * inv[0] + m[1] * inv[4] + m[2] * inv[8] + m[3] * inv[12];
        let d = 1.0 / det;

        for value in &mut inv {
            *value *= d;
        }
        Mat4::from_column_slice(&inv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn multiply_by_identity_is_neutral() {
        let m = Mat4::translation(3.0, -2.0, 7.5) * Mat4::rotation_y(30.0);

        assert_relative_eq!(Mat4::identity() * m, m, epsilon = 1e-6);
        assert_relative_eq!(m * Mat4::identity(), m, epsilon = 1e-6);
    }

    #[test]
    fn multiply_applies_right_operand_first() {
        let translate = Mat4::translation(10.0, 0.0, 0.0);
        let rotate = Mat4::rotation_z(90.0);
        let point = Vec4::new(1.0, 0.0, 0.0, 1.0);

        // Rotate first, then translate: (1,0,0) -> (0,1,0) -> (10,1,0).
        let rotated_then_translated = (translate * rotate) * point;
        assert_relative_eq!(rotated_then_translated.x, 10.0, epsilon = 1e-5);
        assert_relative_eq!(rotated_then_translated.y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn cofactor_inverse_round_trips() {
        let m = Mat4::translation(1.0, 2.0, 3.0)
            * Mat4::rotation_x(40.0)
            * Mat4::scaling(2.0, 2.0, 2.0);

        let product = m * m.cofactor_inverse();
        assert_relative_eq!(product, Mat4::identity(), epsilon = 1e-4);
    }

    #[test]
    fn cofactor_inverse_of_singular_matrix_is_non_finite() {
        let singular = Mat4::scaling(1.0, 1.0, 0.0);

        let inverse = singular.cofactor_inverse();
        assert!(inverse.iter().any(|value| !value.is_finite()));
    }

    #[test]
    fn normalize_or_zero_handles_zero_vector() {
        assert_eq!(Vec3::zeros().normalize_or_zero(), Vec3::zeros());

        let unit = Vec3::new(3.0, -4.0, 12.0).normalize_or_zero();
        assert_relative_eq!(unit.magnitude(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn look_at_keeps_eye_position() {
        let eye = Vec3::new(2.0, 3.0, 4.0);
        let m = Mat4::look_at_from(eye, Vec3::zeros());

        assert_relative_eq!(m[(0, 3)], eye.x);
        assert_relative_eq!(m[(1, 3)], eye.y);
        assert_relative_eq!(m[(2, 3)], eye.z);
    }

    #[test]
    fn look_at_along_up_axis_stays_finite() {
        let m = Mat4::look_at_from(Vec3::new(0.0, 5.0, 0.0), Vec3::zeros());

        assert!(m.iter().all(|value| value.is_finite()));
    }

    #[test]
    fn central_projection_matches_cotangent_form() {
        let m = Mat4::central_projection(2.0, 90.0, 1.0, 2000.0);

        // cot(45 deg) = 1
        assert_relative_eq!(m[(0, 0)], 0.5, epsilon = 1e-5);
        assert_relative_eq!(m[(1, 1)], 1.0, epsilon = 1e-5);
        assert_relative_eq!(m[(3, 2)], -1.0, epsilon = 1e-6);
        assert_relative_eq!(m[(3, 3)], 0.0, epsilon = 1e-6);
    }

    #[test]
    fn orthographic_projection_maps_box_corners() {
        let m = Mat4::orthographic_projection(0.0, 800.0, 640.0, 0.0, 400.0, -400.0);

        let origin = m * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(origin.x, -1.0, epsilon = 1e-5);
        assert_relative_eq!(origin.y, 1.0, epsilon = 1e-5);

        let corner = m * Vec4::new(800.0, 640.0, 0.0, 1.0);
        assert_relative_eq!(corner.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(corner.y, -1.0, epsilon = 1e-5);
    }
}
