/// 3D transformation matrices and node transforms
use nalgebra::{Matrix4, Vector3};

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a rotation matrix from a rotation state
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(rotation.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, rotation.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, rotation.z));

        // Apply rotations in order: X, then Y, then Z
        rz * ry * rx
    }

    pub fn translation_matrix(offset: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new_translation(offset)
    }

    pub fn uniform_scale_matrix(scale: f32) -> Matrix4<f32> {
        Matrix4::new_scaling(scale)
    }
}

/// Position, rotation and uniform scale of a scene node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransform {
    pub position: Vector3<f32>,
    pub rotation: RotationState,
    pub scale: f32,
}

impl NodeTransform {
    pub fn identity() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: RotationState::zero(),
            scale: 1.0,
        }
    }

    /// Local-to-world matrix: translate * rotate * scale
    pub fn matrix(&self) -> Matrix4<f32> {
        Transform::translation_matrix(&self.position)
            * Transform::rotation_matrix(&self.rotation)
            * Transform::uniform_scale_matrix(self.scale)
    }
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_identity_rotation() {
        let rotation = RotationState::zero();
        let matrix = Transform::rotation_matrix(&rotation);
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_negative_quarter_yaw_turns_x_toward_z() {
        let node = NodeTransform {
            rotation: RotationState::new(0.0, -std::f32::consts::FRAC_PI_2, 0.0),
            ..NodeTransform::identity()
        };
        let p = node.matrix().transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((p - Point3::new(0.0, 0.0, 1.0)).norm() < 1e-5);
    }

    #[test]
    fn test_node_matrix_scales_before_translating() {
        let node = NodeTransform {
            position: Vector3::new(2.0, 0.0, 0.0),
            scale: 0.5,
            ..NodeTransform::identity()
        };
        let p = node.matrix().transform_point(&Point3::new(1.0, 1.0, 0.0));
        assert!((p - Point3::new(2.5, 0.5, 0.0)).norm() < 1e-6);
    }
}
