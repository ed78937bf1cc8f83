/// Secondary motion for skeleton bones.
use nalgebra::{Matrix4, Point3, Vector3};

use crate::model::Skeleton;

/// Per-bone passive motion, advanced once per frame.
pub trait SecondaryMotion {
    /// Index of the bone this handle drives
    fn bone(&self) -> usize;

    /// Advance one step. `world` is the model's current local-to-world matrix.
    fn update(&mut self, skeleton: &mut Skeleton, world: &Matrix4<f32>);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WiggleConfig {
    /// Fraction of velocity kept each step, in `[0, 1)`. Higher wiggles longer.
    pub velocity: f32,
    pub stiffness: f32,
    pub max_offset: f32,
}

impl WiggleConfig {
    pub fn with_velocity(velocity: f32) -> Self {
        Self {
            velocity,
            ..Self::default()
        }
    }
}

impl Default for WiggleConfig {
    fn default() -> Self {
        Self {
            velocity: 0.6,
            stiffness: 0.3,
            max_offset: 0.25,
        }
    }
}

/// Damped spring that trails the bone's world anchor and reports the lag as
/// the bone offset.
#[derive(Debug, Clone)]
pub struct WiggleBone {
    bone: usize,
    config: WiggleConfig,
    position: Option<Point3<f32>>,
    velocity: Vector3<f32>,
}

impl WiggleBone {
    pub fn new(bone: usize, config: WiggleConfig) -> Self {
        Self {
            bone,
            config: WiggleConfig {
                velocity: config.velocity.clamp(0.0, 0.99),
                ..config
            },
            position: None,
            velocity: Vector3::zeros(),
        }
    }
}

impl SecondaryMotion for WiggleBone {
    fn bone(&self) -> usize {
        self.bone
    }

    fn update(&mut self, skeleton: &mut Skeleton, world: &Matrix4<f32>) {
        let Some(bone) = skeleton.bones.get_mut(self.bone) else {
            return;
        };
        let anchor = world.transform_point(&bone.head);
        let position = self.position.get_or_insert(anchor);

        self.velocity = (self.velocity + (anchor - *position) * self.config.stiffness)
            * self.config.velocity;
        *position += self.velocity;

        let lag = *position - anchor;
        let max = self.config.max_offset;
        bone.offset = if lag.norm() > max {
            lag.normalize() * max
        } else {
            lag
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Bone;

    fn skeleton() -> Skeleton {
        Skeleton::new(vec![Bone::new("ear", Point3::new(0.0, 1.0, 0.0), None)])
    }

    #[test]
    fn test_first_update_is_at_rest() {
        let mut skeleton = skeleton();
        let mut wiggle = WiggleBone::new(0, WiggleConfig::default());
        wiggle.update(&mut skeleton, &Matrix4::identity());
        assert_eq!(skeleton.bones[0].offset, Vector3::zeros());
    }

    #[test]
    fn test_lags_then_settles_after_a_jump() {
        let mut skeleton = skeleton();
        let mut wiggle = WiggleBone::new(0, WiggleConfig::default());
        wiggle.update(&mut skeleton, &Matrix4::identity());

        let moved = Matrix4::new_translation(&Vector3::new(1.0, 0.0, 0.0));
        wiggle.update(&mut skeleton, &moved);
        let lag = skeleton.bones[0].offset;
        assert!(lag.x < 0.0, "bone should trail the motion, got {lag:?}");
        assert!(lag.norm() <= WiggleConfig::default().max_offset + 1e-6);

        for _ in 0..200 {
            wiggle.update(&mut skeleton, &moved);
        }
        assert!(skeleton.bones[0].offset.norm() < 1e-3);
    }

    #[test]
    fn test_missing_bone_is_ignored() {
        let mut skeleton = skeleton();
        let mut wiggle = WiggleBone::new(7, WiggleConfig::default());
        wiggle.update(&mut skeleton, &Matrix4::identity());
        assert_eq!(wiggle.bone(), 7);
    }
}
