/// The draggable model node, its parts and skeleton.
use nalgebra::{Matrix4, Point3, Vector3};

use crate::geometry::{BoundingSphere, Mesh};
use crate::ray::{Ray, RayHit};
use crate::transform::{NodeTransform, Transform};

/// A transform node in the skeleton. `offset` is the current world-space
/// displacement written by secondary motion; zero at rest.
#[derive(Debug, Clone, PartialEq)]
pub struct Bone {
    pub name: String,
    /// Pivot in model space
    pub head: Point3<f32>,
    pub parent: Option<usize>,
    pub offset: Vector3<f32>,
}

impl Bone {
    pub fn new(name: impl Into<String>, head: Point3<f32>, parent: Option<usize>) -> Self {
        Self {
            name: name.into(),
            head,
            parent,
            offset: Vector3::zeros(),
        }
    }
}

/// Ordered bone list. Parents precede children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Skeleton {
    pub bones: Vec<Bone>,
}

impl Skeleton {
    pub fn new(bones: Vec<Bone>) -> Self {
        Self { bones }
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|b| b.name == name)
    }

    /// Displacement of a bone including every ancestor's
    pub fn accumulated_offset(&self, index: usize) -> Vector3<f32> {
        let mut total = Vector3::zeros();
        let mut cursor = Some(index);
        while let Some(i) = cursor {
            let Some(bone) = self.bones.get(i) else { break };
            total += bone.offset;
            cursor = bone.parent.filter(|&p| p < i);
        }
        total
    }
}

/// A mesh rigidly bound to at most one bone
#[derive(Debug, Clone)]
pub struct ModelPart {
    pub mesh: Mesh,
    pub bone: Option<usize>,
    pub bounds: Option<BoundingSphere>,
}

impl ModelPart {
    pub fn new(mesh: Mesh, bone: Option<usize>) -> Self {
        let bounds = mesh.bounding_sphere();
        Self { mesh, bone, bounds }
    }
}

#[derive(Debug, Clone)]
pub struct Model {
    pub name: String,
    pub parts: Vec<ModelPart>,
    pub skeleton: Skeleton,
    pub transform: NodeTransform,
}

impl Model {
    pub fn new(name: impl Into<String>, parts: Vec<ModelPart>, skeleton: Skeleton) -> Self {
        Self {
            name: name.into(),
            parts,
            skeleton,
            transform: NodeTransform::identity(),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.parts.iter().map(|p| p.mesh.triangles.len()).sum()
    }

    pub fn world_matrix(&self) -> Matrix4<f32> {
        self.transform.matrix()
    }

    /// World matrix of one part with its bone displacement applied
    pub fn part_matrix(&self, index: usize) -> Matrix4<f32> {
        let offset = self
            .parts
            .get(index)
            .and_then(|p| p.bone)
            .map(|bone| self.skeleton.accumulated_offset(bone))
            .unwrap_or_else(Vector3::zeros);
        Transform::translation_matrix(&offset) * self.world_matrix()
    }

    /// Uniform scale snap. Returns whether the value changed.
    pub fn snap_scale(&mut self, scale: f32) -> bool {
        if self.transform.scale == scale {
            return false;
        }
        self.transform.scale = scale;
        true
    }

    /// Nearest hit across every posed part
    pub fn intersect(&self, ray: &Ray) -> Option<RayHit> {
        self.parts
            .iter()
            .enumerate()
            .filter_map(|(index, part)| {
                let world = self.part_matrix(index);
                if let Some(bounds) = part.bounds {
                    let placed = BoundingSphere {
                        center: world.transform_point(&bounds.center),
                        radius: bounds.radius * self.transform.scale.abs(),
                    };
                    if !ray.hits_sphere(&placed) {
                        return None;
                    }
                }
                ray.intersect_mesh(&part.mesh, &world)
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}
