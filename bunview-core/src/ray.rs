/// Ray casting against triangles, spheres and meshes
use nalgebra::{Matrix4, Point3, Vector3};

use crate::geometry::{BoundingSphere, Mesh, Triangle};

const EPSILON: f32 = 1e-7;
/// Barycentric slack so rays along a shared edge hit one of its triangles
const EDGE_TOLERANCE: f32 = 1e-5;

/// A half-line with a unit direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

/// Nearest intersection along a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub point: Point3<f32>,
}

impl Ray {
    /// `None` when the direction has no length
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Option<Self> {
        let direction = direction.try_normalize(EPSILON)?;
        Some(Self { origin, direction })
    }

    pub fn at(&self, distance: f32) -> Point3<f32> {
        self.origin + self.direction * distance
    }

    /// Two-sided Möller–Trumbore test. Returns the hit distance.
    pub fn intersect_triangle(&self, a: &Point3<f32>, b: &Point3<f32>, c: &Point3<f32>) -> Option<f32> {
        let edge1 = b - a;
        let edge2 = c - a;
        let p = self.direction.cross(&edge2);
        let det = edge1.dot(&p);
        if det.abs() < EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = self.origin - a;
        let u = s.dot(&p) * inv_det;
        if !(-EDGE_TOLERANCE..=1.0 + EDGE_TOLERANCE).contains(&u) {
            return None;
        }

        let q = s.cross(&edge1);
        let v = self.direction.dot(&q) * inv_det;
        if v < -EDGE_TOLERANCE || u + v > 1.0 + EDGE_TOLERANCE {
            return None;
        }

        let t = edge2.dot(&q) * inv_det;
        (t > EPSILON).then_some(t)
    }

    pub fn hits_sphere(&self, sphere: &BoundingSphere) -> bool {
        let to_center = sphere.center - self.origin;
        let along = to_center.dot(&self.direction);
        let closest_sq = to_center.norm_squared() - along * along;
        let radius_sq = sphere.radius * sphere.radius;
        if closest_sq > radius_sq {
            return false;
        }
        // Sphere entirely behind the origin
        along >= 0.0 || to_center.norm_squared() <= radius_sq
    }

    /// Nearest hit on `mesh` after placing it with `world`.
    pub fn intersect_mesh(&self, mesh: &Mesh, world: &Matrix4<f32>) -> Option<RayHit> {
        mesh.triangles
            .iter()
            .filter_map(|triangle| self.intersect_placed(triangle, world))
            .min_by(|a, b| a.total_cmp(b))
            .map(|distance| RayHit {
                distance,
                point: self.at(distance),
            })
    }

    fn intersect_placed(&self, triangle: &Triangle, world: &Matrix4<f32>) -> Option<f32> {
        let [a, b, c] = triangle
            .vertices
            .map(|v| world.transform_point(&v.position));
        self.intersect_triangle(&a, &b, &c)
    }
}
