/// Geometry primitives for the scene model
use nalgebra::{Point3, Vector3};

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
        }
    }

    fn from_parts(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Face normal from the winding order. Degenerate faces yield a zero vector.
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let cross = (v1 - v0).cross(&(v2 - v0));
        cross.try_normalize(1e-12).unwrap_or_else(Vector3::zeros)
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn extent(&self) -> Vector3<f32> {
        self.max - self.min
    }
}

/// A bounding sphere used to reject rays before the per-triangle test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Point3<f32>,
    pub radius: f32,
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Bounding box of all vertices, `None` for an empty mesh
    pub fn bounds(&self) -> Option<Aabb> {
        let mut points = self
            .triangles
            .iter()
            .flat_map(|t| t.vertices.iter().map(|v| v.position));
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| {
            (
                Point3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z)),
                Point3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z)),
            )
        });
        Some(Aabb { min, max })
    }

    /// Sphere centred on the bounding box that contains every vertex
    pub fn bounding_sphere(&self) -> Option<BoundingSphere> {
        let center = self.bounds()?.center();
        let radius = self
            .triangles
            .iter()
            .flat_map(|t| t.vertices.iter())
            .map(|v| (v.position - center).norm())
            .fold(0.0_f32, f32::max);
        Some(BoundingSphere { center, radius })
    }

    /// Append every triangle of `other`
    pub fn merge(&mut self, other: Mesh) {
        self.triangles.extend(other.triangles);
    }

    /// Create a simple cube mesh centred on the origin
    pub fn cube(size: f32) -> Self {
        let half = size / 2.0;
        let mut mesh = Self::with_capacity(12);

        // (normal, four corners counter-clockwise seen from outside)
        let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
            ([0.0, 0.0, 1.0], [[-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]]),
            ([0.0, 0.0, -1.0], [[1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0]]),
            ([0.0, 1.0, 0.0], [[-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0], [-1.0, 1.0, -1.0]]),
            ([0.0, -1.0, 0.0], [[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0]]),
            ([1.0, 0.0, 0.0], [[1.0, -1.0, 1.0], [1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0]]),
            ([-1.0, 0.0, 0.0], [[-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0]]),
        ];

        for (n, corners) in faces {
            let v = |c: [f32; 3]| Vertex::new(c[0] * half, c[1] * half, c[2] * half, n[0], n[1], n[2]);
            mesh.add_triangle(Triangle::new(v(corners[0]), v(corners[1]), v(corners[2])));
            mesh.add_triangle(Triangle::new(v(corners[0]), v(corners[2]), v(corners[3])));
        }

        mesh
    }

    /// UV ellipsoid with `segments` slices around Y and `rings` stacks pole to pole
    pub fn ellipsoid(center: Point3<f32>, radii: Vector3<f32>, segments: usize, rings: usize) -> Self {
        let segments = segments.max(3);
        let rings = rings.max(2);
        let mut mesh = Self::with_capacity(segments * rings * 2);

        let point = |ring: usize, seg: usize| {
            let phi = std::f32::consts::PI * ring as f32 / rings as f32;
            let theta = std::f32::consts::TAU * seg as f32 / segments as f32;
            let unit = Vector3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
            let position = center + unit.component_mul(&radii);
            // Gradient of the implicit surface gives the ellipsoid normal
            let normal = unit
                .component_div(&radii)
                .try_normalize(1e-12)
                .unwrap_or(unit);
            Vertex::from_parts(position, normal)
        };

        for ring in 0..rings {
            for seg in 0..segments {
                let next = (seg + 1) % segments;
                let a = point(ring, seg);
                let b = point(ring + 1, seg);
                let c = point(ring + 1, next);
                let d = point(ring, next);
                if ring != 0 {
                    mesh.add_triangle(Triangle::new(a, d, c));
                }
                if ring + 1 != rings {
                    mesh.add_triangle(Triangle::new(a, c, b));
                }
            }
        }

        mesh
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_bounds() {
        let mesh = Mesh::cube(2.0);
        assert_eq!(mesh.triangles.len(), 12);
        let bounds = mesh.bounds().unwrap();
        assert_eq!(bounds.min, Point3::new(-1.0, -1.0, -1.0));
        assert_eq!(bounds.max, Point3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_cube_winding_matches_normals() {
        let mesh = Mesh::cube(1.0);
        for triangle in &mesh.triangles {
            let face = triangle.calculate_normal();
            assert!((face - triangle.vertices[0].normal).norm() < 1e-5);
        }
    }

    #[test]
    fn test_ellipsoid_stays_on_surface() {
        let center = Point3::new(0.0, 1.0, 0.0);
        let radii = Vector3::new(0.5, 1.0, 0.25);
        let mesh = Mesh::ellipsoid(center, radii, 12, 8);
        assert!(!mesh.is_empty());
        for v in mesh.triangles.iter().flat_map(|t| t.vertices.iter()) {
            let local = (v.position - center).component_div(&radii);
            assert!((local.norm() - 1.0).abs() < 1e-4);
        }
        let sphere = mesh.bounding_sphere().unwrap();
        assert!((sphere.radius - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_empty_mesh_has_no_bounds() {
        assert!(Mesh::new().bounds().is_none());
        assert!(Mesh::new().bounding_sphere().is_none());
    }
}
