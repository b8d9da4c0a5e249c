//! Terrain Mesh
//!
//! Indexed triangle mesh with one flat color per face. Produced once by the
//! builder; the post-pass (bounds, vertex merge, normals) runs in
//! [`TerrainMesh::finish`] and the result is never mutated afterwards.

use std::collections::HashMap;

use glam::{DVec3, Vec3};

use super::color::Color;
use crate::render::vertex::TerrainVertex;

/// Vertices closer than 10^-4 on every axis are merged.
const MERGE_PRECISION: f64 = 10_000.0;

/// Which side of the coastline a face was colored for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Surface {
    Land,
    Sea,
}

/// One triangle of the terrain.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Face {
    pub indices: [u32; 3],
    pub surface: Surface,
    pub color: Color,
    /// Unit normal, filled in by the post-pass
    pub normal: Vec3,
}

impl Face {
    pub fn new(indices: [u32; 3], surface: Surface, color: Color) -> Self {
        Self {
            indices,
            surface,
            color,
            normal: Vec3::Y,
        }
    }
}

/// Axis-aligned bounding box. Empty boxes have `min > max`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub const EMPTY: Bounds = Bounds {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a DVec3>) -> Self {
        let mut min = DVec3::splat(f64::INFINITY);
        let mut max = DVec3::splat(f64::NEG_INFINITY);
        for p in points {
            min = min.min(*p);
            max = max.max(*p);
        }
        if min.x > max.x {
            return Self::EMPTY;
        }
        Self {
            min: min.as_vec3(),
            max: max.as_vec3(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }
}

/// Finished terrain geometry.
#[derive(Clone, Debug)]
pub struct TerrainMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub faces: Vec<Face>,
    pub bounds: Bounds,
}

impl TerrainMesh {
    /// Run the post-pass over raw builder output.
    ///
    /// Bounds are taken before merging; merging only ever removes duplicates
    /// so they stay exact.
    pub fn finish(positions: Vec<DVec3>, faces: Vec<Face>) -> Self {
        let bounds = Bounds::from_points(&positions);
        let (positions, mut faces) = merge_vertices(positions, faces);

        let mut vertex_sums = vec![DVec3::ZERO; positions.len()];
        for face in &mut faces {
            let [a, b, c] = face.indices.map(|i| positions[i as usize]);
            let cross = (c - b).cross(a - b);
            face.normal = cross.normalize_or(DVec3::Y).as_vec3();
            // unnormalized cross product weights by face area
            for i in face.indices {
                vertex_sums[i as usize] += cross;
            }
        }

        let normals = vertex_sums
            .into_iter()
            .map(|n| n.normalize_or(DVec3::Y).as_vec3())
            .collect();

        Self {
            positions: positions.iter().map(|p| p.as_vec3()).collect(),
            normals,
            faces,
            bounds,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn count_faces(&self, surface: Surface) -> usize {
        self.faces.iter().filter(|f| f.surface == surface).count()
    }

    /// Triangle list indices, three per face.
    pub fn indices(&self) -> Vec<u32> {
        self.faces.iter().flat_map(|f| f.indices).collect()
    }

    /// Non-indexed vertex stream for upload.
    ///
    /// Flat face colors need unshared corners, so every face gets three fresh
    /// vertices carrying the smooth vertex normals and the face color.
    pub fn vertex_buffer(&self) -> Vec<TerrainVertex> {
        let mut vertices = Vec::with_capacity(self.faces.len() * 3);
        for face in &self.faces {
            let color = face.color.to_rgba();
            for i in face.indices {
                let i = i as usize;
                vertices.push(TerrainVertex {
                    position: self.positions[i].to_array(),
                    normal: self.normals[i].to_array(),
                    color,
                });
            }
        }
        vertices
    }
}

/// Collapse coincident vertices, remap faces and drop faces that degenerate.
fn merge_vertices(positions: Vec<DVec3>, faces: Vec<Face>) -> (Vec<DVec3>, Vec<Face>) {
    let mut lookup: HashMap<(i64, i64, i64), u32> = HashMap::with_capacity(positions.len());
    let mut unique = Vec::with_capacity(positions.len());
    let mut remap = Vec::with_capacity(positions.len());

    for p in positions {
        let key = (
            (p.x * MERGE_PRECISION).round() as i64,
            (p.y * MERGE_PRECISION).round() as i64,
            (p.z * MERGE_PRECISION).round() as i64,
        );
        let index = *lookup.entry(key).or_insert_with(|| {
            unique.push(p);
            (unique.len() - 1) as u32
        });
        remap.push(index);
    }

    if unique.len() == remap.len() {
        return (unique, faces);
    }

    let faces = faces
        .into_iter()
        .filter_map(|mut face| {
            face.indices = face.indices.map(|i| remap[i as usize]);
            let [a, b, c] = face.indices;
            (a != b && b != c && a != c).then_some(face)
        })
        .collect();

    (unique, faces)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sea_face(indices: [u32; 3]) -> Face {
        Face::new(indices, Surface::Sea, Color::WHITE)
    }

    #[test]
    fn test_flat_triangle_normals_point_up() {
        // winding used by the lattice builder: current, left, left-down
        let positions = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(0.0, 0.0, -1.0),
            DVec3::new(-0.866, 0.0, -0.5),
        ];
        let mesh = TerrainMesh::finish(positions, vec![sea_face([0, 1, 2])]);
        assert!((mesh.faces[0].normal - Vec3::Y).length() < 1e-6);
        for n in &mesh.normals {
            assert!((*n - Vec3::Y).length() < 1e-6);
        }
    }

    #[test]
    fn test_merge_drops_degenerate_faces() {
        let positions = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, 0.0, 1.0),
            DVec3::new(1.0, 0.0, 0.000_01), // merges into vertex 1
        ];
        let faces = vec![sea_face([0, 2, 1]), sea_face([1, 3, 2]), sea_face([3, 2, 0])];
        let mesh = TerrainMesh::finish(positions, faces);

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.faces[1].indices, [1, 2, 0]);
    }

    #[test]
    fn test_bounds() {
        let positions = vec![
            DVec3::new(-2.0, 0.0, 1.0),
            DVec3::new(3.0, 5.0, -4.0),
            DVec3::new(0.0, 1.0, 0.0),
        ];
        let mesh = TerrainMesh::finish(positions, vec![sea_face([0, 1, 2])]);
        assert_eq!(mesh.bounds.min, Vec3::new(-2.0, 0.0, -4.0));
        assert_eq!(mesh.bounds.max, Vec3::new(3.0, 5.0, 1.0));
        assert_eq!(mesh.bounds.size(), Vec3::new(5.0, 5.0, 5.0));
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = TerrainMesh::finish(Vec::new(), Vec::new());
        assert!(mesh.is_empty());
        assert!(mesh.bounds.is_empty());
        assert_eq!(mesh.bounds.size(), Vec3::ZERO);
        assert!(mesh.vertex_buffer().is_empty());
    }

    #[test]
    fn test_vertex_buffer_unshares_corners() {
        let positions = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(0.0, 0.0, -1.0),
            DVec3::new(-1.0, 0.0, -0.5),
            DVec3::new(-1.0, 0.0, 0.5),
        ];
        let red = Color::from_hex(0xff0000);
        let faces = vec![
            Face::new([0, 1, 2], Surface::Land, red),
            Face::new([0, 2, 3], Surface::Sea, Color::WHITE),
        ];
        let mesh = TerrainMesh::finish(positions, faces);
        let buffer = mesh.vertex_buffer();

        assert_eq!(buffer.len(), 6);
        assert_eq!(buffer[0].color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(buffer[3].color, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(buffer[0].position, buffer[3].position);
        assert_eq!(mesh.indices(), vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(mesh.count_faces(Surface::Land), 1);
    }
}
