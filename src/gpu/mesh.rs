//! Flat-shaded meshes for each group.
//!
//! Meshes are unindexed triangle lists with one face normal per vertex, so
//! every facet catches light on its own.

use crate::group::GroupKind;
use crate::gpu::shader::MeshVertex;
use glam::Vec3;

/// Mesh drawn for every instance of `kind`.
pub fn for_kind(kind: GroupKind) -> Vec<MeshVertex> {
    match kind {
        GroupKind::Foliage => octahedron(1.0),
        GroupKind::Ribbon => tetrahedron(1.0),
        GroupKind::Cubes => cube(1.0),
        GroupKind::Polyhedra => icosahedron(0.7),
        GroupKind::Centerpiece => star(1.0, 0.4, 0.2, 5),
    }
}

pub fn octahedron(radius: f32) -> Vec<MeshVertex> {
    let v = [
        Vec3::X,
        Vec3::NEG_X,
        Vec3::Y,
        Vec3::NEG_Y,
        Vec3::Z,
        Vec3::NEG_Z,
    ]
    .map(|p| p * radius);
    let faces = [
        [0, 2, 4],
        [4, 2, 1],
        [1, 2, 5],
        [5, 2, 0],
        [0, 4, 3],
        [4, 1, 3],
        [1, 5, 3],
        [5, 0, 3],
    ];
    build(&v, &faces)
}

pub fn tetrahedron(radius: f32) -> Vec<MeshVertex> {
    let v = [
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
    ]
    .map(|p| p.normalize() * radius);
    build(&v, &[[2, 1, 0], [0, 3, 2], [1, 3, 0], [2, 3, 1]])
}

/// Axis-aligned cube with edge length `size`.
pub fn cube(size: f32) -> Vec<MeshVertex> {
    let h = size * 0.5;
    let v: Vec<Vec3> = (0..8)
        .map(|i| {
            Vec3::new(
                if i & 1 == 0 { -h } else { h },
                if i & 2 == 0 { -h } else { h },
                if i & 4 == 0 { -h } else { h },
            )
        })
        .collect();
    let faces = [
        [0, 2, 3],
        [0, 3, 1],
        [4, 5, 7],
        [4, 7, 6],
        [0, 1, 5],
        [0, 5, 4],
        [2, 6, 7],
        [2, 7, 3],
        [0, 4, 6],
        [0, 6, 2],
        [1, 3, 7],
        [1, 7, 5],
    ];
    build(&v, &faces)
}

pub fn icosahedron(radius: f32) -> Vec<MeshVertex> {
    let phi = (1.0 + 5.0_f32.sqrt()) * 0.5;
    let v = [
        Vec3::new(-1.0, phi, 0.0),
        Vec3::new(1.0, phi, 0.0),
        Vec3::new(-1.0, -phi, 0.0),
        Vec3::new(1.0, -phi, 0.0),
        Vec3::new(0.0, -1.0, phi),
        Vec3::new(0.0, 1.0, phi),
        Vec3::new(0.0, -1.0, -phi),
        Vec3::new(0.0, 1.0, -phi),
        Vec3::new(phi, 0.0, -1.0),
        Vec3::new(phi, 0.0, 1.0),
        Vec3::new(-phi, 0.0, -1.0),
        Vec3::new(-phi, 0.0, 1.0),
    ]
    .map(|p| p.normalize() * radius);
    let faces = [
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];
    build(&v, &faces)
}

/// Extruded star in the XY plane with `points` tips, centered on the origin.
pub fn star(outer: f32, inner: f32, depth: f32, points: usize) -> Vec<MeshVertex> {
    let half = depth * 0.5;
    let rim: Vec<Vec3> = (0..points * 2)
        .map(|i| {
            // First tip points straight up.
            let angle = std::f32::consts::FRAC_PI_2 + i as f32 * std::f32::consts::PI / points as f32;
            let r = if i % 2 == 0 { outer } else { inner };
            Vec3::new(angle.cos() * r, angle.sin() * r, 0.0)
        })
        .collect();

    let front = Vec3::new(0.0, 0.0, half);
    let back = -front;
    let mut out = Vec::with_capacity(rim.len() * 12);
    for (i, &a) in rim.iter().enumerate() {
        let b = rim[(i + 1) % rim.len()];
        push_outward(&mut out, front, a + front, b + front);
        push_outward(&mut out, back, b + back, a + back);
        push_outward(&mut out, a + front, a + back, b + back);
        push_outward(&mut out, a + front, b + back, b + front);
    }
    out
}

fn build(vertices: &[Vec3], faces: &[[usize; 3]]) -> Vec<MeshVertex> {
    let mut out = Vec::with_capacity(faces.len() * 3);
    for f in faces {
        push_outward(&mut out, vertices[f[0]], vertices[f[1]], vertices[f[2]]);
    }
    out
}

/// Push one triangle, wound so its normal faces away from the origin.
///
/// Every mesh here is star-shaped around the origin, so that is outward.
fn push_outward(out: &mut Vec<MeshVertex>, a: Vec3, b: Vec3, c: Vec3) {
    let mut normal = (b - a).cross(c - a).normalize_or_zero();
    let (b, c) = if normal.dot(a + b + c) < 0.0 {
        normal = -normal;
        (c, b)
    } else {
        (b, c)
    };
    for p in [a, b, c] {
        out.push(MeshVertex {
            position: p.to_array(),
            normal: normal.to_array(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_outward(mesh: &[MeshVertex]) {
        assert_eq!(mesh.len() % 3, 0);
        for tri in mesh.chunks(3) {
            let n = Vec3::from_array(tri[0].normal);
            assert!((n.length() - 1.0).abs() < 1e-5);
            let centroid: Vec3 = tri.iter().map(|v| Vec3::from_array(v.position)).sum::<Vec3>() / 3.0;
            assert!(n.dot(centroid) > 0.0);

            // Winding matches the stored normal.
            let [a, b, c] = [0, 1, 2].map(|i| Vec3::from_array(tri[i].position));
            assert!((b - a).cross(c - a).dot(n) > 0.0);
        }
    }

    #[test]
    fn test_face_counts() {
        assert_eq!(octahedron(1.0).len(), 8 * 3);
        assert_eq!(tetrahedron(1.0).len(), 4 * 3);
        assert_eq!(cube(1.0).len(), 12 * 3);
        assert_eq!(icosahedron(1.0).len(), 20 * 3);
        assert_eq!(star(1.0, 0.4, 0.2, 5).len(), 10 * 4 * 3);
    }

    #[test]
    fn test_all_meshes_face_outward() {
        for kind in GroupKind::ALL {
            assert_outward(&for_kind(kind));
        }
    }

    #[test]
    fn test_icosahedron_radius() {
        for v in icosahedron(0.7) {
            assert!((Vec3::from_array(v.position).length() - 0.7).abs() < 1e-5);
        }
    }
}
