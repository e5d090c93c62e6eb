//! Flat-shaded meshes for the fragments, the intact core and the ground.

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
}

fn push_triangle(out: &mut Vec<Vertex>, a: glam::Vec3, b: glam::Vec3, c: glam::Vec3) {
    let normal = (b - a).cross(c - a).normalize_or_zero().to_array();
    for p in [a, b, c] {
        out.push(Vertex {
            pos: p.to_array(),
            normal,
        });
    }
}

/// Axis-aligned cube with edge length `size`, as a triangle list.
pub fn cube(size: f32) -> Vec<Vertex> {
    use glam::Vec3;
    let h = size / 2.0;
    // (normal axis, u axis, v axis) per face; u x v points along the normal
    let faces = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];
    let mut out = Vec::with_capacity(36);
    for (n, u, v) in faces {
        let c = n * h;
        let p00 = c - u * h - v * h;
        let p10 = c + u * h - v * h;
        let p11 = c + u * h + v * h;
        let p01 = c - u * h + v * h;
        push_triangle(&mut out, p00, p10, p11);
        push_triangle(&mut out, p00, p11, p01);
    }
    out
}

/// Square in the XZ plane with edge length `size`, facing +Y.
pub fn plane(size: f32) -> Vec<Vertex> {
    use glam::Vec3;
    let h = size / 2.0;
    let a = Vec3::new(-h, 0.0, -h);
    let b = Vec3::new(-h, 0.0, h);
    let c = Vec3::new(h, 0.0, h);
    let d = Vec3::new(h, 0.0, -h);
    let mut out = Vec::with_capacity(6);
    push_triangle(&mut out, a, b, c);
    push_triangle(&mut out, a, c, d);
    out
}

/// Regular icosahedron with circumradius `radius`, as a triangle list.
pub fn icosahedron(radius: f32) -> Vec<Vertex> {
    use glam::Vec3;
    let phi = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let verts = [
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
    .map(|v| v.normalize() * radius);
    const FACES: [[usize; 3]; 20] = [
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
    let mut out = Vec::with_capacity(FACES.len() * 3);
    for [a, b, c] in FACES {
        push_triangle(&mut out, verts[a], verts[b], verts[c]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_normals_point_outward() {
        for tri in cube(1.0).chunks(3) {
            let centroid = tri
                .iter()
                .map(|v| glam::Vec3::from(v.pos))
                .sum::<glam::Vec3>()
                / 3.0;
            let n = glam::Vec3::from(tri[0].normal);
            assert!(n.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn icosahedron_normals_point_outward() {
        let mesh = icosahedron(1.4);
        assert_eq!(mesh.len(), 60);
        for tri in mesh.chunks(3) {
            let centroid = tri
                .iter()
                .map(|v| glam::Vec3::from(v.pos))
                .sum::<glam::Vec3>()
                / 3.0;
            assert!(glam::Vec3::from(tri[0].normal).dot(centroid) > 0.0);
        }
    }

    #[test]
    fn plane_faces_up_and_spans_ground_size() {
        let mesh = plane(shatter_core::GROUND_SIZE);
        assert_eq!(mesh.len(), 6);
        for v in &mesh {
            assert_eq!(v.normal, [0.0, 1.0, 0.0]);
            assert_eq!(v.pos[1], 0.0);
            assert_eq!(v.pos[0].abs(), 16.0);
            assert_eq!(v.pos[2].abs(), 16.0);
        }
    }
}
