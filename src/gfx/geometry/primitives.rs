//! # Primitive Shape Generation
//!
//! Functions to generate common 3D primitive shapes. All shapes are
//! generated with unit normals and texture coordinates, Y-up.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate a unit cube centered at the origin
///
/// Returns a cube with vertices from -0.5 to 0.5 on all axes. Each face has
/// normals pointing outward and UV coordinates from 0 to 1.
pub fn generate_cube() -> GeometryData {
    let mut data = GeometryData::new();

    let positions = [
        // Front face
        [-0.5, -0.5,  0.5], [ 0.5, -0.5,  0.5], [ 0.5,  0.5,  0.5], [-0.5,  0.5,  0.5],
        // Back face
        [-0.5, -0.5, -0.5], [-0.5,  0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5, -0.5, -0.5],
        // Left face
        [-0.5, -0.5, -0.5], [-0.5, -0.5,  0.5], [-0.5,  0.5,  0.5], [-0.5,  0.5, -0.5],
        // Right face
        [ 0.5, -0.5,  0.5], [ 0.5, -0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5,  0.5,  0.5],
        // Top face
        [-0.5,  0.5,  0.5], [ 0.5,  0.5,  0.5], [ 0.5,  0.5, -0.5], [-0.5,  0.5, -0.5],
        // Bottom face
        [-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5], [ 0.5, -0.5,  0.5], [-0.5, -0.5,  0.5],
    ];

    let normals = [
        [ 0.0,  0.0,  1.0], [ 0.0,  0.0,  1.0], [ 0.0,  0.0,  1.0], [ 0.0,  0.0,  1.0],
        [ 0.0,  0.0, -1.0], [ 0.0,  0.0, -1.0], [ 0.0,  0.0, -1.0], [ 0.0,  0.0, -1.0],
        [-1.0,  0.0,  0.0], [-1.0,  0.0,  0.0], [-1.0,  0.0,  0.0], [-1.0,  0.0,  0.0],
        [ 1.0,  0.0,  0.0], [ 1.0,  0.0,  0.0], [ 1.0,  0.0,  0.0], [ 1.0,  0.0,  0.0],
        [ 0.0,  1.0,  0.0], [ 0.0,  1.0,  0.0], [ 0.0,  1.0,  0.0], [ 0.0,  1.0,  0.0],
        [ 0.0, -1.0,  0.0], [ 0.0, -1.0,  0.0], [ 0.0, -1.0,  0.0], [ 0.0, -1.0,  0.0],
    ];

    let tex_coords = [
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0],
        [1.0, 0.0], [0.0, 0.0], [0.0, 1.0], [1.0, 1.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
    ];

    data.positions = positions.to_vec();
    data.normals = normals.to_vec();
    data.tex_coords = tex_coords.to_vec();

    data.indices = vec![
        0, 1, 2,    2, 3, 0,
        4, 5, 6,    6, 7, 4,
        8, 9, 10,   10, 11, 8,
        12, 13, 14, 14, 15, 12,
        16, 17, 18, 18, 19, 16,
        20, 21, 22, 22, 23, 20,
    ];

    data
}

/// Generate a UV sphere of radius 1.0 centered at the origin
///
/// # Arguments
/// * `longitude_segments` - Number of vertical segments
/// * `latitude_segments` - Number of horizontal segments
pub fn generate_sphere(longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32;
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32;

            let x = sin_theta * phi.cos();
            let y = cos_theta;
            let z = sin_theta * phi.sin();

            data.positions.push([x, y, z]);
            data.normals.push([x, y, z]);
            data.tex_coords.push([
                long as f32 / long_segs as f32,
                lat as f32 / lat_segs as f32,
            ]);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices.push(first);
            data.indices.push(second);
            data.indices.push(first + 1);

            data.indices.push(second);
            data.indices.push(second + 1);
            data.indices.push(first + 1);
        }
    }

    data
}

/// Generate a plane in the XZ plane with the normal pointing up (+Y)
///
/// # Arguments
/// * `width` - Extent along X
/// * `depth` - Extent along Z
/// * `width_segments` / `depth_segments` - Subdivision counts
pub fn generate_plane(
    width: f32,
    depth: f32,
    width_segments: u32,
    depth_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let w_segs = width_segments.max(1);
    let d_segs = depth_segments.max(1);

    for z in 0..=d_segs {
        let v = z as f32 / d_segs as f32;
        let pos_z = (v - 0.5) * depth;

        for x in 0..=w_segs {
            let u = x as f32 / w_segs as f32;
            let pos_x = (u - 0.5) * width;

            data.positions.push([pos_x, 0.0, pos_z]);
            data.normals.push([0.0, 1.0, 0.0]);
            data.tex_coords.push([u, v]);
        }
    }

    for z in 0..d_segs {
        for x in 0..w_segs {
            let i = z * (w_segs + 1) + x;
            let next_row = i + w_segs + 1;

            // Counter-clockwise when viewed from above (+Y)
            data.indices.push(i);
            data.indices.push(i + 1);
            data.indices.push(next_row);

            data.indices.push(i + 1);
            data.indices.push(next_row + 1);
            data.indices.push(next_row);
        }
    }

    data
}

/// Generate a torus lying in the XZ plane
///
/// # Arguments
/// * `radius` - Distance from the center of the torus to the tube center
/// * `tube_radius` - Radius of the tube cross-section
/// * `radial_segments` - Segments around the main ring
/// * `tubular_segments` - Segments around the tube
pub fn generate_torus(
    radius: f32,
    tube_radius: f32,
    radial_segments: u32,
    tubular_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let radial = radial_segments.max(3);
    let tubular = tubular_segments.max(3);

    for j in 0..=radial {
        let u = j as f32 / radial as f32 * 2.0 * PI;
        let ring_center = [radius * u.cos(), 0.0, radius * u.sin()];

        for i in 0..=tubular {
            let v = i as f32 / tubular as f32 * 2.0 * PI;

            let x = (radius + tube_radius * v.cos()) * u.cos();
            let y = tube_radius * v.sin();
            let z = (radius + tube_radius * v.cos()) * u.sin();

            data.positions.push([x, y, z]);

            let normal = [
                x - ring_center[0],
                y - ring_center[1],
                z - ring_center[2],
            ];
            let len = (normal[0] * normal[0] + normal[1] * normal[1] + normal[2] * normal[2])
                .sqrt()
                .max(f32::EPSILON);
            data.normals
                .push([normal[0] / len, normal[1] / len, normal[2] / len]);
            data.tex_coords
                .push([j as f32 / radial as f32, i as f32 / tubular as f32]);
        }
    }

    for j in 0..radial {
        for i in 0..tubular {
            let a = j * (tubular + 1) + i;
            let b = a + tubular + 1;

            data.indices.push(a);
            data.indices.push(b);
            data.indices.push(a + 1);

            data.indices.push(b);
            data.indices.push(b + 1);
            data.indices.push(a + 1);
        }
    }

    data
}

/// Generate a (p, q) torus knot
///
/// The knot curve winds `p` times around the torus axis and `q` times
/// through its hole; a circular tube is swept along the curve using a
/// finite-difference frame.
///
/// # Arguments
/// * `radius` - Overall radius of the knot curve
/// * `tube_radius` - Radius of the swept tube
/// * `tubular_segments` - Segments along the curve
/// * `radial_segments` - Segments around the tube
/// * `p`, `q` - Winding counts; (2, 3) gives the classic trefoil-like knot
pub fn generate_torus_knot(
    radius: f32,
    tube_radius: f32,
    tubular_segments: u32,
    radial_segments: u32,
    p: u32,
    q: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let tubular = tubular_segments.max(3);
    let radial = radial_segments.max(3);
    let p = p.max(1) as f32;
    let q = q.max(1) as f32;

    let curve_point = |u: f32| -> [f32; 3] {
        let qu_over_p = q / p * u;
        let cs = qu_over_p.cos();
        [
            radius * (2.0 + cs) * 0.5 * u.cos(),
            radius * (2.0 + cs) * 0.5 * u.sin(),
            radius * qu_over_p.sin() * 0.5,
        ]
    };

    for i in 0..=tubular {
        let u = i as f32 / tubular as f32 * p * 2.0 * PI;

        let p1 = curve_point(u);
        let p2 = curve_point(u + 0.01);

        // Frame from the curve tangent and the bisector of adjacent points
        let tangent = sub(p2, p1);
        let bitangent_seed = add(p2, p1);
        let binormal = normalize(cross(tangent, bitangent_seed));
        let normal_axis = normalize(cross(binormal, tangent));

        for j in 0..=radial {
            let v = j as f32 / radial as f32 * 2.0 * PI;
            let cx = -tube_radius * v.cos();
            let cy = tube_radius * v.sin();

            let position = [
                p1[0] + cx * normal_axis[0] + cy * binormal[0],
                p1[1] + cx * normal_axis[1] + cy * binormal[1],
                p1[2] + cx * normal_axis[2] + cy * binormal[2],
            ];

            data.positions.push(position);
            data.normals.push(normalize(sub(position, p1)));
            data.tex_coords
                .push([i as f32 / tubular as f32, j as f32 / radial as f32]);
        }
    }

    for i in 0..tubular {
        for j in 0..radial {
            let a = i * (radial + 1) + j;
            let b = a + radial + 1;

            data.indices.push(a);
            data.indices.push(b);
            data.indices.push(a + 1);

            data.indices.push(b);
            data.indices.push(b + 1);
            data.indices.push(a + 1);
        }
    }

    data
}

fn add(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt().max(f32::EPSILON);
    [v[0] / len, v[1] / len, v[2] / len]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_unit_normals(data: &GeometryData) {
        for normal in &data.normals {
            let len =
                (normal[0] * normal[0] + normal[1] * normal[1] + normal[2] * normal[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-3, "normal not unit length: {:?}", normal);
        }
    }

    #[test]
    fn test_cube_generation() {
        let cube = generate_cube();
        assert_eq!(cube.positions.len(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
        assert_unit_normals(&cube);
    }

    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(8, 6);
        assert!(!sphere.positions.is_empty());
        assert!(!sphere.indices.is_empty());
        assert_eq!(sphere.positions.len(), sphere.normals.len());
        assert_eq!(sphere.positions.len(), sphere.tex_coords.len());
        assert_unit_normals(&sphere);
    }

    #[test]
    fn test_plane_generation() {
        let plane = generate_plane(2.0, 2.0, 2, 2);
        assert_eq!(plane.positions.len(), 9); // 3x3 grid
        assert_eq!(plane.indices.len(), 24); // 4 quads * 2 triangles * 3 indices
        for position in &plane.positions {
            assert_eq!(position[1], 0.0);
        }
    }

    #[test]
    fn test_torus_generation() {
        let torus = generate_torus(1.0, 0.4, 12, 8);
        assert_eq!(torus.positions.len(), 13 * 9);
        assert_eq!(torus.indices.len() as u32, 12 * 8 * 6);
        assert_unit_normals(&torus);
    }

    #[test]
    fn test_torus_knot_generation() {
        let knot = generate_torus_knot(1.0, 0.4, 100, 16, 2, 3);
        assert_eq!(knot.positions.len(), 101 * 17);
        assert_eq!(knot.indices.len() as u32, 100 * 16 * 6);
        assert_eq!(knot.positions.len(), knot.normals.len());
        assert_unit_normals(&knot);
    }

    #[test]
    fn test_torus_knot_stays_within_radius() {
        let knot = generate_torus_knot(1.0, 0.1, 64, 8, 2, 3);
        for position in &knot.positions {
            let d = (position[0] * position[0]
                + position[1] * position[1]
                + position[2] * position[2])
                .sqrt();
            // Curve radius tops out at 1.5 * radius, plus the tube
            assert!(d <= 1.5 + 0.1 + 1e-3);
        }
    }
}
