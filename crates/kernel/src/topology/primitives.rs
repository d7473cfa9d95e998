use tracing::{info, instrument};

use super::mesh::{FaceId, PolyMesh, VertexId};
use crate::engine::EngineError;
use crate::geometry::plane::polygon_normal;
use crate::geometry::point::Point3d;
use crate::geometry::vector::Vec3;

/// Build an axis-aligned box with outward-facing quads.
/// Returns the faces in the order bottom, top, front, back, left, right.
#[instrument(skip(mesh))]
pub fn make_box(mesh: &mut PolyMesh, min: Point3d, max: Point3d) -> Result<[FaceId; 6], EngineError> {
    info!(min = ?min.to_array(), max = ?max.to_array(), "creating box primitive");
    let (x0, y0, z0) = (min.x, min.y, min.z);
    let (x1, y1, z1) = (max.x, max.y, max.z);
    let corners = [
        Point3d::new(x0, y0, z0), // 0
        Point3d::new(x1, y0, z0), // 1
        Point3d::new(x1, y1, z0), // 2
        Point3d::new(x0, y1, z0), // 3
        Point3d::new(x0, y0, z1), // 4
        Point3d::new(x1, y0, z1), // 5
        Point3d::new(x1, y1, z1), // 6
        Point3d::new(x0, y1, z1), // 7
    ];
    let v: Vec<VertexId> = corners.iter().map(|p| mesh.add_vertex(*p)).collect();

    // Counter-clockwise when seen from outside.
    let face_defs: [[usize; 4]; 6] = [
        [0, 3, 2, 1], // bottom (-Z)
        [4, 5, 6, 7], // top    (+Z)
        [0, 1, 5, 4], // front  (-Y)
        [3, 7, 6, 2], // back   (+Y)
        [0, 4, 7, 3], // left   (-X)
        [1, 2, 6, 5], // right  (+X)
    ];

    let mut faces = [FaceId::default(); 6];
    for (slot, def) in faces.iter_mut().zip(face_defs.iter()) {
        *slot = mesh.add_face(&def.map(|i| v[i]))?;
    }
    Ok(faces)
}

/// Build a closed prism by sweeping `profile` along `offset`.
///
/// The profile may be wound either way; it is reoriented so the cap faces
/// point away from the prism.
#[instrument(skip(mesh, profile))]
pub fn make_prism(mesh: &mut PolyMesh, profile: &[Point3d], offset: Vec3) -> Result<Vec<FaceId>, EngineError> {
    let n = profile.len();
    if n < 3 {
        return Err(EngineError::InvalidFace {
            reason: format!("prism profile needs at least 3 points, got {n}"),
        });
    }
    info!(sides = n, offset = ?offset.to_array(), "creating prism primitive");

    let mut points = profile.to_vec();
    if polygon_normal(&points).dot(&offset) < 0.0 {
        points.reverse();
    }

    let bottom: Vec<VertexId> = points.iter().map(|p| mesh.add_vertex(*p)).collect();
    let top: Vec<VertexId> = points.iter().map(|p| mesh.add_vertex(*p + offset)).collect();

    let mut faces = Vec::with_capacity(n + 2);
    let reversed: Vec<VertexId> = bottom.iter().rev().copied().collect();
    faces.push(mesh.add_face(&reversed)?);
    faces.push(mesh.add_face(&top)?);
    for i in 0..n {
        let j = (i + 1) % n;
        faces.push(mesh.add_face(&[bottom[i], bottom[j], top[j], top[i]])?);
    }
    Ok(faces)
}

/// Add a loose quad, typically used as a cutting face.
pub fn make_quad(mesh: &mut PolyMesh, corners: [Point3d; 4]) -> Result<FaceId, EngineError> {
    let v = corners.map(|p| mesh.add_vertex(p));
    mesh.add_face(&v)
}

/// A square quad of half-width `half_size` centered on `center`, lying in the
/// plane with normal `normal` and wound counter-clockwise around it.
pub fn make_plane_quad(
    mesh: &mut PolyMesh,
    center: Point3d,
    normal: Vec3,
    half_size: f64,
) -> Result<FaceId, EngineError> {
    let n = normal.normalized().ok_or_else(|| EngineError::InvalidFace {
        reason: "plane quad normal has zero length".into(),
    })?;
    let helper = if n.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
    let u = helper.cross(&n).normalized().unwrap_or(Vec3::Y) * half_size;
    let w = n.cross(&u);
    make_quad(
        mesh,
        [
            center - u - w,
            center + u - w,
            center + u + w,
            center - u + w,
        ],
    )
}
