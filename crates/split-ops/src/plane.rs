use tracing::{debug, instrument, warn};

use split_kernel::{MeshIntrospect, Tolerance};

use crate::types::{CuttingPlane, SplitError};

/// Derive the cutting plane from the one selected face.
///
/// Reads the mesh only. The plane passes through the face's first vertex and
/// carries the face's unit normal, so repeated calls on an unchanged mesh
/// return the same plane.
#[instrument(skip(mesh, tolerance))]
pub fn select_cutting_plane(mesh: &dyn MeshIntrospect, tolerance: &Tolerance) -> Result<CuttingPlane, SplitError> {
    let selected = mesh.selected_faces();
    let face = match selected[..] {
        [] => return Err(SplitError::NoPlaneSelected),
        [face] => face,
        _ => {
            warn!(count = selected.len(), "more than one face selected");
            return Err(SplitError::MultiplePlanesSelected { count: selected.len() });
        }
    };

    let point = mesh
        .face_vertices(face)
        .first()
        .and_then(|&v| mesh.vertex_position(v))
        .ok_or(SplitError::DegeneratePlane { face })?;
    let normal = mesh
        .face_normal(face, tolerance)
        .ok_or(SplitError::DegeneratePlane { face })?;

    debug!(face = ?face, point = ?point.to_array(), normal = ?normal.to_array(), "cutting plane selected");
    Ok(CuttingPlane { face, point, normal })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use split_kernel::PolyMesh;
    use split_kernel::geometry::point::Point3d;
    use split_kernel::geometry::vector::Vec3;
    use split_kernel::topology::primitives::{make_box, make_plane_quad};

    #[test]
    fn test_plane_from_selected_quad() {
        let mut mesh = PolyMesh::new();
        let quad = make_plane_quad(&mut mesh, Point3d::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, 2.0), 1.0).unwrap();
        mesh.set_selected(quad, true);

        let plane = select_cutting_plane(&mesh, &Tolerance::default()).unwrap();

        assert_eq!(plane.face, quad);
        assert_eq!(plane.point, mesh.position(mesh.faces[quad].vertices[0]).unwrap());
        assert_relative_eq!(plane.normal.z, 1.0);
        assert_relative_eq!(plane.point.z, 3.0);
    }

    #[test]
    fn test_selected_box_face_points_outward() {
        let mut mesh = PolyMesh::new();
        let faces = make_box(&mut mesh, Point3d::ORIGIN, Point3d::new(1.0, 1.0, 1.0)).unwrap();
        mesh.set_selected(faces[4], true);

        let plane = select_cutting_plane(&mesh, &Tolerance::default()).unwrap();

        assert_relative_eq!(plane.normal.x, -1.0);
        assert_relative_eq!(plane.point.x, 0.0);
    }

    #[test]
    fn test_no_selection() {
        let mut mesh = PolyMesh::new();
        make_box(&mut mesh, Point3d::ORIGIN, Point3d::new(1.0, 1.0, 1.0)).unwrap();
        assert_eq!(
            select_cutting_plane(&mesh, &Tolerance::default()),
            Err(SplitError::NoPlaneSelected)
        );
    }

    #[test]
    fn test_collinear_face_is_degenerate() {
        let mut mesh = PolyMesh::new();
        let a = mesh.add_vertex(Point3d::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Point3d::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Point3d::new(2.0, 0.0, 0.0));
        let face = mesh.add_face(&[a, b, c]).unwrap();
        mesh.set_selected(face, true);

        assert_eq!(
            select_cutting_plane(&mesh, &Tolerance::default()),
            Err(SplitError::DegeneratePlane { face })
        );
    }
}
