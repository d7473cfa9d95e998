use tracing::{debug, info};

use crate::topology::mesh::PolyMesh;

/// Split `mesh` into its connected pieces. The piece holding the smallest
/// vertex key stays in `mesh`; every other piece is moved out and returned
/// in component order.
pub(super) fn separate_mesh(mesh: &mut PolyMesh) -> Vec<PolyMesh> {
    let components = mesh.connected_components();
    let pieces: Vec<PolyMesh> = components
        .iter()
        .skip(1)
        .map(|component| {
            debug!(
                vertices = component.vertices.len(),
                faces = component.faces.len(),
                "extracting loose piece"
            );
            mesh.extract_component(component)
        })
        .collect();
    info!(kept_faces = mesh.faces.len(), separated = pieces.len(), "separate complete");
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point::Point3d;
    use crate::topology::audit::audit_mesh;
    use crate::topology::primitives::make_box;

    #[test]
    fn test_single_piece_stays_put() {
        let mut mesh = PolyMesh::new();
        make_box(&mut mesh, Point3d::ORIGIN, Point3d::new(1.0, 1.0, 1.0)).unwrap();
        assert!(separate_mesh(&mut mesh).is_empty());
        assert_eq!(mesh.faces.len(), 6);
    }

    #[test]
    fn test_three_boxes_become_three_meshes() {
        let mut mesh = PolyMesh::new();
        for i in 0..3 {
            let x = 3.0 * i as f64;
            make_box(&mut mesh, Point3d::new(x, 0.0, 0.0), Point3d::new(x + 1.0, 1.0, 1.0)).unwrap();
        }

        let pieces = separate_mesh(&mut mesh);

        assert_eq!(pieces.len(), 2);
        assert_eq!(mesh.faces.len(), 6);
        assert_eq!(mesh.vertices.len(), 8);
        for piece in pieces.iter().chain(std::iter::once(&mesh)) {
            let audit = audit_mesh(piece);
            assert!(audit.is_closed_manifold());
            assert_eq!(audit.components, 1);
        }
        // Pieces keep their positions.
        assert!(pieces[0].bounding_box().min.x >= 3.0 - 1e-12);
    }

    #[test]
    fn test_empty_mesh() {
        let mut mesh = PolyMesh::new();
        assert!(separate_mesh(&mut mesh).is_empty());
    }
}
