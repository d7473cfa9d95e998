use tracing::{debug, instrument};

use super::mesh::{EdgeId, PolyMesh};

/// Result of a manifold consistency check.
#[derive(Debug, Clone)]
pub struct MeshAudit {
    /// Edges bordered by exactly one face.
    pub boundary_edges: Vec<EdgeId>,
    /// Edges bordered by more than two faces.
    pub non_manifold_edges: Vec<EdgeId>,
    /// Edges bordered by no face.
    pub wire_edges: Vec<EdgeId>,
    /// Number of pieces connected through edges.
    pub components: usize,
    /// V - E + F over the whole mesh.
    pub euler_characteristic: i64,
}

impl MeshAudit {
    /// Every edge has exactly two faces.
    pub fn is_closed_manifold(&self) -> bool {
        self.boundary_edges.is_empty() && self.non_manifold_edges.is_empty() && self.wire_edges.is_empty()
    }
}

#[instrument(skip(mesh))]
pub fn audit_mesh(mesh: &PolyMesh) -> MeshAudit {
    let edge_faces = mesh.edge_face_map();
    let mut boundary_edges = Vec::new();
    let mut non_manifold_edges = Vec::new();
    let mut wire_edges = Vec::new();

    for e in mesh.edges.keys() {
        match edge_faces.get(&e).map_or(0, Vec::len) {
            0 => wire_edges.push(e),
            1 => boundary_edges.push(e),
            2 => {}
            _ => non_manifold_edges.push(e),
        }
    }

    let euler_characteristic =
        mesh.vertices.len() as i64 - mesh.edges.len() as i64 + mesh.faces.len() as i64;
    let components = mesh.connected_components().len();

    debug!(
        boundary = boundary_edges.len(),
        non_manifold = non_manifold_edges.len(),
        wire = wire_edges.len(),
        components,
        euler_characteristic,
        "mesh audit complete"
    );

    MeshAudit {
        boundary_edges,
        non_manifold_edges,
        wire_edges,
        components,
        euler_characteristic,
    }
}
