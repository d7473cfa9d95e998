//! Mesh engine seam.
//!
//! `MeshIntrospect` is the read-only view the splitting pipeline needs;
//! `MeshEngine` holds the mutating capabilities (bisect, split, fill,
//! separate). `PolyMesh` implements both. Other backends or test doubles
//! can be swapped in by implementing the same pair.

mod bisect;
mod fill;
mod separate;
mod split;

use tracing::instrument;

use crate::geometry::point::Point3d;
use crate::geometry::vector::Vec3;
use crate::topology::mesh::{EdgeId, FaceId, PolyMesh, VertexId};
use crate::Tolerance;

/// Elements produced by a bisection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CutGeometry {
    /// Edges lying on the cutting plane with faces on both sides of it.
    pub cut_edges: Vec<EdgeId>,
    /// Vertices inserted where edges crossed the plane.
    pub new_vertices: Vec<VertexId>,
    /// Faces produced by splitting straddling faces.
    pub new_faces: Vec<FaceId>,
}

/// Errors from mesh engine operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("vertex not found: {vertex:?}")]
    VertexNotFound { vertex: VertexId },

    #[error("edge not found: {edge:?}")]
    EdgeNotFound { edge: EdgeId },

    #[error("invalid face: {reason}")]
    InvalidFace { reason: String },

    #[error("cutting plane normal has zero length")]
    DegenerateNormal,

    #[error("face {face:?} meets the cutting plane at {crossings} points; only simple two-point crossings can be bisected")]
    UnsupportedFace { face: FaceId, crossings: usize },

    #[error("edges do not form a single closed loop: {reason}")]
    OpenLoop { reason: String },
}

/// Read-only queries on the mesh.
pub trait MeshIntrospect {
    /// All faces currently flagged as selected.
    fn selected_faces(&self) -> Vec<FaceId>;

    /// The vertex cycle of a face. Empty if the face does not exist.
    fn face_vertices(&self, face: FaceId) -> Vec<VertexId>;

    /// Unit normal of a face, `None` if missing or degenerate.
    fn face_normal(&self, face: FaceId, tolerance: &Tolerance) -> Option<Vec3>;

    fn vertex_position(&self, vertex: VertexId) -> Option<Point3d>;

    fn edge_vertices(&self, edge: EdgeId) -> Option<(VertexId, VertexId)>;
}

/// Mutating mesh capabilities used by the splitting pipeline.
pub trait MeshEngine {
    /// Cut all geometry against the plane through `point` with `normal`.
    fn bisect(&mut self, point: Point3d, normal: Vec3, tolerance: &Tolerance) -> Result<CutGeometry, EngineError>;

    /// Duplicate vertices along `edges` so faces on either side no longer
    /// share them. Returns the edges now lying along the original ones.
    fn split_edges(&mut self, edges: &[EdgeId]) -> Result<Vec<EdgeId>, EngineError>;

    /// Cap a closed loop of edges with a new face.
    fn fill(&mut self, loop_edges: &[EdgeId]) -> Result<FaceId, EngineError>;

    /// Keep one connected piece and move every other piece into its own mesh.
    fn separate_by_looseness(&mut self) -> Result<Vec<PolyMesh>, EngineError>;
}

impl MeshIntrospect for PolyMesh {
    fn selected_faces(&self) -> Vec<FaceId> {
        PolyMesh::selected_faces(self)
    }

    fn face_vertices(&self, face: FaceId) -> Vec<VertexId> {
        self.faces
            .get(face)
            .map(|f| f.vertices.clone())
            .unwrap_or_default()
    }

    fn face_normal(&self, face: FaceId, tolerance: &Tolerance) -> Option<Vec3> {
        PolyMesh::face_normal(self, face, tolerance.angular)
    }

    fn vertex_position(&self, vertex: VertexId) -> Option<Point3d> {
        self.position(vertex)
    }

    fn edge_vertices(&self, edge: EdgeId) -> Option<(VertexId, VertexId)> {
        self.edges.get(edge).map(|e| e.vertices)
    }
}

impl MeshEngine for PolyMesh {
    #[instrument(skip(self))]
    fn bisect(&mut self, point: Point3d, normal: Vec3, tolerance: &Tolerance) -> Result<CutGeometry, EngineError> {
        bisect::bisect_mesh(self, point, normal, tolerance)
    }

    #[instrument(skip(self, edges), fields(edges = edges.len()))]
    fn split_edges(&mut self, edges: &[EdgeId]) -> Result<Vec<EdgeId>, EngineError> {
        split::split_mesh_edges(self, edges)
    }

    #[instrument(skip(self, loop_edges), fields(edges = loop_edges.len()))]
    fn fill(&mut self, loop_edges: &[EdgeId]) -> Result<FaceId, EngineError> {
        fill::fill_loop(self, loop_edges)
    }

    #[instrument(skip(self))]
    fn separate_by_looseness(&mut self) -> Result<Vec<PolyMesh>, EngineError> {
        Ok(separate::separate_mesh(self))
    }
}
