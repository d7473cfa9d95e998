use serde::{Deserialize, Serialize};
use split_kernel::geometry::point::Point3d;
use split_kernel::geometry::vector::Vec3;
use split_kernel::topology::audit::MeshAudit;
use split_kernel::{EdgeId, EngineError, FaceId, PolyMesh, VertexId};

/// The plane derived from the single selected face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CuttingPlane {
    /// The selected face the plane was taken from.
    pub face: FaceId,
    /// Position of the face's first vertex.
    pub point: Point3d,
    /// Unit normal of the face.
    pub normal: Vec3,
}

/// One closed cycle of cut edges.
///
/// `edges[i]` joins `vertices[i]` and `vertices[(i + 1) % len]`, so both
/// vectors have the same length and the walk returns to `vertices[0]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundaryLoop {
    pub edges: Vec<EdgeId>,
    pub vertices: Vec<VertexId>,
}

impl BoundaryLoop {
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Complete result of a plane split.
#[derive(Debug, Clone)]
pub struct SplitOutcome {
    pub plane: CuttingPlane,
    /// The two boundary loops, in discovery order.
    pub loops: [BoundaryLoop; 2],
    /// Faces that cap the loops. Empty when filling is disabled.
    pub fill_faces: Vec<FaceId>,
    /// Pieces moved out of the mesh by separation. The piece holding the
    /// smallest vertex key stays in the input mesh and is not listed.
    pub pieces: Vec<PolyMesh>,
    pub diagnostics: Diagnostics,
}

/// Non-fatal diagnostics from an operation.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    /// Warning messages.
    pub warnings: Vec<String>,
    /// Manifold audit of each separated piece, in the order of `pieces`.
    pub piece_audits: Vec<MeshAudit>,
    /// Time spent in engine calls, in milliseconds.
    pub engine_time_ms: f64,
}

/// Errors from the plane split operation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SplitError {
    #[error("no face selected to use as the cutting plane")]
    NoPlaneSelected,

    #[error("{count} faces selected; select exactly one face as the cutting plane")]
    MultiplePlanesSelected { count: usize },

    #[error("selected face {face:?} has no usable normal")]
    DegeneratePlane { face: FaceId },

    #[error("loop starting at {start:?} broke at {at:?}, which has {degree} cut edges")]
    DegenerateLoop {
        start: VertexId,
        at: VertexId,
        degree: usize,
    },

    #[error("loop walk left the cut edges: {from:?} leads to {to:?}, which is not on the cut")]
    LeakedTraversal { from: VertexId, to: VertexId },

    #[error("expected 2 boundary loops, found {found} starting at {starts:?}")]
    UnexpectedLoopCount { found: usize, starts: Vec<VertexId> },

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
}
