pub mod engine;
pub mod geometry;
pub mod topology;

// Re-export the engine seam at crate root for convenience.
pub use engine::{CutGeometry, EngineError, MeshEngine, MeshIntrospect};
pub use topology::mesh::{EdgeId, FaceId, PolyMesh, VertexId};

use serde::{Deserialize, Serialize};

/// Tolerance configuration for geometric comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    /// Points closer than this are coincident, and vertices closer than this
    /// to a cutting plane are classified as lying on it.
    pub coincidence: f64,
    /// Vectors shorter than this are treated as having no direction.
    pub angular: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            coincidence: 1e-7,
            angular: 1e-10,
        }
    }
}
