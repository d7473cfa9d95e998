//! Configuration for the plane split operation.

use serde::{Deserialize, Serialize};
use split_kernel::Tolerance;

/// Controls which stages of the split pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Classification and degeneracy thresholds passed to the engine.
    pub tolerance: Tolerance,
    /// Cap each boundary loop with a new face.
    pub fill_loops: bool,
    /// Move each disconnected piece into its own mesh.
    pub separate_pieces: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::default(),
            fill_loops: true,
            separate_pieces: true,
        }
    }
}

impl SplitConfig {
    /// Cut and reconstruct the loops, but leave the mesh open and in one piece.
    pub fn cut_only() -> Self {
        Self {
            fill_loops: false,
            separate_pieces: false,
            ..Self::default()
        }
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }
}
