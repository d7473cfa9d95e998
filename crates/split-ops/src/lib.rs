//! Plane split operation over a pluggable mesh engine.
//!
//! A single selected face defines the cutting plane. The engine bisects the
//! mesh against it, the cut edges are reassembled into two boundary loops,
//! and each loop is capped before the mesh is separated into pieces.

pub mod bundle;
pub mod config;
pub mod loops;
pub mod operator;
pub mod plane;
pub mod repel;
pub mod split;
pub mod types;

pub use bundle::MeshBundle;
pub use config::SplitConfig;
pub use loops::{reconstruct_loops, resolve_cut_edges, CutEdge, VertexEdgeIndex};
pub use operator::{run_repel_operator, run_split_operator, OperatorReport, OperatorStatus, ReportLevel};
pub use plane::select_cutting_plane;
pub use repel::{execute_repel, RepelError, RepelOutcome, SceneObject};
pub use split::execute_split;
pub use types::*;
