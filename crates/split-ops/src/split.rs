use std::time::Instant;

use tracing::{info, instrument, warn};

use split_kernel::topology::audit::audit_mesh;

use crate::bundle::MeshBundle;
use crate::config::SplitConfig;
use crate::loops::{reconstruct_loops, resolve_cut_edges};
use crate::plane::select_cutting_plane;
use crate::types::{Diagnostics, SplitError, SplitOutcome};

/// Execute a plane split.
///
/// 1. Take the cutting plane from the single selected face.
/// 2. Bisect the mesh against it and split the cut edges so each side has
///    its own vertices.
/// 3. Reconstruct the two boundary loops.
/// 4. Fill each loop, then separate the mesh into loose pieces.
///
/// Fails before touching the mesh if the selection is wrong. Once the mesh
/// has been cut, a reconstruction failure stops the pipeline before any fill;
/// undoing the cut is left to the caller.
#[instrument(skip(mb, config))]
pub fn execute_split(mb: &mut dyn MeshBundle, config: &SplitConfig) -> Result<SplitOutcome, SplitError> {
    let plane = select_cutting_plane(mb.as_introspect(), &config.tolerance)?;
    let mut diagnostics = Diagnostics::default();

    let started = Instant::now();
    let cut = mb.bisect(plane.point, plane.normal, &config.tolerance)?;
    let disjoint = mb.split_edges(&cut.cut_edges)?;
    diagnostics.engine_time_ms += elapsed_ms(started);

    let cut_edges = resolve_cut_edges(mb.as_introspect(), &disjoint)?;
    let loops = reconstruct_loops(&cut_edges)?;

    let started = Instant::now();
    let mut fill_faces = Vec::new();
    if config.fill_loops {
        for boundary in &loops {
            fill_faces.push(mb.fill(&boundary.edges)?);
        }
    }
    let pieces = if config.separate_pieces {
        mb.separate_by_looseness()?
    } else {
        Vec::new()
    };
    diagnostics.engine_time_ms += elapsed_ms(started);

    for (i, piece) in pieces.iter().enumerate() {
        let audit = audit_mesh(piece);
        if !audit.is_closed_manifold() {
            warn!(piece = i, boundary = audit.boundary_edges.len(), "separated piece is open");
            diagnostics.warnings.push(format!(
                "piece {i} is not closed: {} boundary, {} non-manifold, {} wire edges",
                audit.boundary_edges.len(),
                audit.non_manifold_edges.len(),
                audit.wire_edges.len()
            ));
        }
        diagnostics.piece_audits.push(audit);
    }

    info!(
        cut_edges = cut.cut_edges.len(),
        loop_edges = disjoint.len(),
        fill_faces = fill_faces.len(),
        pieces = pieces.len(),
        "split complete"
    );
    Ok(SplitOutcome {
        plane,
        loops,
        fill_faces,
        pieces,
        diagnostics,
    })
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
