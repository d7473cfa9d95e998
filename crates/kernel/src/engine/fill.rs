use std::collections::HashMap;

use tracing::{debug, info};

use super::EngineError;
use crate::topology::mesh::{EdgeId, FaceId, PolyMesh, VertexId};

/// Cap a closed edge loop with one polygon.
///
/// The loop is wound so that it runs opposite to the face already on the
/// other side of its first edge, which keeps a cut piece consistently
/// oriented once capped.
pub(super) fn fill_loop(mesh: &mut PolyMesh, loop_edges: &[EdgeId]) -> Result<FaceId, EngineError> {
    if loop_edges.len() < 3 {
        return Err(EngineError::OpenLoop {
            reason: format!("a loop needs at least 3 edges, got {}", loop_edges.len()),
        });
    }

    let mut adjacency: HashMap<VertexId, Vec<VertexId>> = HashMap::new();
    for &e in loop_edges {
        let edge = mesh.edges.get(e).ok_or(EngineError::EdgeNotFound { edge: e })?;
        let (a, b) = edge.vertices;
        adjacency.entry(a).or_default().push(b);
        adjacency.entry(b).or_default().push(a);
    }
    if let Some((v, next)) = adjacency.iter().find(|(_, next)| next.len() != 2) {
        return Err(EngineError::OpenLoop {
            reason: format!("vertex {v:?} has {} loop edges", next.len()),
        });
    }

    let mut order = chain(mesh, loop_edges[0], &adjacency)?;
    if order.len() != loop_edges.len() {
        return Err(EngineError::OpenLoop {
            reason: format!(
                "edges form more than one cycle ({} of {} reached)",
                order.len(),
                loop_edges.len()
            ),
        });
    }

    let (a, b) = (order[0], order[1]);
    if mesh.faces.values().any(|face| face.has_directed_side(a, b)) {
        order.reverse();
        debug!("reversed loop to match neighbouring face");
    }

    let face = mesh.add_face(&order)?;
    info!(face = ?face, vertices = order.len(), "filled loop");
    Ok(face)
}

/// Walk the cycle containing `start`, returning its vertices in order.
fn chain(
    mesh: &PolyMesh,
    start: EdgeId,
    adjacency: &HashMap<VertexId, Vec<VertexId>>,
) -> Result<Vec<VertexId>, EngineError> {
    let (first, mut current) = mesh.edges[start].vertices;
    let mut order = vec![first];
    let mut previous = first;
    while current != first {
        if order.len() > adjacency.len() {
            return Err(EngineError::OpenLoop {
                reason: "walk did not return to its start".into(),
            });
        }
        order.push(current);
        let next = adjacency[&current]
            .iter()
            .copied()
            .find(|&w| w != previous)
            .unwrap_or(previous);
        previous = current;
        current = next;
    }
    Ok(order)
}
