//! Boundary loop reconstruction.
//!
//! The engine hands back the cut as an unordered set of edges. Each side of
//! a clean cut is a simple cycle in which every vertex touches exactly two
//! cut edges, so the cycles can be recovered by walking from any unvisited
//! vertex, always leaving through the edge that was not just arrived on.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, instrument};

use split_kernel::{EdgeId, EngineError, MeshIntrospect, VertexId};

use crate::types::{BoundaryLoop, SplitError};

/// A cut edge with its endpoints resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutEdge {
    pub id: EdgeId,
    pub a: VertexId,
    pub b: VertexId,
}

impl CutEdge {
    /// The endpoint opposite `v`. For a vertex not on the edge this is `a`.
    fn far(&self, v: VertexId) -> VertexId {
        if self.a == v { self.b } else { self.a }
    }
}

/// Look up the endpoints of each edge.
pub fn resolve_cut_edges(mesh: &dyn MeshIntrospect, edges: &[EdgeId]) -> Result<Vec<CutEdge>, SplitError> {
    edges
        .iter()
        .map(|&id| {
            let (a, b) = mesh
                .edge_vertices(id)
                .ok_or(EngineError::EdgeNotFound { edge: id })?;
            Ok(CutEdge { id, a, b })
        })
        .collect()
}

/// Vertex → incident cut edges, iterated in vertex key order.
#[derive(Debug, Clone, Default)]
pub struct VertexEdgeIndex {
    incident: BTreeMap<VertexId, Vec<CutEdge>>,
}

impl VertexEdgeIndex {
    pub fn build(edges: &[CutEdge]) -> Self {
        let mut incident: BTreeMap<VertexId, Vec<CutEdge>> = BTreeMap::new();
        for &edge in edges {
            incident.entry(edge.a).or_default().push(edge);
            incident.entry(edge.b).or_default().push(edge);
        }
        Self { incident }
    }

    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.incident.keys().copied()
    }

    pub fn edges_at(&self, v: VertexId) -> Option<&[CutEdge]> {
        self.incident.get(&v).map(Vec::as_slice)
    }

    pub fn degree(&self, v: VertexId) -> usize {
        self.edges_at(v).map_or(0, <[CutEdge]>::len)
    }

    pub fn is_empty(&self) -> bool {
        self.incident.is_empty()
    }
}

#[derive(Debug)]
enum WalkState {
    Seeking,
    Walking {
        current: VertexId,
        previous: Option<VertexId>,
    },
    Closed,
    Abandoned(SplitError),
}

/// Recover the two boundary loops from a disjoint set of cut edges.
///
/// Fails on the first vertex that does not have exactly two cut edges, and
/// when the edges do not form exactly two cycles. Nothing is returned on
/// failure.
#[instrument(skip(edges), fields(edges = edges.len()))]
pub fn reconstruct_loops(edges: &[CutEdge]) -> Result<[BoundaryLoop; 2], SplitError> {
    let index = VertexEdgeIndex::build(edges);
    let loops = walk_all(&index)?;
    let loops: [BoundaryLoop; 2] = loops.try_into().map_err(|loops: Vec<BoundaryLoop>| {
        SplitError::UnexpectedLoopCount {
            found: loops.len(),
            starts: loops.iter().filter_map(|l| l.vertices.first().copied()).collect(),
        }
    })?;
    info!(first = loops[0].len(), second = loops[1].len(), "boundary loops reconstructed");
    Ok(loops)
}

fn walk_all(index: &VertexEdgeIndex) -> Result<Vec<BoundaryLoop>, SplitError> {
    let mut visited = BTreeSet::new();
    let mut loops = Vec::new();
    for v in index.vertices() {
        if visited.contains(&v) {
            continue;
        }
        let boundary = walk_loop(index, v, &mut visited)?;
        debug!(start = ?v, edges = boundary.len(), "closed loop");
        loops.push(boundary);
    }
    Ok(loops)
}

fn walk_loop(
    index: &VertexEdgeIndex,
    start: VertexId,
    visited: &mut BTreeSet<VertexId>,
) -> Result<BoundaryLoop, SplitError> {
    let mut boundary = BoundaryLoop::default();
    let mut state = WalkState::Seeking;
    loop {
        state = match state {
            WalkState::Seeking => {
                visited.insert(start);
                boundary.vertices.push(start);
                WalkState::Walking {
                    current: start,
                    previous: None,
                }
            }
            WalkState::Walking { current, previous } => step(index, start, current, previous, visited, &mut boundary),
            WalkState::Closed => return Ok(boundary),
            WalkState::Abandoned(err) => return Err(err),
        };
    }
}

/// Leave `current` through its one edge not leading back to `previous`.
fn step(
    index: &VertexEdgeIndex,
    start: VertexId,
    current: VertexId,
    previous: Option<VertexId>,
    visited: &mut BTreeSet<VertexId>,
    boundary: &mut BoundaryLoop,
) -> WalkState {
    let candidates = index.edges_at(current).unwrap_or_default();
    if candidates.len() != 2 {
        return WalkState::Abandoned(SplitError::DegenerateLoop {
            start,
            at: current,
            degree: candidates.len(),
        });
    }
    let exit = candidates.iter().find(|edge| {
        let far = edge.far(current);
        far != current && Some(far) != previous
    });
    let Some(exit) = exit else {
        return WalkState::Abandoned(SplitError::DegenerateLoop {
            start,
            at: current,
            degree: candidates.len(),
        });
    };

    boundary.edges.push(exit.id);
    let far = exit.far(current);
    if far == start {
        return WalkState::Closed;
    }
    if index.edges_at(far).is_none() {
        return WalkState::Abandoned(SplitError::LeakedTraversal { from: current, to: far });
    }
    if !visited.insert(far) {
        return WalkState::Abandoned(SplitError::DegenerateLoop {
            start,
            at: far,
            degree: index.degree(far),
        });
    }
    boundary.vertices.push(far);
    WalkState::Walking {
        current: far,
        previous: Some(current),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use split_kernel::PolyMesh;
    use split_kernel::geometry::point::Point3d;

    /// Wire polygon with `n` vertices; returns its edges in order.
    fn wire_polygon(mesh: &mut PolyMesh, n: usize, z: f64) -> Vec<CutEdge> {
        let vertices: Vec<VertexId> = (0..n)
            .map(|i| {
                let angle = i as f64 * std::f64::consts::TAU / n as f64;
                mesh.add_vertex(Point3d::new(angle.cos(), angle.sin(), z))
            })
            .collect();
        (0..n)
            .map(|i| {
                let (a, b) = (vertices[i], vertices[(i + 1) % n]);
                CutEdge {
                    id: mesh.ensure_edge(a, b),
                    a,
                    b,
                }
            })
            .collect()
    }

    #[test]
    fn test_single_cycle_is_not_enough() {
        let mut mesh = PolyMesh::new();
        let edges = wire_polygon(&mut mesh, 5, 0.0);
        assert_eq!(
            reconstruct_loops(&edges),
            Err(SplitError::UnexpectedLoopCount {
                found: 1,
                starts: vec![edges[0].a]
            })
        );
    }

    #[test]
    fn test_empty_cut() {
        assert_eq!(
            reconstruct_loops(&[]),
            Err(SplitError::UnexpectedLoopCount {
                found: 0,
                starts: vec![]
            })
        );
    }

    #[test]
    fn test_loop_vertices_follow_edges() {
        let mut mesh = PolyMesh::new();
        let mut edges = wire_polygon(&mut mesh, 3, 0.0);
        edges.extend(wire_polygon(&mut mesh, 6, 1.0));

        let loops = reconstruct_loops(&edges).unwrap();

        for boundary in &loops {
            assert_eq!(boundary.vertices.len(), boundary.edges.len());
            let n = boundary.len();
            for i in 0..n {
                let edge = edges.iter().find(|e| e.id == boundary.edges[i]).unwrap();
                let (u, w) = (boundary.vertices[i], boundary.vertices[(i + 1) % n]);
                assert!((edge.a == u && edge.b == w) || (edge.a == w && edge.b == u));
            }
        }
    }

    #[test]
    fn test_branch_vertex_is_degenerate() {
        // Two triangles sharing one vertex: a figure eight.
        let mut mesh = PolyMesh::new();
        let hub = mesh.add_vertex(Point3d::ORIGIN);
        let others: Vec<VertexId> = (1..=4)
            .map(|i| mesh.add_vertex(Point3d::new(i as f64, 1.0, 0.0)))
            .collect();
        let pairs = [
            (hub, others[0]),
            (others[0], others[1]),
            (others[1], hub),
            (hub, others[2]),
            (others[2], others[3]),
            (others[3], hub),
        ];
        let edges: Vec<CutEdge> = pairs
            .iter()
            .map(|&(a, b)| CutEdge {
                id: mesh.ensure_edge(a, b),
                a,
                b,
            })
            .collect();

        let err = reconstruct_loops(&edges).unwrap_err();
        assert_eq!(
            err,
            SplitError::DegenerateLoop {
                start: hub,
                at: hub,
                degree: 4
            }
        );
    }

    #[test]
    fn test_far_vertex_missing_from_index_leaks() {
        let mut mesh = PolyMesh::new();
        let edges = wire_polygon(&mut mesh, 4, 0.0);
        let mut index = VertexEdgeIndex::build(&edges);
        // Drop the vertex the walk reaches first.
        let start = index.vertices().next().unwrap();
        let first_far = index.edges_at(start).unwrap()[0].far(start);
        index.incident.remove(&first_far);

        let mut visited = BTreeSet::new();
        let err = walk_loop(&index, start, &mut visited).unwrap_err();
        assert_eq!(
            err,
            SplitError::LeakedTraversal {
                from: start,
                to: first_far
            }
        );
    }

    #[test]
    fn test_index_degree() {
        let mut mesh = PolyMesh::new();
        let edges = wire_polygon(&mut mesh, 4, 0.0);
        let index = VertexEdgeIndex::build(&edges[..3]);
        let degrees: Vec<usize> = index.vertices().map(|v| index.degree(v)).collect();
        assert_eq!(degrees.iter().filter(|&&d| d == 1).count(), 2);
        assert_eq!(degrees.iter().filter(|&&d| d == 2).count(), 2);
    }
}
