use std::collections::HashMap;

use tracing::{debug, info, warn};

use super::{CutGeometry, EngineError};
use crate::geometry::plane::{side_of_distance, Plane, PlaneSide};
use crate::geometry::point::Point3d;
use crate::geometry::vector::Vec3;
use crate::topology::mesh::{EdgeId, FaceId, PolyMesh, VertexId};
use crate::Tolerance;

/// Cut every face of `mesh` against a plane.
///
/// 1. Classify vertices as front / back / on.
/// 2. Reject faces whose crossing is not a simple two-point chord, before
///    anything is modified.
/// 3. Insert a vertex on every edge whose endpoints straddle the plane.
/// 4. Split each straddling face along the chord between its two on-plane
///    vertices.
/// 5. Report on-plane edges that have faces on both sides as cut edges.
pub(super) fn bisect_mesh(
    mesh: &mut PolyMesh,
    point: Point3d,
    normal: Vec3,
    tolerance: &Tolerance,
) -> Result<CutGeometry, EngineError> {
    let plane = Plane::new(point, normal, tolerance.angular).ok_or(EngineError::DegenerateNormal)?;

    let distances: HashMap<VertexId, f64> = mesh
        .vertices
        .iter()
        .map(|(v, vert)| (v, plane.signed_distance(&vert.point)))
        .collect();
    let mut sides: HashMap<VertexId, PlaneSide> = distances
        .iter()
        .map(|(&v, &d)| (v, side_of_distance(d, tolerance.coincidence)))
        .collect();

    for (f, face) in &mesh.faces {
        let layout = crossing_layout(face.vertices.iter().map(|v| sides[v]));
        if straddles(&layout) && chord_endpoints(&layout).is_none() {
            let crossings = layout.iter().filter(|s| **s == PlaneSide::On).count();
            warn!(face = ?f, crossings, "face cannot be bisected");
            return Err(EngineError::UnsupportedFace { face: f, crossings });
        }
    }

    let mut geometry = CutGeometry::default();

    let crossing_edges: Vec<EdgeId> = mesh
        .edges
        .iter()
        .filter(|(_, edge)| {
            let (a, b) = edge.vertices;
            matches!(
                (sides[&a], sides[&b]),
                (PlaneSide::Front, PlaneSide::Back) | (PlaneSide::Back, PlaneSide::Front)
            )
        })
        .map(|(e, _)| e)
        .collect();

    for e in crossing_edges {
        let (a, b) = mesh.edges[e].vertices;
        let (pa, pb) = (mesh.vertices[a].point, mesh.vertices[b].point);
        let crossing = Plane::crossing_point(&pa, &pb, distances[&a], distances[&b]);
        let m = mesh.add_vertex(crossing);
        sides.insert(m, PlaneSide::On);
        mesh.split_edge(e, m);
        geometry.new_vertices.push(m);
    }
    debug!(inserted = geometry.new_vertices.len(), "inserted crossing vertices");

    let face_ids: Vec<FaceId> = mesh.faces.keys().collect();
    for f in face_ids {
        let face = &mesh.faces[f];
        let layout: Vec<PlaneSide> = face.vertices.iter().map(|v| sides[v]).collect();
        if !straddles(&layout) {
            continue;
        }
        let Some((i, j)) = chord_endpoints(&layout) else {
            return Err(EngineError::UnsupportedFace {
                face: f,
                crossings: layout.iter().filter(|s| **s == PlaneSide::On).count(),
            });
        };

        let vertices = face.vertices.clone();
        let selected = face.selected;
        let first: Vec<VertexId> = vertices[i..=j].to_vec();
        let second: Vec<VertexId> = vertices[j..].iter().chain(&vertices[..=i]).copied().collect();

        mesh.remove_face(f);
        for half in [first, second] {
            let new_face = mesh.add_face(&half)?;
            mesh.set_selected(new_face, selected);
            geometry.new_faces.push(new_face);
        }
    }

    let edge_faces = mesh.edge_face_map();
    for (e, edge) in &mesh.edges {
        let (a, b) = edge.vertices;
        if sides[&a] != PlaneSide::On || sides[&b] != PlaneSide::On {
            continue;
        }
        let Some(faces) = edge_faces.get(&e) else {
            continue;
        };
        let touches = |wanted: PlaneSide| {
            faces
                .iter()
                .any(|&f| mesh.faces[f].vertices.iter().any(|v| sides[v] == wanted))
        };
        if touches(PlaneSide::Front) && touches(PlaneSide::Back) {
            geometry.cut_edges.push(e);
        }
    }

    info!(
        cut_edges = geometry.cut_edges.len(),
        new_vertices = geometry.new_vertices.len(),
        new_faces = geometry.new_faces.len(),
        "bisect complete"
    );
    Ok(geometry)
}

/// The side sequence a face will have once crossing vertices are inserted
/// between every pair of consecutive front/back vertices.
fn crossing_layout(sides: impl Iterator<Item = PlaneSide>) -> Vec<PlaneSide> {
    let sides: Vec<PlaneSide> = sides.collect();
    let n = sides.len();
    let mut layout = Vec::with_capacity(n + 2);
    for i in 0..n {
        let (cur, next) = (sides[i], sides[(i + 1) % n]);
        layout.push(cur);
        if matches!(
            (cur, next),
            (PlaneSide::Front, PlaneSide::Back) | (PlaneSide::Back, PlaneSide::Front)
        ) {
            layout.push(PlaneSide::On);
        }
    }
    layout
}

fn straddles(layout: &[PlaneSide]) -> bool {
    layout.contains(&PlaneSide::Front) && layout.contains(&PlaneSide::Back)
}

/// Indices `(i, j)`, `i < j`, of the two on-plane vertices a straddling
/// face is split between. `None` unless there are exactly two and they are
/// not neighbours in the cycle.
fn chord_endpoints(layout: &[PlaneSide]) -> Option<(usize, usize)> {
    let on: Vec<usize> = layout
        .iter()
        .enumerate()
        .filter(|(_, s)| **s == PlaneSide::On)
        .map(|(i, _)| i)
        .collect();
    let [i, j] = on[..] else {
        return None;
    };
    let n = layout.len();
    let adjacent = j == i + 1 || (i == 0 && j == n - 1);
    if adjacent { None } else { Some((i, j)) }
}
