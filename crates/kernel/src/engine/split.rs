use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::{debug, info};

use super::EngineError;
use crate::topology::mesh::{EdgeId, FaceId, PolyMesh, VertexId};

/// Unordered vertex pair, so `(a, b)` and `(b, a)` compare equal.
fn pair(a: VertexId, b: VertexId) -> (VertexId, VertexId) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Separate faces along `edges` by giving each side its own vertices.
///
/// Fans are computed against a snapshot of the face cycles taken before any
/// vertex is duplicated, so the grouping at one vertex is unaffected by the
/// duplication at its neighbours.
pub(super) fn split_mesh_edges(mesh: &mut PolyMesh, edges: &[EdgeId]) -> Result<Vec<EdgeId>, EngineError> {
    let mut originals = Vec::with_capacity(edges.len());
    for &e in edges {
        let edge = mesh.edges.get(e).ok_or(EngineError::EdgeNotFound { edge: e })?;
        originals.push(edge.vertices);
    }
    let cut_pairs: HashSet<(VertexId, VertexId)> = originals.iter().map(|&(a, b)| pair(a, b)).collect();
    let cut_vertices: BTreeSet<VertexId> = originals.iter().flat_map(|&(a, b)| [a, b]).collect();

    let edge_faces = mesh.edge_face_map();
    let wire_before: HashSet<EdgeId> = mesh.edges.keys().filter(|e| !edge_faces.contains_key(e)).collect();
    let vertex_faces = mesh.vertex_face_map();
    let snapshot: HashMap<FaceId, Vec<VertexId>> = mesh
        .faces
        .iter()
        .map(|(f, face)| (f, face.vertices.clone()))
        .collect();

    let mut plan: Vec<(VertexId, Vec<Vec<FaceId>>)> = Vec::new();
    for &v in &cut_vertices {
        let faces = vertex_faces.get(&v).cloned().unwrap_or_default();
        let fans = group_fans(v, &faces, &snapshot, &cut_pairs);
        debug!(vertex = ?v, fans = fans.len(), "grouped faces around cut vertex");
        plan.push((v, fans));
    }

    let mut copies: HashMap<VertexId, Vec<VertexId>> = HashMap::new();
    let mut duplicated = 0usize;
    for (v, fans) in plan {
        let mut vertex_copies = vec![v];
        let point = mesh.vertices[v].point;
        for fan in fans.iter().skip(1) {
            let dup = mesh.add_vertex(point);
            for &f in fan {
                mesh.replace_face_vertex(f, v, dup);
            }
            vertex_copies.push(dup);
            duplicated += 1;
        }
        copies.insert(v, vertex_copies);
    }

    let stale: Vec<EdgeId> = mesh.edges.keys().filter(|e| !wire_before.contains(e)).collect();
    mesh.prune_unused_edges(&stale);

    let mut result = Vec::new();
    let mut seen = HashSet::new();
    for (a, b) in originals {
        for &ca in &copies[&a] {
            for &cb in &copies[&b] {
                if let Some(e) = mesh.edge_between(ca, cb) {
                    if seen.insert(e) {
                        result.push(e);
                    }
                }
            }
        }
    }

    info!(
        input_edges = edges.len(),
        output_edges = result.len(),
        duplicated_vertices = duplicated,
        "split edges complete"
    );
    Ok(result)
}

/// Group the faces around `v` into fans: faces connected across edges at
/// `v` that are not being split. Fans are ordered by their smallest face key.
fn group_fans(
    v: VertexId,
    faces: &[FaceId],
    snapshot: &HashMap<FaceId, Vec<VertexId>>,
    cut_pairs: &HashSet<(VertexId, VertexId)>,
) -> Vec<Vec<FaceId>> {
    // For each face, the vertices it reaches from `v` through a non-cut edge.
    let neighbours: Vec<Vec<VertexId>> = faces
        .iter()
        .map(|f| {
            let cycle = &snapshot[f];
            let n = cycle.len();
            let Some(i) = cycle.iter().position(|&x| x == v) else {
                return Vec::new();
            };
            [cycle[(i + n - 1) % n], cycle[(i + 1) % n]]
                .into_iter()
                .filter(|&w| !cut_pairs.contains(&pair(v, w)))
                .collect()
        })
        .collect();

    let mut fan_of: Vec<usize> = (0..faces.len()).collect();
    fn root(fan_of: &mut [usize], mut i: usize) -> usize {
        while fan_of[i] != i {
            fan_of[i] = fan_of[fan_of[i]];
            i = fan_of[i];
        }
        i
    }
    for i in 0..faces.len() {
        for j in (i + 1)..faces.len() {
            if neighbours[i].iter().any(|w| neighbours[j].contains(w)) {
                let (ri, rj) = (root(&mut fan_of, i), root(&mut fan_of, j));
                if ri != rj {
                    fan_of[ri.max(rj)] = ri.min(rj);
                }
            }
        }
    }

    let mut fans: HashMap<usize, Vec<FaceId>> = HashMap::new();
    for (i, &f) in faces.iter().enumerate() {
        let r = root(&mut fan_of, i);
        fans.entry(r).or_default().push(f);
    }
    let mut fans: Vec<Vec<FaceId>> = fans.into_values().collect();
    for fan in &mut fans {
        fan.sort();
    }
    fans.sort_by_key(|fan| fan[0]);
    fans
}
