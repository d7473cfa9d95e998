use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

use crate::engine::EngineError;
use crate::geometry::plane::polygon_normal;
use crate::geometry::point::Point3d;
use crate::geometry::transform::BoundingBox;
use crate::geometry::vector::Vec3;

// ─── Entity Keys ─────────────────────────────────────────────────────────────

new_key_type! {
    pub struct VertexId;
    pub struct EdgeId;
    pub struct FaceId;
}

// ─── Entities ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vertex {
    pub point: Point3d,
}

/// An undirected edge between two distinct vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub vertices: (VertexId, VertexId),
}

/// A polygon given as a counter-clockwise (seen from outside) vertex cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Face {
    pub vertices: Vec<VertexId>,
    pub selected: bool,
}

impl Face {
    /// Consecutive vertex pairs, wrapping around to close the cycle.
    pub fn sides(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// True if the face walks `a → b` directly.
    pub fn has_directed_side(&self, a: VertexId, b: VertexId) -> bool {
        self.sides().any(|(x, y)| x == a && y == b)
    }
}

/// Connected piece of a mesh: every vertex reachable from every other
/// through edges.
#[derive(Debug, Clone, Default)]
pub struct Component {
    pub vertices: Vec<VertexId>,
    pub edges: Vec<EdgeId>,
    pub faces: Vec<FaceId>,
}

// ─── Polygon Mesh ────────────────────────────────────────────────────────────

fn edge_key(a: VertexId, b: VertexId) -> (VertexId, VertexId) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Arena-based polygon mesh with vertex, edge, and face storage.
///
/// Edges are unique per unordered vertex pair. Faces reference vertices
/// only; their edges are kept in sync by the mutating methods.
#[derive(Debug, Clone, Default)]
pub struct PolyMesh {
    pub vertices: SlotMap<VertexId, Vertex>,
    pub edges: SlotMap<EdgeId, Edge>,
    pub faces: SlotMap<FaceId, Face>,
    edge_lookup: HashMap<(VertexId, VertexId), EdgeId>,
}

impl PolyMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, point: Point3d) -> VertexId {
        self.vertices.insert(Vertex { point })
    }

    /// Add a polygon, creating any missing edges along its sides.
    pub fn add_face(&mut self, vertices: &[VertexId]) -> Result<FaceId, EngineError> {
        if vertices.len() < 3 {
            return Err(EngineError::InvalidFace {
                reason: format!("a face needs at least 3 vertices, got {}", vertices.len()),
            });
        }
        if let Some(&missing) = vertices.iter().find(|v| !self.vertices.contains_key(**v)) {
            return Err(EngineError::VertexNotFound { vertex: missing });
        }
        let distinct: BTreeSet<VertexId> = vertices.iter().copied().collect();
        if distinct.len() != vertices.len() {
            return Err(EngineError::InvalidFace {
                reason: "face repeats a vertex".into(),
            });
        }

        let face = Face {
            vertices: vertices.to_vec(),
            selected: false,
        };
        for (a, b) in face.sides() {
            self.ensure_edge(a, b);
        }
        Ok(self.faces.insert(face))
    }

    pub fn edge_between(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.edge_lookup.get(&edge_key(a, b)).copied()
    }

    /// Return the edge joining `a` and `b`, creating it if needed.
    pub fn ensure_edge(&mut self, a: VertexId, b: VertexId) -> EdgeId {
        if let Some(e) = self.edge_between(a, b) {
            return e;
        }
        let e = self.edges.insert(Edge { vertices: (a, b) });
        self.edge_lookup.insert(edge_key(a, b), e);
        e
    }

    pub fn remove_edge(&mut self, e: EdgeId) -> Option<Edge> {
        let edge = self.edges.remove(e)?;
        self.edge_lookup.remove(&edge_key(edge.vertices.0, edge.vertices.1));
        Some(edge)
    }

    /// Remove a face. Its edges and vertices stay in the mesh.
    pub fn remove_face(&mut self, f: FaceId) -> Option<Face> {
        self.faces.remove(f)
    }

    /// Remove those `candidates` that no longer border any face.
    pub fn prune_unused_edges(&mut self, candidates: &[EdgeId]) {
        let used = self.edge_face_map();
        for &e in candidates {
            if !used.contains_key(&e) {
                self.remove_edge(e);
            }
        }
    }

    pub fn position(&self, v: VertexId) -> Option<Point3d> {
        self.vertices.get(v).map(|vert| vert.point)
    }

    pub fn face_points(&self, f: FaceId) -> Option<Vec<Point3d>> {
        let face = self.faces.get(f)?;
        face.vertices.iter().map(|&v| self.position(v)).collect()
    }

    /// Unit normal of a face, `None` when its area is below `min_length / 2`.
    pub fn face_normal(&self, f: FaceId, min_length: f64) -> Option<Vec3> {
        let points = self.face_points(f)?;
        polygon_normal(&points).normalized_with(min_length)
    }

    pub fn face_edges(&self, f: FaceId) -> Vec<EdgeId> {
        let Some(face) = self.faces.get(f) else {
            return Vec::new();
        };
        face.sides()
            .filter_map(|(a, b)| self.edge_between(a, b))
            .collect()
    }

    /// Faces bordering each edge. Edges without faces are absent.
    pub fn edge_face_map(&self) -> HashMap<EdgeId, Vec<FaceId>> {
        let mut map: HashMap<EdgeId, Vec<FaceId>> = HashMap::new();
        for (f, face) in &self.faces {
            for (a, b) in face.sides() {
                if let Some(e) = self.edge_between(a, b) {
                    map.entry(e).or_default().push(f);
                }
            }
        }
        map
    }

    /// Faces using each vertex.
    pub fn vertex_face_map(&self) -> HashMap<VertexId, Vec<FaceId>> {
        let mut map: HashMap<VertexId, Vec<FaceId>> = HashMap::new();
        for (f, face) in &self.faces {
            for &v in &face.vertices {
                map.entry(v).or_default().push(f);
            }
        }
        map
    }

    /// Insert vertex `m` into edge `e`, replacing it with two edges and
    /// threading `m` into every face that walks along `e`.
    pub fn split_edge(&mut self, e: EdgeId, m: VertexId) -> Option<(EdgeId, EdgeId)> {
        let edge = self.remove_edge(e)?;
        let (a, b) = edge.vertices;
        for face in self.faces.values_mut() {
            let n = face.vertices.len();
            if let Some(i) = (0..n).find(|&i| {
                let (x, y) = (face.vertices[i], face.vertices[(i + 1) % n]);
                (x == a && y == b) || (x == b && y == a)
            }) {
                face.vertices.insert(i + 1, m);
            }
        }
        let first = self.ensure_edge(a, m);
        let second = self.ensure_edge(m, b);
        Some((first, second))
    }

    /// Replace `old` by `new` in a face's vertex cycle and create the edges
    /// the new sides need.
    pub fn replace_face_vertex(&mut self, f: FaceId, old: VertexId, new: VertexId) {
        let Some(face) = self.faces.get_mut(f) else {
            return;
        };
        for v in face.vertices.iter_mut().filter(|v| **v == old) {
            *v = new;
        }
        let sides: Vec<_> = face.sides().collect();
        for (a, b) in sides {
            self.ensure_edge(a, b);
        }
    }

    pub fn selected_faces(&self) -> Vec<FaceId> {
        self.faces
            .iter()
            .filter(|(_, face)| face.selected)
            .map(|(f, _)| f)
            .collect()
    }

    pub fn set_selected(&mut self, f: FaceId, selected: bool) {
        if let Some(face) = self.faces.get_mut(f) {
            face.selected = selected;
        }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let mut bb = BoundingBox::empty();
        for vert in self.vertices.values() {
            bb.expand_to_include(&vert.point);
        }
        bb
    }

    /// Split the mesh into pieces connected through edges. Isolated vertices
    /// form their own pieces. Components are ordered by their smallest
    /// vertex key.
    pub fn connected_components(&self) -> Vec<Component> {
        let mut parent: HashMap<VertexId, VertexId> =
            self.vertices.keys().map(|v| (v, v)).collect();

        fn find(parent: &mut HashMap<VertexId, VertexId>, v: VertexId) -> VertexId {
            let mut root = v;
            while parent[&root] != root {
                root = parent[&root];
            }
            let mut cur = v;
            while parent[&cur] != root {
                let next = parent[&cur];
                parent.insert(cur, root);
                cur = next;
            }
            root
        }

        for edge in self.edges.values() {
            let ra = find(&mut parent, edge.vertices.0);
            let rb = find(&mut parent, edge.vertices.1);
            if ra != rb {
                let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
                parent.insert(hi, lo);
            }
        }

        let mut groups: BTreeMap<VertexId, Component> = BTreeMap::new();
        for v in self.vertices.keys() {
            let root = find(&mut parent, v);
            groups.entry(root).or_default().vertices.push(v);
        }
        for (e, edge) in &self.edges {
            let root = find(&mut parent, edge.vertices.0);
            groups.entry(root).or_default().edges.push(e);
        }
        for (f, face) in &self.faces {
            let root = find(&mut parent, face.vertices[0]);
            groups.entry(root).or_default().faces.push(f);
        }

        let mut components: Vec<Component> = groups.into_values().collect();
        for c in &mut components {
            c.vertices.sort();
        }
        components.sort_by_key(|c| c.vertices[0]);
        components
    }

    /// Move a component out of this mesh into a new one. Keys are
    /// reassigned in the new mesh; selection flags are carried over.
    pub fn extract_component(&mut self, component: &Component) -> PolyMesh {
        let mut piece = PolyMesh::new();
        let mut remap: HashMap<VertexId, VertexId> = HashMap::new();
        for &v in &component.vertices {
            if let Some(vert) = self.vertices.remove(v) {
                remap.insert(v, piece.add_vertex(vert.point));
            }
        }
        for &f in &component.faces {
            if let Some(face) = self.faces.remove(f) {
                let vertices: Vec<VertexId> = face.vertices.iter().map(|v| remap[v]).collect();
                let new_face = Face {
                    vertices,
                    selected: face.selected,
                };
                for (a, b) in new_face.sides() {
                    piece.ensure_edge(a, b);
                }
                piece.faces.insert(new_face);
            }
        }
        for &e in &component.edges {
            if let Some(edge) = self.remove_edge(e) {
                piece.ensure_edge(remap[&edge.vertices.0], remap[&edge.vertices.1]);
            }
        }
        piece
    }
}
