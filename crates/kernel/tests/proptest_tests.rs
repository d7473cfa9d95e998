//! Property-based tests for mesh and geometry invariants using the `proptest` crate.

use approx::assert_relative_eq;
use proptest::prelude::*;

use split_kernel::geometry::plane::{Plane, PlaneSide};
use split_kernel::geometry::point::Point3d;
use split_kernel::geometry::transform::{BoundingBox, Transform};
use split_kernel::geometry::vector::Vec3;
use split_kernel::topology::audit::audit_mesh;
use split_kernel::topology::primitives::make_box;
use split_kernel::{EdgeId, MeshEngine, PolyMesh, Tolerance};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_point() -> impl Strategy<Value = (f64, f64, f64)> {
    (-1000.0f64..1000.0, -1000.0f64..1000.0, -1000.0f64..1000.0)
}

/// Box extent, kept away from zero so faces stay non-degenerate.
fn arb_positive_dim() -> impl Strategy<Value = f64> {
    0.1f64..1000.0
}

/// Fraction of the box height at which to cut, away from the caps.
fn arb_cut_fraction() -> impl Strategy<Value = f64> {
    0.05f64..0.95
}

fn arb_direction() -> impl Strategy<Value = (f64, f64, f64)> {
    (-1.0f64..1.0, -1.0f64..1.0, -1.0f64..1.0)
        .prop_filter("direction must have length", |(x, y, z)| x * x + y * y + z * z > 1e-3)
}

const TOL: f64 = 1e-6;

// ---------------------------------------------------------------------------
// 1. Cutting a box anywhere between its caps gives a ring of four cut edges
//    and leaves the surface closed.
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn box_bisect_keeps_surface_closed(
        (x, y, z) in arb_point(),
        dx in arb_positive_dim(),
        dy in arb_positive_dim(),
        dz in arb_positive_dim(),
        t in arb_cut_fraction(),
    ) {
        let mut mesh = PolyMesh::new();
        make_box(&mut mesh, Point3d::new(x, y, z), Point3d::new(x + dx, y + dy, z + dz)).unwrap();

        let height = z + t * dz;
        let cut = mesh
            .bisect(Point3d::new(x, y, height), Vec3::Z, &Tolerance::default())
            .unwrap();

        prop_assert_eq!(cut.cut_edges.len(), 4);
        prop_assert_eq!(cut.new_vertices.len(), 4);
        let audit = audit_mesh(&mesh);
        prop_assert!(audit.is_closed_manifold());
        prop_assert_eq!(audit.euler_characteristic, 2);
    }
}

// ---------------------------------------------------------------------------
// 2. Split + fill + separate turns a cut box into two closed boxes.
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn box_cut_pipeline_yields_two_closed_pieces(
        dx in arb_positive_dim(),
        dy in arb_positive_dim(),
        dz in arb_positive_dim(),
        t in arb_cut_fraction(),
    ) {
        let mut mesh = PolyMesh::new();
        make_box(&mut mesh, Point3d::ORIGIN, Point3d::new(dx, dy, dz)).unwrap();
        let cut = mesh
            .bisect(Point3d::new(0.0, 0.0, t * dz), Vec3::Z, &Tolerance::default())
            .unwrap();
        let split = mesh.split_edges(&cut.cut_edges).unwrap();
        prop_assert_eq!(split.len(), 8);

        for component in mesh.connected_components() {
            let ring: Vec<EdgeId> = split
                .iter()
                .copied()
                .filter(|e| component.edges.contains(e))
                .collect();
            mesh.fill(&ring).unwrap();
        }
        let pieces = mesh.separate_by_looseness().unwrap();

        prop_assert_eq!(pieces.len(), 1);
        for piece in pieces.iter().chain(std::iter::once(&mesh)) {
            let audit = audit_mesh(piece);
            prop_assert!(audit.is_closed_manifold());
            prop_assert_eq!(audit.euler_characteristic, 2);
            prop_assert_eq!(piece.faces.len(), 6);
        }
    }
}

// ---------------------------------------------------------------------------
// 3. Signed distance along the unit normal is the offset itself.
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn plane_signed_distance_along_normal(
        (ox, oy, oz) in arb_point(),
        (nx, ny, nz) in arb_direction(),
        offset in -100.0f64..100.0,
    ) {
        prop_assume!(offset.abs() > 1e-3);
        let origin = Point3d::new(ox, oy, oz);
        let plane = Plane::new(origin, Vec3::new(nx, ny, nz), 1e-10).unwrap();
        let p = origin + plane.normal * offset;

        prop_assert!((plane.signed_distance(&p) - offset).abs() < TOL);
        let expected = if offset > 0.0 { PlaneSide::Front } else { PlaneSide::Back };
        prop_assert_eq!(plane.classify(&p, TOL), expected);
    }
}

// ---------------------------------------------------------------------------
// 4. Composed translations add up.
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn translation_composition(
        (ax, ay, az) in arb_point(),
        (bx, by, bz) in arb_point(),
        (px, py, pz) in arb_point(),
    ) {
        let combined = Transform::translation(ax, ay, az).then(&Transform::translation(bx, by, bz));
        let moved = combined.transform_point(&Point3d::new(px, py, pz));
        prop_assert!((moved.x - (px + ax + bx)).abs() < TOL);
        prop_assert!((moved.y - (py + ay + by)).abs() < TOL);
        prop_assert!((moved.z - (pz + az + bz)).abs() < TOL);
    }
}

// ---------------------------------------------------------------------------
// 5. A bounding box contains every point it was built from.
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn bounding_box_contains_points(points in prop::collection::vec(arb_point(), 1..20)) {
        let points: Vec<Point3d> = points.into_iter().map(|(x, y, z)| Point3d::new(x, y, z)).collect();
        let bb = BoundingBox::from_points(&points);
        prop_assert!(bb.is_valid());
        for p in &points {
            prop_assert!(p.x >= bb.min.x && p.x <= bb.max.x);
            prop_assert!(p.y >= bb.min.y && p.y <= bb.max.y);
            prop_assert!(p.z >= bb.min.z && p.z <= bb.max.z);
        }
    }
}

#[test]
fn tolerance_round_trips_through_json() {
    let tolerance = Tolerance {
        coincidence: 1e-5,
        angular: 1e-9,
    };
    let json = serde_json::to_string(&tolerance).unwrap();
    let back: Tolerance = serde_json::from_str(&json).unwrap();
    assert_eq!(back, tolerance);
}

#[test]
fn box_corner_center_matches_bounds_center() {
    let bb = BoundingBox::new(Point3d::new(-1.0, 2.0, 0.5), Point3d::new(3.0, 4.0, 1.5));
    let center = Point3d::centroid(&bb.corners()).unwrap();
    assert_relative_eq!(center.x, bb.center().x);
    assert_relative_eq!(center.y, bb.center().y);
    assert_relative_eq!(center.z, bb.center().z);
}
