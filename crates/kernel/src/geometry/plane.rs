use serde::{Deserialize, Serialize};

use super::point::Point3d;
use super::vector::Vec3;

/// Which side of a plane a point falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaneSide {
    /// Positive signed distance (the side the normal points to).
    Front,
    /// Negative signed distance.
    Back,
    /// Within tolerance of the plane.
    On,
}

/// An infinite plane through `origin` with unit `normal`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub origin: Point3d,
    pub normal: Vec3,
}

impl Plane {
    /// Build a plane, normalizing `normal`. Returns `None` if the normal is
    /// shorter than `min_length`.
    pub fn new(origin: Point3d, normal: Vec3, min_length: f64) -> Option<Self> {
        let normal = normal.normalized_with(min_length)?;
        Some(Self { origin, normal })
    }

    pub fn signed_distance(&self, p: &Point3d) -> f64 {
        (*p - self.origin).dot(&self.normal)
    }

    pub fn classify(&self, p: &Point3d, tolerance: f64) -> PlaneSide {
        side_of_distance(self.signed_distance(p), tolerance)
    }

    /// Point where the segment `a → b` crosses the plane, given the signed
    /// distances of its endpoints. The endpoints must straddle the plane.
    pub fn crossing_point(a: &Point3d, b: &Point3d, dist_a: f64, dist_b: f64) -> Point3d {
        let t = dist_a / (dist_a - dist_b);
        a.lerp(b, t)
    }
}

pub fn side_of_distance(distance: f64, tolerance: f64) -> PlaneSide {
    if distance > tolerance {
        PlaneSide::Front
    } else if distance < -tolerance {
        PlaneSide::Back
    } else {
        PlaneSide::On
    }
}

/// Newell's method: area-weighted normal of a (possibly non-planar) polygon.
///
/// The result is not normalized; its length is twice the polygon's area, so a
/// zero-length result means the polygon is degenerate.
pub fn polygon_normal(points: &[Point3d]) -> Vec3 {
    let n = points.len();
    let mut normal = Vec3::ZERO;
    for i in 0..n {
        let cur = points[i];
        let next = points[(i + 1) % n];
        normal.x += (cur.y - next.y) * (cur.z + next.z);
        normal.y += (cur.z - next.z) * (cur.x + next.x);
        normal.z += (cur.x - next.x) * (cur.y + next.y);
    }
    normal
}
