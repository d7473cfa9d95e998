use serde::{Deserialize, Serialize};

use super::point::Point3d;
use super::vector::Vec3;

/// A 4x4 affine transformation matrix stored in column-major order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Column-major 4x4 matrix entries.
    pub m: [f64; 16],
}

impl Transform {
    pub fn identity() -> Self {
        Self::scaling(1.0, 1.0, 1.0)
    }

    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        let mut t = Self::identity();
        t.m[12] = dx;
        t.m[13] = dy;
        t.m[14] = dz;
        t
    }

    pub fn from_translation_vec(v: Vec3) -> Self {
        Self::translation(v.x, v.y, v.z)
    }

    pub fn scaling(sx: f64, sy: f64, sz: f64) -> Self {
        #[rustfmt::skip]
        let m = [
            sx,  0.0, 0.0, 0.0,
            0.0, sy,  0.0, 0.0,
            0.0, 0.0, sz,  0.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        Self { m }
    }

    /// Rotation around the Z axis by `angle` radians.
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        #[rustfmt::skip]
        let m = [
            c,   s,   0.0, 0.0,
            -s,  c,   0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        Self { m }
    }

    /// Matrix element access (row, col), 0-indexed.
    fn at(&self, row: usize, col: usize) -> f64 {
        self.m[col * 4 + row]
    }

    /// Transform a point (applies translation).
    pub fn transform_point(&self, p: &Point3d) -> Point3d {
        let x = self.at(0, 0) * p.x + self.at(0, 1) * p.y + self.at(0, 2) * p.z + self.at(0, 3);
        let y = self.at(1, 0) * p.x + self.at(1, 1) * p.y + self.at(1, 2) * p.z + self.at(1, 3);
        let z = self.at(2, 0) * p.x + self.at(2, 1) * p.y + self.at(2, 2) * p.z + self.at(2, 3);
        Point3d::new(x, y, z)
    }

    /// Compose two transforms: `self * other`, so `other` is applied first.
    pub fn then(&self, other: &Transform) -> Transform {
        let mut result = [0.0f64; 16];
        for col in 0..4 {
            for row in 0..4 {
                result[col * 4 + row] = (0..4).map(|k| self.at(row, k) * other.at(k, col)).sum();
            }
        }
        Transform { m: result }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3d,
    pub max: Point3d,
}

impl BoundingBox {
    pub fn new(min: Point3d, max: Point3d) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self {
            min: Point3d::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3d::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn from_points(points: &[Point3d]) -> Self {
        let mut bb = Self::empty();
        for p in points {
            bb.expand_to_include(p);
        }
        bb
    }

    pub fn expand_to_include(&mut self, p: &Point3d) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// The eight corners, starting at `min` and ending at `max`'s
    /// diagonal partner, in the order (x, y, z) bits `000, 001, 011, 010,
    /// 100, 101, 111, 110`.
    pub fn corners(&self) -> [Point3d; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Point3d::new(lo.x, lo.y, lo.z),
            Point3d::new(lo.x, lo.y, hi.z),
            Point3d::new(lo.x, hi.y, hi.z),
            Point3d::new(lo.x, hi.y, lo.z),
            Point3d::new(hi.x, lo.y, lo.z),
            Point3d::new(hi.x, lo.y, hi.z),
            Point3d::new(hi.x, hi.y, hi.z),
            Point3d::new(hi.x, hi.y, lo.z),
        ]
    }

    pub fn center(&self) -> Point3d {
        self.min.midpoint(&self.max)
    }

    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_translation() {
        let t = Transform::translation(10.0, 20.0, 30.0);
        let result = t.transform_point(&Point3d::new(1.0, 2.0, 3.0));
        assert!((result.x - 11.0).abs() < 1e-12);
        assert!((result.y - 22.0).abs() < 1e-12);
        assert!((result.z - 33.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotation_z_90() {
        let result = Transform::rotation_z(FRAC_PI_2).transform_point(&Point3d::new(1.0, 0.0, 0.0));
        assert!(result.x.abs() < 1e-12);
        assert!((result.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_then_applies_right_operand_first() {
        // Scale first, then translate.
        let t = Transform::translation(1.0, 0.0, 0.0).then(&Transform::scaling(2.0, 2.0, 2.0));
        let result = t.transform_point(&Point3d::new(1.0, 1.0, 1.0));
        assert!((result.x - 3.0).abs() < 1e-12);
        assert!((result.y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_bounding_box_corners_average_to_center() {
        let bb = BoundingBox::new(Point3d::new(-1.0, 0.0, 2.0), Point3d::new(3.0, 4.0, 6.0));
        let corners = bb.corners();
        assert_eq!(corners[0], bb.min);
        let mean = Point3d::centroid(&corners).unwrap();
        assert!(mean.distance_to(&bb.center()) < 1e-12);
    }

    #[test]
    fn test_empty_box_is_invalid() {
        assert!(!BoundingBox::empty().is_valid());
        let bb = BoundingBox::from_points(&[Point3d::ORIGIN, Point3d::new(1.0, 2.0, 3.0)]);
        assert!(bb.is_valid());
        assert_eq!(bb.max, Point3d::new(1.0, 2.0, 3.0));
    }
}
