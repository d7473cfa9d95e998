//! Push selected objects apart, away from their common center.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use split_kernel::Tolerance;
use split_kernel::geometry::point::Point3d;
use split_kernel::geometry::transform::{BoundingBox, Transform};
use split_kernel::geometry::vector::Vec3;

/// An object placed in a scene: a local bounding box positioned by a basis
/// transform followed by a translation to `location`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    pub location: Point3d,
    /// Rotation and scale, applied before the translation.
    pub basis: Transform,
    /// Bounds in the object's local space.
    pub bounds: BoundingBox,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, location: Point3d, bounds: BoundingBox) -> Self {
        Self {
            name: name.into(),
            location,
            basis: Transform::identity(),
            bounds,
        }
    }

    pub fn with_basis(mut self, basis: Transform) -> Self {
        self.basis = basis;
        self
    }

    pub fn world_matrix(&self) -> Transform {
        Transform::from_translation_vec(self.location.to_vec3()).then(&self.basis)
    }

    /// Mean of the eight local bounding box corners.
    pub fn local_center(&self) -> Point3d {
        Point3d::centroid(&self.bounds.corners()).unwrap_or_else(|| self.bounds.center())
    }

    pub fn world_center(&self) -> Point3d {
        self.world_matrix().transform_point(&self.local_center())
    }

    /// Distance from the local center to the minimum corner, in local units.
    pub fn radius(&self) -> f64 {
        self.local_center().distance_to(&self.bounds.corners()[0])
    }
}

/// What a repel moved and where it pushed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepelOutcome {
    /// Mean of the objects' world centers.
    pub group_center: Point3d,
    /// Distance each moved object was pushed.
    pub average_radius: f64,
    /// Names of objects that were moved.
    pub moved: Vec<String>,
    /// Names of objects sitting on the group center, left in place.
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepelError {
    #[error("No objects selected. Two or more need to be selected to repel.")]
    NoObjectsSelected,

    #[error("1 object selected. Two or more need to be selected to repel.")]
    SingleObjectSelected,
}

/// Move each object away from the group center by the average radius.
///
/// All centers are measured before anything moves. An object whose center
/// is within `tolerance.coincidence` of the group center has no direction to
/// move in and is reported in `skipped`.
#[instrument(skip(objects, tolerance), fields(objects = objects.len()))]
pub fn execute_repel(objects: &mut [SceneObject], tolerance: &Tolerance) -> Result<RepelOutcome, RepelError> {
    match objects.len() {
        0 => return Err(RepelError::NoObjectsSelected),
        1 => return Err(RepelError::SingleObjectSelected),
        _ => {}
    }

    let centers: Vec<Point3d> = objects.iter().map(SceneObject::world_center).collect();
    let count = objects.len() as f64;
    // Every radius contributes, so the push is the mean radius.
    let radius_sum: f64 = objects.iter().map(SceneObject::radius).sum();
    let average_radius = radius_sum / count;
    let group_center = Point3d::centroid(&centers).unwrap_or(Point3d::ORIGIN);
    debug!(
        group_center = ?group_center.to_array(),
        average_radius,
        "measured selection"
    );

    let mut moved = Vec::new();
    let mut skipped = Vec::new();
    for (object, center) in objects.iter_mut().zip(&centers) {
        let away: Vec3 = *center - group_center;
        match away.normalized_with(tolerance.coincidence) {
            Some(direction) => {
                object.location = object.location + direction * average_radius;
                moved.push(object.name.clone());
            }
            None => {
                warn!(object = %object.name, "object sits on the group center, not moved");
                skipped.push(object.name.clone());
            }
        }
    }

    info!(moved = moved.len(), skipped = skipped.len(), "repel complete");
    Ok(RepelOutcome {
        group_center,
        average_radius,
        moved,
        skipped,
    })
}
