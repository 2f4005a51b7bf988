//! Road descriptors.
//!
//! Roads are derived from the grid alone and never randomized.

use serde::{Deserialize, Serialize};

use crate::math::Vec3;

/// Direction a road segment runs in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadOrientation {
    /// Runs across the travel axis (along X), between block rows.
    Horizontal,
    /// Runs along the travel axis (along Z), between block columns.
    Vertical,
}

/// A single trench road.
///
/// The mesh is built in road-local space with `width` along X and
/// `length` along Z; `yaw_degrees` rotates it into place around `position`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoadSegment {
    /// Trench floor width.
    pub width: f32,
    /// Extent along the road's running direction.
    pub length: f32,
    /// Running direction.
    pub orientation: RoadOrientation,
    /// World-space center of the trench floor.
    pub position: Vec3,
}

impl RoadSegment {
    /// Rotation about +Y that maps road-local Z onto the running direction.
    #[inline]
    #[must_use]
    pub const fn yaw_degrees(&self) -> f32 {
        match self.orientation {
            RoadOrientation::Vertical => 0.0,
            RoadOrientation::Horizontal => 90.0,
        }
    }

    /// World-space extents of the trench floor as `(size_x, size_z)`.
    #[inline]
    #[must_use]
    pub const fn world_extent(&self) -> (f32, f32) {
        match self.orientation {
            RoadOrientation::Vertical => (self.width, self.length),
            RoadOrientation::Horizontal => (self.length, self.width),
        }
    }
}
