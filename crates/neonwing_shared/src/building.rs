//! Building descriptors.
//!
//! A [`Building`] is everything the mesh builder needs and nothing more:
//! all randomness has already been spent by the planner.

use serde::{Deserialize, Serialize};

/// Tower silhouette.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingShape {
    /// Equal width and depth.
    Square,
    /// Width and depth differ by at least a few units.
    Rectangle,
    /// Rectangle whose top face is shifted along the lane axis.
    Rhomboid,
}

impl BuildingShape {
    /// All shapes, in draw-threshold order.
    pub const ALL: [Self; 3] = [Self::Square, Self::Rectangle, Self::Rhomboid];
}

/// Neon color family of a building's edge lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorCategory {
    /// Cyan neon
    Cyan,
    /// Purple neon
    Purple,
    /// Red neon
    Red,
}

impl ColorCategory {
    /// All categories, in draw-threshold order.
    pub const ALL: [Self; 3] = [Self::Cyan, Self::Purple, Self::Red];

    /// Fixed RGB for this category. Independent of shape.
    #[inline]
    #[must_use]
    pub const fn rgb(self) -> [f32; 3] {
        match self {
            Self::Cyan => [0.0, 1.0, 1.0],
            Self::Purple => [0.62, 0.0, 1.0],
            Self::Red => [1.0, 0.08, 0.24],
        }
    }

    /// RGB with full alpha.
    #[inline]
    #[must_use]
    pub const fn rgba(self) -> [f32; 4] {
        let [r, g, b] = self.rgb();
        [r, g, b, 1.0]
    }
}

/// Shape descriptor of a single tower.
///
/// Dimensions are in world units. `skew` is only non-zero for
/// [`BuildingShape::Rhomboid`] and lies in `[0.15 * width, 0.35 * width)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Building {
    /// Extent along X (the lane axis).
    pub width: f32,
    /// Extent along Y.
    pub height: f32,
    /// Extent along Z (the travel axis).
    pub depth: f32,
    /// Silhouette.
    pub shape: BuildingShape,
    /// Neon edge color.
    pub color: ColorCategory,
    /// Top-face offset along X.
    pub skew: f32,
}

impl Building {
    /// Returns true if all dimensions are finite and strictly positive.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let dims = [self.width, self.height, self.depth];
        dims.iter().all(|d| d.is_finite() && *d > 0.0) && self.skew.is_finite()
    }

    /// Top-face offset actually applied by the mesh builder.
    #[inline]
    #[must_use]
    pub fn top_offset(&self) -> f32 {
        match self.shape {
            BuildingShape::Rhomboid => self.skew,
            BuildingShape::Square | BuildingShape::Rectangle => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_is_distinct() {
        let [cyan, purple, red] = ColorCategory::ALL.map(ColorCategory::rgb);
        assert_ne!(cyan, purple);
        assert_ne!(purple, red);
        assert_ne!(cyan, red);
    }

    #[test]
    fn test_skew_ignored_for_boxes() {
        let mut building = Building {
            width: 6.0,
            height: 30.0,
            depth: 6.0,
            shape: BuildingShape::Square,
            color: ColorCategory::Cyan,
            skew: 1.5,
        };
        assert_eq!(building.top_offset(), 0.0);

        building.shape = BuildingShape::Rhomboid;
        assert_eq!(building.top_offset(), 1.5);
    }

    #[test]
    fn test_degenerate_building_is_invalid() {
        let building = Building {
            width: 0.0,
            height: 30.0,
            depth: 6.0,
            shape: BuildingShape::Rectangle,
            color: ColorCategory::Red,
            skew: 0.0,
        };
        assert!(!building.is_valid());
    }
}
