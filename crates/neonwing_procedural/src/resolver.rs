//! # Building Resolver
//!
//! Turns one building slot into a [`Building`]: shape, dimensions, height
//! and color. Each slot consumes its draws in a fixed order:
//!
//! 1. shape
//! 2. width / depth (one draw for squares, two otherwise)
//! 3. skew (rhomboids only)
//! 4. height
//! 5. color
//!
//! The planner draws the slot's Z position right after.
//!
//! ## Range Clamping
//!
//! Every range is clamped before drawing: the upper bound is raised to at
//! least [`MIN_VIABLE_EXTENT`], and a lower bound above the upper bound
//! collapses onto it. A draw therefore always consumes exactly one value
//! and never yields a non-positive or NaN extent.

use neonwing_shared::{Building, BuildingShape, ColorCategory};
use rand::Rng;

use crate::config::CityConfig;
use crate::MIN_VIABLE_EXTENT;

/// Cumulative shape threshold below which a slot is a square.
pub const SQUARE_THRESHOLD: f32 = 0.40;

/// Cumulative shape threshold below which a slot is a rectangle.
pub const RECTANGLE_THRESHOLD: f32 = 0.75;

/// Rectangles whose sides differ by less than this get nudged.
const MIN_ASPECT_DIFFERENCE: f32 = 2.0;

/// Amount added to one side of a too-square rectangle.
const ASPECT_NUDGE: f32 = 3.0;

/// Rectangle widths may go down to this fraction of `min_tower_width`.
const NARROW_WIDTH_FACTOR: f32 = 0.6;

/// Skew range as fractions of the width: `[MIN, MAX)`.
const SKEW_MIN_FACTOR: f32 = 0.15;
const SKEW_MAX_FACTOR: f32 = 0.35;

/// Draws a value in `[lo, hi]` after clamping the range.
pub(crate) fn draw_range<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    let hi = hi.max(MIN_VIABLE_EXTENT);
    let lo = lo.min(hi);
    let t: f32 = rng.gen();
    lo + t * (hi - lo)
}

/// Maps a uniform draw in `[0, 1)` to a skew in `[0.15, 0.35) * width`.
///
/// Rounding can land a draw near 1 exactly on the upper bound, so the result
/// is held one ulp below it. `width` is always at least [`MIN_VIABLE_EXTENT`].
pub(crate) fn skew_for(width: f32, draw: f32) -> f32 {
    let upper = width * SKEW_MAX_FACTOR;
    let below_upper = f32::from_bits(upper.to_bits() - 1);
    (width * (SKEW_MIN_FACTOR + draw * (SKEW_MAX_FACTOR - SKEW_MIN_FACTOR))).min(below_upper)
}

/// Draws a world coordinate in `[lo, hi]`, collapsing onto `hi` when the
/// range is inverted. Unlike [`draw_range`] the bound is not clamped.
pub(crate) fn draw_coordinate<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    let lo = lo.min(hi);
    let t: f32 = rng.gen();
    lo + t * (hi - lo)
}

/// Resolves building slots for one city configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuildingResolver {
    min_width: f32,
    max_width: f32,
    min_height: f32,
    max_height: f32,
    cyan_probability: f32,
    purple_probability: f32,
}

impl BuildingResolver {
    /// Captures the tower ranges and color odds of `config`.
    #[must_use]
    pub fn new(config: &CityConfig) -> Self {
        Self {
            min_width: config.min_tower_width,
            max_width: config.max_tower_width,
            min_height: config.min_tower_height,
            max_height: config.max_tower_height,
            cyan_probability: config.cyan_probability,
            purple_probability: config.purple_probability,
        }
    }

    /// Maps a uniform draw in `[0, 1)` to a shape.
    #[inline]
    #[must_use]
    pub fn shape_for(draw: f32) -> BuildingShape {
        if draw < SQUARE_THRESHOLD {
            BuildingShape::Square
        } else if draw < RECTANGLE_THRESHOLD {
            BuildingShape::Rectangle
        } else {
            BuildingShape::Rhomboid
        }
    }

    /// Maps a uniform draw in `[0, 1)` to a color category.
    #[inline]
    #[must_use]
    pub fn color_for(&self, draw: f32) -> ColorCategory {
        if draw < self.cyan_probability {
            ColorCategory::Cyan
        } else if draw < self.cyan_probability + self.purple_probability {
            ColorCategory::Purple
        } else {
            ColorCategory::Red
        }
    }

    /// Resolves one slot that is `lane_width` wide and at most `max_depth` deep.
    pub fn resolve<R: Rng + ?Sized>(&self, rng: &mut R, lane_width: f32, max_depth: f32) -> Building {
        let shape = Self::shape_for(rng.gen());

        let (width, depth, skew) = match shape {
            BuildingShape::Square => {
                let hi = self.max_width.min(lane_width).min(max_depth);
                let side = draw_range(rng, self.min_width, hi);
                (side, side, 0.0)
            }
            BuildingShape::Rectangle => {
                let (width, depth) = self.rectangle(rng, lane_width, max_depth);
                (width, depth, 0.0)
            }
            BuildingShape::Rhomboid => {
                let (width, depth) = self.rectangle(rng, lane_width, max_depth);
                (width, depth, skew_for(width, rng.gen()))
            }
        };

        let height = draw_range(rng, self.min_height, self.max_height);
        let color = self.color_for(rng.gen());

        Building {
            width,
            height,
            depth,
            shape,
            color,
            skew,
        }
    }

    /// Width and depth of a rectangle or rhomboid, nudged apart when too square.
    fn rectangle<R: Rng + ?Sized>(&self, rng: &mut R, lane_width: f32, max_depth: f32) -> (f32, f32) {
        let width_hi = self.max_width.min(lane_width).max(MIN_VIABLE_EXTENT);
        let depth_hi = self.max_width.min(max_depth).max(MIN_VIABLE_EXTENT);

        let mut width = draw_range(rng, NARROW_WIDTH_FACTOR * self.min_width, width_hi);
        let mut depth = draw_range(rng, self.min_width, depth_hi);

        if (width - depth).abs() < MIN_ASPECT_DIFFERENCE {
            depth = (depth + ASPECT_NUDGE).min(depth_hi);
            if (width - depth).abs() < MIN_ASPECT_DIFFERENCE {
                width = (width + ASPECT_NUDGE).min(width_hi);
            }
        }

        (width, depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn resolver() -> BuildingResolver {
        BuildingResolver::new(&CityConfig::default())
    }

    #[test]
    fn test_shape_thresholds() {
        assert_eq!(BuildingResolver::shape_for(0.0), BuildingShape::Square);
        assert_eq!(BuildingResolver::shape_for(0.399), BuildingShape::Square);
        assert_eq!(BuildingResolver::shape_for(0.40), BuildingShape::Rectangle);
        assert_eq!(BuildingResolver::shape_for(0.749), BuildingShape::Rectangle);
        assert_eq!(BuildingResolver::shape_for(0.75), BuildingShape::Rhomboid);
    }

    #[test]
    fn test_color_thresholds() {
        let r = resolver();
        assert_eq!(r.color_for(0.1), ColorCategory::Cyan);
        assert_eq!(r.color_for(0.5), ColorCategory::Purple);
        assert_eq!(r.color_for(0.9), ColorCategory::Red);
    }

    #[test]
    fn test_resolved_buildings_fit_their_slot() {
        let r = resolver();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        for lane in [22.0, 10.25, 5.833, 4.375] {
            for _ in 0..500 {
                let b = r.resolve(&mut rng, lane, 22.0);
                assert!(b.is_valid(), "{b:?}");
                assert!(b.width <= lane + 1e-4, "{b:?} in lane {lane}");
                assert!(b.depth <= 22.0);
                assert!((15.0..=80.0).contains(&b.height));
                if b.shape == BuildingShape::Square {
                    assert_eq!(b.width, b.depth);
                }
            }
        }
    }

    #[test]
    fn test_rhomboid_skew_range() {
        let r = resolver();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut seen = 0;

        for _ in 0..2000 {
            let b = r.resolve(&mut rng, 10.0, 22.0);
            match b.shape {
                BuildingShape::Rhomboid => {
                    seen += 1;
                    assert!(b.skew >= 0.15 * b.width - 1e-5);
                    assert!(b.skew < 0.35 * b.width);
                }
                BuildingShape::Square | BuildingShape::Rectangle => assert_eq!(b.skew, 0.0),
            }
        }
        assert!(seen > 0);
    }

    /// Always returns the largest possible value.
    struct SaturatedRng;

    impl rand::RngCore for SaturatedRng {
        fn next_u32(&mut self) -> u32 {
            u32::MAX
        }

        fn next_u64(&mut self) -> u64 {
            u64::MAX
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0xFF);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    #[test]
    fn test_largest_draw_keeps_skew_below_upper_bound() {
        let b = resolver().resolve(&mut SaturatedRng, 10.0, 22.0);

        assert_eq!(b.shape, BuildingShape::Rhomboid);
        assert!(b.skew >= 0.15 * b.width, "{b:?}");
        assert!(b.skew < 0.35 * b.width, "{b:?}");
    }

    #[test]
    fn test_skew_for_is_half_open() {
        for width in [MIN_VIABLE_EXTENT, 1.0, 7.3, 10.0, 22.0] {
            assert_eq!(skew_for(width, 0.0), 0.15 * width);
            assert!(skew_for(width, 1.0 - f32::EPSILON / 2.0) < 0.35 * width);
            assert!(skew_for(width, 1.0) < 0.35 * width);
        }
    }

    #[test]
    fn test_narrow_lane_rectangles_are_visibly_rectangular() {
        // Four lanes in a default block: depth always has room to grow.
        let r = resolver();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        for _ in 0..1000 {
            let b = r.resolve(&mut rng, 4.375, 22.0);
            if b.shape != BuildingShape::Square {
                assert!((b.width - b.depth).abs() >= 2.0, "{b:?}");
            }
        }
    }

    #[test]
    fn test_nudge_respects_bounds() {
        let r = resolver();
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        for _ in 0..1000 {
            let b = r.resolve(&mut rng, 10.0, 9.0);
            assert!(b.width <= 10.0);
            assert!(b.depth <= 9.0);
        }
    }

    #[test]
    fn test_degenerate_slot_is_clamped() {
        let r = resolver();
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        for _ in 0..200 {
            let b = r.resolve(&mut rng, -3.0, 0.0);
            assert!(b.is_valid(), "{b:?}");
            assert!(b.width >= MIN_VIABLE_EXTENT);
            assert!(b.depth >= MIN_VIABLE_EXTENT);
            assert!(b.width <= MIN_VIABLE_EXTENT + 1e-6);
        }
    }

    #[test]
    fn test_inverted_range_collapses_to_upper_bound() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for _ in 0..10 {
            assert_eq!(draw_range(&mut rng, 4.0, 2.0), 2.0);
            assert_eq!(draw_coordinate(&mut rng, 7.0, 3.0), 3.0);
        }
    }
}
