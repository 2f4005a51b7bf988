//! Trench road mesh construction.
//!
//! Road-local space: the floor is a `width x length` rectangle at `y = 0`
//! centered on the origin, `length` running along Z. Side walls climb to
//! `y = depth` while leaning outward, and four neon strips trace the rim.
//!
//! ```text
//!        rim            rim
//!   ──────┐            ┌──────   y = depth
//!          \          /
//!           \________/           y = 0
//!             width
//! ```

use neonwing_shared::{RoadPalette, Vec3};

use crate::mesh::MeshData;

/// Height of the rim strips above the wall tops, against z-fighting.
pub const RIM_LIFT: f32 = 0.02;

/// Quads per road: floor + 2 walls + 4 rim strips.
const QUADS_PER_ROAD: usize = 7;

/// Trench shape and colors shared by every road.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoadStyle {
    /// How far the floor sits below the building ground plane.
    pub depth: f32,
    /// Wall angle in degrees; 90 gives vertical walls.
    pub side_angle_degrees: f32,
    /// Full width of a rim strip.
    pub edge_thickness: f32,
    /// Floor, wall and rim colors.
    pub palette: RoadPalette,
}

impl Default for RoadStyle {
    fn default() -> Self {
        Self {
            depth: 1.5,
            side_angle_degrees: 75.0,
            edge_thickness: 0.15,
            palette: RoadPalette::default(),
        }
    }
}

impl RoadStyle {
    /// Horizontal distance each wall top sits outside the floor edge:
    /// `depth * tan(90° - side_angle)`.
    #[must_use]
    pub fn side_offset(&self) -> f32 {
        self.depth * (90.0 - self.side_angle_degrees).to_radians().tan()
    }
}

/// Builds trench road meshes.
#[derive(Clone, Copy, Debug, Default)]
pub struct RoadMesher {
    style: RoadStyle,
}

impl RoadMesher {
    /// Creates a mesher with the given style.
    #[must_use]
    pub const fn new(style: RoadStyle) -> Self {
        Self { style }
    }

    /// Returns the style.
    #[must_use]
    pub const fn style(&self) -> &RoadStyle {
        &self.style
    }

    /// Four rim corners (before the lift), running
    /// `(-x,-z) -> (-x,+z) -> (+x,+z) -> (+x,-z)`.
    #[must_use]
    pub fn rim_corners(&self, width: f32, length: f32) -> [Vec3; 4] {
        let outer = width * 0.5 + self.style.side_offset();
        let hl = length * 0.5;
        let y = self.style.depth;
        [
            Vec3::new(-outer, y, -hl),
            Vec3::new(-outer, y, hl),
            Vec3::new(outer, y, hl),
            Vec3::new(outer, y, -hl),
        ]
    }

    /// Builds floor, both walls and the rim loop.
    #[must_use]
    pub fn build(&self, width: f32, length: f32) -> MeshData {
        let mut mesh = MeshData::with_quad_capacity(QUADS_PER_ROAD);
        let palette = &self.style.palette;
        let hw = width * 0.5;
        let hl = length * 0.5;

        // Floor, facing up
        mesh.push_quad(
            [
                Vec3::new(-hw, 0.0, -hl),
                Vec3::new(-hw, 0.0, hl),
                Vec3::new(hw, 0.0, hl),
                Vec3::new(hw, 0.0, -hl),
            ],
            palette.surface.to_array(),
        );

        // Walls, facing into the trench
        let [r0, r1, r2, r3] = self.rim_corners(width, length);
        mesh.push_quad(
            [Vec3::new(-hw, 0.0, -hl), r0, r1, Vec3::new(-hw, 0.0, hl)],
            palette.side.to_array(),
        );
        mesh.push_quad(
            [Vec3::new(hw, 0.0, hl), r2, r3, Vec3::new(hw, 0.0, -hl)],
            palette.side.to_array(),
        );

        // Rim loop
        let lift = Vec3::new(0.0, RIM_LIFT, 0.0);
        let rim = [r0 + lift, r1 + lift, r2 + lift, r3 + lift];
        let half = self.style.edge_thickness * 0.5;
        for i in 0..4 {
            mesh.push_edge_strip(rim[i], rim[(i + 1) % 4], half, palette.line.to_array());
        }

        mesh
    }
}
