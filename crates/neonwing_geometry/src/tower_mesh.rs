//! Tower mesh construction.
//!
//! A tower is a closed six-face box in near-black plus twelve neon strips,
//! one per box edge. The mesh origin is the center of the footprint at
//! ground level; the top face of a rhomboid is shifted by `skew` along +X.

use neonwing_shared::{Building, Rgba, Vec3};

use crate::mesh::MeshData;

/// Number of neon edge strips per tower (4 bottom, 4 top, 4 vertical).
pub const EDGE_COUNT: usize = 12;

/// Distance the neon strips sit outside the box, against z-fighting.
pub const EDGE_LIFT: f32 = 0.02;

/// Quads per tower: 6 box faces + one per edge.
const QUADS_PER_TOWER: usize = 6 + EDGE_COUNT;

/// Visual parameters shared by every tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerStyle {
    /// Full width of an edge strip.
    pub line_thickness: f32,
    /// Box fill color.
    pub fill: Rgba,
}

impl Default for TowerStyle {
    fn default() -> Self {
        Self {
            line_thickness: 0.2,
            fill: Rgba::BUILDING_FILL,
        }
    }
}

/// Builds tower meshes from [`Building`] descriptors.
#[derive(Clone, Copy, Debug, Default)]
pub struct TowerMesher {
    style: TowerStyle,
}

impl TowerMesher {
    /// Creates a mesher with the given style.
    #[must_use]
    pub const fn new(style: TowerStyle) -> Self {
        Self { style }
    }

    /// Returns the style.
    #[must_use]
    pub const fn style(&self) -> &TowerStyle {
        &self.style
    }

    /// Eight logical corners: bottom ring `[0..4]`, top ring `[4..8]`.
    ///
    /// Both rings run `(-x,-z) -> (+x,-z) -> (+x,+z) -> (-x,+z)`.
    #[must_use]
    pub fn corners(building: &Building) -> [Vec3; 8] {
        let hw = building.width * 0.5;
        let hd = building.depth * 0.5;
        let lift = Vec3::new(building.top_offset(), building.height, 0.0);

        let b0 = Vec3::new(-hw, 0.0, -hd);
        let b1 = Vec3::new(hw, 0.0, -hd);
        let b2 = Vec3::new(hw, 0.0, hd);
        let b3 = Vec3::new(-hw, 0.0, hd);

        [b0, b1, b2, b3, b0 + lift, b1 + lift, b2 + lift, b3 + lift]
    }

    /// Corner rings the neon strips run along.
    ///
    /// Each corner moves `EDGE_LIFT` away from the box on every axis, so no
    /// strip shares a plane with a fill face.
    #[must_use]
    pub fn edge_rings(building: &Building) -> ([Vec3; 4], [Vec3; 4]) {
        let [b0, b1, b2, b3, t0, t1, t2, t3] = Self::corners(building);
        let e = EDGE_LIFT;
        let signs = [(-e, -e), (e, -e), (e, e), (-e, e)];

        let lift = |ring: [Vec3; 4], dy: f32| -> [Vec3; 4] {
            std::array::from_fn(|i| {
                let (dx, dz) = signs[i];
                ring[i] + Vec3::new(dx, dy, dz)
            })
        };
        (lift([b0, b1, b2, b3], -e), lift([t0, t1, t2, t3], e))
    }

    /// Builds the full tower mesh: 24 box vertices then 12 edge strips.
    #[must_use]
    pub fn build(&self, building: &Building) -> MeshData {
        let mut mesh = MeshData::with_quad_capacity(QUADS_PER_TOWER);
        let [b0, b1, b2, b3, t0, t1, t2, t3] = Self::corners(building);
        let fill = self.style.fill.to_array();

        // Box faces, wound counter-clockwise seen from outside
        mesh.push_quad([b0, b1, b2, b3], fill); // bottom
        mesh.push_quad([t0, t3, t2, t1], fill); // top
        mesh.push_quad([b0, t0, t1, b1], fill); // front (-Z)
        mesh.push_quad([b2, t2, t3, b3], fill); // back (+Z)
        mesh.push_quad([b1, t1, t2, b2], fill); // right (+X)
        mesh.push_quad([b3, t3, t0, b0], fill); // left (-X)

        let neon = building.color.rgba();
        let half = self.style.line_thickness * 0.5;
        let (bottom, top) = Self::edge_rings(building);

        for i in 0..4 {
            let next = (i + 1) % 4;
            mesh.push_edge_strip(bottom[i], bottom[next], half, neon);
        }
        for i in 0..4 {
            let next = (i + 1) % 4;
            mesh.push_edge_strip(top[i], top[next], half, neon);
        }
        for i in 0..4 {
            mesh.push_edge_strip(bottom[i], top[i], half, neon);
        }

        mesh
    }
}
