//! Road layout.
//!
//! Roads fill the gaps of the block grid and depend on nothing but the
//! grid parameters, so they are never seeded. Each chunk owns:
//!
//! - one cross road after every block row, spanning all columns plus one
//!   road width;
//! - one avenue per inter-column gap, running the full chunk length.
//!
//! Road origins sit at `y = -road_depth` so the trench rim lands on the
//! building ground plane.
//!
//! ## Intersections
//!
//! Avenues are not split at cross roads. Where two trenches meet, their
//! floors share the plane `y = -road_depth` and each road's walls and rim
//! pass through the other trench. Renderers that care should draw road
//! floors with a depth bias or skip the overlap; segment counts stay at
//! `rows + columns - 1` per chunk either way.

use neonwing_shared::{RoadOrientation, RoadSegment, Vec3};

use crate::chunk::ChunkIndex;
use crate::config::CityConfig;
use crate::layout::GridLayout;

/// Lays out the roads of chunk `index`.
///
/// Returns nothing when `road_width` is zero.
#[must_use]
pub fn plan_roads(config: &CityConfig, index: ChunkIndex) -> Vec<RoadSegment> {
    let grid = GridLayout::from_config(config);
    if grid.road_width <= 0.0 {
        return Vec::new();
    }

    let origin_z = index.origin_z(config.chunk_size);
    let half_gap = grid.road_width * 0.5;
    let y = -config.road_depth;
    let avenues = grid.columns.saturating_sub(1);
    let mut roads = Vec::with_capacity((grid.rows + avenues) as usize);

    for row in 0..grid.rows {
        let z = origin_z + row as f32 * grid.stride() + grid.block_size + half_gap;
        roads.push(RoadSegment {
            width: grid.road_width,
            length: grid.total_width + grid.road_width,
            orientation: RoadOrientation::Horizontal,
            position: Vec3::new(0.0, y, z),
        });
    }

    for col in 0..avenues {
        let x = grid.start_x() + col as f32 * grid.stride() + grid.block_size + half_gap;
        roads.push(RoadSegment {
            width: grid.road_width,
            length: config.chunk_size,
            orientation: RoadOrientation::Vertical,
            position: Vec3::new(x, y, origin_z + config.chunk_size * 0.5),
        });
    }

    roads
}
