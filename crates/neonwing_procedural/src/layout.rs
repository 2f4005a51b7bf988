//! # Grid Layout Planner
//!
//! Lays a chunk out as a fixed grid of square blocks and fills the blocks
//! with building slots.
//!
//! ## Grid
//!
//! ```text
//!        x = -total/2                               x = +total/2
//!   z0   ┌──────┐ road ┌──────┐ road ┌──────┐ road ┌──────┐
//!        │ 0,0  │      │ 0,1  │      │ 0,2  │      │ 0,3  │
//!        └──────┘      └──────┘      └──────┘      └──────┘
//!          road           road          road          road
//!   z0+s ┌──────┐      ┌──────┐      ┌──────┐      ┌──────┐
//!        │ 1,0  │      │ 1,1  │      ...
//! ```
//!
//! Rows advance along +Z with stride `block_size + road_width`; columns are
//! centered on `x = 0`.
//!
//! ## Lanes
//!
//! A block with `n` buildings splits its padded interior into `n` equal
//! lanes separated by `building_spacing`. A building never exceeds its
//! lane, so siblings cannot overlap.
//!
//! ## Draw Order
//!
//! Row-major over blocks: density, then `buildings_wide`, then for each
//! slot the resolver's draws followed by the slot's Z position.

use neonwing_shared::{Building, Footprint, Vec3};
use rand::Rng;
use tracing::{trace, warn};

use crate::chunk::ChunkIndex;
use crate::config::CityConfig;
use crate::error::ConfigResult;
use crate::resolver::{draw_coordinate, BuildingResolver};
use crate::seed::ChunkSeed;
use crate::MIN_VIABLE_EXTENT;

/// Most buildings a single block can be split into.
pub const MAX_BUILDINGS_PER_BLOCK: usize = 4;

/// Fixed grid geometry of every chunk.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    /// Block rows per chunk.
    pub rows: u32,
    /// Block columns per row.
    pub columns: u32,
    /// Block edge length.
    pub block_size: f32,
    /// Gap between blocks.
    pub road_width: f32,
    /// Chunk length along Z.
    pub chunk_size: f32,
    /// Width of all columns plus the roads between them.
    pub total_width: f32,
}

impl GridLayout {
    /// Derives the grid from a config.
    #[must_use]
    pub fn from_config(config: &CityConfig) -> Self {
        let stride = config.block_stride();
        #[allow(clippy::cast_sign_loss)]
        let rows = (config.chunk_size / stride).floor() as u32;
        let columns = config.blocks_per_row;
        let total_width =
            columns as f32 * config.block_size + columns.saturating_sub(1) as f32 * config.road_width;

        Self {
            rows,
            columns,
            block_size: config.block_size,
            road_width: config.road_width,
            chunk_size: config.chunk_size,
            total_width,
        }
    }

    /// Distance between the leading edges of neighbouring blocks.
    #[inline]
    #[must_use]
    pub fn stride(&self) -> f32 {
        self.block_size + self.road_width
    }

    /// X of the left edge of column 0.
    #[inline]
    #[must_use]
    pub fn start_x(&self) -> f32 {
        -self.total_width * 0.5
    }

    /// Number of blocks per chunk.
    #[inline]
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    /// World-space rectangle of block `(row, col)` in chunk `index`.
    #[must_use]
    pub fn block_bounds(&self, index: ChunkIndex, row: u32, col: u32) -> Footprint {
        let min_x = self.start_x() + col as f32 * self.stride();
        let min_z = index.origin_z(self.chunk_size) + row as f32 * self.stride();
        Footprint {
            min_x,
            max_x: min_x + self.block_size,
            min_z,
            max_z: min_z + self.block_size,
        }
    }
}

/// One building placed in the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedBuilding {
    /// Shape descriptor.
    pub building: Building,
    /// World-space center of the footprint at ground level.
    pub position: Vec3,
    /// Block row within the chunk.
    pub row: u32,
    /// Block column.
    pub col: u32,
    /// Lane within the block.
    pub lane: u8,
}

impl PlacedBuilding {
    /// Axis-aligned footprint, ignoring rhomboid skew.
    #[must_use]
    pub fn footprint(&self) -> Footprint {
        Footprint::centered(
            self.position.x,
            self.position.z,
            self.building.width,
            self.building.depth,
        )
    }
}

/// A building-bearing block.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockPlan {
    /// Block row within the chunk.
    pub row: u32,
    /// Block column.
    pub col: u32,
    /// Full block rectangle.
    pub bounds: Footprint,
    /// Block rectangle inset by the padding; every footprint lies inside.
    pub interior: Footprint,
    /// Buildings, one per lane, left to right.
    pub buildings: Vec<PlacedBuilding>,
}

/// Plans the blocks and buildings of a chunk.
///
/// Holds no RNG: every call to [`Self::plan_chunk`] builds a fresh one.
#[derive(Clone, Debug)]
pub struct CityPlanner {
    config: CityConfig,
    grid: GridLayout,
    resolver: BuildingResolver,
    /// Lane width for 1..=4 buildings, already clamped.
    lane_widths: [f32; MAX_BUILDINGS_PER_BLOCK],
    max_depth: f32,
}

impl CityPlanner {
    /// Creates a planner.
    ///
    /// # Errors
    ///
    /// Returns the validation error if `config` is unusable.
    pub fn new(config: CityConfig) -> ConfigResult<Self> {
        config.validate()?;

        let grid = GridLayout::from_config(&config);
        let raw_interior = config.block_size - 2.0 * config.building_padding;
        let interior = raw_interior.max(MIN_VIABLE_EXTENT);

        let mut lane_widths = [0.0; MAX_BUILDINGS_PER_BLOCK];
        let mut clamped = raw_interior < MIN_VIABLE_EXTENT;
        for (i, width) in lane_widths.iter_mut().enumerate() {
            let n = (i + 1) as f32;
            let raw = (interior - (n - 1.0) * config.building_spacing) / n;
            clamped |= raw < MIN_VIABLE_EXTENT;
            *width = raw.max(MIN_VIABLE_EXTENT);
        }

        if clamped {
            warn!(
                block_size = config.block_size,
                padding = config.building_padding,
                spacing = config.building_spacing,
                ?lane_widths,
                "Lane widths clamped to {MIN_VIABLE_EXTENT}; buildings may touch their neighbours"
            );
        }

        Ok(Self {
            resolver: BuildingResolver::new(&config),
            grid,
            lane_widths,
            max_depth: interior,
            config,
        })
    }

    /// Configuration this planner was built with.
    #[must_use]
    pub const fn config(&self) -> &CityConfig {
        &self.config
    }

    /// Grid geometry.
    #[must_use]
    pub const fn grid(&self) -> &GridLayout {
        &self.grid
    }

    /// Lane width when a block holds `buildings_wide` buildings (1..=4).
    #[must_use]
    pub fn lane_width(&self, buildings_wide: usize) -> f32 {
        let i = buildings_wide.clamp(1, MAX_BUILDINGS_PER_BLOCK) - 1;
        self.lane_widths[i]
    }

    /// Deepest building a block can hold.
    #[must_use]
    pub const fn max_depth(&self) -> f32 {
        self.max_depth
    }

    /// Seed of chunk `index` under this city.
    #[must_use]
    pub const fn seed(&self, index: ChunkIndex) -> ChunkSeed {
        ChunkSeed::derive(index, self.config.city_seed)
    }

    /// Plans every building-bearing block of chunk `index`.
    ///
    /// Pure: the same index always yields the same plan.
    #[must_use]
    pub fn plan_chunk(&self, index: ChunkIndex) -> Vec<BlockPlan> {
        let mut rng = self.seed(index).rng();
        let mut blocks = Vec::with_capacity(self.grid.block_count());

        for row in 0..self.grid.rows {
            for col in 0..self.grid.columns {
                let density_draw: f32 = rng.gen();
                if density_draw >= self.config.building_density {
                    continue;
                }

                // u32 keeps the draw identical on 32- and 64-bit targets
                let buildings_wide = rng.gen_range(1..=MAX_BUILDINGS_PER_BLOCK as u32) as usize;
                blocks.push(self.plan_block(&mut rng, index, row, col, buildings_wide));
            }
        }

        trace!(chunk = index.0, blocks = blocks.len(), "Chunk planned");
        blocks
    }

    fn plan_block<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        index: ChunkIndex,
        row: u32,
        col: u32,
        buildings_wide: usize,
    ) -> BlockPlan {
        let pad = self.config.building_padding;
        let bounds = self.grid.block_bounds(index, row, col);
        let interior = Footprint {
            min_x: bounds.min_x + pad,
            max_x: bounds.max_x - pad,
            min_z: bounds.min_z + pad,
            max_z: bounds.max_z - pad,
        };

        let lane_width = self.lane_width(buildings_wide);
        let lane_stride = lane_width + self.config.building_spacing;
        let mut buildings = Vec::with_capacity(buildings_wide);

        for lane in 0..buildings_wide {
            let building = self.resolver.resolve(rng, lane_width, self.max_depth);
            let half_depth = building.depth * 0.5;
            let z = draw_coordinate(rng, interior.min_z + half_depth, interior.max_z - half_depth);
            let x = interior.min_x + lane as f32 * lane_stride + lane_width * 0.5;

            trace!(
                row,
                col,
                lane,
                shape = ?building.shape,
                color = ?building.color,
                width = building.width,
                depth = building.depth,
                height = building.height,
                "Building placed"
            );

            buildings.push(PlacedBuilding {
                building,
                position: Vec3::new(x, 0.0, z),
                row,
                col,
                lane: u8::try_from(lane).unwrap_or(u8::MAX),
            });
        }

        BlockPlan {
            row,
            col,
            bounds,
            interior,
            buildings,
        }
    }
}
