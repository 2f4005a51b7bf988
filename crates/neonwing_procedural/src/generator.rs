//! Chunk generation: plan, then mesh.

use neonwing_geometry::{RoadMesher, TowerMesher};
use tracing::debug;

use crate::chunk::{BuildingEntity, Chunk, ChunkIndex, RoadEntity};
use crate::config::CityConfig;
use crate::error::ConfigResult;
use crate::layout::CityPlanner;
use crate::roads::plan_roads;

/// Produces complete chunks: planned buildings and roads plus their meshes.
///
/// Stateless between calls; `generate` is a pure function of the index.
#[derive(Clone, Debug)]
pub struct ChunkGenerator {
    planner: CityPlanner,
    towers: TowerMesher,
    roads: RoadMesher,
}

impl ChunkGenerator {
    /// Creates a generator.
    ///
    /// # Errors
    ///
    /// Returns the validation error if `config` is unusable.
    pub fn new(config: CityConfig) -> ConfigResult<Self> {
        let towers = TowerMesher::new(config.tower_style());
        let roads = RoadMesher::new(config.road_style());
        Ok(Self {
            planner: CityPlanner::new(config)?,
            towers,
            roads,
        })
    }

    /// The planner behind this generator.
    #[must_use]
    pub const fn planner(&self) -> &CityPlanner {
        &self.planner
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &CityConfig {
        self.planner.config()
    }

    /// Generates chunk `index` from scratch.
    #[must_use]
    pub fn generate(&self, index: ChunkIndex) -> Chunk {
        let config = self.planner.config();

        let buildings: Vec<BuildingEntity> = self
            .planner
            .plan_chunk(index)
            .into_iter()
            .flat_map(|block| block.buildings)
            .map(|placement| BuildingEntity {
                mesh: self.towers.build(&placement.building),
                placement,
            })
            .collect();

        let roads: Vec<RoadEntity> = plan_roads(config, index)
            .into_iter()
            .map(|segment| RoadEntity {
                mesh: self.roads.build(segment.width, segment.length),
                segment,
            })
            .collect();

        let chunk = Chunk::new(index, config.chunk_size, buildings, roads);
        debug!(
            chunk = index.0,
            buildings = chunk.building_count(),
            roads = chunk.road_count(),
            vertices = chunk.vertex_count(),
            "Chunk generated"
        );
        chunk
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neonwing_geometry::EDGE_COUNT;

    #[test]
    fn test_generated_meshes_match_descriptors() {
        let generator = ChunkGenerator::new(CityConfig::default()).unwrap();
        let chunk = generator.generate(ChunkIndex(0));

        assert!(chunk.building_count() > 0);
        for entity in chunk.buildings() {
            assert_eq!(entity.mesh.vertex_count(), (6 + EDGE_COUNT) * 4);
            assert!(entity.mesh.is_well_formed());
            let neon = entity.placement.building.color.rgba();
            assert_eq!(entity.mesh.vertices.last().map(|v| v.color), Some(neon));
        }
        for entity in chunk.roads() {
            assert_eq!(entity.mesh.vertex_count(), 28);
        }
    }

    #[test]
    fn test_bounds_cover_towers_and_trenches() {
        let config = CityConfig::default();
        let generator = ChunkGenerator::new(config.clone()).unwrap();
        let chunk = generator.generate(ChunkIndex(5));
        let bounds = chunk.bounds();

        assert_eq!(bounds.min.y, -config.road_depth);
        let tallest = chunk
            .placements()
            .map(|p| p.building.height)
            .fold(0.0_f32, f32::max);
        assert_eq!(bounds.max.y, tallest);
        assert!(bounds.min.z <= 500.0);
        assert!(bounds.max.z >= 600.0);
    }

    #[test]
    fn test_generate_is_repeatable() {
        let generator = ChunkGenerator::new(CityConfig::default()).unwrap();
        let a = generator.generate(ChunkIndex(-6));
        let b = generator.generate(ChunkIndex(-6));

        assert_eq!(a.building_count(), b.building_count());
        for (x, y) in a.buildings().iter().zip(b.buildings()) {
            assert_eq!(x.placement, y.placement);
            assert_eq!(x.mesh, y.mesh);
        }
    }
}
