//! # Chunk System
//!
//! The city is cut into fixed-length slices along the travel axis. A
//! [`Chunk`] owns every building and road generated for its slice,
//! together with their mesh buffers; dropping the chunk releases all of
//! them at once.
//!
//! ## Indexing
//!
//! `index = floor(world_z / chunk_size)`, so chunk `k` covers
//! `[k * chunk_size, (k + 1) * chunk_size)` and negative indices lie
//! behind the start line.

use std::fmt;

use neonwing_geometry::MeshData;
use neonwing_shared::{Aabb, RoadSegment, Vec3};

use crate::layout::PlacedBuilding;

/// Identifies a chunk along the travel axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkIndex(pub i32);

impl ChunkIndex {
    /// Creates a new chunk index.
    #[inline]
    #[must_use]
    pub const fn new(index: i32) -> Self {
        Self(index)
    }

    /// Chunk containing `world_z`.
    ///
    /// Returns `None` if the position is not finite or its chunk lies
    /// outside the `i32` range.
    #[inline]
    #[must_use]
    pub fn from_world_z(world_z: f32, chunk_size: f32) -> Option<Self> {
        // i32::MIN and -i32::MIN are both exact in f32
        const LIMIT: f32 = 2_147_483_648.0;

        let index = (world_z / chunk_size).floor();
        if index.is_finite() && (-LIMIT..LIMIT).contains(&index) {
            Some(Self(index as i32))
        } else {
            None
        }
    }

    /// World Z of the chunk's leading edge.
    #[inline]
    #[must_use]
    pub fn origin_z(self, chunk_size: f32) -> f32 {
        self.0 as f32 * chunk_size
    }

    /// Index `delta` chunks away, saturating at the `i32` range.
    #[inline]
    #[must_use]
    pub const fn offset(self, delta: i32) -> Self {
        Self(self.0.saturating_add(delta))
    }
}

impl fmt::Display for ChunkIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chunk[{}]", self.0)
    }
}

/// A placed building and its mesh in building-local space.
#[derive(Clone, Debug)]
pub struct BuildingEntity {
    /// Placement and shape.
    pub placement: PlacedBuilding,
    /// Box + neon edges, origin at the footprint center.
    pub mesh: MeshData,
}

/// A road segment and its mesh in road-local space.
#[derive(Clone, Debug)]
pub struct RoadEntity {
    /// Layout of the trench.
    pub segment: RoadSegment,
    /// Floor, walls and rim, before the segment's yaw is applied.
    pub mesh: MeshData,
}

/// One generated slice of the city.
#[derive(Clone, Debug)]
pub struct Chunk {
    index: ChunkIndex,
    origin: Vec3,
    buildings: Vec<BuildingEntity>,
    roads: Vec<RoadEntity>,
    bounds: Aabb,
}

impl Chunk {
    /// Assembles a chunk from its generated entities.
    ///
    /// `length` is the chunk size along Z; the bounds always span it.
    #[must_use]
    pub fn new(
        index: ChunkIndex,
        length: f32,
        buildings: Vec<BuildingEntity>,
        roads: Vec<RoadEntity>,
    ) -> Self {
        let origin = Vec3::new(0.0, 0.0, index.origin_z(length));
        let mut bounds = Aabb::EMPTY;
        bounds.include(origin);
        bounds.include(origin + Vec3::new(0.0, 0.0, length));

        for entity in &buildings {
            let footprint = entity.placement.footprint();
            let building = &entity.placement.building;
            let top = Vec3::new(building.top_offset(), building.height, 0.0);
            for (x, z) in [
                (footprint.min_x, footprint.min_z),
                (footprint.max_x, footprint.max_z),
            ] {
                let base = Vec3::new(x, 0.0, z);
                bounds.include(base);
                bounds.include(base + top);
            }
        }

        for entity in &roads {
            let segment = &entity.segment;
            let (sx, sz) = segment.world_extent();
            let half = Vec3::new(sx * 0.5, 0.0, sz * 0.5);
            bounds.include(segment.position - half);
            bounds.include(segment.position + half + Vec3::new(0.0, -segment.position.y, 0.0));
        }

        Self {
            index,
            origin,
            buildings,
            roads,
            bounds,
        }
    }

    /// Index of this chunk.
    #[inline]
    #[must_use]
    pub const fn index(&self) -> ChunkIndex {
        self.index
    }

    /// World-space origin `(0, 0, index * chunk_size)`.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Buildings owned by this chunk.
    #[must_use]
    pub fn buildings(&self) -> &[BuildingEntity] {
        &self.buildings
    }

    /// Roads owned by this chunk.
    #[must_use]
    pub fn roads(&self) -> &[RoadEntity] {
        &self.roads
    }

    /// Number of buildings.
    #[must_use]
    pub fn building_count(&self) -> usize {
        self.buildings.len()
    }

    /// Number of road segments.
    #[must_use]
    pub fn road_count(&self) -> usize {
        self.roads.len()
    }

    /// World-space box around everything in the chunk, from the trench
    /// floors up to the tallest tower top.
    #[must_use]
    pub const fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Total vertices across all owned meshes.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        let buildings: usize = self.buildings.iter().map(|b| b.mesh.vertex_count()).sum();
        let roads: usize = self.roads.iter().map(|r| r.mesh.vertex_count()).sum();
        buildings + roads
    }

    /// Total triangles across all owned meshes.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        let buildings: usize = self.buildings.iter().map(|b| b.mesh.triangle_count()).sum();
        let roads: usize = self.roads.iter().map(|r| r.mesh.triangle_count()).sum();
        buildings + roads
    }

    /// Placements only, without meshes.
    pub fn placements(&self) -> impl Iterator<Item = &PlacedBuilding> {
        self.buildings.iter().map(|b| &b.placement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_from_world_z() {
        assert_eq!(ChunkIndex::from_world_z(0.0, 100.0), Some(ChunkIndex(0)));
        assert_eq!(ChunkIndex::from_world_z(99.9, 100.0), Some(ChunkIndex(0)));
        assert_eq!(ChunkIndex::from_world_z(105.0, 100.0), Some(ChunkIndex(1)));
        assert_eq!(ChunkIndex::from_world_z(-0.1, 100.0), Some(ChunkIndex(-1)));
        assert_eq!(ChunkIndex::from_world_z(-200.0, 100.0), Some(ChunkIndex(-2)));
    }

    #[test]
    fn test_non_finite_position() {
        assert_eq!(ChunkIndex::from_world_z(f32::NAN, 100.0), None);
        assert_eq!(ChunkIndex::from_world_z(f32::INFINITY, 100.0), None);
    }

    #[test]
    fn test_out_of_range_position() {
        assert_eq!(ChunkIndex::from_world_z(1.0e12, 100.0), None);
        assert_eq!(ChunkIndex::from_world_z(-1.0e12, 100.0), None);
        assert_eq!(
            ChunkIndex::from_world_z(-2_147_483_648.0, 1.0),
            Some(ChunkIndex(i32::MIN))
        );
    }

    #[test]
    fn test_offset_saturates() {
        assert_eq!(ChunkIndex(i32::MAX).offset(5), ChunkIndex(i32::MAX));
        assert_eq!(ChunkIndex(3).offset(-5), ChunkIndex(-2));
    }

    #[test]
    fn test_empty_chunk_bounds_span_slice() {
        let chunk = Chunk::new(ChunkIndex(3), 100.0, Vec::new(), Vec::new());
        assert_eq!(chunk.origin(), Vec3::new(0.0, 0.0, 300.0));
        assert_eq!(chunk.bounds().min.z, 300.0);
        assert_eq!(chunk.bounds().max.z, 400.0);
        assert_eq!(chunk.vertex_count(), 0);
        assert_eq!(ChunkIndex(3).to_string(), "chunk[3]");
    }
}
