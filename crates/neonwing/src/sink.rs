//! Geometry consumers.
//!
//! The renderer receives every generated chunk by reference and every
//! retired chunk by value. Once `release` returns, the chunk and all of
//! its building and road meshes are gone.

use std::collections::HashMap;

use neonwing_geometry::CityVertex;
use neonwing_procedural::{Chunk, ChunkIndex};
use tracing::trace;

/// Receives chunk geometry from the flight loop.
pub trait GeometrySink {
    /// A chunk entered the window; its meshes are ready to upload.
    fn upload(&mut self, chunk: &Chunk);

    /// A chunk left the window. Dropping it releases every owned mesh.
    fn release(&mut self, chunk: Chunk);
}

/// Tracks how much mesh data the renderer would have resident.
#[derive(Debug, Default)]
pub struct MeshBudgetSink {
    resident: HashMap<ChunkIndex, (usize, usize)>,
    resident_vertices: usize,
    resident_triangles: usize,
    peak_vertices: usize,
    uploads: u64,
    releases: u64,
}

impl MeshBudgetSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Vertices currently resident.
    #[must_use]
    pub const fn resident_vertices(&self) -> usize {
        self.resident_vertices
    }

    /// Triangles currently resident.
    #[must_use]
    pub const fn resident_triangles(&self) -> usize {
        self.resident_triangles
    }

    /// Vertex buffer bytes currently resident.
    #[must_use]
    pub const fn resident_vertex_bytes(&self) -> usize {
        self.resident_vertices * CityVertex::STRIDE
    }

    /// Highest resident vertex count seen.
    #[must_use]
    pub const fn peak_vertices(&self) -> usize {
        self.peak_vertices
    }

    /// Chunks currently resident.
    #[must_use]
    pub fn resident_chunks(&self) -> usize {
        self.resident.len()
    }

    /// Returns true if `index` is resident.
    #[must_use]
    pub fn is_resident(&self, index: ChunkIndex) -> bool {
        self.resident.contains_key(&index)
    }

    /// Total uploads received.
    #[must_use]
    pub const fn uploads(&self) -> u64 {
        self.uploads
    }

    /// Total releases received.
    #[must_use]
    pub const fn releases(&self) -> u64 {
        self.releases
    }

    fn forget(&mut self, index: ChunkIndex) {
        if let Some((vertices, triangles)) = self.resident.remove(&index) {
            self.resident_vertices -= vertices;
            self.resident_triangles -= triangles;
        }
    }
}

impl GeometrySink for MeshBudgetSink {
    fn upload(&mut self, chunk: &Chunk) {
        self.forget(chunk.index());

        let vertices = chunk.vertex_count();
        let triangles = chunk.triangle_count();
        self.resident.insert(chunk.index(), (vertices, triangles));
        self.resident_vertices += vertices;
        self.resident_triangles += triangles;
        self.peak_vertices = self.peak_vertices.max(self.resident_vertices);
        self.uploads += 1;

        trace!(chunk = chunk.index().0, vertices, triangles, "Chunk uploaded");
    }

    fn release(&mut self, chunk: Chunk) {
        self.forget(chunk.index());
        self.releases += 1;
        trace!(chunk = chunk.index().0, "Chunk released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neonwing_procedural::{ChunkGenerator, CityConfig};

    #[test]
    fn test_upload_then_release_balances() {
        let generator = ChunkGenerator::new(CityConfig::default()).unwrap();
        let chunk = generator.generate(ChunkIndex(2));
        let vertices = chunk.vertex_count();

        let mut sink = MeshBudgetSink::new();
        sink.upload(&chunk);
        assert_eq!(sink.resident_vertices(), vertices);
        assert_eq!(sink.resident_vertex_bytes(), vertices * 40);
        assert!(sink.is_resident(ChunkIndex(2)));

        sink.release(chunk);
        assert_eq!(sink.resident_vertices(), 0);
        assert_eq!(sink.resident_triangles(), 0);
        assert_eq!(sink.peak_vertices(), vertices);
        assert_eq!(sink.resident_chunks(), 0);
    }

    #[test]
    fn test_double_upload_is_not_double_counted() {
        let generator = ChunkGenerator::new(CityConfig::default()).unwrap();
        let chunk = generator.generate(ChunkIndex(0));

        let mut sink = MeshBudgetSink::new();
        sink.upload(&chunk);
        sink.upload(&chunk);
        assert_eq!(sink.resident_vertices(), chunk.vertex_count());
        assert_eq!(sink.uploads(), 2);
    }
}
