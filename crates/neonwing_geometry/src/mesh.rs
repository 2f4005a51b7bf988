//! Vertex format and mesh buffers.
//!
//! Everything here is plain data. The render collaborator reinterprets
//! `vertices` as bytes with `bytemuck` and uploads them as-is.

use bytemuck::{Pod, Zeroable};
use neonwing_shared::Vec3;

// =============================================================================
// VERTEX FORMAT - Standard vertex buffer layout
// =============================================================================

/// Vertex for city meshes - packed for GPU upload
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct CityVertex {
    /// Position in mesh-local space [x, y, z]
    pub position: [f32; 3],
    /// Face normal [nx, ny, nz]
    pub normal: [f32; 3],
    /// Linear RGBA color
    pub color: [f32; 4],
}

impl CityVertex {
    /// Size of one vertex in bytes.
    pub const STRIDE: usize = std::mem::size_of::<Self>();
}

// =============================================================================
// MESH OUTPUT - Final mesh ready for upload
// =============================================================================

/// Complete mesh data (vertices + indices).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    /// Vertex buffer data
    pub vertices: Vec<CityVertex>,
    /// Index buffer data, three per triangle, counter-clockwise front faces
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Creates an empty mesh with room for `quads` quads.
    #[must_use]
    pub fn with_quad_capacity(quads: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(quads * 4),
            indices: Vec::with_capacity(quads * 6),
        }
    }

    /// Check if mesh is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Get triangle count
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get vertex count
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Vertex positions, in buffer order.
    pub fn positions(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.vertices.iter().map(|v| v.position)
    }

    /// Per-vertex colors, in buffer order.
    pub fn colors(&self) -> impl Iterator<Item = [f32; 4]> + '_ {
        self.vertices.iter().map(|v| v.color)
    }

    /// Raw vertex bytes for upload.
    #[must_use]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Returns true if every position is finite and every index is in range.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        let count = self.vertices.len() as u32;
        self.indices.len() % 3 == 0
            && self.indices.iter().all(|&i| i < count)
            && self
                .vertices
                .iter()
                .all(|v| Vec3::from_array(v.position).is_finite())
    }

    /// Appends a planar quad.
    ///
    /// Corners go around the quad; the front face is the side from which
    /// they appear counter-clockwise. The normal is derived from the corners.
    pub fn push_quad(&mut self, corners: [Vec3; 4], color: [f32; 4]) {
        let [v0, v1, _, v3] = corners;
        let normal = (v1 - v0)
            .cross(v3 - v0)
            .try_normalize()
            .unwrap_or(Vec3::Y)
            .to_array();

        let base_idx = self.vertices.len() as u32;
        for corner in corners {
            self.vertices.push(CityVertex {
                position: corner.to_array(),
                normal,
                color,
            });
        }
        self.indices.extend_from_slice(&[
            base_idx,
            base_idx + 1,
            base_idx + 2,
            base_idx,
            base_idx + 2,
            base_idx + 3,
        ]);
    }

    /// Appends a thin neon strip along the segment `start -> end`.
    ///
    /// The strip is `2 * half_thickness` wide, spanned by the segment and the
    /// direction perpendicular to both the segment and up. Vertical segments
    /// fall back to the direction perpendicular to the segment and forward.
    /// Zero-length segments are skipped.
    pub fn push_edge_strip(&mut self, start: Vec3, end: Vec3, half_thickness: f32, color: [f32; 4]) {
        let Some(dir) = (end - start).try_normalize() else {
            return;
        };
        let side = dir
            .cross(Vec3::Y)
            .try_normalize()
            .or_else(|| dir.cross(Vec3::Z).try_normalize())
            .unwrap_or(Vec3::X);
        let offset = side * half_thickness;

        self.push_quad(
            [start - offset, start + offset, end + offset, end - offset],
            color,
        );
    }

    /// Appends another mesh, rebasing its indices.
    pub fn append(&mut self, other: &Self) {
        let base_idx = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base_idx));
    }
}
