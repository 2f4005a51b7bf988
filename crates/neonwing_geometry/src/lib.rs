//! # NEONWING Geometry
//!
//! Mesh-data construction for the wireframe city.
//!
//! ## Design Principles
//!
//! 1. **Buffers only**: Output is vertex positions, normals, colors and
//!    triangle indices. Uploading is the renderer's job.
//! 2. **Idempotent**: Building the same descriptor twice yields byte-identical
//!    buffers. All randomness was spent during planning.
//! 3. **Neon edges as geometry**: Edge lines are thin quads, not line
//!    primitives, so they survive any rasterizer.
//!
//! ## Example
//!
//! ```rust,ignore
//! use neonwing_geometry::{TowerMesher, TowerStyle};
//!
//! let mesh = TowerMesher::new(TowerStyle::default()).build(&building);
//! assert_eq!(mesh.vertex_count(), 72);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod mesh;
pub mod road_mesh;
pub mod tower_mesh;

pub use mesh::{CityVertex, MeshData};
pub use road_mesh::{RoadMesher, RoadStyle, RIM_LIFT};
pub use tower_mesh::{TowerMesher, TowerStyle, EDGE_COUNT, EDGE_LIFT};
