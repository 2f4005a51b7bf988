//! # NEONWING Procedural
//!
//! Deterministic, chunk-streamed generation of the wireframe city.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same chunk index + same config = same chunk, ALWAYS
//! 2. **Self-contained**: A chunk never looks at its neighbours
//! 3. **Stateless seeding**: A fresh RNG is built per chunk, never shared
//! 4. **Constant memory**: Only the active window of chunks is resident
//!
//! ## Core Components
//!
//! - `ChunkSeed`: Per-chunk seed derivation
//! - `CityPlanner`: Grid blocks, lanes and building slots
//! - `BuildingResolver`: Shape, dimensions and color of one slot
//! - `plan_roads`: Trench roads in the gaps between blocks
//! - `ChunkGenerator`: Plans + meshes one chunk
//! - `ChunkManager`: Generates ahead, retires behind
//!
//! ## Example
//!
//! ```rust,ignore
//! use neonwing_procedural::{ChunkManager, CityConfig};
//!
//! let mut manager = ChunkManager::new(CityConfig::default())?;
//! manager.initialize(0.0)?;
//!
//! // Fly forward into chunk 1
//! let transition = manager.advance(105.0)?;
//! assert_eq!(transition.created.len(), 1);
//! assert_eq!(transition.retired.len(), 1);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod chunk;
pub mod config;
pub mod error;
pub mod generator;
pub mod layout;
pub mod manager;
pub mod resolver;
pub mod roads;
pub mod seed;

pub use chunk::{BuildingEntity, Chunk, ChunkIndex, RoadEntity};
pub use config::{CityConfig, MAX_BLOCKS_PER_ROW, MAX_BLOCK_ROWS, MAX_WINDOW_SIDE};
pub use error::{CityError, CityResult, ConfigError, ConfigResult};
pub use generator::ChunkGenerator;
pub use layout::{BlockPlan, CityPlanner, GridLayout, PlacedBuilding};
pub use manager::{ChunkManager, ChunkTransition, StreamingStats};
pub use resolver::BuildingResolver;
pub use roads::plan_roads;
pub use seed::ChunkSeed;

/// Smallest width, depth or placement range the planner will emit.
///
/// Degenerate configurations are clamped up to this instead of producing
/// zero, negative or NaN geometry.
pub const MIN_VIABLE_EXTENT: f32 = 0.5;

/// Multiplier applied to the chunk index when deriving its seed.
pub const CHUNK_SEED_MULTIPLIER: i64 = 12_345;
