//! # NEONWING
//!
//! Flight integration for the infinite neon city.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐  world_z   ┌──────────────────────────────────┐
//! │ PlayerPosition-  │──────────> │            FlightLoop            │
//! │ Feed (rig)       │            │                                  │
//! └──────────────────┘            │  ChunkManager (procedural)       │
//!                                 │   ├─ CityPlanner ─ seeds/blocks  │
//!                                 │   └─ Tower/RoadMesher (geometry) │
//!                                 └───────────────┬──────────────────┘
//!                                   upload/release│
//!                                                 v
//!                                 ┌──────────────────────────────────┐
//!                                 │ GeometrySink (renderer)          │
//!                                 └──────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `error`: Fatal start-up and tick errors
//! - `feed`: Player position sources
//! - `sink`: Geometry consumers
//! - `flight_loop`: Per-tick orchestration and timing

pub mod error;
pub mod feed;
pub mod flight_loop;
pub mod sink;

// Re-export the engine crates
pub use neonwing_geometry as geometry;
pub use neonwing_procedural as procedural;
pub use neonwing_shared as shared;

// Re-export commonly used types
pub use error::{FlightError, FlightResult};
pub use feed::{PlayerPositionFeed, ScriptedFlight};
pub use flight_loop::{FlightLoop, FlightLoopBuilder, FlightLoopConfig, FrameStats, FrameStatsAccumulator};
pub use sink::{GeometrySink, MeshBudgetSink};
