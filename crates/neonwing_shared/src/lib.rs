//! # NEONWING Shared
//!
//! Value types shared by the city planner, the mesh builders and the
//! render collaborator.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER contain:
//! - Random number generation
//! - Chunk lifecycle state
//! - Mesh buffers
//!
//! Everything here is a plain descriptor. If it decides or builds
//! something, it belongs in `neonwing_procedural` or `neonwing_geometry`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod building;
pub mod math;
pub mod palette;
pub mod road;

pub use building::{Building, BuildingShape, ColorCategory};
pub use math::{Aabb, Footprint, Vec3};
pub use palette::{Rgba, RoadPalette};
pub use road::{RoadOrientation, RoadSegment};
