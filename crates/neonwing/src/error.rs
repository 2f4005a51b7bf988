//! Flight loop errors.

use neonwing_procedural::CityError;
use thiserror::Error;

/// Errors that stop the flight loop.
#[derive(Error, Debug)]
pub enum FlightError {
    /// No player position source was attached; the chunk window cannot be placed.
    #[error("no player position source attached")]
    MissingPositionSource,

    /// No geometry sink was attached; generated chunks would have nowhere to go.
    #[error("no geometry sink attached")]
    MissingGeometrySink,

    /// The city engine rejected its config or a position.
    #[error("city error: {0}")]
    City(#[from] CityError),
}

/// Result type for flight loop operations.
pub type FlightResult<T> = Result<T, FlightError>;
