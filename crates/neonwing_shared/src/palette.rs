//! Fixed colors for the wireframe city.

use serde::{Deserialize, Serialize};

/// Linear RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgba(pub [f32; 4]);

impl Rgba {
    /// Creates an opaque color.
    #[inline]
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self([r, g, b, 1.0])
    }

    /// Near-black fill used for tower bodies.
    pub const BUILDING_FILL: Self = Self::rgb(0.01, 0.01, 0.02);

    /// Raw components.
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        self.0
    }
}

/// The three road colors.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadPalette {
    /// Trench floor.
    pub surface: Rgba,
    /// Sloped side walls, slightly lighter than the floor.
    pub side: Rgba,
    /// Neon rim lines.
    pub line: Rgba,
}

impl Default for RoadPalette {
    fn default() -> Self {
        Self {
            surface: Rgba::rgb(0.02, 0.02, 0.04),
            side: Rgba::rgb(0.05, 0.05, 0.09),
            line: Rgba::rgb(1.0, 0.0, 0.8),
        }
    }
}
