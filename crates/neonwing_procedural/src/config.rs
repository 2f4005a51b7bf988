//! # City Configuration
//!
//! Every tuning value of the city, fixed at construction.
//!
//! ## TOML Format
//!
//! ```toml
//! chunks_ahead = 5
//! chunks_behind = 2
//! chunk_size = 100.0
//! block_size = 25.0
//! road_width = 8.0
//! blocks_per_row = 4
//! building_density = 0.8
//!
//! [road_palette]
//! line = [1.0, 0.0, 0.8, 1.0]
//! ```
//!
//! Missing keys fall back to [`CityConfig::default`].

use std::path::Path;

use neonwing_geometry::{RoadStyle, TowerStyle};
use neonwing_shared::{RoadPalette, Rgba};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Upper bound on `chunks_ahead` / `chunks_behind`.
///
/// Generation is synchronous, so every extra chunk in the window is paid
/// for inside a single tick.
pub const MAX_WINDOW_SIDE: u32 = 256;

/// Upper bound on `blocks_per_row`.
pub const MAX_BLOCKS_PER_ROW: u32 = 64;

/// Upper bound on block rows per chunk, `floor(chunk_size / block_stride)`.
pub const MAX_BLOCK_ROWS: u32 = 64;

/// Full city configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CityConfig {
    /// Chunks kept generated in front of the player.
    pub chunks_ahead: u32,
    /// Chunks kept alive behind the player.
    pub chunks_behind: u32,
    /// Chunk length along the travel axis.
    pub chunk_size: f32,
    /// Edge length of a square grid block.
    pub block_size: f32,
    /// Gap between blocks, filled by trench roads.
    pub road_width: f32,
    /// Block columns across the travel axis.
    pub blocks_per_row: u32,
    /// Probability that a block carries buildings.
    pub building_density: f32,
    /// Smallest tower width/depth.
    pub min_tower_width: f32,
    /// Largest tower width/depth.
    pub max_tower_width: f32,
    /// Shortest tower.
    pub min_tower_height: f32,
    /// Tallest tower.
    pub max_tower_height: f32,
    /// Inset from the block edge on all sides.
    pub building_padding: f32,
    /// Fixed gap between neighbouring lanes of one block.
    pub building_spacing: f32,
    /// Probability of cyan edges.
    pub cyan_probability: f32,
    /// Probability of purple edges; red takes the remainder.
    pub purple_probability: f32,
    /// Trench depth below the building ground plane.
    pub road_depth: f32,
    /// Trench wall angle in degrees.
    pub road_side_angle: f32,
    /// Width of the road rim strips.
    pub road_edge_thickness: f32,
    /// Width of the tower edge strips.
    pub line_thickness: f32,
    /// Tower body color.
    pub building_fill: Rgba,
    /// Mixed into every chunk seed; `0` keeps the canonical city.
    pub city_seed: u64,
    /// Road floor, wall and rim colors.
    pub road_palette: RoadPalette,
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            chunks_ahead: 5,
            chunks_behind: 2,
            chunk_size: 100.0,
            block_size: 25.0,
            road_width: 8.0,
            blocks_per_row: 4,
            building_density: 0.8,
            min_tower_width: 4.0,
            max_tower_width: 10.0,
            min_tower_height: 15.0,
            max_tower_height: 80.0,
            building_padding: 1.5,
            building_spacing: 1.5,
            cyan_probability: 0.4,
            purple_probability: 0.35,
            road_depth: 1.5,
            road_side_angle: 75.0,
            road_edge_thickness: 0.15,
            line_thickness: 0.2,
            building_fill: Rgba::BUILDING_FILL,
            city_seed: 0,
            road_palette: RoadPalette::default(),
        }
    }
}

impl CityConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] for values that fail [`Self::validate`].
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`Self::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Serializes to TOML.
    ///
    /// # Errors
    ///
    /// Returns the serializer error message as [`ConfigError::Invalid`].
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        toml::to_string(self).map_err(|e| ConfigError::invalid("config", e.to_string()))
    }

    /// Rejects values the generator cannot work with at all.
    ///
    /// Values that merely make lanes or placement ranges too small are
    /// accepted: the planner clamps those at generation time.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> ConfigResult<()> {
        let finite = [
            ("chunk_size", self.chunk_size),
            ("block_size", self.block_size),
            ("road_width", self.road_width),
            ("building_density", self.building_density),
            ("min_tower_width", self.min_tower_width),
            ("max_tower_width", self.max_tower_width),
            ("min_tower_height", self.min_tower_height),
            ("max_tower_height", self.max_tower_height),
            ("building_padding", self.building_padding),
            ("building_spacing", self.building_spacing),
            ("cyan_probability", self.cyan_probability),
            ("purple_probability", self.purple_probability),
            ("road_depth", self.road_depth),
            ("road_side_angle", self.road_side_angle),
            ("road_edge_thickness", self.road_edge_thickness),
            ("line_thickness", self.line_thickness),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::invalid(field, format!("must be finite, got {value}")));
            }
        }

        for (field, value) in [
            ("chunk_size", self.chunk_size),
            ("block_size", self.block_size),
            ("min_tower_width", self.min_tower_width),
            ("min_tower_height", self.min_tower_height),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::invalid(field, format!("must be > 0, got {value}")));
            }
        }

        for (field, value) in [
            ("road_width", self.road_width),
            ("building_padding", self.building_padding),
            ("building_spacing", self.building_spacing),
            ("road_depth", self.road_depth),
            ("road_edge_thickness", self.road_edge_thickness),
            ("line_thickness", self.line_thickness),
        ] {
            if value < 0.0 {
                return Err(ConfigError::invalid(field, format!("must be >= 0, got {value}")));
            }
        }

        if self.blocks_per_row == 0 || self.blocks_per_row > MAX_BLOCKS_PER_ROW {
            return Err(ConfigError::invalid(
                "blocks_per_row",
                format!("must be in 1..={MAX_BLOCKS_PER_ROW}, got {}", self.blocks_per_row),
            ));
        }

        let rows = (self.chunk_size / self.block_stride()).floor();
        if rows > MAX_BLOCK_ROWS as f32 {
            return Err(ConfigError::invalid(
                "block_size",
                format!("chunk_size / (block_size + road_width) must be <= {MAX_BLOCK_ROWS}, got {rows}"),
            ));
        }

        for (field, value) in [
            ("chunks_ahead", self.chunks_ahead),
            ("chunks_behind", self.chunks_behind),
        ] {
            if value > MAX_WINDOW_SIDE {
                return Err(ConfigError::invalid(
                    field,
                    format!("must be <= {MAX_WINDOW_SIDE}, got {value}"),
                ));
            }
        }

        for (field, value) in [
            ("building_density", self.building_density),
            ("cyan_probability", self.cyan_probability),
            ("purple_probability", self.purple_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::invalid(field, format!("must be in [0, 1], got {value}")));
            }
        }
        if self.cyan_probability + self.purple_probability > 1.0 {
            return Err(ConfigError::invalid(
                "purple_probability",
                "cyan + purple must not exceed 1",
            ));
        }

        if self.road_side_angle <= 0.0 || self.road_side_angle > 90.0 {
            return Err(ConfigError::invalid(
                "road_side_angle",
                format!("must be in (0, 90], got {}", self.road_side_angle),
            ));
        }

        if self.min_tower_width > self.max_tower_width {
            return Err(ConfigError::invalid("max_tower_width", "must be >= min_tower_width"));
        }
        if self.min_tower_height > self.max_tower_height {
            return Err(ConfigError::invalid("max_tower_height", "must be >= min_tower_height"));
        }

        Ok(())
    }

    /// Distance from one block's leading edge to the next.
    #[inline]
    #[must_use]
    pub fn block_stride(&self) -> f32 {
        self.block_size + self.road_width
    }

    /// Tower mesh style derived from this config.
    #[must_use]
    pub fn tower_style(&self) -> TowerStyle {
        TowerStyle {
            line_thickness: self.line_thickness,
            fill: self.building_fill,
        }
    }

    /// Road mesh style derived from this config.
    #[must_use]
    pub fn road_style(&self) -> RoadStyle {
        RoadStyle {
            depth: self.road_depth,
            side_angle_degrees: self.road_side_angle,
            edge_thickness: self.road_edge_thickness,
            palette: self.road_palette,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        CityConfig::default().validate().unwrap();
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = CityConfig::from_toml_str(
            r#"
            chunks_ahead = 3
            building_density = 0.5

            [road_palette]
            line = [0.0, 1.0, 1.0, 1.0]
            "#,
        )
        .unwrap();

        assert_eq!(config.chunks_ahead, 3);
        assert_eq!(config.building_density, 0.5);
        assert_eq!(config.chunk_size, 100.0);
        assert_eq!(config.road_palette.line, Rgba::rgb(0.0, 1.0, 1.0));
        assert_eq!(config.road_palette.side, RoadPalette::default().side);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = CityConfig {
            city_seed: 99,
            ..CityConfig::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(CityConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_rejects_probabilities_over_one() {
        let config = CityConfig {
            cyan_probability: 0.7,
            purple_probability: 0.5,
            ..CityConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "purple_probability", .. }));
    }

    #[test]
    fn test_rejects_nan() {
        let config = CityConfig {
            road_depth: f32::NAN,
            ..CityConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "road_depth", .. })
        ));
    }

    #[test]
    fn test_rejects_zero_columns() {
        let config = CityConfig {
            blocks_per_row: 0,
            ..CityConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_runaway_columns() {
        let config = CityConfig {
            blocks_per_row: u32::MAX,
            ..CityConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "blocks_per_row", .. })
        ));

        let widest = CityConfig {
            blocks_per_row: MAX_BLOCKS_PER_ROW,
            ..CityConfig::default()
        };
        widest.validate().unwrap();
    }

    #[test]
    fn test_rejects_runaway_rows() {
        // 100 / 0.001 rows per chunk
        let config = CityConfig {
            block_size: 0.001,
            road_width: 0.0,
            ..CityConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "block_size", .. })
        ));

        // 100 / 1.5625 = exactly 64 rows
        let densest = CityConfig {
            block_size: 1.5625,
            road_width: 0.0,
            ..CityConfig::default()
        };
        densest.validate().unwrap();
    }

    #[test]
    fn test_accepts_cramped_blocks() {
        // Lanes come out negative; the planner clamps instead of rejecting.
        let config = CityConfig {
            block_size: 6.0,
            building_padding: 2.5,
            ..CityConfig::default()
        };
        config.validate().unwrap();
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/city.toml");
        assert_eq!(CityConfig::from_toml_file(path).unwrap(), CityConfig::default());
    }

    #[test]
    fn test_parse_error() {
        let err = CityConfig::from_toml_str("chunk_size = \"wide\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = CityConfig::from_toml_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_styles_follow_config() {
        let config = CityConfig::default();
        assert_eq!(config.road_style().depth, config.road_depth);
        assert_eq!(config.tower_style().line_thickness, config.line_thickness);
        assert_eq!(config.block_stride(), 33.0);
    }
}
