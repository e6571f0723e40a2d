//! Viewer configuration
//!
//! Read once at startup from the platform config directory:
//! - macOS: ~/Library/Application Support/planetrover/config.json
//! - Linux: ~/.config/planetrover/config.json
//! - Windows: %APPDATA%\planetrover\config\config.json
//!
//! A missing file means defaults; a broken file is reported and defaults are used.

use anyhow::Context;
use bevy::prelude::*;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::SceneError;
use crate::core::planet::{PlanetDescriptor, find_planet, solar_system};
use crate::core::zoom::ZoomSettings;
use crate::rover::navigation::parse_commands;
use crate::visualization::obstacles::{OBSTACLE_DENSITY, obstacle_target};

/// Upper bound on `grid_segments`; obstacle sampling walks every cell.
pub const MAX_GRID_SEGMENTS: u32 = 256;

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub grid_segments: u32,
    /// Fraction of grid cells covered by obstacles.
    pub obstacle_density: f32,
    pub zoom_step: f32,
    pub min_zoom_factor: f32,
    pub max_zoom_factor: f32,
    pub zoom_smoothing: Option<f32>,
    pub camera_distance: f32,
    /// Unit-sphere radius of the grid lines; slightly above 1.0 to avoid z-fighting.
    pub grid_radius: f32,
    pub obstacle_seed: Option<u64>,
    /// Rover commands (`f`, `b`, `l`, `r`) executed right after each mount.
    pub startup_commands: String,
    pub initial_planet: String,
    pub planets: Vec<PlanetDescriptor>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            grid_segments: 16,
            obstacle_density: OBSTACLE_DENSITY,
            zoom_step: 0.005,
            min_zoom_factor: 0.5,
            max_zoom_factor: 5.0,
            zoom_smoothing: None,
            camera_distance: 3.0,
            grid_radius: 1.001,
            obstacle_seed: None,
            startup_commands: String::new(),
            initial_planet: String::from("Mars"),
            planets: solar_system(),
        }
    }
}

impl ViewerConfig {
    /// Load from the platform config directory, falling back to defaults.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            warn!("Could not resolve config directory, using default viewer config");
            return Self::default();
        };
        if !path.exists() {
            info!("No viewer config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => {
                info!("Loaded viewer config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring viewer config {}: {:#}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "planetrover").map(|dirs| dirs.config_dir().join("config.json"))
    }

    pub fn load_from(path: &Path) -> Result<Self, anyhow::Error> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: ViewerConfig = serde_json::from_str(&contents)
            .with_context(|| format!("parsing {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), anyhow::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(2..=MAX_GRID_SEGMENTS).contains(&self.grid_segments) {
            anyhow::bail!(
                "grid_segments must be within [2, {}], got {}",
                MAX_GRID_SEGMENTS,
                self.grid_segments
            );
        }
        if !(self.zoom_step > 0.0) || !self.zoom_step.is_finite() {
            anyhow::bail!("zoom_step must be positive and finite, got {}", self.zoom_step);
        }
        if !(0.0..=1.0).contains(&self.obstacle_density) {
            anyhow::bail!(
                "obstacle_density must be within [0, 1], got {}",
                self.obstacle_density
            );
        }
        if !(self.min_zoom_factor > 0.0) || self.min_zoom_factor > self.max_zoom_factor {
            anyhow::bail!(
                "zoom factors must satisfy 0 < min <= max, got {} and {}",
                self.min_zoom_factor,
                self.max_zoom_factor
            );
        }
        if !(self.grid_radius > 0.0) || !(self.camera_distance > 0.0) {
            anyhow::bail!("grid_radius and camera_distance must be positive");
        }
        if let Some(rate) = self.zoom_smoothing
            && !(rate > 0.0)
        {
            anyhow::bail!("zoom_smoothing must be positive when set, got {}", rate);
        }
        for planet in &self.planets {
            if !(planet.radius > 0.0) || !planet.radius.is_finite() {
                anyhow::bail!("planet {} has invalid radius {}", planet.name, planet.radius);
            }
        }
        parse_commands(&self.startup_commands)?;
        self.initial_planet()?;
        Ok(())
    }

    pub fn initial_planet(&self) -> Result<PlanetDescriptor, SceneError> {
        find_planet(&self.planets, &self.initial_planet)
    }

    pub fn zoom_settings(&self) -> ZoomSettings {
        ZoomSettings {
            step: self.zoom_step,
            min_factor: self.min_zoom_factor,
            max_factor: self.max_zoom_factor,
            smoothing: self.zoom_smoothing,
        }
    }

    /// Number of obstacles for a `segments x segments` grid.
    pub fn obstacle_target(&self) -> usize {
        obstacle_target(self.grid_segments, self.obstacle_density)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::planet::PackedRgb;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir(test_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "planetrover-config-{}-{}-{}",
            test_name,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ViewerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.obstacle_target(), 25);
        assert_eq!(config.initial_planet().unwrap().name, "Mars");
        assert_eq!(config.zoom_settings(), ZoomSettings::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = unique_temp_dir("round-trip");
        let path = dir.join("config.json");
        let config = ViewerConfig {
            obstacle_seed: Some(42),
            zoom_smoothing: Some(10.0),
            ..ViewerConfig::default()
        };
        config.save_to(&path).unwrap();

        let loaded = ViewerConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_partial_file_uses_defaults_for_missing_fields() {
        let dir = unique_temp_dir("partial");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        fs::write(&path, r#"{ "initial_planet": "Earth", "obstacle_seed": 7 }"#).unwrap();

        let loaded = ViewerConfig::load_from(&path).unwrap();
        assert_eq!(loaded.initial_planet().unwrap().name, "Earth");
        assert_eq!(loaded.obstacle_seed, Some(7));
        assert_eq!(loaded.grid_segments, 16);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let too_few = ViewerConfig {
            grid_segments: 1,
            ..ViewerConfig::default()
        };
        assert!(too_few.validate().is_err());

        let too_many = ViewerConfig {
            grid_segments: 100_000,
            ..ViewerConfig::default()
        };
        assert!(too_many.validate().is_err());
        let largest = ViewerConfig {
            grid_segments: MAX_GRID_SEGMENTS,
            ..ViewerConfig::default()
        };
        assert!(largest.validate().is_ok());

        for zoom_step in [0.0, -0.005, f32::INFINITY, f32::NAN] {
            let bad_step = ViewerConfig {
                zoom_step,
                ..ViewerConfig::default()
            };
            assert!(bad_step.validate().is_err(), "zoom_step {zoom_step} accepted");
        }

        let bad_zoom = ViewerConfig {
            min_zoom_factor: 6.0,
            ..ViewerConfig::default()
        };
        assert!(bad_zoom.validate().is_err());

        let bad_script = ViewerConfig {
            startup_commands: String::from("ffx"),
            ..ViewerConfig::default()
        };
        assert!(bad_script.validate().is_err());

        let unknown = ViewerConfig {
            initial_planet: String::from("Pluto"),
            ..ViewerConfig::default()
        };
        assert!(unknown.validate().is_err());

        let mut flat = ViewerConfig::default();
        flat.planets.push(PlanetDescriptor {
            name: String::from("Flat"),
            color: PackedRgb(0),
            radius: 0.0,
        });
        assert!(flat.validate().is_err());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = unique_temp_dir("malformed");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(ViewerConfig::load_from(&path).is_err());

        let _ = fs::remove_dir_all(dir);
    }
}
