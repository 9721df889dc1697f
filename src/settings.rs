//! Game tunables
//!
//! Static values are read once (defaults or a JSON file). The dynamic block
//! holds the speeds and points that scale with level and is reset at the
//! start of every game.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::SHIP_HIT_PAUSE_TICKS;
use crate::sim::FleetDirection;

/// Errors from loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(&'static str),
}

/// Level-scaled values, derived from the static settings
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DynamicSettings {
    /// Cumulative speedup applied so far (1.0 on a new game)
    pub speed_factor: f32,
    pub ship_speed: f32,
    pub bullet_speed: f32,
    pub alien_speed: f32,
    /// Points awarded per destroyed alien at the current level
    pub alien_points: u32,
}

/// Game settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Ship ===
    /// Horizontal pixels per tick at level 1
    pub ship_speed: f32,
    pub ship_size: Vec2,
    /// Lives per game
    pub ship_limit: u32,

    // === Bullets ===
    /// Upward pixels per tick at level 1
    pub bullet_speed: f32,
    pub bullet_size: Vec2,
    /// Maximum live bullets at once
    pub bullets_allowed: usize,

    // === Aliens ===
    /// Horizontal pixels per tick at level 1
    pub alien_speed: f32,
    pub alien_size: Vec2,
    /// Vertical step applied to the whole fleet on edge reversal
    pub fleet_drop_speed: f32,
    /// Direction of every freshly built fleet
    pub fleet_direction: FleetDirection,
    /// Points per alien at level 1
    pub alien_points: u32,

    // === Progression ===
    /// Speed multiplier applied on each level-up
    pub speedup_scale: f32,
    /// Points multiplier applied on each level-up
    pub score_scale: f32,
    /// Upper bound for the cumulative speed factor
    pub max_speed_factor: f32,

    /// Ticks the simulation stalls after losing a life
    pub ship_hit_pause_ticks: u32,

    /// Level-scaled values; recomputed on load and on every new game
    pub dynamic: DynamicSettings,
}

impl Default for Settings {
    fn default() -> Self {
        let mut settings = Self {
            ship_speed: 1.5,
            ship_size: Vec2::new(60.0, 60.0),
            ship_limit: 3,

            bullet_speed: 3.0,
            bullet_size: Vec2::new(3.0, 15.0),
            bullets_allowed: 3,

            alien_speed: 1.0,
            alien_size: Vec2::new(40.0, 32.0),
            fleet_drop_speed: 10.0,
            fleet_direction: FleetDirection::Right,
            alien_points: 50,

            speedup_scale: 1.1,
            score_scale: 1.5,
            max_speed_factor: 3.0,

            ship_hit_pause_ticks: SHIP_HIT_PAUSE_TICKS,

            dynamic: DynamicSettings::default(),
        };
        settings.initialize_dynamic_settings();
        settings
    }
}

impl Settings {
    /// Parse settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        settings.initialize_dynamic_settings();
        Ok(settings)
    }

    /// Read settings from a JSON file
    pub fn read(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings from a JSON file, falling back to defaults on any error
    pub fn load(path: &Path) -> Self {
        match Self::read(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({e})");
                Self::default()
            }
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let sizes = [self.ship_size, self.bullet_size, self.alien_size];
        if sizes.iter().any(|s| s.x <= 0.0 || s.y <= 0.0) {
            return Err(SettingsError::Invalid("entity sizes must be positive"));
        }
        if self.ship_speed <= 0.0 || self.bullet_speed <= 0.0 || self.alien_speed <= 0.0 {
            return Err(SettingsError::Invalid("speeds must be positive"));
        }
        if self.fleet_drop_speed < 0.0 {
            return Err(SettingsError::Invalid("fleet drop speed must not be negative"));
        }
        if self.bullets_allowed == 0 {
            return Err(SettingsError::Invalid("bullets_allowed must be at least 1"));
        }
        if self.ship_limit == 0 {
            return Err(SettingsError::Invalid("ship_limit must be at least 1"));
        }
        if self.speedup_scale < 1.0 || self.score_scale < 1.0 {
            return Err(SettingsError::Invalid("scales must be at least 1.0"));
        }
        if self.max_speed_factor < 1.0 {
            return Err(SettingsError::Invalid("max_speed_factor must be at least 1.0"));
        }
        Ok(())
    }

    /// Reset level-scaled values to their level 1 values
    pub fn initialize_dynamic_settings(&mut self) {
        self.dynamic = DynamicSettings {
            speed_factor: 1.0,
            ship_speed: self.ship_speed,
            bullet_speed: self.bullet_speed,
            alien_speed: self.alien_speed,
            alien_points: self.alien_points,
        };
    }

    /// Apply one level of speedup. Speeds stop growing once the cumulative
    /// factor reaches `max_speed_factor`; points keep scaling.
    pub fn increase_speed(&mut self) {
        let factor = (self.dynamic.speed_factor * self.speedup_scale).min(self.max_speed_factor);
        self.dynamic.speed_factor = factor;
        self.dynamic.ship_speed = self.ship_speed * factor;
        self.dynamic.bullet_speed = self.bullet_speed * factor;
        self.dynamic.alien_speed = self.alien_speed * factor;
        self.dynamic.alien_points = (self.dynamic.alien_points as f32 * self.score_scale) as u32;
    }
}
