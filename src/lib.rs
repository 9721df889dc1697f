//! Alien Invasion - simulation core for a fixed-viewport fleet shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, fleet, collisions, game state)
//! - `settings`: Tunables and level scaling
//!
//! Windowing, drawing, raw input and audio live outside this crate. A driver
//! feeds decoded [`sim::InputEvent`]s into [`sim::tick`] and draws the
//! [`sim::Snapshot`] it reads back.

pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;

    /// Stall after losing a ship (half a second)
    pub const SHIP_HIT_PAUSE_TICKS: u32 = TICK_RATE / 2;

    /// Default play button size, centred in the viewport
    pub const PLAY_BUTTON_WIDTH: f32 = 200.0;
    pub const PLAY_BUTTON_HEIGHT: f32 = 50.0;

    /// Viewport used by the headless driver
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 800.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 600.0;
}
