//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - No RNG
//! - Stable iteration order (firing order for bullets, grid order for aliens)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod fleet;
pub mod progression;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{CollisionReport, check_fleet_edges, check_ship_hit, resolve, resolve_projectile_hits};
pub use entity::{Body, Enemy, Projectile, Ship};
pub use fleet::{Fleet, FleetDirection, FleetLayout, build_fleet};
pub use progression::GameStats;
pub use rect::{Rect, Viewport};
pub use state::{GameEvent, GamePhase, GameState, Snapshot};
pub use tick::{InputEvent, Key, handle_event, tick};
