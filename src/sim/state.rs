//! Session state and the transitions that reshape it
//!
//! `GameState` owns everything the simulation mutates: ship, bullets, fleet,
//! stats and settings. There are no globals.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Body, Projectile, Ship};
use super::fleet::Fleet;
use super::progression::GameStats;
use super::rect::{Rect, Viewport};
use crate::consts::{PLAY_BUTTON_HEIGHT, PLAY_BUTTON_WIDTH};
use crate::settings::Settings;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the play button; simulation frozen
    Menu,
    /// Simulation runs every tick
    Active,
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    GameStarted,
    EnemiesDestroyed { count: u32, points: u64 },
    /// First time this game's score passed the previous high score
    NewHighScore { score: u64 },
    FleetCleared { level: u32 },
    ShipHit { ships_left: u32 },
    GameOver { score: u64 },
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub paused: bool,
    pub show_play_button: bool,
    pub play_button: Rect,
    pub ship: Rect,
    pub projectiles: Vec<Rect>,
    pub enemies: Vec<Rect>,
    pub score: u64,
    pub high_score: u64,
    pub level: u32,
    pub ships_left: u32,
}

/// Complete session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub viewport: Viewport,
    pub settings: Settings,
    pub stats: GameStats,
    pub phase: GamePhase,
    pub ship: Ship,
    /// Live bullets, in firing order
    pub projectiles: Vec<Projectile>,
    pub fleet: Fleet,
    /// Ticks left in the post-hit stall
    pub pause_ticks: u32,
    /// Fire presses held back during the stall, at most `bullets_allowed`
    #[serde(default)]
    pub pending_fire: usize,
    /// Start control bounds, supplied by the renderer
    pub play_button: Rect,
    pub quit_requested: bool,
    /// Simulation ticks run in the current game
    pub time_ticks: u64,
    #[serde(skip)]
    events: Vec<GameEvent>,
    next_projectile_id: u32,
}

impl GameState {
    /// Create a session in the menu with a fleet already on screen
    pub fn new(viewport: Viewport, settings: Settings) -> Self {
        let ship = Ship::new(settings.ship_size, &viewport);
        let fleet = Self::fresh_fleet(&viewport, &settings);
        let play_button = Rect::centered(
            viewport.center(),
            Vec2::new(PLAY_BUTTON_WIDTH, PLAY_BUTTON_HEIGHT),
        );
        Self {
            viewport,
            stats: GameStats::new(settings.ship_limit),
            settings,
            phase: GamePhase::Menu,
            ship,
            projectiles: Vec::new(),
            fleet,
            pause_ticks: 0,
            pending_fire: 0,
            play_button,
            quit_requested: false,
            time_ticks: 0,
            events: Vec::new(),
            next_projectile_id: 1,
        }
    }

    fn fresh_fleet(viewport: &Viewport, settings: &Settings) -> Fleet {
        let fleet = Fleet::build(
            viewport,
            settings.ship_size.y,
            settings.alien_size,
            settings.fleet_direction,
            settings.fleet_drop_speed,
        );
        log::debug!("Built fleet of {} aliens", fleet.len());
        fleet
    }

    pub fn is_active(&self) -> bool {
        self.phase == GamePhase::Active
    }

    /// True while the post-hit stall is running
    pub fn is_paused(&self) -> bool {
        self.pause_ticks > 0
    }

    /// Replace the start control bounds (the renderer owns its layout)
    pub fn set_play_button(&mut self, bounds: Rect) {
        self.play_button = bounds;
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Clear bullets and aliens, lay out a new fleet and re-centre the ship
    fn reset_round(&mut self) {
        self.projectiles.clear();
        self.pending_fire = 0;
        self.fleet = Self::fresh_fleet(&self.viewport, &self.settings);
        self.ship.center(&self.viewport);
    }

    /// Menu -> Active. A no-op while a game is running.
    pub fn start_game(&mut self) -> bool {
        if self.is_active() {
            return false;
        }
        self.settings.initialize_dynamic_settings();
        self.stats.reset(self.settings.ship_limit);
        self.reset_round();
        self.pause_ticks = 0;
        self.time_ticks = 0;
        self.phase = GamePhase::Active;
        self.push_event(GameEvent::GameStarted);
        log::info!("Game started (high score {})", self.stats.high_score);
        true
    }

    /// Start the game if `point` is on the play button while in the menu
    pub fn click(&mut self, point: Vec2) -> bool {
        self.phase == GamePhase::Menu && self.play_button.contains_point(point) && self.start_game()
    }

    /// Fire a bullet if a game is running and under the cap.
    ///
    /// During the post-hit stall the press is held back and replayed by
    /// [`GameState::release_pending_fire`] once the stall ends.
    pub fn fire_projectile(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        if self.is_paused() {
            self.pending_fire = (self.pending_fire + 1).min(self.settings.bullets_allowed);
            return false;
        }
        if self.projectiles.len() >= self.settings.bullets_allowed {
            return false;
        }
        let id = self.next_projectile_id;
        self.next_projectile_id += 1;
        self.projectiles
            .push(Projectile::new(id, &self.ship, self.settings.bullet_size));
        true
    }

    /// Spawn the bullets requested during the stall. Returns how many spawned.
    pub(crate) fn release_pending_fire(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending_fire);
        (0..pending).take_while(|_| self.fire_projectile()).count()
    }

    /// Award points for aliens destroyed this tick, in one update
    pub(crate) fn award_kills(&mut self, count: u32) {
        if count == 0 {
            return;
        }
        let points = u64::from(count) * u64::from(self.settings.dynamic.alien_points);
        self.push_event(GameEvent::EnemiesDestroyed { count, points });
        if self.stats.add_score(points) {
            let score = self.stats.score;
            self.push_event(GameEvent::NewHighScore { score });
        }
    }

    /// The last alien went down: new fleet, faster game, next level
    pub(crate) fn fleet_cleared(&mut self) {
        self.projectiles.clear();
        self.fleet = Self::fresh_fleet(&self.viewport, &self.settings);
        self.stats.level_up(&mut self.settings);
        let level = self.stats.level;
        self.push_event(GameEvent::FleetCleared { level });
        log::info!(
            "Fleet cleared, level {} (speed x{:.2})",
            level,
            self.settings.dynamic.speed_factor
        );
    }

    /// An alien reached the ship or the bottom edge
    pub(crate) fn ship_hit(&mut self) {
        let ships_left = self.stats.lose_life();
        self.push_event(GameEvent::ShipHit { ships_left });

        if ships_left > 0 {
            self.reset_round();
            self.pause_ticks = self.settings.ship_hit_pause_ticks;
            log::info!("Ship hit, {} left", ships_left);
        } else {
            self.phase = GamePhase::Menu;
            self.pause_ticks = 0;
            self.pending_fire = 0;
            let score = self.stats.score;
            self.push_event(GameEvent::GameOver { score });
            log::info!(
                "Game over: score {}, level {}, high score {}",
                score,
                self.stats.level,
                self.stats.high_score
            );
        }
    }

    /// Assert the session invariants (debug builds)
    pub fn check_invariants(&self) {
        debug_assert!(self.stats.high_score >= self.stats.score);
        debug_assert!(self.fleet.len() <= self.fleet.initial_size());
        debug_assert!(self.projectiles.len() <= self.settings.bullets_allowed);
        debug_assert!(
            self.projectiles
                .windows(2)
                .all(|w| w[0].id < w[1].id),
            "duplicate bullet id"
        );
        debug_assert!(
            self.fleet.enemies.windows(2).all(|w| w[0].id < w[1].id),
            "duplicate alien id"
        );
    }

    /// Owned copy of the drawable state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            paused: self.is_paused(),
            show_play_button: !self.is_active(),
            play_button: self.play_button,
            ship: self.ship.bounds(),
            projectiles: self.projectiles.iter().map(|p| p.bounds()).collect(),
            enemies: self.fleet.enemies.iter().map(|e| e.bounds()).collect(),
            score: self.stats.score,
            high_score: self.stats.high_score,
            level: self.stats.level,
            ships_left: self.stats.ships_left,
        }
    }
}
