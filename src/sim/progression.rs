//! Score, high score, lives and level

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Per-game statistics plus the process-wide high score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStats {
    /// Lives remaining
    pub ships_left: u32,
    pub score: u64,
    /// High-water mark; survives new games, never reset
    pub high_score: u64,
    /// Starts at 1, +1 per cleared fleet
    pub level: u32,
    /// Set once the current game has raised the high score
    #[serde(default)]
    pub beat_high_score: bool,
}

impl GameStats {
    pub fn new(ship_limit: u32) -> Self {
        Self {
            ships_left: ship_limit,
            score: 0,
            high_score: 0,
            level: 1,
            beat_high_score: false,
        }
    }

    /// Reset for a new game. The high score is kept.
    pub fn reset(&mut self, ship_limit: u32) {
        self.ships_left = ship_limit;
        self.score = 0;
        self.level = 1;
        self.beat_high_score = false;
    }

    /// Add points and latch the high score.
    ///
    /// Returns true the first time this game's score passes the high score.
    pub fn add_score(&mut self, points: u64) -> bool {
        self.score += points;
        if self.score > self.high_score {
            self.high_score = self.score;
            if !self.beat_high_score {
                self.beat_high_score = true;
                return true;
            }
        }
        false
    }

    /// Advance one level and speed the game up
    pub fn level_up(&mut self, settings: &mut Settings) {
        self.level += 1;
        settings.increase_speed();
    }

    /// Take away one life, never going below zero. Returns the lives left.
    pub fn lose_life(&mut self) -> u32 {
        self.ships_left = self.ships_left.saturating_sub(1);
        self.ships_left
    }
}
