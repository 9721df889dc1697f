//! Fleet layout and fleet-wide movement
//!
//! The fleet is laid out once on a fixed grid and only ever shrinks after
//! that. Direction and drop speed belong to the fleet, not to each alien.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Body, Enemy};
use super::rect::Viewport;

/// Horizontal direction shared by the whole fleet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FleetDirection {
    Left,
    #[default]
    Right,
}

impl FleetDirection {
    /// -1.0 for left, +1.0 for right
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            FleetDirection::Left => -1.0,
            FleetDirection::Right => 1.0,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            FleetDirection::Left => FleetDirection::Right,
            FleetDirection::Right => FleetDirection::Left,
        }
    }
}

/// Grid dimensions for a fleet
///
/// Columns leave one alien width of margin on each side and one alien width
/// between columns. Rows reserve three alien heights at the top and the
/// ship's height at the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FleetLayout {
    pub columns: u32,
    pub rows: u32,
}

impl FleetLayout {
    pub fn compute(viewport: &Viewport, ship_height: f32, alien_size: Vec2) -> Self {
        let available_x = viewport.width - 2.0 * alien_size.x;
        let columns = floor_div(available_x, 2.0 * alien_size.x);

        let available_y = viewport.height - 3.0 * alien_size.y - ship_height;
        let rows = floor_div(available_y, 2.0 * alien_size.y);

        // A viewport too small in either axis yields an empty grid
        if columns == 0 || rows == 0 {
            return Self { columns: 0, rows: 0 };
        }
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Top-left corner of the alien in `column`, `row`
    pub fn position(column: u32, row: u32, alien_size: Vec2) -> Vec2 {
        Vec2::new(
            alien_size.x + 2.0 * alien_size.x * column as f32,
            alien_size.y + 2.0 * alien_size.y * row as f32,
        )
    }
}

/// Floor division clamped at zero
fn floor_div(numerator: f32, denominator: f32) -> u32 {
    let q = (numerator / denominator).floor();
    if q.is_finite() && q > 0.0 { q as u32 } else { 0 }
}

/// Lay out a full grid of aliens, row by row
pub fn build_fleet(viewport: &Viewport, ship_height: f32, alien_size: Vec2) -> Vec<Enemy> {
    let layout = FleetLayout::compute(viewport, ship_height, alien_size);
    let mut enemies = Vec::with_capacity(layout.len());
    for row in 0..layout.rows {
        for column in 0..layout.columns {
            let id = row * layout.columns + column;
            let pos = FleetLayout::position(column, row, alien_size);
            enemies.push(Enemy::new(id, pos, alien_size));
        }
    }
    enemies
}

/// The live aliens plus fleet-wide movement state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fleet {
    pub enemies: Vec<Enemy>,
    pub direction: FleetDirection,
    /// Vertical step applied on every edge reversal
    pub drop_speed: f32,
    /// Population when the fleet was built
    initial_size: usize,
}

impl Fleet {
    pub fn new(enemies: Vec<Enemy>, direction: FleetDirection, drop_speed: f32) -> Self {
        let initial_size = enemies.len();
        Self {
            enemies,
            direction,
            drop_speed,
            initial_size,
        }
    }

    /// Build a fresh grid for the viewport
    pub fn build(
        viewport: &Viewport,
        ship_height: f32,
        alien_size: Vec2,
        direction: FleetDirection,
        drop_speed: f32,
    ) -> Self {
        Self::new(build_fleet(viewport, ship_height, alien_size), direction, drop_speed)
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    pub fn initial_size(&self) -> usize {
        self.initial_size
    }

    pub fn clear(&mut self) {
        self.enemies.clear();
    }

    /// Move every alien one step in the fleet direction
    pub fn advance(&mut self, speed: f32) {
        let direction = self.direction;
        for enemy in &mut self.enemies {
            enemy.advance(speed, direction);
        }
    }

    /// True if any alien touches or crosses a side of the viewport
    pub fn at_edge(&self, viewport: &Viewport) -> bool {
        self.enemies.iter().any(|e| {
            let bounds = e.bounds();
            bounds.right() >= viewport.width || bounds.left() <= 0.0
        })
    }

    /// Flip direction once and drop every alien by `drop_speed`
    pub fn reverse_and_drop(&mut self) {
        for enemy in &mut self.enemies {
            enemy.pos.y += self.drop_speed;
        }
        self.direction = self.direction.reversed();
    }

    /// Remove the aliens whose index is flagged in `hit`
    pub fn remove_hit(&mut self, hit: &[bool]) {
        let mut flags = hit.iter();
        self.enemies.retain(|_| !flags.next().copied().unwrap_or(false));
    }
}
