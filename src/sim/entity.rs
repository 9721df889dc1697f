//! Ship, bullet and alien entities
//!
//! Each entity only knows how to move itself. Collisions and removal are
//! handled by the caller.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::fleet::FleetDirection;
use super::rect::{Rect, Viewport};

/// Anything with an on-screen bounding box
pub trait Body {
    fn bounds(&self) -> Rect;
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub moving_left: bool,
    pub moving_right: bool,
}

impl Ship {
    /// Create a ship centred on the bottom edge of the viewport
    pub fn new(size: Vec2, viewport: &Viewport) -> Self {
        let mut ship = Self {
            pos: Vec2::ZERO,
            size,
            moving_left: false,
            moving_right: false,
        };
        ship.center(viewport);
        ship
    }

    /// Move back to the bottom centre. Movement flags are left alone.
    pub fn center(&mut self, viewport: &Viewport) {
        self.pos = Vec2::new(
            (viewport.width - self.size.x) / 2.0,
            viewport.height - self.size.y,
        );
    }

    /// Horizontal direction from the movement flags; both held cancels out
    pub fn direction(&self) -> f32 {
        match (self.moving_left, self.moving_right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    /// Move one tick, staying fully inside the viewport
    pub fn advance(&mut self, speed: f32, viewport: &Viewport) {
        let max_x = (viewport.width - self.size.x).max(0.0);
        self.pos.x = (self.pos.x + self.direction() * speed).min(max_x).max(0.0);
    }

    /// Top centre, where bullets spawn
    pub fn mid_top(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y)
    }
}

impl Body for Ship {
    fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// A bullet fired by the ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
}

impl Projectile {
    /// Spawn a bullet whose top centre sits on the ship's top centre
    pub fn new(id: u32, ship: &Ship, size: Vec2) -> Self {
        let mid_top = ship.mid_top();
        Self {
            id,
            pos: Vec2::new(mid_top.x - size.x / 2.0, mid_top.y),
            size,
        }
    }

    pub fn advance(&mut self, speed: f32) {
        self.pos.y -= speed;
    }

    /// True once the bullet is entirely above the viewport
    pub fn is_offscreen(&self) -> bool {
        self.pos.y + self.size.y <= 0.0
    }
}

impl Body for Projectile {
    fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// A single alien in the fleet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    /// Grid slot index, unique within a fleet
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
}

impl Enemy {
    pub fn new(id: u32, pos: Vec2, size: Vec2) -> Self {
        Self { id, pos, size }
    }

    /// Step sideways in the fleet's direction
    pub fn advance(&mut self, speed: f32, direction: FleetDirection) {
        self.pos.x += speed * direction.sign();
    }
}

impl Body for Enemy {
    fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}
