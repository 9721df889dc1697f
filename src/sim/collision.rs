//! Collision resolution between bullets, aliens, the ship and the viewport
//!
//! Three checks run once per tick, in order:
//! 1. bullet vs alien (both removed, one-for-one)
//! 2. fleet vs side edges (whole fleet reverses and drops once)
//! 3. alien vs ship or bottom edge (a single ship-hit)
//!
//! A cleared fleet ends resolution after step 1, so clearing the fleet and
//! losing a ship never happen in the same tick.

use super::entity::{Body, Projectile, Ship};
use super::fleet::Fleet;
use super::rect::Viewport;

/// What happened during one resolution pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Aliens destroyed by bullets this tick
    pub destroyed: u32,
    /// The last alien was destroyed this tick
    pub fleet_cleared: bool,
    /// The fleet touched a side edge and reversed
    pub reversed: bool,
    /// An alien reached the ship or the bottom of the viewport
    pub ship_hit: bool,
}

/// Remove every overlapping bullet/alien pair
///
/// Bullets are visited in firing order and each claims the first overlapping
/// alien (in fleet order) not already claimed, so one bullet never accounts
/// for two aliens and one alien never absorbs two bullets.
pub fn resolve_projectile_hits(projectiles: &mut Vec<Projectile>, fleet: &mut Fleet) -> u32 {
    if projectiles.is_empty() || fleet.is_empty() {
        return 0;
    }

    let mut hit = vec![false; fleet.len()];
    let mut destroyed = 0;

    projectiles.retain(|bullet| {
        let bounds = bullet.bounds();
        let target = fleet
            .enemies
            .iter()
            .enumerate()
            .position(|(i, enemy)| !hit[i] && bounds.overlaps(&enemy.bounds()));
        match target {
            Some(i) => {
                hit[i] = true;
                destroyed += 1;
                false
            }
            None => true,
        }
    });

    if destroyed > 0 {
        fleet.remove_hit(&hit);
    }
    destroyed
}

/// Reverse and drop the fleet if any alien is at a side edge
pub fn check_fleet_edges(fleet: &mut Fleet, viewport: &Viewport) -> bool {
    if fleet.at_edge(viewport) {
        fleet.reverse_and_drop();
        true
    } else {
        false
    }
}

/// True if any alien overlaps the ship or reaches the bottom edge
pub fn check_ship_hit(fleet: &Fleet, ship: &Ship, viewport: &Viewport) -> bool {
    let ship_bounds = ship.bounds();
    fleet.enemies.iter().any(|enemy| {
        let bounds = enemy.bounds();
        bounds.overlaps(&ship_bounds) || bounds.bottom() >= viewport.height
    })
}

/// Run all three checks in order
pub fn resolve(
    projectiles: &mut Vec<Projectile>,
    fleet: &mut Fleet,
    ship: &Ship,
    viewport: &Viewport,
) -> CollisionReport {
    let had_enemies = !fleet.is_empty();
    let destroyed = resolve_projectile_hits(projectiles, fleet);

    if had_enemies && fleet.is_empty() {
        return CollisionReport {
            destroyed,
            fleet_cleared: true,
            ..Default::default()
        };
    }

    let reversed = check_fleet_edges(fleet, viewport);
    let ship_hit = check_ship_hit(fleet, ship, viewport);

    CollisionReport {
        destroyed,
        fleet_cleared: false,
        reversed,
        ship_hit,
    }
}
