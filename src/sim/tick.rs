//! Fixed timestep simulation tick
//!
//! Each tick drains the input events, then (only while a game is running and
//! not stalled after a lost ship) advances every entity and resolves
//! collisions.

use serde::{Deserialize, Serialize};

use super::collision;
use super::state::GameState;

/// Logical keys, already decoded by the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Fire,
    Quit,
}

/// Input events consumed by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// Pointer click in viewport coordinates
    PointerClick { x: f32, y: f32 },
    /// Window close
    Quit,
}

/// Apply one input event
///
/// Movement flags are tracked in every phase, so keys held through the menu
/// or the post-hit stall take effect as soon as the simulation runs.
pub fn handle_event(state: &mut GameState, event: InputEvent) {
    match event {
        InputEvent::KeyDown(Key::Left) => state.ship.moving_left = true,
        InputEvent::KeyDown(Key::Right) => state.ship.moving_right = true,
        InputEvent::KeyDown(Key::Fire) => {
            state.fire_projectile();
        }
        InputEvent::KeyDown(Key::Quit) | InputEvent::Quit => {
            if !state.quit_requested {
                log::info!("Quit requested");
            }
            state.quit_requested = true;
        }
        InputEvent::KeyUp(Key::Left) => state.ship.moving_left = false,
        InputEvent::KeyUp(Key::Right) => state.ship.moving_right = false,
        InputEvent::KeyUp(Key::Fire | Key::Quit) => {}
        InputEvent::PointerClick { x, y } => {
            state.click(glam::Vec2::new(x, y));
        }
    }
}

/// Advance the session by one tick
pub fn tick(state: &mut GameState, events: &[InputEvent]) {
    for &event in events {
        handle_event(state, event);
    }

    if !state.is_active() {
        return;
    }

    // Post-hit stall: input above is still consumed, nothing moves
    if state.pause_ticks > 0 {
        state.pause_ticks -= 1;
        return;
    }

    state.release_pending_fire();
    step(state);
    state.check_invariants();
}

/// One simulation step of a running game
fn step(state: &mut GameState) {
    state.time_ticks += 1;
    let speeds = state.settings.dynamic;

    state.ship.advance(speeds.ship_speed, &state.viewport);

    for bullet in &mut state.projectiles {
        bullet.advance(speeds.bullet_speed);
    }
    state.projectiles.retain(|b| !b.is_offscreen());

    state.fleet.advance(speeds.alien_speed);

    let report = collision::resolve(
        &mut state.projectiles,
        &mut state.fleet,
        &state.ship,
        &state.viewport,
    );

    state.award_kills(report.destroyed);

    if report.fleet_cleared {
        state.fleet_cleared();
    } else if report.ship_hit {
        state.ship_hit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::entity::{Enemy, Projectile};
    use crate::sim::fleet::{Fleet, FleetDirection};
    use crate::sim::rect::Viewport;
    use crate::sim::state::{GameEvent, GamePhase};
    use glam::Vec2;

    const ALIEN: Vec2 = Vec2::new(40.0, 32.0);

    fn active_state() -> GameState {
        let mut state = GameState::new(Viewport::new(800.0, 600.0), Settings::default());
        state.start_game();
        state.drain_events();
        state
    }

    fn fleet_of(positions: &[(f32, f32)]) -> Fleet {
        let enemies = positions
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Enemy::new(i as u32, Vec2::new(x, y), ALIEN))
            .collect();
        Fleet::new(enemies, FleetDirection::Right, 10.0)
    }

    fn bullet_at(id: u32, x: f32, y: f32) -> Projectile {
        Projectile {
            id,
            pos: Vec2::new(x, y),
            size: Vec2::new(3.0, 15.0),
        }
    }

    #[test]
    fn test_menu_is_frozen() {
        let mut state = GameState::new(Viewport::new(800.0, 600.0), Settings::default());
        let first = state.fleet.enemies[0].pos;
        tick(&mut state, &[InputEvent::KeyDown(Key::Right), InputEvent::KeyDown(Key::Fire)]);
        tick(&mut state, &[]);
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.fleet.enemies[0].pos, first);
        assert_eq!(state.ship.pos.x, 370.0);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_click_starts_game() {
        let mut state = GameState::new(Viewport::new(800.0, 600.0), Settings::default());
        tick(&mut state, &[InputEvent::PointerClick { x: 400.0, y: 300.0 }]);
        assert_eq!(state.phase, GamePhase::Active);
        assert_eq!(state.time_ticks, 1);
        assert_eq!(state.drain_events(), vec![GameEvent::GameStarted]);
    }

    #[test]
    fn test_ship_moves_and_stops() {
        let mut state = active_state();
        tick(&mut state, &[InputEvent::KeyDown(Key::Right)]);
        assert_eq!(state.ship.pos.x, 371.5);
        tick(&mut state, &[InputEvent::KeyUp(Key::Right)]);
        assert_eq!(state.ship.pos.x, 371.5);
    }

    #[test]
    fn test_both_directions_cancel() {
        let mut state = active_state();
        tick(
            &mut state,
            &[InputEvent::KeyDown(Key::Left), InputEvent::KeyDown(Key::Right)],
        );
        assert_eq!(state.ship.pos.x, 370.0);
        tick(&mut state, &[InputEvent::KeyUp(Key::Left)]);
        assert_eq!(state.ship.pos.x, 371.5);
    }

    #[test]
    fn test_fire_cap() {
        let mut state = active_state();
        let fire = InputEvent::KeyDown(Key::Fire);
        tick(&mut state, &[fire, fire, fire]);
        assert_eq!(state.projectiles.len(), 3);

        let before: Vec<(u32, Vec2)> = state.projectiles.iter().map(|p| (p.id, p.pos)).collect();
        handle_event(&mut state, fire);
        let after: Vec<(u32, Vec2)> = state.projectiles.iter().map(|p| (p.id, p.pos)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_bullets_leave_top() {
        let mut state = active_state();
        state.fleet = fleet_of(&[(100.0, 100.0)]);
        state.projectiles.push(bullet_at(99, 500.0, -13.0));
        tick(&mut state, &[]);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_clearing_fleet_levels_up_in_same_tick() {
        let mut state = active_state();
        state.fleet = fleet_of(&[(100.0, 100.0), (300.0, 100.0)]);
        state.projectiles = vec![bullet_at(1, 110.0, 120.0), bullet_at(2, 310.0, 120.0)];

        tick(&mut state, &[]);

        assert_eq!(state.stats.score, 100);
        assert_eq!(state.stats.level, 2);
        assert_eq!(state.fleet.len(), 54);
        assert!(state.projectiles.is_empty());
        assert!(state.settings.dynamic.alien_speed > state.settings.alien_speed);
        assert_eq!(state.phase, GamePhase::Active);
        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::EnemiesDestroyed { count: 2, points: 100 },
                GameEvent::NewHighScore { score: 100 },
                GameEvent::FleetCleared { level: 2 },
            ]
        );
    }

    #[test]
    fn test_score_below_existing_high_score() {
        let mut state = active_state();
        state.stats.high_score = 500;
        state.settings.dynamic.alien_points = 10;
        state.fleet = fleet_of(&[(100.0, 100.0), (200.0, 100.0), (300.0, 100.0), (600.0, 300.0)]);
        state.projectiles = vec![
            bullet_at(1, 110.0, 120.0),
            bullet_at(2, 210.0, 120.0),
            bullet_at(3, 310.0, 120.0),
        ];

        tick(&mut state, &[]);

        assert_eq!(state.stats.score, 30);
        assert_eq!(state.stats.high_score, 500);
        assert_eq!(state.fleet.len(), 1);
        assert_eq!(state.stats.level, 1);
    }

    #[test]
    fn test_fleet_reverses_at_edge() {
        let mut state = active_state();
        state.fleet = fleet_of(&[(759.0, 100.0), (500.0, 200.0)]);
        tick(&mut state, &[]);
        assert_eq!(state.fleet.direction, FleetDirection::Left);
        assert_eq!(state.fleet.enemies[0].pos, Vec2::new(760.0, 110.0));
        assert_eq!(state.fleet.enemies[1].pos, Vec2::new(501.0, 210.0));

        tick(&mut state, &[]);
        assert_eq!(state.fleet.direction, FleetDirection::Left);
        assert_eq!(state.fleet.enemies[0].pos, Vec2::new(759.0, 110.0));
    }

    #[test]
    fn test_fleet_reverses_at_left_edge_same_tick() {
        let mut state = active_state();
        state.fleet = fleet_of(&[(1.0, 100.0), (300.0, 200.0)]);
        state.fleet.direction = FleetDirection::Left;

        // Step to x = 0 and reverse in the same tick
        tick(&mut state, &[]);
        assert_eq!(state.fleet.direction, FleetDirection::Right);
        assert_eq!(state.fleet.enemies[0].pos, Vec2::new(0.0, 110.0));
        assert_eq!(state.fleet.enemies[1].pos, Vec2::new(299.0, 210.0));

        // One tick earlier the alien was clear of the edge
        let mut state = active_state();
        state.fleet = fleet_of(&[(2.0, 100.0)]);
        state.fleet.direction = FleetDirection::Left;
        tick(&mut state, &[]);
        assert_eq!(state.fleet.direction, FleetDirection::Left);
        assert_eq!(state.fleet.enemies[0].pos, Vec2::new(1.0, 100.0));
    }

    #[test]
    fn test_last_ship_hit_returns_to_menu() {
        let mut state = active_state();
        state.stats.ships_left = 1;
        state.fleet = fleet_of(&[(10.0, 570.0)]);

        tick(&mut state, &[]);

        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.stats.ships_left, 0);
        assert!(state.snapshot().show_play_button);
        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::ShipHit { ships_left: 0 },
                GameEvent::GameOver { score: 0 },
            ]
        );
    }

    #[test]
    fn test_ship_hit_with_lives_stalls_then_resumes() {
        let mut state = active_state();
        state.fleet = fleet_of(&[(380.0, 520.0)]);
        state.ship.moving_right = false;

        tick(&mut state, &[]);

        assert_eq!(state.phase, GamePhase::Active);
        assert_eq!(state.stats.ships_left, 2);
        assert_eq!(state.fleet.len(), 54);
        assert_eq!(state.ship.pos.x, 370.0);
        assert_eq!(state.pause_ticks, state.settings.ship_hit_pause_ticks);

        // Input is consumed during the stall but nothing moves
        let first = state.fleet.enemies[0].pos;
        tick(&mut state, &[InputEvent::KeyDown(Key::Right), InputEvent::KeyDown(Key::Fire)]);
        for _ in 1..state.settings.ship_hit_pause_ticks {
            tick(&mut state, &[]);
        }
        assert!(state.ship.moving_right);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.pending_fire, 1);
        assert_eq!(state.ship.pos.x, 370.0);
        assert_eq!(state.fleet.enemies[0].pos, first);
        assert!(!state.is_paused());

        // The buffered press fires on the first running tick
        tick(&mut state, &[]);
        assert_eq!(state.ship.pos.x, 371.5);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.pending_fire, 0);
    }

    #[test]
    fn test_fire_during_short_stall_spawns_after() {
        let mut state = active_state();
        state.pause_ticks = 5;
        tick(&mut state, &[InputEvent::KeyDown(Key::Fire)]);
        for _ in 0..4 {
            tick(&mut state, &[]);
        }
        assert!(state.projectiles.is_empty());

        tick(&mut state, &[]);
        assert_eq!(state.projectiles.len(), 1);
    }

    #[test]
    fn test_quit_honored_during_stall() {
        let mut state = active_state();
        state.pause_ticks = 10;
        tick(&mut state, &[InputEvent::KeyDown(Key::Quit)]);
        assert!(state.quit_requested);

        let mut state = active_state();
        tick(&mut state, &[InputEvent::Quit]);
        assert!(state.quit_requested);
    }

    #[test]
    fn test_high_score_survives_new_game() {
        let mut state = active_state();
        state.fleet = fleet_of(&[(100.0, 100.0), (300.0, 100.0)]);
        state.projectiles = vec![bullet_at(1, 110.0, 120.0)];
        tick(&mut state, &[]);
        assert_eq!(state.stats.high_score, 50);

        // Lose every ship
        while state.phase == GamePhase::Active {
            state.pause_ticks = 0;
            state.fleet = fleet_of(&[(10.0, 570.0)]);
            tick(&mut state, &[]);
        }
        assert_eq!(state.stats.score, 50);

        tick(&mut state, &[InputEvent::PointerClick { x: 400.0, y: 300.0 }]);
        assert_eq!(state.phase, GamePhase::Active);
        assert_eq!(state.stats.score, 0);
        assert_eq!(state.stats.high_score, 50);
        assert_eq!(state.stats.ships_left, 3);
    }

    #[test]
    fn test_empty_fleet_from_tiny_viewport() {
        let mut state = GameState::new(Viewport::new(100.0, 100.0), Settings::default());
        state.start_game();
        assert!(state.fleet.is_empty());
        for _ in 0..10 {
            tick(&mut state, &[]);
        }
        assert_eq!(state.phase, GamePhase::Active);
        assert_eq!(state.stats.level, 1);
    }
}
