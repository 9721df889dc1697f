//! Alien Invasion headless driver
//!
//! Runs the simulation without a window: clicks Play, lets a seeded
//! autopilot fly the ship until the game ends or the tick budget runs out,
//! then prints the final snapshot as JSON.
//!
//! Usage: `alien-invasion [seed] [max_ticks]`. Set `ALIEN_INVASION_SETTINGS`
//! to a JSON file to override the default tunables.

use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use alien_invasion::Settings;
use alien_invasion::consts::*;
use alien_invasion::sim::{Body, GameEvent, GameState, InputEvent, Key, Viewport, tick};

/// Two minutes of play
const DEFAULT_MAX_TICKS: u64 = 120 * TICK_RATE as u64;

/// Chance of pressing fire on any given tick
const FIRE_CHANCE: f64 = 0.25;

/// Dead zone around the target before the pilot steers
const STEER_TOLERANCE: f32 = 4.0;

/// Random-but-reproducible player: chases the lowest alien and fires often
struct Autopilot {
    rng: Pcg32,
    left_held: bool,
    right_held: bool,
}

impl Autopilot {
    fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            left_held: false,
            right_held: false,
        }
    }

    /// Emit a key transition only when the held state changes
    fn set_key(held: &mut bool, key: Key, want: bool, events: &mut Vec<InputEvent>) {
        if *held != want {
            events.push(if want {
                InputEvent::KeyDown(key)
            } else {
                InputEvent::KeyUp(key)
            });
            *held = want;
        }
    }

    fn decide(&mut self, state: &GameState) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let ship_x = state.ship.bounds().center().x;

        let jitter = self.rng.random_range(-20.0..20.0);
        let target = state
            .fleet
            .enemies
            .iter()
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|e| e.bounds().center().x + jitter);

        let (left, right) = match target {
            Some(x) if x < ship_x - STEER_TOLERANCE => (true, false),
            Some(x) if x > ship_x + STEER_TOLERANCE => (false, true),
            _ => (false, false),
        };
        Self::set_key(&mut self.left_held, Key::Left, left, &mut events);
        Self::set_key(&mut self.right_held, Key::Right, right, &mut events);

        if self.rng.random_bool(FIRE_CHANCE) {
            events.push(InputEvent::KeyDown(Key::Fire));
            events.push(InputEvent::KeyUp(Key::Fire));
        }
        events
    }
}

fn log_events(state: &mut GameState) {
    for event in state.drain_events() {
        match event {
            GameEvent::EnemiesDestroyed { count, points } => {
                log::debug!("Destroyed {} aliens (+{})", count, points);
            }
            other => log::info!("{:?}", other),
        }
    }
}

/// Positional argument `index`, or `default` when absent or unparsable
fn parse_arg<T>(args: &[String], index: usize, name: &str, default: T) -> T
where
    T: FromStr + Display,
{
    match args.get(index) {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid {name} {raw:?}, using {default}");
            default
        }),
    }
}

fn main() {
    env_logger::init();
    log::info!("Alien Invasion (headless) starting...");

    let args: Vec<String> = std::env::args().collect();
    let seed = parse_arg(&args, 1, "seed", 12345u64);
    let max_ticks = parse_arg(&args, 2, "max_ticks", DEFAULT_MAX_TICKS);

    let settings = match std::env::var_os("ALIEN_INVASION_SETTINGS") {
        Some(path) => Settings::load(Path::new(&path)),
        None => Settings::default(),
    };

    let viewport = Viewport::new(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT);
    let mut state = GameState::new(viewport, settings);
    let mut pilot = Autopilot::new(seed);
    log::info!("Seed {}, {} aliens per fleet", seed, state.fleet.len());

    let play = state.play_button.center();
    tick(&mut state, &[InputEvent::PointerClick { x: play.x, y: play.y }]);
    log_events(&mut state);

    let mut ticks = 1;
    while state.is_active() && !state.quit_requested && ticks < max_ticks {
        let events = pilot.decide(&state);
        tick(&mut state, &events);
        log_events(&mut state);
        ticks += 1;
    }

    if state.is_active() {
        log::info!("Tick budget reached after {} ticks", ticks);
    }

    match serde_json::to_string_pretty(&state.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize snapshot: {e}"),
    }
}
