//! Demo autopilot
//!
//! Produces plausible input from the current state: head for the nearest
//! coin, jump at ledges and under coins, hold the jump for a random time.
//! Seeded, so a run with the same seed and level replays exactly.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::sim::{SimState, TickInput};

/// How far ahead of the avatar's leading edge to look for ground
const LEDGE_LOOKAHEAD: f32 = 8.0;
/// Coins within this horizontal distance and above the avatar trigger a jump
const COIN_JUMP_REACH: f32 = 60.0;

#[derive(Debug, Clone)]
pub struct Autopilot {
    rng: Pcg32,
    /// Ticks left to keep jump held
    hold_ticks: u32,
    /// Ticks to keep wandering in `wander_dir` instead of chasing a coin
    wander_ticks: u32,
    wander_dir: i8,
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            hold_ticks: 0,
            wander_ticks: 0,
            wander_dir: 1,
        }
    }

    pub fn next_input(&mut self, state: &SimState) -> TickInput {
        let mut input = TickInput::default();
        if !state.is_running() {
            return input;
        }

        let avatar = &state.avatar;
        let rect = avatar.rect();
        let center = rect.center();

        let target = state
            .coins
            .iter()
            .filter(|c| c.is_active())
            .min_by(|a, b| {
                let da = (a.base.x - center.x).abs();
                let db = (b.base.x - center.x).abs();
                da.total_cmp(&db)
            })
            .map(|c| c.center());

        if self.wander_ticks > 0 {
            self.wander_ticks -= 1;
            input.horizontal = self.wander_dir;
        } else if let Some(coin) = target {
            let dx = coin.x - center.x;
            input.horizontal = if dx.abs() < 4.0 { 0 } else { dx.signum() as i8 };
            if self.rng.random_bool(0.005) {
                self.wander_ticks = self.rng.random_range(20..90);
                self.wander_dir = if self.rng.random_bool(0.5) { 1 } else { -1 };
            }
        } else {
            input.horizontal = 1;
        }

        if self.hold_ticks > 0 {
            self.hold_ticks -= 1;
            input.jump_held = true;
            if self.hold_ticks == 0 {
                input.jump_held = false;
                input.jump_released = true;
            }
        } else if avatar.body.on_ground {
            let ledge_ahead = input.horizontal != 0 && !ground_ahead(state, input.horizontal);
            let coin_above = target.is_some_and(|coin| {
                (coin.x - center.x).abs() < COIN_JUMP_REACH && coin.y < rect.y
            });
            if ledge_ahead || coin_above || self.rng.random_bool(0.01) {
                input.jump_pressed = true;
                input.jump_held = true;
                self.hold_ticks = self.rng.random_range(6..30);
            }
        }

        input
    }
}

/// Is there a platform just past the avatar's leading edge at foot height
fn ground_ahead(state: &SimState, direction: i8) -> bool {
    let rect = state.avatar.rect();
    let probe_x = if direction > 0 {
        rect.right() + LEDGE_LOOKAHEAD
    } else {
        rect.x - LEDGE_LOOKAHEAD
    };
    let probe_y = rect.bottom() + 1.0;

    state.platforms.iter().filter(|p| !p.is_removed()).any(|p| {
        let r = p.rect();
        probe_x >= r.x && probe_x <= r.right() && probe_y >= r.y && probe_y <= r.bottom()
    })
}
