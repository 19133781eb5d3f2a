//! Fixed timestep simulation tick
//!
//! Advances a level by exactly one step. Stage order is fixed: input,
//! integration, platforms, coins, platform contacts, world bounds and fall,
//! then progress.

use super::collision::circle_rect;
use super::contact::resolve_platforms;
use super::physics::clamp_to_world;
use super::state::{DamageOutcome, GameEvent, GamePhase, SimState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickInput {
    /// -1 left, 0 none, 1 right. Other values are reduced to their sign.
    pub horizontal: i8,
    /// Carried for collaborators (ladders, menus); the platformer ignores it
    pub vertical: f32,
    /// Jump went down this tick
    pub jump_pressed: bool,
    pub jump_held: bool,
    /// Jump came up this tick
    pub jump_released: bool,
}

/// Advance the simulation by one fixed step
pub fn tick(state: &mut SimState, input: &TickInput, step_ms: f32) {
    if !state.is_running() {
        return;
    }

    state.time_ticks += 1;
    state.time_ms += f64::from(step_ms);
    state.progress.elapsed_ms += f64::from(step_ms);

    let was_grounded = state.avatar.body.on_ground;

    apply_input(state, input, step_ms);
    state.integrator.integrate(&mut state.avatar.body, step_ms);
    update_platforms(state, step_ms);
    update_coins(state, step_ms);

    for event in resolve_platforms(&mut state.avatar, &mut state.platforms, was_grounded) {
        if event == GameEvent::Landed {
            log::debug!("Landed at {:?}", state.avatar.body.pos);
        }
        state.push_event(event);
    }

    let size = state.avatar.size;
    clamp_to_world(&mut state.avatar.body, size, state.world.x);
    check_fall(state);

    evaluate_progress(state);
}

fn apply_input(state: &mut SimState, input: &TickInput, step_ms: f32) {
    let tuning = &state.tuning.avatar;
    let avatar = &mut state.avatar;

    avatar.tick_invincibility(step_ms);

    let horizontal = input.horizontal.signum();
    if horizontal != 0 {
        avatar.body.vel.x = horizontal as f32 * tuning.run_speed;
        avatar.facing_right = horizontal > 0;
    }

    let jumped = input.jump_pressed && avatar.body.on_ground;
    if jumped {
        avatar.body.vel.y = tuning.jump_force;
        avatar.body.on_ground = false;
        avatar.is_jumping = true;
        avatar.jump_cut_used = false;
    } else if input.jump_released && avatar.is_jumping && !avatar.jump_cut_used && avatar.body.vel.y < 0.0 {
        // Short hop
        avatar.body.vel.y *= tuning.jump_cut;
        avatar.jump_cut_used = true;
    }

    if jumped {
        state.push_event(GameEvent::Jumped);
    }
}

fn update_platforms(state: &mut SimState, step_ms: f32) {
    let sim_time = state.time_ms;
    let mut broken = Vec::new();
    for platform in &mut state.platforms {
        if platform.update(step_ms, sim_time) {
            broken.push(platform.id);
        }
    }
    for id in broken {
        log::debug!("Platform {id} collapsed");
        state.push_event(GameEvent::PlatformBroken { platform: id });
    }
}

fn update_coins(state: &mut SimState, step_ms: f32) {
    let avatar_rect = state.avatar.rect();
    let mut collected = Vec::new();

    for coin in &mut state.coins {
        coin.update(step_ms);
        if coin.is_active() && circle_rect(&coin.circle(), &avatar_rect).is_some() {
            if let Some(value) = coin.collect() {
                collected.push((coin.id, value));
            }
        }
    }

    for (id, value) in collected {
        state.progress.collected_coins += 1;
        state.progress.score += value;
        log::debug!(
            "Coin {id} collected ({}/{})",
            state.progress.collected_coins,
            state.progress.total_coins
        );
        state.push_event(GameEvent::CoinCollected { coin: id, value });
    }

    // Deferred so removal never disturbs the iteration above
    state.coins.retain(|coin| !coin.is_removable());
}

fn check_fall(state: &mut SimState) {
    let limit = state.world.y + state.tuning.avatar.fall_margin;
    if state.avatar.body.pos.y <= limit {
        return;
    }

    let invincibility_ms = state.tuning.avatar.invincibility_ms;
    let respawn_ms = state.tuning.avatar.respawn_invincibility_ms;

    if state.avatar.is_invincible() {
        // Still protected from the last hit: put the avatar back without a penalty
        state.avatar.respawn(respawn_ms);
        state.push_event(GameEvent::Respawned);
        return;
    }

    match state.avatar.take_damage(1, invincibility_ms) {
        DamageOutcome::Ignored => {}
        DamageOutcome::Hurt { lives_remaining } => {
            state.progress.deaths += 1;
            log::info!("Fell out of level {}, {lives_remaining} lives left", state.level_id);
            state.push_event(GameEvent::Damaged { lives_remaining });
            state.avatar.respawn(respawn_ms);
            state.push_event(GameEvent::Respawned);
        }
        DamageOutcome::Died => {
            state.progress.deaths += 1;
            log::info!("Out of lives on level {}", state.level_id);
            state.phase = GamePhase::Dead;
            state.push_event(GameEvent::Died);
        }
    }
}

fn evaluate_progress(state: &mut SimState) {
    if state.phase != GamePhase::Playing {
        return;
    }
    if state.progress.is_complete() {
        log::info!(
            "Level {} complete in {:.1}s, {}%",
            state.level_id,
            state.progress.elapsed_ms / 1000.0,
            state.progress.completion_percent()
        );
        state.phase = GamePhase::Complete;
        state.push_event(GameEvent::LevelComplete);
    } else if state.progress.is_time_expired() {
        log::info!("Time up on level {}", state.level_id);
        state.phase = GamePhase::TimeUp;
        state.push_event(GameEvent::TimeExpired);
    }
}
