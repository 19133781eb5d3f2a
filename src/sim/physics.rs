//! Euler integration for kinematic bodies
//!
//! Rates are per reference frame and scaled by `frames(step)`, so the same
//! tuning behaves the same whatever fixed step the clock runs at.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::frames;
use crate::tuning::PhysicsTuning;

/// Position, velocity and support state of a moving box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    /// Supported by a platform (established by collision resolution)
    pub on_ground: bool,
}

impl Body {
    pub fn at(pos: Vec2) -> Self {
        Self {
            pos,
            ..Default::default()
        }
    }
}

/// Which world edges a body was clamped against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundaryHits {
    pub left: bool,
    pub right: bool,
    pub top: bool,
}

impl BoundaryHits {
    pub fn any(&self) -> bool {
        self.left || self.right || self.top
    }
}

/// Shape of a jump arc under constant gravity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpTrajectory {
    /// Reference frames until the apex
    pub time_to_peak: f32,
    /// Height gained at the apex (pixels, positive)
    pub max_height: f32,
    /// Frames until back at the take-off height
    pub total_time: f32,
}

/// Advances bodies by one fixed step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Integrator {
    pub gravity: f32,
    pub max_fall_speed: f32,
    pub ground_friction: f32,
    pub air_drag: f32,
    pub stop_threshold: f32,
}

impl Default for Integrator {
    fn default() -> Self {
        Self::from_tuning(&PhysicsTuning::default())
    }
}

impl Integrator {
    pub fn from_tuning(tuning: &PhysicsTuning) -> Self {
        Self {
            gravity: tuning.gravity,
            max_fall_speed: tuning.max_fall_speed,
            ground_friction: tuning.ground_friction,
            air_drag: tuning.air_drag,
            stop_threshold: tuning.stop_threshold,
        }
    }

    /// Integrate one step
    ///
    /// `on_ground` on entry is last tick's support. It is cleared here and only
    /// collision resolution may set it again, so the body is airborne while
    /// gravity accumulates. Friction vs drag uses the support from last tick.
    pub fn integrate(&self, body: &mut Body, step_ms: f32) {
        let supported = body.on_ground;
        body.on_ground = false;

        let f = frames(step_ms);
        if f <= 0.0 {
            return;
        }

        body.vel.y = (body.vel.y + self.gravity * f).min(self.max_fall_speed);

        let decay = if supported {
            self.ground_friction
        } else {
            self.air_drag
        };
        body.vel.x *= decay.powf(f);
        if body.vel.x.abs() < self.stop_threshold {
            body.vel.x = 0.0;
        }

        body.pos += body.vel * f;
    }

    /// Continuous force (per frame²) over a step
    pub fn apply_force(&self, body: &mut Body, force: Vec2, step_ms: f32) {
        body.vel += force * frames(step_ms);
    }

    /// Instantaneous change of velocity
    pub fn apply_impulse(&self, body: &mut Body, impulse: Vec2) {
        body.vel += impulse;
    }

    /// Scale velocity down to `max_speed` if it is faster
    pub fn limit_speed(&self, body: &mut Body, max_speed: f32) {
        let speed = body.vel.length();
        if speed > max_speed && speed > 0.0 {
            body.vel *= max_speed / speed;
        }
    }

    /// Apex and air time of a jump with the given (negative, upward) launch speed
    pub fn jump_trajectory(&self, jump_force: f32) -> JumpTrajectory {
        if self.gravity <= 0.0 || jump_force >= 0.0 {
            return JumpTrajectory {
                time_to_peak: 0.0,
                max_height: 0.0,
                total_time: 0.0,
            };
        }
        let time_to_peak = -jump_force / self.gravity;
        let peak_offset = jump_force * time_to_peak + 0.5 * self.gravity * time_to_peak * time_to_peak;
        JumpTrajectory {
            time_to_peak,
            max_height: peak_offset.abs(),
            total_time: time_to_peak * 2.0,
        }
    }
}

/// Clamp a box against the left, right and top world edges
///
/// The bottom is left open: falling out is handled as a lost life, not a wall.
pub fn clamp_to_world(body: &mut Body, size: Vec2, world_width: f32) -> BoundaryHits {
    let mut hits = BoundaryHits::default();

    if body.pos.x < 0.0 {
        body.pos.x = 0.0;
        body.vel.x = 0.0;
        hits.left = true;
    }
    if body.pos.x + size.x > world_width {
        body.pos.x = (world_width - size.x).max(0.0);
        body.vel.x = 0.0;
        hits.right = true;
    }
    if body.pos.y < 0.0 {
        body.pos.y = 0.0;
        body.vel.y = body.vel.y.max(0.0);
        hits.top = true;
    }

    hits
}
