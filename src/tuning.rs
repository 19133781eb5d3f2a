//! Data-driven game balance
//!
//! Every field defaults to the matching constant in `crate::consts`. A tuning
//! file only needs the fields it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Integrator parameters (per reference frame)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhysicsTuning {
    pub gravity: f32,
    pub max_fall_speed: f32,
    pub ground_friction: f32,
    pub air_drag: f32,
    pub stop_threshold: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            max_fall_speed: MAX_FALL_SPEED,
            ground_friction: GROUND_FRICTION,
            air_drag: AIR_DRAG,
            stop_threshold: STOP_THRESHOLD,
        }
    }
}

/// Player avatar parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AvatarTuning {
    pub width: f32,
    pub height: f32,
    pub run_speed: f32,
    pub jump_force: f32,
    /// Multiplier applied to upward speed when jump is released early (1.0 disables it)
    pub jump_cut: f32,
    pub lives: u32,
    pub invincibility_ms: f32,
    pub respawn_invincibility_ms: f32,
    pub fall_margin: f32,
}

impl Default for AvatarTuning {
    fn default() -> Self {
        Self {
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            run_speed: PLAYER_SPEED,
            jump_force: PLAYER_JUMP_FORCE,
            jump_cut: JUMP_CUT,
            lives: PLAYER_LIVES,
            invincibility_ms: INVINCIBILITY_MS,
            respawn_invincibility_ms: RESPAWN_INVINCIBILITY_MS,
            fall_margin: FALL_MARGIN,
        }
    }
}

/// Defaults for platform variants when a descriptor leaves them out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlatformTuning {
    pub moving_speed: f32,
    pub moving_range: f32,
    pub break_duration_ms: f32,
    pub boost_force: f32,
}

impl Default for PlatformTuning {
    fn default() -> Self {
        Self {
            moving_speed: MOVING_SPEED,
            moving_range: MOVING_RANGE,
            break_duration_ms: BREAK_DURATION_MS,
            boost_force: BOOST_FORCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoinTuning {
    pub radius: f32,
    pub value: u32,
    pub remove_after_ms: f32,
    pub bob_amount: f32,
    pub bob_speed: f32,
}

impl Default for CoinTuning {
    fn default() -> Self {
        Self {
            radius: COIN_RADIUS,
            value: COIN_VALUE,
            remove_after_ms: COIN_REMOVE_AFTER_MS,
            bob_amount: COIN_BOB_AMOUNT,
            bob_speed: COIN_BOB_SPEED,
        }
    }
}

/// Complete balance sheet for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tuning {
    pub fixed_step_ms: f32,
    pub max_frame_ms: f32,
    pub physics: PhysicsTuning,
    pub avatar: AvatarTuning,
    pub platform: PlatformTuning,
    pub coin: CoinTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            fixed_step_ms: FIXED_STEP_MS,
            max_frame_ms: MAX_FRAME_MS,
            physics: PhysicsTuning::default(),
            avatar: AvatarTuning::default(),
            platform: PlatformTuning::default(),
            coin: CoinTuning::default(),
        }
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidTuning {
        field,
        reason: reason.to_string(),
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Largest distance the avatar can fall in a single tick
    pub fn max_fall_per_tick(&self) -> f32 {
        self.physics.max_fall_speed * crate::frames(self.fixed_step_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        let unit = |v: f32| v.is_finite() && v > 0.0 && v <= 1.0;

        if !self.fixed_step_ms.is_finite() || self.fixed_step_ms < MIN_FIXED_STEP_MS {
            return Err(invalid("fixedStepMs", "must be at least 0.1 ms"));
        }
        if !positive(self.max_frame_ms) || self.max_frame_ms < self.fixed_step_ms {
            return Err(invalid("maxFrameMs", "must be at least one fixed step"));
        }
        if !self.physics.gravity.is_finite() || self.physics.gravity < 0.0 {
            return Err(invalid("physics.gravity", "must be non-negative"));
        }
        if !positive(self.physics.max_fall_speed) {
            return Err(invalid("physics.maxFallSpeed", "must be positive"));
        }
        if !unit(self.physics.ground_friction) {
            return Err(invalid("physics.groundFriction", "must be in (0, 1]"));
        }
        if !unit(self.physics.air_drag) {
            return Err(invalid("physics.airDrag", "must be in (0, 1]"));
        }
        if !positive(self.avatar.width) || !positive(self.avatar.height) {
            return Err(invalid("avatar.size", "must be positive"));
        }
        if self.avatar.lives == 0 {
            return Err(invalid("avatar.lives", "must be at least 1"));
        }
        if !unit(self.avatar.jump_cut) {
            return Err(invalid("avatar.jumpCut", "must be in (0, 1]"));
        }
        if self.max_fall_per_tick() >= self.avatar.height {
            return Err(invalid(
                "physics.maxFallSpeed",
                "avatar would pass its own height in one tick",
            ));
        }
        if !positive(self.coin.radius) {
            return Err(invalid("coin.radius", "must be positive"));
        }
        if self.platform.break_duration_ms < 0.0 {
            return Err(invalid("platform.breakDurationMs", "must be non-negative"));
        }
        Ok(())
    }
}
