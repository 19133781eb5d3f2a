//! Pixel Jumper - simulation core for a 2D side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, entity state, tick)
//! - `game`: Session wrapping the fixed-timestep clock and latched input
//! - `level`: Level descriptors (JSON) and validation
//! - `tuning`: Data-driven game balance

pub mod autopilot;
pub mod error;
pub mod game;
pub mod level;
pub mod sim;
pub mod tuning;

pub use error::ConfigError;
pub use game::{FrameReport, Game};
pub use level::LevelDescriptor;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Reference frame length (ms). Velocities are expressed in pixels per reference frame.
    pub const REFERENCE_FRAME_MS: f32 = 1000.0 / 60.0;
    /// Fixed simulation timestep (60 Hz)
    pub const FIXED_STEP_MS: f32 = 1000.0 / 60.0;
    /// Smallest fixed step a tuning file may ask for
    pub const MIN_FIXED_STEP_MS: f32 = 0.1;
    /// Wall-clock deltas above this are clamped to prevent a runaway tick backlog
    pub const MAX_FRAME_MS: f32 = 100.0;

    /// Physics defaults (per reference frame)
    pub const GRAVITY: f32 = 0.5;
    pub const MAX_FALL_SPEED: f32 = 20.0;
    pub const GROUND_FRICTION: f32 = 0.85;
    pub const AIR_DRAG: f32 = 0.98;
    /// Horizontal speeds below this snap to zero
    pub const STOP_THRESHOLD: f32 = 0.1;

    /// Avatar defaults
    pub const PLAYER_WIDTH: f32 = 32.0;
    pub const PLAYER_HEIGHT: f32 = 64.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_JUMP_FORCE: f32 = -15.0;
    pub const PLAYER_LIVES: u32 = 3;
    pub const JUMP_CUT: f32 = 0.5;
    pub const INVINCIBILITY_MS: f32 = 1000.0;
    pub const RESPAWN_INVINCIBILITY_MS: f32 = 2000.0;
    /// How far below the level bottom the avatar may fall before it counts as lost
    pub const FALL_MARGIN: f32 = 100.0;

    /// Platform defaults
    pub const PLATFORM_WIDTH: f32 = 128.0;
    pub const PLATFORM_HEIGHT: f32 = 32.0;
    pub const MOVING_SPEED: f32 = 2.0;
    pub const MOVING_RANGE: f32 = 100.0;
    pub const BREAK_DURATION_MS: f32 = 1000.0;
    pub const BOOST_FORCE: f32 = -18.0;

    /// Coin defaults
    pub const COIN_RADIUS: f32 = 16.0;
    pub const COIN_VALUE: u32 = 10;
    /// Collected coins stay in the active set this long before removal
    pub const COIN_REMOVE_AFTER_MS: f32 = 1000.0;
    pub const COIN_BOB_AMOUNT: f32 = 5.0;
    pub const COIN_BOB_SPEED: f32 = 0.05;
}

/// Convert a step in milliseconds to reference frames
#[inline]
pub fn frames(step_ms: f32) -> f32 {
    step_ms / consts::REFERENCE_FRAME_MS
}
