//! Simulation state and entity types
//!
//! Everything a tick reads or writes lives in [`SimState`]. It is built from a
//! validated level and owned by one session for the life of that level.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::physics::{Body, Integrator};
use super::pickup::Coin;
use super::platform::Platform;
use crate::level::LevelDescriptor;
use crate::tuning::{AvatarTuning, Tuning};

/// Current phase of a level run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// All coins collected in time
    Complete,
    /// Out of lives
    Dead,
    /// Time limit reached
    TimeUp,
}

/// Things that happened during a tick, in the order they happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Landed,
    Jumped,
    Boosted { platform: u32 },
    Damaged { lives_remaining: u32 },
    Died,
    Respawned,
    CoinCollected { coin: u32, value: u32 },
    PlatformBroken { platform: u32 },
    LevelComplete,
    TimeExpired,
}

/// Movement state of the avatar. Invincibility is an overlay, see [`Avatar::is_invincible`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvatarState {
    Airborne,
    Grounded,
    Dead,
}

/// Result of [`Avatar::take_damage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Invincible or already dead, nothing changed
    Ignored,
    Hurt { lives_remaining: u32 },
    Died,
}

/// The player character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Avatar {
    pub body: Body,
    pub size: Vec2,
    pub is_jumping: bool,
    /// Jump cut already applied to the current jump
    pub jump_cut_used: bool,
    /// Remaining invincibility (ms)
    pub invincible_ms: f32,
    pub lives: u32,
    pub facing_right: bool,
    /// Where respawns put the avatar
    pub spawn: Vec2,
}

impl Avatar {
    pub fn new(spawn: Vec2, tuning: &AvatarTuning) -> Self {
        Self {
            body: Body::at(spawn),
            size: Vec2::new(tuning.width, tuning.height),
            is_jumping: false,
            jump_cut_used: false,
            invincible_ms: 0.0,
            lives: tuning.lives,
            facing_right: true,
            spawn,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.body.pos, self.size)
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_ms > 0.0
    }

    pub fn is_alive(&self) -> bool {
        self.lives > 0
    }

    pub fn state(&self) -> AvatarState {
        if !self.is_alive() {
            AvatarState::Dead
        } else if self.body.on_ground {
            AvatarState::Grounded
        } else {
            AvatarState::Airborne
        }
    }

    /// Count the invincibility window down, clamping at zero
    pub fn tick_invincibility(&mut self, step_ms: f32) {
        if self.invincible_ms > 0.0 {
            self.invincible_ms = (self.invincible_ms - step_ms).max(0.0);
        }
    }

    /// Lose `amount` lives unless invincible. Survivors get `window_ms` of invincibility.
    pub fn take_damage(&mut self, amount: u32, window_ms: f32) -> DamageOutcome {
        if self.is_invincible() || !self.is_alive() {
            return DamageOutcome::Ignored;
        }
        self.lives = self.lives.saturating_sub(amount);
        if self.lives == 0 {
            return DamageOutcome::Died;
        }
        self.invincible_ms = window_ms;
        DamageOutcome::Hurt {
            lives_remaining: self.lives,
        }
    }

    /// Back to the spawn point at rest, with a fresh invincibility window
    pub fn respawn(&mut self, window_ms: f32) {
        self.body = Body::at(self.spawn);
        self.is_jumping = false;
        self.jump_cut_used = false;
        self.invincible_ms = window_ms;
    }
}

/// Coin and timer bookkeeping for the running level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelProgress {
    pub total_coins: u32,
    pub collected_coins: u32,
    /// Sum of collected coin values
    pub score: u32,
    pub elapsed_ms: f64,
    /// Seconds, 0 for no limit
    pub time_limit_s: f32,
    pub deaths: u32,
}

impl LevelProgress {
    pub fn new(total_coins: u32, time_limit_s: f32) -> Self {
        Self {
            total_coins,
            collected_coins: 0,
            score: 0,
            elapsed_ms: 0.0,
            time_limit_s,
            deaths: 0,
        }
    }

    pub fn has_time_limit(&self) -> bool {
        self.time_limit_s > 0.0
    }

    pub fn is_time_expired(&self) -> bool {
        self.has_time_limit() && self.elapsed_ms / 1000.0 >= f64::from(self.time_limit_s)
    }

    pub fn all_coins_collected(&self) -> bool {
        self.collected_coins >= self.total_coins
    }

    pub fn is_complete(&self) -> bool {
        self.all_coins_collected() && !self.is_time_expired()
    }

    /// Seconds left, `None` without a limit
    pub fn remaining_s(&self) -> Option<f32> {
        self.has_time_limit()
            .then(|| (f64::from(self.time_limit_s) - self.elapsed_ms / 1000.0).max(0.0) as f32)
    }

    /// 70% for coins, 30% for time left, rounded. Levels without coins report 0.
    pub fn completion_percent(&self) -> u32 {
        if self.total_coins == 0 {
            return 0;
        }
        let coins = self.collected_coins as f32 / self.total_coins as f32 * 0.7;
        let time = match self.remaining_s() {
            Some(remaining) => remaining / self.time_limit_s * 0.3,
            None => 0.3,
        };
        ((coins + time) * 100.0).round() as u32
    }
}

/// Read-only view of the avatar for presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarView {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub state: AvatarState,
    pub invincible: bool,
    pub lives: u32,
    pub facing_right: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformView {
    pub id: u32,
    pub rect: Rect,
    pub kind: String,
    pub removed: bool,
    pub break_progress: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinView {
    pub id: u32,
    pub center: Vec2,
    pub radius: f32,
    pub collected: bool,
}

/// Everything presentation needs after a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub time_ms: f64,
    pub phase: GamePhase,
    pub avatar: AvatarView,
    pub platforms: Vec<PlatformView>,
    pub coins: Vec<CoinView>,
    pub progress: LevelProgress,
}

/// Complete simulation state for one loaded level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    pub level_id: u32,
    /// Level width and height
    pub world: Vec2,
    pub phase: GamePhase,
    pub avatar: Avatar,
    /// In descriptor order, never reordered
    pub platforms: Vec<Platform>,
    /// In descriptor order; collected coins drop out after their grace period
    pub coins: Vec<Coin>,
    pub progress: LevelProgress,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Accumulated simulation time (ms)
    pub time_ms: f64,
    pub integrator: Integrator,
    pub tuning: Tuning,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl SimState {
    /// Build entities from a level. The level must already be validated.
    pub fn from_level(level: &LevelDescriptor, tuning: &Tuning) -> Self {
        let platforms = level
            .platforms
            .iter()
            .enumerate()
            .map(|(i, desc)| Platform::from_descriptor(i as u32, desc, &tuning.platform))
            .collect();
        let coins: Vec<Coin> = level
            .coins
            .iter()
            .enumerate()
            .map(|(i, c)| Coin::new(i as u32, Vec2::new(c.x, c.y), &tuning.coin))
            .collect();

        level.warn_thin_platforms(tuning.max_fall_per_tick());

        Self {
            level_id: level.id,
            world: Vec2::new(level.width, level.height),
            phase: GamePhase::Playing,
            avatar: Avatar::new(level.start_position.into(), &tuning.avatar),
            platforms,
            progress: LevelProgress::new(coins.len() as u32, level.time_limit),
            coins,
            time_ticks: 0,
            time_ms: 0.0,
            integrator: Integrator::from_tuning(&tuning.physics),
            tuning: tuning.clone(),
            events: Vec::new(),
        }
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events since the last drain, oldest first
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn snapshot(&self) -> Snapshot {
        let avatar = &self.avatar;
        Snapshot {
            tick: self.time_ticks,
            time_ms: self.time_ms,
            phase: self.phase,
            avatar: AvatarView {
                pos: avatar.body.pos,
                vel: avatar.body.vel,
                size: avatar.size,
                state: avatar.state(),
                invincible: avatar.is_invincible(),
                lives: avatar.lives,
                facing_right: avatar.facing_right,
            },
            platforms: self
                .platforms
                .iter()
                .map(|p| PlatformView {
                    id: p.id,
                    rect: p.rect(),
                    kind: p.kind.name().to_string(),
                    removed: p.is_removed(),
                    break_progress: p.break_progress(),
                })
                .collect(),
            coins: self
                .coins
                .iter()
                .map(|c| CoinView {
                    id: c.id,
                    center: c.center(),
                    radius: c.radius,
                    collected: !c.is_active(),
                })
                .collect(),
            progress: self.progress.clone(),
        }
    }
}
