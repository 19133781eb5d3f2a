//! Game session
//!
//! Owns the simulation for one loaded level together with the fixed-step
//! clock and the latched input. The host calls [`Game::frame`] once per
//! presentation callback.

use crate::error::ConfigError;
use crate::level::LevelDescriptor;
use crate::sim::{FixedClock, FrameStats, GameEvent, GamePhase, SimState, Snapshot, TickInput, tick};
use crate::tuning::Tuning;

/// What one presentation frame produced
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameReport {
    pub ticks: u32,
    pub events: Vec<GameEvent>,
    /// Interpolation factor between the last two ticks
    pub alpha: f32,
}

pub struct Game {
    level: LevelDescriptor,
    tuning: Tuning,
    state: SimState,
    clock: FixedClock,
    input: TickInput,
    paused: bool,
}

impl Game {
    pub fn new(level: LevelDescriptor, tuning: Tuning) -> Result<Self, ConfigError> {
        level.validate()?;
        tuning.validate()?;

        let state = SimState::from_level(&level, &tuning);
        let clock = FixedClock::new(tuning.fixed_step_ms, tuning.max_frame_ms);
        log::info!(
            "Level {} \"{}\" started: {} platforms, {} coins",
            level.id,
            level.name,
            level.platforms.len(),
            level.coins.len()
        );

        Ok(Self {
            level,
            tuning,
            state,
            clock,
            input: TickInput::default(),
            paused: false,
        })
    }

    /// Latch input for the next frame
    ///
    /// Held state is replaced. Press and release edges accumulate until a tick
    /// consumes them, so an edge between two frames is never lost.
    pub fn set_input(&mut self, input: TickInput) {
        let jump_pressed = self.input.jump_pressed || input.jump_pressed;
        let jump_released = self.input.jump_released || input.jump_released;
        self.input = TickInput {
            jump_pressed,
            jump_released,
            ..input
        };
    }

    /// Advance by one frame of wall-clock time
    pub fn frame(&mut self, wall_delta_ms: f32) -> FrameReport {
        if self.paused {
            return FrameReport {
                alpha: self.clock.alpha(),
                ..Default::default()
            };
        }

        let Self {
            state, clock, input, ..
        } = self;
        let ticks = clock.advance(wall_delta_ms, |step| {
            tick(state, input, step);

            // Clear one-shot inputs after processing
            input.jump_pressed = false;
            input.jump_released = false;
        });

        FrameReport {
            ticks,
            events: self.state.drain_events(),
            alpha: self.clock.alpha(),
        }
    }

    pub fn pause(&mut self) {
        if !self.paused {
            log::info!("Paused at tick {}", self.state.time_ticks);
            self.paused = true;
        }
    }

    /// Resume without replaying the time spent paused
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.clock.reset();
            log::info!("Resumed");
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Rebuild the level from its descriptor
    pub fn restart(&mut self) {
        log::info!("Restarting level {}", self.level.id);
        self.state = SimState::from_level(&self.level, &self.tuning);
        self.clock.reset();
        self.input = TickInput::default();
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn level(&self) -> &LevelDescriptor {
        &self.level
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn frame_stats(&self) -> &FrameStats {
        self.clock.stats()
    }
}
