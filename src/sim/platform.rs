//! Platforms and their per-tick behaviour

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::frames;
use crate::level::{PlatformDescriptor, PlatformType};
use crate::tuning::PlatformTuning;

/// Behaviour variant of a platform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlatformKind {
    Static,
    /// Slides horizontally around `origin_x`, reflecting at `origin_x ± range`
    Moving {
        origin_x: f32,
        direction: f32,
        range: f32,
        speed: f32,
    },
    /// Collapses `duration_ms` after it is first landed on
    Breakable {
        origin_x: f32,
        breaking: bool,
        elapsed_ms: f32,
        duration_ms: f32,
    },
    /// Launches the avatar upward on landing
    Boost { force: f32 },
}

impl PlatformKind {
    pub fn name(&self) -> &'static str {
        match self {
            PlatformKind::Static => "static",
            PlatformKind::Moving { .. } => "moving",
            PlatformKind::Breakable { .. } => "breakable",
            PlatformKind::Boost { .. } => "boost",
        }
    }
}

/// A solid box the avatar can stand on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// Index in the level descriptor
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub kind: PlatformKind,
}

impl Platform {
    pub fn new(id: u32, pos: Vec2, width: f32, height: f32, kind: PlatformKind) -> Self {
        Self {
            id,
            pos,
            width,
            height,
            kind,
        }
    }

    /// Build a platform from a level descriptor, filling unset parameters from tuning
    pub fn from_descriptor(id: u32, desc: &PlatformDescriptor, tuning: &PlatformTuning) -> Self {
        let kind = match desc.kind {
            PlatformType::Normal => PlatformKind::Static,
            PlatformType::Moving => PlatformKind::Moving {
                origin_x: desc.x,
                direction: 1.0,
                range: desc.range.unwrap_or(tuning.moving_range),
                speed: desc.speed.unwrap_or(tuning.moving_speed),
            },
            PlatformType::Breakable => PlatformKind::Breakable {
                origin_x: desc.x,
                breaking: false,
                elapsed_ms: 0.0,
                duration_ms: desc.break_duration.unwrap_or(tuning.break_duration_ms),
            },
            PlatformType::JumpBoost => PlatformKind::Boost {
                force: desc.force.unwrap_or(tuning.boost_force),
            },
        };
        Self::new(id, Vec2::new(desc.x, desc.y), desc.width, desc.height, kind)
    }

    /// Current bounds, derived from position so they never go stale
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    /// A collapsed platform is gone for the rest of the level
    pub fn is_removed(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Fraction of the break animation elapsed, 0 for everything but a breaking platform
    pub fn break_progress(&self) -> f32 {
        match self.kind {
            PlatformKind::Breakable {
                breaking: true,
                elapsed_ms,
                duration_ms,
                ..
            } => {
                if duration_ms <= 0.0 {
                    1.0
                } else {
                    (elapsed_ms / duration_ms).min(1.0)
                }
            }
            _ => 0.0,
        }
    }

    /// Trigger the collapse timer. Returns true only when this call started it.
    pub fn start_breaking(&mut self) -> bool {
        if self.is_removed() {
            return false;
        }
        match &mut self.kind {
            PlatformKind::Breakable { breaking, .. } if !*breaking => {
                *breaking = true;
                true
            }
            _ => false,
        }
    }

    /// Advance behaviour by one step. Returns true on the tick the platform collapses.
    pub fn update(&mut self, step_ms: f32, sim_time_ms: f64) -> bool {
        if self.is_removed() {
            return false;
        }

        match &mut self.kind {
            PlatformKind::Static | PlatformKind::Boost { .. } => false,
            PlatformKind::Moving {
                origin_x,
                direction,
                range,
                speed,
            } => {
                self.pos.x += *speed * *direction * frames(step_ms);
                if self.pos.x > *origin_x + *range {
                    self.pos.x = *origin_x + *range;
                    *direction = -1.0;
                } else if self.pos.x < *origin_x - *range {
                    self.pos.x = *origin_x - *range;
                    *direction = 1.0;
                }
                false
            }
            PlatformKind::Breakable {
                origin_x,
                breaking,
                elapsed_ms,
                duration_ms,
            } => {
                if !*breaking {
                    return false;
                }
                *elapsed_ms += step_ms;
                if *elapsed_ms >= *duration_ms {
                    self.pos.x = *origin_x;
                    self.width = 0.0;
                    self.height = 0.0;
                    return true;
                }
                let progress = *elapsed_ms / *duration_ms;
                let shake = (sim_time_ms / 50.0).sin() as f32 * 2.0 * (1.0 - progress);
                self.pos.x = *origin_x + shake;
                false
            }
        }
    }
}
