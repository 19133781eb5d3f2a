//! Coins

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Circle;
use crate::tuning::CoinTuning;

/// Lifecycle of a coin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CoinPhase {
    Active,
    /// Collected, waiting out the grace period before removal
    Collected { elapsed_ms: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    /// Index in the level descriptor
    pub id: u32,
    /// Resting centre, before bobbing
    pub base: Vec2,
    pub radius: f32,
    pub value: u32,
    pub phase: CoinPhase,
    /// Time spent active, drives the bob
    pub active_ms: f32,
    bob_amount: f32,
    bob_speed: f32,
    remove_after_ms: f32,
}

impl Coin {
    pub fn new(id: u32, base: Vec2, tuning: &CoinTuning) -> Self {
        Self {
            id,
            base,
            radius: tuning.radius,
            value: tuning.value,
            phase: CoinPhase::Active,
            active_ms: 0.0,
            bob_amount: tuning.bob_amount,
            bob_speed: tuning.bob_speed,
            remove_after_ms: tuning.remove_after_ms,
        }
    }

    /// Centre including the bob offset. Bobbing freezes once collected.
    pub fn center(&self) -> Vec2 {
        let bob = (self.active_ms * self.bob_speed).sin() * self.bob_amount;
        self.base + Vec2::new(0.0, bob)
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.center(), self.radius)
    }

    pub fn is_active(&self) -> bool {
        self.phase == CoinPhase::Active
    }

    /// Take the coin's value. Only the first call yields anything.
    pub fn collect(&mut self) -> Option<u32> {
        match self.phase {
            CoinPhase::Active => {
                self.phase = CoinPhase::Collected { elapsed_ms: 0.0 };
                Some(self.value)
            }
            CoinPhase::Collected { .. } => None,
        }
    }

    pub fn update(&mut self, step_ms: f32) {
        match &mut self.phase {
            CoinPhase::Active => self.active_ms += step_ms,
            CoinPhase::Collected { elapsed_ms } => *elapsed_ms += step_ms,
        }
    }

    /// Collected long enough ago to drop from the active set
    pub fn is_removable(&self) -> bool {
        matches!(self.phase, CoinPhase::Collected { elapsed_ms } if elapsed_ms > self.remove_after_ms)
    }
}
