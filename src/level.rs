//! Level descriptors
//!
//! Levels arrive as JSON and are rejected here if malformed, so the simulation
//! only ever sees well-formed geometry.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{PLATFORM_HEIGHT, PLATFORM_WIDTH};
use crate::error::ConfigError;

/// Platform behaviour as named in level files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlatformType {
    #[default]
    #[serde(alias = "static")]
    Normal,
    Moving,
    Breakable,
    #[serde(alias = "boost")]
    JumpBoost,
}

/// Point in level coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl From<Point> for Vec2 {
    fn from(p: Point) -> Self {
        Vec2::new(p.x, p.y)
    }
}

fn default_platform_width() -> f32 {
    PLATFORM_WIDTH
}

fn default_platform_height() -> f32 {
    PLATFORM_HEIGHT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformDescriptor {
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_platform_width")]
    pub width: f32,
    #[serde(default = "default_platform_height")]
    pub height: f32,
    #[serde(default, rename = "type")]
    pub kind: PlatformType,
    /// Moving platforms: pixels per reference frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
    /// Moving platforms: travel either side of the start x
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<f32>,
    /// Boost platforms: vertical launch velocity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_duration: Option<f32>,
}

/// Coin centre
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoinDescriptor {
    pub x: f32,
    pub y: f32,
}

/// A complete level as loaded from disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDescriptor {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub description: String,
    pub width: f32,
    pub height: f32,
    pub start_position: Point,
    pub end_position: Point,
    pub platforms: Vec<PlatformDescriptor>,
    pub coins: Vec<CoinDescriptor>,
    /// Not simulated; carried through for other collaborators
    #[serde(default)]
    pub enemies: Vec<serde_json::Value>,
    /// Seconds, 0 for no limit
    pub time_limit: f32,
}

fn invalid(field: impl Into<String>, reason: &str) -> ConfigError {
    ConfigError::InvalidLevel {
        field: field.into(),
        reason: reason.to_string(),
    }
}

impl LevelDescriptor {
    /// Parse and validate a level document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let level: LevelDescriptor = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let level = Self::from_json(&json)?;
        log::info!(
            "Level {} loaded from {}: {} platforms, {} coins",
            level.id,
            path.as_ref().display(),
            level.platforms.len(),
            level.coins.len()
        );
        Ok(level)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.id == 0 {
            return Err(invalid("id", "must be positive"));
        }
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(invalid("width", "must be positive"));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(invalid("height", "must be positive"));
        }
        if !(self.start_position.x.is_finite() && self.start_position.y.is_finite()) {
            return Err(invalid("startPosition", "must be finite"));
        }
        if !(self.end_position.x.is_finite() && self.end_position.y.is_finite()) {
            return Err(invalid("endPosition", "must be finite"));
        }
        if !self.time_limit.is_finite() || self.time_limit < 0.0 {
            return Err(invalid("timeLimit", "must be non-negative"));
        }

        for (i, p) in self.platforms.iter().enumerate() {
            let field = |name: &str| format!("platforms[{i}].{name}");
            if !(p.x.is_finite() && p.y.is_finite()) {
                return Err(invalid(field("x"), "position must be finite"));
            }
            if !(p.width.is_finite() && p.width > 0.0) {
                return Err(invalid(field("width"), "must be positive"));
            }
            if !(p.height.is_finite() && p.height > 0.0) {
                return Err(invalid(field("height"), "must be positive"));
            }
            if p.speed.is_some_and(|s| !(s.is_finite() && s > 0.0)) {
                return Err(invalid(field("speed"), "must be positive"));
            }
            if p.range.is_some_and(|r| !(r.is_finite() && r > 0.0)) {
                return Err(invalid(field("range"), "must be positive"));
            }
            if p.force.is_some_and(|f| !f.is_finite()) {
                return Err(invalid(field("force"), "must be finite"));
            }
            if p.break_duration.is_some_and(|d| !(d.is_finite() && d >= 0.0)) {
                return Err(invalid(field("breakDuration"), "must be non-negative"));
            }
        }

        for (i, c) in self.coins.iter().enumerate() {
            if !(c.x.is_finite() && c.y.is_finite()) {
                return Err(invalid(format!("coins[{i}]"), "position must be finite"));
            }
        }

        Ok(())
    }

    /// Warn about platforms the avatar could pass through in a single tick
    pub fn warn_thin_platforms(&self, max_travel_per_tick: f32) {
        for (i, p) in self.platforms.iter().enumerate() {
            if p.height <= max_travel_per_tick {
                log::warn!(
                    "Level {}: platform {} is {}px thick, avatar can fall {}px per tick",
                    self.id,
                    i,
                    p.height,
                    max_travel_per_tick
                );
            }
        }
    }
}

const BUILTIN_LEVELS: [&str; 3] = [
    include_str!("../levels/level1.json"),
    include_str!("../levels/level2.json"),
    include_str!("../levels/level3.json"),
];

/// The levels shipped with the game, sorted by id
pub fn builtin_levels() -> Result<Vec<LevelDescriptor>, ConfigError> {
    let mut levels = BUILTIN_LEVELS
        .iter()
        .map(|json| LevelDescriptor::from_json(json))
        .collect::<Result<Vec<_>, _>>()?;
    levels.sort_by_key(|l| l.id);
    Ok(levels)
}

pub fn builtin_level(id: u32) -> Result<LevelDescriptor, ConfigError> {
    builtin_levels()?
        .into_iter()
        .find(|l| l.id == id)
        .ok_or(ConfigError::UnknownLevel(id))
}
