//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (descriptor order)
//! - Simulation time passed in explicitly, never read from a clock
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod contact;
pub mod physics;
pub mod pickup;
pub mod platform;
pub mod state;
pub mod tick;

pub use clock::{FixedClock, FrameStats};
pub use collision::{Circle, Rect, RectContact, Side};
pub use physics::{Body, Integrator};
pub use pickup::{Coin, CoinPhase};
pub use platform::{Platform, PlatformKind};
pub use state::{Avatar, AvatarState, DamageOutcome, GameEvent, GamePhase, LevelProgress, SimState, Snapshot};
pub use tick::{TickInput, tick};
