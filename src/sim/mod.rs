//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod victory;

pub use autopilot::autopilot;
pub use collision::Rect;
pub use state::{FallingItem, Facing, GameEvent, GamePhase, GameState, Player, RoundState};
pub use tick::{TickInput, tick};
pub use victory::{VictorySequence, VictoryStage};
