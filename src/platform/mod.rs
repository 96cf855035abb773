//! Platform abstraction layer
//!
//! Browser/native neutral pieces the front-ends feed:
//! - Input events, queued and drained once per tick
//! - Fixed timestep clock and FPS counter

pub mod clock;
pub mod input;

pub use clock::{FixedTimestep, FpsCounter};
pub use input::{InputEvent, InputQueue, Key, PolledInput};
