//! Apple Catch - catch the falling apples, dodge the rotten ones
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, falling items, collisions, round state)
//! - `catalog`: Item kinds loaded from the lookup table
//! - `assets`: Fallible asset loading with placeholder fallback, sprite sheets
//! - `ui`: Menu / info overlays
//! - `renderer`: Draw command generation and the Canvas 2D backend
//! - `platform`: Input queue and fixed timestep clock
//! - `app`: The context object tying everything together

pub mod app;
pub mod assets;
#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod catalog;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use app::{App, AppEvent};
pub use catalog::{CatalogError, ItemCatalog, ItemKind};
pub use settings::{Difficulty, Settings};

/// Game configuration constants
pub mod consts {
    /// Simulation rate (one tick per rendered frame)
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Playfield dimensions
    pub const FIELD_WIDTH: f32 = 900.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Player sprite size and horizontal speed (pixels per tick)
    pub const PLAYER_WIDTH: f32 = 100.0;
    pub const PLAYER_HEIGHT: f32 = 150.0;
    pub const PLAYER_SPEED: f32 = 15.0;
    /// Number of walk-cycle frames per facing
    pub const PLAYER_FRAMES: usize = 4;
    /// Ticks between walk-cycle frames
    pub const PLAYER_FRAME_TICKS: u32 = 6;

    /// Falling item sprite size
    pub const ITEM_SIZE: f32 = 50.0;
    /// Spawn height (just above the visible area)
    pub const SPAWN_Y: f32 = -20.0;
    /// Chance per tick of spawning one item
    pub const SPAWN_CHANCE: f32 = 0.02;

    /// Only this kind counts as a miss when it falls off-screen
    pub const PENALTY_KIND_ID: u32 = 1;
    /// Misses allowed before the round is lost
    pub const MAX_MISSED: u32 = 5;
    /// Score that wins the round
    pub const VICTORY_SCORE: i64 = 100;

    /// Victory animation length and pacing
    pub const VICTORY_FRAMES: usize = 8;
    pub const VICTORY_FRAME_TICKS: u32 = 10;
}
