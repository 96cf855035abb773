//! Game state and core simulation types
//!
//! Everything the tick mutates lives here. The item catalog is not part of
//! the state; it is borrowed read-only by the tick.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, clamp_span};
use super::victory::VictorySequence;
use crate::consts::*;
use crate::settings::Difficulty;

/// Round phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Score target reached (terminal until restart)
    Victory,
    /// Too many misses (terminal until restart)
    GameOver,
}

/// Which way the player sprite faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Things that happened during a tick, drained by the front-end for sound/UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Spawned { item_id: u32, kind_id: u32 },
    /// Item caught by the player (`kind` is the catalog index)
    Caught { kind: usize, kind_id: u32, points: i32 },
    /// Penalty item fell off-screen
    Missed { kind_id: u32 },
    /// Non-penalty item fell off-screen
    Expired { kind_id: u32 },
    GameOver,
    Victory,
    VictoryAnimationStarted,
    VictoryFinished,
    Restarted,
}

/// The player's catcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub facing: Facing,
    /// Walk-cycle frame (0 when idle)
    pub frame: usize,
    /// Ticks since the last frame change
    pub frame_timer: u32,
    pub moving: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(
                (FIELD_WIDTH - PLAYER_WIDTH) / 2.0,
                FIELD_HEIGHT - PLAYER_HEIGHT,
            ),
            facing: Facing::Right,
            frame: 0,
            frame_timer: 0,
            moving: false,
        }
    }
}

impl Player {
    pub fn size() -> Vec2 {
        Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT)
    }

    pub fn rect(&self) -> Rect {
        Rect::at(self.pos, Self::size())
    }

    /// Apply one tick of directional input. Opposite directions cancel.
    pub fn update(&mut self, left: bool, right: bool) {
        let dir = right as i32 - left as i32;
        if dir == 0 {
            self.moving = false;
            self.frame = 0;
            self.frame_timer = 0;
            return;
        }

        self.facing = if dir < 0 { Facing::Left } else { Facing::Right };
        self.pos.x = clamp_span(
            self.pos.x + dir as f32 * PLAYER_SPEED,
            PLAYER_WIDTH,
            FIELD_WIDTH,
        );

        self.moving = true;
        self.frame_timer += 1;
        if self.frame_timer >= PLAYER_FRAME_TICKS {
            self.frame_timer = 0;
            self.frame = (self.frame + 1) % PLAYER_FRAMES;
        }
    }
}

/// A falling item instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingItem {
    pub id: u32,
    /// Catalog index of the item's kind
    pub kind: usize,
    /// Table id of the kind (cached for the miss rule)
    pub kind_id: u32,
    /// Top-left corner
    pub pos: Vec2,
    /// Pixels per tick (kind speed x difficulty)
    pub speed: f32,
}

impl FallingItem {
    pub fn size() -> Vec2 {
        Vec2::splat(ITEM_SIZE)
    }

    pub fn rect(&self) -> Rect {
        Rect::at(self.pos, Self::size())
    }

    /// Fall one tick. Returns true once the item has left the bottom of the field.
    pub fn update(&mut self) -> bool {
        self.pos.y += self.speed;
        self.is_off_screen()
    }

    pub fn is_off_screen(&self) -> bool {
        self.pos.y > FIELD_HEIGHT
    }

    /// Whether dropping this item costs a miss
    pub fn is_penalty(&self) -> bool {
        self.kind_id == PENALTY_KIND_ID
    }
}

/// Score, misses and phase for the current round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub score: i64,
    /// Never exceeds `MAX_MISSED`
    pub missed: u32,
    pub phase: GamePhase,
}

impl Default for RoundState {
    fn default() -> Self {
        Self {
            score: 0,
            missed: 0,
            phase: GamePhase::Running,
        }
    }
}

impl RoundState {
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn record_catch(&mut self, points: i32) {
        self.score += points as i64;
    }

    pub fn record_miss(&mut self) {
        self.missed = (self.missed + 1).min(MAX_MISSED);
    }

    /// Check the end-of-round conditions. Returns the new phase if the round
    /// just ended; a finished round never transitions again.
    pub fn evaluate(&mut self) -> Option<GamePhase> {
        if !self.is_running() {
            return None;
        }
        if self.missed >= MAX_MISSED {
            self.phase = GamePhase::GameOver;
        } else if self.score >= VICTORY_SCORE {
            self.phase = GamePhase::Victory;
        } else {
            return None;
        }
        Some(self.phase)
    }
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Spawn RNG
    pub rng: Pcg32,
    /// Speed scaling for newly spawned items
    pub difficulty: Difficulty,
    pub round: RoundState,
    pub player: Player,
    /// Active items (ordered by id)
    pub items: Vec<FallingItem>,
    /// Presentation state for the victory screen
    pub victory: VictorySequence,
    /// Ticks simulated in this round
    pub time_ticks: u64,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, difficulty: Difficulty) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            difficulty,
            round: RoundState::default(),
            player: Player::default(),
            items: Vec::new(),
            victory: VictorySequence::default(),
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Start a fresh round. The RNG keeps running so rounds differ.
    pub fn restart(&mut self) {
        self.round = RoundState::default();
        self.player = Player::default();
        self.items.clear();
        self.victory = VictorySequence::default();
        self.time_ticks = 0;
        self.events.push(GameEvent::Restarted);
        log::info!("Round restarted ({})", self.difficulty.as_str());
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
