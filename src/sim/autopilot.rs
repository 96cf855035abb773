//! A simple bot that plays the game
//!
//! Chases the lowest good item and sidesteps bad items that are about to land
//! on it. Drives the headless runner.

use super::state::{GamePhase, GameState};
use super::tick::TickInput;
use crate::catalog::ItemCatalog;
use crate::consts::*;

/// Bad items closer than this (vertically) to the player are dodged
const DANGER_DISTANCE: f32 = 120.0;

/// Decide this tick's input for the bot
pub fn autopilot(state: &GameState, catalog: &ItemCatalog) -> TickInput {
    match state.round.phase {
        // In victory, repeated presses start the celebration, then a new round
        GamePhase::GameOver | GamePhase::Victory => {
            return TickInput {
                restart: true,
                ..Default::default()
            };
        }
        GamePhase::Running => {}
    }

    let player = state.player.rect();
    let player_center = player.center().x;

    let is_bad = |kind: usize| catalog.get(kind).is_some_and(|k| k.is_bad());

    // Dodge first: a bad item falling onto us
    let threat = state
        .items
        .iter()
        .filter(|i| is_bad(i.kind))
        .filter(|i| player.y - i.rect().bottom() < DANGER_DISTANCE)
        .find(|i| {
            i.rect().right() > player.x - PLAYER_SPEED && i.pos.x < player.right() + PLAYER_SPEED
        });

    let target_x = if let Some(bad) = threat {
        let bad_center = bad.rect().center().x;
        let room_left = bad.pos.x - PLAYER_WIDTH;
        let room_right = FIELD_WIDTH - bad.rect().right() - PLAYER_WIDTH;
        if (bad_center >= player_center && room_left >= 0.0) || room_right < 0.0 {
            bad.pos.x - PLAYER_WIDTH / 2.0 - PLAYER_SPEED
        } else {
            bad.rect().right() + PLAYER_WIDTH / 2.0 + PLAYER_SPEED
        }
    } else {
        // Lowest good item still above the catcher
        let target = state
            .items
            .iter()
            .filter(|i| !is_bad(i.kind) && i.pos.y < player.bottom())
            .max_by(|a, b| {
                a.pos
                    .y
                    .partial_cmp(&b.pos.y)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        match target {
            Some(item) => item.rect().center().x,
            None => return TickInput::default(),
        }
    };

    let delta = target_x - player_center;
    TickInput {
        left: delta < -PLAYER_SPEED / 2.0,
        right: delta > PLAYER_SPEED / 2.0,
        restart: false,
    }
}
