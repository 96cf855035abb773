//! Fixed timestep simulation tick
//!
//! Core game loop that advances the round by one frame.

use super::spawn;
use super::state::{GameEvent, GamePhase, GameState};
use crate::catalog::ItemCatalog;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Left arrow held
    pub left: bool,
    /// Right arrow held
    pub right: bool,
    /// Restart key pressed this tick (edge, not held)
    pub restart: bool,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, catalog: &ItemCatalog, input: &TickInput) {
    match state.round.phase {
        GamePhase::GameOver => {
            if input.restart {
                state.restart();
            }
            return;
        }
        GamePhase::Victory => {
            tick_victory(state, input);
            return;
        }
        GamePhase::Running => {}
    }

    state.time_ticks += 1;

    state.player.update(input.left, input.right);
    spawn::roll(state, catalog);
    advance_items(state);
    resolve_catches(state, catalog);
    evaluate_phase(state);
}

/// Move every item down; drop the ones that left the field.
/// Only penalty-kind items count as misses.
fn advance_items(state: &mut GameState) {
    let round = &mut state.round;
    let events = &mut state.events;

    state.items.retain_mut(|item| {
        if !item.update() {
            return true;
        }
        if item.is_penalty() {
            round.record_miss();
            events.push(GameEvent::Missed {
                kind_id: item.kind_id,
            });
        } else {
            events.push(GameEvent::Expired {
                kind_id: item.kind_id,
            });
        }
        false
    });
}

/// Remove every item touching the player and bank its points
fn resolve_catches(state: &mut GameState, catalog: &ItemCatalog) {
    let player_rect = state.player.rect();
    let round = &mut state.round;
    let events = &mut state.events;

    state.items.retain(|item| {
        if !item.rect().overlaps(&player_rect) {
            return true;
        }
        let points = catalog.get(item.kind).map_or(0, |k| k.point_value);
        round.record_catch(points);
        events.push(GameEvent::Caught {
            kind: item.kind,
            kind_id: item.kind_id,
            points,
        });
        log::debug!("Caught item {} for {} points", item.id, points);
        false
    });
}

fn evaluate_phase(state: &mut GameState) {
    match state.round.evaluate() {
        Some(GamePhase::GameOver) => {
            log::info!(
                "Game over: score {} after {} ticks",
                state.round.score,
                state.time_ticks
            );
            state.events.push(GameEvent::GameOver);
        }
        Some(GamePhase::Victory) => {
            log::info!(
                "Victory: score {} after {} ticks",
                state.round.score,
                state.time_ticks
            );
            state.victory.enter();
            state.events.push(GameEvent::Victory);
        }
        _ => {}
    }
}

/// Gameplay is frozen; only the victory presentation moves
fn tick_victory(state: &mut GameState, input: &TickInput) {
    if input.restart {
        if state.victory.is_finished() {
            state.restart();
            return;
        }
        if state.victory.start_animation() {
            state.events.push(GameEvent::VictoryAnimationStarted);
        }
    }

    if state.victory.advance() {
        state.events.push(GameEvent::VictoryFinished);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::Difficulty;
    use crate::sim::spawn::spawn_item;

    fn catalog() -> ItemCatalog {
        ItemCatalog::embedded().unwrap()
    }

    /// Drop an item right on top of the player
    fn spawn_on_player(state: &mut GameState, catalog: &ItemCatalog, kind: usize) {
        let x = state.player.pos.x + 10.0;
        spawn_item(state, catalog, kind, x).unwrap();
        let item = state.items.last_mut().unwrap();
        item.pos.y = state.player.pos.y + 10.0;
        item.speed = 0.0;
    }

    #[test]
    fn test_tick_advances_items() {
        let catalog = catalog();
        let mut state = GameState::new(12345, Difficulty::Normal);
        spawn_item(&mut state, &catalog, 1, 0.0).unwrap();
        let speed = state.items[0].speed;

        tick(&mut state, &catalog, &TickInput::default());
        assert_eq!(state.time_ticks, 1);
        assert_eq!(state.items[0].pos.y, SPAWN_Y + speed);
    }

    #[test]
    fn test_catch_scores() {
        let catalog = catalog();
        let mut state = GameState::new(1, Difficulty::Normal);
        spawn_on_player(&mut state, &catalog, 0);
        state.drain_events();

        tick(&mut state, &catalog, &TickInput::default());
        assert!(state.items.iter().all(|i| i.pos.y < state.player.pos.y));
        assert_eq!(state.round.score, 2);
        assert!(state.events.contains(&GameEvent::Caught {
            kind: 0,
            kind_id: 1,
            points: 2
        }));
    }

    #[test]
    fn test_game_over_freezes() {
        let catalog = catalog();
        let mut state = GameState::new(5, Difficulty::Normal);
        state.round.missed = MAX_MISSED - 1;
        spawn_item(&mut state, &catalog, 0, 0.0).unwrap();
        state.items[0].pos.y = FIELD_HEIGHT;

        tick(&mut state, &catalog, &TickInput::default());
        assert_eq!(state.round.phase, GamePhase::GameOver);
        assert!(state.events.contains(&GameEvent::GameOver));

        let ticks = state.time_ticks;
        let player_x = state.player.pos.x;
        let held = TickInput {
            left: true,
            ..Default::default()
        };
        for _ in 0..10 {
            tick(&mut state, &catalog, &held);
        }
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.player.pos.x, player_x);

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &catalog, &restart);
        assert_eq!(state.round.phase, GamePhase::Running);
        assert_eq!(state.round.missed, 0);
    }

    #[test]
    fn test_victory_sequence_then_restart() {
        let catalog = catalog();
        let mut state = GameState::new(9, Difficulty::Normal);
        state.round.score = VICTORY_SCORE - 2;
        spawn_on_player(&mut state, &catalog, 0);

        tick(&mut state, &catalog, &TickInput::default());
        assert_eq!(state.round.phase, GamePhase::Victory);
        state.drain_events();

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };

        // First press starts the celebration, not a new round
        tick(&mut state, &catalog, &restart);
        assert_eq!(state.round.phase, GamePhase::Victory);
        assert!(state.events.contains(&GameEvent::VictoryAnimationStarted));

        let mut finished = false;
        for _ in 0..(VICTORY_FRAMES as u32 * VICTORY_FRAME_TICKS) {
            tick(&mut state, &catalog, &TickInput::default());
            finished |= state.events.contains(&GameEvent::VictoryFinished);
        }
        assert!(finished);
        assert!(state.victory.is_finished());

        tick(&mut state, &catalog, &restart);
        assert_eq!(state.round.phase, GamePhase::Running);
        assert_eq!(state.round.score, 0);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let catalog = catalog();
        let mut state1 = GameState::new(99999, Difficulty::Hard);
        let mut state2 = GameState::new(99999, Difficulty::Hard);

        let inputs = [
            TickInput {
                left: true,
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                right: true,
                ..Default::default()
            },
        ];

        for i in 0..3000 {
            let input = &inputs[i % inputs.len()];
            tick(&mut state1, &catalog, input);
            tick(&mut state2, &catalog, input);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.round, state2.round);
        assert_eq!(state1.items.len(), state2.items.len());
        assert_eq!(state1.player.pos, state2.player.pos);
    }
}
