use apple_catch::catalog::ItemCatalog;
use apple_catch::consts::*;
use apple_catch::settings::Difficulty;
use apple_catch::sim::spawn::spawn_item;
use apple_catch::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

/// Four kinds worth 2, 6, 10 and -10; kind id 1 is the penalty kind
fn four_kinds() -> ItemCatalog {
    ItemCatalog::from_json_str(
        r#"[
            { "id": 1, "asset_path": "a.png", "points": 2, "speed_tier": "medium", "spawn_weight": 0.4 },
            { "id": 2, "asset_path": "b.png", "points": 6, "speed_tier": "slow", "spawn_weight": 0.3 },
            { "id": 3, "asset_path": "c.png", "points": 10, "speed_tier": "fast", "spawn_weight": 0.2 },
            { "id": 4, "asset_path": "d.png", "points": -10, "speed_tier": "fast", "spawn_weight": 0.1 }
        ]"#,
    )
    .unwrap()
}

/// Park an item of `kind` inside the player rect so the next tick catches it
fn drop_on_player(state: &mut GameState, catalog: &ItemCatalog, kind: usize) {
    let x = state.player.pos.x + 20.0;
    spawn_item(state, catalog, kind, x).unwrap();
    let item = state.items.last_mut().unwrap();
    item.pos.y = state.player.pos.y + 20.0;
    item.speed = 0.0;
}

/// Put an item of `kind` just above the bottom edge, away from the player
fn drop_at_floor(state: &mut GameState, catalog: &ItemCatalog, kind: usize) {
    spawn_item(state, catalog, kind, 0.0).unwrap();
    let item = state.items.last_mut().unwrap();
    item.pos.y = FIELD_HEIGHT;
}

fn count(events: &[GameEvent], wanted: GameEvent) -> usize {
    events.iter().filter(|e| **e == wanted).count()
}

#[test]
fn simultaneous_catches_sum_points() {
    let catalog = four_kinds();
    let mut state = GameState::new(11, Difficulty::Normal);
    for kind in 0..4 {
        drop_on_player(&mut state, &catalog, kind);
    }

    tick(&mut state, &catalog, &TickInput::default());

    assert_eq!(state.round.score, 8);
    let caught = state
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, GameEvent::Caught { .. }))
        .count();
    assert_eq!(caught, 4);
    assert!(state.items.iter().all(|i| i.pos.y < FIELD_HEIGHT / 2.0));
}

#[test]
fn only_penalty_kind_counts_as_missed() {
    let catalog = four_kinds();
    let mut state = GameState::new(12, Difficulty::Normal);
    for kind in 1..4 {
        drop_at_floor(&mut state, &catalog, kind);
    }

    tick(&mut state, &catalog, &TickInput::default());

    assert_eq!(state.round.missed, 0);
    let events = state.drain_events();
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::Expired { .. }))
            .count(),
        3
    );
}

#[test]
fn five_penalty_expirations_end_the_round() {
    let catalog = four_kinds();
    let mut state = GameState::new(13, Difficulty::Normal);

    for n in 1..=MAX_MISSED {
        drop_at_floor(&mut state, &catalog, 0);
        tick(&mut state, &catalog, &TickInput::default());
        assert_eq!(state.round.missed, n);
    }

    assert_eq!(state.round.phase, GamePhase::GameOver);
    let events = state.drain_events();
    assert_eq!(count(&events, GameEvent::GameOver), 1);
    assert_eq!(count(&events, GameEvent::Missed { kind_id: 1 }), 5);
}

#[test]
fn missed_never_exceeds_limit() {
    let catalog = four_kinds();
    let mut state = GameState::new(14, Difficulty::Normal);
    for _ in 0..8 {
        drop_at_floor(&mut state, &catalog, 0);
    }

    tick(&mut state, &catalog, &TickInput::default());

    assert_eq!(state.round.missed, MAX_MISSED);
    assert_eq!(state.round.phase, GamePhase::GameOver);
}

#[test]
fn victory_fires_once() {
    let catalog = four_kinds();
    let mut state = GameState::new(15, Difficulty::Normal);
    state.round.score = VICTORY_SCORE - 2;
    drop_on_player(&mut state, &catalog, 0);

    let mut events = Vec::new();
    tick(&mut state, &catalog, &TickInput::default());
    events.extend(state.drain_events());
    assert_eq!(state.round.phase, GamePhase::Victory);

    // Frozen afterwards: more items and ticks change nothing
    drop_on_player(&mut state, &catalog, 2);
    for _ in 0..120 {
        tick(&mut state, &catalog, &TickInput::default());
        events.extend(state.drain_events());
    }

    assert_eq!(count(&events, GameEvent::Victory), 1);
    assert_eq!(state.round.score, VICTORY_SCORE);
}

#[test]
fn game_over_wins_over_victory_on_the_same_tick() {
    let catalog = four_kinds();
    let mut state = GameState::new(16, Difficulty::Normal);
    state.round.score = VICTORY_SCORE - 2;
    state.round.missed = MAX_MISSED - 1;
    drop_on_player(&mut state, &catalog, 0);
    drop_at_floor(&mut state, &catalog, 0);

    tick(&mut state, &catalog, &TickInput::default());

    assert_eq!(state.round.phase, GamePhase::GameOver);
    let events = state.drain_events();
    assert_eq!(count(&events, GameEvent::Victory), 0);
}

#[test]
fn restart_resets_the_round() {
    let catalog = four_kinds();
    let mut state = GameState::new(17, Difficulty::Normal);
    state.round.missed = MAX_MISSED - 1;
    state.round.score = 30;
    drop_at_floor(&mut state, &catalog, 0);
    spawn_item(&mut state, &catalog, 1, 300.0).unwrap();
    tick(&mut state, &catalog, &TickInput::default());
    assert_eq!(state.round.phase, GamePhase::GameOver);

    let restart = TickInput {
        restart: true,
        ..Default::default()
    };
    tick(&mut state, &catalog, &restart);

    assert_eq!(state.round.phase, GamePhase::Running);
    assert_eq!(state.round.score, 0);
    assert_eq!(state.round.missed, 0);
    assert!(state.items.is_empty());
    assert!(state.drain_events().contains(&GameEvent::Restarted));
}

#[test]
fn victory_sequence_leads_back_to_play() {
    let catalog = four_kinds();
    let mut state = GameState::new(18, Difficulty::Normal);
    state.round.score = VICTORY_SCORE;
    drop_on_player(&mut state, &catalog, 0);
    tick(&mut state, &catalog, &TickInput::default());
    assert_eq!(state.round.phase, GamePhase::Victory);

    let restart = TickInput {
        restart: true,
        ..Default::default()
    };
    tick(&mut state, &catalog, &restart);
    let mut events = state.drain_events();
    assert!(events.contains(&GameEvent::VictoryAnimationStarted));

    let frames = VICTORY_FRAMES as u32 * VICTORY_FRAME_TICKS;
    for _ in 0..frames {
        tick(&mut state, &catalog, &TickInput::default());
        events.extend(state.drain_events());
    }
    assert_eq!(count(&events, GameEvent::VictoryFinished), 1);
    assert_eq!(state.round.phase, GamePhase::Victory);

    tick(&mut state, &catalog, &restart);
    assert_eq!(state.round.phase, GamePhase::Running);
    assert_eq!(state.round.score, 0);
}
