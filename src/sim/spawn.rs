//! Item spawning

use glam::Vec2;
use rand::Rng;

use super::state::{FallingItem, GameEvent, GameState};
use crate::catalog::ItemCatalog;
use crate::consts::*;

/// Per-tick spawn roll. With probability `SPAWN_CHANCE`, draws a kind by
/// spawn weight and drops it at a random column. Returns the new item's id.
pub fn roll(state: &mut GameState, catalog: &ItemCatalog) -> Option<u32> {
    if state.rng.random::<f32>() >= SPAWN_CHANCE {
        return None;
    }

    let kind = catalog.sample(&mut state.rng);
    let x = state.rng.random_range(0.0..=FIELD_WIDTH - ITEM_SIZE);
    spawn_item(state, catalog, kind, x)
}

/// Put an item of catalog kind `kind` at column `x`, just above the field.
/// Returns None if `kind` is not in the catalog.
pub fn spawn_item(
    state: &mut GameState,
    catalog: &ItemCatalog,
    kind: usize,
    x: f32,
) -> Option<u32> {
    let item_kind = catalog.get(kind)?;
    let id = state.next_entity_id();
    let speed = item_kind.fall_speed * state.difficulty.speed_multiplier();

    state.items.push(FallingItem {
        id,
        kind,
        kind_id: item_kind.id,
        pos: Vec2::new(x, SPAWN_Y),
        speed,
    });
    state.events.push(GameEvent::Spawned {
        item_id: id,
        kind_id: item_kind.id,
    });
    log::debug!("Spawned item {} (kind {}) at x={:.0}", id, item_kind.id, x);

    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Difficulty;

    #[test]
    fn test_spawn_applies_difficulty() {
        let catalog = ItemCatalog::embedded().unwrap();
        let base = catalog.get(0).unwrap().fall_speed;

        let mut normal = GameState::new(1, Difficulty::Normal);
        spawn_item(&mut normal, &catalog, 0, 100.0).unwrap();
        assert_eq!(normal.items[0].speed, base);

        let mut hard = GameState::new(1, Difficulty::Hard);
        spawn_item(&mut hard, &catalog, 0, 100.0).unwrap();
        assert_eq!(hard.items[0].speed, base * 1.5);
        assert_eq!(hard.items[0].pos, Vec2::new(100.0, SPAWN_Y));
    }

    #[test]
    fn test_spawn_unknown_kind() {
        let catalog = ItemCatalog::embedded().unwrap();
        let mut state = GameState::new(1, Difficulty::Normal);
        assert_eq!(spawn_item(&mut state, &catalog, 99, 0.0), None);
        assert!(state.items.is_empty());
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_roll_rate_and_bounds() {
        let catalog = ItemCatalog::embedded().unwrap();
        let mut state = GameState::new(77, Difficulty::Normal);

        let rolls = 10_000;
        let spawned = (0..rolls)
            .filter(|_| roll(&mut state, &catalog).is_some())
            .count();

        // 2% nominal
        let rate = spawned as f32 / rolls as f32;
        assert!((0.01..0.03).contains(&rate), "spawn rate {}", rate);

        for item in &state.items {
            assert!(item.pos.x >= 0.0 && item.pos.x <= FIELD_WIDTH - ITEM_SIZE);
            assert!(item.pos.y < 0.0);
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let catalog = ItemCatalog::embedded().unwrap();
        let mut state = GameState::new(3, Difficulty::Normal);
        let a = spawn_item(&mut state, &catalog, 0, 0.0).unwrap();
        let b = spawn_item(&mut state, &catalog, 1, 0.0).unwrap();
        assert_ne!(a, b);
    }
}
