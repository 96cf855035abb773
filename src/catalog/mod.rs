//! Item catalog: the static table of falling item kinds
//!
//! Loaded once at startup and shared read-only. Rows are normalized on load
//! (speed tiers to numbers, missing sounds to `None`); only an unreadable or
//! unusable table is an error.

#[cfg(not(target_arch = "wasm32"))]
pub mod sqlite;

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use serde::{Deserialize, Serialize};

/// Table shipped with the game
pub const EMBEDDED_TABLE: &str = include_str!("../../assets/items.json");

/// Textual speed tier used by the lookup table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeedTier {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl SpeedTier {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "slow" => Some(SpeedTier::Slow),
            "medium" | "med" => Some(SpeedTier::Medium),
            "fast" => Some(SpeedTier::Fast),
            _ => None,
        }
    }

    /// Base fall speed in pixels per tick
    pub fn fall_speed(&self) -> f32 {
        match self {
            SpeedTier::Slow => 3.0,
            SpeedTier::Medium => 4.0,
            SpeedTier::Fast => 6.0,
        }
    }
}

/// One raw row of the lookup table, before normalization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogRow {
    pub id: u32,
    pub asset_path: String,
    pub points: i32,
    #[serde(default)]
    pub speed_tier: Option<String>,
    pub spawn_weight: f32,
    #[serde(default)]
    pub sound_path: Option<String>,
}

/// An item archetype
#[derive(Debug, Clone, PartialEq)]
pub struct ItemKind {
    pub id: u32,
    pub asset_path: String,
    /// Points awarded on catch (negative for bad items)
    pub point_value: i32,
    /// Base fall speed (pixels per tick, before difficulty scaling)
    pub fall_speed: f32,
    /// Relative spawn probability mass
    pub spawn_weight: f32,
    pub sound_path: Option<String>,
}

impl ItemKind {
    /// Normalize a raw row. Never fails; bad fields fall back to defaults.
    pub fn from_row(row: CatalogRow) -> Self {
        let tier = row
            .speed_tier
            .as_deref()
            .and_then(SpeedTier::from_str)
            .unwrap_or_else(|| {
                log::warn!(
                    "Item {}: unknown speed tier {:?}, using medium",
                    row.id,
                    row.speed_tier
                );
                SpeedTier::default()
            });

        let spawn_weight = if row.spawn_weight.is_finite() && row.spawn_weight > 0.0 {
            row.spawn_weight
        } else {
            log::warn!(
                "Item {}: spawn weight {} is unusable, item will never spawn",
                row.id,
                row.spawn_weight
            );
            0.0
        };

        let sound_path = row.sound_path.filter(|s| !s.trim().is_empty());

        Self {
            id: row.id,
            asset_path: row.asset_path,
            point_value: row.points,
            fall_speed: tier.fall_speed(),
            spawn_weight,
            sound_path,
        }
    }

    /// Bad items cost points when caught
    pub fn is_bad(&self) -> bool {
        self.point_value < 0
    }
}

/// Catalog load errors. All of them abort startup.
#[derive(Debug)]
pub enum CatalogError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    #[cfg(not(target_arch = "wasm32"))]
    Sqlite(rusqlite::Error),
    /// The table has no rows
    Empty,
    /// Weights cannot be sampled (e.g. all zero)
    Weights(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Io(e) => write!(f, "Could not read item table: {}", e),
            CatalogError::Parse(e) => write!(f, "Malformed item table: {}", e),
            #[cfg(not(target_arch = "wasm32"))]
            CatalogError::Sqlite(e) => write!(f, "Item database error: {}", e),
            CatalogError::Empty => write!(f, "Item table has no rows"),
            CatalogError::Weights(e) => write!(f, "Invalid spawn weights: {}", e),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Io(e) => Some(e),
            CatalogError::Parse(e) => Some(e),
            #[cfg(not(target_arch = "wasm32"))]
            CatalogError::Sqlite(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(e: std::io::Error) -> Self {
        CatalogError::Io(e)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Parse(e)
    }
}

/// Immutable set of item kinds plus the weighted sampler over them
#[derive(Debug, Clone)]
pub struct ItemCatalog {
    kinds: Vec<ItemKind>,
    sampler: WeightedIndex<f32>,
}

impl ItemCatalog {
    /// Build the catalog from raw rows (table order is kept)
    pub fn from_rows(rows: Vec<CatalogRow>) -> Result<Self, CatalogError> {
        if rows.is_empty() {
            return Err(CatalogError::Empty);
        }

        let kinds: Vec<ItemKind> = rows.into_iter().map(ItemKind::from_row).collect();
        let sampler = WeightedIndex::new(kinds.iter().map(|k| k.spawn_weight))
            .map_err(|e| CatalogError::Weights(e.to_string()))?;

        log::info!("Item catalog loaded: {} kinds", kinds.len());
        Ok(Self { kinds, sampler })
    }

    /// Parse a JSON array of rows
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let rows: Vec<CatalogRow> = serde_json::from_str(json)?;
        Self::from_rows(rows)
    }

    /// The table compiled into the binary
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json_str(EMBEDDED_TABLE)
    }

    /// Load a JSON table from disk
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_json_file(path: &std::path::Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn kinds(&self) -> &[ItemKind] {
        &self.kinds
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Always false for a successfully loaded catalog
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ItemKind> {
        self.kinds.get(index)
    }

    /// Spawn weights, parallel to `kinds()`
    pub fn weights(&self) -> Vec<f32> {
        self.kinds.iter().map(|k| k.spawn_weight).collect()
    }

    /// Draw a kind index proportionally to spawn weight
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        self.sampler.sample(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn row(id: u32, tier: &str, weight: f32) -> CatalogRow {
        CatalogRow {
            id,
            asset_path: format!("assets/item{}.png", id),
            points: id as i32,
            speed_tier: Some(tier.to_string()),
            spawn_weight: weight,
            sound_path: None,
        }
    }

    #[test]
    fn test_speed_tiers() {
        assert_eq!(SpeedTier::from_str("Slow"), Some(SpeedTier::Slow));
        assert_eq!(SpeedTier::from_str(" fast "), Some(SpeedTier::Fast));
        assert_eq!(SpeedTier::from_str("warp"), None);
        assert!(SpeedTier::Slow.fall_speed() < SpeedTier::Medium.fall_speed());
        assert!(SpeedTier::Medium.fall_speed() < SpeedTier::Fast.fall_speed());
    }

    #[test]
    fn test_unknown_tier_defaults_to_medium() {
        let kind = ItemKind::from_row(row(1, "ludicrous", 1.0));
        assert_eq!(kind.fall_speed, SpeedTier::Medium.fall_speed());
    }

    #[test]
    fn test_null_or_missing_tier_defaults_to_medium() {
        let catalog = ItemCatalog::from_json_str(
            r#"[
                { "id": 1, "asset_path": "a.png", "points": 2, "speed_tier": null, "spawn_weight": 1.0 },
                { "id": 2, "asset_path": "b.png", "points": 3, "spawn_weight": 1.0 }
            ]"#,
        )
        .unwrap();
        let medium = SpeedTier::Medium.fall_speed();
        assert!(catalog.kinds().iter().all(|k| k.fall_speed == medium));
    }

    #[test]
    fn test_blank_sound_becomes_none() {
        let mut r = row(1, "slow", 1.0);
        r.sound_path = Some("   ".to_string());
        assert_eq!(ItemKind::from_row(r).sound_path, None);
    }

    #[test]
    fn test_negative_weight_never_spawns() {
        let catalog =
            ItemCatalog::from_rows(vec![row(1, "slow", -3.0), row(2, "slow", 1.0)]).unwrap();
        assert_eq!(catalog.weights(), vec![0.0, 1.0]);

        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..1000 {
            assert_eq!(catalog.sample(&mut rng), 1);
        }
    }

    #[test]
    fn test_empty_table_is_fatal() {
        assert!(matches!(
            ItemCatalog::from_rows(Vec::new()),
            Err(CatalogError::Empty)
        ));
    }

    #[test]
    fn test_all_zero_weights_is_fatal() {
        let result = ItemCatalog::from_rows(vec![row(1, "slow", 0.0), row(2, "fast", 0.0)]);
        assert!(matches!(result, Err(CatalogError::Weights(_))));
    }

    #[test]
    fn test_malformed_json_is_fatal() {
        assert!(matches!(
            ItemCatalog::from_json_str("[{\"id\": 1}]"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_embedded_table() {
        let catalog = ItemCatalog::embedded().unwrap();
        assert!(!catalog.is_empty());
        assert_eq!(catalog.get(0).map(|k| k.id), Some(crate::consts::PENALTY_KIND_ID));
        assert!(catalog.kinds().iter().any(|k| k.is_bad()));
    }

    #[test]
    fn test_weighted_sampling_converges() {
        let catalog = ItemCatalog::from_rows(vec![
            row(1, "slow", 0.5),
            row(2, "medium", 0.3),
            row(3, "fast", 0.2),
        ])
        .unwrap();

        let mut rng = Pcg32::seed_from_u64(2024);
        let draws = 20_000;
        let mut counts = [0usize; 3];
        for _ in 0..draws {
            counts[catalog.sample(&mut rng)] += 1;
        }

        for (count, expected) in counts.iter().zip([0.5, 0.3, 0.2]) {
            let observed = *count as f32 / draws as f32;
            assert!(
                (observed - expected).abs() < 0.02,
                "observed {} expected {}",
                observed,
                expected
            );
        }
    }
}
