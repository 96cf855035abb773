//! SQLite item table
//!
//! Expected schema (the `sound_path` column is optional):
//!
//! ```sql
//! CREATE TABLE items (
//!     id INTEGER PRIMARY KEY,
//!     asset_path TEXT NOT NULL,
//!     points INTEGER NOT NULL,
//!     speed_tier TEXT,
//!     spawn_weight REAL NOT NULL,
//!     sound_path TEXT
//! );
//! ```

use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use super::{CatalogError, CatalogRow, ItemCatalog};

impl From<rusqlite::Error> for CatalogError {
    fn from(e: rusqlite::Error) -> Self {
        CatalogError::Sqlite(e)
    }
}

/// Open the database read-only and load the catalog
pub fn load_file(path: &Path) -> Result<ItemCatalog, CatalogError> {
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
    log::info!("Reading item table from {}", path.display());
    load(&conn)
}

/// Load the catalog from an open connection
pub fn load(conn: &Connection) -> Result<ItemCatalog, CatalogError> {
    let rows = read_rows(conn)?;
    ItemCatalog::from_rows(rows)
}

/// Read every row of `items`, ordered by id
pub fn read_rows(conn: &Connection) -> Result<Vec<CatalogRow>, CatalogError> {
    let sound_column = if has_column(conn, "items", "sound_path")? {
        "sound_path"
    } else {
        log::debug!("items table has no sound_path column");
        "NULL"
    };

    let sql = format!(
        "SELECT id, asset_path, points, speed_tier, spawn_weight, {} FROM items ORDER BY id",
        sound_column
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(CatalogRow {
                id: row.get(0)?,
                asset_path: row.get(1)?,
                points: row.get(2)?,
                speed_tier: row.get(3)?,
                spawn_weight: row.get::<_, f64>(4)? as f32,
                sound_path: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool, CatalogError> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names.iter().any(|n| n == column))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_db(with_sound: bool) -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        let sound = if with_sound { ", sound_path TEXT" } else { "" };
        conn.execute_batch(&format!(
            "CREATE TABLE items (
                id INTEGER PRIMARY KEY,
                asset_path TEXT NOT NULL,
                points INTEGER NOT NULL,
                speed_tier TEXT,
                spawn_weight REAL NOT NULL{}
            );",
            sound
        ))
        .unwrap();
        conn
    }

    #[test]
    fn test_load_with_sound_column() {
        let conn = memory_db(true);
        conn.execute_batch(
            "INSERT INTO items VALUES (2, 'pear.png', 6, 'slow', 0.3, NULL);
             INSERT INTO items VALUES (1, 'apple.png', 2, 'medium', 0.7, 'crunch.ogg');",
        )
        .unwrap();

        let catalog = load(&conn).unwrap();
        assert_eq!(catalog.len(), 2);
        // Ordered by id
        assert_eq!(catalog.kinds()[0].id, 1);
        assert_eq!(catalog.kinds()[0].sound_path.as_deref(), Some("crunch.ogg"));
        assert_eq!(catalog.kinds()[1].sound_path, None);
    }

    #[test]
    fn test_load_without_sound_column() {
        let conn = memory_db(false);
        conn.execute_batch("INSERT INTO items VALUES (1, 'apple.png', 2, NULL, 1.0);")
            .unwrap();

        let catalog = load(&conn).unwrap();
        let kind = &catalog.kinds()[0];
        assert_eq!(kind.sound_path, None);
        // NULL tier falls back to medium
        assert_eq!(kind.fall_speed, 4.0);
    }

    #[test]
    fn test_missing_table_is_fatal() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(load(&conn).is_err());
    }

    #[test]
    fn test_empty_table_is_fatal() {
        let conn = memory_db(true);
        assert!(matches!(load(&conn), Err(CatalogError::Empty)));
    }
}
