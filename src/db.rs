// Persistence Adapter - local key-value storage for the favorites snapshot
//
// A single `kv_store` table keyed by string. The favorites snapshot lives
// under one fixed key as a JSON array of Entity records. A missing key
// means "no favorites yet", never an error.

use crate::entity::Entity;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::{debug, warn};

/// Storage key for the favorites snapshot
pub const FAVORITES_KEY: &str = "favorites";

pub fn setup_database(conn: &Connection) -> Result<()> {
    // WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    Ok(())
}

/// Synchronous key-value store backed by SQLite
pub struct FavoritesStore {
    conn: Connection,
}

impl FavoritesStore {
    /// Open (or create) the database at `path`
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create data directory {:?}", parent))?;
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database {:?}", path))?;
        Self::from_connection(conn)
    }

    /// In-memory store (nothing survives the process)
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        setup_database(&conn)?;
        Ok(Self { conn })
    }

    // ========================================================================
    // GENERIC KEY-VALUE API
    // ========================================================================

    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("Failed to read key '{}'", key))?;

        Ok(value)
    }

    pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, Utc::now().to_rfc3339()],
            )
            .with_context(|| format!("Failed to write key '{}'", key))?;

        Ok(())
    }

    pub fn remove_item(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])
            .with_context(|| format!("Failed to remove key '{}'", key))?;

        Ok(())
    }

    // ========================================================================
    // FAVORITES SNAPSHOT
    // ========================================================================

    /// Read the persisted favorites
    ///
    /// A snapshot that is not a JSON array of records with an integer `id`
    /// is discarded with a warning and treated as empty.
    pub fn load_favorites(&self) -> Result<Vec<Entity>> {
        let raw = match self.get_item(FAVORITES_KEY)? {
            Some(raw) => raw,
            None => return Ok(Vec::new()),
        };

        match serde_json::from_str::<Vec<Entity>>(&raw) {
            Ok(favorites) => {
                debug!(count = favorites.len(), "loaded favorites snapshot");
                Ok(favorites)
            }
            Err(e) => {
                warn!(error = %e, "ignoring malformed favorites snapshot");
                Ok(Vec::new())
            }
        }
    }

    /// Overwrite the snapshot with `favorites`
    pub fn save_favorites(&self, favorites: &[Entity]) -> Result<()> {
        let json = serde_json::to_string(favorites).context("Failed to serialize favorites")?;
        self.set_item(FAVORITES_KEY, &json)?;
        debug!(count = favorites.len(), "saved favorites snapshot");
        Ok(())
    }

    pub fn clear_favorites(&self) -> Result<()> {
        self.remove_item(FAVORITES_KEY)
    }

    /// When the snapshot was last written, if ever
    pub fn favorites_updated_at(&self) -> Result<Option<DateTime<Utc>>> {
        let updated_at: Option<String> = self
            .conn
            .query_row(
                "SELECT updated_at FROM kv_store WHERE key = ?1",
                params![FAVORITES_KEY],
                |row| row.get(0),
            )
            .optional()?;

        match updated_at {
            Some(raw) => {
                let parsed = DateTime::parse_from_rfc3339(&raw)
                    .with_context(|| format!("Bad updated_at timestamp '{}'", raw))?;
                Ok(Some(parsed.with_timezone(&Utc)))
            }
            None => Ok(None),
        }
    }
}
