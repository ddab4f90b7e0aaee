//! SQLite slot backend for native hosts.
//!
//! # Responsibility
//! - Open file or in-memory databases and bring the schema up to date.
//! - Store each slot as one row with a monotonic revision.
//!
//! # Invariants
//! - Returned stores are at `SCHEMA_VERSION`, tracked in `PRAGMA user_version`.
//! - Each schema step commits on its own, so an interrupted upgrade resumes
//!   at the first missing step.
//! - Removing a slot keeps its row (`value = NULL`) so the revision survives.

use super::{ensure_valid_key, SlotError, SlotResult, SlotStore};
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::{Duration, Instant};

/// Schema steps; step `n` upgrades the database to version `n + 1`.
const SCHEMA_STEPS: &[&str] = &["CREATE TABLE IF NOT EXISTS slots (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NULL,
    revision INTEGER NOT NULL DEFAULT 0,
    updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now') * 1000)
);"];

/// Slot store persisted in a SQLite database.
pub struct SqliteSlotStore {
    conn: Connection,
}

impl SqliteSlotStore {
    /// Schema version written by this build.
    pub const SCHEMA_VERSION: u32 = SCHEMA_STEPS.len() as u32;

    /// Opens (or creates) a database file and applies pending migrations.
    ///
    /// Emits `slot_store_open` events with duration and status.
    pub fn open(path: impl AsRef<Path>) -> SlotResult<Self> {
        open_with("file", || Connection::open(path))
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> SlotResult<Self> {
        open_with("memory", Connection::open_in_memory)
    }

    /// Schema version recorded in the open database.
    pub fn schema_version(&self) -> SlotResult<u32> {
        user_version(&self.conn)
    }
}

fn open_with(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> SlotResult<SqliteSlotStore> {
    let started_at = Instant::now();
    info!("event=slot_store_open module=slot status=start mode={mode}");

    let mut conn = connect().map_err(|err| {
        error!(
            "event=slot_store_open module=slot status=error mode={mode} duration_ms={} error_code=open_failed error={err}",
            started_at.elapsed().as_millis()
        );
        err
    })?;

    if let Err(err) = bootstrap_connection(&mut conn) {
        error!(
            "event=slot_store_open module=slot status=error mode={mode} duration_ms={} error_code=bootstrap_failed error={err}",
            started_at.elapsed().as_millis()
        );
        return Err(err);
    }

    info!(
        "event=slot_store_open module=slot status=ok mode={mode} duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(SqliteSlotStore { conn })
}

fn bootstrap_connection(conn: &mut Connection) -> SlotResult<()> {
    conn.busy_timeout(Duration::from_secs(5))?;
    upgrade_schema(conn)
}

fn upgrade_schema(conn: &mut Connection) -> SlotResult<()> {
    let found = user_version(conn)?;
    if found > SqliteSlotStore::SCHEMA_VERSION {
        return Err(SlotError::UnsupportedSchemaVersion {
            db_version: found,
            latest_supported: SqliteSlotStore::SCHEMA_VERSION,
        });
    }

    for (target, step) in (1u32..).zip(SCHEMA_STEPS.iter()).skip(found as usize) {
        let started_at = Instant::now();
        let tx = conn.transaction()?;
        tx.execute_batch(step)?;
        tx.pragma_update(None, "user_version", target)?;
        tx.commit()?;
        info!(
            "event=slot_store_migrate module=slot status=ok to_version={target} duration_ms={}",
            started_at.elapsed().as_millis()
        );
    }
    Ok(())
}

fn user_version(conn: &Connection) -> SlotResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

impl SlotStore for SqliteSlotStore {
    fn read(&self, key: &str) -> SlotResult<Option<String>> {
        ensure_valid_key(key)?;
        let value = self
            .conn
            .query_row("SELECT value FROM slots WHERE key = ?1;", [key], |row| {
                row.get::<_, Option<String>>(0)
            })
            .optional()?;
        Ok(value.flatten())
    }

    fn write(&self, key: &str, value: &str) -> SlotResult<u64> {
        ensure_valid_key(key)?;
        upsert_slot(&self.conn, key, Some(value))
    }

    fn remove(&self, key: &str) -> SlotResult<u64> {
        ensure_valid_key(key)?;
        upsert_slot(&self.conn, key, None)
    }

    fn revision(&self, key: &str) -> SlotResult<u64> {
        ensure_valid_key(key)?;
        let revision = self
            .conn
            .query_row("SELECT revision FROM slots WHERE key = ?1;", [key], |row| {
                row.get::<_, i64>(0)
            })
            .optional()?;
        Ok(revision.map_or(0, revision_from_db))
    }
}

fn upsert_slot(conn: &Connection, key: &str, value: Option<&str>) -> SlotResult<u64> {
    let revision: i64 = conn.query_row(
        "INSERT INTO slots (key, value, revision, updated_at)
         VALUES (?1, ?2, 1, (strftime('%s', 'now') * 1000))
         ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            revision = slots.revision + 1,
            updated_at = excluded.updated_at
         RETURNING revision;",
        params![key, value],
        |row| row.get(0),
    )?;
    Ok(revision_from_db(revision))
}

fn revision_from_db(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}
