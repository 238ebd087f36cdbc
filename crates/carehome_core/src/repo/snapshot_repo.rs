//! Full-state snapshot store.
//!
//! # Responsibility
//! - Persist the complete facility state as one opaque payload.
//! - Return the most recent payload on load.
//!
//! # Invariants
//! - Save and load are all-or-nothing; a payload that fails to decode is
//!   reported, never partially applied.

use crate::model::state::FacilityState;
use crate::repo::{format_timestamp, SharedConnection, StoreResult};
use chrono::NaiveDateTime;
use log::{error, info};
use parking_lot::Mutex;
use rusqlite::{params, OptionalExtension};
use std::time::Instant;

/// Snapshot persistence contract.
pub trait SnapshotStore: Send + Sync {
    /// Stores `state` and returns the snapshot id.
    fn save(&self, state: &FacilityState, saved_at: NaiveDateTime) -> StoreResult<i64>;
    /// Loads the most recently saved state, if any.
    fn load_latest(&self) -> StoreResult<Option<FacilityState>>;
}

/// SQLite-backed snapshot store over the `snapshots` table.
pub struct SqliteSnapshotStore {
    conn: SharedConnection,
}

impl SqliteSnapshotStore {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Number of stored snapshots.
    pub fn count(&self) -> StoreResult<i64> {
        let conn = self.conn.lock();
        let count = conn.query_row("SELECT COUNT(*) FROM snapshots;", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl SnapshotStore for SqliteSnapshotStore {
    fn save(&self, state: &FacilityState, saved_at: NaiveDateTime) -> StoreResult<i64> {
        let started_at = Instant::now();
        let payload = serde_json::to_string(state)?;

        let conn = self.conn.lock();
        let result = conn.execute(
            "INSERT INTO snapshots (saved_at, payload) VALUES (?1, ?2);",
            params![format_timestamp(saved_at), payload],
        );
        match result {
            Ok(_) => {
                let id = conn.last_insert_rowid();
                info!(
                    "event=snapshot_save module=repo status=ok snapshot_id={id} bytes={} duration_ms={}",
                    payload.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(id)
            }
            Err(err) => {
                error!(
                    "event=snapshot_save module=repo status=error error_code=snapshot_write_failed error={err}"
                );
                Err(err.into())
            }
        }
    }

    fn load_latest(&self) -> StoreResult<Option<FacilityState>> {
        let started_at = Instant::now();
        let conn = self.conn.lock();
        let row: Option<(i64, String)> = conn
            .query_row(
                "SELECT id, payload FROM snapshots ORDER BY id DESC LIMIT 1;",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((id, payload)) = row else {
            info!("event=snapshot_load module=repo status=ok found=false");
            return Ok(None);
        };

        let state = serde_json::from_str::<FacilityState>(&payload)?;
        info!(
            "event=snapshot_load module=repo status=ok found=true snapshot_id={id} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(Some(state))
    }
}

/// Process-local snapshot store keeping serialized payloads.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    payloads: Mutex<Vec<String>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.payloads.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.lock().is_empty()
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn save(&self, state: &FacilityState, _saved_at: NaiveDateTime) -> StoreResult<i64> {
        let payload = serde_json::to_string(state)?;
        let mut payloads = self.payloads.lock();
        payloads.push(payload);
        Ok(payloads.len() as i64)
    }

    fn load_latest(&self) -> StoreResult<Option<FacilityState>> {
        let payloads = self.payloads.lock();
        payloads
            .last()
            .map(|payload| serde_json::from_str(payload).map_err(Into::into))
            .transpose()
    }
}
