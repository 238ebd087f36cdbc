//! Append-only audit sinks.
//!
//! # Invariants
//! - Entries are stored in append order and never modified.
//! - The SQLite table rejects UPDATE/DELETE through triggers.

use crate::model::audit::{AuditAction, AuditEntry};
use crate::repo::{format_timestamp, parse_timestamp, SharedConnection, StoreError, StoreResult};
use parking_lot::Mutex;
use rusqlite::{params, Row};
use uuid::Uuid;

/// Write-only audit destination used by facility commands.
pub trait AuditSink: Send + Sync {
    fn append(&self, entry: &AuditEntry) -> StoreResult<()>;
}

/// Process-local sink; readable for diagnostics and tests.
#[derive(Debug, Default)]
pub struct InMemoryAuditSink {
    entries: Mutex<Vec<AuditEntry>>,
}

impl InMemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all entries in append order.
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn append(&self, entry: &AuditEntry) -> StoreResult<()> {
        self.entries.lock().push(entry.clone());
        Ok(())
    }
}

/// SQLite-backed sink over the `audit_log` table.
pub struct SqliteAuditSink {
    conn: SharedConnection,
}

impl SqliteAuditSink {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Lists entries in append order.
    pub fn list(&self, limit: Option<u32>) -> StoreResult<Vec<AuditEntry>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT recorded_at, actor_id, action, details
             FROM audit_log
             ORDER BY seq ASC
             LIMIT ?1;",
        )?;
        let limit = limit.map_or(-1, i64::from);
        let mut rows = stmt.query(params![limit])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_audit_row(row)?);
        }
        Ok(entries)
    }
}

impl AuditSink for SqliteAuditSink {
    fn append(&self, entry: &AuditEntry) -> StoreResult<()> {
        self.conn.lock().execute(
            "INSERT INTO audit_log (recorded_at, actor_id, action, details)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                format_timestamp(entry.timestamp),
                entry.actor_id.to_string(),
                entry.action.as_str(),
                entry.details.as_str(),
            ],
        )?;
        Ok(())
    }
}

fn parse_audit_row(row: &Row<'_>) -> StoreResult<AuditEntry> {
    let recorded_at: String = row.get("recorded_at")?;
    let timestamp = parse_timestamp(&recorded_at, "audit_log.recorded_at")?;

    let actor_text: String = row.get("actor_id")?;
    let actor_id = Uuid::parse_str(&actor_text).map_err(|_| {
        StoreError::InvalidData(format!("invalid uuid `{actor_text}` in audit_log.actor_id"))
    })?;

    let action_text: String = row.get("action")?;
    let action = AuditAction::parse(&action_text).ok_or_else(|| {
        StoreError::InvalidData(format!("invalid action `{action_text}` in audit_log.action"))
    })?;

    Ok(AuditEntry {
        timestamp,
        actor_id,
        action,
        details: row.get("details")?,
    })
}
