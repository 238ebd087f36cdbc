//! Archive for discharged residents.
//!
//! # Responsibility
//! - Keep the full record of a discharged resident, including prescriptions,
//!   orders and administrations, after it leaves the active state.

use crate::model::resident::{Resident, ResidentId};
use crate::repo::{format_timestamp, parse_timestamp, SharedConnection, StoreResult};
use chrono::NaiveDateTime;
use parking_lot::Mutex;
use rusqlite::params;

/// One archived resident record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedResident {
    pub resident: Resident,
    pub archived_at: NaiveDateTime,
}

/// Archival collaborator receiving discharged residents.
pub trait ResidentArchive: Send + Sync {
    fn archive(&self, resident: &Resident, archived_at: NaiveDateTime) -> StoreResult<()>;
}

#[derive(Debug, Default)]
pub struct InMemoryResidentArchive {
    records: Mutex<Vec<ArchivedResident>>,
}

impl InMemoryResidentArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<ArchivedResident> {
        self.records.lock().clone()
    }
}

impl ResidentArchive for InMemoryResidentArchive {
    fn archive(&self, resident: &Resident, archived_at: NaiveDateTime) -> StoreResult<()> {
        self.records.lock().push(ArchivedResident {
            resident: resident.clone(),
            archived_at,
        });
        Ok(())
    }
}

/// SQLite-backed archive over the `archived_residents` table.
pub struct SqliteResidentArchive {
    conn: SharedConnection,
}

impl SqliteResidentArchive {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Latest archived record for `resident_id`.
    pub fn get(&self, resident_id: ResidentId) -> StoreResult<Option<ArchivedResident>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT archived_at, payload
             FROM archived_residents
             WHERE resident_id = ?1
             ORDER BY seq DESC
             LIMIT 1;",
        )?;
        let mut rows = stmt.query(params![resident_id.to_string()])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let archived_at: String = row.get("archived_at")?;
        let payload: String = row.get("payload")?;
        Ok(Some(ArchivedResident {
            resident: serde_json::from_str(&payload)?,
            archived_at: parse_timestamp(&archived_at, "archived_residents.archived_at")?,
        }))
    }
}

impl ResidentArchive for SqliteResidentArchive {
    fn archive(&self, resident: &Resident, archived_at: NaiveDateTime) -> StoreResult<()> {
        let payload = serde_json::to_string(resident)?;
        self.conn.lock().execute(
            "INSERT INTO archived_residents (resident_id, archived_at, payload)
             VALUES (?1, ?2, ?3);",
            params![
                resident.id.to_string(),
                format_timestamp(archived_at),
                payload
            ],
        )?;
        Ok(())
    }
}
