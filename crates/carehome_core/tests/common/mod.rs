#![allow(dead_code)]

use carehome_core::repo::archive_repo::InMemoryResidentArchive;
use carehome_core::repo::audit_repo::InMemoryAuditSink;
use carehome_core::repo::snapshot_repo::InMemorySnapshotStore;
use carehome_core::{
    Actor, AuditAction, CareHomeService, CareStores, FacilityConfig, FixedClock, Gender,
    ResidentId,
};
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Arc;

/// 2024-01-01 is a Monday.
pub fn monday(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .expect("valid monday datetime")
}

pub fn time(hour: u32, minute: u32) -> chrono::NaiveTime {
    chrono::NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time")
}

/// In-memory facility on a fixed clock; default accounts are on shift
/// around Monday 10:00.
pub struct Facility {
    pub service: CareHomeService,
    pub clock: Arc<FixedClock>,
    pub audit: Arc<InMemoryAuditSink>,
    pub archive: Arc<InMemoryResidentArchive>,
    pub snapshots: Arc<InMemorySnapshotStore>,
}

impl Facility {
    pub fn new() -> Self {
        Self::with_config(FacilityConfig::default())
    }

    pub fn with_config(config: FacilityConfig) -> Self {
        let clock = Arc::new(FixedClock::new(monday(10, 0)));
        let audit = Arc::new(InMemoryAuditSink::new());
        let archive = Arc::new(InMemoryResidentArchive::new());
        let snapshots = Arc::new(InMemorySnapshotStore::new());
        let stores = CareStores {
            audit: audit.clone(),
            archive: archive.clone(),
            snapshots: snapshots.clone(),
        };
        let service =
            CareHomeService::new(config, clock.clone(), stores).expect("facility bootstrap");
        Self {
            service,
            clock,
            audit,
            archive,
            snapshots,
        }
    }

    pub fn actor(&self, username: &str) -> Actor {
        let staff = self
            .service
            .find_staff(username)
            .expect("seeded account exists");
        Actor::from(&staff)
    }

    pub fn manager(&self) -> Actor {
        self.actor("manager")
    }

    pub fn doctor(&self) -> Actor {
        self.actor("doctor")
    }

    pub fn nurse(&self) -> Actor {
        self.actor("nurse")
    }

    /// Registers and places a non-isolation resident; returns id and bed.
    pub fn admit(&self, name: &str, gender: Gender) -> (ResidentId, String) {
        let admission = self
            .service
            .admit_resident(&self.manager(), name, gender, false, false)
            .expect("admission succeeds");
        (admission.resident.id, admission.bed_id)
    }

    pub fn admit_isolated(&self, name: &str, gender: Gender) -> (ResidentId, String) {
        let admission = self
            .service
            .admit_resident(&self.manager(), name, gender, true, false)
            .expect("isolation admission succeeds");
        (admission.resident.id, admission.bed_id)
    }

    pub fn audit_actions(&self) -> Vec<AuditAction> {
        self.audit.entries().iter().map(|entry| entry.action).collect()
    }

    pub fn count_action(&self, action: AuditAction) -> usize {
        self.audit
            .entries()
            .iter()
            .filter(|entry| entry.action == action)
            .count()
    }
}
