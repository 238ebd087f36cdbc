//! Audit entry model.
//!
//! # Invariants
//! - Entries are immutable once built; sinks only append.
//! - `action` codes are stable strings shared with persisted audit rows.

use crate::model::staff::StaffId;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Stable action codes emitted by facility commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Login,
    AddStaff,
    ModifyStaffPassword,
    SetShift,
    AddResident,
    AllocateResident,
    MoveResident,
    CheckResident,
    AddPrescription,
    AddMedicationOrder,
    Administer,
    Discharge,
    SaveSnapshot,
    LoadSnapshot,
    Reset,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Login => "LOGIN",
            Self::AddStaff => "ADD_STAFF",
            Self::ModifyStaffPassword => "MODIFY_STAFF_PASSWORD",
            Self::SetShift => "SET_SHIFT",
            Self::AddResident => "ADD_RESIDENT",
            Self::AllocateResident => "ALLOCATE_RESIDENT",
            Self::MoveResident => "MOVE_RESIDENT",
            Self::CheckResident => "CHECK_RESIDENT",
            Self::AddPrescription => "ADD_PRESCRIPTION",
            Self::AddMedicationOrder => "ADD_MEDICATION_ORDER",
            Self::Administer => "ADMINISTER",
            Self::Discharge => "DISCHARGE",
            Self::SaveSnapshot => "SAVE_SNAPSHOT",
            Self::LoadSnapshot => "LOAD_SNAPSHOT",
            Self::Reset => "RESET",
        }
    }

    /// Parses a persisted action code.
    pub fn parse(value: &str) -> Option<Self> {
        ALL_ACTIONS
            .iter()
            .copied()
            .find(|action| action.as_str() == value)
    }
}

const ALL_ACTIONS: &[AuditAction] = &[
    AuditAction::Login,
    AuditAction::AddStaff,
    AuditAction::ModifyStaffPassword,
    AuditAction::SetShift,
    AuditAction::AddResident,
    AuditAction::AllocateResident,
    AuditAction::MoveResident,
    AuditAction::CheckResident,
    AuditAction::AddPrescription,
    AuditAction::AddMedicationOrder,
    AuditAction::Administer,
    AuditAction::Discharge,
    AuditAction::SaveSnapshot,
    AuditAction::LoadSnapshot,
    AuditAction::Reset,
];

/// One append-only audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: NaiveDateTime,
    pub actor_id: StaffId,
    pub action: AuditAction,
    /// Free-text `key=value` details; never carries credentials.
    pub details: String,
}

impl AuditEntry {
    pub fn new(
        timestamp: NaiveDateTime,
        actor_id: StaffId,
        action: AuditAction,
        details: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            actor_id,
            action,
            details: details.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AuditAction;

    #[test]
    fn action_codes_parse_back() {
        assert_eq!(AuditAction::parse("ADMINISTER"), Some(AuditAction::Administer));
        assert_eq!(
            AuditAction::parse("MODIFY_STAFF_PASSWORD"),
            Some(AuditAction::ModifyStaffPassword)
        );
        assert_eq!(AuditAction::parse("administer"), None);
    }
}
