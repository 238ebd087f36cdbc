//! Resident domain model.
//!
//! # Responsibility
//! - Define resident identity, placement-relevant attributes and the
//!   medication history carried with each resident.
//!
//! # Invariants
//! - A resident's bed is not stored here; occupancy lives on `Bed` only.
//! - Medication orders and administrations are free text and never validated
//!   against a formulary.
//! - Administration records are not linked to a specific order.

use crate::model::staff::StaffId;
use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for one resident.
pub type ResidentId = Uuid;
/// Stable identifier for one prescription.
pub type PrescriptionId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl Display for Gender {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scheduled dose inside a prescription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationOrder {
    pub medicine: String,
    pub dose: String,
    pub time: NaiveTime,
}

/// Doctor-issued prescription holding ordered medication orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: PrescriptionId,
    pub resident_id: ResidentId,
    pub doctor_id: StaffId,
    pub created_at: NaiveDateTime,
    pub orders: Vec<MedicationOrder>,
}

impl Prescription {
    pub fn new(resident_id: ResidentId, doctor_id: StaffId, created_at: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            resident_id,
            doctor_id,
            created_at,
            orders: Vec::new(),
        }
    }
}

/// Record of one dose actually given by a nurse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdministrationRecord {
    pub medicine: String,
    pub dose: String,
    pub administered_at: NaiveDateTime,
    pub nurse_id: StaffId,
}

/// Resident record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resident {
    pub id: ResidentId,
    pub name: String,
    pub gender: Gender,
    /// Requires a room with no other occupant whenever possible.
    pub isolation: bool,
    pub prescriptions: Vec<Prescription>,
    pub administrations: Vec<AdministrationRecord>,
}

impl Resident {
    /// Creates a resident with a generated id and empty medication history.
    pub fn new(name: impl Into<String>, gender: Gender, isolation: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            gender,
            isolation,
            prescriptions: Vec::new(),
            administrations: Vec::new(),
        }
    }

    pub fn prescription_mut(&mut self, id: PrescriptionId) -> Option<&mut Prescription> {
        self.prescriptions
            .iter_mut()
            .find(|prescription| prescription.id == id)
    }
}
