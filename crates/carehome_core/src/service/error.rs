//! Command error taxonomy for the care operations facade.
//!
//! # Invariants
//! - Every variant maps to one stable `code()` used in log lines.
//! - A returned error means no state change is observable.

use crate::access::gate::AccessDenied;
use crate::config::ConfigError;
use crate::engine::allocation::AllocationError;
use crate::engine::shift_validator::{ComplianceViolation, ShiftViolation};
use crate::model::resident::{PrescriptionId, ResidentId};
use crate::model::staff::{ShiftRangeError, StaffId};
use crate::model::topology::TopologyError;
use crate::model::ward::BedId;
use crate::repo::StoreError;
use chrono::NaiveDateTime;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CareResult<T> = Result<T, CareError>;

/// Missing entity referenced by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFound {
    Staff(StaffId),
    Resident(ResidentId),
    Bed(BedId),
    /// Bed exists but holds no resident.
    EmptyBed(BedId),
    Prescription(PrescriptionId),
    Snapshot,
}

impl Display for NotFound {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Staff(id) => write!(f, "staff not found: {id}"),
            Self::Resident(id) => write!(f, "resident not found: {id}"),
            Self::Bed(id) => write!(f, "bed not found: {id}"),
            Self::EmptyBed(id) => write!(f, "no resident in bed {id}"),
            Self::Prescription(id) => write!(f, "prescription not found: {id}"),
            Self::Snapshot => write!(f, "no saved snapshot"),
        }
    }
}

#[derive(Debug)]
pub enum CareError {
    Authorization(AccessDenied),
    NotFound(NotFound),
    BedOccupied(BedId),
    ShiftViolation(ShiftViolation),
    /// Actor passed the role check but is not on shift right now.
    NotRostered {
        staff_id: StaffId,
        at: NaiveDateTime,
    },
    Allocation(AllocationError),
    Compliance(ComplianceViolation),
    InvalidInput(String),
    Storage(StoreError),
}

impl CareError {
    /// Stable error code for logs and callers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Authorization(_) => "authorization_denied",
            Self::NotFound(_) => "not_found",
            Self::BedOccupied(_) => "bed_occupied",
            Self::ShiftViolation(_) => "shift_violation",
            Self::NotRostered { .. } => "not_rostered",
            Self::Allocation(err) => err.as_str(),
            Self::Compliance(_) => "compliance_violation",
            Self::InvalidInput(_) => "invalid_input",
            Self::Storage(_) => "storage_failure",
        }
    }
}

impl Display for CareError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Authorization(err) => write!(f, "{err}"),
            Self::NotFound(err) => write!(f, "{err}"),
            Self::BedOccupied(bed_id) => write!(f, "bed occupied: {bed_id}"),
            Self::ShiftViolation(err) => write!(f, "{err}"),
            Self::NotRostered { staff_id, at } => {
                write!(f, "staff {staff_id} is not rostered at {at}")
            }
            Self::Allocation(err) => write!(f, "{err}"),
            Self::Compliance(err) => write!(f, "{err}"),
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::Storage(err) => write!(f, "storage failure: {err}"),
        }
    }
}

impl Error for CareError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Authorization(err) => Some(err),
            Self::ShiftViolation(err) => Some(err),
            Self::Allocation(err) => Some(err),
            Self::Compliance(err) => Some(err),
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AccessDenied> for CareError {
    fn from(value: AccessDenied) -> Self {
        Self::Authorization(value)
    }
}

impl From<NotFound> for CareError {
    fn from(value: NotFound) -> Self {
        Self::NotFound(value)
    }
}

impl From<ShiftViolation> for CareError {
    fn from(value: ShiftViolation) -> Self {
        Self::ShiftViolation(value)
    }
}

impl From<ShiftRangeError> for CareError {
    fn from(value: ShiftRangeError) -> Self {
        Self::InvalidInput(value.to_string())
    }
}

impl From<AllocationError> for CareError {
    fn from(value: AllocationError) -> Self {
        Self::Allocation(value)
    }
}

impl From<ComplianceViolation> for CareError {
    fn from(value: ComplianceViolation) -> Self {
        Self::Compliance(value)
    }
}

impl From<StoreError> for CareError {
    fn from(value: StoreError) -> Self {
        Self::Storage(value)
    }
}

impl From<ConfigError> for CareError {
    fn from(value: ConfigError) -> Self {
        Self::InvalidInput(value.to_string())
    }
}

impl From<TopologyError> for CareError {
    fn from(value: TopologyError) -> Self {
        match value {
            TopologyError::UnknownBed(bed_id) => Self::NotFound(NotFound::Bed(bed_id)),
            TopologyError::Occupied(bed_id) => Self::BedOccupied(bed_id),
            other @ TopologyError::AlreadyPlaced { .. } => Self::InvalidInput(other.to_string()),
        }
    }
}
