//! Role-based authorization gate for facility commands.
//!
//! # Invariants
//! - Deny by default: an actor that does not resolve to a registered staff
//!   member with the presented role is always rejected.
//! - No operation grants a role implicitly.

use crate::model::roster::Roster;
use crate::model::staff::{Role, Staff, StaffId};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Command identity used for authorization and log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Login,
    AddStaff,
    SetPassword,
    SetShift,
    AddResident,
    AllocateResident,
    AdmitResident,
    AssignBed,
    MoveResident,
    CheckResident,
    AddPrescription,
    AddMedicationOrder,
    Administer,
    Discharge,
    SaveSnapshot,
    LoadSnapshot,
    ResetFacility,
}

impl Operation {
    /// Stable string id used in log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::AddStaff => "add_staff",
            Self::SetPassword => "set_password",
            Self::SetShift => "set_shift",
            Self::AddResident => "add_resident",
            Self::AllocateResident => "allocate_resident",
            Self::AdmitResident => "admit_resident",
            Self::AssignBed => "assign_bed",
            Self::MoveResident => "move_resident",
            Self::CheckResident => "check_resident",
            Self::AddPrescription => "add_prescription",
            Self::AddMedicationOrder => "add_medication_order",
            Self::Administer => "administer",
            Self::Discharge => "discharge",
            Self::SaveSnapshot => "save_snapshot",
            Self::LoadSnapshot => "load_snapshot",
            Self::ResetFacility => "reset_facility",
        }
    }

    /// Role required to run the operation; `None` admits any registered staff.
    pub fn required_role(self) -> Option<Role> {
        match self {
            Self::Login | Self::CheckResident => None,
            Self::AddPrescription | Self::AddMedicationOrder => Some(Role::Doctor),
            Self::MoveResident | Self::Administer => Some(Role::Nurse),
            Self::AddStaff
            | Self::SetPassword
            | Self::SetShift
            | Self::AddResident
            | Self::AllocateResident
            | Self::AdmitResident
            | Self::AssignBed
            | Self::Discharge
            | Self::SaveSnapshot
            | Self::LoadSnapshot
            | Self::ResetFacility => Some(Role::Manager),
        }
    }

    /// Whether the actor must also be on duty at command time.
    ///
    /// Management actions are not roster-checked.
    pub fn is_time_gated(self) -> bool {
        matches!(
            self,
            Self::AddPrescription | Self::MoveResident | Self::Administer
        )
    }
}

/// Explicit caller identity passed into every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub staff_id: StaffId,
    pub role: Role,
}

impl Actor {
    pub fn new(staff_id: StaffId, role: Role) -> Self {
        Self { staff_id, role }
    }
}

impl From<&Staff> for Actor {
    fn from(staff: &Staff) -> Self {
        Self::new(staff.id(), staff.role())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    UnknownActor,
    /// Presented role differs from the registered one.
    RoleMismatch { presented: Role, registered: Role },
    RoleRequired { required: Role, actual: Role },
    InvalidCredentials,
}

impl Display for DenialReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownActor => write!(f, "actor is not a registered staff member"),
            Self::RoleMismatch {
                presented,
                registered,
            } => write!(
                f,
                "actor presented role {presented} but is registered as {registered}"
            ),
            Self::RoleRequired { required, actual } => {
                write!(f, "only {required} may perform this action, actor is {actual}")
            }
            Self::InvalidCredentials => write!(f, "invalid credentials"),
        }
    }
}

/// Authorization failure for one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessDenied {
    pub operation: Operation,
    pub reason: DenialReason,
}

impl Display for AccessDenied {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} denied: {}", self.operation.as_str(), self.reason)
    }
}

impl Error for AccessDenied {}

/// Stateless role comparison; a missing actor role always fails.
pub fn check(actor_role: Option<Role>, required: Option<Role>) -> Result<(), DenialReason> {
    let Some(actual) = actor_role else {
        return Err(DenialReason::UnknownActor);
    };
    match required {
        Some(required) if required != actual => {
            Err(DenialReason::RoleRequired { required, actual })
        }
        _ => Ok(()),
    }
}

/// Resolves `actor` in `roster` and checks the operation's required role.
pub fn authorize<'r>(
    roster: &'r Roster,
    actor: &Actor,
    operation: Operation,
) -> Result<&'r Staff, AccessDenied> {
    let deny = |reason| AccessDenied { operation, reason };

    let staff = roster
        .get(actor.staff_id)
        .ok_or(deny(DenialReason::UnknownActor))?;
    if staff.role() != actor.role {
        return Err(deny(DenialReason::RoleMismatch {
            presented: actor.role,
            registered: staff.role(),
        }));
    }
    check(Some(staff.role()), operation.required_role()).map_err(deny)?;
    Ok(staff)
}
