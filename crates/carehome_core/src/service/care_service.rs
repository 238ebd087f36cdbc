//! Care operations facade.
//!
//! # Responsibility
//! - Expose every facility command behind one entry point.
//! - Run each command as authorize, on-duty check, domain step, audit.
//! - Own the shared facility state and its persistence collaborators.
//!
//! # Invariants
//! - One `RwLock` guards the whole state; mutating commands hold the write
//!   guard from authorization until the audit entry is appended.
//! - A failed command leaves no observable mutation.
//! - Audit sink failures are logged and never roll back a command.
//! - Credentials and resident names never reach log lines.

use crate::access::gate::{self, AccessDenied, Actor, DenialReason, Operation};
use crate::config::{ConfigError, FacilityConfig};
use crate::engine::allocation::{self, OccupantProfile, Placement, PlacementKind};
use crate::engine::shift_validator::{self, propose_shift};
use crate::model::audit::{AuditAction, AuditEntry};
use crate::model::resident::{
    AdministrationRecord, Gender, MedicationOrder, Prescription, PrescriptionId, Resident,
    ResidentId,
};
use crate::model::roster::Roster;
use crate::model::staff::{Role, Shift, ShiftRangeError, Staff, StaffId};
use crate::model::state::FacilityState;
use crate::model::ward::{BedId, Ward};
use crate::repo::archive_repo::{InMemoryResidentArchive, ResidentArchive, SqliteResidentArchive};
use crate::repo::audit_repo::{AuditSink, InMemoryAuditSink, SqliteAuditSink};
use crate::repo::snapshot_repo::{InMemorySnapshotStore, SnapshotStore, SqliteSnapshotStore};
use crate::repo::SharedConnection;
use crate::service::clock::Clock;
use crate::service::error::{CareError, CareResult, NotFound};
use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, Weekday};
use log::{error, info, warn};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::Regex;
use std::sync::Arc;
use std::time::Instant;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9._-]{1,31}$").expect("valid username regex"));
static LAST_SECOND_OF_DAY: Lazy<NaiveTime> =
    Lazy::new(|| NaiveTime::from_hms_opt(23, 59, 59).expect("valid end-of-day time"));

const DEFAULT_ACCOUNTS: [(Role, &str); 3] = [
    (Role::Manager, "manager"),
    (Role::Doctor, "doctor"),
    (Role::Nurse, "nurse"),
];
const SEED_SHIFT_MAX_HOURS: i64 = 2;

/// Persistence collaborators used by one facility.
#[derive(Clone)]
pub struct CareStores {
    pub audit: Arc<dyn AuditSink>,
    pub archive: Arc<dyn ResidentArchive>,
    pub snapshots: Arc<dyn SnapshotStore>,
}

impl CareStores {
    pub fn in_memory() -> Self {
        Self {
            audit: Arc::new(InMemoryAuditSink::new()),
            archive: Arc::new(InMemoryResidentArchive::new()),
            snapshots: Arc::new(InMemorySnapshotStore::new()),
        }
    }

    /// All three stores over one migrated SQLite connection.
    pub fn sqlite(conn: SharedConnection) -> Self {
        Self {
            audit: Arc::new(SqliteAuditSink::new(Arc::clone(&conn))),
            archive: Arc::new(SqliteResidentArchive::new(Arc::clone(&conn))),
            snapshots: Arc::new(SqliteSnapshotStore::new(conn)),
        }
    }
}

/// Bed usage summary across all wards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupancy {
    pub total_beds: usize,
    pub occupied_beds: usize,
}

impl Occupancy {
    pub fn vacant_beds(&self) -> usize {
        self.total_beds - self.occupied_beds
    }
}

/// Result of registering and placing a resident in one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    pub resident: Resident,
    pub bed_id: BedId,
}

/// Shared facility facade; wrap in `Arc` to serve several stations.
pub struct CareHomeService {
    config: FacilityConfig,
    clock: Arc<dyn Clock>,
    stores: CareStores,
    state: RwLock<FacilityState>,
}

impl CareHomeService {
    /// Builds a facility from `config`, seeding default accounts if enabled.
    pub fn new(
        config: FacilityConfig,
        clock: Arc<dyn Clock>,
        stores: CareStores,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = bootstrap_state(&config, clock.now())?;
        info!(
            "event=facility_bootstrap module=service status=ok wards={} beds={} staff={}",
            state.topology.wards().len(),
            state.topology.total_beds(),
            state.roster.len()
        );
        Ok(Self {
            config,
            clock,
            stores,
            state: RwLock::new(state),
        })
    }

    pub fn config(&self) -> &FacilityConfig {
        &self.config
    }

    /// Verifies credentials and returns the matching staff record.
    pub fn login(&self, username: &str, password: &str) -> CareResult<Staff> {
        let started_at = Instant::now();
        let result = (|| -> CareResult<Staff> {
            let state = self.state.read();
            let now = self.clock.now();
            let username = normalize_username(username);
            let staff = state
                .roster
                .find_by_username(&username)
                .filter(|staff| staff.password_matches(password))
                .ok_or(AccessDenied {
                    operation: Operation::Login,
                    reason: DenialReason::InvalidCredentials,
                })?;
            self.record(
                now,
                staff.id(),
                AuditAction::Login,
                format!("username={}", staff.username()),
            );
            Ok(staff.clone())
        })();
        finish(Operation::Login, None, started_at, result)
    }

    pub fn add_staff(
        &self,
        actor: &Actor,
        role: Role,
        username: &str,
        password: &str,
    ) -> CareResult<Staff> {
        let started_at = Instant::now();
        let result = self.mutate(actor, Operation::AddStaff, |state, now| {
            let username = normalize_username(username);
            if !USERNAME_RE.is_match(&username) {
                return Err(CareError::InvalidInput(format!(
                    "username `{username}` must be 2-32 characters of a-z, 0-9, `.`, `_`, `-`"
                )));
            }
            if password.is_empty() {
                return Err(CareError::InvalidInput("password must not be empty".to_string()));
            }

            let staff = Staff::new(role, username, password);
            state
                .roster
                .insert(staff.clone())
                .map_err(|err| CareError::InvalidInput(err.to_string()))?;
            self.record(
                now,
                actor.staff_id,
                AuditAction::AddStaff,
                format!(
                    "staff_id={} role={} username={}",
                    staff.id(),
                    staff.role(),
                    staff.username()
                ),
            );
            Ok(staff)
        });
        finish(Operation::AddStaff, Some(actor), started_at, result)
    }

    pub fn set_password(&self, actor: &Actor, staff_id: StaffId, password: &str) -> CareResult<()> {
        let started_at = Instant::now();
        let result = self.mutate(actor, Operation::SetPassword, |state, now| {
            if password.is_empty() {
                return Err(CareError::InvalidInput("password must not be empty".to_string()));
            }
            let staff = state
                .roster
                .get_mut(staff_id)
                .ok_or(NotFound::Staff(staff_id))?;
            staff.set_password(password);
            self.record(
                now,
                actor.staff_id,
                AuditAction::ModifyStaffPassword,
                format!("staff_id={staff_id}"),
            );
            Ok(())
        });
        finish(Operation::SetPassword, Some(actor), started_at, result)
    }

    /// Adds one shift to a staff member's roster if the daily cap holds.
    pub fn set_shift(
        &self,
        actor: &Actor,
        staff_id: StaffId,
        day: Weekday,
        start: NaiveTime,
        end: NaiveTime,
    ) -> CareResult<Shift> {
        let started_at = Instant::now();
        let result = self.mutate(actor, Operation::SetShift, |state, now| {
            let shift = Shift::new(day, start, end)?;
            let staff = state
                .roster
                .get_mut(staff_id)
                .ok_or(NotFound::Staff(staff_id))?;
            propose_shift(staff, shift, &self.config.limits)?;
            self.record(
                now,
                actor.staff_id,
                AuditAction::SetShift,
                format!("staff_id={staff_id} shift={shift}"),
            );
            Ok(shift)
        });
        finish(Operation::SetShift, Some(actor), started_at, result)
    }

    /// Registers a resident without placing them.
    pub fn add_resident(
        &self,
        actor: &Actor,
        name: &str,
        gender: Gender,
        isolation: bool,
    ) -> CareResult<Resident> {
        let started_at = Instant::now();
        let result = self.mutate(actor, Operation::AddResident, |state, now| {
            let resident = register_resident(state, name, gender, isolation)?;
            self.record_registration(now, actor, &resident);
            Ok(resident)
        });
        finish(Operation::AddResident, Some(actor), started_at, result)
    }

    /// Places a registered resident according to the allocation policy.
    pub fn allocate_resident(
        &self,
        actor: &Actor,
        resident_id: ResidentId,
        allow_mixed_gender: bool,
    ) -> CareResult<BedId> {
        let started_at = Instant::now();
        let result = self.mutate(actor, Operation::AllocateResident, |state, now| {
            let placement = place_resident(state, resident_id, allow_mixed_gender)?;
            self.record_placement(now, actor, resident_id, &placement);
            Ok(placement.bed_id)
        });
        finish(Operation::AllocateResident, Some(actor), started_at, result)
    }

    /// Registers and places a resident; nothing is kept if placement fails.
    pub fn admit_resident(
        &self,
        actor: &Actor,
        name: &str,
        gender: Gender,
        isolation: bool,
        allow_mixed_gender: bool,
    ) -> CareResult<Admission> {
        let started_at = Instant::now();
        let result = self.mutate(actor, Operation::AdmitResident, |state, now| {
            let resident = register_resident(state, name, gender, isolation)?;
            let placement = match place_resident(state, resident.id, allow_mixed_gender) {
                Ok(placement) => placement,
                Err(err) => {
                    state.remove_resident(resident.id);
                    return Err(err);
                }
            };
            self.record_registration(now, actor, &resident);
            self.record_placement(now, actor, resident.id, &placement);
            Ok(Admission {
                resident,
                bed_id: placement.bed_id,
            })
        });
        finish(Operation::AdmitResident, Some(actor), started_at, result)
    }

    /// Places a registered resident into the named vacant bed.
    ///
    /// Bypasses the allocation policy; the bed is re-checked on write.
    pub fn assign_bed(
        &self,
        actor: &Actor,
        resident_id: ResidentId,
        bed_id: &str,
    ) -> CareResult<()> {
        let started_at = Instant::now();
        let result = self.mutate(actor, Operation::AssignBed, |state, now| {
            ensure_unplaced(state, resident_id)?;
            state.topology.assign(bed_id, resident_id)?;
            let placement = Placement {
                bed_id: bed_id.to_string(),
                kind: PlacementKind::Direct,
            };
            self.record_placement(now, actor, resident_id, &placement);
            Ok(())
        });
        finish(Operation::AssignBed, Some(actor), started_at, result)
    }

    /// Moves the resident in `from` to the vacant bed `to`.
    ///
    /// Bypasses the allocation policy.
    pub fn move_resident(&self, actor: &Actor, from: &str, to: &str) -> CareResult<ResidentId> {
        let started_at = Instant::now();
        let result = self.mutate(actor, Operation::MoveResident, |state, now| {
            let topology = &mut state.topology;
            let target_vacant = topology
                .bed(to)
                .map(|bed| bed.is_vacant())
                .ok_or_else(|| NotFound::Bed(to.to_string()))?;
            let resident_id = topology
                .bed(from)
                .ok_or_else(|| NotFound::Bed(from.to_string()))?
                .resident()
                .ok_or_else(|| NotFound::EmptyBed(from.to_string()))?;
            if !target_vacant {
                return Err(CareError::BedOccupied(to.to_string()));
            }

            topology.release(from)?;
            topology.assign(to, resident_id)?;
            self.record(
                now,
                actor.staff_id,
                AuditAction::MoveResident,
                format!("resident_id={resident_id} from={from} to={to}"),
            );
            Ok(resident_id)
        });
        finish(Operation::MoveResident, Some(actor), started_at, result)
    }

    /// Returns the resident currently in `bed_id`.
    pub fn resident_in_bed(&self, actor: &Actor, bed_id: &str) -> CareResult<Resident> {
        let started_at = Instant::now();
        let result = (|| -> CareResult<Resident> {
            let state = self.state.read();
            let now = self.clock.now();
            authorize_at(&state, actor, Operation::CheckResident, now)?;
            let resident_id = state
                .topology
                .bed(bed_id)
                .ok_or_else(|| NotFound::Bed(bed_id.to_string()))?
                .resident()
                .ok_or_else(|| NotFound::EmptyBed(bed_id.to_string()))?;
            let resident = state
                .resident(resident_id)
                .cloned()
                .ok_or(NotFound::Resident(resident_id))?;
            self.record(
                now,
                actor.staff_id,
                AuditAction::CheckResident,
                format!("bed_id={bed_id} resident_id={resident_id}"),
            );
            Ok(resident)
        })();
        finish(Operation::CheckResident, Some(actor), started_at, result)
    }

    pub fn add_prescription(
        &self,
        actor: &Actor,
        resident_id: ResidentId,
    ) -> CareResult<Prescription> {
        let started_at = Instant::now();
        let result = self.mutate(actor, Operation::AddPrescription, |state, now| {
            let resident = state
                .resident_mut(resident_id)
                .ok_or(NotFound::Resident(resident_id))?;
            let prescription = Prescription::new(resident_id, actor.staff_id, now);
            resident.prescriptions.push(prescription.clone());
            self.record(
                now,
                actor.staff_id,
                AuditAction::AddPrescription,
                format!(
                    "resident_id={resident_id} prescription_id={}",
                    prescription.id
                ),
            );
            Ok(prescription)
        });
        finish(Operation::AddPrescription, Some(actor), started_at, result)
    }

    pub fn add_medication_order(
        &self,
        actor: &Actor,
        resident_id: ResidentId,
        prescription_id: PrescriptionId,
        medicine: &str,
        dose: &str,
        time: NaiveTime,
    ) -> CareResult<MedicationOrder> {
        let started_at = Instant::now();
        let result = self.mutate(actor, Operation::AddMedicationOrder, |state, now| {
            let medicine = required_text("medicine", medicine)?;
            let prescription = state
                .resident_mut(resident_id)
                .ok_or(NotFound::Resident(resident_id))?
                .prescription_mut(prescription_id)
                .ok_or(NotFound::Prescription(prescription_id))?;
            let order = MedicationOrder {
                medicine,
                dose: dose.trim().to_string(),
                time,
            };
            prescription.orders.push(order.clone());
            self.record(
                now,
                actor.staff_id,
                AuditAction::AddMedicationOrder,
                format!(
                    "resident_id={resident_id} prescription_id={prescription_id} medicine={} dose={} time={}",
                    order.medicine,
                    order.dose,
                    order.time.format("%H:%M")
                ),
            );
            Ok(order)
        });
        finish(Operation::AddMedicationOrder, Some(actor), started_at, result)
    }

    /// Records one dose given by the acting nurse at the current time.
    pub fn administer(
        &self,
        actor: &Actor,
        resident_id: ResidentId,
        medicine: &str,
        dose: &str,
    ) -> CareResult<AdministrationRecord> {
        let started_at = Instant::now();
        let result = self.mutate(actor, Operation::Administer, |state, now| {
            let medicine = required_text("medicine", medicine)?;
            let resident = state
                .resident_mut(resident_id)
                .ok_or(NotFound::Resident(resident_id))?;
            let record = AdministrationRecord {
                medicine,
                dose: dose.trim().to_string(),
                administered_at: now,
                nurse_id: actor.staff_id,
            };
            resident.administrations.push(record.clone());
            self.record(
                now,
                actor.staff_id,
                AuditAction::Administer,
                format!(
                    "resident_id={resident_id} medicine={} dose={}",
                    record.medicine, record.dose
                ),
            );
            Ok(record)
        });
        finish(Operation::Administer, Some(actor), started_at, result)
    }

    /// Archives, unplaces and removes a resident.
    ///
    /// The archive write happens first; if it fails nothing changes.
    pub fn discharge(&self, actor: &Actor, resident_id: ResidentId) -> CareResult<Resident> {
        let started_at = Instant::now();
        let result = self.mutate(actor, Operation::Discharge, |state, now| {
            let resident = state
                .resident(resident_id)
                .ok_or(NotFound::Resident(resident_id))?;
            self.stores.archive.archive(resident, now)?;

            let freed_bed = state.topology.vacate_resident(resident_id);
            let resident = state
                .remove_resident(resident_id)
                .ok_or(NotFound::Resident(resident_id))?;
            self.record(
                now,
                actor.staff_id,
                AuditAction::Discharge,
                format!(
                    "resident_id={resident_id} bed_id={}",
                    freed_bed.as_deref().unwrap_or("none")
                ),
            );
            Ok(resident)
        });
        finish(Operation::Discharge, Some(actor), started_at, result)
    }

    /// Re-checks daily caps and doctor coverage over the current roster.
    pub fn check_compliance(&self) -> CareResult<()> {
        let started_at = Instant::now();
        let result = {
            let state = self.state.read();
            shift_validator::sweep_compliance(state.roster.iter(), &self.config.limits)
                .map_err(CareError::from)
        };
        match &result {
            Ok(()) => info!(
                "event=compliance_sweep module=service status=ok duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=compliance_sweep module=service status=error error_code={} error={err}",
                err.code()
            ),
        }
        result
    }

    /// Persists the full state; returns the snapshot id.
    pub fn save_snapshot(&self, actor: &Actor) -> CareResult<i64> {
        let started_at = Instant::now();
        let result = (|| -> CareResult<i64> {
            let state = self.state.read();
            let now = self.clock.now();
            authorize_at(&state, actor, Operation::SaveSnapshot, now)?;
            let snapshot_id = self.stores.snapshots.save(&state, now)?;
            self.record(
                now,
                actor.staff_id,
                AuditAction::SaveSnapshot,
                format!("snapshot_id={snapshot_id}"),
            );
            Ok(snapshot_id)
        })();
        finish(Operation::SaveSnapshot, Some(actor), started_at, result)
    }

    /// Replaces the whole state with the latest snapshot.
    ///
    /// A roster that fails the compliance sweep is still loaded and logged.
    pub fn load_snapshot(&self, actor: &Actor) -> CareResult<()> {
        let started_at = Instant::now();
        let result = self.mutate(actor, Operation::LoadSnapshot, |state, now| {
            let loaded = self
                .stores
                .snapshots
                .load_latest()?
                .ok_or(NotFound::Snapshot)?;
            if let Some(reason) = loaded.inconsistency() {
                return Err(CareError::InvalidInput(format!("snapshot rejected: {reason}")));
            }

            *state = loaded;
            if let Err(violation) =
                shift_validator::sweep_compliance(state.roster.iter(), &self.config.limits)
            {
                warn!(
                    "event=snapshot_compliance module=service status=error error_code=compliance_violation error={violation}"
                );
            }
            self.record(
                now,
                actor.staff_id,
                AuditAction::LoadSnapshot,
                format!(
                    "staff={} residents={}",
                    state.roster.len(),
                    state.residents.len()
                ),
            );
            Ok(())
        });
        finish(Operation::LoadSnapshot, Some(actor), started_at, result)
    }

    /// Replaces the state with a freshly bootstrapped facility.
    pub fn reset_facility(&self, actor: &Actor) -> CareResult<()> {
        let started_at = Instant::now();
        let result = self.mutate(actor, Operation::ResetFacility, |state, now| {
            *state = bootstrap_state(&self.config, now)?;
            self.record(now, actor.staff_id, AuditAction::Reset, String::new());
            Ok(())
        });
        finish(Operation::ResetFacility, Some(actor), started_at, result)
    }

    pub fn wards(&self) -> Vec<Ward> {
        self.state.read().topology.wards().to_vec()
    }

    pub fn staff(&self) -> Vec<Staff> {
        self.state.read().roster.iter().cloned().collect()
    }

    pub fn find_staff(&self, username: &str) -> Option<Staff> {
        let username = normalize_username(username);
        self.state.read().roster.find_by_username(&username).cloned()
    }

    pub fn residents(&self) -> Vec<Resident> {
        self.state.read().residents.clone()
    }

    pub fn resident(&self, resident_id: ResidentId) -> Option<Resident> {
        self.state.read().resident(resident_id).cloned()
    }

    pub fn bed_of(&self, resident_id: ResidentId) -> Option<BedId> {
        self.state
            .read()
            .topology
            .bed_of(resident_id)
            .map(|bed| bed.id().to_string())
    }

    pub fn occupancy(&self) -> Occupancy {
        let state = self.state.read();
        Occupancy {
            total_beds: state.topology.total_beds(),
            occupied_beds: state.topology.occupied_beds(),
        }
    }

    /// Consistent copy of the whole state.
    pub fn snapshot_state(&self) -> FacilityState {
        self.state.read().clone()
    }

    /// Runs `step` under the write guard after authorizing `actor`.
    fn mutate<T, F>(&self, actor: &Actor, operation: Operation, step: F) -> CareResult<T>
    where
        F: FnOnce(&mut FacilityState, NaiveDateTime) -> CareResult<T>,
    {
        let mut state = self.state.write();
        let now = self.clock.now();
        authorize_at(&state, actor, operation, now)?;
        step(&mut state, now)
    }

    fn record(&self, at: NaiveDateTime, actor_id: StaffId, action: AuditAction, details: String) {
        let entry = AuditEntry::new(at, actor_id, action, details);
        if let Err(err) = self.stores.audit.append(&entry) {
            error!(
                "event=audit_append module=service status=error action={} error={err}",
                action.as_str()
            );
        }
    }

    fn record_registration(&self, now: NaiveDateTime, actor: &Actor, resident: &Resident) {
        self.record(
            now,
            actor.staff_id,
            AuditAction::AddResident,
            format!(
                "resident_id={} gender={} isolation={}",
                resident.id, resident.gender, resident.isolation
            ),
        );
    }

    fn record_placement(
        &self,
        now: NaiveDateTime,
        actor: &Actor,
        resident_id: ResidentId,
        placement: &Placement,
    ) {
        self.record(
            now,
            actor.staff_id,
            AuditAction::AllocateResident,
            format!(
                "resident_id={resident_id} bed_id={} placement={}",
                placement.bed_id,
                placement.kind.as_str()
            ),
        );
    }
}

fn authorize_at(
    state: &FacilityState,
    actor: &Actor,
    operation: Operation,
    now: NaiveDateTime,
) -> CareResult<()> {
    let staff = gate::authorize(&state.roster, actor, operation)?;
    if operation.is_time_gated() && !shift_validator::is_on_duty(staff, now) {
        return Err(CareError::NotRostered {
            staff_id: staff.id(),
            at: now,
        });
    }
    Ok(())
}

fn register_resident(
    state: &mut FacilityState,
    name: &str,
    gender: Gender,
    isolation: bool,
) -> CareResult<Resident> {
    let name = required_text("resident name", name)?;
    let resident = Resident::new(name, gender, isolation);
    state.residents.push(resident.clone());
    Ok(resident)
}

fn place_resident(
    state: &mut FacilityState,
    resident_id: ResidentId,
    allow_mixed_gender: bool,
) -> CareResult<Placement> {
    let resident = ensure_unplaced(state, resident_id)?;
    let placement = allocation::allocate(resident, &state.topology, allow_mixed_gender, |id| {
        state.resident(id).map(OccupantProfile::from)
    })?;
    state.topology.assign(&placement.bed_id, resident_id)?;
    Ok(placement)
}

/// Known resident that holds no bed yet.
fn ensure_unplaced(state: &FacilityState, resident_id: ResidentId) -> CareResult<&Resident> {
    let resident = state
        .resident(resident_id)
        .ok_or(NotFound::Resident(resident_id))?;
    if let Some(bed) = state.topology.bed_of(resident_id) {
        return Err(CareError::InvalidInput(format!(
            "resident {resident_id} already occupies {}",
            bed.id()
        )));
    }
    Ok(resident)
}

fn required_text(field: &str, value: &str) -> CareResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CareError::InvalidInput(format!("{field} must not be empty")));
    }
    Ok(value.to_string())
}

fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

fn finish<T>(
    operation: Operation,
    actor: Option<&Actor>,
    started_at: Instant,
    result: CareResult<T>,
) -> CareResult<T> {
    let actor_id = actor.map_or_else(|| "-".to_string(), |actor| actor.staff_id.to_string());
    let duration_ms = started_at.elapsed().as_millis();
    match &result {
        Ok(_) => info!(
            "event={} module=service status=ok actor_id={actor_id} duration_ms={duration_ms}",
            operation.as_str()
        ),
        Err(err @ CareError::Authorization(_)) => warn!(
            "event={} module=service status=denied actor_id={actor_id} error_code={} duration_ms={duration_ms}",
            operation.as_str(),
            err.code()
        ),
        Err(err @ CareError::Storage(_)) => error!(
            "event={} module=service status=error actor_id={actor_id} error_code={} error={err}",
            operation.as_str(),
            err.code()
        ),
        Err(err) => warn!(
            "event={} module=service status=error actor_id={actor_id} error_code={} duration_ms={duration_ms}",
            operation.as_str(),
            err.code()
        ),
    }
    result
}

/// Fresh facility: vacant topology plus optional default accounts.
///
/// Each default account is rostered on a shift centred on `now` so a new
/// facility is immediately operable.
fn bootstrap_state(config: &FacilityConfig, now: NaiveDateTime) -> Result<FacilityState, ConfigError> {
    let mut state = FacilityState::new(Roster::new(), config.build_topology());
    if !config.seed_default_accounts {
        return Ok(state);
    }

    for (role, username) in DEFAULT_ACCOUNTS {
        let mut staff = Staff::new(role, username, &config.default_password);
        let hours = config
            .limits
            .daily_cap(role)
            .map_or(SEED_SHIFT_MAX_HOURS, |cap| cap.min(SEED_SHIFT_MAX_HOURS));
        let shift = shift_around(now, hours)
            .map_err(|err| ConfigError::Invalid(format!("default shift rejected: {err}")))?;
        propose_shift(&mut staff, shift, &config.limits)
            .map_err(|err| ConfigError::Invalid(format!("default shift rejected: {err}")))?;
        state
            .roster
            .insert(staff)
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;
    }
    Ok(state)
}

/// Shift of `hours` centred on `now`, clamped to the same day.
fn shift_around(now: NaiveDateTime, hours: i64) -> Result<Shift, ShiftRangeError> {
    let half = Duration::minutes(hours * 30);
    let time = now.time();

    let (start, wrapped) = time.overflowing_sub_signed(half);
    let start = if wrapped != 0 { NaiveTime::MIN } else { start };
    let (end, wrapped) = time.overflowing_add_signed(half);
    let end = if wrapped != 0 { *LAST_SECOND_OF_DAY } else { end };
    Shift::new(now.weekday(), start, end)
}
