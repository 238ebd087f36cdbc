mod common;

use carehome_core::repo::archive_repo::InMemoryResidentArchive;
use carehome_core::repo::audit_repo::InMemoryAuditSink;
use carehome_core::repo::snapshot_repo::InMemorySnapshotStore;
use carehome_core::{
    Actor, CareError, CareHomeService, CareStores, ComplianceViolation, FacilityConfig,
    FixedClock, Role, RosterLimits, StaffId,
};
use chrono::Weekday;
use common::{monday, time, Facility};
use std::sync::Arc;

fn add_staff(facility: &Facility, role: Role, username: &str) -> StaffId {
    facility
        .service
        .add_staff(&facility.manager(), role, username, "secret")
        .expect("add staff")
        .id()
}

fn shifts_of(facility: &Facility, staff_id: StaffId) -> Vec<carehome_core::Shift> {
    facility
        .service
        .staff()
        .into_iter()
        .find(|staff| staff.id() == staff_id)
        .map(|staff| staff.shifts().to_vec())
        .expect("staff exists")
}

#[test]
fn nurse_daily_cap_is_enforced_when_shifts_are_added() {
    let facility = Facility::new();
    let manager = facility.manager();
    let nina = add_staff(&facility, Role::Nurse, "nina");

    let err = facility
        .service
        .set_shift(&manager, nina, Weekday::Mon, time(8, 0), time(17, 0))
        .expect_err("nine hours exceed the nurse cap");
    assert!(matches!(err, CareError::ShiftViolation(ref v) if v.proposed_minutes == 540 && v.cap == 8));
    assert!(shifts_of(&facility, nina).is_empty());

    facility
        .service
        .set_shift(&manager, nina, Weekday::Mon, time(6, 0), time(10, 0))
        .expect("four hours fit");
    let err = facility
        .service
        .set_shift(&manager, nina, Weekday::Mon, time(12, 0), time(17, 0))
        .expect_err("four plus five exceed the cap");
    assert!(matches!(
        err,
        CareError::ShiftViolation(ref v) if v.scheduled_minutes == 240 && v.proposed_minutes == 300
    ));

    let shifts = shifts_of(&facility, nina);
    assert_eq!(shifts.len(), 1);
    assert_eq!(shifts[0].hours(), 4);

    facility
        .service
        .set_shift(&manager, nina, Weekday::Tue, time(8, 0), time(16, 0))
        .expect("other days have their own budget");
}

#[test]
fn short_shifts_cannot_slip_past_the_doctor_cap() {
    let facility = Facility::new();
    let manager = facility.manager();
    let dana = add_staff(&facility, Role::Doctor, "dana");

    let accepted = (8..18)
        .filter(|hour| {
            facility
                .service
                .set_shift(&manager, dana, Weekday::Tue, time(*hour, 0), time(*hour, 59))
                .is_ok()
        })
        .count();
    assert_eq!(accepted, 1);
    assert_eq!(shifts_of(&facility, dana).len(), 1);

    let nina = add_staff(&facility, Role::Nurse, "nina");
    facility
        .service
        .set_shift(&manager, nina, Weekday::Tue, time(6, 0), time(13, 59))
        .expect("7h59m fits the nurse cap");
    let err = facility
        .service
        .set_shift(&manager, nina, Weekday::Tue, time(14, 0), time(14, 2))
        .expect_err("two more minutes exceed eight hours");
    assert!(matches!(
        err,
        CareError::ShiftViolation(ref v) if v.scheduled_minutes == 479 && v.proposed_minutes == 2
    ));
}

#[test]
fn doctor_daily_cap_is_one_hour() {
    let facility = Facility::new();
    let manager = facility.manager();
    let dana = add_staff(&facility, Role::Doctor, "dana");

    facility
        .service
        .set_shift(&manager, dana, Weekday::Wed, time(9, 0), time(10, 0))
        .expect("one hour fits");
    let err = facility
        .service
        .set_shift(&manager, dana, Weekday::Wed, time(14, 0), time(15, 0))
        .expect_err("second hour exceeds doctor cap");
    assert!(matches!(err, CareError::ShiftViolation(ref v) if v.cap == 1));
}

#[test]
fn shift_commands_validate_input_and_role() {
    let facility = Facility::new();
    let manager = facility.manager();
    let nina = add_staff(&facility, Role::Nurse, "nina");

    let err = facility
        .service
        .set_shift(&manager, nina, Weekday::Mon, time(10, 0), time(9, 0))
        .expect_err("end before start");
    assert!(matches!(err, CareError::InvalidInput(_)));

    let err = facility
        .service
        .set_shift(&manager, uuid::Uuid::new_v4(), Weekday::Mon, time(9, 0), time(10, 0))
        .expect_err("unknown staff");
    assert!(matches!(err, CareError::NotFound(_)));

    let err = facility
        .service
        .set_shift(&facility.nurse(), nina, Weekday::Mon, time(9, 0), time(10, 0))
        .expect_err("only managers assign shifts");
    assert!(matches!(err, CareError::Authorization(_)));
}

#[test]
fn compliance_sweep_reports_missing_doctor_coverage() {
    let facility = Facility::new();
    let err = facility
        .service
        .check_compliance()
        .expect_err("seeded doctor only works on monday");
    assert!(matches!(
        err,
        CareError::Compliance(ComplianceViolation::MissingDoctorCoverage {
            day: Weekday::Tue,
            ..
        })
    ));

    let manager = facility.manager();
    let dana = add_staff(&facility, Role::Doctor, "dana");
    for day in [
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ] {
        facility
            .service
            .set_shift(&manager, dana, day, time(9, 0), time(10, 0))
            .expect("doctor hour fits");
    }
    facility
        .service
        .check_compliance()
        .expect("every day has doctor coverage");
}

#[test]
fn compliance_sweep_catches_over_cap_rosters_restored_from_snapshot() {
    let snapshots = Arc::new(InMemorySnapshotStore::new());
    let stores = || CareStores {
        audit: Arc::new(InMemoryAuditSink::new()),
        archive: Arc::new(InMemoryResidentArchive::new()),
        snapshots: snapshots.clone(),
    };
    let clock = Arc::new(FixedClock::new(monday(10, 0)));

    let lenient = CareHomeService::new(
        FacilityConfig {
            limits: RosterLimits {
                nurse_daily_hours: 12,
                ..RosterLimits::default()
            },
            ..FacilityConfig::default()
        },
        clock.clone(),
        stores(),
    )
    .expect("lenient facility");
    let lenient_manager = Actor::from(&lenient.find_staff("manager").expect("manager"));
    let long_shift_nurse = lenient
        .add_staff(&lenient_manager, Role::Nurse, "nina", "secret")
        .expect("add nurse");
    lenient
        .set_shift(
            &lenient_manager,
            long_shift_nurse.id(),
            Weekday::Thu,
            time(7, 0),
            time(17, 0),
        )
        .expect("ten hours pass the lenient cap");
    lenient.save_snapshot(&lenient_manager).expect("save");

    let strict = CareHomeService::new(FacilityConfig::default(), clock, stores())
        .expect("strict facility");
    let strict_manager = Actor::from(&strict.find_staff("manager").expect("manager"));
    strict
        .load_snapshot(&strict_manager)
        .expect("non-compliant rosters still load");

    let err = strict.check_compliance().expect_err("restored roster is over cap");
    assert!(matches!(
        err,
        CareError::Compliance(ComplianceViolation::DailyCapExceeded {
            ref username,
            minutes: 600,
            cap: 8,
            ..
        }) if username == "nina"
    ));
}
