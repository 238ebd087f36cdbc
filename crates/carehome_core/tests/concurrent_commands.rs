mod common;

use carehome_core::{CareError, Gender};
use common::Facility;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

#[test]
fn parallel_admissions_never_share_a_bed() {
    let facility = Arc::new(Facility::new());
    let manager = facility.manager();

    let handles: Vec<_> = (0..8)
        .map(|station| {
            let facility = Arc::clone(&facility);
            thread::spawn(move || {
                let mut placed = 0usize;
                for index in 0..12 {
                    let gender = if (station + index) % 2 == 0 {
                        Gender::Male
                    } else {
                        Gender::Female
                    };
                    match facility.service.admit_resident(
                        &manager,
                        &format!("S{station}-{index}"),
                        gender,
                        index % 5 == 0,
                        true,
                    ) {
                        Ok(_) => placed += 1,
                        Err(CareError::Allocation(_)) => {}
                        Err(other) => panic!("unexpected error: {other}"),
                    }
                }
                placed
            })
        })
        .collect();

    let placed: usize = handles
        .into_iter()
        .map(|handle| handle.join().expect("station thread"))
        .sum();

    let state = facility.service.snapshot_state();
    assert!(state.inconsistency().is_none());
    assert_eq!(state.topology.occupied_beds(), placed);
    assert_eq!(state.residents.len(), placed);

    let mut seen = HashSet::new();
    for bed in state.topology.beds() {
        if let Some(resident_id) = bed.resident() {
            assert!(seen.insert(resident_id));
        }
    }
}

#[test]
fn parallel_moves_into_one_bed_admit_exactly_one() {
    let facility = Arc::new(Facility::new());
    let nurse = facility.nurse();
    let sources: Vec<String> = (0..6)
        .map(|index| facility.admit(&format!("R{index}"), Gender::Male).1)
        .collect();

    let handles: Vec<_> = sources
        .into_iter()
        .map(|from| {
            let facility = Arc::clone(&facility);
            thread::spawn(move || facility.service.move_resident(&nurse, &from, "W2-B1"))
        })
        .collect();

    let outcomes: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("mover thread"))
        .collect();
    let moved = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    assert_eq!(moved, 1);
    assert!(outcomes
        .iter()
        .filter_map(|outcome| outcome.as_ref().err())
        .all(|err| matches!(err, CareError::BedOccupied(_))));
    assert_eq!(facility.service.occupancy().occupied_beds, 6);
}
