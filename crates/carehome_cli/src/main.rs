//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `carehome_core` linkage without any front end.
//! - Bootstrap an in-memory default facility and print ward occupancy.

use carehome_core::{CareHomeService, CareStores, FacilityConfig, SystemClock};
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    println!("carehome_core ping={}", carehome_core::ping());
    println!("carehome_core version={}", carehome_core::core_version());

    let service = match CareHomeService::new(
        FacilityConfig::default(),
        Arc::new(SystemClock),
        CareStores::in_memory(),
    ) {
        Ok(service) => service,
        Err(err) => {
            eprintln!("bootstrap failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    for ward in service.wards() {
        let occupied = ward.beds().iter().filter(|bed| !bed.is_vacant()).count();
        println!(
            "ward={} beds={} occupied={}",
            ward.id(),
            ward.beds().len(),
            occupied
        );
    }
    let occupancy = service.occupancy();
    println!(
        "facility beds={} vacant={} staff={}",
        occupancy.total_beds,
        occupancy.vacant_beds(),
        service.staff().len()
    );
    ExitCode::SUCCESS
}
