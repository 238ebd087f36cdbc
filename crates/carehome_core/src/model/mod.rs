//! Facility domain model.
//!
//! # Responsibility
//! - Define canonical records for staff, residents, wards and audit entries.
//! - Hold the roster store and bed topology that commands mutate.
//!
//! # Invariants
//! - Bed occupancy is the single source of truth for resident location.
//! - Staff role is a tag on one `Staff` record, never a subtype.

pub mod audit;
pub mod resident;
pub mod roster;
pub mod staff;
pub mod state;
pub mod topology;
pub mod ward;
