//! Allocation and roster rule engines.
//!
//! # Responsibility
//! - Decide bed placements and shift admissions as pure functions over model
//!   state.
//! - Leave locking, authorization and auditing to the service layer.

pub mod allocation;
pub mod shift_validator;
