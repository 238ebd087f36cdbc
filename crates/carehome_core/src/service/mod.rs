//! Use-case services over the facility state.

pub mod care_service;
pub mod clock;
pub mod error;
