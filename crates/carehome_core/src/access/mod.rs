//! Access control for facility commands.

pub mod gate;
