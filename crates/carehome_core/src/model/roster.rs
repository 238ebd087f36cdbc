//! Roster store: staff records and their shifts.
//!
//! # Responsibility
//! - Keep staff in stable insertion order.
//! - Answer on-duty and per-day hour queries.
//!
//! # Invariants
//! - Staff ids and usernames are unique within one roster.
//! - Staff are never removed.

use crate::model::staff::{Staff, StaffId};
use chrono::{NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    DuplicateUsername(String),
    DuplicateId(StaffId),
}

impl Display for RosterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateUsername(username) => write!(f, "username already taken: {username}"),
            Self::DuplicateId(id) => write!(f, "staff id already registered: {id}"),
        }
    }
}

impl Error for RosterError {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    staff: Vec<Staff>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.staff.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staff.is_empty()
    }

    /// Staff in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Staff> {
        self.staff.iter()
    }

    pub fn get(&self, id: StaffId) -> Option<&Staff> {
        self.staff.iter().find(|staff| staff.id() == id)
    }

    pub fn get_mut(&mut self, id: StaffId) -> Option<&mut Staff> {
        self.staff.iter_mut().find(|staff| staff.id() == id)
    }

    pub fn find_by_username(&self, username: &str) -> Option<&Staff> {
        self.staff.iter().find(|staff| staff.username() == username)
    }

    pub fn insert(&mut self, staff: Staff) -> Result<(), RosterError> {
        if self.get(staff.id()).is_some() {
            return Err(RosterError::DuplicateId(staff.id()));
        }
        if self.find_by_username(staff.username()).is_some() {
            return Err(RosterError::DuplicateUsername(staff.username().to_string()));
        }
        self.staff.push(staff);
        Ok(())
    }

    /// First id or username repeated in insertion order, if any.
    ///
    /// `insert` keeps rosters unique; this re-checks deserialized ones.
    pub fn first_duplicate(&self) -> Option<RosterError> {
        let mut ids = HashSet::new();
        let mut usernames = HashSet::new();
        for staff in &self.staff {
            if !ids.insert(staff.id()) {
                return Some(RosterError::DuplicateId(staff.id()));
            }
            if !usernames.insert(staff.username()) {
                return Some(RosterError::DuplicateUsername(staff.username().to_string()));
            }
        }
        None
    }

    /// Total scheduled hours for one staff member on `day`.
    ///
    /// Returns `None` when the staff id is unknown.
    pub fn hours_on(&self, id: StaffId, day: Weekday) -> Option<i64> {
        self.get(id).map(|staff| staff.hours_on(day))
    }

    /// Unknown staff are never on duty.
    pub fn is_on_duty(&self, id: StaffId, at: NaiveDateTime) -> bool {
        self.get(id).is_some_and(|staff| staff.is_on_duty(at))
    }
}

#[cfg(test)]
mod tests {
    use super::{Roster, RosterError};
    use crate::model::staff::{Role, Staff};
    use chrono::Weekday;

    #[test]
    fn rejects_duplicate_usernames() {
        let mut roster = Roster::new();
        roster
            .insert(Staff::new(Role::Nurse, "nina", "pw"))
            .expect("first insert");
        let err = roster
            .insert(Staff::new(Role::Doctor, "nina", "pw"))
            .expect_err("duplicate username must fail");
        assert_eq!(err, RosterError::DuplicateUsername("nina".to_string()));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn keeps_insertion_order_and_answers_unknown_ids() {
        let mut roster = Roster::new();
        let first = Staff::new(Role::Manager, "alice", "pw");
        let second = Staff::new(Role::Nurse, "bob", "pw");
        let unknown = Staff::new(Role::Nurse, "ghost", "pw");
        roster.insert(first.clone()).expect("insert first");
        roster.insert(second.clone()).expect("insert second");

        let usernames: Vec<&str> = roster.iter().map(Staff::username).collect();
        assert_eq!(usernames, vec!["alice", "bob"]);
        assert_eq!(roster.hours_on(second.id(), Weekday::Mon), Some(0));
        assert_eq!(roster.hours_on(unknown.id(), Weekday::Mon), None);
    }

    #[test]
    fn first_duplicate_reports_repeated_entries() {
        let nina = Staff::new(Role::Nurse, "nina", "pw");
        let other_nina = Staff::new(Role::Doctor, "nina", "pw");

        let mut roster = Roster::new();
        roster.insert(nina.clone()).expect("first insert");
        assert_eq!(roster.first_duplicate(), None);

        let repeated_id = Roster {
            staff: vec![nina.clone(), nina.clone()],
        };
        assert_eq!(
            repeated_id.first_duplicate(),
            Some(RosterError::DuplicateId(nina.id()))
        );

        let repeated_username = Roster {
            staff: vec![nina, other_nina],
        };
        assert_eq!(
            repeated_username.first_duplicate(),
            Some(RosterError::DuplicateUsername("nina".to_string()))
        );
    }
}
