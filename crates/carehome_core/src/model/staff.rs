//! Staff domain model.
//!
//! # Responsibility
//! - Define the single staff record shared by managers, doctors and nurses.
//! - Define immutable roster shifts with duration and inclusion rules.
//!
//! # Invariants
//! - `role` is a data tag; role-specific permissions live in `access::gate`.
//! - A shift never ends before it starts.
//! - `Shift::includes` is inclusive at both ends.
//! - Passwords are only ever held as salted SHA-256 digests.

use chrono::{Datelike, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for one staff member.
pub type StaffId = Uuid;

/// Week order used by every per-day scan, starting Monday.
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Staff role tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Manager,
    Doctor,
    Nurse,
}

impl Role {
    /// Stable string id used in audit details and log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Doctor => "doctor",
            Self::Nurse => "nurse",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shift construction errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftRangeError {
    EndBeforeStart { start: NaiveTime, end: NaiveTime },
}

impl Display for ShiftRangeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EndBeforeStart { start, end } => {
                write!(f, "shift end {end} is earlier than start {start}")
            }
        }
    }
}

impl Error for ShiftRangeError {}

/// One rostered work period on a weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    day: Weekday,
    start: NaiveTime,
    end: NaiveTime,
}

impl Shift {
    /// Creates a shift, rejecting ranges that end before they start.
    pub fn new(day: Weekday, start: NaiveTime, end: NaiveTime) -> Result<Self, ShiftRangeError> {
        if end < start {
            return Err(ShiftRangeError::EndBeforeStart { start, end });
        }
        Ok(Self { day, start, end })
    }

    pub fn day(&self) -> Weekday {
        self.day
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Elapsed duration truncated to whole hours; display only.
    pub fn hours(&self) -> i64 {
        (self.end - self.start).num_hours()
    }

    /// Elapsed duration in whole minutes; caps are checked against this.
    pub fn minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Returns whether `time` falls inside `[start, end]`.
    pub fn includes(&self, time: NaiveTime) -> bool {
        self.start <= time && time <= self.end
    }
}

impl Display for Shift {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}-{}",
            self.day,
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

/// Single staff record; role differences are data, not subtypes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    id: StaffId,
    username: String,
    password_digest: String,
    role: Role,
    shifts: Vec<Shift>,
}

impl Staff {
    /// Creates a staff member with a generated id and an empty roster.
    ///
    /// `username` is stored as given; callers normalize it first.
    pub fn new(role: Role, username: impl Into<String>, password: &str) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            username: username.into(),
            password_digest: password_digest(id, password),
            role,
            shifts: Vec::new(),
        }
    }

    pub fn id(&self) -> StaffId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Shifts in insertion order.
    pub fn shifts(&self) -> &[Shift] {
        &self.shifts
    }

    /// Returns whether `password` matches the stored digest.
    pub fn password_matches(&self, password: &str) -> bool {
        self.password_digest == password_digest(self.id, password)
    }

    pub fn set_password(&mut self, password: &str) {
        self.password_digest = password_digest(self.id, password);
    }

    /// Total scheduled whole hours on `day`.
    pub fn hours_on(&self, day: Weekday) -> i64 {
        self.shifts
            .iter()
            .filter(|shift| shift.day() == day)
            .map(Shift::hours)
            .sum()
    }

    /// Total scheduled minutes on `day`.
    pub fn minutes_on(&self, day: Weekday) -> i64 {
        self.shifts
            .iter()
            .filter(|shift| shift.day() == day)
            .map(Shift::minutes)
            .sum()
    }

    /// Returns whether some shift on `at`'s weekday includes its time-of-day.
    pub fn is_on_duty(&self, at: NaiveDateTime) -> bool {
        let day = at.weekday();
        let time = at.time();
        self.shifts
            .iter()
            .any(|shift| shift.day() == day && shift.includes(time))
    }

    /// Appends a shift without cap checks.
    ///
    /// Only `engine::shift_validator` calls this after admitting the shift.
    pub(crate) fn push_shift(&mut self, shift: Shift) {
        self.shifts.push(shift);
    }
}

fn password_digest(id: StaffId, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(id.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
