//! Shift admission rules and roster compliance sweep.
//!
//! # Responsibility
//! - Admit or reject one proposed shift against per-role daily caps.
//! - Re-check a whole roster after data arrives outside the command path.
//!
//! # Invariants
//! - A rejected shift leaves the staff roster untouched.
//! - Caps are compared against scheduled minutes, so partial hours count.
//! - The sweep visits staff in insertion order and days Monday first, and
//!   reports only the first violation.

use crate::model::staff::{Role, Shift, Staff, StaffId, WEEK};
use chrono::{NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const DEFAULT_NURSE_DAILY_HOURS: i64 = 8;
const DEFAULT_DOCTOR_DAILY_HOURS: i64 = 1;
const DEFAULT_DOCTOR_COVERAGE_HOURS: i64 = 1;
const MINUTES_PER_HOUR: i64 = 60;

/// Regulatory hour limits applied per staff member per weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterLimits {
    pub nurse_daily_hours: i64,
    pub doctor_daily_hours: i64,
    /// Minimum hours at least one doctor must be rostered on every weekday.
    pub doctor_coverage_hours: i64,
}

impl Default for RosterLimits {
    fn default() -> Self {
        Self {
            nurse_daily_hours: DEFAULT_NURSE_DAILY_HOURS,
            doctor_daily_hours: DEFAULT_DOCTOR_DAILY_HOURS,
            doctor_coverage_hours: DEFAULT_DOCTOR_COVERAGE_HOURS,
        }
    }
}

impl RosterLimits {
    /// Daily cap for `role`; managers are uncapped.
    pub fn daily_cap(&self, role: Role) -> Option<i64> {
        match role {
            Role::Manager => None,
            Role::Doctor => Some(self.doctor_daily_hours),
            Role::Nurse => Some(self.nurse_daily_hours),
        }
    }
}

/// A proposed shift would push a staff member over their daily cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftViolation {
    pub staff_id: StaffId,
    pub role: Role,
    pub day: Weekday,
    pub scheduled_minutes: i64,
    pub proposed_minutes: i64,
    /// Daily cap in hours.
    pub cap: i64,
}

impl Display for ShiftViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} would be scheduled {} on {} (cap {}h)",
            self.role,
            self.staff_id,
            format_minutes(self.scheduled_minutes + self.proposed_minutes),
            self.day,
            self.cap
        )
    }
}

impl Error for ShiftViolation {}

/// First roster-wide rule violation found by the sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComplianceViolation {
    DailyCapExceeded {
        staff_id: StaffId,
        username: String,
        role: Role,
        day: Weekday,
        minutes: i64,
        cap: i64,
    },
    MissingDoctorCoverage {
        day: Weekday,
        required_hours: i64,
    },
}

impl Display for ComplianceViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DailyCapExceeded {
                username,
                role,
                day,
                minutes,
                cap,
                ..
            } => write!(
                f,
                "{role} {username} is scheduled {} on {day}, exceeding {cap}h",
                format_minutes(*minutes)
            ),
            Self::MissingDoctorCoverage {
                day,
                required_hours,
            } => write!(
                f,
                "no doctor is rostered for at least {required_hours}h on {day}"
            ),
        }
    }
}

impl Error for ComplianceViolation {}

/// Admits `shift` into `staff`'s roster if the daily cap still holds.
///
/// # Contract
/// - Sums existing minutes on `shift.day()` plus the proposed shift and
///   rejects totals above the cap in minutes.
/// - Insertion happens only on acceptance.
pub fn propose_shift(
    staff: &mut Staff,
    shift: Shift,
    limits: &RosterLimits,
) -> Result<(), ShiftViolation> {
    if let Some(cap) = limits.daily_cap(staff.role()) {
        let scheduled_minutes = staff.minutes_on(shift.day());
        let proposed_minutes = shift.minutes();
        if scheduled_minutes + proposed_minutes > cap * MINUTES_PER_HOUR {
            return Err(ShiftViolation {
                staff_id: staff.id(),
                role: staff.role(),
                day: shift.day(),
                scheduled_minutes,
                proposed_minutes,
                cap,
            });
        }
    }
    staff.push_shift(shift);
    Ok(())
}

/// Returns whether `staff` is rostered at `at` (inclusive shift bounds).
pub fn is_on_duty(staff: &Staff, at: NaiveDateTime) -> bool {
    staff.is_on_duty(at)
}

/// Re-checks every staff member's per-day totals and daily doctor coverage.
pub fn sweep_compliance<'a, I>(staff: I, limits: &RosterLimits) -> Result<(), ComplianceViolation>
where
    I: IntoIterator<Item = &'a Staff>,
{
    let staff: Vec<&Staff> = staff.into_iter().collect();

    for member in &staff {
        let Some(cap) = limits.daily_cap(member.role()) else {
            continue;
        };
        for day in WEEK {
            let minutes = member.minutes_on(day);
            if minutes > cap * MINUTES_PER_HOUR {
                return Err(ComplianceViolation::DailyCapExceeded {
                    staff_id: member.id(),
                    username: member.username().to_string(),
                    role: member.role(),
                    day,
                    minutes,
                    cap,
                });
            }
        }
    }

    for day in WEEK {
        let covered = staff.iter().any(|member| {
            member.role() == Role::Doctor
                && member.minutes_on(day) >= limits.doctor_coverage_hours * MINUTES_PER_HOUR
        });
        if !covered {
            return Err(ComplianceViolation::MissingDoctorCoverage {
                day,
                required_hours: limits.doctor_coverage_hours,
            });
        }
    }

    Ok(())
}

fn format_minutes(minutes: i64) -> String {
    format!(
        "{}h{:02}m",
        minutes / MINUTES_PER_HOUR,
        minutes % MINUTES_PER_HOUR
    )
}
