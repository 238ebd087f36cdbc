//! Full facility state: the unit of snapshot save/load.
//!
//! # Invariants
//! - Every resident referenced by a bed exists in `residents`.
//! - Staff ids and usernames are unique, as `Roster::insert` enforces.
//! - Residents keep insertion order; discharged residents are removed.

use crate::model::resident::{Resident, ResidentId};
use crate::model::roster::Roster;
use crate::model::topology::Topology;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityState {
    pub roster: Roster,
    pub topology: Topology,
    pub residents: Vec<Resident>,
}

impl FacilityState {
    pub fn new(roster: Roster, topology: Topology) -> Self {
        Self {
            roster,
            topology,
            residents: Vec::new(),
        }
    }

    pub fn resident(&self, id: ResidentId) -> Option<&Resident> {
        self.residents.iter().find(|resident| resident.id == id)
    }

    pub fn resident_mut(&mut self, id: ResidentId) -> Option<&mut Resident> {
        self.residents.iter_mut().find(|resident| resident.id == id)
    }

    /// Removes a resident from the active set.
    pub fn remove_resident(&mut self, id: ResidentId) -> Option<Resident> {
        let index = self
            .residents
            .iter()
            .position(|resident| resident.id == id)?;
        Some(self.residents.remove(index))
    }

    /// Describes the first structural inconsistency, if any.
    ///
    /// Used to reject snapshots that could not have been produced by the
    /// command path.
    pub fn inconsistency(&self) -> Option<String> {
        if let Some(duplicate) = self.roster.first_duplicate() {
            return Some(format!("roster is not unique: {duplicate}"));
        }
        if !self.topology.is_consistent() {
            return Some("bed layout or single-occupancy invariant violated".to_string());
        }
        for bed in self.topology.beds() {
            if let Some(resident_id) = bed.resident() {
                if self.resident(resident_id).is_none() {
                    return Some(format!(
                        "bed {} references unknown resident {resident_id}",
                        bed.id()
                    ));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::FacilityState;
    use crate::model::resident::{Gender, Resident};
    use crate::model::roster::Roster;
    use crate::model::staff::{Role, Staff};
    use crate::model::topology::Topology;
    use crate::model::ward::Ward;
    use uuid::Uuid;

    #[test]
    fn detects_bed_pointing_at_unknown_resident() {
        let mut topology = Topology::new(vec![Ward::new("Ward 1", "W1", None, &[1])]);
        topology
            .assign("W1-B1", Uuid::new_v4())
            .expect("vacant bed");
        let state = FacilityState::new(Roster::new(), topology);

        let message = state.inconsistency().expect("dangling reference");
        assert!(message.contains("W1-B1"));
    }

    #[test]
    fn detects_duplicate_usernames_in_restored_roster() {
        let mut roster = Roster::new();
        roster
            .insert(Staff::new(Role::Nurse, "nina", "pw"))
            .expect("first insert");
        let mut value = serde_json::to_value(&roster).expect("serialize roster");
        let staff = value["staff"].as_array_mut().expect("staff array");
        let mut copy = staff[0].clone();
        copy["id"] = serde_json::json!(Uuid::new_v4());
        staff.push(copy);
        let restored: Roster = serde_json::from_value(value).expect("deserialize roster");

        let state = FacilityState::new(restored, Topology::default());
        let message = state.inconsistency().expect("duplicate username");
        assert!(message.contains("nina"));
    }

    #[test]
    fn remove_resident_keeps_remaining_order() {
        let mut state = FacilityState::default();
        let first = Resident::new("A", Gender::Female, false);
        let second = Resident::new("B", Gender::Male, false);
        let third = Resident::new("C", Gender::Male, true);
        state.residents = vec![first.clone(), second.clone(), third.clone()];

        let removed = state.remove_resident(second.id).expect("known resident");
        assert_eq!(removed.id, second.id);
        let remaining: Vec<_> = state.residents.iter().map(|r| r.id).collect();
        assert_eq!(remaining, vec![first.id, third.id]);
        assert!(state.remove_resident(second.id).is_none());
        assert!(state.inconsistency().is_none());
    }
}
