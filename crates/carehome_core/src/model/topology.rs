//! Ward/bed topology: the facility's fixed beds and their occupancy.
//!
//! # Responsibility
//! - Enumerate wards and rooms in stable order for allocation scans.
//! - Perform occupancy writes as check-and-set operations.
//!
//! # Invariants
//! - A bed holds at most one resident; a resident occupies at most one bed.
//! - `assign` fails instead of overwriting an occupied bed.
//! - `release` is idempotent on a vacant bed.

use crate::model::resident::ResidentId;
use crate::model::ward::{Bed, BedId, Room, Ward};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    UnknownBed(BedId),
    Occupied(BedId),
    AlreadyPlaced {
        resident_id: ResidentId,
        bed_id: BedId,
    },
}

impl Display for TopologyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownBed(bed_id) => write!(f, "bed not found: {bed_id}"),
            Self::Occupied(bed_id) => write!(f, "bed occupied: {bed_id}"),
            Self::AlreadyPlaced {
                resident_id,
                bed_id,
            } => write!(f, "resident {resident_id} already occupies {bed_id}"),
        }
    }
}

impl Error for TopologyError {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    wards: Vec<Ward>,
}

impl Topology {
    pub fn new(wards: Vec<Ward>) -> Self {
        Self { wards }
    }

    pub fn wards(&self) -> &[Ward] {
        &self.wards
    }

    /// Every room of every ward, wards first, then layout order.
    pub fn rooms(&self) -> impl Iterator<Item = Room<'_>> {
        self.wards.iter().flat_map(|ward| ward.rooms())
    }

    pub fn beds(&self) -> impl Iterator<Item = &Bed> {
        self.wards.iter().flat_map(|ward| ward.beds().iter())
    }

    pub fn bed(&self, bed_id: &str) -> Option<&Bed> {
        self.beds().find(|bed| bed.id() == bed_id)
    }

    /// Bed currently holding `resident_id`, if any.
    pub fn bed_of(&self, resident_id: ResidentId) -> Option<&Bed> {
        self.beds().find(|bed| bed.resident() == Some(resident_id))
    }

    pub fn total_beds(&self) -> usize {
        self.beds().count()
    }

    pub fn occupied_beds(&self) -> usize {
        self.beds().filter(|bed| !bed.is_vacant()).count()
    }

    /// Places `resident_id` into `bed_id` only if the bed is still vacant.
    pub fn assign(&mut self, bed_id: &str, resident_id: ResidentId) -> Result<(), TopologyError> {
        if let Some(current) = self.bed_of(resident_id) {
            return Err(TopologyError::AlreadyPlaced {
                resident_id,
                bed_id: current.id().to_string(),
            });
        }
        let bed = self.bed_mut(bed_id)?;
        if !bed.is_vacant() {
            return Err(TopologyError::Occupied(bed_id.to_string()));
        }
        bed.set_resident(Some(resident_id));
        Ok(())
    }

    /// Clears `bed_id` and returns the resident that was there.
    pub fn release(&mut self, bed_id: &str) -> Result<Option<ResidentId>, TopologyError> {
        let bed = self.bed_mut(bed_id)?;
        let previous = bed.resident();
        bed.set_resident(None);
        Ok(previous)
    }

    /// Vacates whichever bed holds `resident_id`.
    pub fn vacate_resident(&mut self, resident_id: ResidentId) -> Option<BedId> {
        let bed = self
            .wards
            .iter_mut()
            .flat_map(|ward| ward.beds_mut().iter_mut())
            .find(|bed| bed.resident() == Some(resident_id))?;
        bed.set_resident(None);
        Some(bed.id().to_string())
    }

    /// Checks layout and single-occupancy invariants, e.g. after a restore.
    pub fn is_consistent(&self) -> bool {
        if !self.wards.iter().all(Ward::is_consistent) {
            return false;
        }
        let mut bed_ids = HashSet::new();
        let mut residents = HashSet::new();
        for bed in self.beds() {
            if !bed_ids.insert(bed.id()) {
                return false;
            }
            if let Some(resident_id) = bed.resident() {
                if !residents.insert(resident_id) {
                    return false;
                }
            }
        }
        true
    }

    fn bed_mut(&mut self, bed_id: &str) -> Result<&mut Bed, TopologyError> {
        self.wards
            .iter_mut()
            .flat_map(|ward| ward.beds_mut().iter_mut())
            .find(|bed| bed.id() == bed_id)
            .ok_or_else(|| TopologyError::UnknownBed(bed_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{Topology, TopologyError};
    use crate::model::ward::Ward;
    use uuid::Uuid;

    fn topology() -> Topology {
        Topology::new(vec![Ward::new("Ward 1", "W1", None, &[1, 2])])
    }

    #[test]
    fn assign_is_check_and_set() {
        let mut topology = topology();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        topology.assign("W1-B2", first).expect("vacant bed");
        let err = topology
            .assign("W1-B2", second)
            .expect_err("occupied bed must not be overwritten");
        assert_eq!(err, TopologyError::Occupied("W1-B2".to_string()));
        assert_eq!(
            topology.bed("W1-B2").and_then(|bed| bed.resident()),
            Some(first)
        );
    }

    #[test]
    fn resident_cannot_hold_two_beds() {
        let mut topology = topology();
        let resident = Uuid::new_v4();
        topology.assign("W1-B1", resident).expect("vacant bed");
        let err = topology
            .assign("W1-B3", resident)
            .expect_err("second placement must fail");
        assert!(matches!(err, TopologyError::AlreadyPlaced { .. }));
    }

    #[test]
    fn release_is_idempotent() {
        let mut topology = topology();
        let resident = Uuid::new_v4();
        topology.assign("W1-B1", resident).expect("vacant bed");

        assert_eq!(topology.release("W1-B1"), Ok(Some(resident)));
        assert_eq!(topology.release("W1-B1"), Ok(None));
        assert_eq!(
            topology.release("W9-B1"),
            Err(TopologyError::UnknownBed("W9-B1".to_string()))
        );
    }

    #[test]
    fn vacate_resident_returns_freed_bed() {
        let mut topology = topology();
        let resident = Uuid::new_v4();
        topology.assign("W1-B3", resident).expect("vacant bed");

        assert_eq!(topology.vacate_resident(resident), Some("W1-B3".to_string()));
        assert_eq!(topology.occupied_beds(), 0);
        assert_eq!(topology.vacate_resident(resident), None);
    }
}
