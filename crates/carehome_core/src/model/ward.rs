//! Ward, room and bed layout model.
//!
//! # Responsibility
//! - Hold the fixed bed sequence of each ward.
//! - Derive rooms as contiguous index ranges over that sequence.
//!
//! # Invariants
//! - Rooms are never stored; they are recomputed from `layout`.
//! - `beds.len()` equals the sum of `layout`.
//! - A bed references at most one resident.

use crate::model::resident::{Gender, ResidentId};
use serde::{Deserialize, Serialize};

/// Stable bed identifier, e.g. `W1-B7`.
pub type BedId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bed {
    id: BedId,
    resident: Option<ResidentId>,
}

impl Bed {
    pub fn new(id: impl Into<BedId>) -> Self {
        Self {
            id: id.into(),
            resident: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn resident(&self) -> Option<ResidentId> {
        self.resident
    }

    pub fn is_vacant(&self) -> bool {
        self.resident.is_none()
    }

    pub(crate) fn set_resident(&mut self, resident: Option<ResidentId>) {
        self.resident = resident;
    }
}

/// Read-only view of one room inside a ward.
#[derive(Debug, Clone, Copy)]
pub struct Room<'a> {
    /// Position of the room in the ward layout.
    pub index: usize,
    pub beds: &'a [Bed],
}

impl<'a> Room<'a> {
    /// Declared capacity of the room.
    pub fn size(&self) -> usize {
        self.beds.len()
    }

    pub fn has_vacancy(&self) -> bool {
        self.beds.iter().any(Bed::is_vacant)
    }

    pub fn is_vacant(&self) -> bool {
        self.beds.iter().all(Bed::is_vacant)
    }

    /// First vacant bed in stable position order.
    pub fn first_vacant(&self) -> Option<&'a Bed> {
        self.beds.iter().find(|bed| bed.is_vacant())
    }

    pub fn occupants(&self) -> impl Iterator<Item = ResidentId> + 'a {
        self.beds.iter().filter_map(Bed::resident)
    }
}

/// Fixed-layout ward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ward {
    id: String,
    /// Advisory only; allocation never enforces it.
    preferred_gender: Option<Gender>,
    layout: Vec<usize>,
    beds: Vec<Bed>,
}

impl Ward {
    /// Builds a ward whose beds are named `{bed_prefix}-B1..n`.
    pub fn new(
        id: impl Into<String>,
        bed_prefix: &str,
        preferred_gender: Option<Gender>,
        layout: &[usize],
    ) -> Self {
        let bed_count: usize = layout.iter().sum();
        let beds = (1..=bed_count)
            .map(|index| Bed::new(format!("{bed_prefix}-B{index}")))
            .collect();
        Self {
            id: id.into(),
            preferred_gender,
            layout: layout.to_vec(),
            beds,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn preferred_gender(&self) -> Option<Gender> {
        self.preferred_gender
    }

    pub fn layout(&self) -> &[usize] {
        &self.layout
    }

    pub fn beds(&self) -> &[Bed] {
        &self.beds
    }

    pub(crate) fn beds_mut(&mut self) -> &mut [Bed] {
        &mut self.beds
    }

    /// Rooms in layout order.
    pub fn rooms(&self) -> impl Iterator<Item = Room<'_>> {
        let mut offset = 0;
        self.layout.iter().enumerate().map(move |(index, size)| {
            let start = offset.min(self.beds.len());
            let end = (offset + size).min(self.beds.len());
            offset += size;
            Room {
                index,
                beds: &self.beds[start..end],
            }
        })
    }

    /// Whether the bed sequence matches the declared layout.
    pub fn is_consistent(&self) -> bool {
        self.layout.iter().sum::<usize>() == self.beds.len()
    }
}
