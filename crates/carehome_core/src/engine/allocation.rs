//! Bed allocation policy.
//!
//! # Responsibility
//! - Choose a bed for one resident from the current topology.
//! - Keep larger rooms filling first so single rooms stay free for isolation.
//!
//! # Invariants
//! - Scans are deterministic: size pass, then ward order, then room order,
//!   then bed position.
//! - Without the mixed-gender override a resident never joins a room holding
//!   the opposite gender.
//! - Isolation placement only uses a vacant single room or a fully vacant
//!   double room.
//! - The engine only chooses; the caller writes through
//!   `Topology::assign`, which re-checks vacancy.

use crate::model::resident::{Gender, Resident, ResidentId};
use crate::model::topology::Topology;
use crate::model::ward::{BedId, Room};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ISOLATION_ROOM_SIZE: usize = 1;
const ISOLATION_FALLBACK_ROOM_SIZE: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationError {
    /// No vacant or same-gender room; retry with the override once confirmed.
    NoSameGenderRoom,
    NoVacancy,
    NoIsolationBed,
}

impl AllocationError {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoSameGenderRoom => "no_same_gender_room",
            Self::NoVacancy => "no_vacancy",
            Self::NoIsolationBed => "no_isolation_bed",
        }
    }
}

impl Display for AllocationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoSameGenderRoom => {
                write!(f, "no vacant or same-gender room available; mixed placement needs confirmation")
            }
            Self::NoVacancy => write!(f, "no vacant bed available"),
            Self::NoIsolationBed => write!(
                f,
                "no vacant single room or empty double room available for isolation"
            ),
        }
    }
}

impl Error for AllocationError {}

/// How a placement was reached; recorded in audit details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementKind {
    SameGender,
    Mixed,
    Isolation,
    IsolationFallback,
    /// Operator named the bed; the policy was not consulted.
    Direct,
}

impl PlacementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SameGender => "same_gender",
            Self::Mixed => "mixed",
            Self::Isolation => "isolation",
            Self::IsolationFallback => "isolation_fallback",
            Self::Direct => "direct",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub bed_id: BedId,
    pub kind: PlacementKind,
}

/// Placement-relevant attributes of a current occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccupantProfile {
    pub gender: Gender,
    pub isolation: bool,
}

impl From<&Resident> for OccupantProfile {
    fn from(resident: &Resident) -> Self {
        Self {
            gender: resident.gender,
            isolation: resident.isolation,
        }
    }
}

/// Room sizes present in the topology, largest first (4, 2, 1 by default).
pub fn size_priority(topology: &Topology) -> Vec<usize> {
    let mut sizes: Vec<usize> = topology.rooms().map(|room| room.size()).collect();
    sizes.sort_unstable_by(|left, right| right.cmp(left));
    sizes.dedup();
    sizes
}

/// Chooses a bed for `resident`.
///
/// # Contract
/// - Isolation residents: first vacant single room, else first fully vacant
///   double room, else `NoIsolationBed`.
/// - Others: per size pass, the first room with a vacancy that is empty or
///   homogeneous in the resident's gender.
/// - With no such room, `NoSameGenderRoom` unless `allow_mixed_gender`, in
///   which case the first vacant bed by size pass wins, else `NoVacancy`.
pub fn allocate<F>(
    resident: &Resident,
    topology: &Topology,
    allow_mixed_gender: bool,
    occupant: F,
) -> Result<Placement, AllocationError>
where
    F: Fn(ResidentId) -> Option<OccupantProfile>,
{
    if resident.isolation {
        return allocate_isolation(topology);
    }

    let sizes = size_priority(topology);
    let accepts = |room: &Room<'_>| {
        room.is_vacant()
            || room
                .occupants()
                .all(|id| occupant(id).is_some_and(|profile| profile.gender == resident.gender))
    };
    if let Some(bed_id) = first_bed_by_size(topology, &sizes, accepts) {
        return Ok(Placement {
            bed_id,
            kind: PlacementKind::SameGender,
        });
    }

    if !allow_mixed_gender {
        return Err(AllocationError::NoSameGenderRoom);
    }

    first_bed_by_size(topology, &sizes, |_| true)
        .map(|bed_id| Placement {
            bed_id,
            kind: PlacementKind::Mixed,
        })
        .ok_or(AllocationError::NoVacancy)
}

fn allocate_isolation(topology: &Topology) -> Result<Placement, AllocationError> {
    for (size, kind) in [
        (ISOLATION_ROOM_SIZE, PlacementKind::Isolation),
        (ISOLATION_FALLBACK_ROOM_SIZE, PlacementKind::IsolationFallback),
    ] {
        let found = topology
            .rooms()
            .filter(|room| room.size() == size && room.is_vacant())
            .find_map(|room| room.first_vacant());
        if let Some(bed) = found {
            return Ok(Placement {
                bed_id: bed.id().to_string(),
                kind,
            });
        }
    }
    Err(AllocationError::NoIsolationBed)
}

fn first_bed_by_size<P>(topology: &Topology, sizes: &[usize], accepts: P) -> Option<BedId>
where
    P: Fn(&Room<'_>) -> bool,
{
    sizes.iter().find_map(|size| {
        topology
            .rooms()
            .filter(|room| room.size() == *size && room.has_vacancy())
            .find(|room| accepts(room))
            .and_then(|room| room.first_vacant())
            .map(|bed| bed.id().to_string())
    })
}
