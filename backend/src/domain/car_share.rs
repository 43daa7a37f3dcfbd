//! Car-share group model.
//!
//! A car-share owns an ordered list of trip identifiers. The list is treated
//! as a set: [`CarShare::attach_trip`] never records the same trip twice.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{CarShareId, MAX_METRES, TripId, UserId};

/// Validation errors raised when building a car-share.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CarShareValidationError {
    /// The name was blank.
    #[error("car-share name must not be empty")]
    EmptyName,
    /// The route length cannot be stored.
    #[error("route length of {metres} metres exceeds the maximum of {max}")]
    MetresOutOfRange {
        /// Requested route length.
        metres: u64,
        /// Largest accepted route length.
        max: u64,
    },
}

impl CarShareValidationError {
    /// Request field the failure refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyName => "name",
            Self::MetresOutOfRange { .. } => "metres",
        }
    }
}

/// Input for [`CarShare::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarShareDraft {
    /// Identifier to store the car-share under.
    pub id: CarShareId,
    /// Group name; must not be blank.
    pub name: String,
    /// Usual route length in metres.
    pub metres: u64,
    /// Users allowed to administer the group.
    pub admin_ids: BTreeSet<UserId>,
    /// Trips already attached, oldest first.
    pub trip_ids: Vec<TripId>,
}

/// A group of users sharing one car on a usual route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarShare {
    id: CarShareId,
    name: String,
    metres: u64,
    admin_ids: BTreeSet<UserId>,
    trip_ids: Vec<TripId>,
}

impl CarShare {
    /// Validate a draft. Duplicate trip ids collapse to their first
    /// occurrence.
    pub fn new(draft: CarShareDraft) -> Result<Self, CarShareValidationError> {
        if draft.name.trim().is_empty() {
            return Err(CarShareValidationError::EmptyName);
        }
        if draft.metres > MAX_METRES {
            return Err(CarShareValidationError::MetresOutOfRange {
                metres: draft.metres,
                max: MAX_METRES,
            });
        }
        let mut share = Self {
            id: draft.id,
            name: draft.name,
            metres: draft.metres,
            admin_ids: draft.admin_ids,
            trip_ids: Vec::with_capacity(draft.trip_ids.len()),
        };
        for trip_id in draft.trip_ids {
            share.attach_trip(trip_id);
        }
        Ok(share)
    }

    /// Stable car-share identifier.
    #[must_use]
    pub const fn id(&self) -> &CarShareId {
        &self.id
    }

    /// Group name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Distance of the group's usual route in metres.
    #[must_use]
    pub const fn metres(&self) -> u64 {
        self.metres
    }

    /// Users allowed to administer the group.
    #[must_use]
    pub const fn admin_ids(&self) -> &BTreeSet<UserId> {
        &self.admin_ids
    }

    /// Trip ids in the order they were attached.
    #[must_use]
    pub fn trip_ids(&self) -> &[TripId] {
        self.trip_ids.as_slice()
    }

    /// Whether the trip id is attached.
    #[must_use]
    pub fn contains_trip(&self, trip_id: &TripId) -> bool {
        self.trip_ids.contains(trip_id)
    }

    /// Append a trip id. Returns `false` when the id was already present.
    pub fn attach_trip(&mut self, trip_id: TripId) -> bool {
        if self.contains_trip(&trip_id) {
            return false;
        }
        self.trip_ids.push(trip_id);
        true
    }

    /// Remove a trip id. Returns `false` when the id was absent.
    pub fn detach_trip(&mut self, trip_id: &TripId) -> bool {
        let before = self.trip_ids.len();
        self.trip_ids.retain(|id| id != trip_id);
        self.trip_ids.len() != before
    }
}
