//! Trip record and cumulative score snapshots.

use std::collections::BTreeMap;
use std::collections::btree_map;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use super::{CarShareId, TripError, TripId, UserId};

/// Largest distance, in metres, that every store can hold.
///
/// PostgreSQL keeps distances in `BIGINT` columns, so the bound is
/// `i64::MAX`. The in-memory store applies the same limit because the
/// engine checks it before any write.
pub const MAX_METRES: u64 = i64::MAX.unsigned_abs();

/// Running distance totals for one user within a car-share.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    /// Metres driven.
    pub driver_metres: u64,
    /// Metres ridden as a passenger.
    pub passenger_metres: u64,
}

/// Cumulative per-user score snapshot carried by each trip.
///
/// Entries are ordered by user id so serialised snapshots are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scores(BTreeMap<UserId, Score>);

impl Scores {
    /// Empty snapshot, as carried by the first trip of a car-share.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Totals for one user, if they have taken part in any trip so far.
    #[must_use]
    pub fn get(&self, user_id: &UserId) -> Option<&Score> {
        self.0.get(user_id)
    }

    /// Number of users with an entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no user has an entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries ordered by user id.
    pub fn iter(&self) -> btree_map::Iter<'_, UserId, Score> {
        self.0.iter()
    }

    /// Add `metres` to the user's driving total, creating a zeroed entry first
    /// if needed. Saturates at `u64::MAX`.
    pub fn credit_driver(&mut self, user_id: UserId, metres: u64) {
        let score = self.0.entry(user_id).or_default();
        score.driver_metres = score.driver_metres.saturating_add(metres);
    }

    /// Add `metres` to the user's passenger total. Saturates at `u64::MAX`.
    pub fn credit_passenger(&mut self, user_id: UserId, metres: u64) {
        let score = self.0.entry(user_id).or_default();
        score.passenger_metres = score.passenger_metres.saturating_add(metres);
    }
}

impl FromIterator<(UserId, Score)> for Scores {
    fn from_iter<I: IntoIterator<Item = (UserId, Score)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Scores {
    type Item = (&'a UserId, &'a Score);
    type IntoIter = btree_map::Iter<'a, UserId, Score>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Caller-supplied trip fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripDraft {
    /// Car-share the trip belongs to. Updates that omit it keep the stored one.
    pub car_share_id: Option<CarShareId>,
    /// User who drove, if recorded.
    pub driver_id: Option<UserId>,
    /// Users who rode along, in the order supplied.
    pub passenger_ids: Vec<UserId>,
    /// Distance credited to every participant.
    pub metres: u64,
}

impl TripDraft {
    /// Reject distances no store can hold.
    ///
    /// # Examples
    /// ```
    /// use carshare::domain::{MAX_METRES, TripDraft, TripError};
    ///
    /// let draft = TripDraft { metres: MAX_METRES + 1, ..TripDraft::default() };
    /// assert!(matches!(
    ///     draft.ensure_storable(),
    ///     Err(TripError::DistanceOutOfRange { .. })
    /// ));
    /// ```
    pub const fn ensure_storable(&self) -> Result<(), TripError> {
        if self.metres > MAX_METRES {
            return Err(TripError::DistanceOutOfRange {
                metres: self.metres,
                max: MAX_METRES,
            });
        }
        Ok(())
    }
}

/// A recorded journey with its score snapshot.
///
/// ## Invariants
/// - `passenger_ids` holds no duplicates.
/// - `timestamp` has at most microsecond precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    id: TripId,
    car_share_id: Option<CarShareId>,
    driver_id: Option<UserId>,
    passenger_ids: Vec<UserId>,
    metres: u64,
    timestamp: DateTime<Utc>,
    scores: Scores,
}

impl Trip {
    /// Build a trip with an empty score snapshot.
    #[must_use]
    pub fn new(id: TripId, timestamp: DateTime<Utc>, draft: TripDraft) -> Self {
        let mut passenger_ids: Vec<UserId> = Vec::with_capacity(draft.passenger_ids.len());
        for passenger in draft.passenger_ids {
            if !passenger_ids.contains(&passenger) {
                passenger_ids.push(passenger);
            }
        }
        Self {
            id,
            car_share_id: draft.car_share_id,
            driver_id: draft.driver_id,
            passenger_ids,
            metres: draft.metres,
            timestamp: timestamp.trunc_subsecs(6),
            scores: Scores::new(),
        }
    }

    /// Replace the score snapshot.
    #[must_use]
    pub fn with_scores(mut self, scores: Scores) -> Self {
        self.scores = scores;
        self
    }

    /// Stable trip identifier.
    #[must_use]
    pub const fn id(&self) -> &TripId {
        &self.id
    }

    /// Car-share the trip belongs to, if any.
    #[must_use]
    pub const fn car_share_id(&self) -> Option<&CarShareId> {
        self.car_share_id.as_ref()
    }

    /// User who drove, if recorded.
    #[must_use]
    pub const fn driver_id(&self) -> Option<&UserId> {
        self.driver_id.as_ref()
    }

    /// Passengers without duplicates, first occurrence kept.
    #[must_use]
    pub fn passenger_ids(&self) -> &[UserId] {
        self.passenger_ids.as_slice()
    }

    /// Distance credited to every participant.
    #[must_use]
    pub const fn metres(&self) -> u64 {
        self.metres
    }

    /// Creation time, truncated to microseconds. Updates keep it.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Cumulative snapshot for the car-share as of this trip.
    #[must_use]
    pub const fn scores(&self) -> &Scores {
        &self.scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    fn collapses_duplicate_passengers_keeping_first() {
        let a = UserId::random();
        let b = UserId::random();
        let trip = Trip::new(
            TripId::random(),
            Utc::now(),
            TripDraft {
                passenger_ids: vec![b, a, b, a],
                ..TripDraft::default()
            },
        );
        assert_eq!(trip.passenger_ids(), &[b, a]);
    }

    #[rstest]
    fn truncates_timestamp_to_microseconds() {
        let raw = Utc
            .timestamp_opt(1_700_000_000, 123_456_789)
            .single()
            .expect("valid timestamp");
        let trip = Trip::new(TripId::random(), raw, TripDraft::default());
        assert_eq!(trip.timestamp().timestamp_subsec_nanos(), 123_456_000);
    }

    #[rstest]
    #[case(0, true)]
    #[case(MAX_METRES, true)]
    #[case(MAX_METRES + 1, false)]
    #[case(u64::MAX, false)]
    fn storable_distance_is_bounded_by_bigint(#[case] metres: u64, #[case] storable: bool) {
        let draft = TripDraft {
            metres,
            ..TripDraft::default()
        };
        assert_eq!(draft.ensure_storable().is_ok(), storable);
    }

    #[rstest]
    fn credits_saturate() {
        let user = UserId::random();
        let mut scores = Scores::new();
        scores.credit_driver(user, u64::MAX);
        scores.credit_driver(user, 5);
        assert_eq!(
            scores.get(&user),
            Some(&Score {
                driver_metres: u64::MAX,
                passenger_metres: 0
            })
        );
    }

    #[rstest]
    fn scores_serialise_as_user_keyed_object() {
        let user = UserId::random();
        let mut scores = Scores::new();
        scores.credit_passenger(user, 50);

        let value = serde_json::to_value(&scores).expect("serialises");
        assert_eq!(
            value,
            serde_json::json!({ user.to_string(): { "driverMetres": 0, "passengerMetres": 50 } })
        );

        let decoded: Scores = serde_json::from_value(value).expect("deserialises");
        assert_eq!(decoded, scores);
    }
}
