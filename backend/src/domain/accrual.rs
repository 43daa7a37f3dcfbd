//! Score accrual.
//!
//! [`accrue`] derives a trip's cumulative snapshot from its predecessor's.
//! Choosing the predecessor is the caller's job.

use super::{Scores, Trip};

/// Carry `prior` forward and credit `trip.metres` to each participant in the
/// role they occupied.
///
/// Users absent from the trip keep their prior totals. Arithmetic saturates.
///
/// # Examples
/// ```
/// use carshare::domain::{accrue, Scores, Trip, TripDraft, TripId, UserId};
/// use chrono::Utc;
///
/// let driver = UserId::random();
/// let trip = Trip::new(
///     TripId::random(),
///     Utc::now(),
///     TripDraft { driver_id: Some(driver), metres: 100, ..TripDraft::default() },
/// );
/// let scores = accrue(&Scores::new(), &trip);
/// assert_eq!(scores.get(&driver).map(|s| s.driver_metres), Some(100));
/// ```
#[must_use]
pub fn accrue(prior: &Scores, trip: &Trip) -> Scores {
    let mut next = prior.clone();
    if let Some(driver) = trip.driver_id() {
        next.credit_driver(*driver, trip.metres());
    }
    for passenger in trip.passenger_ids() {
        next.credit_passenger(*passenger, trip.metres());
    }
    next
}
