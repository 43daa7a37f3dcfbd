//! Trip participant validation against the user store.

use std::sync::Arc;

use super::TripError;
use super::UserId;
use super::ports::UserRepository;

/// Confirms that trip participants exist and hold one role each.
#[derive(Clone)]
pub struct ParticipantValidator<U> {
    users: Arc<U>,
}

impl<U> ParticipantValidator<U>
where
    U: UserRepository,
{
    /// Build a validator over the user store.
    #[must_use]
    pub const fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    /// Check the driver and passengers.
    ///
    /// Role overlap is rejected before any lookup, so a driver listed as a
    /// passenger fails with [`TripError::DriverIsPassenger`] even when that
    /// user does not exist. Lookups then run driver first and passengers in
    /// the order supplied, stopping at the first failure.
    pub async fn validate(
        &self,
        driver_id: Option<&UserId>,
        passenger_ids: &[UserId],
    ) -> Result<(), TripError> {
        if let Some(driver) = driver_id.filter(|id| passenger_ids.contains(id)) {
            return Err(TripError::DriverIsPassenger { id: *driver });
        }

        if let Some(driver) = driver_id {
            self.ensure_exists(driver, "find driver").await?;
        }
        for passenger in passenger_ids {
            self.ensure_exists(passenger, "find passenger").await?;
        }
        Ok(())
    }

    async fn ensure_exists(&self, id: &UserId, operation: &'static str) -> Result<(), TripError> {
        match self.users.find_by_id(id).await {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err(TripError::UserNotFound { id: *id }),
            Err(err) => Err(TripError::user_store(operation, err)),
        }
    }
}
