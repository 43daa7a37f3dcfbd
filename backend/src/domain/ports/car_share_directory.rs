//! Driving port for car-share creation and lookup.
//!
//! Trip membership is not writable here. Trip ids reach a car-share only
//! through the trip lifecycle.

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::domain::{CarShare, CarShareId, Error, UserId};

/// Request to create an empty car-share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCarShareRequest {
    /// Group name.
    pub name: String,
    /// Usual route length in metres.
    pub metres: u64,
    /// Administrators; each must be a stored user.
    pub admin_ids: BTreeSet<UserId>,
}

/// Driving port for creating and reading car-shares.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CarShareDirectory: Send + Sync {
    /// Store a new car-share with no trips.
    async fn create(&self, request: CreateCarShareRequest) -> Result<CarShare, Error>;

    /// Fetch one car-share; not found if absent.
    async fn get(&self, id: CarShareId) -> Result<CarShare, Error>;

    /// Return every car-share.
    async fn list(&self) -> Result<Vec<CarShare>, Error>;
}
