//! Port abstraction for car-share persistence.
//!
//! Car-shares are stored independently of trips. Nothing at this layer keeps
//! a car-share's trip list in step with trip ownership; the domain binder
//! does that.

use async_trait::async_trait;

use crate::domain::{CarShare, CarShareId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by car-share repository adapters.
    pub enum CarShareRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "car-share repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "car-share repository query failed: {message}",
        /// An update targeted a car-share that no longer exists.
        Missing { id: CarShareId } => "car-share {id} does not exist",
    }
}

/// Port for reading and writing car-shares.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CarShareRepository: Send + Sync {
    /// Fetch a car-share by identifier.
    async fn find_by_id(
        &self,
        id: &CarShareId,
    ) -> Result<Option<CarShare>, CarShareRepositoryError>;

    /// Return every stored car-share.
    async fn list(&self) -> Result<Vec<CarShare>, CarShareRepositoryError>;

    /// Store a new car-share record.
    async fn insert(&self, car_share: &CarShare) -> Result<(), CarShareRepositoryError>;

    /// Replace an existing car-share record.
    ///
    /// Returns [`CarShareRepositoryError::Missing`] when no record has the
    /// car-share's id.
    async fn update(&self, car_share: &CarShare) -> Result<(), CarShareRepositoryError>;
}
