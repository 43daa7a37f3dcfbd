//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{CarShareDirectory, TripCommand, TripQuery, UserDirectory};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// User registration and lookup.
    pub users: Arc<dyn UserDirectory>,
    /// Car-share creation and lookup.
    pub car_shares: Arc<dyn CarShareDirectory>,
    /// Trip writes.
    pub trips: Arc<dyn TripCommand>,
    /// Trip reads.
    pub trips_query: Arc<dyn TripQuery>,
}

impl HttpState {
    /// Bundle the driving ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use carshare::domain::{CarShareDirectoryService, TripService, UserDirectoryService};
    /// use carshare::inbound::http::state::HttpState;
    /// use carshare::outbound::memory::InMemoryStore;
    /// use mockable::DefaultClock;
    ///
    /// let store = Arc::new(InMemoryStore::default());
    /// let trips = Arc::new(TripService::new(
    ///     store.clone(),
    ///     store.clone(),
    ///     store.clone(),
    ///     Arc::new(DefaultClock),
    /// ));
    /// let state = HttpState::new(
    ///     Arc::new(UserDirectoryService::new(store.clone())),
    ///     Arc::new(CarShareDirectoryService::new(store.clone(), store)),
    ///     trips.clone(),
    ///     trips,
    /// );
    /// let _users = state.users.clone();
    /// ```
    #[must_use]
    pub fn new(
        users: Arc<dyn UserDirectory>,
        car_shares: Arc<dyn CarShareDirectory>,
        trips: Arc<dyn TripCommand>,
        trips_query: Arc<dyn TripQuery>,
    ) -> Self {
        Self {
            users,
            car_shares,
            trips,
            trips_query,
        }
    }
}
