//! Builders wiring repository adapters into the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use carshare::domain::ports::{CarShareRepository, TripRepository, UserRepository};
use carshare::domain::{CarShareDirectoryService, TripService, UserDirectoryService};
use carshare::inbound::http::state::HttpState;
use carshare::outbound::memory::InMemoryStore;
use carshare::outbound::persistence::{
    DbPool, DieselCarShareRepository, DieselTripRepository, DieselUserRepository,
};

use super::ServerConfig;

/// Build the services over one set of repositories.
fn build_services<U, C, T>(
    users: Arc<U>,
    car_shares: Arc<C>,
    trips: Arc<T>,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    U: UserRepository + 'static,
    C: CarShareRepository + 'static,
    T: TripRepository + 'static,
{
    let trip_service = Arc::new(TripService::new(
        Arc::clone(&users),
        Arc::clone(&car_shares),
        trips,
        clock,
    ));
    HttpState::new(
        Arc::new(UserDirectoryService::new(Arc::clone(&users))),
        Arc::new(CarShareDirectoryService::new(car_shares, users)),
        trip_service.clone(),
        trip_service,
    )
}

fn build_diesel_state(pool: &DbPool, clock: Arc<dyn Clock>) -> HttpState {
    build_services(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselCarShareRepository::new(pool.clone())),
        Arc::new(DieselTripRepository::new(pool.clone())),
        clock,
    )
}

fn build_memory_state(clock: Arc<dyn Clock>) -> HttpState {
    let store = Arc::new(InMemoryStore::default());
    build_services(store.clone(), store.clone(), store, clock)
}

/// Use PostgreSQL when a pool is configured, otherwise keep records in
/// memory for the lifetime of the process.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let state = match &config.db_pool {
        Some(pool) => build_diesel_state(pool, clock),
        None => build_memory_state(clock),
    };
    web::Data::new(state)
}
