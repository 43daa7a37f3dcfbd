//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use crate::domain::{CarShareDirectoryService, TripService, UserDirectoryService};
use crate::outbound::memory::InMemoryStore;
use crate::test_support::SteppingClock;

use super::state::HttpState;

/// Wire every port to one in-memory store with a stepping clock, so trips
/// created in sequence get strictly increasing timestamps.
pub fn memory_state() -> (HttpState, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::default());
    let trips = Arc::new(TripService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        Arc::new(SteppingClock::default()),
    ));
    let state = HttpState::new(
        Arc::new(UserDirectoryService::new(store.clone())),
        Arc::new(CarShareDirectoryService::new(store.clone(), store.clone())),
        trips.clone(),
        trips,
    );
    (state, store)
}
