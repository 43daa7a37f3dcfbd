//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters. Driving
//! ports (`TripCommand`, `TripQuery`, and the directories) are implemented by
//! domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod car_share_directory;
mod car_share_repository;
mod trip_command;
mod trip_query;
mod trip_repository;
mod user_directory;
mod user_repository;

#[cfg(test)]
pub use car_share_directory::MockCarShareDirectory;
pub use car_share_directory::{CarShareDirectory, CreateCarShareRequest};
#[cfg(test)]
pub use car_share_repository::MockCarShareRepository;
pub use car_share_repository::{CarShareRepository, CarShareRepositoryError};
#[cfg(test)]
pub use trip_command::MockTripCommand;
pub use trip_command::{TripCommand, TripParticipants, TripWrite};
#[cfg(test)]
pub use trip_query::MockTripQuery;
pub use trip_query::{TripQuery, TripView};
#[cfg(test)]
pub use trip_repository::MockTripRepository;
pub use trip_repository::{TripRepository, TripRepositoryError};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{RegisterUserRequest, UserDirectory};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
