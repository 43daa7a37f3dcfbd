//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories translate between Diesel rows and domain records and hold no
//! business rules. Each collection is its own table with no foreign keys, so
//! the PostgreSQL store has the same consistency model as the in-memory one.
//!
//! # Example
//!
//! ```ignore
//! use carshare::outbound::persistence::{DbPool, DieselTripRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/carshare")).await?;
//! let trips = DieselTripRepository::new(pool);
//! ```

mod diesel_car_share_repository;
mod diesel_error_mapping;
mod diesel_trip_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_car_share_repository::DieselCarShareRepository;
pub use diesel_trip_repository::DieselTripRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
