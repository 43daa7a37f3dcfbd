//! Outbound adapters implementing the repository ports.
//!
//! - **memory**: process-local store, used when no database is configured
//! - **persistence**: PostgreSQL repositories using Diesel ORM

pub mod memory;
pub mod persistence;
