//! HTTP inbound adapter exposing the REST endpoints under `/api/v1`.

pub mod car_shares;
pub mod error;
pub mod health;
pub mod state;
#[cfg(test)]
mod test_utils;
pub mod trips;
pub mod users;
pub mod validation;

pub use error::ApiResult;
