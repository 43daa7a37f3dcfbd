//! Failure taxonomy for the trip engine.
//!
//! Store failures carry the operation that was running so logs and responses
//! say what the engine was doing, e.g. `fetch latest trip`.

use serde_json::json;

use super::ports::{CarShareRepositoryError, TripRepositoryError, UserRepositoryError};
use super::{CarShareId, Error, IdValidationError, TripId, UserId};

/// Errors raised while validating, binding, or persisting trips.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TripError {
    /// A referenced user does not exist.
    #[error("user {id} not found")]
    UserNotFound {
        /// Identifier that failed to resolve.
        id: UserId,
    },
    /// A referenced car-share does not exist.
    #[error("car-share {id} not found")]
    CarShareNotFound {
        /// Identifier that failed to resolve.
        id: CarShareId,
    },
    /// The trip does not exist.
    #[error("trip {id} not found")]
    TripNotFound {
        /// Identifier that failed to resolve.
        id: TripId,
    },
    /// An identifier supplied by the caller is malformed.
    #[error("{field}: {source}")]
    InvalidId {
        /// Request field that carried the identifier.
        field: &'static str,
        /// Position within a list field.
        index: Option<usize>,
        /// Parse failure.
        source: IdValidationError,
    },
    /// The distance cannot be stored.
    #[error("{metres} metres exceeds the maximum of {max}")]
    DistanceOutOfRange {
        /// Requested distance.
        metres: u64,
        /// Largest accepted distance.
        max: u64,
    },
    /// The trip already belongs to another car-share.
    #[error("trip {trip_id} already belongs to car-share {current}, not {requested}")]
    AlreadyAssigned {
        /// Trip being rewritten.
        trip_id: TripId,
        /// Car-share the stored trip belongs to.
        current: CarShareId,
        /// Car-share named by the request.
        requested: CarShareId,
    },
    /// The driver also appears among the passengers.
    #[error("user {id} cannot be both driver and passenger")]
    DriverIsPassenger {
        /// User listed in both roles.
        id: UserId,
    },
    /// A backing store could not be reached.
    #[error("store unavailable while trying to {operation}: {message}")]
    StoreUnavailable {
        /// Engine step that was running.
        operation: &'static str,
        /// Backend detail; never sent to clients.
        message: String,
    },
    /// A store call failed for any other reason.
    #[error("store failed to {operation}: {message}")]
    Store {
        /// Engine step that was running.
        operation: &'static str,
        /// Backend detail; redacted before leaving the process.
        message: String,
    },
}

impl TripError {
    pub(crate) fn user_store(operation: &'static str, err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::Connection { message } => Self::StoreUnavailable {
                operation,
                message,
            },
            UserRepositoryError::Query { message } => Self::Store { operation, message },
        }
    }

    pub(crate) fn car_share_store(operation: &'static str, err: CarShareRepositoryError) -> Self {
        match err {
            CarShareRepositoryError::Connection { message } => Self::StoreUnavailable {
                operation,
                message,
            },
            CarShareRepositoryError::Query { message } => Self::Store { operation, message },
            CarShareRepositoryError::Missing { id } => Self::CarShareNotFound { id },
        }
    }

    pub(crate) fn trip_store(operation: &'static str, err: TripRepositoryError) -> Self {
        match err {
            TripRepositoryError::Connection { message } => Self::StoreUnavailable {
                operation,
                message,
            },
            TripRepositoryError::Query { message } => Self::Store { operation, message },
            TripRepositoryError::Missing { id } => Self::TripNotFound { id },
        }
    }
}

impl From<TripError> for Error {
    fn from(err: TripError) -> Self {
        let message = err.to_string();
        match err {
            TripError::UserNotFound { id } => {
                Self::not_found(message).with_details(json!({ "userId": id }))
            }
            TripError::CarShareNotFound { id } => {
                Self::not_found(message).with_details(json!({ "carShareId": id }))
            }
            TripError::TripNotFound { id } => {
                Self::not_found(message).with_details(json!({ "tripId": id }))
            }
            TripError::InvalidId {
                field,
                index,
                source,
            } => {
                let mut details = json!({
                    "field": field,
                    "value": source.value(),
                    "code": "invalid_id",
                });
                if let (Some(position), Some(map)) = (index, details.as_object_mut()) {
                    map.insert("index".to_owned(), json!(position));
                }
                Self::invalid_request(message).with_details(details)
            }
            TripError::DistanceOutOfRange { metres, max } => Self::invalid_request(message)
                .with_details(json!({
                    "field": "metres",
                    "value": metres,
                    "max": max,
                    "code": "distance_out_of_range",
                })),
            TripError::AlreadyAssigned {
                trip_id,
                current,
                requested,
            } => Self::conflict(message).with_details(json!({
                "tripId": trip_id,
                "currentCarShareId": current,
                "requestedCarShareId": requested,
            })),
            TripError::DriverIsPassenger { id } => Self::invalid_request(message)
                .with_details(json!({ "userId": id, "code": "driver_is_passenger" })),
            TripError::StoreUnavailable { operation, .. } => {
                Self::service_unavailable(format!("store unavailable while trying to {operation}"))
            }
            TripError::Store { .. } => Self::internal(message),
        }
    }
}
