//! Domain primitives, the trip engine, and its ports.
//!
//! Purpose: define the records the service stores and the rules that keep
//! them consistent across independently stored collections. Nothing here
//! depends on actix or Diesel; adapters reach the domain through `ports`.
//!
//! Public surface:
//! - `User`, `CarShare`, `Trip` and their identifiers.
//! - `accrue` for cumulative score snapshots.
//! - `TripService`, which implements the trip driving ports.
//! - `Error` and `TripError` for transport-agnostic failures.

pub mod accrual;
pub mod binding;
pub mod car_share;
pub mod directory_service;
pub mod error;
pub mod ids;
pub mod participants;
pub mod ports;
pub mod trip;
pub mod trip_error;
pub mod trip_service;
pub mod user;

pub use self::accrual::accrue;
pub use self::binding::{CarShareBinder, ensure_assignable};
pub use self::car_share::{CarShare, CarShareDraft, CarShareValidationError};
pub use self::directory_service::{CarShareDirectoryService, UserDirectoryService};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{CarShareId, IdValidationError, TripId, UserId};
pub use self::participants::ParticipantValidator;
pub use self::trip::{MAX_METRES, Score, Scores, Trip, TripDraft};
pub use self::trip_error::TripError;
pub use self::trip_service::TripService;
pub use self::user::{DISPLAY_NAME_MAX, DisplayName, User, UserValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use carshare::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::conflict("already bound"))
/// }
/// # assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
