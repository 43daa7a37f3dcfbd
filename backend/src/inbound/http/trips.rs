//! Trip API handlers.
//!
//! ```text
//! POST   /api/v1/trips        {"carShareId":"..","driverId":"..","passengerIds":[..],"metres":100}
//! PATCH  /api/v1/trips/{id}   same body; an omitted carShareId keeps the stored one
//! GET    /api/v1/trips?carShareId=..
//! GET    /api/v1/trips/{id}
//! DELETE /api/v1/trips/{id}
//! ```
//!
//! Writes that commit but then fail to resolve participants still succeed;
//! the response carries a `populationError` instead of `driver` and
//! `passengers`.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{TripParticipants, TripView, TripWrite};
use crate::domain::{CarShareId, Error, Trip, TripDraft, TripId, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::{redact_if_internal, trip_failure};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, parse_id_list, parse_optional_id};

/// Request body for trip create and update.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripBody {
    /// Owning car-share; required on create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_share_id: Option<String>,
    /// Driver, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<String>,
    /// Passengers in the order given.
    #[serde(default)]
    pub passenger_ids: Vec<String>,
    /// Distance covered in metres.
    pub metres: u64,
}

impl TryFrom<TripBody> for TripDraft {
    type Error = Error;

    fn try_from(value: TripBody) -> Result<Self, Self::Error> {
        Ok(Self {
            car_share_id: parse_optional_id(
                value.car_share_id.as_deref(),
                FieldName::new("carShareId"),
            )?,
            driver_id: parse_optional_id(value.driver_id.as_deref(), FieldName::new("driverId"))?,
            passenger_ids: parse_id_list(value.passenger_ids, FieldName::new("passengerIds"))?,
            metres: value.metres,
        })
    }
}

/// A trip with its participants resolved, or the reason they could not be.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripResponseBody {
    /// The stored trip.
    #[serde(flatten)]
    pub trip: Trip,
    /// Resolved driver.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<User>,
    /// Resolved passengers.
    pub passengers: Vec<User>,
    /// Why participants could not be resolved after a committed write.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub population_error: Option<Error>,
}

impl TripResponseBody {
    fn populated(trip: Trip, participants: TripParticipants) -> Self {
        Self {
            trip,
            driver: participants.driver,
            passengers: participants.passengers,
            population_error: None,
        }
    }
}

impl From<TripWrite> for TripResponseBody {
    fn from(value: TripWrite) -> Self {
        match value.participants {
            Ok(participants) => Self::populated(value.trip, participants),
            Err(err) => Self {
                trip: value.trip,
                driver: None,
                passengers: Vec::new(),
                population_error: Some(redact_if_internal(&Error::from(err))),
            },
        }
    }
}

impl From<TripView> for TripResponseBody {
    fn from(value: TripView) -> Self {
        Self::populated(value.trip, value.participants)
    }
}

/// Query string for `GET /api/v1/trips`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripListQuery {
    /// Restrict the listing to one car-share.
    pub car_share_id: Option<String>,
}

fn trip_id(path: web::Path<String>) -> Result<TripId, Error> {
    parse_id(&path.into_inner(), FieldName::new("id"))
}

/// Record a trip and score it against its car-share's latest trip.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use carshare::inbound::http::trips::{create_trip, delete_trip, update_trip};
///
/// let app = App::new().service(
///     web::scope("/api/v1")
///         .service(create_trip)
///         .service(update_trip)
///         .service(delete_trip),
/// );
/// ```
#[post("/trips")]
pub async fn create_trip(
    state: web::Data<HttpState>,
    payload: web::Json<TripBody>,
) -> ApiResult<HttpResponse> {
    let draft = TripDraft::try_from(payload.into_inner())?;
    let written = state.trips.create_trip(draft).await.map_err(trip_failure)?;
    Ok(HttpResponse::Created().json(TripResponseBody::from(written)))
}

/// Rewrite a trip in place, keeping its id and timestamp.
#[patch("/trips/{id}")]
pub async fn update_trip(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<TripBody>,
) -> ApiResult<web::Json<TripResponseBody>> {
    let id = trip_id(path)?;
    let draft = TripDraft::try_from(payload.into_inner())?;
    let written = state
        .trips
        .update_trip(id, draft)
        .await
        .map_err(trip_failure)?;
    Ok(web::Json(written.into()))
}

/// Delete a trip and unbind it from its car-share.
#[delete("/trips/{id}")]
pub async fn delete_trip(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = trip_id(path)?;
    state.trips.delete_trip(id).await.map_err(trip_failure)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Fetch one trip with its participants.
#[get("/trips/{id}")]
pub async fn get_trip(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<TripResponseBody>> {
    let id = trip_id(path)?;
    let view = state.trips_query.get_trip(id).await.map_err(trip_failure)?;
    Ok(web::Json(view.into()))
}

/// List trips oldest first, optionally for one car-share.
#[get("/trips")]
pub async fn list_trips(
    state: web::Data<HttpState>,
    query: web::Query<TripListQuery>,
) -> ApiResult<web::Json<Vec<Trip>>> {
    let car_share_id: Option<CarShareId> = parse_optional_id(
        query.car_share_id.as_deref(),
        FieldName::new("carShareId"),
    )?;
    let trips = state
        .trips_query
        .list_trips(car_share_id)
        .await
        .map_err(trip_failure)?;
    Ok(web::Json(trips))
}

#[cfg(test)]
#[path = "trips_tests.rs"]
mod tests;
