//! Users API handlers.
//!
//! ```text
//! POST /api/v1/users {"displayName":"Ada","isAnonymous":true}
//! GET /api/v1/users
//! GET /api/v1/users/{id}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::RegisterUserRequest;
use crate::domain::{User, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

/// Request body for `POST /api/v1/users`.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserBody {
    /// Name shown to other members; must not be blank.
    pub display_name: String,
    /// Registered without an account.
    #[serde(default)]
    pub is_anonymous: bool,
    /// Linked to an external identity.
    #[serde(default)]
    pub is_linked: bool,
}

impl From<RegisterUserBody> for RegisterUserRequest {
    fn from(value: RegisterUserBody) -> Self {
        Self {
            display_name: value.display_name,
            is_anonymous: value.is_anonymous,
            is_linked: value.is_linked,
        }
    }
}

/// Register a user and return it with its new id.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use carshare::inbound::http::users::register_user;
///
/// let app = App::new().service(register_user);
/// ```
#[post("/users")]
pub async fn register_user(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterUserBody>,
) -> ApiResult<HttpResponse> {
    let user = state.users.register(payload.into_inner().into()).await?;
    Ok(HttpResponse::Created().json(user))
}

/// List registered users ordered by id.
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<User>>> {
    Ok(web::Json(state.users.list().await?))
}

/// Fetch one user by id.
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let id: UserId = parse_id(&path.into_inner(), FieldName::new("id"))?;
    Ok(web::Json(state.users.get(id).await?))
}
