//! Car-share API handlers.
//!
//! ```text
//! POST /api/v1/car-shares {"name":"School run","metres":4200,"adminIds":[..]}
//! GET /api/v1/car-shares
//! GET /api/v1/car-shares/{id}
//! ```
//!
//! Trip membership is read-only here; it changes through the trip endpoints.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::CreateCarShareRequest;
use crate::domain::{CarShare, CarShareId, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, parse_id_list};

/// Request body for `POST /api/v1/car-shares`.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCarShareBody {
    /// Car-share name; must not be blank.
    pub name: String,
    /// Route length in metres.
    pub metres: u64,
    /// Users allowed to administer the car-share.
    #[serde(default)]
    pub admin_ids: Vec<String>,
}

/// Create an empty car-share.
#[post("/car-shares")]
pub async fn create_car_share(
    state: web::Data<HttpState>,
    payload: web::Json<CreateCarShareBody>,
) -> ApiResult<HttpResponse> {
    let CreateCarShareBody {
        name,
        metres,
        admin_ids: raw_admin_ids,
    } = payload.into_inner();
    let admin_ids: Vec<UserId> = parse_id_list(raw_admin_ids, FieldName::new("adminIds"))?;
    let car_share = state
        .car_shares
        .create(CreateCarShareRequest {
            name,
            metres,
            admin_ids: admin_ids.into_iter().collect(),
        })
        .await?;
    Ok(HttpResponse::Created().json(car_share))
}

/// List car-shares ordered by id.
#[get("/car-shares")]
pub async fn list_car_shares(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<CarShare>>> {
    Ok(web::Json(state.car_shares.list().await?))
}

/// Fetch one car-share with its trip ids.
#[get("/car-shares/{id}")]
pub async fn get_car_share(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<CarShare>> {
    let id: CarShareId = parse_id(&path.into_inner(), FieldName::new("id"))?;
    Ok(web::Json(state.car_shares.get(id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::UserRepository;
    use crate::domain::{DisplayName, User};
    use crate::inbound::http::test_utils::memory_state;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::{Value, json};

    fn test_app(
        state: HttpState,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().app_data(web::Data::new(state)).service(
            web::scope("/api/v1")
                .service(create_car_share)
                .service(list_car_shares)
                .service(get_car_share),
        )
    }

    #[rstest]
    #[actix_web::test]
    async fn created_car_share_starts_without_trips() {
        let (state, store) = memory_state();
        let admin = User::new(UserId::random(), DisplayName::new("Ada").expect("valid name"));
        UserRepository::insert(store.as_ref(), &admin)
            .await
            .expect("seed admin");
        let app = actix_test::init_service(test_app(state)).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/car-shares")
            .set_json(json!({
                "name": "School run",
                "metres": 4200,
                "adminIds": [admin.id().to_string()],
            }))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let created: Value = actix_test::read_body_json(res).await;
        assert_eq!(created["name"], "School run");
        assert_eq!(created["metres"], 4200);
        assert_eq!(created["adminIds"], json!([admin.id().to_string()]));
        assert_eq!(created["tripIds"], json!([]));

        let id = created["id"].as_str().expect("id is a string");
        let req = actix_test::TestRequest::get()
            .uri(&format!("/api/v1/car-shares/{id}"))
            .to_request();
        let fetched: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(fetched, created);
    }

    #[rstest]
    #[actix_web::test]
    async fn unknown_admin_is_not_found() {
        let (state, _store) = memory_state();
        let app = actix_test::init_service(test_app(state)).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/car-shares")
            .set_json(json!({
                "name": "Commute",
                "metres": 10,
                "adminIds": [UserId::random().to_string()],
            }))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[rstest]
    #[actix_web::test]
    async fn malformed_admin_id_names_its_index() {
        let (state, _store) = memory_state();
        let app = actix_test::init_service(test_app(state)).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/car-shares")
            .set_json(json!({ "name": "Commute", "metres": 10, "adminIds": ["x"] }))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], "adminIds");
        assert_eq!(body["details"]["index"], 0);
    }

    #[rstest]
    #[actix_web::test]
    async fn list_is_empty_for_a_fresh_store() {
        let (state, _store) = memory_state();
        let app = actix_test::init_service(test_app(state)).await;

        let req = actix_test::TestRequest::get()
            .uri("/api/v1/car-shares")
            .to_request();
        let body: Vec<Value> = actix_test::call_and_read_body_json(&app, req).await;
        assert!(body.is_empty());
    }
}
