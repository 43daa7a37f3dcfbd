//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use carshare::Trace;
use carshare::inbound::http::car_shares::{create_car_share, get_car_share, list_car_shares};
use carshare::inbound::http::health::{HealthState, live, ready};
use carshare::inbound::http::state::HttpState;
use carshare::inbound::http::trips::{create_trip, delete_trip, get_trip, list_trips, update_trip};
use carshare::inbound::http::users::{get_user, list_users, register_user};

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1")
        .service(register_user)
        .service(list_users)
        .service(get_user)
        .service(create_car_share)
        .service(list_car_shares)
        .service(get_car_share)
        .service(create_trip)
        .service(list_trips)
        .service(get_trip)
        .service(update_trip)
        .service(delete_trip);

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live)
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config);
    let ServerConfig {
        bind_addr,
        db_pool: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
