//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{ServerConfig, ServerSettings};

use state_builders::{build_health_probe, build_http_state};

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use cinephile::Trace;
#[cfg(debug_assertions)]
use cinephile::doc::ApiDoc;
use cinephile::inbound::http::accounts::{current_session, login, register};
use cinephile::inbound::http::engagement::{status, toggle};
use cinephile::inbound::http::health::{HealthState, live, ready};
use cinephile::inbound::http::reviews::{list_reviews, submit_review};
use cinephile::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

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
        .service(register)
        .service(login)
        .service(current_session)
        .service(submit_review)
        .service(list_reviews)
        .service(toggle)
        .service(status);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server from a prepared [`ServerConfig`].
///
/// The returned [`HealthState`] reports ready once the listener is bound;
/// callers flip it to unhealthy when draining.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when the password hashing cost is invalid,
/// or when binding the socket fails.
pub fn create_server(config: ServerConfig) -> std::io::Result<(Server, web::Data<HealthState>)> {
    let http_state = web::Data::new(
        build_http_state(&config)
            .map_err(|err| std::io::Error::other(format!("password hashing setup: {err}")))?,
    );
    let health_state = web::Data::new(HealthState::new(build_health_probe(&config)));
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok((server, health_state))
}

#[cfg(test)]
mod tests {
    //! End-to-end routing through the assembled app on fixture adapters.

    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use cinephile::domain::{PasswordSettings, SigningSecret};
    use cinephile::middleware::TRACE_ID_HEADER;
    use rstest::rstest;
    use serde_json::{Value, json};
    use std::net::SocketAddr;

    fn fixture_config() -> ServerConfig {
        ServerConfig::new(
            SigningSecret::new(vec![b's'; 32]),
            PasswordSettings {
                memory_kib: 64,
                iterations: 1,
                parallelism: 1,
            },
            SocketAddr::from(([127, 0, 0, 1], 0)),
        )
    }

    fn fixture_app_data() -> (web::Data<HealthState>, web::Data<HttpState>) {
        let config = fixture_config();
        let health = HealthState::new(build_health_probe(&config));
        health.mark_ready();
        let http = build_http_state(&config).expect("state builds");
        (web::Data::new(health), web::Data::new(http))
    }

    #[rstest]
    #[actix_web::test]
    async fn api_routes_are_mounted_under_the_version_scope() {
        let (health, http) = fixture_app_data();
        let app = test::init_service(build_app(health, http)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/movies/The-Matrix/reviews")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert!(res.headers().contains_key(TRACE_ID_HEADER));
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["details"]["code"], "movie_not_found");
    }

    #[rstest]
    #[actix_web::test]
    async fn registration_runs_against_the_fixture_store() {
        let (health, http) = fixture_app_data();
        let app = test::init_service(build_app(health, http)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/accounts")
                .set_json(json!({"username": "alice", "password": "pw", "email": "a@example.com"}))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    #[rstest]
    #[actix_web::test]
    async fn health_probes_are_mounted_at_the_root() {
        let (health, http) = fixture_app_data();
        let app = test::init_service(build_app(health, http)).await;

        for uri in ["/health/ready", "/health/live"] {
            let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(res.status(), StatusCode::OK, "{uri}");
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn create_server_marks_the_listener_ready() {
        let (server, health) = create_server(fixture_config()).expect("server binds");
        assert!(health.is_ready());
        let handle = server.handle();
        let running = actix_web::rt::spawn(server);
        handle.stop(false).await;
        running.await.expect("server task").expect("server exits cleanly");
    }
}
