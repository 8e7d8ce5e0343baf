//! # zorgkwekerij: form submission backend
//!
//! Backend for the Zorgkwekerij Plant en Tuin Noordbroek website. It accepts
//! four kinds of form submissions (client applications, partner inquiries,
//! volunteer applications, contact messages), validates their shape against
//! declarative schemas, persists each as a write-once document, and exposes
//! simple read-back endpoints for the latest submissions per collection.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for
//! the HTTP layer and uses PostgreSQL (JSONB documents via SQLx) for
//! persistence. Request handling is stateless and request-scoped: the only
//! shared state is the optional connection pool. A missing `DATABASE_URL`
//! does not prevent startup; every write checks for the handle per request
//! and `GET /test` reports the degraded state.
//!
//! ### Request flow
//!
//! inbound request → handler parses the JSON body → the entity kind's schema
//! validates it (collecting every field violation) → the document store
//! inserts the cleaned field map into the kind's collection → the response
//! echoes the assigned identifier. Read-back resolves the collection name
//! against a static allow-list and returns the latest N documents.
//!
//! ## Quick start
//!
//! ```no_run
//! use clap::Parser;
//! use zorgkwekerij::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = zorgkwekerij::config::Args::parse();
//!     let config = Config::load(&args)?;
//!     zorgkwekerij::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod schemas;
pub mod telemetry;

use crate::config::CorsOrigin;
use crate::openapi::ApiDoc;
use axum::http::HeaderValue;
use axum::{Router, http, routing::get, routing::post};
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, info, instrument, warn};
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

pub use config::Config;

/// Application state shared across all request handlers.
///
/// The pool is optional: when no `DATABASE_URL` is configured the service
/// still serves its health and diagnostic endpoints, and write endpoints fail
/// per-request instead of at startup.
#[derive(Clone)]
pub struct AppState {
    pub db: Option<PgPool>,
    pub config: Config,
}

/// Get the database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Connect to the database if configured, running migrations on success.
///
/// A missing connection string yields `None` rather than an error; other
/// connection failures are propagated so a misconfigured URL is caught at
/// startup rather than on the first request.
async fn setup_database(config: &Config) -> anyhow::Result<Option<PgPool>> {
    let Some(url) = config.database_url.as_deref() else {
        warn!("No DATABASE_URL configured; starting without a persistence handle");
        return Ok(None);
    };

    let pool = PgPool::connect(url).await?;
    migrator().run(&pool).await?;
    info!("Database connected and migrations applied");

    Ok(Some(pool))
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    // `AllowOrigin::list` rejects the literal `*`; a wildcard must be
    // expressed as `AllowOrigin::any()` instead.
    let origins = if config.cors.allowed_origins.iter().any(|origin| matches!(origin, CorsOrigin::Wildcard)) {
        AllowOrigin::any()
    } else {
        let mut list = Vec::new();
        for origin in &config.cors.allowed_origins {
            if let CorsOrigin::Url(url) = origin {
                list.push(url.as_str().parse::<HeaderValue>()?);
            }
        }
        AllowOrigin::list(list)
    };

    // Wildcard method/header grants cannot be combined with credentials;
    // config validation already forbids wildcard origins in that case.
    let cors = if config.cors.allow_credentials {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true)
    } else {
        CorsLayer::new().allow_origin(origins).allow_methods(Any).allow_headers(Any)
    };

    Ok(cors.expose_headers(vec![http::header::LOCATION]))
}

/// Build the application router with all endpoints and middleware.
///
/// Routes:
/// - liveness and diagnostics (`/`, `/test`)
/// - the four submission endpoints and the read-back endpoint under `/api`
/// - rendered API documentation at `/docs`
///
/// plus CORS and tracing layers.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let api_routes = Router::new()
        .route("/applications/clients", post(api::handlers::submissions::submit_client_application))
        .route("/inquiries/partners", post(api::handlers::submissions::submit_partner_inquiry))
        .route(
            "/applications/volunteers",
            post(api::handlers::submissions::submit_volunteer_application),
        )
        .route("/contact", post(api::handlers::submissions::submit_contact_message))
        .route(
            "/submissions/{collection}",
            get(api::handlers::submissions::get_latest_submissions),
        );

    let cors_layer = create_cors_layer(&state.config)?;

    let router = Router::new()
        .route("/", get(api::handlers::health::read_root))
        .route("/test", get(api::handlers::health::test_database))
        .nest("/api", api_routes)
        .with_state(state)
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/docs"))
        .layer(cors_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    Ok(router)
}

/// Main application struct that owns all resources and lifecycle.
///
/// 1. **Create**: [`Application::new`] loads the optional database handle,
///    runs migrations, and builds the router
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and handles
///    requests until the shutdown future resolves
pub struct Application {
    router: Router,
    config: Config,
    pool: Option<PgPool>,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let pool = setup_database(&config).await?;

        let state = AppState {
            db: pool.clone(),
            config: config.clone(),
        };
        let router = build_router(state)?;

        Ok(Self { router, config, pool })
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("Zorgkwekerij API listening on http://{}", bind_addr);

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        if let Some(pool) = self.pool {
            info!("Closing database connections...");
            pool.close().await;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{AppState, Config, build_router};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{Value, json};

    /// Test server with no persistence handle. Everything up to the document
    /// store is exercised; writes fail per-request the way they would in a
    /// misconfigured deployment.
    fn server_without_database() -> TestServer {
        let state = AppState {
            db: None,
            config: Config::default(),
        };
        let router = build_router(state).expect("router should build");
        TestServer::new(router).expect("Failed to create test server")
    }

    /// Test server backed by a live migrated pool, for the persistence path.
    fn server_with_database(pool: sqlx::PgPool) -> TestServer {
        let state = AppState {
            db: Some(pool),
            config: Config::default(),
        };
        let router = build_router(state).expect("router should build");
        TestServer::new(router).expect("Failed to create test server")
    }

    #[test_log::test(tokio::test)]
    async fn root_returns_the_static_message() {
        let server = server_without_database();

        let response = server.get("/").await;
        response.assert_status_ok();
        response.assert_json(&json!({"message": "Zorgkwekerij API running"}));
    }

    #[test_log::test(tokio::test)]
    async fn diagnostic_never_errors_without_a_handle() {
        let server = server_without_database();

        let response = server.get("/test").await;
        response.assert_status_ok();

        let report: Value = response.json();
        assert_eq!(report["backend"], "running");
        assert_eq!(report["database"], "not configured");
        assert_eq!(report["database_url"], "not set");
        assert_eq!(report["database_name"], "unknown");
        assert_eq!(report["connection_status"], "not connected");
        assert_eq!(report["collections"], json!([]));
    }

    #[test_log::test(tokio::test)]
    async fn missing_required_field_names_the_field() {
        let server = server_without_database();

        let response = server.post("/api/contact").json(&json!({"name": "Jan"})).await;
        response.assert_status_unprocessable_entity();

        let body: Value = response.json();
        assert_eq!(body["message"], "Validation failed");
        assert_eq!(body["errors"][0]["field"], "message");
        assert_eq!(body["errors"][0]["reason"], "field required");
    }

    #[test_log::test(tokio::test)]
    async fn validation_lists_every_offending_field() {
        let server = server_without_database();

        let response = server
            .post("/api/applications/clients")
            .json(&json!({"email": "not-an-email"}))
            .await;
        response.assert_status_unprocessable_entity();

        let body: Value = response.json();
        let fields: Vec<&str> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["first_name", "last_name", "email"]);
    }

    #[test_log::test(tokio::test)]
    async fn valid_submission_without_a_handle_is_a_server_error() {
        let server = server_without_database();

        let response = server
            .post("/api/contact")
            .json(&json!({"name": "Jan", "message": "Hallo"}))
            .await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test_log::test(tokio::test)]
    async fn unknown_collection_is_a_client_error() {
        let server = server_without_database();

        let response = server.get("/api/submissions/unknowncollection").await;
        response.assert_status_bad_request();

        let body: Value = response.json();
        assert_eq!(body["collection"], "unknowncollection");
    }

    #[test_log::test(tokio::test)]
    async fn allowed_collection_without_a_handle_is_a_server_error() {
        let server = server_without_database();

        let response = server.get("/api/submissions/contactmessage?limit=3").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test_log::test(tokio::test)]
    async fn all_four_submission_endpoints_validate() {
        let server = server_without_database();

        // Each endpoint enforces its own schema: empty bodies list exactly
        // the required fields of that kind.
        let cases = [
            ("/api/applications/clients", vec!["first_name", "last_name"]),
            ("/api/inquiries/partners", vec!["organization", "contact_name", "email"]),
            ("/api/applications/volunteers", vec!["name"]),
            ("/api/contact", vec!["name", "message"]),
        ];

        for (path, expected) in cases {
            let response = server.post(path).json(&json!({})).await;
            response.assert_status_unprocessable_entity();

            let body: Value = response.json();
            let fields: Vec<&str> = body["errors"]
                .as_array()
                .unwrap()
                .iter()
                .map(|e| e["field"].as_str().unwrap())
                .collect();
            assert_eq!(fields, expected, "unexpected violations for {path}");
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn valid_submission_is_stored_and_acknowledged(pool: sqlx::PgPool) {
        let server = server_with_database(pool);

        let response = server
            .post("/api/contact")
            .json(&json!({"name": "Jan", "message": "Hallo"}))
            .await;
        response.assert_status(StatusCode::CREATED);

        let body: Value = response.json();
        assert_eq!(body["success"], json!(true));
        assert!(!body["id"].as_str().unwrap().is_empty());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn read_back_returns_at_most_the_requested_limit(pool: sqlx::PgPool) {
        let server = server_with_database(pool);

        for i in 0..4 {
            server
                .post("/api/contact")
                .json(&json!({"name": "Jan", "message": format!("bericht {i}")}))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = server.get("/api/submissions/contactmessage?limit=3").await;
        response.assert_status_ok();

        let body: Value = response.json();
        let items = body["items"].as_array().unwrap();
        assert_eq!(items.len(), 3);
        // Newest first, each item carrying its assigned id and timestamp.
        assert_eq!(items[0]["message"], json!("bericht 3"));
        for item in items {
            assert!(item.get("id").is_some());
            assert!(item.get("created_at").is_some());
        }
    }

    #[test_log::test(tokio::test)]
    async fn openapi_document_is_served() {
        let server = server_without_database();

        let response = server.get("/api-docs/openapi.json").await;
        response.assert_status_ok();

        let doc: Value = response.json();
        assert!(doc["paths"]["/api/contact"].is_object());
        assert!(doc["paths"]["/api/submissions/{collection}"].is_object());
    }
}
