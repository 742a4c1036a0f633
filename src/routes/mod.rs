pub mod credentials;
pub mod health;
pub mod provision;
pub mod records;
pub mod relay;
pub mod simulated;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::common::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        credentials::register,
        credentials::login,
        relay::turn_on,
        relay::turn_off,
        relay::status,
        relay::logs,
        records::save,
        records::list,
        provision::create_data_table,
        provision::create_device_tables,
        provision::delete_data_table,
    ),
    components(
        schemas(
            credentials::CredentialsRequest,
            credentials::RegisterResponse,
            credentials::LoginResponse,
            relay::RelayState,
            relay::StatusResponse,
            relay::LogEntryResponse,
            records::SaveRequest,
            records::RecordResponse,
            records::ListResponse,
            provision::TableStatus,
            provision::DeleteResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "credentials", description = "Registration and login"),
        (name = "relay", description = "Relay actuation, status, and audit log"),
        (name = "records", description = "Generic data records"),
        (name = "provisioning", description = "Idempotent table provisioning"),
    ),
    info(
        title = "Relay API",
        description = "IoT relay control and simulated sensor readings API",
        version = "0.1.0"
    )
)]
struct ApiDoc;

pub fn build_router(state: AppState) -> Router {
    let credential_routes = Router::new()
        .route("/register", post(credentials::register))
        .route("/login", post(credentials::login));

    let relay_routes = Router::new()
        .route("/turn-on", post(relay::turn_on))
        .route("/turn-off", post(relay::turn_off))
        .route("/status", get(relay::status))
        .route("/logs", get(relay::logs));

    // Legacy clients hit both the hyphenated and the squashed paths
    let record_routes = Router::new()
        .route("/save-data", post(records::save))
        .route("/savedata", post(records::save))
        .route("/get-data", get(records::list))
        .route("/getdata", get(records::list));

    let provision_routes = Router::new()
        .route("/create-table", post(provision::create_data_table))
        .route("/create-device-tables", post(provision::create_device_tables))
        .route("/delete-table", post(provision::delete_data_table));

    // Health check routes
    let health_routes = Router::new().route("/healthz", get(health::healthz));

    // OpenAPI documentation
    let docs_routes = Router::new().merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    // Combine all routes
    Router::new()
        .merge(credential_routes)
        .merge(relay_routes)
        .merge(record_routes)
        .merge(provision_routes)
        .merge(simulated::router())
        .merge(health_routes)
        .merge(docs_routes)
        .layer(RequestBodyLimitLayer::new(1024 * 1024)) // 1MB body limit
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
