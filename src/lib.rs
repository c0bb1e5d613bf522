pub mod appresult;
pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod relay;

use axum::{extract::FromRef, http::{header, HeaderValue, Method}, Router};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use appresult::{AppError, AppResult};
pub use config::Config;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub credentials: auth::Credentials,
    pub relay: relay::Relay,
}

pub fn app(app_state: AppState, allowed_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .merge(auth::router())
        .merge(relay::router())

        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Current UTC time as RFC 3339, the format messages carry on the wire.
pub fn timestamp() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}
