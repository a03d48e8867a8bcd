//! # translate-bridge
//!
//! Language detection and English translation for user-entered marketplace
//! text, backed by a hosted language model.
//!
//! - [`translate::TranslationService`] answers `POST /translate` with one
//!   model call per batch.
//! - [`translate::TranslationClient`] batches form fields into that
//!   endpoint and never fails; when the service is unavailable the original
//!   text is kept.
//! - [`records`] writes the result of each save as provenance triples
//!   (`<field>`, `<field>_original`, `<field>_language`).

pub mod agent;
pub mod config_manager;
pub mod records;
pub mod routes;
pub mod state;
pub mod translate;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the HTTP application with CORS and request tracing
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::create_routes())
        .layer(routes::allow_headers_layer())
        .layer(routes::cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
