use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::state::AppState;
use crate::translate::{ErrorResponse, TranslateError, TranslateResponse};

/// Request headers browsers may send cross-origin
pub const ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/translate", post(translate))
        .route("/api/health", get(health_check))
        .fallback(not_found)
}

/// Permissive CORS: preflight for any path answers 200 with an empty body
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            header::CONTENT_TYPE,
        ])
}

/// Repeats the allowed-headers list on non-preflight responses
pub fn allow_headers_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::if_not_present(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    )
}

async fn translate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<TranslateResponse>, TranslateError> {
    let results = state.translator.handle_body(&body).await.map_err(|e| {
        tracing::error!("Translation error: {}", e);
        e
    })?;
    Ok(Json(TranslateResponse { results }))
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "model_configured": state.translator.is_configured(),
        "expected_languages": state
            .translator
            .expected_languages()
            .iter()
            .map(|l| l.code.as_str())
            .collect::<Vec<_>>(),
    }))
}

async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Not found".to_string(),
        }),
    )
}
