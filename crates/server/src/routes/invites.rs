//! Team invitation function endpoint.
//!
//! Browser clients call this cross-origin, so the route carries its own CORS
//! layer: pre-flight `OPTIONS` requests are answered by the layer without
//! reaching the handler, and every response allows any origin.

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderName, Method, header},
    routing::post,
};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};

use crate::{services::NotifierError, state::AppState};

/// Path of the invitation endpoint.
pub const SEND_INVITE_PATH: &str = "/functions/v1/send-invite";

/// Build the invitations router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(SEND_INVITE_PATH, post(send_invite))
        .layer(cors_layer())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            header::CONTENT_TYPE,
        ])
}

/// Send one team invitation.
///
/// Responds with the provider's JSON body on success.
///
/// # Errors
///
/// Any failure becomes a 500 with `{"error": "<message>"}`.
pub async fn send_invite(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, NotifierError> {
    state.notifier().handle(&body).await.map(Json)
}
