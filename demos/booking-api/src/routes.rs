use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tracing::debug;

use crate::auth::login;
use crate::bookings::booking_router;
use crate::state::AppState;

pub(crate) fn app_router() -> Router<AppState> {
    Router::new()
        .route("/ping", get(ping))
        .route("/auth", post(login))
        .merge(booking_router())
}

/// Health check, restful-booker answers 201
async fn ping(State(state): State<AppState>) -> (StatusCode, &'static str) {
    debug!(uptime = ?state.uptime(), "ping");
    (StatusCode::CREATED, "Created")
}
