#![allow(missing_docs)]
use std::net::SocketAddr;

use anyhow::Context;
use tower_http::trace::TraceLayer;
use tracing::info;

mod auth;
mod errors;
mod extractors;
mod routes;
mod state;

mod bookings;

pub use self::auth::Credentials;
pub use self::state::AppState;

use self::routes::app_router;

/// Bind `addr` and serve the booking API until the process stops.
///
/// # Errors
///
/// Fails when the address cannot be bound, or when serving stops on an I/O error.
pub async fn run(addr: SocketAddr, credentials: Credentials) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "booking API listening");

    launch(listener, credentials).await
}

/// Serve the booking API on an already bound listener, with an empty store.
///
/// # Errors
///
/// Fails when serving stops on an I/O error.
pub async fn launch(
    listener: tokio::net::TcpListener,
    credentials: Credentials,
) -> anyhow::Result<()> {
    let state = AppState::new(credentials);
    let app = app_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    axum::serve(listener, app.into_make_service())
        .await
        .context("serving booking API")?;

    Ok(())
}
