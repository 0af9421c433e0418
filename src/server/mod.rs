//! HTTP surface of the job board.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

use anyhow::{Context, Result};
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;

pub use state::AppState;

/// Build the router. Routes above the auth layer require a bearer token.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/jobs/post", post(handlers::jobs::post))
        .route("/jobs/apply", post(handlers::jobs::apply))
        .route("/account", get(handlers::account::me))
        .route("/account/transactions", get(handlers::account::transactions))
        .layer(from_fn_with_state(state.clone(), middleware::authenticate))
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/jobs", get(handlers::jobs::list))
        .route("/jobs/{id}", get(handlers::jobs::show))
        .route("/healthz", get(handlers::probes::healthz))
        .with_state(state)
}

/// Serve on an already bound listener until ctrl-c.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let addr = listener.local_addr().context("Listener has no local address")?;
    tracing::info!("listening on {}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
