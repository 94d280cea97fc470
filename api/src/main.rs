//! Membership API Server
//!
//! Creates and lists memberships together with their generated billing periods.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod config;
mod domain;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::JsonMembershipRepository;
use app::{CreateMembership, ListMemberships};
use config::Config;
use domain::ports::SystemClock;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub create_membership: Arc<CreateMembership<JsonMembershipRepository, SystemClock>>,
    pub list_memberships: Arc<ListMemberships<JsonMembershipRepository, SystemClock>>,
    pub config: Config,
}

impl AppState {
    pub fn new(membership_repo: Arc<JsonMembershipRepository>, config: Config) -> Self {
        let clock = Arc::new(SystemClock);

        Self {
            create_membership: Arc::new(CreateMembership::new(
                membership_repo.clone(),
                clock.clone(),
            )),
            list_memberships: Arc::new(ListMemberships::new(membership_repo, clock)),
            config,
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the HTTP router
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check (no caller context)
        .route("/health", get(health))
        // Membership endpoints (caller context required)
        .merge(
            Router::new()
                .route(
                    "/memberships",
                    get(handlers::list_memberships).post(handlers::create_membership),
                )
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth::caller_context_middleware,
                )),
        )
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,membership_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Membership API...");

    // Load configuration
    let config = Config::from_env();

    // Open the flat-file store
    let membership_repo = Arc::new(
        JsonMembershipRepository::open(&config.data_dir)
            .await
            .with_context(|| format!("Failed to open data dir {}", config.data_dir.display()))?,
    );

    let state = AppState::new(membership_repo, config.clone());
    let app = router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
