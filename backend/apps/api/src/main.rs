//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use axum::{Router, http::Method};
use cards::{CardsConfig, GithubSource, WakaTimeClient, cards_router};
use platform::credentials::CredentialPool;
use platform::github::GithubClient;
use platform::retry::RateLimitRetrier;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowMethods, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:9000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,cards=info,platform=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // GitHub tokens
    let pool = CredentialPool::from_env();
    if pool.is_empty() {
        // GitHub cards answer 500 until tokens are configured
        tracing::warn!("No PAT_<n> tokens found, GitHub cards will fail");
    } else {
        tracing::info!(tokens = pool.len(), "Loaded GitHub tokens");
    }

    let config = CardsConfig::from_env();
    let retrier = RateLimitRetrier::new(Arc::new(pool));
    let github = GithubSource::new(retrier, GithubClient::new()?);
    let wakatime = WakaTimeClient::new()?;

    // Cards are embedded from arbitrary pages
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(AllowMethods::list([Method::GET, Method::OPTIONS]));

    // Build router
    let app = Router::new()
        .nest("/api", cards_router(github, wakatime, config))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
