#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
// easier to use when using the functions as callback of foreign functions
#![allow(clippy::needless_pass_by_value)]

use anyhow::Context;
use anyhow::Result;
use axum::Extension;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::prelude::*;

use crate::api::router;
use crate::api::ApiToken;
use crate::storage::Storage;

mod api;
mod folders;
mod graceful_shutdown;
mod notes;
mod sanitize;
mod storage;
#[cfg(test)]
mod tests;

const DEFAULT_RUST_LOG: &str = "noteful=debug,tower_http=debug";
const DEFAULT_ADDRESS: &str = "0.0.0.0:8000";

#[tokio::main]
async fn main() -> Result<()> {
    setup_environment();
    setup_tracing();

    let app = setup_app().await?;

    let address = setup_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Could not bind to {address}"))?;
    tracing::info!("Listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(graceful_shutdown::handler())
        .await?;

    Ok(())
}

/// Create and setup the app with its dependencies
///
/// # Errors
///
/// Will return `Err` if any of its dependencies fail to load:
/// - Database connection
/// - The configured API token
pub async fn setup_app() -> Result<Router> {
    let storage = storage::setup().await;
    let api_token = setup_api_token()?;

    Ok(create_router(storage, api_token))
}

/// Create the router for Noteful
fn create_router<S: Storage>(storage: S, api_token: ApiToken) -> Router {
    Router::new()
        .nest("/api", router::<S>())
        .layer(TraceLayer::new_for_http())
        .layer(Extension(storage))
        .layer(Extension(api_token))
}

fn setup_environment() {
    dotenvy::dotenv().ok();
}

fn setup_tracing() {
    use tracing_subscriber::fmt;
    use tracing_subscriber::registry;
    use tracing_subscriber::EnvFilter;

    registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_RUST_LOG.into()),
        ))
        .with(fmt::layer())
        .init();
}

fn setup_api_token() -> Result<ApiToken> {
    let api_token = std::env::var("API_TOKEN").context("`API_TOKEN` must be set")?;

    Ok(ApiToken::new(api_token))
}

fn setup_address() -> String {
    // an empty `ADDRESS` counts as unset
    let mut address = match std::env::var("ADDRESS") {
        Ok(address) if !address.is_empty() => address,
        _ => String::from(DEFAULT_ADDRESS),
    };

    // optional override of just the port
    if let Ok(port) = std::env::var("PORT") {
        // only check non-empty strings
        if !port.is_empty() {
            if let Some((host, _)) = address.rsplit_once(':') {
                address = format!("{host}:{port}");
            }
        }
    }

    address
}
