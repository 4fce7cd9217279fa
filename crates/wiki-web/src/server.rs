//! Router construction and the serve loop.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use wiki_bridge::PageStore;

use crate::config::ServerConfig;
use crate::handlers::{self, AppState};
use crate::render::PageRenderer;

/// Build the axum router with every wiki route.
///
/// Public so integration tests can drive it with `tower::ServiceExt::oneshot`
/// against any `AppState` they assemble. Anything outside this table falls
/// through to axum's default 404.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/wiki", post(handlers::create_page))
        .route(
            "/wiki/{page}",
            get(handlers::view_page).post(handlers::update_page),
        )
        .route("/delete/{id}", post(handlers::delete_page))
        .with_state(state)
}

/// Start the wiki front end: spawn the storage actor, wire the bridge client
/// into the router, and serve HTTP until the process stops.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let (store, client) = PageStore::new(config.queue_depth, config.reply_timeout());
    tokio::spawn(store.run());

    let state = AppState::new(Arc::new(client), PageRenderer::new()?);
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(port = config.port, "wiki front end listening");

    axum::serve(listener, app).await?;
    Ok(())
}
