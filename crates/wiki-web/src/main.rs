//! wiki-web entrypoint.
//!
//! Parses configuration, initializes tracing, then hands off to the server
//! module. Keep this file minimal; the application lives in the library.

use clap::Parser;
use tracing::info;

use wiki_web::config::ServerConfig;
use wiki_web::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    wiki_bridge::tracing::setup_tracing();

    info!(
        port = config.port,
        queue_depth = config.queue_depth,
        reply_timeout_ms = config.reply_timeout_ms,
        "starting wiki front end"
    );

    server::serve(config).await
}
