//! Server configuration.
//!
//! Every knob is a flag with an environment fallback and a stated default,
//! parsed once at startup and passed down explicitly. Nothing reads
//! configuration at request time.

use std::time::Duration;

use clap::Parser;

/// Command-line and environment configuration for the wiki front end.
#[derive(Parser, Debug, Clone)]
#[command(name = "wiki-web", about = "HTTP front end for the wiki storage component")]
pub struct ServerConfig {
    /// Port the HTTP server listens on.
    #[arg(long, env = "WIKI_HTTP_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Capacity of the storage request queue.
    #[arg(long, env = "WIKI_QUEUE_DEPTH", default_value_t = 32)]
    pub queue_depth: usize,

    /// How long to wait for a storage reply before failing the request,
    /// in milliseconds.
    #[arg(long, env = "WIKI_REPLY_TIMEOUT_MS", default_value_t = 5_000)]
    pub reply_timeout_ms: u64,
}

impl ServerConfig {
    pub fn reply_timeout(&self) -> Duration {
        Duration::from_millis(self.reply_timeout_ms)
    }
}
