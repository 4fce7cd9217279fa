//! Tracing bootstrap shared by the binary and by tests that want log output.

/// Initializes structured logging with environment-based filtering.
///
/// Verbosity is controlled through `RUST_LOG`:
/// - `RUST_LOG=info`: lifecycle events and mutations
/// - `RUST_LOG=debug`: every dispatched action and reply
/// - `RUST_LOG=wiki_bridge=debug`: debug for the bridge only
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
