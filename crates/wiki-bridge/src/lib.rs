//! # Wiki Storage Bridge
//!
//! Asynchronous request/reply bridge between the wiki's stateless HTTP layer
//! and its storage component.
//!
//! ## Architecture
//!
//! The bridge separates three concerns:
//!
//! 1. **Contract** ([`message`]): the action payloads and replies, plus the
//!    tagged wire form that pins their JSON shape for interoperability.
//! 2. **Client** ([`client`]): the [`Storage`] trait (one typed async method
//!    per action) and [`StorageClient`], the mpsc + oneshot adapter behind it.
//! 3. **Responder** ([`store`]): [`PageStore`], a sequential in-memory actor
//!    honoring the contract, used by the standalone binary and by
//!    integration tests.
//!
//! ## Concurrency Model
//!
//! - The store runs in its own Tokio task and processes its mailbox
//!   sequentially, so it owns its state without locks.
//! - Clients are cheap clones of a sender. A call suspends only its own
//!   continuation while awaiting its oneshot reply; concurrent requests
//!   resume independently, with no ordering guarantee between them.
//! - Every round trip is bounded by a reply timeout so a silent storage
//!   component becomes a defined failure instead of a hung request.
//!
//! ## Testing
//!
//! [`mock::MockStorage`] implements [`Storage`] from a scripted expectation
//! queue and records every dispatched action in wire form, so callers can be
//! tested without spawning an actor and with failures injected at will.

pub mod client;
pub mod error;
pub mod message;
pub mod mock;
pub mod store;
pub mod tracing;

// Re-export core types for convenience
pub use client::{Storage, StorageClient};
pub use error::StorageError;
pub use message::{
    AllPagesReply, GetPageReply, NewPage, Page, Reply, StorageAction, StorageRequest, UpdatePage,
};
pub use store::PageStore;
