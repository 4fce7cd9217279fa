//! # Bridge Errors
//!
//! Failure taxonomy of the storage bridge. Transport failures (the channel
//! is gone, the reply never came) and storage-side rejections (missing id,
//! duplicate title) share one enum so callers pattern match in one place
//! when deciding HTTP consequences.

use std::time::Duration;

/// Errors a storage round trip can produce.
///
/// An absent page on `get-page` is NOT an error; it is reported through
/// [`GetPageReply::found`](crate::message::GetPageReply).
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The request could not be delivered: no storage actor is listening.
    #[error("storage channel closed")]
    ChannelClosed,
    /// Storage accepted the request but dropped the reply channel.
    #[error("storage dropped the reply channel")]
    ReplyDropped,
    /// No reply arrived within the configured window.
    #[error("no reply from storage within {0:?}")]
    ReplyTimeout(Duration),
    /// A mutation addressed a page id that does not exist.
    #[error("page not found: {0}")]
    NotFound(i64),
    /// `create-page` collided with an existing title.
    #[error("page title already exists: {0}")]
    DuplicateTitle(String),
}
