//! # Storage Client
//!
//! The client side of the bridge: the [`Storage`] trait handlers program
//! against, and [`StorageClient`], the channel-backed adapter that implements
//! it.
//!
//! Every trait method is one storage round trip. The call sends an envelope
//! over the shared mpsc channel and suspends only the calling request's
//! continuation until its own oneshot reply resolves; concurrent requests
//! stay in flight independently and resume in whatever order their replies
//! arrive. The bridge itself never retries. A reply timeout bounds how long
//! a caller can hang on a storage component that went silent.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio::time;
use tracing::{debug, instrument};

use crate::error::StorageError;
use crate::message::{AllPagesReply, GetPageReply, NewPage, StorageRequest, UpdatePage};

/// Interface to the storage component: one strongly-typed async method per
/// storage action.
///
/// The HTTP layer depends on this trait, not on a transport, so tests swap
/// in [`MockStorage`](crate::mock::MockStorage) and production wiring uses
/// [`StorageClient`].
#[async_trait]
pub trait Storage: Send + Sync {
    /// Look a page up by title. An absent page is a `found = false` reply,
    /// not an error.
    async fn get_page(&self, title: &str) -> Result<GetPageReply, StorageError>;

    /// List every page title, in storage order.
    async fn all_pages(&self) -> Result<AllPagesReply, StorageError>;

    /// Create a page. Storage assigns the id and rejects duplicate titles.
    async fn create_page(&self, draft: NewPage) -> Result<(), StorageError>;

    /// Overwrite the markdown of an existing page.
    async fn save_page(&self, draft: UpdatePage) -> Result<(), StorageError>;

    /// Remove a page by id.
    async fn delete_page(&self, id: i64) -> Result<(), StorageError>;
}

/// Channel-backed [`Storage`] adapter.
///
/// Holds only a sender and the reply timeout, so cloning is cheap and one
/// client can be shared across every request handler. Both values are passed
/// in explicitly at construction; nothing is read from ambient configuration
/// at call time.
#[derive(Clone)]
pub struct StorageClient {
    sender: mpsc::Sender<StorageRequest>,
    reply_timeout: Duration,
}

impl StorageClient {
    pub fn new(sender: mpsc::Sender<StorageRequest>, reply_timeout: Duration) -> Self {
        Self {
            sender,
            reply_timeout,
        }
    }

    /// Send one envelope and await its reply.
    ///
    /// Maps the three transport failures: a dead channel, a dropped reply
    /// sender, and a reply that never arrives in time.
    async fn round_trip<T>(
        &self,
        request: StorageRequest,
        response: oneshot::Receiver<Result<T, StorageError>>,
    ) -> Result<T, StorageError> {
        self.sender
            .send(request)
            .await
            .map_err(|_| StorageError::ChannelClosed)?;
        match time::timeout(self.reply_timeout, response).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(_)) => Err(StorageError::ReplyDropped),
            Err(_) => Err(StorageError::ReplyTimeout(self.reply_timeout)),
        }
    }
}

#[async_trait]
impl Storage for StorageClient {
    #[instrument(skip(self))]
    async fn get_page(&self, title: &str) -> Result<GetPageReply, StorageError> {
        debug!(action = "get-page", "dispatching");
        let (respond_to, response) = oneshot::channel();
        self.round_trip(
            StorageRequest::GetPage {
                page: title.to_string(),
                respond_to,
            },
            response,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn all_pages(&self) -> Result<AllPagesReply, StorageError> {
        debug!(action = "all-pages", "dispatching");
        let (respond_to, response) = oneshot::channel();
        self.round_trip(StorageRequest::AllPages { respond_to }, response)
            .await
    }

    #[instrument(skip(self, draft), fields(title = %draft.title))]
    async fn create_page(&self, draft: NewPage) -> Result<(), StorageError> {
        debug!(action = "create-page", "dispatching");
        let (respond_to, response) = oneshot::channel();
        self.round_trip(StorageRequest::CreatePage { draft, respond_to }, response)
            .await
    }

    #[instrument(skip(self, draft), fields(id = draft.id))]
    async fn save_page(&self, draft: UpdatePage) -> Result<(), StorageError> {
        debug!(action = "save-page", "dispatching");
        let (respond_to, response) = oneshot::channel();
        self.round_trip(StorageRequest::SavePage { draft, respond_to }, response)
            .await
    }

    #[instrument(skip(self))]
    async fn delete_page(&self, id: i64) -> Result<(), StorageError> {
        debug!(action = "delete-page", "dispatching");
        let (respond_to, response) = oneshot::channel();
        self.round_trip(StorageRequest::DeletePage { id, respond_to }, response)
            .await
    }
}
