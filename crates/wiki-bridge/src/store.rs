//! # Page Store Actor
//!
//! Reference in-memory implementation of the storage side of the bridge.
//!
//! The store owns its state outright and processes requests sequentially
//! from its mailbox, so there are no locks: exclusive ownership inside one
//! task is the whole concurrency story. Production deployments put a real
//! storage engine behind the same [`StorageRequest`] contract; this actor
//! exists so the binary runs standalone and integration tests can exercise
//! every action end to end.
//!
//! The loop exits when every client clone has been dropped, which is the
//! shutdown signal for the whole bridge.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::client::StorageClient;
use crate::error::StorageError;
use crate::message::{AllPagesReply, GetPageReply, NewPage, Page, StorageRequest, UpdatePage};

/// Sequential actor holding every wiki page in memory.
pub struct PageStore {
    receiver: mpsc::Receiver<StorageRequest>,
    pages: HashMap<i64, Page>,
    next_id: i64,
}

impl PageStore {
    /// Create a store and the client wired to it.
    ///
    /// `queue_depth` is the mailbox capacity: senders wait when it is full.
    /// `reply_timeout` is handed to the returned client and bounds every
    /// round trip made through it.
    pub fn new(queue_depth: usize, reply_timeout: Duration) -> (Self, StorageClient) {
        let (sender, receiver) = mpsc::channel(queue_depth);
        let store = Self {
            receiver,
            pages: HashMap::new(),
            next_id: 1,
        };
        (store, StorageClient::new(sender, reply_timeout))
    }

    /// Run the mailbox loop until the channel closes.
    pub async fn run(mut self) {
        info!("page store started");

        while let Some(request) = self.receiver.recv().await {
            match request {
                StorageRequest::GetPage { page, respond_to } => {
                    let reply = self.lookup(&page);
                    debug!(title = %page, found = reply.found, "get-page");
                    let _ = respond_to.send(Ok(reply));
                }
                StorageRequest::AllPages { respond_to } => {
                    let reply = self.index();
                    debug!(count = reply.pages.len(), "all-pages");
                    let _ = respond_to.send(Ok(reply));
                }
                StorageRequest::CreatePage { draft, respond_to } => {
                    let _ = respond_to.send(self.create(draft));
                }
                StorageRequest::SavePage { draft, respond_to } => {
                    let _ = respond_to.send(self.save(draft));
                }
                StorageRequest::DeletePage { id, respond_to } => {
                    let _ = respond_to.send(self.delete(id));
                }
            }
        }

        info!(pages = self.pages.len(), "page store shut down");
    }

    fn lookup(&self, title: &str) -> GetPageReply {
        match self.pages.values().find(|p| p.title == title) {
            Some(page) => GetPageReply {
                found: true,
                id: Some(page.id),
                raw_content: Some(page.raw_markdown.clone()),
            },
            None => GetPageReply {
                found: false,
                id: None,
                raw_content: None,
            },
        }
    }

    fn index(&self) -> AllPagesReply {
        let mut titles: Vec<String> = self.pages.values().map(|p| p.title.clone()).collect();
        titles.sort();
        AllPagesReply { pages: titles }
    }

    fn create(&mut self, draft: NewPage) -> Result<(), StorageError> {
        if self.pages.values().any(|p| p.title == draft.title) {
            warn!(title = %draft.title, "create-page rejected, duplicate title");
            return Err(StorageError::DuplicateTitle(draft.title));
        }
        let id = self.next_id;
        self.next_id += 1;
        self.pages.insert(
            id,
            Page {
                id,
                title: draft.title,
                raw_markdown: draft.markdown,
            },
        );
        info!(id, pages = self.pages.len(), "create-page");
        Ok(())
    }

    fn save(&mut self, draft: UpdatePage) -> Result<(), StorageError> {
        match self.pages.get_mut(&draft.id) {
            Some(page) => {
                // Saving overwrites content only; the title is the URL key
                // and never changes after creation.
                page.raw_markdown = draft.markdown;
                info!(id = draft.id, "save-page");
                Ok(())
            }
            None => {
                warn!(id = draft.id, "save-page rejected, unknown id");
                Err(StorageError::NotFound(draft.id))
            }
        }
    }

    fn delete(&mut self, id: i64) -> Result<(), StorageError> {
        match self.pages.remove(&id) {
            Some(page) => {
                info!(id, title = %page.title, pages = self.pages.len(), "delete-page");
                Ok(())
            }
            None => {
                warn!(id, "delete-page rejected, unknown id");
                Err(StorageError::NotFound(id))
            }
        }
    }
}
