//! # Storage Messages
//!
//! This module defines the message contract between the HTTP front end and
//! the storage component.
//!
//! Two layers live here:
//!
//! - [`StorageAction`] is the **wire form**: a tagged representation of every
//!   request this front end can address to storage. Its serde attributes pin
//!   the JSON shape (`action` tag plus payload fields), so any adapter that
//!   carries requests over a serialized transport interoperates with any
//!   storage implementation speaking the same contract. The enum also means a
//!   request always carries exactly one recognized tag; an unknown tag cannot
//!   be constructed.
//! - [`StorageRequest`] is the **channel envelope** used by the in-process
//!   transport: one variant per action, each carrying its payload and a typed
//!   `oneshot` sender for the reply. Replies are per-request, so a mismatch
//!   between an action and its reply shape is impossible by construction.
//!
//! Requests and replies are created per HTTP request and dropped once the
//! response is written. Nothing here is cached or persisted.

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::error::StorageError;

/// One-shot reply channel carried inside a [`StorageRequest`].
pub type Reply<T> = oneshot::Sender<Result<T, StorageError>>;

/// A wiki page as storage holds it. Identity is `id`; `title` is the
/// human-facing key used in URLs and is unique among existing pages
/// (uniqueness is the storage side's job, not the front end's).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub id: i64,
    pub title: String,
    pub raw_markdown: String,
}

/// Payload of the `create-page` action. A new page has no id yet; storage
/// assigns one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPage {
    pub title: String,
    pub markdown: String,
}

/// Payload of the `save-page` action. The `title` field rides along for
/// contract fidelity but saving never renames a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePage {
    pub id: i64,
    pub title: String,
    pub markdown: String,
}

/// Reply to `get-page`. An absent page is not an error: it comes back as
/// `found = false` with no id and no content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetPageReply {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "rawContent", skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,
}

/// Reply to `all-pages`: page titles in the order storage returns them.
/// Callers preserve this order verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllPagesReply {
    pub pages: Vec<String>,
}

/// The tagged wire form of every storage action.
///
/// Serialization is the interoperability boundary: `action` carries the tag
/// and the payload fields sit beside it, e.g.
/// `{"action":"get-page","page":"Home"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum StorageAction {
    GetPage { page: String },
    AllPages,
    CreatePage { title: String, markdown: String },
    SavePage { id: i64, title: String, markdown: String },
    DeletePage { id: i64 },
}

/// Channel envelope sent to the storage actor.
///
/// Each variant pairs an action payload with the typed reply sender for that
/// action, the same shape a generic resource actor uses for its mailbox.
#[derive(Debug)]
pub enum StorageRequest {
    GetPage {
        page: String,
        respond_to: Reply<GetPageReply>,
    },
    AllPages {
        respond_to: Reply<AllPagesReply>,
    },
    CreatePage {
        draft: NewPage,
        respond_to: Reply<()>,
    },
    SavePage {
        draft: UpdatePage,
        respond_to: Reply<()>,
    },
    DeletePage {
        id: i64,
        respond_to: Reply<()>,
    },
}
