//! # Mock Storage
//!
//! [`MockStorage`] implements the [`Storage`] trait from a scripted queue of
//! expectations, entirely in memory. Handler tests use it to make storage
//! answer deterministically, and to inject the failures that are hard to
//! reproduce with a real actor (a closed channel, a timed-out reply).
//!
//! Expectations are consumed in FIFO order: script them in the order the
//! code under test will dispatch. Every call is also recorded in its wire
//! form, so a test can assert not just what came back but which action was
//! sent. `verify()` panics if the script was not fully consumed.
//!
//! ```ignore
//! let mock = MockStorage::new();
//! mock.expect_get_page().return_ok(GetPageReply {
//!     found: false,
//!     id: None,
//!     raw_content: None,
//! });
//!
//! let storage: Arc<dyn Storage> = Arc::new(mock.clone());
//! // ... drive the code under test ...
//!
//! assert_eq!(mock.calls()[0], StorageAction::GetPage { page: "Home".into() });
//! mock.verify();
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::client::Storage;
use crate::error::StorageError;
use crate::message::{AllPagesReply, GetPageReply, NewPage, StorageAction, UpdatePage};

/// One scripted reply, tagged with the action it answers.
#[derive(Debug)]
enum Expectation {
    GetPage(Result<GetPageReply, StorageError>),
    AllPages(Result<AllPagesReply, StorageError>),
    CreatePage(Result<(), StorageError>),
    SavePage(Result<(), StorageError>),
    DeletePage(Result<(), StorageError>),
}

impl Expectation {
    fn tag(&self) -> &'static str {
        match self {
            Expectation::GetPage(_) => "get-page",
            Expectation::AllPages(_) => "all-pages",
            Expectation::CreatePage(_) => "create-page",
            Expectation::SavePage(_) => "save-page",
            Expectation::DeletePage(_) => "delete-page",
        }
    }
}

/// Scripted [`Storage`] implementation for tests.
///
/// Cheap to clone; clones share the same script and call log, so a test can
/// hand one clone to the code under test and keep another for assertions.
#[derive(Clone, Default)]
pub struct MockStorage {
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
    calls: Arc<Mutex<Vec<StorageAction>>>,
}

/// Fluent tail of an `expect_*` call: pick the scripted outcome.
pub struct ExpectationBuilder<T> {
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
    wrap: fn(Result<T, StorageError>) -> Expectation,
}

impl<T> ExpectationBuilder<T> {
    /// Script a successful reply.
    pub fn return_ok(self, value: T) {
        let mut queue = self.expectations.lock().unwrap();
        queue.push_back((self.wrap)(Ok(value)));
    }

    /// Script a failure.
    pub fn return_err(self, error: StorageError) {
        let mut queue = self.expectations.lock().unwrap();
        queue.push_back((self.wrap)(Err(error)));
    }
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expect the next dispatched action to be `get-page`.
    pub fn expect_get_page(&self) -> ExpectationBuilder<GetPageReply> {
        self.builder(Expectation::GetPage)
    }

    /// Expect the next dispatched action to be `all-pages`.
    pub fn expect_all_pages(&self) -> ExpectationBuilder<AllPagesReply> {
        self.builder(Expectation::AllPages)
    }

    /// Expect the next dispatched action to be `create-page`.
    pub fn expect_create_page(&self) -> ExpectationBuilder<()> {
        self.builder(Expectation::CreatePage)
    }

    /// Expect the next dispatched action to be `save-page`.
    pub fn expect_save_page(&self) -> ExpectationBuilder<()> {
        self.builder(Expectation::SavePage)
    }

    /// Expect the next dispatched action to be `delete-page`.
    pub fn expect_delete_page(&self) -> ExpectationBuilder<()> {
        self.builder(Expectation::DeletePage)
    }

    /// Every action dispatched so far, in wire form and call order.
    pub fn calls(&self) -> Vec<StorageAction> {
        self.calls.lock().unwrap().clone()
    }

    /// Panics unless every scripted expectation was consumed.
    pub fn verify(&self) {
        let queue = self.expectations.lock().unwrap();
        if !queue.is_empty() {
            panic!("{} scripted storage expectation(s) never consumed", queue.len());
        }
    }

    fn builder<T>(
        &self,
        wrap: fn(Result<T, StorageError>) -> Expectation,
    ) -> ExpectationBuilder<T> {
        ExpectationBuilder {
            expectations: self.expectations.clone(),
            wrap,
        }
    }

    fn record(&self, action: StorageAction) {
        self.calls.lock().unwrap().push(action);
    }

    fn next(&self, requested: &'static str) -> Expectation {
        let mut queue = self.expectations.lock().unwrap();
        match queue.pop_front() {
            Some(expectation) => {
                if expectation.tag() != requested {
                    panic!(
                        "storage received {requested} but the script expected {}",
                        expectation.tag()
                    );
                }
                expectation
            }
            None => panic!("storage received {requested} but the script is empty"),
        }
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn get_page(&self, title: &str) -> Result<GetPageReply, StorageError> {
        self.record(StorageAction::GetPage {
            page: title.to_string(),
        });
        match self.next("get-page") {
            Expectation::GetPage(result) => result,
            _ => unreachable!(),
        }
    }

    async fn all_pages(&self) -> Result<AllPagesReply, StorageError> {
        self.record(StorageAction::AllPages);
        match self.next("all-pages") {
            Expectation::AllPages(result) => result,
            _ => unreachable!(),
        }
    }

    async fn create_page(&self, draft: NewPage) -> Result<(), StorageError> {
        self.record(StorageAction::CreatePage {
            title: draft.title,
            markdown: draft.markdown,
        });
        match self.next("create-page") {
            Expectation::CreatePage(result) => result,
            _ => unreachable!(),
        }
    }

    async fn save_page(&self, draft: UpdatePage) -> Result<(), StorageError> {
        self.record(StorageAction::SavePage {
            id: draft.id,
            title: draft.title,
            markdown: draft.markdown,
        });
        match self.next("save-page") {
            Expectation::SavePage(result) => result,
            _ => unreachable!(),
        }
    }

    async fn delete_page(&self, id: i64) -> Result<(), StorageError> {
        self.record(StorageAction::DeletePage { id });
        match self.next("delete-page") {
            Expectation::DeletePage(result) => result,
            _ => unreachable!(),
        }
    }
}
