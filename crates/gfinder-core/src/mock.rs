//! In-memory transport and save target for tests.
//!
//! Available under `cfg(test)` and with the `mock` feature.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use crate::download::{SaveError, SaveTarget};
use crate::transport::{HttpRequest, HttpResponse, Transport, TransportError};

/// Transport that records requests and replays queued outcomes in order.
///
/// When the queue is empty every call fails with
/// [`TransportError::NoResponse`].
#[derive(Debug, Default)]
pub struct MockTransport {
    outcomes: RefCell<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with a status and body.
    pub fn respond(self, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.respond_with(HttpResponse::new(status, body))
    }

    /// Queue a fully built response.
    pub fn respond_with(self, response: HttpResponse) -> Self {
        self.outcomes.borrow_mut().push_back(Ok(response));
        self
    }

    /// Queue a transport failure.
    pub fn fail(self, err: TransportError) -> Self {
        self.outcomes.borrow_mut().push_back(Err(err));
        self
    }

    /// Every request sent so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    /// The most recent request.
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.borrow().last().cloned()
    }
}

impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request);
        self.outcomes
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::NoResponse("no mocked response".into())))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum FailAt {
    #[default]
    Never,
    Blob,
    Trigger,
}

/// Save target that keeps saved files in memory and counts object URLs.
#[derive(Debug, Default)]
pub struct RecordingSaveTarget {
    fail_at: FailAt,
    next_id: Cell<u32>,
    blobs: RefCell<Vec<(u32, Vec<u8>, Option<String>)>>,
    saved: RefCell<Vec<(String, Vec<u8>)>>,
    revoked: RefCell<Vec<u32>>,
}

impl RecordingSaveTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// A target whose blob creation always fails.
    pub fn failing_blob() -> Self {
        Self {
            fail_at: FailAt::Blob,
            ..Self::default()
        }
    }

    /// A target whose save trigger always fails.
    pub fn failing_trigger() -> Self {
        Self {
            fail_at: FailAt::Trigger,
            ..Self::default()
        }
    }

    /// `(filename, bytes)` for each triggered save.
    pub fn saved(&self) -> Vec<(String, Vec<u8>)> {
        self.saved.borrow().clone()
    }

    /// Content types passed to blob creation.
    pub fn content_types(&self) -> Vec<Option<String>> {
        self.blobs.borrow().iter().map(|(_, _, ct)| ct.clone()).collect()
    }

    /// Number of object URLs created.
    pub fn created(&self) -> usize {
        self.blobs.borrow().len()
    }

    /// Number of object URLs revoked.
    pub fn revoked(&self) -> usize {
        self.revoked.borrow().len()
    }
}

impl SaveTarget for RecordingSaveTarget {
    type ObjectUrl = u32;

    fn create_object_url(&self, bytes: &[u8], content_type: Option<&str>) -> Result<u32, SaveError> {
        if self.fail_at == FailAt::Blob {
            return Err(SaveError::Blob("mock blob failure".into()));
        }
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.blobs
            .borrow_mut()
            .push((id, bytes.to_vec(), content_type.map(str::to_string)));
        Ok(id)
    }

    fn trigger_save(&self, url: &u32, filename: &str) -> Result<(), SaveError> {
        if self.fail_at == FailAt::Trigger {
            return Err(SaveError::Trigger("mock trigger failure".into()));
        }
        assert!(
            !self.revoked.borrow().contains(url),
            "save triggered on revoked object URL"
        );
        let blobs = self.blobs.borrow();
        let bytes = blobs
            .iter()
            .find(|(id, _, _)| id == url)
            .map(|(_, bytes, _)| bytes.clone())
            .ok_or_else(|| SaveError::Trigger(format!("unknown object URL {url}")))?;
        self.saved.borrow_mut().push((filename.to_string(), bytes));
        Ok(())
    }

    fn revoke_object_url(&self, url: u32) {
        let mut revoked = self.revoked.borrow_mut();
        assert!(!revoked.contains(&url), "object URL {url} revoked twice");
        revoked.push(url);
    }
}
