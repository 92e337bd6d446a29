//! Scripted in-memory [`Transport`] for tests and offline demos.

use crate::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use tokio::sync::oneshot;

enum MockReply {
    Ready(Result<HttpResponse, TransportError>),
    Gated {
        gate: oneshot::Receiver<()>,
        reply: Result<HttpResponse, TransportError>,
    },
}

/// Releases a reply registered with [`MockTransport::respond_gated`].
#[derive(Debug)]
pub struct MockGate {
    tx: oneshot::Sender<()>,
}

impl MockGate {
    pub fn open(self) {
        let _ = self.tx.send(());
    }
}

#[derive(Default)]
struct MockInner {
    replies: HashMap<(HttpMethod, String), VecDeque<MockReply>>,
    fallbacks: HashMap<(HttpMethod, String), Result<HttpResponse, TransportError>>,
    history: Vec<HttpRequest>,
}

/// Replies are consumed in the order they were queued for each (method, URL).
/// When the queue is empty the fallback for that route is used, and without
/// one the request fails as if the server were unreachable.
#[derive(Default)]
pub struct MockTransport {
    inner: Mutex<MockInner>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(
        &self,
        method: HttpMethod,
        url: impl Into<String>,
        status: u16,
        body: impl Into<Vec<u8>>,
    ) {
        let reply = MockReply::Ready(Ok(HttpResponse::new(status, body)));
        self.push(method, url.into(), reply);
    }

    pub fn respond_json(
        &self,
        method: HttpMethod,
        url: impl Into<String>,
        status: u16,
        body: Value,
    ) {
        self.respond(method, url, status, body.to_string());
    }

    /// Answers every request on the route that has no queued reply.
    pub fn always_json(
        &self,
        method: HttpMethod,
        url: impl Into<String>,
        status: u16,
        body: Value,
    ) {
        let response = HttpResponse::new(status, body.to_string());
        self.inner
            .lock()
            .fallbacks
            .insert((method, url.into()), Ok(response));
    }

    pub fn fail(&self, method: HttpMethod, url: impl Into<String>, error: TransportError) {
        self.push(method, url.into(), MockReply::Ready(Err(error)));
    }

    pub fn unreachable(&self, method: HttpMethod, url: impl Into<String>) {
        let url = url.into();
        let error = TransportError::NoResponse {
            url: url.clone(),
            message: "connection refused".to_string(),
        };
        self.fail(method, url, error);
    }

    /// Queues a reply that is held back until the returned gate is opened.
    pub fn respond_gated(
        &self,
        method: HttpMethod,
        url: impl Into<String>,
        status: u16,
        body: Value,
    ) -> MockGate {
        let (tx, gate) = oneshot::channel();
        let reply = Ok(HttpResponse::new(status, body.to_string()));
        self.push(method, url.into(), MockReply::Gated { gate, reply });
        MockGate { tx }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.inner.lock().history.clone()
    }

    pub fn request_count(&self, method: HttpMethod, url: &str) -> usize {
        self.inner
            .lock()
            .history
            .iter()
            .filter(|request| request.method == method && request.url == url)
            .count()
    }

    pub fn clear_requests(&self) {
        self.inner.lock().history.clear();
    }

    fn push(&self, method: HttpMethod, url: String, reply: MockReply) {
        self.inner
            .lock()
            .replies
            .entry((method, url))
            .or_default()
            .push_back(reply);
    }

    fn next_reply(&self, request: &HttpRequest) -> MockReply {
        let mut inner = self.inner.lock();
        inner.history.push(request.clone());
        let route = (request.method, request.url.clone());
        if let Some(reply) = inner.replies.get_mut(&route).and_then(VecDeque::pop_front) {
            return reply;
        }
        let reply = inner.fallbacks.get(&route).cloned().unwrap_or_else(|| {
            Err(TransportError::NoResponse {
                url: request.url.clone(),
                message: format!("no mocked reply for {} {}", request.method, request.url),
            })
        });
        MockReply::Ready(reply)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        match self.next_reply(&request) {
            MockReply::Ready(reply) => reply,
            MockReply::Gated { gate, reply } => {
                // A dropped gate releases the reply as well.
                let _ = gate.await;
                reply
            }
        }
    }
}
