//! Scripted transport for testing without network access.
//!
//! Replies are served in order from a script; once the script runs out the
//! `then` reply is repeated. Every request is recorded so tests can assert
//! which attempts were made.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use futures::FutureExt;
use futures::future::BoxFuture;

use super::error::TransportError;
use super::http::{Transport, TransportRequest, TransportResponse};

/// What the mock does with one request.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return an HTTP response.
    Respond(TransportResponse),
    /// Fail at the transport level.
    Fail(String),
}

impl MockReply {
    /// Respond with a JSON body.
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        MockReply::Respond(TransportResponse::new(status, body.to_string()))
    }

    /// Respond with a raw text body.
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        MockReply::Respond(TransportResponse::new(status, body))
    }

    /// Fail as if the network call was rejected.
    pub fn fail(message: impl Into<String>) -> Self {
        MockReply::Fail(message.into())
    }
}

/// Transport that serves scripted replies.
#[derive(Debug)]
pub struct MockTransport {
    script: Mutex<VecDeque<MockReply>>,
    then: MockReply,
    requests: Mutex<Vec<TransportRequest>>,
}

impl MockTransport {
    /// Always give the same reply.
    pub fn always(reply: MockReply) -> Self {
        Self::scripted([], reply)
    }

    /// Serve `replies` in order, then repeat `then`.
    pub fn scripted(replies: impl IntoIterator<Item = MockReply>, then: MockReply) -> Self {
        Self {
            script: Mutex::new(replies.into_iter().collect()),
            then,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// All requests received so far, in order.
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// URLs requested so far, in order.
    pub fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }

    /// Number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn next_reply(&self) -> MockReply {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| self.then.clone())
    }
}

impl Transport for MockTransport {
    fn send(&self, request: TransportRequest) -> BoxFuture<'_, Result<TransportResponse, TransportError>> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        let reply = match self.next_reply() {
            MockReply::Respond(response) => Ok(response),
            MockReply::Fail(message) => Err(TransportError::Unreachable(message)),
        };
        futures::future::ready(reply).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::RequestMode;

    #[tokio::test]
    async fn scripted_then_repeat() {
        let mock = MockTransport::scripted(
            [MockReply::fail("down"), MockReply::text(200, "first")],
            MockReply::text(204, ""),
        );

        let req = || TransportRequest::get("http://example.test", RequestMode::Default);

        assert!(mock.send(req()).await.is_err());
        assert_eq!(mock.send(req()).await.unwrap().body, "first");
        assert_eq!(mock.send(req()).await.unwrap().status, 204);
        assert_eq!(mock.send(req()).await.unwrap().status, 204);
        assert_eq!(mock.request_count(), 4);
    }

    #[tokio::test]
    async fn records_requests() {
        let mock = MockTransport::always(MockReply::text(200, "ok"));
        mock.send(TransportRequest::get("http://a.test", RequestMode::Cors))
            .await
            .unwrap();
        mock.send(TransportRequest::get("http://b.test", RequestMode::Default))
            .await
            .unwrap();

        assert_eq!(mock.urls(), vec!["http://a.test", "http://b.test"]);
        assert_eq!(mock.requests()[0].mode, RequestMode::Cors);
    }
}
