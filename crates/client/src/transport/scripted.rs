//! Scripted in-memory transport.
//!
//! Replays a fixed sequence of responses, one per call, and records every
//! request it receives. Intended for tests/dev; no network involved.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{HttpRequest, HttpResponse, Transport, TransportError};

type Reply = Result<HttpResponse, TransportError>;

#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Reply>>,
    /// Served once the script runs dry.
    fallback: Mutex<Option<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with a raw body.
    pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
        self.push(Ok(HttpResponse::new(status, body)));
        self
    }

    /// Queue a response with a JSON body.
    pub fn respond_json(self, status: u16, body: &Value) -> Self {
        self.respond(status, body.to_string())
    }

    /// Queue a network failure.
    pub fn fail(self, err: TransportError) -> Self {
        self.push(Err(err));
        self
    }

    /// Serve this response for every call after the script is exhausted.
    pub fn then_always(self, status: u16, body: impl Into<String>) -> Self {
        if let Ok(mut fallback) = self.fallback.lock() {
            *fallback = Some(HttpResponse::new(status, body));
        }
        self
    }

    /// Every request received so far, in call order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Target URLs of every request, in call order.
    pub fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }

    fn push(&self, reply: Reply) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(reply);
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests
            .lock()
            .map_err(|_| TransportError::Other("lock poisoned".to_string()))?
            .push(request);

        let next = self
            .script
            .lock()
            .map_err(|_| TransportError::Other("lock poisoned".to_string()))?
            .pop_front();

        match next {
            Some(reply) => reply,
            None => self
                .fallback
                .lock()
                .map_err(|_| TransportError::Other("lock poisoned".to_string()))?
                .clone()
                .ok_or_else(|| TransportError::Other("script exhausted".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_script_then_fallback() {
        let transport = ScriptedTransport::new()
            .respond(202, "{}")
            .then_always(500, "boom");

        let first = transport.send(HttpRequest::get("http://a/1/")).await.unwrap();
        let second = transport.send(HttpRequest::get("http://a/2/")).await.unwrap();
        let third = transport.send(HttpRequest::get("http://a/3/")).await.unwrap();

        assert_eq!(first.status, 202);
        assert_eq!(second, HttpResponse::new(500, "boom"));
        assert_eq!(third.status, 500);
        assert_eq!(transport.urls(), vec!["http://a/1/", "http://a/2/", "http://a/3/"]);
    }

    #[tokio::test]
    async fn exhausted_script_is_a_transport_error() {
        let transport = ScriptedTransport::new();
        let err = transport.send(HttpRequest::get("http://a/")).await.unwrap_err();
        assert_eq!(err, TransportError::Other("script exhausted".to_string()));
        assert_eq!(transport.call_count(), 1);
    }
}
