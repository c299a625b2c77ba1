//! Poll-until-ready retrieval for endpoints the registry may compute lazily.
//!
//! A 200 carries the result. A 202 means the registry is still working; its
//! body names where to ask next (`{"url": ...}`), and the poller waits one
//! interval before asking there. The loop is bounded by the client's
//! `PollPolicy` and can be cancelled through a `CancelToken`.

use std::future::Future;

use goat_core::{DecodeError, Resource, parse_body};
use reqwest::Url;
use serde_json::Value;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::config::ClientConfig;
use crate::context::CallContext;
use crate::error::{ClientError, ClientResult};
use crate::transport::{HttpRequest, Transport};

const STATUS_OK: u16 = 200;
const STATUS_ACCEPTED: u16 = 202;

/// Owner side of a cancellation signal.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: self.tx.subscribe(),
        }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Observer side of a cancellation signal; cheap to clone.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancelled. Never resolves if the handle is dropped
    /// without cancelling.
    pub async fn cancelled(&mut self) {
        if self.rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Runs the 202 poll protocol against one pollable endpoint.
pub struct AsyncSearchPoller<'a> {
    config: &'a ClientConfig,
    transport: &'a dyn Transport,
    cancel: Option<CancelToken>,
}

impl<'a> AsyncSearchPoller<'a> {
    pub fn new(config: &'a ClientConfig, transport: &'a dyn Transport) -> Self {
        Self {
            config,
            transport,
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// GET `url` with `query` until the registry answers 200, then decode the
    /// array into `R`.
    ///
    /// Every attempt carries the same query and headers; only the URL follows
    /// the continuation named by each 202.
    pub async fn fetch<R: Resource>(
        &self,
        url: String,
        query: Vec<(String, String)>,
    ) -> ClientResult<Vec<R>> {
        let ctx = CallContext::new(self.config);
        let span = info_span!(
            "registry_call",
            op = "poll",
            resource = R::ENDPOINT,
            request_id = %ctx.request_id()
        );

        self.run::<R>(ctx, url, query).instrument(span).await
    }

    async fn run<R: Resource>(
        &self,
        ctx: CallContext,
        url: String,
        query: Vec<(String, String)>,
    ) -> ClientResult<Vec<R>> {
        let policy = *self.config.poll();
        let started = Instant::now();
        let mut target = url;
        let mut attempts: u32 = 0;

        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(ClientError::Cancelled { attempts });
        }

        loop {
            attempts += 1;
            debug!(attempt = attempts, url = %target, "GET pollable endpoint");

            let request = ctx.apply(HttpRequest::get(target.clone()).with_query(&query));
            let response = self
                .guard(self.transport.send(request), attempts)
                .await??;

            match response.status {
                STATUS_OK => {
                    let items = R::decode_list(&parse_body(&response.body)?)?;
                    info!(attempts, count = items.len(), "poll complete");
                    return Ok(items);
                }
                STATUS_ACCEPTED => {
                    let next = continuation(&response.body, &target)?;

                    let out_of_attempts = attempts >= policy.max_attempts;
                    let out_of_time = policy
                        .max_elapsed
                        .is_some_and(|max| started.elapsed() + policy.interval > max);
                    if out_of_attempts || out_of_time {
                        warn!(attempts, "registry still pending; giving up");
                        return Err(ClientError::PollTimeout {
                            attempts,
                            last_status: response.status,
                        });
                    }

                    debug!(attempt = attempts, next = %next, "registry still pending");
                    target = next;
                    self.guard(tokio::time::sleep(policy.interval), attempts)
                        .await?;
                }
                status => {
                    return Err(ClientError::RequestFailed {
                        status,
                        body: response.body,
                    });
                }
            }
        }
    }

    /// Await `fut` unless the cancel token fires first.
    async fn guard<F: Future>(&self, fut: F, attempts: u32) -> ClientResult<F::Output> {
        let Some(token) = &self.cancel else {
            return Ok(fut.await);
        };

        let mut token = token.clone();
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                warn!(attempts, "poll cancelled");
                Err(ClientError::Cancelled { attempts })
            }
            out = fut => Ok(out),
        }
    }
}

/// Where to poll next, as named by a 202 body.
///
/// A missing or empty `url` keeps polling `current`; relative URLs resolve
/// against `current`.
fn continuation(body: &str, current: &str) -> ClientResult<String> {
    let value = parse_body(body)?;
    let object = value.as_object().ok_or(DecodeError::NotAnObject {
        resource: "poll status",
    })?;

    let next = match object.get("url") {
        None | Some(Value::Null) => return Ok(current.to_string()),
        Some(Value::String(url)) if url.is_empty() => return Ok(current.to_string()),
        Some(Value::String(url)) => url,
        Some(other) => {
            return Err(DecodeError::InvalidField {
                field: "url",
                message: format!("expected a string, got {other}"),
            }
            .into());
        }
    };

    let resolved = Url::parse(current)
        .and_then(|base| base.join(next))
        .map_err(|e| DecodeError::InvalidField {
            field: "url",
            message: format!("{next:?}: {e}"),
        })?;

    Ok(resolved.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continuation_follows_absolute_url() {
        let next = continuation(
            r#"{"url": "http://mock/url/"}"#,
            "http://goat.goat/goat/concept/search/",
        )
        .unwrap();
        assert_eq!(next, "http://mock/url/");
    }

    #[test]
    fn continuation_resolves_relative_url() {
        let next = continuation(
            r#"{"url": "/goat/searchresult/7/"}"#,
            "http://goat.goat/goat/concept/search/",
        )
        .unwrap();
        assert_eq!(next, "http://goat.goat/goat/searchresult/7/");
    }

    #[test]
    fn continuation_without_url_stays_put() {
        let current = "http://goat.goat/goat/identical/";
        assert_eq!(continuation("{}", current).unwrap(), current);
        assert_eq!(continuation(r#"{"url": null}"#, current).unwrap(), current);
    }

    #[test]
    fn continuation_rejects_non_object_bodies() {
        let err = continuation("[]", "http://x/").unwrap_err();
        assert!(matches!(
            err,
            ClientError::Decode(DecodeError::NotAnObject { .. })
        ));

        let err = continuation("not json", "http://x/").unwrap_err();
        assert!(matches!(err, ClientError::Decode(DecodeError::InvalidJson(_))));
    }

    #[test]
    fn cancel_token_reports_state() {
        let handle = CancelHandle::new();
        let token = handle.token();
        assert!(!token.is_cancelled());
        handle.cancel();
        assert!(token.is_cancelled());
    }
}
