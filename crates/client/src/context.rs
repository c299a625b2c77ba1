//! Per-call request context.

use uuid::Uuid;

use crate::config::ClientConfig;
use crate::transport::HttpRequest;

/// Headers shared by every request of one logical operation.
///
/// A poll loop reuses one context for all of its attempts, so auth and the
/// request id stay fixed while only the target URL moves.
#[derive(Debug, Clone)]
pub struct CallContext {
    request_id: Uuid,
    token: Option<String>,
}

impl CallContext {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            request_id: Uuid::now_v7(),
            token: config.token().map(str::to_string),
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Attach the shared headers to `request`.
    pub fn apply(&self, request: HttpRequest) -> HttpRequest {
        let request = request
            .with_header("Accept", "application/json")
            .with_header("X-Request-Id", self.request_id.to_string());

        match &self.token {
            Some(token) => request.with_header("Authorization", format!("Token {token}")),
            None => request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_goes_into_authorization_header() {
        let config = ClientConfig::new("http://goat.goat/goat").with_token("abc");
        let ctx = CallContext::new(&config);
        let request = ctx.apply(HttpRequest::get(config.url_for("authority")));

        assert_eq!(request.header("Authorization"), Some("Token abc"));
        assert_eq!(request.header("X-Request-Id"), Some(ctx.request_id().to_string().as_str()));
    }

    #[test]
    fn no_token_means_no_authorization_header() {
        let config = ClientConfig::new("http://goat.goat/goat");
        let request = CallContext::new(&config).apply(HttpRequest::get("http://x/"));
        assert_eq!(request.header("Authorization"), None);
        assert_eq!(request.header("Accept"), Some("application/json"));
    }
}
