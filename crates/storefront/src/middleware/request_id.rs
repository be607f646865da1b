//! Request ID middleware for log correlation.
//!
//! Every request carries an ID that is recorded in the tracing span, tagged
//! on the Sentry scope, stored as a [`RequestId`] request extension and
//! echoed in the response headers.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Longest inbound ID that is reused as-is.
const MAX_INBOUND_LEN: usize = 128;

/// Request ID attached to the request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Reuse a caller-supplied ID if it is short and printable, else mint a
/// UUID v4.
fn resolve_request_id(inbound: Option<&HeaderValue>) -> String {
    inbound
        .and_then(|value| value.to_str().ok())
        .filter(|id| !id.is_empty() && id.len() <= MAX_INBOUND_LEN)
        .filter(|id| id.chars().all(|c| c.is_ascii_graphic()))
        .map_or_else(|| Uuid::new_v4().to_string(), String::from)
}

/// Middleware that ensures every request has a request ID.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = resolve_request_id(request.headers().get(&REQUEST_ID_HEADER));

    Span::current().record("request_id", request_id.as_str());
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });
    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(REQUEST_ID_HEADER.clone(), value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbound_id_is_reused() {
        let value = HeaderValue::from_static("edge-1234");
        assert_eq!(resolve_request_id(Some(&value)), "edge-1234");
    }

    #[test]
    fn test_missing_or_unusable_id_is_replaced() {
        let generated = resolve_request_id(None);
        assert!(Uuid::parse_str(&generated).is_ok());

        let spaced = HeaderValue::from_static("has spaces");
        assert_ne!(resolve_request_id(Some(&spaced)), "has spaces");

        let long = HeaderValue::from_str(&"a".repeat(MAX_INBOUND_LEN + 1)).unwrap_or_else(|_| HeaderValue::from_static("x"));
        assert_eq!(resolve_request_id(Some(&long)).len(), 36);
    }
}
