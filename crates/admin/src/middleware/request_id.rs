//! Request ID middleware for log and error correlation.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream ID that is trusted as-is.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Request ID, also available to handlers as a request extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Reuse a sane upstream `x-request-id`, or mint a UUID v4.
fn request_id_from(request: &Request) -> String {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN)
        .map_or_else(|| Uuid::new_v4().to_string(), String::from)
}

/// Tag the span, the Sentry scope and the response with a request ID.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request_id_from(&request);

    Span::current().record("request_id", &request_id);
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });
    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;

    use super::*;

    #[test]
    fn test_upstream_id_is_reused() {
        let request = Request::builder()
            .header(REQUEST_ID_HEADER, "cf-123")
            .body(Body::empty())
            .unwrap();
        assert_eq!(request_id_from(&request), "cf-123");
    }

    #[test]
    fn test_oversized_id_is_replaced() {
        let request = Request::builder()
            .header(REQUEST_ID_HEADER, "x".repeat(500))
            .body(Body::empty())
            .unwrap();
        let id = request_id_from(&request);
        assert!(Uuid::parse_str(&id).is_ok());
    }
}
