//! Access key middleware.
//!
//! Mirrors function-level keys: the caller presents the key either in the
//! `x-functions-key` header or as the `code` query parameter. When no key is
//! configured every request passes.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header::HeaderName, Request},
    middleware::Next,
    response::Response,
};

use crate::errors::AppError;

/// Header carrying the access key.
pub static ACCESS_KEY_HEADER: HeaderName = HeaderName::from_static("x-functions-key");

/// Query parameter carrying the access key.
const ACCESS_KEY_PARAM: &str = "code";

/// The configured key, if any.
#[derive(Clone, Debug, Default)]
pub struct AccessKey(Option<Arc<str>>);

impl AccessKey {
    pub fn new(key: Option<String>) -> Self {
        Self(key.map(Arc::from))
    }

    /// Whether a key is configured.
    pub fn is_enabled(&self) -> bool {
        self.0.is_some()
    }

    fn accepts(&self, presented: Option<&str>) -> bool {
        match (&self.0, presented) {
            (None, _) => true,
            (Some(expected), Some(given)) => constant_time_eq(expected.as_bytes(), given.as_bytes()),
            (Some(_), None) => false,
        }
    }
}

/// Rejects requests that do not carry the configured key.
pub async fn access_key_middleware(
    State(key): State<AccessKey>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if !key.is_enabled() {
        return Ok(next.run(req).await);
    }

    let presented = extract_key(&req);
    if !key.accepts(presented.as_deref()) {
        return Err(AppError::Unauthorized(
            "Missing or invalid access key".to_string(),
        ));
    }

    Ok(next.run(req).await)
}

/// Reads the key from the header first, then the query string.
fn extract_key(req: &Request<Body>) -> Option<String> {
    if let Some(value) = req
        .headers()
        .get(&ACCESS_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        return Some(value.to_string());
    }

    Query::<HashMap<String, String>>::try_from_uri(req.uri())
        .ok()
        .and_then(|Query(mut params)| params.remove(ACCESS_KEY_PARAM))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, middleware, routing::get, Router};
    use tower::ServiceExt;

    fn app(key: Option<&str>) -> Router {
        let key = AccessKey::new(key.map(String::from));
        Router::new()
            .route("/", get(|| async { "ok" }))
            .route_layer(middleware::from_fn_with_state(key, access_key_middleware))
    }

    async fn status(app: Router, req: Request<Body>) -> StatusCode {
        app.oneshot(req).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_open_when_unconfigured() {
        let req = Request::get("/").body(Body::empty()).unwrap();
        assert_eq!(status(app(None), req).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rejects_missing_key() {
        let req = Request::get("/").body(Body::empty()).unwrap();
        assert_eq!(status(app(Some("k1")), req).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_accepts_header_or_query() {
        let req = Request::get("/")
            .header("x-functions-key", "k1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(status(app(Some("k1")), req).await, StatusCode::OK);

        let req = Request::get("/?code=k1").body(Body::empty()).unwrap();
        assert_eq!(status(app(Some("k1")), req).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rejects_wrong_key() {
        let req = Request::get("/?code=k2").body(Body::empty()).unwrap();
        assert_eq!(status(app(Some("k1")), req).await, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
    }
}
