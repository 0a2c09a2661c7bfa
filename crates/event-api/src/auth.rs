//! API-key middleware.
//!
//! Mounted by the supervisor only when `SERVER_REQUIRE_API_KEY` is set.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::error::AppError;

/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "apikey";

/// Expected key, shared with the middleware.
#[derive(Clone)]
pub struct ApiKey(pub Arc<str>);

impl ApiKey {
    pub fn new(key: &str) -> Self {
        Self(Arc::from(key))
    }

    fn matches(&self, received: Option<&str>) -> bool {
        received.is_some_and(|key| key == &*self.0)
    }
}

/// Reject requests whose `apikey` header is missing or wrong with 401.
pub async fn require_api_key(
    State(expected): State<ApiKey>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let received = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    if !expected.matches(received) {
        return Err(AppError::Unauthorized(format!(
            "missing or invalid {} header on {} {}",
            API_KEY_HEADER,
            request.method(),
            request.uri().path()
        )));
    }

    Ok(next.run(request).await)
}
