//! The per-route resource contract.

use async_trait::async_trait;
use axum::http::StatusCode;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

use crate::error::AppResult;

/// What a hook hands back to the dispatch wrapper.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub status: StatusCode,
    pub content: Value,
}

impl Envelope {
    /// 200 with the given content.
    pub fn ok(content: Value) -> Self {
        Self::with_status(StatusCode::OK, content)
    }

    pub fn with_status(status: StatusCode, content: Value) -> Self {
        Self { status, content }
    }

    /// 200 `{"error": false, "message": ""}`.
    pub fn success() -> Self {
        Self::ok(json!(Outcome::success()))
    }

    /// 200 `{"error": true, "message": ...}`. Business errors travel in the
    /// body, not in the status line.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::ok(json!(Outcome::failure(message)))
    }

    /// 404 with empty content; the answer for any hook a resource leaves out.
    pub fn unimplemented() -> Self {
        Self::with_status(StatusCode::NOT_FOUND, json!({}))
    }
}

/// Business-level result carried inside a 200 envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub error: bool,
    pub message: String,
}

impl Outcome {
    pub fn success() -> Self {
        Self {
            error: false,
            message: String::new(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
        }
    }
}

/// Payload type for operations a resource does not implement.
///
/// Accepts any input and serializes as `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Unused;

impl<'de> Deserialize<'de> for Unused {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        IgnoredAny::deserialize(deserializer)?;
        Ok(Unused)
    }
}

/// A routable resource with four optional operations.
///
/// `GET` and `DELETE` payloads are read from the query string; `POST`, `PUT`
/// and `PATCH` payloads from the JSON body. Payloads are deserialized into
/// the associated types before a hook runs, so hooks only ever see
/// validated input. Hooks may return any error; the dispatch wrapper turns
/// it into a 500.
#[async_trait]
pub trait Resource: Send + Sync + 'static {
    /// Path segment the resource is mounted at, without the leading slash.
    const ROUTE: &'static str;

    type FetchRequest: DeserializeOwned + Serialize + Send + 'static;
    type CreateRequest: DeserializeOwned + Serialize + Send + 'static;
    type UpdateRequest: DeserializeOwned + Serialize + Send + 'static;
    type DeleteRequest: DeserializeOwned + Serialize + Send + 'static;

    async fn fetch(&self, _request: Self::FetchRequest) -> AppResult<Envelope> {
        Ok(Envelope::unimplemented())
    }

    async fn create(&self, _request: Self::CreateRequest) -> AppResult<Envelope> {
        Ok(Envelope::unimplemented())
    }

    async fn update(&self, _request: Self::UpdateRequest) -> AppResult<Envelope> {
        Ok(Envelope::unimplemented())
    }

    async fn delete(&self, _request: Self::DeleteRequest) -> AppResult<Envelope> {
        Ok(Envelope::unimplemented())
    }
}
