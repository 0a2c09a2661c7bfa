//! The request wrapper shared by every resource and every verb.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::handlers::resource::{Envelope, Resource};

/// The four resource operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Fetch => "Fetch",
            Operation::Create => "Create",
            Operation::Update => "Update",
            Operation::Delete => "Delete",
        };
        f.write_str(name)
    }
}

/// Mount a resource at `/<ROUTE>`.
///
/// GET -> fetch, POST -> create, PUT and PATCH -> update, DELETE -> delete.
pub fn routes<R: Resource>(resource: Arc<R>) -> Router {
    Router::new()
        .route(
            &format!("/{}", R::ROUTE),
            get(fetch::<R>)
                .post(create::<R>)
                .put(update::<R>)
                .patch(update::<R>)
                .delete(delete::<R>),
        )
        .with_state(resource)
}

async fn fetch<R: Resource>(State(resource): State<Arc<R>>, uri: Uri) -> Response {
    let payload = query_payload::<R::FetchRequest>(&uri);
    dispatch(R::ROUTE, Operation::Fetch, payload, |request| async move {
        resource.fetch(request).await
    })
    .await
}

async fn create<R: Resource>(State(resource): State<Arc<R>>, body: Bytes) -> Response {
    let payload = body_payload::<R::CreateRequest>(&body);
    dispatch(R::ROUTE, Operation::Create, payload, |request| async move {
        resource.create(request).await
    })
    .await
}

async fn update<R: Resource>(State(resource): State<Arc<R>>, body: Bytes) -> Response {
    let payload = body_payload::<R::UpdateRequest>(&body);
    dispatch(R::ROUTE, Operation::Update, payload, |request| async move {
        resource.update(request).await
    })
    .await
}

async fn delete<R: Resource>(State(resource): State<Arc<R>>, uri: Uri) -> Response {
    let payload = query_payload::<R::DeleteRequest>(&uri);
    dispatch(R::ROUTE, Operation::Delete, payload, |request| async move {
        resource.delete(request).await
    })
    .await
}

fn query_payload<T: DeserializeOwned>(uri: &Uri) -> AppResult<T> {
    Query::<T>::try_from_uri(uri)
        .map(|Query(payload)| payload)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// An empty body is read as JSON `null`.
fn body_payload<T: DeserializeOwned>(body: &Bytes) -> AppResult<T> {
    let raw: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        body
    };
    serde_json::from_slice(raw).map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Run one hook and turn its result into a response.
///
/// Non-200 envelopes are logged as warnings; hook errors are logged and
/// answered with a 500 whose body carries the error text.
async fn dispatch<P, F, Fut>(
    route: &'static str,
    operation: Operation,
    payload: AppResult<P>,
    hook: F,
) -> Response
where
    P: Serialize,
    F: FnOnce(P) -> Fut,
    Fut: Future<Output = AppResult<Envelope>>,
{
    let request = match payload {
        Ok(request) => request,
        Err(err) => {
            tracing::warn!(route, %operation, error = %err, "Rejected malformed request");
            return (StatusCode::BAD_REQUEST, err.to_string()).into_response();
        }
    };

    let rendered = serde_json::to_string(&request).unwrap_or_default();

    match hook(request).await {
        Ok(Envelope { status, content }) => {
            if status != StatusCode::OK {
                tracing::warn!(
                    route,
                    %operation,
                    status = status.as_u16(),
                    request = %rendered,
                    "Sending non-OK status back to the caller"
                );
            }
            (status, Json(content)).into_response()
        }
        Err(err) => {
            tracing::error!(
                route,
                %operation,
                request = %rendered,
                error = %err,
                "Resource operation failed"
            );
            let message = format!(
                "Received {}\n{} to route {} FAILED with the following request: {}\n\
                 Sending status 500 (Internal Server Error) back to the caller.",
                err, operation, route, rendered
            );
            (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
        }
    }
}
