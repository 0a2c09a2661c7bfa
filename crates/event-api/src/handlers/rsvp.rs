//! RSVP resource.
//!
//! | Verb | Payload | Result |
//! |---|---|---|
//! | `GET /rsvp` | `?name=` optional | `{"rsvp": ...}` or `{"rsvps": [...]}` |
//! | `POST /rsvp` | `{"rsvp": {...}}` | success, or `error: true` if the name exists |
//! | `DELETE /rsvp` | `?name=` | success, whether or not a row existed |

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::db::models::Rsvp;
use crate::db::queries::rsvp as queries;
use crate::db::Gateway;
use crate::error::{AppError, AppResult};
use crate::handlers::resource::{Envelope, Resource, Unused};

/// Message returned when creating an RSVP whose name is taken.
pub const DUPLICATE_RSVP_MESSAGE: &str = "The Provided RSVP Already Exists.";

/// Query parameters for fetching RSVPs.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FetchRsvpQuery {
    /// Guest name; omit to list every RSVP
    pub name: Option<String>,
}

/// Request body for creating an RSVP.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateRsvpRequest {
    pub rsvp: Rsvp,
}

/// Query parameters for deleting an RSVP.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteRsvpQuery {
    pub name: String,
}

pub struct RsvpResource {
    gateway: Arc<dyn Gateway>,
}

impl RsvpResource {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Resource for RsvpResource {
    const ROUTE: &'static str = "rsvp";
    type FetchRequest = FetchRsvpQuery;
    type CreateRequest = CreateRsvpRequest;
    type UpdateRequest = Unused;
    type DeleteRequest = DeleteRsvpQuery;

    async fn fetch(&self, request: FetchRsvpQuery) -> AppResult<Envelope> {
        match request.name.filter(|name| !name.is_empty()) {
            Some(name) => {
                let rsvp = queries::get_rsvp(self.gateway.as_ref(), &name).await?;
                Ok(Envelope::ok(json!({ "rsvp": rsvp })))
            }
            None => {
                let rsvps = queries::list_rsvps(self.gateway.as_ref()).await?;
                Ok(Envelope::ok(json!({ "rsvps": rsvps })))
            }
        }
    }

    async fn create(&self, request: CreateRsvpRequest) -> AppResult<Envelope> {
        let rsvp = request.rsvp;

        if queries::get_rsvp(self.gateway.as_ref(), &rsvp.name)
            .await?
            .is_some()
        {
            return Ok(Envelope::failure(DUPLICATE_RSVP_MESSAGE));
        }

        // A concurrent create can slip in between the read and the insert;
        // the primary key catches it.
        match queries::insert_rsvp(self.gateway.as_ref(), &rsvp).await {
            Ok(()) => {
                tracing::info!(name = %rsvp.name, attending = rsvp.attendence, "RSVP created");
                Ok(Envelope::success())
            }
            Err(AppError::Conflict(_)) => Ok(Envelope::failure(DUPLICATE_RSVP_MESSAGE)),
            Err(err) => Err(err),
        }
    }

    async fn delete(&self, request: DeleteRsvpQuery) -> AppResult<Envelope> {
        queries::delete_rsvp(self.gateway.as_ref(), &request.name).await?;
        Ok(Envelope::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::{row, ScriptedGateway};
    use crate::db::Param;
    use axum::http::StatusCode;
    use serde_json::Value;

    fn alice() -> Rsvp {
        Rsvp {
            name: "Alice".to_string(),
            phone_number: Some("555".to_string()),
            dietary_restrictions: Some("none".to_string()),
            special_notes: Some(String::new()),
            attendence: true,
        }
    }

    fn alice_row() -> crate::db::Row {
        row(json!({
            "name": "Alice",
            "phone_number": "555",
            "dietary_restrictions": "none",
            "special_notes": "",
            "attendence": true
        }))
    }

    fn resource(gateway: &Arc<ScriptedGateway>) -> RsvpResource {
        RsvpResource::new(gateway.clone())
    }

    #[tokio::test]
    async fn test_create_inserts_when_absent() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.reply_rows(Vec::new());
        gateway.reply_ok();

        let envelope = resource(&gateway)
            .create(CreateRsvpRequest { rsvp: alice() })
            .await
            .unwrap();

        assert_eq!(envelope, Envelope::success());
        let calls = gateway.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[1].sql.contains("INSERT INTO rsvp"));
        assert_eq!(
            calls[1].params,
            vec![
                Param::from("Alice"),
                Param::from("555"),
                Param::from("none"),
                Param::from(""),
                Param::from(true),
            ]
        );
    }

    #[tokio::test]
    async fn test_create_duplicate_is_envelope_error() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.reply_rows(vec![alice_row()]);

        let envelope = resource(&gateway)
            .create(CreateRsvpRequest { rsvp: alice() })
            .await
            .unwrap();

        assert_eq!(envelope.status, StatusCode::OK);
        assert_eq!(
            envelope.content,
            json!({"error": true, "message": DUPLICATE_RSVP_MESSAGE})
        );
        // No insert was attempted.
        assert_eq!(gateway.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_create_lost_race_is_envelope_error() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.reply_rows(Vec::new());
        gateway.reply_err(AppError::Conflict("duplicate key".to_string()));

        let envelope = resource(&gateway)
            .create(CreateRsvpRequest { rsvp: alice() })
            .await
            .unwrap();

        assert_eq!(envelope, Envelope::failure(DUPLICATE_RSVP_MESSAGE));
    }

    #[tokio::test]
    async fn test_create_propagates_other_faults() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.reply_err(AppError::Database(sqlx::Error::PoolTimedOut));

        let result = resource(&gateway)
            .create(CreateRsvpRequest { rsvp: alice() })
            .await;

        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_fetch_by_name() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.reply_rows(vec![alice_row()]);

        let envelope = resource(&gateway)
            .fetch(FetchRsvpQuery {
                name: Some("Alice".to_string()),
            })
            .await
            .unwrap();

        let fetched: Rsvp = serde_json::from_value(envelope.content["rsvp"].clone()).unwrap();
        assert_eq!(fetched, alice());
        assert_eq!(gateway.calls()[0].params, vec![Param::from("Alice")]);
    }

    #[tokio::test]
    async fn test_fetch_unknown_name_is_null() {
        let gateway = Arc::new(ScriptedGateway::new());

        let envelope = resource(&gateway)
            .fetch(FetchRsvpQuery {
                name: Some("Nobody".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(envelope.status, StatusCode::OK);
        assert_eq!(envelope.content, json!({"rsvp": null}));
    }

    #[tokio::test]
    async fn test_fetch_without_name_lists() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.reply_rows(vec![alice_row()]);

        let envelope = resource(&gateway)
            .fetch(FetchRsvpQuery::default())
            .await
            .unwrap();

        let rsvps = envelope.content["rsvps"].as_array().cloned().unwrap_or_default();
        assert_eq!(rsvps.len(), 1);
        assert_eq!(rsvps[0]["phoneNumber"], Value::from("555"));
        assert!(gateway.calls()[0].params.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_lists_rows_with_null_columns() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.reply_rows(vec![
            alice_row(),
            row(json!({
                "name": "Bob",
                "phone_number": "556",
                "dietary_restrictions": null,
                "special_notes": null,
                "attendence": false
            })),
        ]);

        let envelope = resource(&gateway)
            .fetch(FetchRsvpQuery::default())
            .await
            .unwrap();

        assert_eq!(envelope.status, StatusCode::OK);
        let rsvps = envelope.content["rsvps"].as_array().cloned().unwrap_or_default();
        assert_eq!(rsvps.len(), 2);
        assert_eq!(rsvps[1]["name"], Value::from("Bob"));
        assert_eq!(rsvps[1]["specialNotes"], Value::Null);
        assert_eq!(rsvps[1]["dietaryRestrictions"], Value::Null);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let gateway = Arc::new(ScriptedGateway::new());

        let envelope = resource(&gateway)
            .delete(DeleteRsvpQuery {
                name: "Nobody".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(envelope, Envelope::success());
        assert!(gateway.calls()[0].sql.contains("DELETE FROM rsvp"));
    }

    async fn call(
        gateway: &Arc<ScriptedGateway>,
        method: axum::http::Method,
        uri: &str,
        body: Value,
    ) -> (StatusCode, Value) {
        use tower::ServiceExt;

        let response = crate::handlers::routes(Arc::new(resource(gateway)))
            .oneshot(
                axum::http::Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(axum::body::Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_http_create_then_fetch() {
        let gateway = Arc::new(ScriptedGateway::new());
        // POST: existence check finds nothing, insert succeeds.
        gateway.reply_rows(Vec::new());
        gateway.reply_ok();
        // GET: the row that was just written.
        gateway.reply_rows(vec![alice_row()]);

        let (status, body) = call(
            &gateway,
            axum::http::Method::POST,
            "/rsvp",
            json!({"rsvp": {
                "name": "Alice",
                "phoneNumber": "555",
                "dietaryRestrictions": "none",
                "specialNotes": "",
                "attendence": true
            }}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"error": false, "message": ""}));

        let (status, body) = call(
            &gateway,
            axum::http::Method::GET,
            "/rsvp?name=Alice",
            Value::Null,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rsvp"], serde_json::to_value(alice()).unwrap());
    }

    #[tokio::test]
    async fn test_http_repeat_create() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.reply_rows(vec![alice_row()]);

        let (status, body) = call(
            &gateway,
            axum::http::Method::POST,
            "/rsvp",
            json!({"rsvp": serde_json::to_value(alice()).unwrap()}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"error": true, "message": DUPLICATE_RSVP_MESSAGE}));
    }

    #[tokio::test]
    async fn test_http_fetch_one_fault_is_500() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.reply_err(AppError::Database(sqlx::Error::PoolTimedOut));

        let response = {
            use tower::ServiceExt;
            crate::handlers::routes(Arc::new(resource(&gateway)))
                .oneshot(
                    axum::http::Request::builder()
                        .uri("/rsvp")
                        .body(axum::body::Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap()
        };

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_http_create_rejects_malformed_rsvp() {
        let gateway = Arc::new(ScriptedGateway::new());

        let response = {
            use tower::ServiceExt;
            crate::handlers::routes(Arc::new(resource(&gateway)))
                .oneshot(
                    axum::http::Request::builder()
                        .method(axum::http::Method::POST)
                        .uri("/rsvp")
                        .body(axum::body::Body::from(r#"{"rsvp": {"name": "Alice"}}"#))
                        .unwrap(),
                )
                .await
                .unwrap()
        };

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(gateway.calls().is_empty());
    }
}
