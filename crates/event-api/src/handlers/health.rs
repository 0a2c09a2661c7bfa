//! Liveness endpoint.

use async_trait::async_trait;

use crate::error::AppResult;
use crate::handlers::resource::{Envelope, Resource, Unused};

/// `GET /ping`.
///
/// Answers as long as the process can serve HTTP. The database is not
/// consulted.
#[derive(Debug, Default, Clone, Copy)]
pub struct HealthResource;

#[async_trait]
impl Resource for HealthResource {
    const ROUTE: &'static str = "ping";
    type FetchRequest = Unused;
    type CreateRequest = Unused;
    type UpdateRequest = Unused;
    type DeleteRequest = Unused;

    async fn fetch(&self, _request: Unused) -> AppResult<Envelope> {
        Ok(Envelope::success())
    }
}
