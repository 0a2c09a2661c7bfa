//! Photo gallery resource.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::db::models::Photo;
use crate::db::queries::photo as queries;
use crate::db::Gateway;
use crate::error::AppResult;
use crate::handlers::resource::{Envelope, Resource, Unused};

/// Request body for a batch upload.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePhotosRequest {
    pub photos: Vec<Photo>,
}

/// Query parameters for deleting a photo.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeletePhotoQuery {
    pub id: String,
}

pub struct PhotoResource {
    gateway: Arc<dyn Gateway>,
}

impl PhotoResource {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Resource for PhotoResource {
    const ROUTE: &'static str = "photo";
    type FetchRequest = Unused;
    type CreateRequest = CreatePhotosRequest;
    type UpdateRequest = Unused;
    type DeleteRequest = DeletePhotoQuery;

    async fn fetch(&self, _request: Unused) -> AppResult<Envelope> {
        let photos = queries::list_photos(self.gateway.as_ref()).await?;
        Ok(Envelope::ok(json!({ "photos": photos })))
    }

    /// Inserts one photo at a time. A failed insert stops the batch; photos
    /// inserted before it stay.
    async fn create(&self, request: CreatePhotosRequest) -> AppResult<Envelope> {
        for photo in &request.photos {
            queries::insert_photo(self.gateway.as_ref(), photo).await?;
        }
        tracing::info!(count = request.photos.len(), "Photos created");
        Ok(Envelope::success())
    }

    async fn delete(&self, request: DeletePhotoQuery) -> AppResult<Envelope> {
        queries::delete_photo(self.gateway.as_ref(), &request.id).await?;
        Ok(Envelope::success())
    }
}
