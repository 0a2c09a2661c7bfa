//! Photo database queries.

use crate::db::models::Photo;
use crate::db::{decode, Gateway};
use crate::error::AppResult;

/// List every photo.
pub async fn list_photos(gateway: &dyn Gateway) -> AppResult<Vec<Photo>> {
    let rows = gateway
        .fetch_many(
            r#"
            SELECT id, title, date, image_url, is_accepted
            FROM photo
            "#,
            &[],
        )
        .await?;

    rows.into_iter().map(decode::<Photo>).collect()
}

/// Insert a single photo.
pub async fn insert_photo(gateway: &dyn Gateway, photo: &Photo) -> AppResult<()> {
    gateway
        .execute(
            r#"
            INSERT INTO photo (id, title, date, image_url, is_accepted)
            VALUES ($1, $2, $3, $4, $5)
            "#,
            &[
                photo.id.as_str().into(),
                photo.title.as_deref().into(),
                photo.date.into(),
                photo.image_url.as_deref().into(),
                photo.is_accepted.into(),
            ],
        )
        .await
}

/// Delete a photo by id. Deleting a missing id is not an error.
pub async fn delete_photo(gateway: &dyn Gateway, id: &str) -> AppResult<()> {
    gateway
        .execute(
            r#"
            DELETE FROM photo
            WHERE id = $1
            "#,
            &[id.into()],
        )
        .await
}
