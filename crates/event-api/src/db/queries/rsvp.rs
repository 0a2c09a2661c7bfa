//! RSVP database queries.

use crate::db::models::Rsvp;
use crate::db::{decode, Gateway};
use crate::error::AppResult;

/// Get an RSVP by guest name.
pub async fn get_rsvp(gateway: &dyn Gateway, name: &str) -> AppResult<Option<Rsvp>> {
    let row = gateway
        .fetch_one_or_none(
            r#"
            SELECT name, phone_number, dietary_restrictions, special_notes, attendence
            FROM rsvp
            WHERE name = $1
            "#,
            &[name.into()],
        )
        .await?;

    row.map(decode::<Rsvp>).transpose()
}

/// List every RSVP.
pub async fn list_rsvps(gateway: &dyn Gateway) -> AppResult<Vec<Rsvp>> {
    let rows = gateway
        .fetch_many(
            r#"
            SELECT name, phone_number, dietary_restrictions, special_notes, attendence
            FROM rsvp
            "#,
            &[],
        )
        .await?;

    rows.into_iter().map(decode::<Rsvp>).collect()
}

/// Insert a new RSVP.
pub async fn insert_rsvp(gateway: &dyn Gateway, rsvp: &Rsvp) -> AppResult<()> {
    gateway
        .execute(
            r#"
            INSERT INTO rsvp (name, phone_number, dietary_restrictions, special_notes, attendence)
            VALUES ($1, $2, $3, $4, $5)
            "#,
            &[
                rsvp.name.as_str().into(),
                rsvp.phone_number.as_deref().into(),
                rsvp.dietary_restrictions.as_deref().into(),
                rsvp.special_notes.as_deref().into(),
                rsvp.attendence.into(),
            ],
        )
        .await
}

/// Delete an RSVP by guest name. Deleting a missing name is not an error.
pub async fn delete_rsvp(gateway: &dyn Gateway, name: &str) -> AppResult<()> {
    gateway
        .execute(
            r#"
            DELETE FROM rsvp
            WHERE name = $1
            "#,
            &[name.into()],
        )
        .await
}
