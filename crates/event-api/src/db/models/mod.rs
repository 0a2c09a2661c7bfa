//! Database models for the eventboard API.
//!
//! Models serialize with camelCase names, matching the keys the row mapper
//! produces, so a mapped row decodes straight into a model. Columns other
//! than the primary key may hold NULL in existing tables; text and
//! timestamp columns are `Option`s and flags read NULL as `false`.

use serde::{Deserialize, Deserializer};

pub mod photo;
pub mod rsvp;

pub use photo::*;
pub use rsvp::*;

/// Deserialize `null` as the type's default value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
