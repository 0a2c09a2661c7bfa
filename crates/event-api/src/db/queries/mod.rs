//! SQL statements issued through the [`Gateway`](crate::db::Gateway).

pub mod photo;
pub mod rsvp;
