//! Database module for the eventboard API server.
//!
//! The [`Gateway`] trait is the only way resources reach PostgreSQL. Rows
//! come back as JSON objects with camelCase keys, ready to be decoded into
//! the [`models`].

pub mod gateway;
pub mod models;
pub mod pool;
pub mod queries;
pub mod row_mapper;
pub mod schema;

#[cfg(test)]
pub mod testing;

pub use gateway::{decode, Gateway, Param, Row};
pub use pool::PgGateway;
