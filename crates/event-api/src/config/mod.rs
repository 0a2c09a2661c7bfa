//! Configuration module for the eventboard API server.
//!
//! This module provides configuration loading from environment variables
//! using the `envy` crate for type-safe environment variable parsing.

mod database;
mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;
