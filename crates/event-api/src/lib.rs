//! Eventboard API Library
//!
//! An HTTP service for an event: guests RSVP, and a photo gallery collects
//! pictures for moderation. Data lives in PostgreSQL.
//!
//! ## Architecture
//!
//! Every route is a [`handlers::Resource`] with up to four operation hooks
//! (fetch, create, update, delete). [`handlers::routes`] mounts a resource
//! behind one shared wrapper that validates the payload, runs the hook,
//! logs non-OK outcomes and turns hook errors into 500 responses. Hooks
//! reach the database only through the [`db::Gateway`] trait, which maps
//! snake_case columns to camelCase fields on the way out.
//!
//! The [`supervisor`] assembles the router, runs the listener in its own
//! task and restarts it when a periodic self ping fails.
//!
//! ## Modules
//!
//! - [`auth`]: Optional API-key middleware
//! - [`config`]: Configuration loading from environment variables
//! - [`db`]: Gateway, row mapper, models and queries
//! - [`error`]: Error types with Axum integration
//! - [`handlers`]: The resource contract and the RSVP, photo and ping resources
//! - [`logging`]: Per-process log file and tracing setup
//! - [`supervisor`]: Router assembly, listener task and health loop

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod result_ext;
pub mod supervisor;

pub use error::{AppError, AppResult};
pub use result_ext::ResultExt;
