//! HTTP handlers for the eventboard API.
//!
//! Every route is a [`Resource`]: a type with up to four operation hooks
//! that [`dispatch::routes`] mounts behind one shared request wrapper.

pub mod dispatch;
pub mod health;
pub mod photo;
pub mod resource;
pub mod rsvp;

pub use dispatch::{routes, Operation};
pub use health::HealthResource;
pub use photo::PhotoResource;
pub use resource::{Envelope, Outcome, Resource, Unused};
pub use rsvp::RsvpResource;
