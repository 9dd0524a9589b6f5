//! Helm client core.
//!
//! Everything a Helm front end needs apart from drawing: the persisted
//! session, typed clients for the users and discussions services, a keyed
//! query cache with mutation-driven invalidation, the auth, discussion and
//! feed flows, and the route table with its session guard. [`app::HelmApp`]
//! wires them together; the `helm` binary drives it from the command line.

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod discussions;
pub mod error;
pub mod feed;
pub mod notify;
pub mod query;
pub mod router;
pub mod session;

pub use app::HelmApp;
pub use config::Config;
pub use error::{HelmError, Result};
