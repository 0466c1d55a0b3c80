//! phabshot - upload screenshots to a self-hosted Phabricator instance
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod api;
pub mod cli;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod store;
pub mod traits;
pub mod transform;
