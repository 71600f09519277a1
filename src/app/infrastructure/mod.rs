//! Infrastructure layer - external integrations and utilities.
//!
//! - Error types
//! - Logging bootstrap

pub mod error;
pub mod logging;
