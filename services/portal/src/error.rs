//! services/portal/src/error.rs
//!
//! Defines the primary error type for the portal client.

use crate::config::ConfigError;
use classroom_core::ports::PortError;

/// The primary error type for the `portal` service.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// The login attempt failed.
    #[error("{0}")]
    Login(#[from] crate::app::auth::LoginError),

    /// A view action did not go through.
    #[error("{0}")]
    Action(#[from] crate::views::ActionError),

    /// The route guard refused the requested view.
    #[error("Access to {0} requires logging in with the matching role")]
    AccessDenied(String),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}
