//! services/portal/src/app/auth.rs
//!
//! Login and logout. Credentials are checked locally before anything is sent;
//! the server's verdict is never retried.

use classroom_core::domain::{Role, Session};
use classroom_core::validation::{validate_credentials, ValidationError};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::app::gateway::Gateway;

/// Shown when the server rejects a login without saying why.
pub const LOGIN_FAILED: &str = "Login failed. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    /// A field was blank; no request was made.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    /// The server refused, or could not be reached.
    #[error("{0}")]
    Rejected(String),
}

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
    name: String,
    role: Role,
}

//=========================================================================================
// Flow
//=========================================================================================

#[derive(Clone)]
pub struct AuthFlow {
    gateway: Gateway,
}

impl AuthFlow {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Exchanges credentials for a session and stores it. Routing to the
    /// role's home view is left to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, LoginError> {
        validate_credentials(email, password)?;

        let response: LoginResponse = self
            .gateway
            .post_json("/api/auth/login", &LoginRequest { email, password })
            .await
            .map_err(|e| {
                error!("Login error: {}", e);
                LoginError::Rejected(e.user_message(LOGIN_FAILED))
            })?;

        if response.token.trim().is_empty() {
            error!("Login response carried no token");
            return Err(LoginError::Rejected(LOGIN_FAILED.to_string()));
        }

        let session = Session::new(response.name, response.role, response.token);
        if let Err(e) = self.gateway.session().set(session.clone()) {
            warn!("Logged in, but the session will not survive a restart: {}", e);
        }
        info!("Logged in as {} ({})", session.display_name, session.role);
        Ok(session)
    }

    pub fn logout(&self) {
        self.gateway.session().clear();
    }
}
