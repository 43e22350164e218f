//! crates/classroom_core/src/ports.rs
//!
//! Defines the contracts (traits) between the client core and the outside world.
//! The remote REST API and the durable key/value storage both sit behind these
//! ports so the session and view logic never depends on a concrete transport.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    /// The server rejected the credentials or the token (HTTP 401).
    #[error("Unauthorized")]
    Unauthorized { message: Option<String> },
    /// The server answered with a non-success status.
    #[error("API error ({status})")]
    Api { status: u16, message: Option<String> },
    /// The request never produced a response.
    #[error("Transport error: {0}")]
    Transport(String),
    /// The response body did not have the expected shape.
    #[error("Could not decode response: {0}")]
    Decode(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl PortError {
    /// The message the server put in the response body, if it sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            PortError::Unauthorized { message } | PortError::Api { message, .. } => {
                message.as_deref().filter(|m| !m.is_empty())
            }
            _ => None,
        }
    }

    /// The text to show the user: the server message verbatim, else the fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, PortError::Unauthorized { .. })
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Wire Types
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        })
    }
}

/// One outbound call, fully described. The bearer token is filled in by the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub query: Vec<(String, String)>,
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            query: Vec::new(),
            bearer: None,
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// A raw response. Bodies that are not JSON arrive as `Value::Null`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The `message` field of a JSON error body.
    pub fn message(&self) -> Option<String> {
        self.body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Sends a request to the remote API and returns whatever the server answered.
///
/// Implementations must return `Ok` for every HTTP response, whatever its status;
/// `Err` is reserved for requests that produced no response at all.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> PortResult<ApiResponse>;
}

/// Durable string storage keyed by name, surviving process restarts.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> PortResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> PortResult<()>;
    fn remove(&self, key: &str) -> PortResult<()>;
}

/// Storage key holding the opaque session token.
pub const TOKEN_KEY: &str = "token";
/// Storage key holding the JSON `{name, role}` blob.
pub const USER_KEY: &str = "user";
