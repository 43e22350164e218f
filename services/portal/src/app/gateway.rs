//! services/portal/src/app/gateway.rs
//!
//! The gateway is the one chokepoint every server call passes through.
//!
//! It attaches the bearer token from the session store and turns HTTP statuses
//! into `PortError`s. A 401 on a request that carried a token is broadcast as
//! `AuthSignal::Unauthenticated` naming that token; the gateway itself never
//! touches the session or the navigator, that decision belongs to the
//! `Coordinator`.

use classroom_core::ports::{
    ApiRequest, ApiResponse, ApiTransport, Method, PortError, PortResult,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info_span, warn, Instrument};
use uuid::Uuid;

use crate::app::session::SessionStore;

/// Process-wide authentication events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthSignal {
    /// The server rejected `token`. By the time this is handled the session
    /// may already hold a different one.
    Unauthenticated { token: String },
}

#[derive(Clone)]
pub struct Gateway {
    transport: Arc<dyn ApiTransport>,
    session: Arc<SessionStore>,
    signals: broadcast::Sender<AuthSignal>,
}

impl Gateway {
    pub fn new(transport: Arc<dyn ApiTransport>, session: Arc<SessionStore>) -> Self {
        let (signals, _) = broadcast::channel(16);
        Self {
            transport,
            session,
            signals,
        }
    }

    /// A receiver for authentication events raised by any request.
    pub fn subscribe(&self) -> broadcast::Receiver<AuthSignal> {
        self.signals.subscribe()
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Sends one request. 2xx responses come back untouched, everything else is
    /// an error; a 401 on an authenticated request additionally raises
    /// `AuthSignal::Unauthenticated`.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        params: &[(&str, &str)],
    ) -> PortResult<ApiResponse> {
        let mut request = ApiRequest::new(method, path);
        request.body = body;
        for (key, value) in params {
            request = request.with_query(*key, *value);
        }
        self.send(request).await
    }

    pub async fn send(&self, mut request: ApiRequest) -> PortResult<ApiResponse> {
        request.bearer = self.session.token();

        let span = info_span!(
            "api_request",
            request_id = %Uuid::new_v4(),
            method = %request.method,
            path = %request.path,
        );

        async move {
            let bearer = request.bearer.clone();
            debug!(authenticated = bearer.is_some(), "Sending request");
            let response = self.transport.send(request).await.inspect_err(|e| {
                warn!("Request failed before a response arrived: {}", e);
            })?;
            debug!(status = response.status, "Received response");

            if response.status == 401 {
                match bearer {
                    Some(token) => {
                        warn!("Server rejected the credentials, raising unauthenticated signal");
                        if self.signals.send(AuthSignal::Unauthenticated { token }).is_err() {
                            debug!("No coordinator listening for auth signals");
                        }
                    }
                    None => debug!("Anonymous request rejected, no session to end"),
                }
                return Err(PortError::Unauthorized {
                    message: response.message(),
                });
            }

            if !response.is_success() {
                return Err(PortError::Api {
                    status: response.status,
                    message: response.message(),
                });
            }

            Ok(response)
        }
        .instrument(span)
        .await
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> PortResult<T> {
        let response = self.request(Method::Get, path, None, params).await?;
        decode(response.body)
    }

    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> PortResult<T> {
        let response = self
            .request(Method::Post, path, Some(encode(body)?), &[])
            .await?;
        decode(response.body)
    }

}

fn encode<B: Serialize>(body: &B) -> PortResult<Value> {
    serde_json::to_value(body).map_err(|e| PortError::Decode(e.to_string()))
}

fn decode<T: DeserializeOwned>(body: Value) -> PortResult<T> {
    serde_json::from_value(body).map_err(|e| PortError::Decode(e.to_string()))
}

/// Reads `body[key]` as a list. A missing or null field is an empty list.
pub fn list_field<T: DeserializeOwned>(body: &Value, key: &str) -> PortResult<Vec<T>> {
    match body.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(items) => decode(items.clone()),
    }
}
