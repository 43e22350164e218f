//! A scripted `ApiTransport` for unit tests: answers are queued up front and
//! handed out in order, optionally held back until the test releases them.

use async_trait::async_trait;
use classroom_core::ports::{ApiRequest, ApiResponse, ApiTransport, PortError, PortResult};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::oneshot;

struct Scripted {
    result: PortResult<ApiResponse>,
    gate: Option<oneshot::Receiver<()>>,
}

#[derive(Default)]
pub struct ScriptedTransport {
    queue: Mutex<VecDeque<Scripted>>,
    sent: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: Value) {
        self.push(Ok(ApiResponse { status, body }), None);
    }

    pub fn fail(&self, reason: &str) {
        self.push(Err(PortError::Transport(reason.to_string())), None);
    }

    /// Queues a response that is only delivered once the returned sender fires.
    pub fn respond_when_released(&self, status: u16, body: Value) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        self.push(Ok(ApiResponse { status, body }), Some(gate));
        release
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.sent.lock().unwrap().clone()
    }

    fn push(&self, result: PortResult<ApiResponse>, gate: Option<oneshot::Receiver<()>>) {
        self.queue.lock().unwrap().push_back(Scripted { result, gate });
    }
}

#[async_trait]
impl ApiTransport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> PortResult<ApiResponse> {
        self.sent.lock().unwrap().push(request);
        let next = self.queue.lock().unwrap().pop_front();
        let Some(scripted) = next else {
            return Err(PortError::Transport("no scripted response left".to_string()));
        };
        if let Some(gate) = scripted.gate {
            let _ = gate.await;
        }
        scripted.result
    }
}
