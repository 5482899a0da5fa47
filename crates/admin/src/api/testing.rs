//! Scripted transport for unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Notify;

use super::{HttpTransport, TransportError, TransportRequest, TransportResponse};

struct Step {
    response: Result<TransportResponse, TransportError>,
    gate: Option<Arc<Notify>>,
}

/// Answers requests with queued responses, in arrival order.
///
/// When the queue is empty every request gets a `404`.
#[derive(Default)]
pub struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    seen: Mutex<Vec<TransportRequest>>,
}

#[allow(clippy::unwrap_used)]
impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a response.
    pub fn push(&self, status: u16, body: Value) {
        self.steps.lock().unwrap().push_back(Step {
            response: Ok(TransportResponse::new(status, body)),
            gate: None,
        });
    }

    /// Queue a transport failure.
    pub fn push_error(&self, message: &str) {
        self.steps.lock().unwrap().push_back(Step {
            response: Err(TransportError(message.to_string())),
            gate: None,
        });
    }

    /// Queue a response that is held back until the returned gate is notified.
    pub fn push_gated(&self, status: u16, body: Value) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.steps.lock().unwrap().push_back(Step {
            response: Ok(TransportResponse::new(status, body)),
            gate: Some(Arc::clone(&gate)),
        });
        gate
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn last(&self) -> TransportRequest {
        self.seen.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    #[allow(clippy::unwrap_used)]
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        self.seen.lock().unwrap().push(request);
        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(Step { response, gate }) => {
                if let Some(gate) = gate {
                    gate.notified().await;
                }
                response
            }
            None => Ok(TransportResponse::new(
                404,
                serde_json::json!({ "message": "no scripted response" }),
            )),
        }
    }
}
