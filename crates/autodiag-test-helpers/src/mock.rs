//! Scripted inference capability.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use autodiag_prediction::{ApiKey, InferenceCapability, InferenceRequest, PredictionError};
use parking_lot::Mutex;
use tokio::sync::Notify;

/// Test double for [`InferenceCapability`].
///
/// Replies are taken from a queue; once the queue is empty the fallback reply
/// is repeated. Every call is counted and its request recorded. A gated mock
/// holds each call open until the test releases it, which keeps a prediction
/// in the running state for as long as the test needs.
pub struct MockCapability {
    replies: Mutex<VecDeque<Result<String, PredictionError>>>,
    fallback: Result<String, PredictionError>,
    calls: AtomicUsize,
    requests: Mutex<Vec<InferenceRequest>>,
    keys: Mutex<Vec<String>>,
    gate: Option<Arc<Notify>>,
}

impl MockCapability {
    /// Mock that always answers with `body`.
    pub fn returning(body: impl Into<String>) -> Self {
        Self::with_fallback(Ok(body.into()))
    }

    /// Mock that always fails with `error`.
    pub fn failing(error: PredictionError) -> Self {
        Self::with_fallback(Err(error))
    }

    fn with_fallback(fallback: Result<String, PredictionError>) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            fallback,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            keys: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Queue a one-off reply ahead of the fallback.
    pub fn then_reply(self, reply: Result<String, PredictionError>) -> Self {
        self.replies.lock().push_back(reply);
        self
    }

    /// Hold every call until the returned handle is notified.
    ///
    /// Each `notify_one` releases one call.
    pub fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(Arc::clone(&gate));
        (self, gate)
    }

    /// Number of calls made so far, including calls still held by the gate.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests seen, in call order.
    pub fn requests(&self) -> Vec<InferenceRequest> {
        self.requests.lock().clone()
    }

    /// Most recent request.
    pub fn last_request(&self) -> Option<InferenceRequest> {
        self.requests.lock().last().cloned()
    }

    /// Credentials seen, in call order.
    pub fn keys(&self) -> Vec<String> {
        self.keys.lock().clone()
    }
}

#[async_trait]
impl InferenceCapability for MockCapability {
    async fn generate(
        &self,
        key: &ApiKey,
        request: &InferenceRequest,
    ) -> Result<String, PredictionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());
        self.keys.lock().push(key.expose().to_string());

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let queued = self.replies.lock().pop_front();
        queued.unwrap_or_else(|| self.fallback.clone())
    }
}
