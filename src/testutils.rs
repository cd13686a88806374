//! Test doubles
//!
//! [`MockProvider`] answers provider invocations from a closure and records
//! every request it receives, so tests can assert on request shape and call
//! counts without a network.

use crate::error::TransportError;
use crate::ucloud::provider::{ApiRequest, Provider};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;
use std::time::Duration;

type Handler = dyn Fn(&ApiRequest) -> Result<Value, TransportError> + Send + Sync;

pub struct MockProvider {
    handler: Box<Handler>,
    delay: Option<Duration>,
    calls: Mutex<Vec<ApiRequest>>,
}

impl MockProvider {
    /// Answer every request with the result of `handler`
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&ApiRequest) -> Result<Value, TransportError> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer every request with the same successful response
    pub fn responding(response: Value) -> Self {
        Self::new(move |_| Ok(response.clone()))
    }

    /// Fail every request with an API error
    pub fn failing(code: i64, message: &str) -> Self {
        let message = message.to_string();
        Self::new(move |req| Err(api_error(&req.action, code, &message)))
    }

    /// Sleep before answering each request
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Requests received so far, in arrival order
    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn invoke(&self, request: ApiRequest) -> Result<Value, TransportError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request.clone());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.handler)(&request)
    }
}

/// Build the error UCloud returns for a non-zero RetCode
pub fn api_error(action: &str, code: i64, message: &str) -> TransportError {
    TransportError::Api {
        action: action.to_string(),
        code,
        message: message.to_string(),
    }
}
