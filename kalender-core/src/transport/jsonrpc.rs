//! JSON-RPC 1.0 over HTTP POST.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{Transport, validate_call};
use crate::error::TransportError;

#[derive(Debug, Serialize)]
pub struct RpcRequest<'a> {
    pub method: &'a str,
    pub params: &'a Value,
    pub id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RpcResponse {
    pub result: Value,
    pub error: Value,
    pub id: Value,
}

impl RpcResponse {
    /// Check the echoed id and unwrap the result.
    pub fn into_result(self, request_id: &str) -> Result<Value, TransportError> {
        let response_id = match &self.id {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        };
        if response_id != request_id {
            return Err(TransportError::IdMismatch {
                request: request_id.to_string(),
                response: response_id,
            });
        }

        match self.error {
            Value::Null => Ok(self.result),
            Value::String(message) => Err(TransportError::Remote(message)),
            Value::Object(ref map) => {
                let message = map
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| self.error.to_string());
                Err(TransportError::Remote(message))
            }
            other => Err(TransportError::Remote(other.to_string())),
        }
    }
}

/// Blocking JSON-RPC client for the calendar service endpoint.
#[derive(Debug, Clone)]
pub struct JsonRpcTransport {
    http: reqwest::blocking::Client,
    endpoint: String,
}

impl JsonRpcTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let endpoint = endpoint.into();
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Unreachable {
                url: endpoint.clone(),
                reason: e.to_string(),
            })?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn unreachable(&self, err: impl ToString) -> TransportError {
        TransportError::Unreachable {
            url: self.endpoint.clone(),
            reason: err.to_string(),
        }
    }
}

impl Transport for JsonRpcTransport {
    fn call(&self, method: &str, params: Value) -> Result<Value, TransportError> {
        validate_call(method, &params)?;

        let request = RpcRequest {
            method,
            params: &params,
            id: uuid::Uuid::new_v4().to_string(),
        };
        debug!(method, id = %request.id, endpoint = %self.endpoint, "json-rpc call");

        let resp = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .map_err(|e| self.unreachable(e))?;

        if !resp.status().is_success() {
            return Err(self.unreachable(format!("HTTP {}", resp.status())));
        }

        let body: RpcResponse = resp
            .json()
            .map_err(|e| TransportError::MalformedResponse(e.to_string()))?;
        body.into_result(&request.id)
    }
}
