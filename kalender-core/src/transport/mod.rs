//! The remote call seam.

mod jsonrpc;

use serde_json::Value;

use crate::error::TransportError;

pub use jsonrpc::{JsonRpcTransport, RpcRequest, RpcResponse};

/// One request/response exchange with the calendar service.
///
/// `params` must be a JSON array. Implementations never retry.
pub trait Transport {
    fn call(&self, method: &str, params: Value) -> Result<Value, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn call(&self, method: &str, params: Value) -> Result<Value, TransportError> {
        (**self).call(method, params)
    }
}

/// Reject calls the service could never answer.
pub fn validate_call(method: &str, params: &Value) -> Result<(), TransportError> {
    if method.trim().is_empty() {
        return Err(TransportError::MethodNotString);
    }
    if !params.is_array() {
        return Err(TransportError::ParamsNotArray);
    }
    Ok(())
}
