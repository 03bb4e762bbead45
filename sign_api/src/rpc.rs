//! JSON RPC envelope for Sign API messages delivered to the wallet, after the
//! transport has decrypted them.

mod params;

use {
    serde::{Deserialize, Serialize},
    std::sync::Arc,
};

pub use params::*;

/// Version of the JSON RPC protocol that WalletConnect messages use.
pub const JSON_RPC_VERSION_STR: &str = "2.0";

pub static JSON_RPC_VERSION: once_cell::sync::Lazy<Arc<str>> =
    once_cell::sync::Lazy::new(|| Arc::from(JSON_RPC_VERSION_STR));

/// Errors covering payload validation problems.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid JSON RPC version")]
    JsonRpcVersion,
}

/// Errors caught while decoding an inbound Sign API message.
#[derive(Debug, thiserror::Error)]
pub enum GenericError {
    /// Request parameters validation failed.
    #[error("Request validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Request serialization error.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Data structure representing a JSON RPC request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// ID this message corresponds to.
    pub id: u64,

    /// The JSON RPC version.
    pub jsonrpc: Arc<str>,

    /// The parameters required to fulfill this request.
    #[serde(flatten)]
    pub params: RequestParams,
}

impl Request {
    /// Create a new instance.
    pub fn new(id: u64, params: RequestParams) -> Self {
        Self {
            id,
            jsonrpc: JSON_RPC_VERSION.clone(),
            params,
        }
    }

    /// Decodes and validates a JSON request.
    pub fn from_json(json: &str) -> Result<Self, GenericError> {
        let request: Self = serde_json::from_str(json)?;
        request.validate()?;
        Ok(request)
    }

    /// Validates the request payload.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.jsonrpc.as_ref() != JSON_RPC_VERSION_STR {
            return Err(ValidationError::JsonRpcVersion);
        }

        Ok(())
    }
}
