//! https://specs.walletconnect.com/2.0/specs/clients/sign/rpc-methods
//! #wc_sessionrequest

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, PartialEq, Eq, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub method: String,
    /// Opaque blockchain RPC parameters.
    ///
    /// Parsing is deferred to a higher level, blockchain RPC aware code.
    pub params: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub expiry: Option<u64>,
}

#[derive(Debug, Serialize, PartialEq, Eq, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequestRequest {
    pub request: Request,
    /// CAIP-2 chain id, e.g. `eip155:1`.
    pub chain_id: String,
}
