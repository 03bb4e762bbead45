//! https://specs.walletconnect.com/2.0/specs/clients/sign/data-structures

mod propose_namespaces;
mod settle_namespaces;

use serde::{Deserialize, Serialize};
pub use {
    propose_namespaces::{ProposeNamespace, ProposeNamespaceError, ProposeNamespaces},
    settle_namespaces::{SettleNamespace, SettleNamespaces},
};

/// Dapp (or wallet) self-description carried in proposals and settlements.
///
/// Dapps in the wild omit `description` and `icons`, both default to empty.
#[derive(Debug, Serialize, PartialEq, Eq, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default)]
    pub description: String,
    pub url: String,
    #[serde(default)]
    pub icons: Vec<String>,
    pub name: String,
}

#[derive(Debug, Serialize, PartialEq, Eq, Deserialize, Clone, Default)]
pub struct Relay {
    pub protocol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub data: Option<String>,
}
