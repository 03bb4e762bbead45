//! https://specs.walletconnect.com/2.0/specs/clients/sign/rpc-methods
//! #wc_sessionpropose

use {
    super::{Metadata, ProposeNamespaces, Relay},
    serde::{Deserialize, Serialize},
};

#[derive(Debug, Serialize, Eq, PartialEq, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Proposer {
    pub public_key: String,
    pub metadata: Metadata,
}

#[derive(Debug, Serialize, PartialEq, Eq, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SessionProposeRequest {
    pub relays: Vec<Relay>,
    pub proposer: Proposer,
    #[serde(default)]
    pub required_namespaces: ProposeNamespaces,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub optional_namespaces: Option<ProposeNamespaces>,
}

impl SessionProposeRequest {
    /// Required namespaces with the optional ones folded in.
    pub fn all_namespaces(&self) -> ProposeNamespaces {
        match &self.optional_namespaces {
            Some(optional) => self.required_namespaces.merged(optional),
            None => self.required_namespaces.clone(),
        }
    }
}
