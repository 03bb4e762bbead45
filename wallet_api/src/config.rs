use {
    crate::{
        chain::{ChainId, SupportedChains, EIP155_NAMESPACE},
        request::Method,
    },
    serde::{Deserialize, Serialize},
    sign_api::rpc::{ProposeNamespace, ProposeNamespaces},
};

/// Events the wallet emits to dapps by default.
pub const DEFAULT_EVENTS: [&str; 2] = ["chainChanged", "accountsChanged"];

/// Methods the wallet serves by default. `eth_signTransaction` is never
/// served.
pub const DEFAULT_METHODS: [Method; 6] = [
    Method::PersonalSign,
    Method::EthSign,
    Method::SignTypedData,
    Method::SignTypedDataV4,
    Method::SendTransaction,
    Method::GetCapabilities,
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid wallet config: {0}")]
    Deserialize(#[from] serde_json::Error),
}

/// What the wallet is willing to serve over WalletConnect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WalletConfig {
    pub supported_chains: SupportedChains,
    pub supported_methods: Vec<Method>,
    pub supported_events: Vec<String>,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            supported_chains: SupportedChains::all(),
            supported_methods: DEFAULT_METHODS.to_vec(),
            supported_events: DEFAULT_EVENTS.iter().map(|&event| event.to_owned()).collect(),
        }
    }
}

impl WalletConfig {
    /// Reads a JSON config. Missing fields take their default.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_supported_chains(mut self, chains: impl IntoIterator<Item = ChainId>) -> Self {
        self.supported_chains = chains.into_iter().collect();
        self
    }

    pub fn with_supported_methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.supported_methods = methods.into_iter().collect();
        self
    }

    pub fn with_supported_events<S: Into<String>>(
        mut self,
        events: impl IntoIterator<Item = S>,
    ) -> Self {
        self.supported_events = events.into_iter().map(Into::into).collect();
        self
    }

    pub fn supports_method(&self, method: Method) -> bool {
        self.supported_methods.contains(&method)
    }

    /// The wallet's side of namespace negotiation: a single `eip155`
    /// namespace listing every enabled chain, method and event.
    pub fn supported_namespaces(&self) -> ProposeNamespaces {
        let namespace = ProposeNamespace {
            chains: Some(
                self.supported_chains
                    .iter()
                    .map(ChainId::to_protocol_string)
                    .collect(),
            ),
            methods: self
                .supported_methods
                .iter()
                .map(|method| method.to_string())
                .collect(),
            events: self.supported_events.clone(),
        };

        [(EIP155_NAMESPACE.to_owned(), namespace)].into_iter().collect()
    }
}
