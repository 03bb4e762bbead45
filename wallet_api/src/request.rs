//! Typed wallet requests built from `wc_sessionRequest` payloads.

mod parse;

use {
    crate::chain::ChainId,
    serde::{Deserialize, Serialize},
    sign_api::{domain::Topic, rpc::Metadata},
};

pub use parse::{parse_request, ParsedRequest, RequestError};

/// Ethereum JSON RPC methods a dapp may send over a session.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::Display,
)]
pub enum Method {
    #[serde(rename = "personal_sign")]
    #[strum(serialize = "personal_sign")]
    PersonalSign,
    #[serde(rename = "eth_sign")]
    #[strum(serialize = "eth_sign")]
    EthSign,
    #[serde(rename = "eth_signTypedData")]
    #[strum(serialize = "eth_signTypedData")]
    SignTypedData,
    #[serde(rename = "eth_signTypedData_v4")]
    #[strum(serialize = "eth_signTypedData_v4")]
    SignTypedDataV4,
    #[serde(rename = "eth_sendTransaction")]
    #[strum(serialize = "eth_sendTransaction")]
    SendTransaction,
    /// Recognised only to be refused: a transaction signed here but broadcast
    /// elsewhere escapes the wallet's nonce tracking.
    #[serde(rename = "eth_signTransaction")]
    #[strum(serialize = "eth_signTransaction")]
    SignTransaction,
    #[serde(rename = "wallet_getCapabilities")]
    #[strum(serialize = "wallet_getCapabilities")]
    GetCapabilities,
}

impl Method {
    pub fn sign_method(self) -> Option<SignMethod> {
        match self {
            Self::PersonalSign => Some(SignMethod::PersonalSign),
            Self::EthSign => Some(SignMethod::EthSign),
            Self::SignTypedData => Some(SignMethod::SignTypedData),
            Self::SignTypedDataV4 => Some(SignMethod::SignTypedDataV4),
            Self::SendTransaction | Self::SignTransaction | Self::GetCapabilities => None,
        }
    }

    /// Whether the method is bound to the chain carried by the request.
    pub fn requires_chain(self) -> bool {
        !matches!(self, Self::GetCapabilities)
    }
}

/// Signing methods. They differ in parameter order and in whether the
/// payload is text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignMethod {
    #[serde(rename = "personal_sign")]
    PersonalSign,
    #[serde(rename = "eth_sign")]
    EthSign,
    #[serde(rename = "eth_signTypedData")]
    SignTypedData,
    #[serde(rename = "eth_signTypedData_v4")]
    SignTypedDataV4,
}

impl SignMethod {
    pub fn is_typed_data(self) -> bool {
        matches!(self, Self::SignTypedData | Self::SignTypedDataV4)
    }
}

impl From<SignMethod> for Method {
    fn from(value: SignMethod) -> Self {
        match value {
            SignMethod::PersonalSign => Self::PersonalSign,
            SignMethod::EthSign => Self::EthSign,
            SignMethod::SignTypedData => Self::SignTypedData,
            SignMethod::SignTypedDataV4 => Self::SignTypedDataV4,
        }
    }
}

/// Transport a dapp reached the wallet through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DappSource {
    #[default]
    #[serde(rename = "walletconnect")]
    WalletConnect,
}

/// What the wallet shows the user about the requesting dapp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DappInfo {
    pub name: String,
    pub url: String,
    pub icon: Option<String>,
    pub source: DappSource,
}

impl From<&Metadata> for DappInfo {
    fn from(metadata: &Metadata) -> Self {
        Self {
            name: metadata.name.clone(),
            url: metadata.url.clone(),
            icon: metadata.icons.first().cloned(),
            source: DappSource::WalletConnect,
        }
    }
}

impl From<&DappInfo> for Metadata {
    fn from(dapp: &DappInfo) -> Self {
        Self {
            description: String::new(),
            url: dapp.url.clone(),
            icons: dapp.icon.iter().cloned().collect(),
            name: dapp.name.clone(),
        }
    }
}

/// Transaction fields taken from the dapp. Gas price and nonce are absent on
/// purpose: they are always computed by the wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthTransaction {
    pub from: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub gas_limit: Option<String>,
}

/// Fields every request carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBase {
    pub session_id: Topic,
    /// Wallet-side id tracking the request through approval. Unique within
    /// the pending queue.
    pub internal_id: String,
    pub account: String,
    pub dapp: DappInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignRequest {
    #[serde(flatten)]
    pub base: RequestBase,
    pub method: SignMethod,
    pub chain_id: ChainId,
    /// Payload as sent by the dapp, possibly hex.
    pub raw_message: String,
    /// Decoded text. Always `None` for typed data.
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    #[serde(flatten)]
    pub base: RequestBase,
    pub chain_id: ChainId,
    pub transaction: EthTransaction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilitiesRequest {
    #[serde(flatten)]
    pub base: RequestBase,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub chain_ids: Option<Vec<ChainId>>,
}

/// A request awaiting user action. Serialized with the protocol method name
/// as its `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "WireRequest", from = "WireRequest")]
pub enum Request {
    Sign(SignRequest),
    Transaction(TransactionRequest),
    Capabilities(CapabilitiesRequest),
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignPayload {
    #[serde(flatten)]
    base: RequestBase,
    chain_id: ChainId,
    raw_message: String,
    #[serde(default)]
    message: Option<String>,
}

impl SignPayload {
    fn into_request(self, method: SignMethod) -> Request {
        Request::Sign(SignRequest {
            base: self.base,
            method,
            chain_id: self.chain_id,
            raw_message: self.raw_message,
            message: self.message,
        })
    }
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type")]
enum WireRequest {
    #[serde(rename = "personal_sign")]
    PersonalSign(SignPayload),
    #[serde(rename = "eth_sign")]
    EthSign(SignPayload),
    #[serde(rename = "eth_signTypedData")]
    SignTypedData(SignPayload),
    #[serde(rename = "eth_signTypedData_v4")]
    SignTypedDataV4(SignPayload),
    #[serde(rename = "eth_sendTransaction")]
    SendTransaction(TransactionRequest),
    #[serde(rename = "wallet_getCapabilities")]
    GetCapabilities(CapabilitiesRequest),
}

impl From<Request> for WireRequest {
    fn from(request: Request) -> Self {
        match request {
            Request::Sign(SignRequest {
                base,
                method,
                chain_id,
                raw_message,
                message,
            }) => {
                let payload = SignPayload {
                    base,
                    chain_id,
                    raw_message,
                    message,
                };
                match method {
                    SignMethod::PersonalSign => Self::PersonalSign(payload),
                    SignMethod::EthSign => Self::EthSign(payload),
                    SignMethod::SignTypedData => Self::SignTypedData(payload),
                    SignMethod::SignTypedDataV4 => Self::SignTypedDataV4(payload),
                }
            }
            Request::Transaction(request) => Self::SendTransaction(request),
            Request::Capabilities(request) => Self::GetCapabilities(request),
        }
    }
}

impl From<WireRequest> for Request {
    fn from(wire: WireRequest) -> Self {
        match wire {
            WireRequest::PersonalSign(payload) => payload.into_request(SignMethod::PersonalSign),
            WireRequest::EthSign(payload) => payload.into_request(SignMethod::EthSign),
            WireRequest::SignTypedData(payload) => payload.into_request(SignMethod::SignTypedData),
            WireRequest::SignTypedDataV4(payload) => {
                payload.into_request(SignMethod::SignTypedDataV4)
            }
            WireRequest::SendTransaction(request) => Self::Transaction(request),
            WireRequest::GetCapabilities(request) => Self::Capabilities(request),
        }
    }
}

impl Request {
    pub fn base(&self) -> &RequestBase {
        match self {
            Self::Sign(request) => &request.base,
            Self::Transaction(request) => &request.base,
            Self::Capabilities(request) => &request.base,
        }
    }

    pub fn internal_id(&self) -> &str {
        &self.base().internal_id
    }

    pub fn session_id(&self) -> &Topic {
        &self.base().session_id
    }

    pub fn account(&self) -> &str {
        &self.base().account
    }

    pub fn method(&self) -> Method {
        match self {
            Self::Sign(request) => request.method.into(),
            Self::Transaction(_) => Method::SendTransaction,
            Self::Capabilities(_) => Method::GetCapabilities,
        }
    }

    /// `None` for capabilities requests, which may span several chains.
    pub fn chain_id(&self) -> Option<ChainId> {
        match self {
            Self::Sign(request) => Some(request.chain_id),
            Self::Transaction(request) => Some(request.chain_id),
            Self::Capabilities(_) => None,
        }
    }

    pub fn is_transaction_request(&self) -> bool {
        matches!(self, Self::Transaction(_))
    }
}
