//! Pairing with a dapp from a scanned or deep-linked `wc:` URI.
//!
//! The relay handshake itself belongs to the WalletConnect SDK the host
//! embeds; it is reached through [`PairingTransport`].

use {
    serde::{Deserialize, Serialize},
    sign_api::{domain::Topic, pairing_uri::Pairing, rpc::Metadata},
    std::fmt::Display,
};

/// Pairing as reported back by the SDK once the topic is subscribed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairingRecord {
    pub topic: Topic,
    pub expiry: u64,
    pub relay_protocol: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub peer_metadata: Option<Metadata>,
    pub active: bool,
}

/// Failed pairing attempt. Only the failure text survives, which is what the
/// wallet shows the user.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("{message}")]
pub struct PairError {
    pub message: String,
}

impl PairError {
    fn from_display(err: impl Display) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

/// The SDK side of pairing.
pub trait PairingTransport {
    type Error: Display;

    #[allow(async_fn_in_trait)]
    async fn pair(&self, pairing: &Pairing) -> Result<PairingRecord, Self::Error>;
}

/// Parses `uri` and asks the transport to pair with it, once. There is no
/// retry and no timeout: the transport decides how long an attempt may take.
pub async fn pair_with_uri<T>(transport: &T, uri: &str) -> Result<PairingRecord, PairError>
where
    T: PairingTransport,
{
    let pairing: Pairing = uri.parse().map_err(|err| {
        tracing::warn!(%err, "invalid pairing uri");
        PairError::from_display(err)
    })?;

    tracing::debug!(topic = %pairing.topic, "pairing");

    transport.pair(&pairing).await.map_err(|err| {
        tracing::warn!(topic = %pairing.topic, %err, "pairing failed");
        PairError::from_display(err)
    })
}
