//! https://specs.walletconnect.com/2.0/specs/clients/core/pairing/pairing-uri

use {
    crate::domain::Topic,
    once_cell::sync::Lazy,
    regex::Regex,
    std::{
        fmt::{Debug, Formatter},
        str::FromStr,
    },
    url::Url,
};

static TOPIC_AND_VERSION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<topic>[[:word:]-]+)@(?P<version>\d+)$").expect("invalid regex")
});

/// Only v2 pairing URIs can be paired with; v1 bridge URIs are rejected.
pub const SUPPORTED_VERSION: &str = "2";

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ParseError {
    #[error("Expecting protocol \"wc\" but \"{protocol}\" is found.")]
    UnexpectedProtocol { protocol: String },
    #[error(transparent)]
    Url(#[from] url::ParseError),
    #[error("Failed to parse topic and version")]
    InvalidTopicAndVersion,
    #[error("Unsupported pairing version: {0}")]
    UnsupportedVersion(String),
    #[error("Relay protocol not found")]
    RelayProtocolNotFound,
    #[error("Key not found")]
    KeyNotFound,
    #[error("Failed to parse key: {0:?}")]
    InvalidKey(#[from] hex::FromHexError),
    #[error("Invalid expiry timestamp: {0}")]
    InvalidExpiry(String),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Params {
    pub relay_protocol: String,
    pub sym_key: Vec<u8>,
    pub relay_data: Option<String>,
    /// Unix timestamp after which the pairing topic is no longer served.
    pub expiry_timestamp: Option<u64>,
    /// Methods the dapp announces for the pairing, e.g. `wc_sessionPropose`.
    pub methods: Vec<String>,
}

/// A parsed `wc:` pairing URI.
///
/// https://github.com/ethereum/EIPs/blob/master/EIPS/eip-1328.md
#[derive(Clone, Eq, PartialEq)]
pub struct Pairing {
    pub topic: Topic,
    pub version: String,
    pub params: Params,
}

impl Pairing {
    fn parse_topic_and_version(path: &str) -> Result<(Topic, String), ParseError> {
        let caps = TOPIC_AND_VERSION_REGEX
            .captures(path)
            .ok_or(ParseError::InvalidTopicAndVersion)?;
        let topic = caps
            .name("topic")
            .ok_or(ParseError::InvalidTopicAndVersion)?
            .as_str();
        let version = caps
            .name("version")
            .ok_or(ParseError::InvalidTopicAndVersion)?
            .as_str();

        if version != SUPPORTED_VERSION {
            return Err(ParseError::UnsupportedVersion(version.to_owned()));
        }

        Ok((Topic::from(topic), version.to_owned()))
    }

    fn parse_params(url: &Url) -> Result<Params, ParseError> {
        let mut relay_protocol: Option<String> = None;
        let mut sym_key: Option<String> = None;
        let mut relay_data: Option<String> = None;
        let mut expiry_timestamp: Option<u64> = None;
        let mut methods = Vec::new();

        // Unknown parameters are ignored, newer dapp SDKs keep adding them.
        for (k, v) in url.query_pairs() {
            match k.as_ref() {
                "relay-protocol" => relay_protocol = Some(v.into_owned()),
                "symKey" => sym_key = Some(v.into_owned()),
                "relay-data" => relay_data = Some(v.into_owned()),
                "expiryTimestamp" => {
                    expiry_timestamp = Some(
                        v.parse()
                            .map_err(|_| ParseError::InvalidExpiry(v.to_string()))?,
                    )
                }
                "methods" => methods.extend(
                    v.trim_matches(|c: char| c == '[' || c == ']')
                        .split(',')
                        .map(str::trim)
                        .filter(|m| !m.is_empty())
                        .map(str::to_owned),
                ),
                _ => {}
            }
        }

        Ok(Params {
            relay_protocol: relay_protocol.ok_or(ParseError::RelayProtocolNotFound)?,
            sym_key: hex::decode(sym_key.ok_or(ParseError::KeyNotFound)?)?,
            relay_data,
            expiry_timestamp,
            methods,
        })
    }
}

impl Debug for Pairing {
    /// Debug with key masked.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pairing")
            .field("topic", &self.topic)
            .field("version", &self.version)
            .field("relay-protocol", &self.params.relay_protocol)
            .field("key", &"***")
            .field(
                "relay-data",
                &self.params.relay_data.as_deref().unwrap_or(""),
            )
            .field("expiry", &self.params.expiry_timestamp)
            .finish()
    }
}

impl FromStr for Pairing {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let url = Url::from_str(s.trim())?;

        if url.scheme() != "wc" {
            return Err(ParseError::UnexpectedProtocol {
                protocol: url.scheme().to_owned(),
            });
        }

        let (topic, version) = Self::parse_topic_and_version(url.path())?;
        Ok(Self {
            topic,
            version,
            params: Self::parse_params(&url)?,
        })
    }
}
