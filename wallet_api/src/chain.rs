//! Conversion between CAIP-2 / CAIP-10 strings (`eip155:1`,
//! `eip155:1:0xabc…`) and the wallet's chain ids and addresses.
//!
//! Unsupported or malformed input resolves to `None`, never to an error.

use {
    serde::{Deserialize, Serialize},
    std::collections::BTreeSet,
    strum::IntoEnumIterator,
};

/// CAIP-2 namespace of EVM chains.
pub const EIP155_NAMESPACE: &str = "eip155";

pub const EIP155_PREFIX: &str = "eip155:";

/// EVM networks the wallet knows about.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::FromRepr,
    strum::EnumIter,
)]
#[serde(into = "u64", try_from = "u64")]
#[repr(u64)]
pub enum ChainId {
    Mainnet = 1,
    Optimism = 10,
    Bnb = 56,
    Unichain = 130,
    Polygon = 137,
    ZkSync = 324,
    WorldChain = 480,
    UnichainSepolia = 1301,
    Base = 8453,
    MonadTestnet = 10143,
    ArbitrumOne = 42161,
    Celo = 42220,
    Avalanche = 43114,
    Blast = 81457,
    Zora = 7777777,
    Sepolia = 11155111,
}

#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
#[error("Unknown chain id: {0}")]
pub struct UnknownChainId(pub u64);

impl ChainId {
    pub fn id(self) -> u64 {
        self as u64
    }

    /// CAIP-2 form, e.g. `eip155:137`.
    pub fn to_protocol_string(self) -> String {
        format!("{EIP155_PREFIX}{}", self.id())
    }
}

impl From<ChainId> for u64 {
    fn from(value: ChainId) -> Self {
        value.id()
    }
}

impl TryFrom<u64> for ChainId {
    type Error = UnknownChainId;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::from_repr(value).ok_or(UnknownChainId(value))
    }
}

/// Parses a canonical decimal chain reference: digits only, no sign, no
/// leading zeros.
fn parse_decimal(reference: &str) -> Option<u64> {
    let canonical = !reference.is_empty()
        && reference.bytes().all(|b| b.is_ascii_digit())
        && (reference == "0" || !reference.starts_with('0'));

    canonical.then(|| reference.parse().ok()).flatten()
}

fn parse_hex(reference: &str) -> Option<u64> {
    let digits = reference.strip_prefix("0x")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u64::from_str_radix(digits, 16).ok()
}

/// The set of chains the wallet has enabled. This is the chain-support table
/// every normalization goes through; membership is the only check made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SupportedChains(BTreeSet<ChainId>);

impl Default for SupportedChains {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<ChainId> for SupportedChains {
    fn from_iter<T: IntoIterator<Item = ChainId>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl SupportedChains {
    /// Every chain the wallet knows about.
    pub fn all() -> Self {
        ChainId::iter().collect()
    }

    pub fn contains(&self, chain: ChainId) -> bool {
        self.0.contains(&chain)
    }

    pub fn iter(&self) -> impl Iterator<Item = ChainId> + '_ {
        self.0.iter().copied()
    }

    /// Resolves a numeric chain id against the table.
    pub fn lookup(&self, id: u64) -> Option<ChainId> {
        ChainId::from_repr(id).filter(|chain| self.contains(*chain))
    }

    /// Resolves a bare chain reference, decimal (`137`) or hex (`0x89`).
    pub fn chain_id_from_reference(&self, reference: &str) -> Option<ChainId> {
        let id = parse_hex(reference).or_else(|| parse_decimal(reference))?;
        self.lookup(id)
    }

    /// Resolves `eip155:<decimal>`. Anything after a second colon (an
    /// account) is ignored.
    pub fn chain_id_from_protocol_string(&self, chain: &str) -> Option<ChainId> {
        let reference = chain.strip_prefix(EIP155_PREFIX)?.split(':').next()?;
        self.lookup(parse_decimal(reference)?)
    }

    /// Maps every entry, dropping the ones that do not resolve. An absent list
    /// stays absent; an empty list stays empty.
    pub fn chain_ids_from_protocol_strings<S>(&self, chains: Option<&[S]>) -> Option<Vec<ChainId>>
    where
        S: AsRef<str>,
    {
        chains.map(|chains| {
            chains
                .iter()
                .filter_map(|chain| self.chain_id_from_protocol_string(chain.as_ref()))
                .collect()
        })
    }
}

/// Extracts the address from `eip155:<chain>:<address>`.
pub fn address_from_protocol_string(account: &str) -> Option<&str> {
    account
        .strip_prefix(EIP155_PREFIX)?
        .split(':')
        .nth(1)
        .filter(|address| !address.is_empty())
}
