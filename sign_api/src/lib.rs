//! Sign API data types consumed by a WalletConnect wallet: pairing URIs,
//! session proposals, session requests and the namespaces negotiated between
//! a dapp and the wallet.
//!
//! Transport (relay, envelope encryption) is out of scope for this crate; the
//! types here describe what arrives once a message has been decrypted.

pub mod domain;
pub mod macros;
pub mod pairing_uri;
pub mod rpc;
