//! Wallet side of WalletConnect: turns inbound Sign API events into typed,
//! chain-aware requests and sessions, and keeps the per-account ledger of
//! active sessions and the queue of requests awaiting user action.
//!
//! Everything in here is synchronous apart from [`pairing::pair_with_uri`],
//! which awaits a single call on an injected transport.

pub mod chain;
pub mod config;
pub mod message;
pub mod namespaces;
pub mod pairing;
pub mod reconciler;
pub mod request;
pub mod store;

pub use {
    chain::{address_from_protocol_string, ChainId, SupportedChains},
    config::WalletConfig,
    message::decode_message,
    namespaces::build_session_namespaces,
    pairing::{pair_with_uri, PairingTransport},
    reconciler::{Reconciler, WalletEvent},
    request::{parse_request, ParsedRequest, Request, RequestError},
    store::WalletConnectState,
};
