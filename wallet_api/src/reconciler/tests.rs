use {
    super::*,
    crate::{chain::ChainId, request::Request},
    anyhow::Result,
    serde_json::{json, Value},
    sign_api::rpc::{ProposeNamespace, ProposeNamespaces, USER_DISCONNECTED_CODE},
};

const ACCOUNT: &str = "0xBA5BA3955463ADcc7aa3E33bbdfb8A68e0933dD8";
const OTHER_ACCOUNT: &str = "0x2f1b8d2D4E4b1ee4fA6c1e0d3C0A34C3F0a3B1D2";
const TOPIC: &str = "95d6aca451b8e3c6d9d176761bf786f1cc0a6d38dffd31ed896306bb37f6ae8d";

fn proposal(value: Value) -> Result<SessionProposeRequest> {
    Ok(serde_json::from_value(value)?)
}

fn uniswap_proposal() -> Result<SessionProposeRequest> {
    proposal(json!({
        "relays": [{ "protocol": "irn" }],
        "proposer": {
            "publicKey": "a3ad5e26070ddb2809200c6f56e739333512015bceeadbb8ea1731c4c7ddb207",
            "metadata": {
                "description": "Swap tokens",
                "url": "https://app.uniswap.org",
                "icons": ["https://app.uniswap.org/favicon.png"],
                "name": "Uniswap"
            }
        },
        "requiredNamespaces": {
            "eip155": {
                "chains": ["eip155:1"],
                "methods": ["personal_sign", "eth_sendTransaction"],
                "events": ["chainChanged"]
            }
        },
        "optionalNamespaces": {
            "eip155": {
                "chains": ["eip155:1", "eip155:5", "eip155:8453"],
                "methods": ["eth_signTransaction", "eth_signTypedData_v4"],
                "events": ["accountsChanged"]
            }
        }
    }))
}

fn request_event(id: u64, chain_id: &str, method: &str, params: Value) -> Result<WalletEvent> {
    Ok(WalletEvent::SessionRequest {
        topic: Topic::from(TOPIC),
        id,
        params: serde_json::from_value(json!({
            "request": { "method": method, "params": params },
            "chainId": chain_id
        }))?,
    })
}

/// State holding one approved session on `TOPIC` for `ACCOUNT`.
fn connected(reconciler: &Reconciler) -> Result<WalletConnectState> {
    let mut state = WalletConnectState::new();
    reconciler.handle(&mut state, WalletEvent::SessionProposal {
        id: 1,
        params: uniswap_proposal()?,
    })?;
    reconciler.approve_pending_session(&mut state, ACCOUNT, Topic::from(TOPIC))?;
    Ok(state)
}

#[test]
fn proposal_becomes_pending_session() -> Result<()> {
    let reconciler = Reconciler::default();
    let mut state = WalletConnectState::new();

    let outcome = reconciler.handle(&mut state, WalletEvent::SessionProposal {
        id: 1700000000000000,
        params: uniswap_proposal()?,
    })?;

    assert_eq!(outcome, Outcome::ProposalPending {
        id: 1700000000000000
    });

    let pending = state.pending_session().expect("pending session");
    assert_eq!(pending.chains, vec![ChainId::Mainnet, ChainId::Base]);
    assert_eq!(pending.dapp.name, "Uniswap");
    assert_eq!(
        pending.dapp.icon.as_deref(),
        Some("https://app.uniswap.org/favicon.png")
    );

    let eip155 = pending
        .proposal_namespaces
        .get("eip155")
        .expect("eip155 namespace");
    assert_eq!(
        eip155.methods,
        vec!["personal_sign", "eth_sendTransaction", "eth_signTypedData_v4"]
    );
    assert_eq!(eip155.events, vec!["chainChanged", "accountsChanged"]);

    Ok(())
}

#[test]
fn unsupported_required_chain_flags_error() -> Result<()> {
    let reconciler = Reconciler::default();
    let mut state = WalletConnectState::new();

    let params = proposal(json!({
        "relays": [{ "protocol": "irn" }],
        "proposer": {
            "publicKey": "a3ad5e26070ddb2809200c6f56e739333512015bceeadbb8ea1731c4c7ddb207",
            "metadata": { "url": "https://dapp.example", "name": "Dapp" }
        },
        "requiredNamespaces": {
            "eip155": { "chains": ["eip155:5"], "methods": ["personal_sign"], "events": [] }
        }
    }))?;

    let result = reconciler.handle(&mut state, WalletEvent::SessionProposal { id: 2, params });

    assert_eq!(
        result,
        Err(ReconcileError::Namespaces(
            ProposeNamespaceError::UnsupportedChains("eip155:5".to_owned())
        ))
    );
    assert_eq!(state.pending_session(), None);
    assert_eq!(state.has_pending_session_error(), Some(true));

    Ok(())
}

#[test]
fn new_proposal_replaces_pending() -> Result<()> {
    let reconciler = Reconciler::default();
    let mut state = WalletConnectState::new();

    for id in [1, 2] {
        reconciler.handle(&mut state, WalletEvent::SessionProposal {
            id,
            params: uniswap_proposal()?,
        })?;
    }

    assert_eq!(state.pending_session().map(|pending| pending.id), Some(2));

    Ok(())
}

#[test]
fn approve_settles_session() -> Result<()> {
    let reconciler = Reconciler::default();
    let state = connected(&reconciler)?;

    assert_eq!(state.pending_session(), None);

    let (account, session) = state.session(TOPIC).expect("session");
    assert_eq!(account, ACCOUNT);
    assert_eq!(session.chains, vec![ChainId::Mainnet, ChainId::Base]);
    assert_eq!(
        session.namespaces.accounts().collect::<Vec<_>>(),
        vec![
            format!("eip155:1:{ACCOUNT}"),
            format!("eip155:8453:{ACCOUNT}")
        ]
    );

    Ok(())
}

#[test]
fn approve_rechecks_against_config() -> Result<()> {
    let mut state = WalletConnectState::new();
    Reconciler::default().handle(&mut state, WalletEvent::SessionProposal {
        id: 1,
        params: uniswap_proposal()?,
    })?;

    let narrowed = Reconciler::new(WalletConfig::default().with_supported_chains([ChainId::Base]));
    let result = narrowed.approve_pending_session(&mut state, ACCOUNT, Topic::from(TOPIC));

    assert!(matches!(result, Err(ReconcileError::Namespaces(_))));
    assert_eq!(state.has_pending_session_error(), Some(true));
    assert!(state.pending_session().is_some());
    assert_eq!(state.session(TOPIC), None);

    Ok(())
}

#[test]
fn approve_without_proposal() {
    let mut state = WalletConnectState::new();

    assert_eq!(
        Reconciler::default().approve_pending_session(&mut state, ACCOUNT, Topic::from(TOPIC)),
        Err(ReconcileError::NoPendingSession)
    );
}

#[test]
fn reject_drops_proposal() -> Result<()> {
    let reconciler = Reconciler::default();
    let mut state = WalletConnectState::new();
    reconciler.handle(&mut state, WalletEvent::SessionProposal {
        id: 7,
        params: uniswap_proposal()?,
    })?;

    assert_eq!(reconciler.reject_pending_session(&mut state), Some(7));
    assert_eq!(state.pending_session(), None);
    assert_eq!(reconciler.reject_pending_session(&mut state), None);

    Ok(())
}

#[test]
fn sign_request_is_queued() -> Result<()> {
    let reconciler = Reconciler::default();
    let mut state = connected(&reconciler)?;

    let outcome = reconciler.handle(
        &mut state,
        request_event(
            1700000000000001,
            "eip155:8453",
            "personal_sign",
            json!(["0x48656c6c6f20576f726c64", ACCOUNT]),
        )?,
    )?;

    assert_eq!(outcome, Outcome::RequestQueued {
        internal_id: "1700000000000001".to_owned(),
        account: ACCOUNT.to_owned(),
    });

    let request = state.request("1700000000000001").expect("queued request");
    assert_eq!(request.chain_id(), Some(ChainId::Base));
    assert_eq!(request.base().dapp.name, "Uniswap");
    match request {
        Request::Sign(sign) => assert_eq!(sign.message.as_deref(), Some("Hello World")),
        other => panic!("unexpected request: {other:?}"),
    }

    Ok(())
}

#[test]
fn transaction_request_is_queued() -> Result<()> {
    let reconciler = Reconciler::default();
    let mut state = connected(&reconciler)?;

    reconciler.handle(
        &mut state,
        request_event(
            2,
            "eip155:1",
            "eth_sendTransaction",
            json!([{
                "from": ACCOUNT,
                "to": OTHER_ACCOUNT,
                "value": "0x0",
                "gasPrice": "0x1",
                "nonce": "0x2"
            }]),
        )?,
    )?;

    let queued = state.pending_requests();
    assert_eq!(queued.len(), 1);
    assert!(queued.iter().all(Request::is_transaction_request));

    Ok(())
}

#[test]
fn request_on_unsupported_chain() -> Result<()> {
    let reconciler = Reconciler::default();
    let mut state = connected(&reconciler)?;

    let result = reconciler.handle(
        &mut state,
        request_event(3, "eip155:5", "personal_sign", json!(["0x00", ACCOUNT]))?,
    );

    assert_eq!(
        result,
        Err(ReconcileError::UnsupportedChain("eip155:5".to_owned()))
    );
    assert!(state.pending_requests().is_empty());

    Ok(())
}

#[test]
fn sign_transaction_is_rejected() -> Result<()> {
    let reconciler = Reconciler::default();
    let mut state = connected(&reconciler)?;

    let result = reconciler.handle(
        &mut state,
        request_event(
            4,
            "eip155:1",
            "eth_signTransaction",
            json!([{ "from": ACCOUNT }]),
        )?,
    );

    assert_eq!(
        result,
        Err(ReconcileError::Request(RequestError::UnsupportedMethod(
            "eth_signTransaction".to_owned()
        )))
    );

    let result = reconciler.handle(
        &mut state,
        request_event(5, "eip155:1", "eth_accounts", json!([]))?,
    );
    assert!(matches!(
        result,
        Err(ReconcileError::Request(RequestError::UnsupportedMethod(_)))
    ));
    assert!(state.pending_requests().is_empty());

    Ok(())
}

#[test]
fn request_on_unknown_session() -> Result<()> {
    let reconciler = Reconciler::default();
    let mut state = WalletConnectState::new();

    let result = reconciler.handle(
        &mut state,
        request_event(6, "eip155:1", "personal_sign", json!(["0x00", ACCOUNT]))?,
    );

    assert_eq!(result, Err(ReconcileError::UnknownSession(Topic::from(TOPIC))));

    Ok(())
}

#[test]
fn malformed_params_are_rejected() -> Result<()> {
    let reconciler = Reconciler::default();
    let mut state = connected(&reconciler)?;

    let result = reconciler.handle(
        &mut state,
        request_event(7, "eip155:1", "personal_sign", json!(["0x00"]))?,
    );

    assert!(matches!(
        result,
        Err(ReconcileError::Request(RequestError::InvalidParams { .. }))
    ));
    assert!(state.pending_requests().is_empty());

    Ok(())
}

#[test]
fn delete_removes_session_everywhere() -> Result<()> {
    let reconciler = Reconciler::default();
    let mut state = connected(&reconciler)?;
    let (_, session) = state.session(TOPIC).expect("session");
    let session = session.clone();
    state.add_session(OTHER_ACCOUNT, session);

    let outcome = reconciler.handle(&mut state, WalletEvent::SessionDelete {
        topic: Topic::from(TOPIC),
    })?;

    assert_eq!(outcome, Outcome::SessionRemoved {
        topic: Topic::from(TOPIC)
    });
    assert_eq!(state.session(TOPIC), None);

    Ok(())
}

#[test]
fn disconnect_notifies_dapp() -> Result<()> {
    let reconciler = Reconciler::default();
    let mut state = connected(&reconciler)?;

    let delete = reconciler.disconnect(&mut state, &Topic::from(TOPIC), Some(ACCOUNT));

    assert_eq!(delete.code, USER_DISCONNECTED_CODE);
    assert_eq!(state.sessions_for(ACCOUNT).count(), 0);

    Ok(())
}

#[test]
fn events_from_rpc() -> Result<()> {
    let delete = rpc::Request::from_json(
        r#"{
            "id": 1675757972688031,
            "jsonrpc": "2.0",
            "method": "wc_sessionDelete",
            "params": { "code": 6000, "message": "User disconnected." }
        }"#,
    )?;
    assert_eq!(
        WalletEvent::from_rpc(Topic::from(TOPIC), delete),
        Some(WalletEvent::SessionDelete {
            topic: Topic::from(TOPIC)
        })
    );

    let request = rpc::Request::from_json(
        r#"{
            "id": 1675759795769537,
            "jsonrpc": "2.0",
            "method": "wc_sessionRequest",
            "params": {
                "request": { "method": "personal_sign", "params": ["0x00", "0xabc"] },
                "chainId": "eip155:1"
            }
        }"#,
    )?;
    match WalletEvent::from_rpc(Topic::from(TOPIC), request) {
        Some(WalletEvent::SessionRequest { id, params, .. }) => {
            assert_eq!(id, 1675759795769537);
            assert_eq!(params.chain_id, "eip155:1");
        }
        other => panic!("unexpected event: {other:?}"),
    }

    let ping = rpc::Request::new(1, RequestParams::SessionPing(()));
    assert_eq!(WalletEvent::from_rpc(Topic::from(TOPIC), ping), None);

    Ok(())
}

#[test]
fn default_config_accepts_wallet_namespaces() {
    let ours = Reconciler::default().config().supported_namespaces();
    let required: ProposeNamespaces = [(
        "eip155:42161".to_owned(),
        ProposeNamespace {
            chains: None,
            methods: vec!["eth_signTypedData_v4".to_owned()],
            events: vec![],
        },
    )]
    .into_iter()
    .collect();

    assert_eq!(ours.supported(&required), Ok(()));
}
