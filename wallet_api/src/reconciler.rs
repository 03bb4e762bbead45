//! Applies inbound Sign API events to a [`WalletConnectState`], and turns the
//! user's decisions on a pending proposal into store transitions.

use {
    crate::{
        config::WalletConfig,
        namespaces::{build_session_namespaces, proposed_chains, supported_proposal_namespaces},
        request::{parse_request, DappInfo, Method, RequestError},
        store::{PendingSession, Session, WalletConnectState},
    },
    sign_api::{
        domain::Topic,
        rpc::{
            self,
            Metadata,
            ProposeNamespaceError,
            RequestParams,
            SessionDeleteRequest,
            SessionProposeRequest,
            SessionRequestRequest,
            SettleNamespaces,
        },
    },
    std::str::FromStr,
};

/// Sign API events the wallet reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    SessionProposal {
        id: u64,
        params: SessionProposeRequest,
    },
    SessionRequest {
        topic: Topic,
        id: u64,
        params: SessionRequestRequest,
    },
    SessionDelete {
        topic: Topic,
    },
}

impl WalletEvent {
    /// Lifts a JSON-RPC request received on `topic`. Methods the wallet does
    /// not react to yield `None`.
    pub fn from_rpc(topic: Topic, request: rpc::Request) -> Option<Self> {
        match request.params {
            RequestParams::SessionPropose(params) => Some(Self::SessionProposal {
                id: request.id,
                params,
            }),
            RequestParams::SessionRequest(params) => Some(Self::SessionRequest {
                topic,
                id: request.id,
                params,
            }),
            RequestParams::SessionDelete(_) => Some(Self::SessionDelete { topic }),
            RequestParams::SessionSettle(_) | RequestParams::SessionPing(_) => None,
        }
    }
}

/// What handling an event changed in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    ProposalPending { id: u64 },
    RequestQueued { internal_id: String, account: String },
    SessionRemoved { topic: Topic },
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("Unsupported chain: {0}")]
    UnsupportedChain(String),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Namespaces(#[from] ProposeNamespaceError),

    #[error("No pending session")]
    NoPendingSession,

    #[error("Unknown session: {0}")]
    UnknownSession(Topic),
}

/// Stateless event handler. The state it works on is passed in by the host.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    config: WalletConfig,
}

impl Reconciler {
    pub fn new(config: WalletConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    pub fn handle(
        &self,
        state: &mut WalletConnectState,
        event: WalletEvent,
    ) -> Result<Outcome, ReconcileError> {
        match event {
            WalletEvent::SessionProposal { id, params } => self.on_proposal(state, id, &params),
            WalletEvent::SessionRequest { topic, id, params } => {
                self.on_request(state, topic, id, &params)
            }
            WalletEvent::SessionDelete { topic } => {
                state.remove_session(topic.as_ref(), None);
                Ok(Outcome::SessionRemoved { topic })
            }
        }
    }

    fn on_proposal(
        &self,
        state: &mut WalletConnectState,
        id: u64,
        params: &SessionProposeRequest,
    ) -> Result<Outcome, ReconcileError> {
        let ours = self.config.supported_namespaces();
        let checked = params
            .required_namespaces
            .caip2_validate()
            .and_then(|()| ours.supported(&params.required_namespaces));

        if let Err(err) = checked {
            tracing::warn!(proposal = id, code = err.error_code(), %err, "proposal not supported");
            state.set_has_pending_session_error(Some(true));
            return Err(err.into());
        }

        let proposal_namespaces = supported_proposal_namespaces(&params.all_namespaces(), &ours);
        let chains = self
            .config
            .supported_chains
            .chain_ids_from_protocol_strings(Some(proposed_chains(&proposal_namespaces).as_slice()))
            .unwrap_or_default();

        state.add_pending_session(PendingSession {
            id,
            chains,
            dapp: DappInfo::from(&params.proposer.metadata),
            proposal_namespaces,
        });
        state.set_has_pending_session_error(None);

        Ok(Outcome::ProposalPending { id })
    }

    fn on_request(
        &self,
        state: &mut WalletConnectState,
        topic: Topic,
        id: u64,
        params: &SessionRequestRequest,
    ) -> Result<Outcome, ReconcileError> {
        let chain_id = self
            .config
            .supported_chains
            .chain_id_from_protocol_string(&params.chain_id)
            .ok_or_else(|| {
                tracing::warn!(%topic, chain = %params.chain_id, "request on unsupported chain");
                ReconcileError::UnsupportedChain(params.chain_id.clone())
            })?;

        let method = Method::from_str(&params.request.method)
            .ok()
            .filter(|&method| self.config.supports_method(method))
            .ok_or_else(|| {
                tracing::warn!(%topic, method = %params.request.method, "unsupported method");
                RequestError::UnsupportedMethod(params.request.method.clone())
            })?;

        let dapp = state
            .session(topic.as_ref())
            .map(|(_, session)| Metadata::from(&session.dapp))
            .ok_or_else(|| ReconcileError::UnknownSession(topic.clone()))?;

        let parsed = parse_request(
            &self.config.supported_chains,
            method,
            topic,
            id,
            Some(chain_id),
            &dapp,
            &params.request.params,
        )?;

        let internal_id = parsed.request.internal_id().to_owned();
        state.add_request(parsed.request);

        Ok(Outcome::RequestQueued {
            internal_id,
            account: parsed.account,
        })
    }

    /// Approves the pending proposal for `account` under the session topic
    /// the SDK assigned. Returns the namespaces to settle the session with.
    ///
    /// The proposal is checked again against the current config; on failure
    /// the pending-session error flag is raised and the proposal is kept.
    pub fn approve_pending_session(
        &self,
        state: &mut WalletConnectState,
        account: &str,
        topic: Topic,
    ) -> Result<SettleNamespaces, ReconcileError> {
        let pending = state
            .pending_session()
            .cloned()
            .ok_or(ReconcileError::NoPendingSession)?;

        if let Err(err) = self
            .config
            .supported_namespaces()
            .supported(&pending.proposal_namespaces)
        {
            tracing::warn!(proposal = pending.id, %err, "approval not supported");
            state.set_has_pending_session_error(Some(true));
            return Err(err.into());
        }

        let namespaces = build_session_namespaces(account, &pending.proposal_namespaces);
        let session = Session {
            id: topic,
            chains: pending.chains,
            dapp: pending.dapp,
            namespaces: namespaces.clone(),
        };
        state.add_session(account, session);

        Ok(namespaces)
    }

    /// Drops the pending proposal, returning its id.
    pub fn reject_pending_session(&self, state: &mut WalletConnectState) -> Option<u64> {
        let id = state.pending_session().map(|pending| pending.id)?;
        tracing::info!(proposal = id, "proposal rejected");
        state.remove_pending_session();
        Some(id)
    }

    /// Removes a session the user ended from the wallet. Returns the
    /// `wc_sessionDelete` params to notify the dapp with.
    pub fn disconnect(
        &self,
        state: &mut WalletConnectState,
        topic: &Topic,
        account: Option<&str>,
    ) -> SessionDeleteRequest {
        state.remove_session(topic.as_ref(), account);
        SessionDeleteRequest::user_disconnected()
    }
}

#[cfg(test)]
mod tests;
