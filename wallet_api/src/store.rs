//! Per-account ledger of approved sessions, the single outstanding proposal,
//! and the FIFO queue of requests awaiting user action.
//!
//! Every mutation is one deterministic transition on [`WalletConnectState`]:
//! no clock, no I/O. The state is an ordinary value owned by the host, which
//! is responsible for serializing access if it shares it between tasks.

use {
    crate::{
        chain::ChainId,
        request::{DappInfo, Request},
    },
    serde::{Deserialize, Serialize},
    sign_api::{
        domain::Topic,
        rpc::{ProposeNamespaces, SettleNamespaces},
    },
    std::collections::BTreeMap,
};


/// A proposal awaiting the user's approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingSession {
    /// Proposal id assigned by the dapp.
    pub id: u64,
    pub chains: Vec<ChainId>,
    pub dapp: DappInfo,
    pub proposal_namespaces: ProposeNamespaces,
}

/// An approved session, owned by one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Session topic.
    pub id: Topic,
    pub chains: Vec<ChainId>,
    pub dapp: DappInfo,
    pub namespaces: SettleNamespaces,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSessions {
    pub sessions: BTreeMap<Topic, Session>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletConnectState {
    by_account: BTreeMap<String, AccountSessions>,
    pending_session: Option<PendingSession>,
    pending_requests: Vec<Request>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    did_open_from_deep_link: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    has_pending_session_error: Option<bool>,
}

/// A store mutation as a value, for hosts that log, replay or forward them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Action {
    AddSession {
        account: String,
        session: Session,
    },
    #[serde(rename_all = "camelCase")]
    RemoveSession {
        session_id: Topic,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        account: Option<String>,
    },
    AddPendingSession {
        session: PendingSession,
    },
    RemovePendingSession,
    AddRequest {
        request: Request,
    },
    #[serde(rename_all = "camelCase")]
    RemoveRequest {
        internal_id: String,
    },
    SetDidOpenFromDeepLink(Option<bool>),
    SetHasPendingSessionError(Option<bool>),
}

impl WalletConnectState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the initial state: no sessions, no proposal, no requests.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Applies a single action.
    pub fn reduce(&mut self, action: Action) {
        match action {
            Action::AddSession { account, session } => self.add_session(account, session),
            Action::RemoveSession {
                session_id,
                account,
            } => self.remove_session(session_id.as_ref(), account.as_deref()),
            Action::AddPendingSession { session } => self.add_pending_session(session),
            Action::RemovePendingSession => self.remove_pending_session(),
            Action::AddRequest { request } => self.add_request(request),
            Action::RemoveRequest { internal_id } => self.remove_request(&internal_id),
            Action::SetDidOpenFromDeepLink(value) => self.set_did_open_from_deep_link(value),
            Action::SetHasPendingSessionError(value) => self.set_has_pending_session_error(value),
        }
    }

    /// Inserts or overwrites `session` under `account`. Approving a session
    /// always consumes the outstanding proposal.
    pub fn add_session(&mut self, account: impl Into<String>, session: Session) {
        let account = account.into();
        tracing::info!(session_id = %session.id, %account, dapp = %session.dapp.url, "session added");

        self.by_account
            .entry(account)
            .or_default()
            .sessions
            .insert(session.id.clone(), session);
        self.pending_session = None;
    }

    /// Removes a session. With a known `account` only that account is
    /// touched. Without one (a `wc_sessionDelete` from the dapp carries no
    /// account) every account holding `session_id` loses it.
    pub fn remove_session(&mut self, session_id: &str, account: Option<&str>) {
        match account {
            Some(account) => {
                let removed = self
                    .by_account
                    .get_mut(account)
                    .and_then(|wc_account| wc_account.sessions.remove(session_id));
                if removed.is_some() {
                    tracing::info!(session_id, account, "session removed");
                } else {
                    tracing::debug!(session_id, account, "no session to remove");
                }
            }
            None => {
                for (account, wc_account) in self.by_account.iter_mut() {
                    if wc_account.sessions.remove(session_id).is_some() {
                        tracing::info!(session_id, %account, "session removed");
                    }
                }
            }
        }
    }

    /// Stores a new proposal. A proposal still pending is replaced, not queued.
    pub fn add_pending_session(&mut self, session: PendingSession) {
        if let Some(replaced) = &self.pending_session {
            tracing::warn!(
                replaced = replaced.id,
                proposal = session.id,
                "pending session replaced"
            );
        }
        self.pending_session = Some(session);
    }

    pub fn remove_pending_session(&mut self) {
        self.pending_session = None;
    }

    /// Appends to the tail of the queue. A request whose internal id is
    /// already queued is dropped, keeping the queue free of duplicates.
    pub fn add_request(&mut self, request: Request) {
        if self.request(request.internal_id()).is_some() {
            tracing::warn!(
                internal_id = request.internal_id(),
                "duplicate request dropped"
            );
            return;
        }

        tracing::debug!(
            internal_id = request.internal_id(),
            method = %request.method(),
            "request queued"
        );
        self.pending_requests.push(request);
    }

    pub fn remove_request(&mut self, internal_id: &str) {
        if let Some(index) = self
            .pending_requests
            .iter()
            .position(|request| request.internal_id() == internal_id)
        {
            self.pending_requests.remove(index);
            tracing::debug!(internal_id, "request removed");
        }
    }

    pub fn set_did_open_from_deep_link(&mut self, value: Option<bool>) {
        self.did_open_from_deep_link = value;
    }

    pub fn set_has_pending_session_error(&mut self, value: Option<bool>) {
        self.has_pending_session_error = value;
    }

    pub fn accounts(&self) -> impl Iterator<Item = &str> {
        self.by_account.keys().map(String::as_str)
    }

    pub fn sessions_for(&self, account: &str) -> impl Iterator<Item = &Session> {
        self.by_account
            .get(account)
            .into_iter()
            .flat_map(|wc_account| wc_account.sessions.values())
    }

    /// First account holding the session, with the session.
    pub fn session(&self, session_id: &str) -> Option<(&str, &Session)> {
        self.by_account.iter().find_map(|(account, wc_account)| {
            wc_account
                .sessions
                .get(session_id)
                .map(|session| (account.as_str(), session))
        })
    }

    pub fn pending_session(&self) -> Option<&PendingSession> {
        self.pending_session.as_ref()
    }

    pub fn pending_requests(&self) -> &[Request] {
        &self.pending_requests
    }

    pub fn request(&self, internal_id: &str) -> Option<&Request> {
        self.pending_requests
            .iter()
            .find(|request| request.internal_id() == internal_id)
    }

    pub fn did_open_from_deep_link(&self) -> Option<bool> {
        self.did_open_from_deep_link
    }

    pub fn has_pending_session_error(&self) -> Option<bool> {
        self.has_pending_session_error
    }
}

/// Pure form of [`WalletConnectState::reduce`].
pub fn reducer(state: &WalletConnectState, action: Action) -> WalletConnectState {
    let mut next = state.clone();
    next.reduce(action);
    next
}
