use {
    regex::Regex,
    serde::{Deserialize, Serialize},
    std::{collections::BTreeMap, ops::Deref, sync::OnceLock},
};

/// https://specs.walletconnect.com/2.0/specs/clients/sign/namespaces
///
/// https://chainagnostic.org/CAIPs/caip-2
///
/// chain_id:    namespace + ":" + reference
/// namespace:   [-a-z0-9]{3,8}
/// reference:   [-_a-zA-Z0-9]{1,32}
static CAIP2_REGEX: OnceLock<Regex> = OnceLock::new();
fn get_caip2_regex() -> &'static Regex {
    CAIP2_REGEX.get_or_init(|| {
        Regex::new(r"^(?P<namespace>[-[:alnum:]]{3,8})((?::)(?P<reference>[-_[:alnum:]]{1,32}))?$")
            .expect("invalid regex: unexpected error")
    })
}

/// Errors covering namespace validation errors.
///
/// https://specs.walletconnect.com/2.0/specs/clients/sign/namespaces
/// and some additional variants.
#[derive(Debug, thiserror::Error, Eq, PartialEq, Clone)]
pub enum ProposeNamespaceError {
    #[error("Required chains are not supported: {0}")]
    UnsupportedChains(String),
    #[error("Chains must not be empty")]
    UnsupportedChainsEmpty,
    #[error("Chains must be CAIP-2 compliant: {0}")]
    UnsupportedChainsCaip2(String),
    #[error("Chains must be defined in matching namespace: expected={0}, actual={1}")]
    UnsupportedChainsNamespace(String, String),
    #[error("Required events are not supported: {0}")]
    UnsupportedEvents(String),
    #[error("Required methods are not supported: {0}")]
    UnsupportedMethods(String),
    #[error("Required namespace is not supported: {0}")]
    UnsupportedNamespace(String),
    #[error("Namespace formatting must match CAIP-2: {0}")]
    UnsupportedNamespaceKey(String),
}

impl ProposeNamespaceError {
    pub fn error_code(&self) -> i32 {
        match self {
            Self::UnsupportedChains(..)
            | Self::UnsupportedChainsEmpty
            | Self::UnsupportedChainsCaip2(..)
            | Self::UnsupportedChainsNamespace(..) => 5100,
            Self::UnsupportedMethods(..) => 5101,
            Self::UnsupportedEvents(..) => 5102,
            Self::UnsupportedNamespace(..) | Self::UnsupportedNamespaceKey(..) => 5104,
        }
    }
}

/// Namespaces requested by a dapp, keyed by CAIP-2 namespace (`eip155`) or
/// by a full chain id (`eip155:1`) when the chain list is omitted.
///
/// https://specs.walletconnect.com/2.0/specs/clients/sign/namespaces
#[derive(Debug, Serialize, Eq, PartialEq, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProposeNamespaces(pub BTreeMap<String, ProposeNamespace>);

impl Deref for ProposeNamespaces {
    type Target = BTreeMap<String, ProposeNamespace>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromIterator<(String, ProposeNamespace)> for ProposeNamespaces {
    fn from_iter<T: IntoIterator<Item = (String, ProposeNamespace)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl ProposeNamespaces {
    /// Ensures that application is compatible with the requester requirements.
    ///
    /// Implementation must support at least all the elements in `required`.
    /// A required key carrying a chain reference (`eip155:1`) with no chain
    /// list is checked as if it listed that single chain.
    pub fn supported(&self, required: &ProposeNamespaces) -> Result<(), ProposeNamespaceError> {
        if self.is_empty() {
            return Err(ProposeNamespaceError::UnsupportedNamespace(
                "None supported".to_string(),
            ));
        }

        for (name, other) in required.iter() {
            let namespace = name.split(':').next().unwrap_or(name);
            let ours = self
                .get(namespace)
                .ok_or_else(|| ProposeNamespaceError::UnsupportedNamespace(name.to_string()))?;

            if other.chains.is_none() && namespace != name {
                ours.supported(&ProposeNamespace {
                    chains: Some(vec![name.to_string()]),
                    ..other.clone()
                })?;
            } else {
                ours.supported(other)?;
            }
        }

        Ok(())
    }

    pub fn caip2_validate(&self) -> Result<(), ProposeNamespaceError> {
        let caip_regex = get_caip2_regex();
        for (name, namespace) in self.iter() {
            let captures = caip_regex
                .captures(name)
                .ok_or_else(|| ProposeNamespaceError::UnsupportedNamespaceKey(name.to_string()))?;

            let name = captures
                .name("namespace")
                .ok_or_else(|| ProposeNamespaceError::UnsupportedNamespaceKey(name.to_string()))?
                .as_str();

            let reference = captures.name("reference").map(|m| m.as_str());

            namespace.chains_caip2_validate(name, reference)?;
        }

        Ok(())
    }

    /// Unions two sets of namespaces key by key, keeping first-seen order of
    /// chains, methods and events. Used to fold optional namespaces into the
    /// required ones.
    pub fn merged(&self, other: &ProposeNamespaces) -> ProposeNamespaces {
        let mut merged = self.0.clone();
        for (name, theirs) in other.iter() {
            merged
                .entry(name.clone())
                .and_modify(|ours| ours.extend(theirs))
                .or_insert_with(|| theirs.clone());
        }
        Self(merged)
    }
}

/// https://specs.walletconnect.com/2.0/specs/clients/sign/namespaces#
/// proposal-namespace
#[derive(Debug, Serialize, PartialEq, Eq, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProposeNamespace {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub chains: Option<Vec<String>>,
    #[serde(default)]
    pub methods: Vec<String>,
    #[serde(default)]
    pub events: Vec<String>,
}

fn join_missing(required: &[String], ours: &[String]) -> Option<String> {
    let missing = required
        .iter()
        .filter(|item| !ours.contains(item))
        .map(|s| s.as_str())
        .collect::<Vec<&str>>();

    (!missing.is_empty()).then(|| missing.join(","))
}

fn extend_unique(ours: &mut Vec<String>, theirs: &[String]) {
    for item in theirs {
        if !ours.contains(item) {
            ours.push(item.clone());
        }
    }
}

impl ProposeNamespace {
    /// Ensures that application is compatible with the requester requirements.
    ///
    /// Implementation must support at least all the elements in `required`.
    pub fn supported(&self, required: &ProposeNamespace) -> Result<(), ProposeNamespaceError> {
        let ours_chains = self.chains.as_deref().unwrap_or_default();
        let required_chains = required.chains.as_deref().unwrap_or_default();

        if let Some(missing) = join_missing(required_chains, ours_chains) {
            return Err(ProposeNamespaceError::UnsupportedChains(missing));
        }

        if let Some(missing) = join_missing(&required.methods, &self.methods) {
            return Err(ProposeNamespaceError::UnsupportedMethods(missing));
        }

        if let Some(missing) = join_missing(&required.events, &self.events) {
            return Err(ProposeNamespaceError::UnsupportedEvents(missing));
        }

        Ok(())
    }

    pub fn chains_caip2_validate(
        &self,
        namespace: &str,
        reference: Option<&str>,
    ) -> Result<(), ProposeNamespaceError> {
        let chains = self.chains.as_deref().unwrap_or_default();

        // https://specs.walletconnect.com/2.0/specs/clients/sign/
        // namespaces#13-chains-might-be-omitted-if-the-caip-2-is-defined-in-the-index
        match (reference, chains.is_empty()) {
            (None, true) => return Err(ProposeNamespaceError::UnsupportedChainsEmpty),
            (Some(_), true) => return Ok(()),
            _ => {}
        }

        let caip_regex = get_caip2_regex();
        for chain in chains {
            let captures = caip_regex
                .captures(chain)
                .ok_or_else(|| ProposeNamespaceError::UnsupportedChainsCaip2(chain.to_string()))?;

            let chain_namespace = captures
                .name("namespace")
                .ok_or_else(|| ProposeNamespaceError::UnsupportedChainsCaip2(chain.to_string()))?
                .as_str();

            if namespace != chain_namespace {
                return Err(ProposeNamespaceError::UnsupportedChainsNamespace(
                    namespace.to_string(),
                    chain_namespace.to_string(),
                ));
            }

            let chain_reference = captures
                .name("reference")
                .map(|m| m.as_str())
                .ok_or_else(|| ProposeNamespaceError::UnsupportedChainsCaip2(chain.to_string()))?;

            if let Some(r) = reference {
                if r != chain_reference {
                    return Err(ProposeNamespaceError::UnsupportedChainsCaip2(
                        chain.to_string(),
                    ));
                }
            }
        }

        Ok(())
    }

    fn extend(&mut self, other: &ProposeNamespace) {
        match (&mut self.chains, &other.chains) {
            (Some(ours), Some(theirs)) => extend_unique(ours, theirs),
            (None, Some(theirs)) => self.chains = Some(theirs.clone()),
            (_, None) => {}
        }
        extend_unique(&mut self.methods, &other.methods);
        extend_unique(&mut self.events, &other.events);
    }
}
