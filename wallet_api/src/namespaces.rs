use sign_api::rpc::{ProposeNamespace, ProposeNamespaces, SettleNamespace, SettleNamespaces};

/// Builds the namespaces granted to a dapp when `account` approves its
/// proposal.
///
/// Each proposed chain becomes a `<chain>:<account>` entry; a namespace
/// without a chain list (keyed by a full chain id such as `eip155:1`) gets a
/// single `<key>:<account>` entry. Methods and events are carried over as
/// proposed.
///
/// No support checks are made here: the proposal must already have been
/// validated against what the wallet supports.
pub fn build_session_namespaces(account: &str, proposal: &ProposeNamespaces) -> SettleNamespaces {
    proposal
        .iter()
        .map(|(key, namespace)| {
            let accounts = match &namespace.chains {
                Some(chains) => chains.iter().map(|chain| format!("{chain}:{account}")).collect(),
                None => vec![format!("{key}:{account}")],
            };

            let settled = SettleNamespace {
                accounts,
                methods: namespace.methods.clone(),
                events: namespace.events.clone(),
                chains: namespace.chains.clone(),
            };
            (key.clone(), settled)
        })
        .collect()
}

/// Narrows a dapp proposal to what the wallet supports.
///
/// Chains, methods and events the wallet does not list are dropped. A
/// namespace left without a single supported chain is dropped entirely, as is
/// a bare namespace key (`eip155`) that lists no chains.
pub fn supported_proposal_namespaces(
    proposal: &ProposeNamespaces,
    ours: &ProposeNamespaces,
) -> ProposeNamespaces {
    proposal
        .iter()
        .filter_map(|(key, theirs)| {
            let namespace = key.split(':').next().unwrap_or(key);
            let ours = ours.get(namespace)?;
            let our_chains = ours.chains.as_deref().unwrap_or_default();

            let chains = match &theirs.chains {
                Some(chains) => {
                    let chains = retain_listed(chains, our_chains);
                    if chains.is_empty() {
                        return None;
                    }
                    Some(chains)
                }
                None if key != namespace && our_chains.contains(key) => None,
                None => return None,
            };

            let narrowed = ProposeNamespace {
                chains,
                methods: retain_listed(&theirs.methods, &ours.methods),
                events: retain_listed(&theirs.events, &ours.events),
            };
            Some((key.clone(), narrowed))
        })
        .collect()
}

/// CAIP-2 chains a proposal covers, in proposal order. A key carrying a
/// chain reference stands for its chain when no list is given.
pub fn proposed_chains(proposal: &ProposeNamespaces) -> Vec<String> {
    let mut chains: Vec<String> = Vec::new();
    for (key, namespace) in proposal.iter() {
        let listed = match &namespace.chains {
            Some(listed) => listed.clone(),
            None if key.contains(':') => vec![key.clone()],
            None => Vec::new(),
        };
        for chain in listed {
            if !chains.contains(&chain) {
                chains.push(chain);
            }
        }
    }
    chains
}

fn retain_listed(items: &[String], listed: &[String]) -> Vec<String> {
    items
        .iter()
        .filter(|item| listed.contains(item))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCOUNT: &str = "0xBA5BA3955463ADcc7aa3E33bbdfb8A68e0933dD8";

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn one_account_per_chain() {
        let proposal: ProposeNamespaces = [(
            "eip155".to_string(),
            ProposeNamespace {
                chains: Some(strings(&["eip155:1", "eip155:137"])),
                methods: strings(&["personal_sign", "eth_sendTransaction"]),
                events: strings(&["chainChanged", "accountsChanged"]),
            },
        )]
        .into_iter()
        .collect();

        let namespaces = build_session_namespaces(ACCOUNT, &proposal);
        let eip155 = namespaces.get("eip155").expect("eip155 namespace");

        assert_eq!(
            eip155.accounts,
            vec![format!("eip155:1:{ACCOUNT}"), format!("eip155:137:{ACCOUNT}")]
        );
        assert_eq!(eip155.methods, strings(&["personal_sign", "eth_sendTransaction"]));
        assert_eq!(eip155.events, strings(&["chainChanged", "accountsChanged"]));
        assert_eq!(eip155.chains, Some(strings(&["eip155:1", "eip155:137"])));
    }

    #[test]
    fn key_used_when_chains_absent() {
        let proposal: ProposeNamespaces = [
            (
                "eip155:10".to_string(),
                ProposeNamespace {
                    chains: None,
                    methods: strings(&["personal_sign"]),
                    events: vec![],
                },
            ),
            (
                "eip155".to_string(),
                ProposeNamespace {
                    chains: Some(strings(&["eip155:8453"])),
                    methods: vec![],
                    events: vec![],
                },
            ),
        ]
        .into_iter()
        .collect();

        let namespaces = build_session_namespaces(ACCOUNT, &proposal);

        assert_eq!(namespaces.len(), 2);
        assert_eq!(
            namespaces.get("eip155:10").map(|n| n.accounts.clone()),
            Some(vec![format!("eip155:10:{ACCOUNT}")])
        );
        assert_eq!(
            namespaces.accounts().map(str::to_owned).collect::<Vec<_>>(),
            vec![
                format!("eip155:8453:{ACCOUNT}"),
                format!("eip155:10:{ACCOUNT}")
            ]
        );
    }

    #[test]
    fn no_support_checks() {
        let proposal: ProposeNamespaces = [(
            "eip155".to_string(),
            ProposeNamespace {
                chains: Some(strings(&["eip155:5"])),
                methods: strings(&["eth_signTransaction"]),
                events: vec![],
            },
        )]
        .into_iter()
        .collect();

        let namespaces = build_session_namespaces(ACCOUNT, &proposal);

        assert_eq!(
            namespaces.accounts().map(str::to_owned).collect::<Vec<_>>(),
            vec![format!("eip155:5:{ACCOUNT}")]
        );
    }

    #[test]
    fn empty_proposal() {
        assert!(build_session_namespaces(ACCOUNT, &ProposeNamespaces::default()).is_empty());
    }

    fn wallet() -> ProposeNamespaces {
        [(
            "eip155".to_string(),
            ProposeNamespace {
                chains: Some(strings(&["eip155:1", "eip155:10", "eip155:8453"])),
                methods: strings(&["personal_sign", "eth_sendTransaction"]),
                events: strings(&["chainChanged", "accountsChanged"]),
            },
        )]
        .into_iter()
        .collect()
    }

    #[test]
    fn narrows_to_supported() {
        let proposal: ProposeNamespaces = [(
            "eip155".to_string(),
            ProposeNamespace {
                chains: Some(strings(&["eip155:5", "eip155:8453", "eip155:1"])),
                methods: strings(&["eth_sendTransaction", "eth_signTransaction"]),
                events: strings(&["accountsChanged", "message"]),
            },
        )]
        .into_iter()
        .collect();

        let narrowed = supported_proposal_namespaces(&proposal, &wallet());

        assert_eq!(
            narrowed.get("eip155"),
            Some(&ProposeNamespace {
                chains: Some(strings(&["eip155:8453", "eip155:1"])),
                methods: strings(&["eth_sendTransaction"]),
                events: strings(&["accountsChanged"]),
            })
        );
    }

    #[test]
    fn drops_unsupported_namespaces() {
        let proposal: ProposeNamespaces = [
            (
                "solana".to_string(),
                ProposeNamespace {
                    chains: Some(strings(&["solana:4sGjMW1sUnHzSxGspuhpqLDx6wiyjNtZ"])),
                    methods: vec![],
                    events: vec![],
                },
            ),
            (
                "eip155:137".to_string(),
                ProposeNamespace::default(),
            ),
            (
                "eip155:10".to_string(),
                ProposeNamespace::default(),
            ),
            ("eip155".to_string(), ProposeNamespace::default()),
        ]
        .into_iter()
        .collect();

        let narrowed = supported_proposal_namespaces(&proposal, &wallet());

        assert_eq!(narrowed.keys().collect::<Vec<_>>(), vec!["eip155:10"]);
    }

    #[test]
    fn chains_deduplicated_in_order() {
        let proposal: ProposeNamespaces = [
            (
                "eip155".to_string(),
                ProposeNamespace {
                    chains: Some(strings(&["eip155:8453", "eip155:1"])),
                    methods: vec![],
                    events: vec![],
                },
            ),
            ("eip155:1".to_string(), ProposeNamespace::default()),
            ("eip155:42161".to_string(), ProposeNamespace::default()),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            proposed_chains(&proposal),
            strings(&["eip155:8453", "eip155:1", "eip155:42161"])
        );
    }
}
