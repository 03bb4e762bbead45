use {
    serde::{Deserialize, Serialize},
    std::{collections::BTreeMap, ops::Deref},
};

/// Namespaces granted by the wallet when a session is approved.
///
/// TODO: CAIP-10 validation of `accounts`.
#[derive(Debug, Serialize, PartialEq, Eq, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SettleNamespaces(pub BTreeMap<String, SettleNamespace>);

impl Deref for SettleNamespaces {
    type Target = BTreeMap<String, SettleNamespace>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl SettleNamespaces {
    /// Every account id granted under any namespace.
    pub fn accounts(&self) -> impl Iterator<Item = &str> {
        self.values()
            .flat_map(|namespace| namespace.accounts.iter().map(String::as_str))
    }
}

impl FromIterator<(String, SettleNamespace)> for SettleNamespaces {
    fn from_iter<T: IntoIterator<Item = (String, SettleNamespace)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Serialize, PartialEq, Eq, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SettleNamespace {
    /// CAIP-10 account ids, `<namespace>:<reference>:<address>`.
    pub accounts: Vec<String>,
    pub methods: Vec<String>,
    pub events: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub chains: Option<Vec<String>>,
}
