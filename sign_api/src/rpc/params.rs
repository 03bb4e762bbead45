pub(super) mod session_delete;
pub(super) mod session_propose;
pub(super) mod session_request;
pub(super) mod session_settle;
pub(super) mod shared_types;

pub use {
    session_delete::*, session_propose::*, session_request::*, session_settle::*,
    shared_types::*,
};

use serde::{Deserialize, Serialize};

/// Sign API request parameters the wallet receives or sends.
///
/// https://specs.walletconnect.com/2.0/specs/clients/sign/rpc-methods
/// https://specs.walletconnect.com/2.0/specs/clients/sign/data-structures
#[derive(Debug, Serialize, Eq, Deserialize, Clone, PartialEq)]
#[serde(tag = "method", content = "params")]
pub enum RequestParams {
    #[serde(rename = "wc_sessionPropose")]
    SessionPropose(SessionProposeRequest),
    #[serde(rename = "wc_sessionSettle")]
    SessionSettle(SessionSettleRequest),
    #[serde(rename = "wc_sessionRequest")]
    SessionRequest(SessionRequestRequest),
    #[serde(rename = "wc_sessionDelete")]
    SessionDelete(SessionDeleteRequest),
    #[serde(rename = "wc_sessionPing")]
    SessionPing(()),
}

impl RequestParams {
    /// Sign API method name of the parameters.
    pub fn method(&self) -> &'static str {
        match self {
            Self::SessionPropose(_) => "wc_sessionPropose",
            Self::SessionSettle(_) => "wc_sessionSettle",
            Self::SessionRequest(_) => "wc_sessionRequest",
            Self::SessionDelete(_) => "wc_sessionDelete",
            Self::SessionPing(_) => "wc_sessionPing",
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use anyhow::Result;
    use serde::de::DeserializeOwned;

    /// Trims json of the whitespaces and newlines.
    ///
    /// Allows to use "pretty json" in unittest, and still get consistent
    /// results post serialization/deserialization.
    pub fn param_json_trim(json: &str) -> String {
        json.chars()
            .filter(|c| !c.is_whitespace() && *c != '\n')
            .collect::<String>()
    }

    /// Tests input json serialization/deserialization into the specified type.
    pub fn param_serde_test<T>(json: &str) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
    {
        let expected = param_json_trim(json);
        let deserialized: T = serde_json::from_str(&expected)?;
        let actual = serde_json::to_string(&deserialized)?;

        assert_eq!(expected, actual);

        Ok(())
    }

    #[test]
    fn method_names_match_serde_tags() -> Result<()> {
        let params = RequestParams::SessionDelete(SessionDeleteRequest {
            code: 6000,
            message: "".to_owned(),
        });
        let value = serde_json::to_value(&params)?;

        assert_eq!(value["method"], params.method());

        Ok(())
    }
}
