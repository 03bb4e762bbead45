//! https://specs.walletconnect.com/2.0/specs/clients/sign/rpc-methods
//! #wc_sessiondelete

use serde::{Deserialize, Serialize};

/// Reason code sent when the user disconnects a session from the wallet.
pub const USER_DISCONNECTED_CODE: i64 = 6000;

#[derive(Debug, Serialize, PartialEq, Eq, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SessionDeleteRequest {
    pub code: i64,
    pub message: String,
}

impl SessionDeleteRequest {
    pub fn user_disconnected() -> Self {
        Self {
            code: USER_DISCONNECTED_CODE,
            message: "User disconnected.".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use super::super::tests::param_serde_test;
    use anyhow::Result;

    #[test]
    fn test_serde_session_delete_request() -> Result<()> {
        let json = r#"
        {
            "code": 1675757972688031,
            "message": "some message"
        }
        "#;

        param_serde_test::<SessionDeleteRequest>(json)
    }
}
