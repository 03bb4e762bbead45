use {
    super::{
        CapabilitiesRequest,
        DappInfo,
        EthTransaction,
        Method,
        Request,
        RequestBase,
        SignMethod,
        SignRequest,
        TransactionRequest,
    },
    crate::{
        chain::{ChainId, SupportedChains},
        message::decode_message,
    },
    serde::Deserialize,
    serde_json::Value,
    sign_api::{domain::Topic, rpc::Metadata},
};

/// Errors raised for request payloads that break the Sign API contract. These
/// indicate a dapp/SDK mismatch, not a recoverable data condition.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("Unsupported method: {0}")]
    UnsupportedMethod(String),

    #[error("Invalid {method} params: {reason}")]
    InvalidParams { method: Method, reason: String },

    #[error("Chain is required for {0}")]
    MissingChain(Method),
}

/// The account a request is addressed to, and the request itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    pub account: String,
    pub request: Request,
}

/// `eth_sendTransaction` parameter object. Unknown fields, `gasPrice` and
/// `nonce` included, are dropped during deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DappTransaction {
    from: String,
    #[serde(default)]
    to: Option<String>,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    data: Option<String>,
    #[serde(default, alias = "gas")]
    gas_limit: Option<String>,
}

impl From<DappTransaction> for EthTransaction {
    fn from(tx: DappTransaction) -> Self {
        Self {
            from: tx.from,
            to: tx.to,
            value: tx.value,
            data: tx.data,
            gas_limit: tx.gas_limit,
        }
    }
}

struct Params<'a> {
    method: Method,
    items: &'a [Value],
}

impl<'a> Params<'a> {
    fn new(method: Method, params: &'a Value) -> Result<Self, RequestError> {
        let items = params.as_array().ok_or_else(|| RequestError::InvalidParams {
            method,
            reason: "expected an array".to_owned(),
        })?;
        Ok(Self { method, items })
    }

    fn invalid(&self, reason: String) -> RequestError {
        RequestError::InvalidParams {
            method: self.method,
            reason,
        }
    }

    fn get(&self, index: usize) -> Result<&'a Value, RequestError> {
        self.items
            .get(index)
            .ok_or_else(|| self.invalid(format!("missing param at position {index}")))
    }

    fn string(&self, index: usize) -> Result<String, RequestError> {
        self.get(index)?
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| self.invalid(format!("param at position {index} is not a string")))
    }

    /// Typed data payloads are sent either JSON-encoded or as a bare object.
    fn string_or_json(&self, index: usize) -> Result<String, RequestError> {
        match self.get(index)? {
            Value::String(value) => Ok(value.clone()),
            value @ Value::Object(_) => Ok(value.to_string()),
            _ => Err(self.invalid(format!(
                "param at position {index} is neither a string nor an object"
            ))),
        }
    }
}

/// Builds a typed request from a `wc_sessionRequest` payload.
///
/// `chain_id` is the already resolved chain of the request; it is required
/// for every method but `wallet_getCapabilities`.
pub fn parse_request(
    chains: &SupportedChains,
    method: Method,
    session_id: Topic,
    internal_id: u64,
    chain_id: Option<ChainId>,
    dapp: &Metadata,
    params: &Value,
) -> Result<ParsedRequest, RequestError> {
    let params = Params::new(method, params)?;
    let base = |account: &str| RequestBase {
        session_id: session_id.clone(),
        internal_id: internal_id.to_string(),
        account: account.to_owned(),
        dapp: DappInfo::from(dapp),
    };
    let require_chain = || chain_id.ok_or(RequestError::MissingChain(method));

    let sign = |sign_method: SignMethod| -> Result<(String, Request), RequestError> {
        let (account, raw_message, message) = address_and_message(sign_method, &params)?;
        let request = Request::Sign(SignRequest {
            base: base(&account),
            method: sign_method,
            chain_id: require_chain()?,
            raw_message,
            message,
        });
        Ok((account, request))
    };

    let (account, request) = match method {
        Method::PersonalSign => sign(SignMethod::PersonalSign)?,
        Method::EthSign => sign(SignMethod::EthSign)?,
        Method::SignTypedData => sign(SignMethod::SignTypedData)?,
        Method::SignTypedDataV4 => sign(SignMethod::SignTypedDataV4)?,
        Method::SendTransaction => {
            let tx: DappTransaction = serde_json::from_value(params.get(0)?.clone())
                .map_err(|err| params.invalid(err.to_string()))?;
            let transaction = EthTransaction::from(tx);
            let account = transaction.from.clone();
            let request = Request::Transaction(TransactionRequest {
                base: base(&account),
                chain_id: require_chain()?,
                transaction,
            });
            (account, request)
        }
        Method::GetCapabilities => {
            let account = params.string(0)?;
            let chain_ids = match params.items.get(1) {
                None | Some(Value::Null) => None,
                Some(Value::Array(references)) => {
                    let references = references
                        .iter()
                        .map(|reference| {
                            reference
                                .as_str()
                                .ok_or_else(|| params.invalid("chain id is not a string".to_owned()))
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    // Well-formed but unsupported chains are dropped.
                    Some(
                        references
                            .into_iter()
                            .filter_map(|reference| chains.chain_id_from_reference(reference))
                            .collect(),
                    )
                }
                Some(_) => {
                    return Err(params.invalid("chain ids are not an array".to_owned()));
                }
            };
            let request = Request::Capabilities(CapabilitiesRequest {
                base: base(&account),
                chain_ids,
            });
            (account, request)
        }
        Method::SignTransaction => {
            return Err(RequestError::UnsupportedMethod(method.to_string()));
        }
    };

    tracing::debug!(
        %method,
        session_id = %session_id,
        internal_id,
        account = %account,
        "parsed session request"
    );

    Ok(ParsedRequest { account, request })
}

/// Positional layout of the signing methods:
/// - `personal_sign`: `[message, account]`
/// - `eth_sign`, `eth_signTypedData*`: `[account, message]`
///
/// https://docs.walletconnect.com/2.0/advanced/rpc-reference/ethereum-rpc#personal_sign
fn address_and_message(
    method: SignMethod,
    params: &Params<'_>,
) -> Result<(String, String, Option<String>), RequestError> {
    match method {
        SignMethod::PersonalSign => {
            let raw_message = params.string(0)?;
            let message = decode_message(&raw_message);
            Ok((params.string(1)?, raw_message, Some(message)))
        }
        SignMethod::EthSign => {
            let raw_message = params.string(1)?;
            let message = decode_message(&raw_message);
            Ok((params.string(0)?, raw_message, Some(message)))
        }
        SignMethod::SignTypedData | SignMethod::SignTypedDataV4 => {
            Ok((params.string(0)?, params.string_or_json(1)?, None))
        }
    }
}
