//! JSON-RPC 2.0 envelopes and ledger response payloads.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::blockchain::types::{
    AccountInfo, ClientError, ClientResult, Commitment, TransactionStatus,
};

/// Outgoing JSON-RPC request.
#[derive(Debug, Serialize)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: Uuid,
    pub method: &'a str,
    pub params: Value,
}

impl<'a> RpcRequest<'a> {
    pub fn new(method: &'a str, params: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id: Uuid::new_v4(),
            method,
            params,
        }
    }
}

/// Error object carried by a failed JSON-RPC response.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Incoming JSON-RPC response. Exactly one of `result` / `error` is set.
#[derive(Debug, Deserialize)]
pub struct RpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<RpcErrorObject>,
}

impl<T> RpcResponse<T> {
    /// Collapse into the result, mapping an error object to `Server`.
    pub fn into_result(self) -> ClientResult<T> {
        if let Some(error) = self.error {
            return Err(ClientError::Server {
                code: error.code,
                message: error.message,
            });
        }
        self.result.ok_or_else(|| {
            ClientError::Protocol("response has neither result nor error".to_string())
        })
    }
}

/// Wrapper used by methods that report the slot they were evaluated at.
/// Only the value is kept.
#[derive(Debug, Deserialize)]
pub struct WithContext<T> {
    pub value: T,
}

/// One entry of a `getSignatureStatuses` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcSignatureStatus {
    pub slot: u64,
    #[serde(default)]
    pub confirmations: Option<u64>,
    #[serde(default)]
    pub err: Option<Value>,
    #[serde(default)]
    pub confirmation_status: Option<Commitment>,
}

impl From<RpcSignatureStatus> for TransactionStatus {
    fn from(status: RpcSignatureStatus) -> Self {
        // Older nodes omit confirmationStatus; no confirmations means rooted.
        let commitment = status.confirmation_status.or(match status.confirmations {
            None => Some(Commitment::Finalized),
            Some(_) => None,
        });

        TransactionStatus {
            slot: status.slot,
            confirmations: status.confirmations,
            commitment,
            err: status.err.filter(|e| !e.is_null()).map(|e| match e {
                Value::String(s) => s,
                other => other.to_string(),
            }),
        }
    }
}

/// `getAccountInfo` value, requested with `"encoding": "base64"`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcAccount {
    pub lamports: u64,
    pub owner: String,
    /// `[payload, encoding]`
    pub data: (String, String),
    #[serde(default)]
    pub executable: bool,
    #[serde(default)]
    pub rent_epoch: u64,
}

impl TryFrom<RpcAccount> for AccountInfo {
    type Error = ClientError;

    fn try_from(account: RpcAccount) -> ClientResult<Self> {
        let (payload, encoding) = account.data;
        if encoding != "base64" {
            return Err(ClientError::Protocol(format!(
                "account data in unexpected encoding '{}'",
                encoding
            )));
        }

        Ok(AccountInfo {
            lamports: account.lamports,
            owner: account
                .owner
                .parse()
                .map_err(|e| ClientError::Protocol(format!("bad account owner: {}", e)))?,
            data: STANDARD
                .decode(payload)
                .map_err(|e| ClientError::Protocol(format!("bad account data: {}", e)))?,
            executable: account.executable,
            rent_epoch: account.rent_epoch,
        })
    }
}
