//! Ledger-specific types and error definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::blockchain::keypair::{KeyError, Pubkey, Signature};

// Re-export RpcConfig from config module to avoid duplication
pub use crate::config::schema::RpcConfig;

/// How finalized a ledger state must be before it is trusted.
///
/// Ordered from least to most confirmed, so `a >= b` reads as
/// "`a` is at least as final as `b`".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    /// Seen by the node, may still be rolled back.
    Processed,
    /// Voted on by a supermajority.
    #[default]
    Confirmed,
    /// Rooted; will not be rolled back.
    Finalized,
}

impl Commitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Commitment {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "processed" => Ok(Commitment::Processed),
            "confirmed" => Ok(Commitment::Confirmed),
            "finalized" => Ok(Commitment::Finalized),
            other => Err(ClientError::Configuration(format!(
                "Unknown commitment level '{}'",
                other
            ))),
        }
    }
}

/// Errors that can occur while talking to the ledger.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Missing or malformed configuration (including the secret itself).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Key material could not be turned into a signer.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// Endpoint URL is not a usable http(s) URL.
    #[error("Invalid endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    /// Connection-level failure: DNS, refused, reset.
    #[error("Network unreachable: {0}")]
    NetworkUnreachable(String),

    /// No response within the configured deadline.
    #[error("RPC timeout after {} ms", .0.as_millis())]
    Timeout(Duration),

    /// Endpoint answered but the payload did not match the expected schema.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Endpoint returned an explicit error status.
    ///
    /// Positive codes are HTTP statuses, negative codes are JSON-RPC errors.
    #[error("Server error {code}: {message}")]
    Server { code: i64, message: String },

    /// The ledger refused a submitted transaction.
    #[error("Transaction rejected ({code}): {reason}")]
    Rejected { code: i64, reason: String },

    /// Signed payload is not a well-formed transaction.
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),
}

/// JSON-RPC code a node returns while it is behind or unhealthy.
pub const RPC_NODE_UNHEALTHY: i64 = -32005;
/// JSON-RPC internal error.
pub const RPC_INTERNAL_ERROR: i64 = -32603;

impl ClientError {
    /// Whether the failure may clear up on its own.
    ///
    /// Only these are eligible for retry; rejections and protocol errors
    /// will fail the same way again.
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::NetworkUnreachable(_) | ClientError::Timeout(_) => true,
            ClientError::Server { code, .. } => is_transient_code(*code),
            _ => false,
        }
    }
}

/// HTTP 429/5xx, or a JSON-RPC code describing node state rather than the request.
pub(crate) fn is_transient_code(code: i64) -> bool {
    matches!(code, 429 | 500..=599 | RPC_NODE_UNHEALTHY | RPC_INTERNAL_ERROR)
}

/// Result type for ledger operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Version descriptor returned by the liveness probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Node software version, e.g. "1.18.22".
    #[serde(rename = "solana-core", alias = "version")]
    pub version: String,

    /// Protocol feature-set identifier.
    #[serde(rename = "feature-set", alias = "featureSet", default)]
    pub feature_set: u32,
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (feature set {})", self.version, self.feature_set)
    }
}

/// Account state as reported by `getAccountInfo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    /// Balance in the ledger's smallest unit.
    pub lamports: u64,
    /// Program that owns the account.
    pub owner: Pubkey,
    /// Raw account data, decoded from base64.
    pub data: Vec<u8>,
    pub executable: bool,
    pub rent_epoch: u64,
}

/// A transaction accepted by the endpoint and awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedTransaction {
    pub signature: Signature,
    /// Commitment the submission was made under.
    pub commitment: Commitment,
}

/// Ledger-reported status of a single transaction signature.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionStatus {
    pub slot: u64,
    /// Number of confirmed blocks on top; `None` once rooted.
    pub confirmations: Option<u64>,
    pub commitment: Option<Commitment>,
    /// Rejection reason if the transaction failed on-chain.
    pub err: Option<String>,
}

impl TransactionStatus {
    /// True if the status is at least as final as `target`.
    pub fn satisfies(&self, target: Commitment) -> bool {
        self.err.is_none() && self.commitment.map(|c| c >= target).unwrap_or(false)
    }
}

/// Final answer from the confirmation oracle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    /// Reached or exceeded the requested commitment.
    Finalized { slot: u64, commitment: Commitment },
    /// The ledger reported the transaction as failed.
    Failed { slot: u64, reason: String },
    /// Stopped waiting; the transaction may still land later.
    TimedOut { last_seen: Option<Commitment> },
}

impl ConfirmationOutcome {
    pub fn is_finalized(&self) -> bool {
        matches!(self, ConfirmationOutcome::Finalized { .. })
    }
}
