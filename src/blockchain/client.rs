//! Ledger JSON-RPC connection with deadlines and error classification.
//!
//! # Responsibilities
//! - Validate the endpoint without touching the network
//! - Issue JSON-RPC calls under a per-request deadline
//! - Map every failure to a distinct, classifiable `ClientError`
//! - Provide the liveness probe (`getVersion`)

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tokio::time::timeout;
use url::Url;

use crate::blockchain::keypair::{Pubkey, Signature};
use crate::blockchain::rpc::{
    RpcAccount, RpcRequest, RpcResponse, RpcSignatureStatus, WithContext,
};
use crate::blockchain::transaction::SignedTransaction;
use crate::blockchain::types::{
    is_transient_code, AccountInfo, ClientError, ClientResult, Commitment, RpcConfig,
    TransactionStatus, VersionInfo,
};
use crate::observability::metrics;

/// Default per-request deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest server error body kept in an error message.
const MAX_ERROR_BODY: usize = 256;

/// Session to one ledger RPC endpoint.
///
/// Cloning is cheap and shares the underlying HTTP connection pool. All
/// fields are immutable after `open`, so one connection can serve any
/// number of concurrent callers.
#[derive(Clone)]
pub struct Connection {
    http: reqwest::Client,
    endpoint: Url,
    commitment: Commitment,
    timeout: Duration,
}

impl Connection {
    /// Open a connection with the default deadline. Performs no I/O.
    pub fn open(endpoint: &str, commitment: Commitment) -> ClientResult<Self> {
        Self::with_timeout(endpoint, commitment, DEFAULT_TIMEOUT)
    }

    /// Open a connection with an explicit per-request deadline.
    pub fn with_timeout(
        endpoint: &str,
        commitment: Commitment,
        request_timeout: Duration,
    ) -> ClientResult<Self> {
        let endpoint = parse_endpoint(endpoint)?;

        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| ClientError::Configuration(format!("HTTP client setup failed: {}", e)))?;

        tracing::debug!(
            rpc_url = %endpoint,
            commitment = %commitment,
            timeout_ms = request_timeout.as_millis() as u64,
            "Connection opened"
        );

        Ok(Self {
            http,
            endpoint,
            commitment,
            timeout: request_timeout,
        })
    }

    /// Open a connection from the `[rpc]` config section.
    pub fn from_config(config: &RpcConfig) -> ClientResult<Self> {
        Self::with_timeout(&config.url, config.commitment, config.timeout())
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn commitment(&self) -> Commitment {
        self.commitment
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Ask the endpoint for its version. A single round trip, never retried.
    pub async fn probe_liveness(&self) -> ClientResult<VersionInfo> {
        let result: ClientResult<VersionInfo> = self
            .call("getVersion", json!([]))
            .await
            .and_then(|version: VersionInfo| {
                if version.version.trim().is_empty() {
                    Err(ClientError::Protocol("getVersion returned an empty version".to_string()))
                } else {
                    Ok(version)
                }
            });

        match &result {
            Ok(version) => tracing::info!(
                rpc_url = %self.endpoint,
                version = %version.version,
                feature_set = version.feature_set,
                "Endpoint is live"
            ),
            Err(e) => tracing::warn!(rpc_url = %self.endpoint, error = %e, "Liveness probe failed"),
        }
        metrics::record_endpoint_health(result.is_ok());

        result
    }

    /// Broadcast a signed transaction once and return the ledger's signature.
    ///
    /// A JSON-RPC error here means the ledger refused the transaction and is
    /// reported as `Rejected`, unless the code describes node health.
    pub async fn send_transaction(&self, tx: &SignedTransaction) -> ClientResult<Signature> {
        let params = json!([
            tx.to_base64(),
            {
                "encoding": "base64",
                "skipPreflight": false,
                "preflightCommitment": self.commitment,
            }
        ]);

        let signature: String = self
            .call("sendTransaction", params)
            .await
            .map_err(rejection)?;

        signature.parse().map_err(|e| {
            ClientError::Protocol(format!("sendTransaction returned bad signature: {}", e))
        })
    }

    /// Current status of a signature, or `None` if the ledger has not seen it.
    pub async fn get_signature_status(
        &self,
        signature: &Signature,
    ) -> ClientResult<Option<TransactionStatus>> {
        let params = json!([[signature.to_string()], { "searchTransactionHistory": true }]);

        let response: WithContext<Vec<Option<RpcSignatureStatus>>> =
            self.call("getSignatureStatuses", params).await?;

        let entry = response.value.into_iter().next().ok_or_else(|| {
            ClientError::Protocol("getSignatureStatuses returned no entries".to_string())
        })?;

        Ok(entry.map(TransactionStatus::from))
    }

    /// Balance of an account in the ledger's smallest unit.
    pub async fn get_balance(&self, pubkey: &Pubkey) -> ClientResult<u64> {
        let params = json!([pubkey.to_string(), { "commitment": self.commitment }]);
        let response: WithContext<u64> = self.call("getBalance", params).await?;
        Ok(response.value)
    }

    /// Account state, or `None` if the account does not exist.
    pub async fn get_account_info(&self, pubkey: &Pubkey) -> ClientResult<Option<AccountInfo>> {
        let params = json!([
            pubkey.to_string(),
            { "encoding": "base64", "commitment": self.commitment }
        ]);
        let response: WithContext<Option<RpcAccount>> =
            self.call("getAccountInfo", params).await?;
        response.value.map(AccountInfo::try_from).transpose()
    }

    /// Issue one JSON-RPC call under the connection deadline.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: Value,
    ) -> ClientResult<T> {
        let started = Instant::now();

        let result = match timeout(self.timeout, self.execute(method, params)).await {
            Ok(result) => result,
            Err(_) => Err(ClientError::Timeout(self.timeout)),
        };

        metrics::record_rpc_call(
            method,
            metrics::outcome_label(result.as_ref().map(|_| ())),
            started.elapsed(),
        );
        if let Err(e) = &result {
            tracing::debug!(method, error = %e, "RPC call failed");
        }

        result
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: Value,
    ) -> ClientResult<T> {
        let request = RpcRequest::new(method, params);
        tracing::trace!(method, id = %request.id, "Sending RPC request");

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown status").to_string()
            } else {
                body.chars().take(MAX_ERROR_BODY).collect()
            };
            return Err(ClientError::Server {
                code: status.as_u16() as i64,
                message,
            });
        }

        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;
        let parsed: RpcResponse<T> = serde_json::from_slice(&body)
            .map_err(|e| ClientError::Protocol(format!("malformed {} response: {}", method, e)))?;

        parsed.into_result()
    }

    fn transport_error(&self, e: reqwest::Error) -> ClientError {
        if e.is_timeout() {
            ClientError::Timeout(self.timeout)
        } else {
            ClientError::NetworkUnreachable(e.to_string())
        }
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("rpc_url", &self.endpoint.as_str())
            .field("commitment", &self.commitment)
            .field("timeout_ms", &self.timeout.as_millis())
            .finish()
    }
}

/// Map a `sendTransaction` RPC error to `Rejected` unless it describes node health.
fn rejection(e: ClientError) -> ClientError {
    match e {
        ClientError::Server { code, message } if code < 0 && !is_transient_code(code) => {
            ClientError::Rejected {
                code,
                reason: message,
            }
        }
        other => other,
    }
}

fn parse_endpoint(endpoint: &str) -> ClientResult<Url> {
    let invalid = |reason: String| ClientError::InvalidEndpoint {
        url: endpoint.to_string(),
        reason,
    };

    let url = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().unwrap_or_default().is_empty() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_valid_endpoint() {
        let conn =
            Connection::open("https://api.devnet.solana.com", Commitment::Confirmed).unwrap();
        assert_eq!(conn.endpoint().host_str(), Some("api.devnet.solana.com"));
        assert_eq!(conn.commitment(), Commitment::Confirmed);
        assert_eq!(conn.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_open_rejects_malformed_url() {
        let err = Connection::open("not a url", Commitment::Confirmed).unwrap_err();
        assert!(matches!(err, ClientError::InvalidEndpoint { .. }));

        let err = Connection::open("ws://localhost:8900", Commitment::Confirmed).unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn test_from_config() {
        let config = RpcConfig {
            url: "http://127.0.0.1:8899".to_string(),
            commitment: Commitment::Finalized,
            timeout_ms: 1500,
        };
        let conn = Connection::from_config(&config).unwrap();
        assert_eq!(conn.commitment(), Commitment::Finalized);
        assert_eq!(conn.timeout(), Duration::from_millis(1500));
    }

    #[test]
    fn test_debug_output() {
        let conn = Connection::open("http://localhost:8899", Commitment::Processed).unwrap();
        let debug = format!("{:?}", conn);
        assert!(debug.contains("localhost:8899"));
        assert!(debug.contains("Processed"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        // Port 9 (discard) is essentially never listening on loopback.
        let conn = Connection::with_timeout(
            "http://127.0.0.1:9",
            Commitment::Confirmed,
            Duration::from_secs(2),
        )
        .unwrap();

        let err = conn.probe_liveness().await.unwrap_err();
        assert!(matches!(err, ClientError::NetworkUnreachable(_)), "got {:?}", err);
        assert!(err.is_transient());
    }
}
