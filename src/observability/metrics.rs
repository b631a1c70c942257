//! Metrics collection.
//!
//! # Metrics
//! - `ledger_rpc_requests_total` (counter): RPC calls by method, outcome
//! - `ledger_rpc_request_duration_seconds` (histogram): RPC latency by method
//! - `ledger_rpc_retries_total` (counter): retry attempts by operation
//! - `ledger_endpoint_healthy` (gauge): 1=last probe succeeded, 0=failed
//! - `ledger_confirmations_total` (counter): confirmation outcomes

use std::time::Duration;

use crate::blockchain::types::{ClientError, ConfirmationOutcome};

/// Short label for an RPC call result.
pub fn outcome_label(result: Result<(), &ClientError>) -> &'static str {
    match result {
        Ok(()) => "ok",
        Err(ClientError::NetworkUnreachable(_)) => "unreachable",
        Err(ClientError::Timeout(_)) => "timeout",
        Err(ClientError::Protocol(_)) => "protocol_error",
        Err(ClientError::Server { .. }) => "server_error",
        Err(ClientError::Rejected { .. }) => "rejected",
        Err(_) => "error",
    }
}

/// Record one completed RPC call.
pub fn record_rpc_call(method: &'static str, outcome: &'static str, elapsed: Duration) {
    metrics::counter!("ledger_rpc_requests_total", "method" => method, "outcome" => outcome)
        .increment(1);
    metrics::histogram!("ledger_rpc_request_duration_seconds", "method" => method)
        .record(elapsed.as_secs_f64());
}

/// Record a retry of `operation`.
pub fn record_retry(operation: &'static str) {
    metrics::counter!("ledger_rpc_retries_total", "operation" => operation).increment(1);
}

/// Record the result of a liveness probe.
pub fn record_endpoint_health(healthy: bool) {
    metrics::gauge!("ledger_endpoint_healthy").set(if healthy { 1.0 } else { 0.0 });
}

/// Record how a confirmation wait ended.
pub fn record_confirmation(outcome: &ConfirmationOutcome) {
    let label = match outcome {
        ConfirmationOutcome::Finalized { .. } => "finalized",
        ConfirmationOutcome::Failed { .. } => "failed",
        ConfirmationOutcome::TimedOut { .. } => "timed_out",
    };
    metrics::counter!("ledger_confirmations_total", "outcome" => label).increment(1);
}
