//! Transaction submission and confirmation monitoring.
//!
//! # Responsibilities
//! - Broadcast signed transactions, retrying transient failures
//! - Poll signature status until the requested commitment is reached
//! - Distinguish failure from "stopped waiting"
//!
//! # State Machine
//! ```text
//! Pending → Processed → Confirmed → Finalized
//!    │          │           │
//!    └──────────┴───────────┴──→ Failed (ledger reported an error)
//!
//! Deadline or shutdown at any point → TimedOut (inconclusive)
//! ```
//!
//! Resubmitting is safe because the ledger deduplicates by signature: the
//! same signed bytes can land at most once.

use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{sleep_until, Instant};

use crate::blockchain::client::Connection;
use crate::blockchain::transaction::SignedTransaction;
use crate::blockchain::types::{
    ClientError, ClientResult, Commitment, ConfirmationOutcome, SubmittedTransaction,
    TransactionStatus,
};
use crate::config::ConfirmationConfig;
use crate::observability::metrics;
use crate::resilience::RetryPolicy;

/// Submits transactions and waits for their finality.
#[derive(Debug, Clone)]
pub struct ConfirmationOracle {
    connection: Connection,
    poll_interval: Duration,
    retry: RetryPolicy,
}

impl ConfirmationOracle {
    /// Create a new oracle over an open connection.
    pub fn new(connection: Connection, config: &ConfirmationConfig, retry: RetryPolicy) -> Self {
        Self {
            connection,
            poll_interval: config.poll_interval(),
            retry,
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Broadcast `tx`, retrying transient failures with backoff.
    ///
    /// Rejections are returned immediately; resending the same bytes cannot
    /// change the ledger's answer.
    pub async fn submit(
        &self,
        tx: &SignedTransaction,
        commitment: Commitment,
    ) -> ClientResult<SubmittedTransaction> {
        let expected = tx.signature();

        let signature = self
            .retry
            .run("sendTransaction", move |attempt| async move {
                tracing::debug!(signature = %expected, attempt, "Submitting transaction");
                self.connection.send_transaction(tx).await
            })
            .await?;

        if signature != expected {
            return Err(ClientError::Protocol(format!(
                "ledger reported signature {} for transaction {}",
                signature, expected
            )));
        }

        tracing::info!(signature = %signature, commitment = %commitment, "Transaction submitted");

        Ok(SubmittedTransaction {
            signature,
            commitment,
        })
    }

    /// Wait until `submitted` reaches `commitment`, fails, or `deadline` passes.
    pub async fn await_confirmation(
        &self,
        submitted: &SubmittedTransaction,
        commitment: Commitment,
        deadline: Duration,
    ) -> ClientResult<ConfirmationOutcome> {
        // Keep a sender alive so the receiver never reports Closed.
        let (_never, shutdown) = broadcast::channel(1);
        self.await_confirmation_until(submitted, commitment, deadline, shutdown)
            .await
    }

    /// Like [`await_confirmation`](Self::await_confirmation), but also stops
    /// when `shutdown` fires. Stopping early yields `TimedOut`, since the
    /// transaction may still land.
    pub async fn await_confirmation_until(
        &self,
        submitted: &SubmittedTransaction,
        commitment: Commitment,
        deadline: Duration,
        mut shutdown: broadcast::Receiver<()>,
    ) -> ClientResult<ConfirmationOutcome> {
        let signature = submitted.signature;
        let deadline_at = Instant::now() + deadline;
        let mut last_seen = None;

        // First check always runs, even with a zero deadline.
        let mut polled = Some(self.check_status(submitted).await);

        let outcome = loop {
            if let Some(result) = polled.take() {
                match result {
                    Ok(Some(status)) => {
                        last_seen = status.commitment.or(last_seen);
                        if let Some(outcome) = resolve(&status, commitment) {
                            break outcome;
                        }
                        tracing::debug!(
                            signature = %signature,
                            slot = status.slot,
                            status = ?status.commitment,
                            target = %commitment,
                            "Waiting for commitment"
                        );
                    }
                    Ok(None) => tracing::debug!(signature = %signature, "Transaction not yet seen"),
                    Err(e) if e.is_transient() => {
                        tracing::warn!(
                            signature = %signature,
                            error = %e,
                            "Status poll failed, will retry"
                        );
                    }
                    Err(e) => return Err(e),
                }
            }

            if Instant::now() >= deadline_at {
                break ConfirmationOutcome::TimedOut { last_seen };
            }

            let next_poll = (Instant::now() + self.poll_interval).min(deadline_at);
            tokio::select! {
                _ = sleep_until(next_poll) => {}
                _ = shutdown.recv() => {
                    tracing::info!(signature = %signature, "Confirmation wait cancelled");
                    break ConfirmationOutcome::TimedOut { last_seen };
                }
            }

            if Instant::now() >= deadline_at {
                break ConfirmationOutcome::TimedOut { last_seen };
            }

            tokio::select! {
                result = self.check_status(submitted) => polled = Some(result),
                _ = sleep_until(deadline_at) => {
                    break ConfirmationOutcome::TimedOut { last_seen };
                }
                _ = shutdown.recv() => {
                    tracing::info!(signature = %signature, "Confirmation wait cancelled");
                    break ConfirmationOutcome::TimedOut { last_seen };
                }
            }
        };

        match &outcome {
            ConfirmationOutcome::Finalized { slot, commitment } => {
                tracing::info!(
                    signature = %signature,
                    slot,
                    commitment = %commitment,
                    "Transaction confirmed"
                )
            }
            ConfirmationOutcome::Failed { slot, reason } => {
                tracing::warn!(signature = %signature, slot, reason = %reason, "Transaction failed")
            }
            ConfirmationOutcome::TimedOut { last_seen } => {
                tracing::warn!(
                    signature = %signature,
                    last_seen = ?last_seen,
                    "Stopped waiting for confirmation"
                )
            }
        }
        metrics::record_confirmation(&outcome);

        Ok(outcome)
    }

    /// Submit and then wait, the common path for a freshly signed transaction.
    pub async fn submit_and_confirm(
        &self,
        tx: &SignedTransaction,
        commitment: Commitment,
        deadline: Duration,
    ) -> ClientResult<ConfirmationOutcome> {
        let submitted = self.submit(tx, commitment).await?;
        self.await_confirmation(&submitted, commitment, deadline).await
    }

    async fn check_status(
        &self,
        submitted: &SubmittedTransaction,
    ) -> ClientResult<Option<TransactionStatus>> {
        self.connection.get_signature_status(&submitted.signature).await
    }
}

/// Terminal outcome for a status, if it is terminal.
fn resolve(status: &TransactionStatus, target: Commitment) -> Option<ConfirmationOutcome> {
    if let Some(reason) = &status.err {
        return Some(ConfirmationOutcome::Failed {
            slot: status.slot,
            reason: reason.clone(),
        });
    }

    match status.commitment {
        Some(reached) if status.satisfies(target) => Some(ConfirmationOutcome::Finalized {
            slot: status.slot,
            commitment: reached,
        }),
        _ => None,
    }
}
