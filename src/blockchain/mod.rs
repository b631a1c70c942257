//! Ledger integration subsystem.
//!
//! # Data Flow
//! ```text
//! Secret provider (environment variable)
//!     → secret.rs (load key text once)
//!     → keypair.rs (parse key material, derive signer)
//!     → client.rs (RPC connection with deadlines, liveness probe, reads)
//!     → confirmation.rs (submit with retry, await finality)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from a secret provider, never literals
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts
//! - Timed-out confirmation waits are inconclusive, never failures

pub mod client;
pub mod confirmation;
pub mod keypair;
pub mod rpc;
pub mod secret;
pub mod transaction;
pub mod types;

pub use client::Connection;
pub use confirmation::ConfirmationOracle;
pub use keypair::{ByteError, KeyError, KeyMaterial, Keypair, Pubkey, Signature};
pub use secret::{EnvSecret, SecretSource, StaticSecret};
pub use transaction::SignedTransaction;
pub use types::{
    AccountInfo, ClientError, ClientResult, Commitment, ConfirmationOutcome,
    SubmittedTransaction, TransactionStatus, VersionInfo,
};
