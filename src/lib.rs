//! Key-backed ledger RPC client library.

pub mod blockchain;
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use blockchain::{ClientError, Commitment, ConfirmationOracle, Connection, Keypair};
pub use config::schema::ClientConfig;
pub use lifecycle::{initialize, Shutdown};
