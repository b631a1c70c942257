//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Transaction submission:
//!     → client.rs (every RPC call has a deadline)
//!     → On transient failure: retries.rs (bounded attempts)
//!     → backoff.rs (exponential delay with jitter between attempts)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every RPC call has a deadline
//! - Retries only for idempotent calls (signed transaction submission)
//! - Diagnostic calls such as the liveness probe are never retried

pub mod backoff;
pub mod retries;

pub use retries::RetryPolicy;
