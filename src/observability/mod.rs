//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (RPC counters, latency histograms, endpoint health)
//!
//! Consumers:
//!     → stderr (human-readable or JSON lines)
//!     → whatever metrics recorder the embedding process installs
//! ```
//!
//! # Design Decisions
//! - Secrets never reach a log field
//! - Metrics go through the `metrics` facade; with no recorder they are no-ops

pub mod logging;
pub mod metrics;
