//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! LEDGER_CLIENT_CONFIG (optional TOML file)
//!     → loader.rs (parse & deserialize, apply env overrides)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow an empty or missing file
//! - The secret itself is never part of the config, only its env var name

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::ClientConfig;
pub use schema::ConfirmationConfig;
pub use schema::ObservabilityConfig;
pub use schema::RetryConfig;
pub use schema::RpcConfig;
