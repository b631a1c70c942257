//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Load secret → Build signer → Open connection
//!     (any failure here aborts before network I/O)
//!
//! Shutdown (shutdown.rs):
//!     caller → broadcast → confirmation waits stop promptly
//! ```

pub mod shutdown;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{initialize, Client};
