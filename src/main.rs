//! Ledger client (v1)
//!
//! Loads a signing key from the environment, connects to a ledger RPC
//! endpoint and checks that it is live.
//!
//! # Flow
//!
//! ```text
//!   PRIVATE_KEY ──▶ secret ──▶ keypair ──┐
//!                                        ├──▶ initialize() ──▶ probe_liveness()
//!   LEDGER_* ───▶ config ──▶ connection ─┘                          │
//!                                                                   ▼
//!                                                    stdout: pubkey + version
//! ```
//!
//! Exit status is 0 on success and 1 on any error. Diagnostics go to stderr.

use std::process::ExitCode;

use ledger_client::blockchain::EnvSecret;
use ledger_client::config::loader::load_from_env;
use ledger_client::lifecycle::initialize;
use ledger_client::observability::logging::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_from_env()?;

    if let Err(e) = init_logging(&config.observability) {
        eprintln!("warning: logging not initialized: {}", e);
    }

    tracing::info!("ledger-client v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        rpc_url = %config.rpc.url,
        commitment = %config.rpc.commitment,
        timeout_ms = config.rpc.timeout_ms,
        "Configuration loaded"
    );

    let client = initialize(&config, &EnvSecret::new(&config.secret.env_var))?;
    println!("Public key: {}", client.pubkey());

    let version = client.connection.probe_liveness().await?;
    println!("Endpoint:   {}", client.connection.endpoint());
    println!("Version:    {}", version);

    Ok(())
}
