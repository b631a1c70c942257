//! Startup orchestration.
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Nothing here touches the network; the first I/O is the caller's probe
//! - No printing or global side effects, so tests can call it freely

use crate::blockchain::client::Connection;
use crate::blockchain::confirmation::ConfirmationOracle;
use crate::blockchain::keypair::{Keypair, Pubkey};
use crate::blockchain::secret::SecretSource;
use crate::blockchain::types::ClientResult;
use crate::config::ClientConfig;
use crate::resilience::RetryPolicy;

/// Everything needed to talk to the ledger as one identity.
#[derive(Debug)]
pub struct Client {
    pub keypair: Keypair,
    pub connection: Connection,
    pub oracle: ConfirmationOracle,
}

impl Client {
    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }
}

/// Build the signer and open the connection described by `config`.
///
/// The secret is fetched exactly once from `secret`.
pub fn initialize(config: &ClientConfig, secret: &dyn SecretSource) -> ClientResult<Client> {
    let keypair = secret.keypair()?;
    tracing::info!(pubkey = %keypair.pubkey(), "Signer loaded");

    let connection = Connection::from_config(&config.rpc)?;
    let oracle = ConfirmationOracle::new(
        connection.clone(),
        &config.confirmation,
        RetryPolicy::from(&config.retries),
    );

    tracing::info!(
        rpc_url = %connection.endpoint(),
        commitment = %connection.commitment(),
        "Client initialized"
    );

    Ok(Client {
        keypair,
        connection,
        oracle,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::secret::StaticSecret;
    use crate::blockchain::types::{ClientError, Commitment};

    const TEST_SECRET: &str = "80,83,11,9,145,1,91,144,244,223,98,141,59,249,88,33,153,25,201,147,156,91,95,119,243,156,94,140,196,71,237,36,63,108,109,236,195,131,233,185,220,251,212,47,126,10,250,90,192,76,94,87,130,78,96,21,245,253,63,34,12,116,126,191";

    #[test]
    fn test_initialize_builds_client() {
        let mut config = ClientConfig::default();
        config.rpc.url = "http://127.0.0.1:8899".to_string();
        config.rpc.commitment = Commitment::Finalized;

        let client = initialize(&config, &StaticSecret::new(TEST_SECRET)).unwrap();
        assert_eq!(
            client.pubkey().to_string(),
            "5Gaafgd2mZiiuVU7ZJyua3pbfXX6c7hGsY2y6ipCrXca"
        );
        assert_eq!(client.connection.commitment(), Commitment::Finalized);
        assert_eq!(client.oracle.connection().endpoint().port(), Some(8899));
    }

    #[test]
    fn test_bad_key_fails_before_connection() {
        let err = initialize(&ClientConfig::default(), &StaticSecret::new("1,2,3")).unwrap_err();
        assert!(matches!(err, ClientError::Key(_)));
    }

    #[test]
    fn test_bad_endpoint_fails() {
        let mut config = ClientConfig::default();
        config.rpc.url = "localhost".to_string();
        let err = initialize(&config, &StaticSecret::new(TEST_SECRET)).unwrap_err();
        assert!(matches!(err, ClientError::InvalidEndpoint { .. }));
    }
}
