//! Secret key providers.
//!
//! The client never stores or embeds a secret; it asks a `SecretSource`
//! once at startup and turns the answer into a `Keypair`.

use zeroize::Zeroizing;

use crate::blockchain::keypair::Keypair;
use crate::blockchain::types::{ClientError, ClientResult};

/// Default environment variable holding the comma-separated key bytes.
pub const PRIVATE_KEY_ENV_VAR: &str = "PRIVATE_KEY";

/// Supplies raw key text from wherever it is stored.
pub trait SecretSource {
    /// Fetch the secret text. Absence is a configuration error.
    fn load(&self) -> ClientResult<Zeroizing<String>>;

    /// Load the secret and build a signer from it.
    fn keypair(&self) -> ClientResult<Keypair> {
        let secret = self.load()?;
        Ok(Keypair::from_secret_str(&secret)?)
    }
}

/// Reads the secret from an environment variable.
#[derive(Debug, Clone)]
pub struct EnvSecret {
    var: String,
}

impl EnvSecret {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    pub fn var(&self) -> &str {
        &self.var
    }
}

impl Default for EnvSecret {
    fn default() -> Self {
        Self::new(PRIVATE_KEY_ENV_VAR)
    }
}

impl SecretSource for EnvSecret {
    fn load(&self) -> ClientResult<Zeroizing<String>> {
        match std::env::var(&self.var) {
            Ok(value) if !value.trim().is_empty() => Ok(Zeroizing::new(value)),
            Ok(_) => Err(ClientError::Configuration(format!(
                "Environment variable {} is empty",
                self.var
            ))),
            Err(_) => Err(ClientError::Configuration(format!(
                "Environment variable {} not set",
                self.var
            ))),
        }
    }
}

/// Secret held in memory, for tests and embedding callers.
pub struct StaticSecret(Zeroizing<String>);

impl StaticSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(Zeroizing::new(secret.into()))
    }
}

impl SecretSource for StaticSecret {
    fn load(&self) -> ClientResult<Zeroizing<String>> {
        Ok(self.0.clone())
    }
}
