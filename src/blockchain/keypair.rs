//! Key material parsing and transaction signing.
//!
//! # Security
//! - Secret bytes are zeroed when dropped
//! - Keys are never logged, serialized or shown by `Debug`
//! - Parse errors carry a position and a reason, never the offending text
//! - Construction is all-or-nothing: no partially valid signer escapes

use solana_sdk::message::Message;
use solana_sdk::signature::{Keypair as SdkKeypair, Signer as _};
use solana_sdk::transaction::Transaction;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::blockchain::transaction::SignedTransaction;
use crate::blockchain::types::{ClientError, ClientResult};

pub use solana_sdk::pubkey::Pubkey;
pub use solana_sdk::signature::Signature;

/// Combined secret + public key encoding length.
pub const KEYPAIR_LENGTH: usize = 64;

/// Payload signed at construction to prove the public half matches the seed.
const PAIRING_CHECK: &[u8] = b"ledger-client keypair check";

/// Why a key token was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteError {
    NotDecimal,
    OutOfRange,
}

impl ByteError {
    fn classify(token: &str) -> Self {
        if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
            ByteError::OutOfRange
        } else {
            ByteError::NotDecimal
        }
    }
}

impl fmt::Display for ByteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ByteError::NotDecimal => f.write_str("not a decimal byte"),
            ByteError::OutOfRange => f.write_str("out of range"),
        }
    }
}

/// Errors produced while turning raw key material into a signer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// A token was not a base-10 integer in [0, 255].
    #[error("Invalid key byte at position {position}: {reason}")]
    Parse { position: usize, reason: ByteError },

    /// Decoded byte count does not match the keypair encoding.
    #[error("Invalid key length: expected {expected} bytes, got {actual}")]
    KeyLength { expected: usize, actual: usize },

    /// Public half does not belong to the secret half.
    #[error("Key mismatch: public key does not match secret key")]
    KeyMismatch,
}

/// Raw 64-byte keypair encoding: 32-byte seed followed by the public key.
pub struct KeyMaterial(Zeroizing<Vec<u8>>);

impl KeyMaterial {
    /// Parse comma-separated decimal bytes, e.g. `"80,83,11,..."`.
    ///
    /// Stops at the first token past the 64th, so oversized input is never
    /// buffered.
    pub fn parse(text: &str) -> Result<Self, KeyError> {
        let mut bytes = Zeroizing::new(Vec::with_capacity(KEYPAIR_LENGTH));

        for (position, token) in text.split(',').enumerate() {
            if position == KEYPAIR_LENGTH {
                return Err(KeyError::KeyLength {
                    expected: KEYPAIR_LENGTH,
                    actual: text.split(',').count(),
                });
            }
            let token = token.trim();
            let byte = token.parse::<u8>().map_err(|_| KeyError::Parse {
                position,
                reason: ByteError::classify(token),
            })?;
            bytes.push(byte);
        }

        Self::from_bytes(&bytes)
    }

    /// Build from an already-decoded byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != KEYPAIR_LENGTH {
            return Err(KeyError::KeyLength {
                expected: KEYPAIR_LENGTH,
                actual: bytes.len(),
            });
        }
        Ok(Self(Zeroizing::new(bytes.to_vec())))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyMaterial(<redacted>)")
    }
}

impl FromStr for KeyMaterial {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Ed25519 signing identity.
///
/// Immutable after construction; safe to share across tasks.
pub struct Keypair {
    inner: SdkKeypair,
}

impl Keypair {
    /// Construct from validated key material.
    ///
    /// The trailing 32 bytes must be the public key derived from the seed.
    pub fn from_key_material(material: &KeyMaterial) -> Result<Self, KeyError> {
        let inner =
            SdkKeypair::try_from(material.as_bytes()).map_err(|_| KeyError::KeyMismatch)?;

        // A mismatched public half still loads, but its signatures never verify.
        let check = inner.sign_message(PAIRING_CHECK);
        if !check.verify(inner.pubkey().as_ref(), PAIRING_CHECK) {
            return Err(KeyError::KeyMismatch);
        }

        Ok(Self { inner })
    }

    /// Parse comma-separated key text and construct the signer in one step.
    pub fn from_secret_str(text: &str) -> Result<Self, KeyError> {
        let material = KeyMaterial::parse(text)?;
        Self::from_key_material(&material)
    }

    /// Generate a fresh random keypair.
    pub fn generate() -> Self {
        Self {
            inner: SdkKeypair::new(),
        }
    }

    /// Public identity of this signer.
    pub fn pubkey(&self) -> Pubkey {
        self.inner.pubkey()
    }

    /// Sign an arbitrary payload. Deterministic for a given key and payload.
    pub fn sign(&self, payload: &[u8]) -> Signature {
        self.inner.sign_message(payload)
    }

    /// Sign a caller-built message as its only signer.
    ///
    /// Fails with `InvalidTransaction` if the message needs signatures from
    /// anyone else.
    pub fn sign_transaction(&self, message: Message) -> ClientResult<SignedTransaction> {
        let blockhash = message.recent_blockhash;
        let mut tx = Transaction::new_unsigned(message);
        tx.try_sign(&[&self.inner], blockhash)
            .map_err(|e| ClientError::InvalidTransaction(e.to_string()))?;
        SignedTransaction::from_transaction(tx.into())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("pubkey", &self.pubkey())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::instruction::Instruction;

    // Devnet throwaway key; test fixture only.
    const TEST_SECRET: &str = "80,83,11,9,145,1,91,144,244,223,98,141,59,249,88,33,153,25,201,147,156,91,95,119,243,156,94,140,196,71,237,36,63,108,109,236,195,131,233,185,220,251,212,47,126,10,250,90,192,76,94,87,130,78,96,21,245,253,63,34,12,116,126,191";
    const TEST_PUBKEY: &str = "5Gaafgd2mZiiuVU7ZJyua3pbfXX6c7hGsY2y6ipCrXca";

    #[test]
    fn test_keypair_from_secret() {
        let keypair = Keypair::from_secret_str(TEST_SECRET).unwrap();
        assert_eq!(keypair.pubkey().to_string(), TEST_PUBKEY);
    }

    #[test]
    fn test_whitespace_tolerated() {
        let spaced = TEST_SECRET.replace(',', ", ");
        let keypair = Keypair::from_secret_str(&spaced).unwrap();
        assert_eq!(keypair.pubkey().to_string(), TEST_PUBKEY);
    }

    #[test]
    fn test_construction_is_deterministic() {
        let a = Keypair::from_secret_str(TEST_SECRET).unwrap();
        let b = Keypair::from_secret_str(TEST_SECRET).unwrap();
        assert_eq!(a.pubkey(), b.pubkey());
    }

    #[test]
    fn test_short_key_rejected() {
        let short: Vec<&str> = TEST_SECRET.split(',').take(63).collect();
        let err = Keypair::from_secret_str(&short.join(",")).unwrap_err();
        assert_eq!(err, KeyError::KeyLength { expected: 64, actual: 63 });
    }

    #[test]
    fn test_long_key_rejected() {
        let long = format!("{},0", TEST_SECRET);
        let err = KeyMaterial::parse(&long).unwrap_err();
        assert_eq!(err, KeyError::KeyLength { expected: 64, actual: 65 });
    }

    #[test]
    fn test_oversized_input_stops_at_length() {
        // Garbage past the 64th token is never parsed.
        let huge = format!("{},{}", TEST_SECRET, "xx,".repeat(100_000));
        let err = KeyMaterial::parse(&huge).unwrap_err();
        assert_eq!(err, KeyError::KeyLength { expected: 64, actual: 100_065 });
    }

    #[test]
    fn test_non_numeric_token_rejected() {
        let bad = TEST_SECRET.replacen("83", "xx", 1);
        let err = Keypair::from_secret_str(&bad).unwrap_err();
        assert_eq!(err, KeyError::Parse { position: 1, reason: ByteError::NotDecimal });
    }

    #[test]
    fn test_out_of_range_token_rejected() {
        let bad = TEST_SECRET.replacen("80", "256", 1);
        let err = KeyMaterial::parse(&bad).unwrap_err();
        assert_eq!(err, KeyError::Parse { position: 0, reason: ByteError::OutOfRange });
    }

    #[test]
    fn test_parse_error_never_echoes_input() {
        let base58_secret = "2aFdqGq4RcDLn7aGZ3rUmN8RPbpLbdf7s7wFj3L8zKmMrUG9TfnmS9CVbSZXq5BqLFGm6xDTqYDVc4b9ySAsHpD9";
        let json_secret = format!("[{}]", TEST_SECRET);

        for secret in [base58_secret, json_secret.as_str()] {
            let err = Keypair::from_secret_str(secret).unwrap_err();
            let shown = format!("{} {:?}", err, err);
            assert!(!shown.contains(secret), "leaked: {}", shown);
            assert!(!shown.contains("2aFdqGq4"), "leaked: {}", shown);
            assert!(!shown.contains("[80"), "leaked: {}", shown);
        }
    }

    #[test]
    fn test_mismatched_public_half_rejected() {
        let mut bytes = KeyMaterial::parse(TEST_SECRET).unwrap().as_bytes().to_vec();
        bytes[63] ^= 0xff;
        let material = KeyMaterial::from_bytes(&bytes).unwrap();
        assert_eq!(Keypair::from_key_material(&material).unwrap_err(), KeyError::KeyMismatch);
    }

    #[test]
    fn test_sign_is_deterministic_and_verifies() {
        let keypair = Keypair::from_secret_str(TEST_SECRET).unwrap();
        let sig1 = keypair.sign(b"hello ledger");
        let sig2 = keypair.sign(b"hello ledger");
        assert_eq!(sig1, sig2);
        assert_eq!(
            sig1.to_string(),
            "5GNcr1iDsYbjev3Tsdmdf2uHjW9kdnYZdbcgt8SfepMYezbLjcoA14pRH3DfdSFuHWQqRhRsf91diz64AbXWZ5gS"
        );

        let pubkey = keypair.pubkey();
        assert!(sig1.verify(pubkey.as_ref(), b"hello ledger"));
        assert!(!sig1.verify(pubkey.as_ref(), b"hello ledger!"));
    }

    #[test]
    fn test_sign_transaction_requires_matching_payer() {
        let keypair = Keypair::from_secret_str(TEST_SECRET).unwrap();
        let program = Pubkey::new_from_array([7; 32]);
        let ix = Instruction::new_with_bytes(program, b"memo", vec![]);

        let tx = keypair
            .sign_transaction(Message::new(&[ix.clone()], Some(&keypair.pubkey())))
            .unwrap();
        assert_eq!(tx.transaction().signatures.len(), 1);

        let stranger = Keypair::generate().pubkey();
        let err = keypair
            .sign_transaction(Message::new(&[ix], Some(&stranger)))
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidTransaction(_)), "got {:?}", err);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let material = KeyMaterial::parse(TEST_SECRET).unwrap();
        let debug = format!("{:?}", material);
        assert!(!debug.contains("80"));

        let keypair = Keypair::from_key_material(&material).unwrap();
        let debug = format!("{:?}", keypair);
        assert!(debug.contains(TEST_PUBKEY));
        assert!(!debug.contains("inner"));
    }

    #[test]
    fn test_base58_parsing() {
        let pubkey: Pubkey = TEST_PUBKEY.parse().unwrap();
        assert_eq!(pubkey.to_string(), TEST_PUBKEY);
        assert!("0OIl".parse::<Pubkey>().is_err());
        assert!("3yZe7d".parse::<Signature>().is_err());
    }
}
