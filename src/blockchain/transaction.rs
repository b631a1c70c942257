//! Signed transaction wire payloads.
//!
//! Message construction lives with the caller. This module holds a signed
//! transaction together with its bincode wire bytes.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use solana_sdk::transaction::VersionedTransaction;

use crate::blockchain::keypair::Signature;
use crate::blockchain::types::{ClientError, ClientResult};

/// An already-signed transaction ready for broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    tx: VersionedTransaction,
    bytes: Vec<u8>,
}

impl SignedTransaction {
    /// Decode serialized transaction bytes (legacy or versioned).
    pub fn from_wire(bytes: Vec<u8>) -> ClientResult<Self> {
        let tx: VersionedTransaction = bincode::deserialize(&bytes)
            .map_err(|e| ClientError::InvalidTransaction(format!("undecodable payload: {}", e)))?;
        check_signatures(&tx)?;
        Ok(Self { tx, bytes })
    }

    /// Wrap a transaction that has already been signed.
    pub fn from_transaction(tx: VersionedTransaction) -> ClientResult<Self> {
        check_signatures(&tx)?;
        let bytes = bincode::serialize(&tx)
            .map_err(|e| ClientError::InvalidTransaction(format!("serialization failed: {}", e)))?;
        Ok(Self { tx, bytes })
    }

    /// First signature; the ledger deduplicates submissions by it.
    pub fn signature(&self) -> Signature {
        self.tx.signatures[0]
    }

    pub fn transaction(&self) -> &VersionedTransaction {
        &self.tx
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Base64 encoding used by `sendTransaction`.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

fn check_signatures(tx: &VersionedTransaction) -> ClientResult<()> {
    if tx.signatures.is_empty() {
        return Err(ClientError::InvalidTransaction(
            "transaction carries no signatures".to_string(),
        ));
    }

    let required = tx.message.header().num_required_signatures as usize;
    if tx.signatures.len() != required {
        return Err(ClientError::InvalidTransaction(format!(
            "message requires {} signature(s), payload has {}",
            required,
            tx.signatures.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::keypair::{Keypair, Pubkey};
    use solana_sdk::instruction::Instruction;
    use solana_sdk::message::Message;

    fn memo(keypair: &Keypair, text: &[u8]) -> SignedTransaction {
        let program = Pubkey::new_from_array([7; 32]);
        let ix = Instruction::new_with_bytes(program, text, vec![]);
        keypair
            .sign_transaction(Message::new(&[ix], Some(&keypair.pubkey())))
            .unwrap()
    }

    #[test]
    fn test_signed_payload_decodes() {
        let keypair = Keypair::generate();
        let tx = memo(&keypair, b"message");

        assert_eq!(tx.as_bytes()[0], 1);
        let message = tx.transaction().message.serialize();
        assert!(tx.signature().verify(keypair.pubkey().as_ref(), &message));

        let parsed = SignedTransaction::from_wire(tx.as_bytes().to_vec()).unwrap();
        assert_eq!(parsed, tx);
        assert_eq!(parsed.transaction().message.instructions()[0].data, b"message");
    }

    #[test]
    fn test_rejects_garbage_and_truncated() {
        assert!(SignedTransaction::from_wire(Vec::new()).is_err());
        assert!(SignedTransaction::from_wire(vec![1; 40]).is_err());

        let tx = memo(&Keypair::generate(), b"cut short");
        let truncated = tx.as_bytes()[..tx.as_bytes().len() - 3].to_vec();
        assert!(matches!(
            SignedTransaction::from_wire(truncated),
            Err(ClientError::InvalidTransaction(_))
        ));
    }

    #[test]
    fn test_rejects_missing_signatures() {
        let tx = memo(&Keypair::generate(), b"strip me");
        let mut unsigned = tx.transaction().clone();
        unsigned.signatures.clear();

        let err = SignedTransaction::from_transaction(unsigned).unwrap_err();
        assert!(err.to_string().contains("no signatures"));
    }

    #[test]
    fn test_base64_matches_wire_bytes() {
        let tx = memo(&Keypair::generate(), b"encode");
        assert_eq!(STANDARD.decode(tx.to_base64()).unwrap(), tx.as_bytes());
    }
}
