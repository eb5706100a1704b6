//! Signing key loading
//!
//! The wallet is a single ed25519 keypair supplied as a base64-encoded
//! 64-byte secret in the `PRIVATE_KEY` environment variable. Anything that
//! does not decode to exactly 64 bytes aborts startup.

use base64::Engine;
use solana_sdk::signature::Keypair;

use crate::error::{Error, Result};

/// Required decoded length of the signing key
pub const KEYPAIR_BYTES_LEN: usize = 64;

/// Load the signing keypair from the process environment
pub fn load_keypair() -> Result<Keypair> {
    let encoded = std::env::var("PRIVATE_KEY")
        .map_err(|_| Error::MissingEnvVar("PRIVATE_KEY".to_string()))?;

    keypair_from_base64(encoded.trim())
}

/// Decode and validate a base64-encoded 64-byte keypair
pub fn keypair_from_base64(encoded: &str) -> Result<Keypair> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| Error::InvalidKeypair(format!("base64 decode failed: {}", e)))?;

    if bytes.len() != KEYPAIR_BYTES_LEN {
        return Err(Error::InvalidKeypair(format!(
            "decoded to {} bytes, expected {}",
            bytes.len(),
            KEYPAIR_BYTES_LEN
        )));
    }

    Keypair::from_bytes(&bytes).map_err(|e| Error::InvalidKeypair(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::signer::Signer;

    #[test]
    fn test_valid_keypair_round_trips() {
        let keypair = Keypair::new();
        let encoded = base64::engine::general_purpose::STANDARD.encode(keypair.to_bytes());

        let loaded = keypair_from_base64(&encoded).unwrap();
        assert_eq!(loaded.pubkey(), keypair.pubkey());
    }

    #[test]
    fn test_wrong_length_rejected() {
        let encoded = base64::engine::general_purpose::STANDARD.encode([0u8; 32]);

        match keypair_from_base64(&encoded) {
            Err(Error::InvalidKeypair(msg)) => assert!(msg.contains("32 bytes")),
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("expected InvalidKeypair"),
        }
    }

    #[test]
    fn test_invalid_base64_rejected() {
        assert!(matches!(
            keypair_from_base64("not-base64!!!"),
            Err(Error::InvalidKeypair(_))
        ));
    }
}
