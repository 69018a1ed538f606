//! Solana keypair generation.

use std::fmt;

use ed25519_dalek::SigningKey;
use rand::RngCore;

/// An ed25519 keypair whose address is the base58 encoded verifying key.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generates a new random keypair from the thread-local CSPRNG.
    #[inline]
    pub fn generate() -> Self {
        let mut secret = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut secret);
        Self::from_secret_key(secret)
    }

    /// Builds a keypair from a 32-byte ed25519 seed.
    pub fn from_secret_key(secret: [u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&secret),
        }
    }

    /// Returns the raw 32-byte public key.
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Returns the wallet address (base58 public key).
    #[inline]
    pub fn address(&self) -> String {
        bs58::encode(self.public_key_bytes()).into_string()
    }

    /// Returns the 64-byte keypair (secret || public) as base58, the format
    /// Solana wallets import.
    pub fn private_key_base58(&self) -> String {
        bs58::encode(self.signing_key.to_keypair_bytes()).into_string()
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({})", self.address())
    }
}
