//! The keypair capability the search loop is built on.

use crate::error::GeneratorError;

use super::Keypair;

/// Produces `(public_key, private_key)` text pairs.
///
/// Implementations are shared by every worker thread, so each call must use
/// its own randomness and no mutable shared state.
pub trait KeyGenerator: Send + Sync {
    fn generate(&self) -> Result<(String, String), GeneratorError>;
}

/// Random Solana keypairs: base58 address and base58 64-byte secret.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolanaGenerator;

impl KeyGenerator for SolanaGenerator {
    #[inline]
    fn generate(&self) -> Result<(String, String), GeneratorError> {
        let keypair = Keypair::generate();
        Ok((keypair.address(), keypair.private_key_base58()))
    }
}
