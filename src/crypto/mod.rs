//! Key generation for Solana wallets.
//!
//! This module provides:
//! - Secure random ed25519 keypairs with base58 text encodings
//! - The `KeyGenerator` capability workers call in their hot loop

mod generator;
mod keypair;

pub use generator::{KeyGenerator, SolanaGenerator};
pub use keypair::Keypair;
