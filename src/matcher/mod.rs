//! Prefix matching for base58 addresses.
//!
//! Matching is case sensitive (exact prefix) or case insensitive
//! (lowercased comparison of both sides).

mod pattern;

pub use pattern::{MatchResult, Pattern, BASE58_ALPHABET};
