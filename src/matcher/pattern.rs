//! Prefix pattern implementation.

use crate::error::ConfigError;

/// Characters a base58 (Bitcoin alphabet) address can contain.
pub const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Result of a pattern match operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    /// Full match found
    Match,
    /// No match
    NoMatch,
}

impl MatchResult {
    #[inline]
    pub fn is_match(self) -> bool {
        matches!(self, MatchResult::Match)
    }
}

/// A compiled prefix for efficient matching.
#[derive(Debug, Clone)]
pub struct Pattern {
    /// The prefix (lowercased when case insensitive)
    prefix: String,
    /// Whether matching is case sensitive
    case_sensitive: bool,
}

impl Pattern {
    /// Creates a new prefix pattern.
    pub fn new(prefix: impl Into<String>, case_sensitive: bool) -> Self {
        let prefix = prefix.into();
        let prefix = if case_sensitive {
            prefix
        } else {
            prefix.to_lowercase()
        };

        Self {
            prefix,
            case_sensitive,
        }
    }

    /// Returns the normalized prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns whether matching is case sensitive.
    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Matches an address against this pattern.
    ///
    /// Case-insensitive matching compares only the leading `prefix.len()`
    /// bytes, ignoring ASCII case. Base58 text is ASCII.
    #[inline]
    pub fn matches(&self, address: &str) -> MatchResult {
        let matched = if self.case_sensitive {
            address.starts_with(&self.prefix)
        } else {
            address
                .as_bytes()
                .get(..self.prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(self.prefix.as_bytes()))
        };

        if matched {
            MatchResult::Match
        } else {
            MatchResult::NoMatch
        }
    }

    /// Rejects prefixes that no base58 address can ever start with.
    pub fn check_alphabet(&self) -> Result<(), ConfigError> {
        if self.prefix.is_empty() {
            return Err(ConfigError::EmptyPrefix);
        }

        let invalid = self.prefix.chars().find(|&c| {
            if self.case_sensitive {
                !BASE58_ALPHABET.contains(c)
            } else {
                !BASE58_ALPHABET.contains(c) && !BASE58_ALPHABET.contains(c.to_ascii_uppercase())
            }
        });

        match invalid {
            Some(ch) => Err(ConfigError::InvalidPrefix {
                prefix: self.prefix.clone(),
                ch,
            }),
            None => Ok(()),
        }
    }

    /// Returns the estimated number of attempts to find a match.
    ///
    /// Each position is one of 58 symbols. Case-insensitive letters that
    /// exist in both cases in the alphabet match two of them.
    pub fn estimated_difficulty(&self) -> u64 {
        self.prefix.chars().fold(1u64, |acc, c| {
            let both_cases = !self.case_sensitive
                && c.is_ascii_alphabetic()
                && BASE58_ALPHABET.contains(c.to_ascii_lowercase())
                && BASE58_ALPHABET.contains(c.to_ascii_uppercase());
            acc.saturating_mul(if both_cases { 29 } else { 58 })
        })
    }

    /// Returns a human-readable difficulty estimate.
    pub fn difficulty_description(&self) -> String {
        let diff = self.estimated_difficulty();
        match diff {
            0..=1_000 => "Very Easy (< 1 second)".into(),
            1_001..=1_000_000 => "Easy (seconds)".into(),
            1_000_001..=100_000_000 => "Medium (minutes)".into(),
            100_000_001..=10_000_000_000 => "Hard (hours)".into(),
            _ => "Very Hard (days or more)".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_sensitive_prefix() {
        let pattern = Pattern::new("Sun", true);
        assert!(!pattern.matches("SuNxyz").is_match());
        assert!(pattern.matches("Sunrise111").is_match());
        assert!(!pattern.matches("sunrise111").is_match());
    }

    #[test]
    fn test_case_insensitive_prefix() {
        let pattern = Pattern::new("AB", false);
        assert_eq!(pattern.prefix(), "ab");
        assert!(pattern.matches("Ab12xyz").is_match());
        assert!(pattern.matches("aB99").is_match());
        assert!(!pattern.matches("xAb").is_match());
    }

    #[test]
    fn test_prefix_longer_than_address() {
        let pattern = Pattern::new("abcdef", false);
        assert!(!pattern.matches("abc").is_match());
    }

    #[test]
    fn test_case_insensitive_non_ascii_address() {
        let pattern = Pattern::new("ab", false);
        assert!(!pattern.matches("\u{e9}bc").is_match());
        assert!(!pattern.matches("").is_match());
        assert!(pattern.matches("AB\u{e9}").is_match());
    }

    #[test]
    fn test_alphabet_check() {
        assert!(Pattern::new("Sun", true).check_alphabet().is_ok());
        // Lowercase 'l' is missing, only 'L' exists
        assert!(matches!(
            Pattern::new("Sol", true).check_alphabet(),
            Err(ConfigError::InvalidPrefix { ch: 'l', .. })
        ));
        assert!(Pattern::new("Sol", false).check_alphabet().is_ok());
        // 'O', 'I' and '0' never appear in base58
        assert!(matches!(
            Pattern::new("BOB", true).check_alphabet(),
            Err(ConfigError::InvalidPrefix { ch: 'O', .. })
        ));
        assert!(Pattern::new("BOB", false).check_alphabet().is_ok());
        assert!(Pattern::new("a0", false).check_alphabet().is_err());
        assert!(matches!(
            Pattern::new("", true).check_alphabet(),
            Err(ConfigError::EmptyPrefix)
        ));
    }

    #[test]
    fn test_difficulty() {
        assert_eq!(Pattern::new("ab", true).estimated_difficulty(), 58 * 58);
        assert_eq!(Pattern::new("ab", false).estimated_difficulty(), 29 * 29);
        // 'l' only exists as uppercase 'L'
        assert_eq!(Pattern::new("l1", false).estimated_difficulty(), 58 * 58);
    }
}
