//! Random alias generation.
//!
//! The generator only proposes candidates. Uniqueness is checked by
//! [`LinkService`](crate::application::services::LinkService), which retries
//! on collision within a bounded budget.

use rand::Rng;
use rand::distr::Alphanumeric;

/// Default number of characters in a generated alias.
pub const DEFAULT_ALIAS_LENGTH: usize = 7;

/// Source of candidate aliases.
#[cfg_attr(test, mockall::automock)]
pub trait AliasGenerator: Send + Sync {
    /// Produces a candidate alias made of characters accepted by
    /// [`is_legal_alias`](crate::utils::validation::is_legal_alias).
    fn generate(&self) -> String;
}

/// Generates fixed-length random alphanumeric aliases (`[A-Za-z0-9]`).
///
/// With the default length of 7 there are 62^7 (about 3.5 * 10^12) candidates.
#[derive(Debug, Clone)]
pub struct RandomAliasGenerator {
    length: usize,
}

impl RandomAliasGenerator {
    /// Creates a generator producing aliases of `length` characters.
    ///
    /// A zero length is bumped to one so every candidate is a legal alias.
    pub fn new(length: usize) -> Self {
        Self {
            length: length.max(1),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for RandomAliasGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_ALIAS_LENGTH)
    }
}

impl AliasGenerator for RandomAliasGenerator {
    fn generate(&self) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(self.length)
            .map(char::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::is_legal_alias;
    use std::collections::HashSet;

    #[test]
    fn test_generate_has_configured_length() {
        assert_eq!(RandomAliasGenerator::default().generate().len(), 7);
        assert_eq!(RandomAliasGenerator::new(12).generate().len(), 12);
    }

    #[test]
    fn test_zero_length_is_bumped() {
        let generator = RandomAliasGenerator::new(0);
        assert_eq!(generator.length(), 1);
        assert_eq!(generator.generate().len(), 1);
    }

    #[test]
    fn test_generated_aliases_are_legal() {
        let generator = RandomAliasGenerator::default();
        for _ in 0..500 {
            let alias = generator.generate();
            assert!(is_legal_alias(&alias), "{alias} is not a legal alias");
            assert!(alias.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_generate_produces_unique_aliases() {
        let generator = RandomAliasGenerator::default();
        let aliases: HashSet<String> = (0..1000).map(|_| generator.generate()).collect();
        assert_eq!(aliases.len(), 1000);
    }
}
