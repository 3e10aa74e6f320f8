//! Token vocabulary in first-seen order.
//!
//! Maps between tokens and indices for hot-encoding. Index = position of the
//! token's first occurrence across all fragments; once built, indices are
//! stable for the remainder of training.

use crate::data::fragments::Fragment;
use std::collections::HashMap;

/// Ordered, duplicate-free list of tokens with O(1) index lookup.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    tokens: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Collect the distinct tokens of `fragments` in first-seen order.
    #[must_use]
    pub fn from_fragments(fragments: &[Fragment]) -> Self {
        let mut vocabulary = Self::default();
        for fragment in fragments {
            for token in fragment {
                if !vocabulary.index.contains_key(token) {
                    vocabulary.index.insert(token.clone(), vocabulary.tokens.len());
                    vocabulary.tokens.push(token.clone());
                }
            }
        }
        vocabulary
    }

    /// Number of distinct tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Index of a token, or `None` if it was never observed.
    #[must_use]
    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    /// Token at an index, or `None` if out of bounds.
    #[must_use]
    pub fn token(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    /// The ordered token list.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fragments::fragments;

    #[test]
    fn test_first_seen_order() {
        let frags = fragments("the quick brown fox\nthe lazy brown dog", 4);
        let vocab = Vocabulary::from_fragments(&frags);
        assert_eq!(
            vocab.tokens(),
            &["the", "quick", "brown", "fox", "lazy", "dog"]
        );
    }

    #[test]
    fn test_round_trip() {
        let frags = fragments("a b c", 3);
        let vocab = Vocabulary::from_fragments(&frags);
        for (i, token) in vocab.tokens().iter().enumerate() {
            assert_eq!(vocab.index_of(token), Some(i));
            assert_eq!(vocab.token(i), Some(token.as_str()));
        }
    }

    #[test]
    fn test_unknown_token() {
        let frags = fragments("a b c", 3);
        let vocab = Vocabulary::from_fragments(&frags);
        assert_eq!(vocab.index_of("zebra"), None);
        assert_eq!(vocab.token(99), None);
    }

    #[test]
    fn test_duplicates_collapse() {
        let frags = fragments("go go go go", 2);
        let vocab = Vocabulary::from_fragments(&frags);
        assert_eq!(vocab.len(), 1);
        assert_eq!(vocab.index_of("go"), Some(0));
    }

    #[test]
    fn test_empty() {
        let vocab = Vocabulary::from_fragments(&[]);
        assert!(vocab.is_empty());
    }
}
