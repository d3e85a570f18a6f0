//! Term Normalization
//!
//! Generated terms are stored, compared and deduplicated in a canonical form:
//! uppercase, without spaces or hyphens, with each locale's special letters
//! replaced by a single-digit token (its position in [`Locale::special_letters`]).
//! The canonical form is reversible so terms can be put back into prompts.
//!
//! Decoding cannot tell a token from a literal digit. [`TermNormalizer::filter_terms`]
//! therefore refuses terms that already contain ASCII digits, which keeps every
//! term it emits unambiguous.

use crate::locale::Locale;
use std::collections::HashSet;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

/// Length bounds applied to encoded terms, counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermBounds {
    pub min_len: usize,
    pub max_len: Option<usize>,
}

impl TermBounds {
    /// Super-solution candidates.
    pub const CATEGORY: TermBounds = TermBounds {
        min_len: 6,
        max_len: Some(30),
    };

    /// Word-pool entries.
    pub const WORD: TermBounds = TermBounds {
        min_len: 4,
        max_len: None,
    };

    pub fn at_least(min_len: usize) -> Self {
        Self {
            min_len,
            max_len: None,
        }
    }

    fn admits(&self, len: usize) -> bool {
        len >= self.min_len && self.max_len.map_or(true, |max| len <= max)
    }
}

/// Reversible canonicalization of generated text for one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermNormalizer {
    locale: Locale,
}

impl TermNormalizer {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Encode a natural-language term into its canonical form.
    pub fn safe_encode(&self, word: &str) -> String {
        let mut encoded = String::with_capacity(word.len());
        for ch in word.nfc() {
            if ch == ' ' || ch == '-' {
                continue;
            }
            // Plain uppercasing would expand ß to "SS".
            let ch = if ch == 'ß' { 'ẞ' } else { ch };
            for upper in ch.to_uppercase() {
                encoded.push(self.token_for(upper).unwrap_or(upper));
            }
        }
        encoded
    }

    /// Decode a canonical term back into natural (uppercase) form.
    pub fn safe_decode(&self, word: &str) -> String {
        let letters = self.locale.special_letters();
        word.chars()
            .map(|ch| {
                ch.to_digit(10)
                    .and_then(|index| letters.get(index as usize).copied())
                    .unwrap_or(ch)
            })
            .collect()
    }

    /// Encode, bound-check and deduplicate a sequence of raw terms.
    ///
    /// Output keeps first-seen order. Terms containing ASCII digits are dropped
    /// because their encoded form could not be decoded unambiguously.
    pub fn filter_terms<I, S>(&self, raw: I, bounds: TermBounds) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();

        for item in raw {
            let item = item.as_ref();
            if item.chars().any(|c| c.is_ascii_digit()) {
                debug!(term = %item, "Dropping term containing digits");
                continue;
            }
            let encoded = self.safe_encode(item);
            if !bounds.admits(encoded.chars().count()) {
                continue;
            }
            if seen.insert(encoded.clone()) {
                kept.push(encoded);
            }
        }

        kept
    }

    fn token_for(&self, upper: char) -> Option<char> {
        self.locale
            .special_letters()
            .iter()
            .position(|letter| *letter == upper)
            .and_then(|index| char::from_digit(index as u32, 10))
    }
}
