//! Supported puzzle languages.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Letters replaced by placeholder tokens. Their position is their token.
const SPECIAL_LETTERS: [char; 4] = ['Ä', 'Ö', 'Ü', 'ẞ'];

/// Language the generated concepts are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    De,
    Sv,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::De, Locale::Sv];

    pub fn code(self) -> &'static str {
        match self {
            Locale::De => "de",
            Locale::Sv => "sv",
        }
    }

    /// Uppercase letters replaced by single-digit tokens, in token order.
    ///
    /// The downstream consumer decodes with one table for every language, so
    /// Swedish `Å` stays literal.
    pub fn special_letters(self) -> &'static [char] {
        &SPECIAL_LETTERS
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Locale::ALL
            .into_iter()
            .find(|locale| locale.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ConfigError::Invalid {
                key: "LANGUAGE",
                reason: format!("language '{}' is not supported (expected de or sv)", trimmed),
            })
    }
}
