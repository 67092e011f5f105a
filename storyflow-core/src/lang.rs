//! Language tagging helpers
//!
//! Records carry English and Arabic text side by side. Anything not tagged
//! explicitly is sniffed by its characters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Start of the Arabic Unicode block
const ARABIC_BLOCK_START: char = '\u{0600}';
/// End of the Arabic Unicode block (inclusive)
const ARABIC_BLOCK_END: char = '\u{06FF}';

/// One of the two languages a requirement is written in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Ar,
}

impl Language {
    /// Suffix used when a label is tagged with this language, e.g. "Scenario (EN)"
    pub fn suffix(&self) -> &'static str {
        match self {
            Language::En => "EN",
            Language::Ar => "AR",
        }
    }

    /// Guess the language of a piece of text
    pub fn sniff(text: &str) -> Self {
        if contains_arabic(text) {
            Language::Ar
        } else {
            Language::En
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::En => write!(f, "English"),
            Language::Ar => write!(f, "Arabic"),
        }
    }
}

/// Returns true if any character falls in the Arabic block (U+0600..=U+06FF)
pub fn contains_arabic(text: &str) -> bool {
    text.chars()
        .any(|c| (ARABIC_BLOCK_START..=ARABIC_BLOCK_END).contains(&c))
}
