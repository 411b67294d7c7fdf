use serde::{Deserialize, Serialize};

/// Language variant selecting the lexicon partition, the fallback ruleset
/// and the phoneme conventions. Immutable once resolved for a call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    EnglishUS,
    EnglishGB,
}

impl Language {
    /// Parse a language code. Unknown, garbled or empty codes resolve to the
    /// default variant; a missing language argument is never an error.
    pub fn from_code(code: &str) -> Self {
        match code.to_lowercase().as_str() {
            "en-gb" | "en-uk" | "gb" | "uk" | "british" => Language::EnglishGB,
            _ => Language::EnglishUS,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::EnglishUS => "en-us",
            Language::EnglishGB => "en-gb",
        }
    }

    pub fn is_british(&self) -> bool {
        matches!(self, Language::EnglishGB)
    }
}
