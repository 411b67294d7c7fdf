use serde::{Deserialize, Serialize};

/// Classification assigned to a span of normalized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenClass {
    /// An ordinary word, looked up against the lexicon.
    Word,
    /// A residual digit run the expansion pass left behind.
    Number,
    /// An initialism read out letter by letter.
    Abbreviation,
    /// Punctuation, retained for prosody and boundary tokens downstream.
    Punctuation,
}

/// One normalized span of input text. Created by the normalizer, consumed by
/// the lookup stages, discarded after tokenization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub class: TokenClass,
    /// POS tag assigned by the tagger; empty until tagged.
    pub tag: String,
    /// Whitespace that followed this span in the source text.
    pub whitespace: String,
    /// Resolved pronunciation, filled in by the engine.
    pub phonemes: Option<String>,
    /// Caller-supplied pronunciation that wins over every other source.
    pub alias: Option<String>,
    /// Caller-supplied stress adjustment applied to the resolved phonemes.
    pub stress: Option<i8>,
}

impl Token {
    pub fn new(text: impl Into<String>, class: TokenClass) -> Self {
        Self {
            text: text.into(),
            class,
            tag: String::new(),
            whitespace: String::new(),
            phonemes: None,
            alias: None,
            stress: None,
        }
    }

    pub fn is_punct(&self) -> bool {
        self.class == TokenClass::Punctuation
    }
}
