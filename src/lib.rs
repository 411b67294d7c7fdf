//! graphon — a lexicon-driven grapheme-to-phoneme engine for TTS front ends.
//!
//! Converts raw text into phoneme strings and into the token IDs consumed by
//! a downstream speech model. American and British English variants are
//! supported; out-of-lexicon words fall back to deterministic
//! letter-to-sound rules, so conversion always produces output.
//!
//! # Example
//!
//! ```rust
//! use graphon::{text_to_phonemes, text_to_tokens};
//!
//! let tokens = text_to_tokens("Hello, world!", "en-us");
//! assert!(!tokens.is_empty());
//!
//! let phonemes = text_to_phonemes("Hello, world!", "en-us");
//! assert!(!phonemes.is_empty());
//! ```
//!
//! Engines for both variants are built lazily and live for the process; for
//! independent lexicon stores, construct [`G2P`] instances directly.

pub mod error;
pub mod fallback;
pub mod ffi;
pub mod g2p;
pub mod language;
pub mod lexicon;
pub mod normalize;
pub mod tagger;
pub mod token;
pub mod tokenizer;

pub use error::G2pError;
pub use g2p::{G2P, bytes_to_phonemes, bytes_to_tokens, text_to_phonemes, text_to_tokens};
pub use language::Language;
pub use lexicon::Lexicon;
pub use token::{Token, TokenClass};
pub use tokenizer::{
    MAX_TOKENS, PAD_TOKEN, UNK_TOKEN, phonemes_to_tokens, tokens_to_phonemes,
};

/// Engine and vocabulary version, used by callers to confirm token-ID
/// compatibility across upgrades.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
