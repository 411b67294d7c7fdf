//! The conversion engine: normalization, lookup, disambiguation, fallback
//! and final token mapping.
//!
//! Every stage is total; a conversion call never fails and never performs
//! I/O. Engines are immutable after construction and shareable across
//! threads.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::G2pError;
use crate::fallback::{Fallback, RuleFallback};
use crate::language::Language;
use crate::lexicon::{Lexicon, apply_stress};
use crate::normalize;
use crate::tagger::Tagger;
use crate::token::{Token, TokenClass};
use crate::tokenizer;

/// Punctuation that survives into the phoneme stream as boundary cues.
static PASSTHROUGH_PUNCT: Lazy<HashSet<char>> =
    Lazy::new(|| ";:,.!?—…\"()“”".chars().collect());

static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

pub struct G2P {
    language: Language,
    lexicon: Lexicon,
    tagger: Tagger,
    fallback: Box<dyn Fallback>,
    overrides: HashMap<String, String>,
}

impl G2P {
    /// Build an engine for a variant. Fails fast if an embedded resource is
    /// corrupt; per-call conversion never fails afterwards.
    pub fn new(language: Language) -> Result<Self, G2pError> {
        Ok(Self {
            language,
            lexicon: Lexicon::new(language)?,
            tagger: Tagger::new()?,
            fallback: Box::new(RuleFallback::new(language)),
            overrides: HashMap::new(),
        })
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Register a pronunciation that wins over every other source for the
    /// given word (case-folded match).
    pub fn add_override(&mut self, word: &str, phonemes: &str) {
        self.overrides
            .insert(word.to_lowercase(), phonemes.to_string());
    }

    /// Convert text to its phoneme string.
    pub fn text_to_phonemes(&self, text: &str) -> String {
        let expanded = normalize::expand(text);
        let mut tokens = normalize::segment(&expanded);
        let tags = self.tagger.tag(&tokens);
        for (token, tag) in tokens.iter_mut().zip(tags) {
            token.tag = tag;
        }
        self.phonemize_tokens(&mut tokens)
    }

    /// Phonemize pre-segmented tokens, honoring caller-supplied aliases and
    /// stress adjustments. Fills each token's `phonemes` field.
    pub fn phonemize_tokens(&self, tokens: &mut [Token]) -> String {
        let mut out = String::new();
        let mut prev_was_word = false;

        for token in tokens.iter_mut() {
            match token.class {
                TokenClass::Punctuation => {
                    let c = token.text.chars().next().unwrap_or(' ');
                    if PASSTHROUGH_PUNCT.contains(&c) {
                        out.push(c);
                        token.phonemes = Some(c.to_string());
                    }
                    prev_was_word = false;
                }
                _ => {
                    if prev_was_word && !out.is_empty() && !out.ends_with(' ') {
                        out.push(' ');
                    }
                    let ps = self.phonemize_token(token);
                    out.push_str(&ps);
                    token.phonemes = Some(ps);
                    prev_was_word = true;
                }
            }
            out.push_str(&token.whitespace);
        }

        MULTI_SPACE.replace_all(&out, " ").trim().to_string()
    }

    fn phonemize_token(&self, token: &Token) -> String {
        if let Some(alias) = &token.alias {
            return alias.clone();
        }

        let tag = if token.tag.is_empty() {
            None
        } else {
            Some(token.tag.as_str())
        };

        let ps = match token.class {
            TokenClass::Number => self.speak_digits(&token.text),
            TokenClass::Abbreviation => self
                .lexicon
                .get_word(&token.text, tag)
                .map(|(ps, _)| ps)
                .unwrap_or_else(|| self.spell_out(&token.text)),
            _ => self.word_phonemes(&token.text, tag),
        };

        apply_stress(&ps, token.stress)
    }

    /// Pronunciation resolution for one word; total by construction.
    pub fn word_to_phonemes(&self, word: &str, tag: Option<&str>) -> String {
        self.word_phonemes(word, tag)
    }

    fn word_phonemes(&self, word: &str, tag: Option<&str>) -> String {
        if word.is_empty() {
            return String::new();
        }

        if let Some(ps) = self.overrides.get(&word.to_lowercase()) {
            return ps.clone();
        }

        if let Some((ps, _)) = self.lexicon.get_word(word, tag) {
            return ps;
        }

        // Hyphenated compounds phonemize part by part.
        if word.contains('-') {
            let parts: Vec<String> = word
                .split('-')
                .filter(|p| !p.is_empty())
                .map(|p| self.word_phonemes(p, tag))
                .collect();
            if !parts.is_empty() {
                return parts.join(" ");
            }
        }

        // Short all-caps tokens read as initialisms.
        if word.chars().count() <= 5 && word.chars().all(|c| c.is_ascii_uppercase()) {
            return self.spell_out(word);
        }

        let (ps, _) = self.fallback.phonemize(word);
        ps
    }

    /// Read an initialism letter by letter via the single-letter lexicon
    /// entries.
    fn spell_out(&self, word: &str) -> String {
        let mut parts = Vec::new();
        for c in word.chars().filter(|c| c.is_alphabetic()) {
            let letter: String = c.to_uppercase().collect();
            if let Some((ps, _)) = self.lexicon.lookup(&letter, None) {
                parts.push(ps);
            }
        }
        parts.join(" ")
    }

    /// Last-chance digit reading for digit runs the expansion pass left
    /// behind (e.g. glued to letters).
    fn speak_digits(&self, text: &str) -> String {
        let mut parts = Vec::new();
        for c in text.chars() {
            if c.is_ascii_digit() {
                let word = normalize::digit_word(c);
                if !word.is_empty() {
                    parts.push(self.word_phonemes(&word, None));
                }
            }
        }
        parts.join(" ")
    }

    /// Convert text to the final token ID sequence.
    pub fn convert(&self, text: &str) -> Vec<i64> {
        tokenizer::phonemes_to_tokens(&self.text_to_phonemes(text))
    }
}

static ENGINE_US: Lazy<G2P> =
    Lazy::new(|| G2P::new(Language::EnglishUS).expect("embedded en-us resources must parse"));
static ENGINE_GB: Lazy<G2P> =
    Lazy::new(|| G2P::new(Language::EnglishGB).expect("embedded en-gb resources must parse"));

/// The process-lifetime engine for a variant.
pub(crate) fn engine(language: Language) -> &'static G2P {
    match language {
        Language::EnglishUS => &ENGINE_US,
        Language::EnglishGB => &ENGINE_GB,
    }
}

/// Convert text to phoneme token IDs. `language` is a variant code; unknown
/// or empty codes use the default variant.
pub fn text_to_tokens(text: &str, language: &str) -> Vec<i64> {
    engine(Language::from_code(language)).convert(text)
}

/// Convert text to its phoneme string.
pub fn text_to_phonemes(text: &str, language: &str) -> String {
    engine(Language::from_code(language)).text_to_phonemes(text)
}

/// Byte-level entry point used by the C boundary. Malformed UTF-8 is the
/// only per-call error; it does not affect other calls.
pub fn bytes_to_tokens(bytes: &[u8], language: &str) -> Result<Vec<i64>, G2pError> {
    let text = std::str::from_utf8(bytes).map_err(|_| G2pError::InvalidInput)?;
    Ok(text_to_tokens(text, language))
}

/// Byte-level counterpart of [`text_to_phonemes`].
pub fn bytes_to_phonemes(bytes: &[u8], language: &str) -> Result<String, G2pError> {
    let text = std::str::from_utf8(bytes).map_err(|_| G2pError::InvalidInput)?;
    Ok(text_to_phonemes(text, language))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn us() -> G2P {
        G2P::new(Language::EnglishUS).unwrap()
    }

    #[test]
    fn hello_world_keeps_boundary_punctuation() {
        let phonemes = us().text_to_phonemes("Hello, world!");
        assert_eq!(phonemes, "həlˈO, wˈɜɹld!");
    }

    #[test]
    fn contractions_resolve_from_the_lexicon() {
        let phonemes = us().text_to_phonemes("don't stop");
        assert!(phonemes.starts_with("dˈOnt"), "got: {phonemes}");
    }

    #[test]
    fn initialisms_spell_out() {
        let phonemes = us().text_to_phonemes("USA");
        assert_eq!(phonemes, "jˈu ˈɛs ˈA");
    }

    #[test]
    fn hyphenated_compounds_join_parts() {
        let phonemes = us().word_to_phonemes("twenty-one", None);
        assert_eq!(phonemes, "twˈɛnti wˈʌn");
    }

    #[test]
    fn camel_case_splits_into_words() {
        let phonemes = us().text_to_phonemes("JavaScript");
        assert!(phonemes.contains(' '), "got: {phonemes}");
    }

    #[test]
    fn unknown_words_use_the_fallback() {
        let g2p = us();
        let phonemes = g2p.word_to_phonemes("xyzzyqwerty", None);
        assert!(!phonemes.is_empty());
        assert_eq!(phonemes, g2p.word_to_phonemes("xyzzyqwerty", None));
    }

    #[test]
    fn explicit_tag_selects_the_candidate() {
        let g2p = us();
        assert_eq!(g2p.word_to_phonemes("record", Some("VB")), "ɹɪkˈɔɹd");
        assert_eq!(g2p.word_to_phonemes("record", Some("NN")), "ɹˈɛkɚd");
    }

    #[test]
    fn tagger_context_disambiguates_in_sentences() {
        let g2p = us();
        let verb = g2p.text_to_phonemes("to record");
        let noun = g2p.text_to_phonemes("a record");
        assert!(verb.contains("ɹɪkˈɔɹd"), "got: {verb}");
        assert!(noun.contains("ɹˈɛkɚd"), "got: {noun}");
    }

    #[test]
    fn overrides_win() {
        let mut g2p = us();
        g2p.add_override("hello", "hɑI");
        assert_eq!(g2p.word_to_phonemes("Hello", None), "hɑI");
    }

    #[test]
    fn alias_and_stress_apply_to_tokens() {
        let g2p = us();
        let mut tokens = vec![Token::new("hello", TokenClass::Word)];
        tokens[0].alias = Some("hˈA".to_string());
        assert_eq!(g2p.phonemize_tokens(&mut tokens), "hˈA");

        let mut tokens = vec![Token::new("hello", TokenClass::Word)];
        tokens[0].stress = Some(-2);
        let flattened = g2p.phonemize_tokens(&mut tokens);
        assert!(!flattened.contains('ˈ'), "got: {flattened}");
    }

    #[test]
    fn residual_digits_read_digit_by_digit() {
        let g2p = us();
        let mut tokens = vec![Token::new("42", TokenClass::Number)];
        let phonemes = g2p.phonemize_tokens(&mut tokens);
        assert_eq!(phonemes, "fˈɔɹ tˈu");
    }

    #[test]
    fn conversion_is_idempotent() {
        let first = us().convert("The quick brown fox jumps over the lazy dog.");
        let second = us().convert("The quick brown fox jumps over the lazy dog.");
        assert_eq!(first, second);
    }

    #[test]
    fn empty_text_converts_to_empty_tokens() {
        assert!(us().convert("").is_empty());
        assert!(us().convert("   ").is_empty());
    }

    #[test]
    fn top_level_entry_points_share_engines() {
        let direct = text_to_tokens("hello", "en-us");
        let default = text_to_tokens("hello", "");
        let garbage = text_to_tokens("hello", "qq-zz");
        assert_eq!(direct, default);
        assert_eq!(direct, garbage);
    }

    #[test]
    fn malformed_bytes_are_invalid_input() {
        assert!(matches!(
            bytes_to_tokens(&[0xff, 0xfe], "en-us"),
            Err(G2pError::InvalidInput)
        ));
        assert_eq!(
            bytes_to_tokens("hello".as_bytes(), "en-us").unwrap(),
            text_to_tokens("hello", "en-us")
        );
    }

    #[test]
    fn british_variant_differs() {
        let us_ps = text_to_phonemes("hello world", "en-us");
        let gb_ps = text_to_phonemes("hello world", "en-gb");
        assert_ne!(us_ps, gb_ps);
    }
}
