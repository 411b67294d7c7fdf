//! Heuristic part-of-speech tagging.
//!
//! Tags exist to pick among candidate pronunciations, not to parse English:
//! known words come from an embedded tag table, everything else is resolved
//! from suffix shape and local context (previous tag, sentence position,
//! capitalization). The rule set is a versioned policy — extend it here
//! rather than special-casing words downstream.

use std::collections::HashMap;

use crate::error::G2pError;
use crate::token::{Token, TokenClass};

static TAGS_JSON: &str = include_str!("../data/tags.json");

const SENTENCE_FINAL: [&str; 3] = [".", "!", "?"];

pub struct Tagger {
    tags: HashMap<String, String>,
}

impl Tagger {
    pub fn new() -> Result<Self, G2pError> {
        let tags = serde_json::from_str(TAGS_JSON).map_err(|e| G2pError::Resource {
            name: "tags",
            detail: e.to_string(),
        })?;
        Ok(Self { tags })
    }

    /// Tag a token sequence. Total: every token receives a tag.
    pub fn tag(&self, tokens: &[Token]) -> Vec<String> {
        let mut out = Vec::with_capacity(tokens.len());
        let mut prev = String::from("-START-");
        let mut sentence_start = true;

        for token in tokens {
            let tag = match token.class {
                TokenClass::Punctuation => ".".to_string(),
                TokenClass::Number => "CD".to_string(),
                TokenClass::Abbreviation => "NNP".to_string(),
                TokenClass::Word => self.tag_word(&token.text, &prev, sentence_start),
            };
            sentence_start =
                token.is_punct() && SENTENCE_FINAL.contains(&token.text.as_str());
            prev = tag.clone();
            out.push(tag);
        }

        out
    }

    fn tag_word(&self, word: &str, prev: &str, sentence_start: bool) -> String {
        let folded = word.to_lowercase();
        if let Some(tag) = self.tags.get(&folded) {
            return tag.clone();
        }

        // Capitalization mid-sentence reads as a proper noun.
        if !sentence_start
            && word.chars().next().is_some_and(|c| c.is_uppercase())
            && word.chars().any(|c| c.is_lowercase())
        {
            return "NNP".to_string();
        }

        // "to" and modals announce a verb; determiners, adjectives and
        // numerals announce a noun; a pronoun subject announces a verb.
        match prev {
            "TO" | "MD" => return "VB".to_string(),
            "PRP" => return "VBP".to_string(),
            "DT" | "JJ" | "CD" | "PRP$" => return "NN".to_string(),
            _ => {}
        }

        // Suffix shape.
        if folded.len() > 4 && folded.ends_with("ing") {
            return "VBG".to_string();
        }
        if folded.len() > 3 && folded.ends_with("ed") {
            return "VBD".to_string();
        }
        if folded.len() > 3 && folded.ends_with("ly") {
            return "RB".to_string();
        }
        if ["tion", "sion", "ment", "ness", "ity"]
            .iter()
            .any(|s| folded.len() > s.len() + 1 && folded.ends_with(s))
        {
            return "NN".to_string();
        }
        if ["ous", "ful", "ive", "able", "ible"]
            .iter()
            .any(|s| folded.len() > s.len() + 1 && folded.ends_with(s))
        {
            return "JJ".to_string();
        }
        if folded.len() > 3 && folded.ends_with('s') && !folded.ends_with("ss") {
            return "NNS".to_string();
        }

        "NN".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::segment;

    fn tag_text(text: &str) -> Vec<String> {
        Tagger::new().unwrap().tag(&segment(text))
    }

    #[test]
    fn known_words_use_the_table() {
        let tags = tag_text("the cat is here");
        assert_eq!(tags[0], "DT");
        assert_eq!(tags[2], "VBZ");
    }

    #[test]
    fn determiner_announces_a_noun() {
        let tags = tag_text("a record");
        assert_eq!(tags[1], "NN");
    }

    #[test]
    fn to_announces_a_verb() {
        let tags = tag_text("to record");
        assert_eq!(tags[1], "VB");
    }

    #[test]
    fn capitalized_mid_sentence_is_a_proper_noun() {
        let tags = tag_text("we met Zorblat today");
        assert_eq!(tags[2], "NNP");
    }

    #[test]
    fn sentence_start_capitalization_is_not_a_proper_noun() {
        let tags = tag_text("Walking is fun. Walking is fun");
        assert_eq!(tags[0], "VBG");
        assert_eq!(tags[4], "VBG");
    }

    #[test]
    fn punctuation_and_numbers_get_structural_tags() {
        let tags = tag_text("wait , 123 abc123");
        assert_eq!(tags[1], ".");
        // "123" inside an unexpanded segment stays a numeral.
        assert!(tags.contains(&"CD".to_string()));
    }

    #[test]
    fn total_over_arbitrary_input() {
        let tokens = segment("blorptastic ❄ xq");
        let tags = Tagger::new().unwrap().tag(&tokens);
        assert_eq!(tags.len(), tokens.len());
        assert!(tags.iter().all(|t| !t.is_empty()));
    }
}
