//! Letter-to-sound fallback for words the lexicon does not know.

use crate::language::Language;
use crate::lexicon::{PRIMARY_STRESS, SECONDARY_STRESS, VOWELS};

/// Seam for out-of-lexicon pronunciation generation.
///
/// Implementations are total and deterministic: the same word always yields
/// the same pronunciation, and a word containing at least one letter always
/// yields a non-empty one.
pub trait Fallback: Send + Sync {
    /// Returns (phonemes, rating).
    fn phonemize(&self, word: &str) -> (String, u8);
}

/// Ordered grapheme-cluster rules, longest pattern first; scanning stops at
/// the first match, with single letters as the rule of last resort.
///
/// Both tables must stay sorted by descending pattern length.
const US_RULES: &[(&str, &str)] = &[
    ("tion", "ʃᵊn"),
    ("sion", "ʒᵊn"),
    ("ight", "It"),
    ("ough", "ʌf"),
    ("eigh", "A"),
    ("augh", "ɔ"),
    ("tch", "ʧ"),
    ("dge", "ʤ"),
    ("sch", "sk"),
    ("ear", "ɪɹ"),
    ("air", "ɛɹ"),
    ("oor", "ɔɹ"),
    ("ing", "ɪŋ"),
    ("th", "θ"),
    ("sh", "ʃ"),
    ("ch", "ʧ"),
    ("ph", "f"),
    ("wh", "w"),
    ("ck", "k"),
    ("ng", "ŋ"),
    ("kn", "n"),
    ("wr", "ɹ"),
    ("qu", "kw"),
    ("ee", "i"),
    ("ea", "i"),
    ("oo", "u"),
    ("ou", "W"),
    ("ow", "W"),
    ("ai", "A"),
    ("ay", "A"),
    ("oi", "Y"),
    ("oy", "Y"),
    ("oa", "O"),
    ("au", "ɔ"),
    ("aw", "ɔ"),
    ("ew", "u"),
    ("ar", "ɑɹ"),
    ("er", "ɚ"),
    ("ir", "ɜɹ"),
    ("or", "ɔɹ"),
    ("ur", "ɜɹ"),
    ("a", "æ"),
    ("b", "b"),
    ("c", "k"),
    ("d", "d"),
    ("e", "ɛ"),
    ("f", "f"),
    ("g", "ɡ"),
    ("h", "h"),
    ("i", "ɪ"),
    ("j", "ʤ"),
    ("k", "k"),
    ("l", "l"),
    ("m", "m"),
    ("n", "n"),
    ("o", "ɑ"),
    ("p", "p"),
    ("q", "k"),
    ("r", "ɹ"),
    ("s", "s"),
    ("t", "t"),
    ("u", "ʌ"),
    ("v", "v"),
    ("w", "w"),
    ("x", "ks"),
    ("y", "i"),
    ("z", "z"),
];

/// British table: non-rhotic vowel+r clusters, əʊ for oa, ɒ for short o.
const GB_RULES: &[(&str, &str)] = &[
    ("tion", "ʃᵊn"),
    ("sion", "ʒᵊn"),
    ("ight", "It"),
    ("ough", "ʌf"),
    ("eigh", "A"),
    ("augh", "ɔː"),
    ("tch", "ʧ"),
    ("dge", "ʤ"),
    ("sch", "sk"),
    ("ear", "ɪə"),
    ("air", "ɛə"),
    ("oor", "ɔː"),
    ("ing", "ɪŋ"),
    ("th", "θ"),
    ("sh", "ʃ"),
    ("ch", "ʧ"),
    ("ph", "f"),
    ("wh", "w"),
    ("ck", "k"),
    ("ng", "ŋ"),
    ("kn", "n"),
    ("wr", "ɹ"),
    ("qu", "kw"),
    ("ee", "iː"),
    ("ea", "iː"),
    ("oo", "uː"),
    ("ou", "W"),
    ("ow", "W"),
    ("ai", "A"),
    ("ay", "A"),
    ("oi", "Y"),
    ("oy", "Y"),
    ("oa", "Q"),
    ("au", "ɔː"),
    ("aw", "ɔː"),
    ("ew", "uː"),
    ("ar", "ɑː"),
    ("er", "ə"),
    ("ir", "ɜː"),
    ("or", "ɔː"),
    ("ur", "ɜː"),
    ("a", "æ"),
    ("b", "b"),
    ("c", "k"),
    ("d", "d"),
    ("e", "ɛ"),
    ("f", "f"),
    ("g", "ɡ"),
    ("h", "h"),
    ("i", "ɪ"),
    ("j", "ʤ"),
    ("k", "k"),
    ("l", "l"),
    ("m", "m"),
    ("n", "n"),
    ("o", "ɒ"),
    ("p", "p"),
    ("q", "k"),
    ("r", "ɹ"),
    ("s", "s"),
    ("t", "t"),
    ("u", "ʌ"),
    ("v", "v"),
    ("w", "w"),
    ("x", "ks"),
    ("y", "i"),
    ("z", "z"),
];

pub struct RuleFallback {
    british: bool,
}

impl RuleFallback {
    pub fn new(language: Language) -> Self {
        Self {
            british: language.is_british(),
        }
    }

    fn rules(&self) -> &'static [(&'static str, &'static str)] {
        if self.british { GB_RULES } else { US_RULES }
    }
}

impl Fallback for RuleFallback {
    fn phonemize(&self, word: &str) -> (String, u8) {
        let folded = word.to_lowercase();
        let mut out = String::new();
        let mut rest = folded.as_str();

        // Word-initial y is consonantal.
        if let Some(stripped) = rest.strip_prefix('y') {
            out.push('j');
            rest = stripped;
        }

        while !rest.is_empty() {
            let mut matched = false;
            for (pattern, phonemes) in self.rules() {
                if rest.starts_with(pattern) {
                    out.push_str(phonemes);
                    rest = &rest[pattern.len()..];
                    matched = true;
                    break;
                }
            }
            if !matched {
                // Unmapped character: contributes nothing speakable.
                let mut chars = rest.chars();
                chars.next();
                rest = chars.as_str();
            }
        }

        if !out.contains(PRIMARY_STRESS) && !out.contains(SECONDARY_STRESS) {
            if let Some(pos) = out.find(|c| VOWELS.contains(c)) {
                out.insert(pos, PRIMARY_STRESS);
            }
        }

        tracing::debug!(word, phonemes = %out, "letter-to-sound fallback");
        (out, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::is_valid_phoneme;

    fn us() -> RuleFallback {
        RuleFallback::new(Language::EnglishUS)
    }

    #[test]
    fn never_fails_on_letters() {
        let (ps, rating) = us().phonemize("xyzzyqwerty");
        assert!(!ps.is_empty());
        assert_eq!(rating, 1);
    }

    #[test]
    fn deterministic() {
        let first = us().phonemize("blorptastic");
        let second = us().phonemize("blorptastic");
        assert_eq!(first, second);
    }

    #[test]
    fn longest_match_wins() {
        let (ps, _) = us().phonemize("shing");
        // "sh" then "ing", not s-h-i-n-g.
        assert_eq!(ps, "ʃˈɪŋ");
    }

    #[test]
    fn inserts_primary_stress() {
        let (ps, _) = us().phonemize("brak");
        assert!(ps.contains(PRIMARY_STRESS));
    }

    #[test]
    fn output_stays_in_inventory() {
        for word in ["xyzzyqwerty", "schnapple", "thoughtling", "crwth", "naïve"] {
            let (ps, _) = us().phonemize(word);
            let (gb_ps, _) = RuleFallback::new(Language::EnglishGB).phonemize(word);
            for c in ps.chars().chain(gb_ps.chars()) {
                assert!(is_valid_phoneme(c), "{word}: {c:?} outside vocabulary");
            }
        }
    }

    #[test]
    fn variants_differ_on_rhotic_clusters() {
        let (usp, _) = us().phonemize("zorb");
        let (gbp, _) = RuleFallback::new(Language::EnglishGB).phonemize("zorb");
        assert_ne!(usp, gbp);
    }
}
