//! Cascading dictionary lookup: gold tier first, silver tier second, then
//! inflection stemming against both.
//!
//! Dictionaries are embedded JSON, parsed once per engine; a corrupt
//! resource fails construction rather than individual calls.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::G2pError;
use crate::language::Language;

pub const PRIMARY_STRESS: char = 'ˈ';
pub const SECONDARY_STRESS: char = 'ˌ';

/// Vowel phonemes eligible to carry stress.
pub(crate) const VOWELS: &str = "AIOQWYaiuæɑɒɔəɚɛɜɪʊʌᵻ";

const VOICELESS_ENDINGS: &str = "ptkfθ";
const SIBILANT_ENDINGS: &str = "szʃʒʧʤ";

/// A lexicon entry: either a single pronunciation or a POS-keyed candidate
/// set with a DEFAULT member.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PhonemeEntry {
    Simple(String),
    Tagged(HashMap<String, Option<String>>),
}

impl PhonemeEntry {
    /// Select one candidate: exact tag, then parent tag class, then the
    /// entry's DEFAULT. Simple entries ignore the tag.
    pub fn resolve(&self, tag: Option<&str>) -> Option<&str> {
        match self {
            PhonemeEntry::Simple(ps) => Some(ps.as_str()),
            PhonemeEntry::Tagged(map) => {
                if let Some(tag) = tag {
                    if let Some(Some(ps)) = map.get(tag) {
                        return Some(ps.as_str());
                    }
                    let parent = parent_tag(tag);
                    if parent != tag {
                        if let Some(Some(ps)) = map.get(parent) {
                            return Some(ps.as_str());
                        }
                    }
                }
                map.get("DEFAULT").and_then(|v| v.as_deref())
            }
        }
    }

    /// Every listed candidate pronunciation.
    pub fn candidates(&self) -> Vec<&str> {
        match self {
            PhonemeEntry::Simple(ps) => vec![ps.as_str()],
            PhonemeEntry::Tagged(map) => map.values().filter_map(|v| v.as_deref()).collect(),
        }
    }
}

/// Map fine-grained POS tags to the parent classes used as dictionary keys.
pub(crate) fn parent_tag(tag: &str) -> &str {
    if tag.starts_with("VB") {
        "VERB"
    } else if tag.starts_with("NN") {
        "NOUN"
    } else if tag.starts_with("ADV") || tag.starts_with("RB") {
        "ADV"
    } else if tag.starts_with("ADJ") || tag.starts_with("JJ") {
        "ADJ"
    } else {
        tag
    }
}

pub type Dictionary = HashMap<String, PhonemeEntry>;

static US_GOLD: &str = include_str!("../data/us_gold.json");
static US_SILVER: &str = include_str!("../data/us_silver.json");
static GB_GOLD: &str = include_str!("../data/gb_gold.json");
static GB_SILVER: &str = include_str!("../data/gb_silver.json");

fn parse_dictionary(name: &'static str, json: &str) -> Result<Dictionary, G2pError> {
    let mut dict: Dictionary = serde_json::from_str(json).map_err(|e| G2pError::Resource {
        name,
        detail: e.to_string(),
    })?;
    grow_case_variants(&mut dict);
    Ok(dict)
}

/// Add the missing casing of each entry (lowercase ↔ Capitalized) so that
/// sentence-initial capitalization never misses.
fn grow_case_variants(dict: &mut Dictionary) {
    let additions: Vec<(String, PhonemeEntry)> = dict
        .iter()
        .filter(|(k, _)| k.chars().count() >= 2)
        .filter_map(|(k, v)| {
            let lower = k.to_lowercase();
            let capitalized = capitalize(k);
            if *k == lower && *k != capitalized && !dict.contains_key(&capitalized) {
                Some((capitalized, v.clone()))
            } else if *k == capitalized && *k != lower && !dict.contains_key(&lower) {
                Some((lower, v.clone()))
            } else {
                None
            }
        })
        .collect();

    dict.extend(additions);
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Immutable pronunciation store for one language variant. Built once,
/// read-only afterwards; shareable across threads without locking.
pub struct Lexicon {
    british: bool,
    gold: Dictionary,
    silver: Dictionary,
}

impl Lexicon {
    /// Load the embedded dictionaries for a variant. Fails fast on a corrupt
    /// resource.
    pub fn new(language: Language) -> Result<Self, G2pError> {
        let (gold, silver) = if language.is_british() {
            (
                parse_dictionary("gb_gold", GB_GOLD)?,
                parse_dictionary("gb_silver", GB_SILVER)?,
            )
        } else {
            (
                parse_dictionary("us_gold", US_GOLD)?,
                parse_dictionary("us_silver", US_SILVER)?,
            )
        };
        Ok(Self {
            british: language.is_british(),
            gold,
            silver,
        })
    }

    /// Build a lexicon from explicit dictionaries, for callers that need
    /// independent stores in one process.
    pub fn from_parts(mut gold: Dictionary, mut silver: Dictionary, language: Language) -> Self {
        grow_case_variants(&mut gold);
        grow_case_variants(&mut silver);
        Self {
            british: language.is_british(),
            gold,
            silver,
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.gold.contains_key(word) || self.silver.contains_key(word)
    }

    /// The raw entry for a word, gold tier preferred.
    pub fn entry(&self, word: &str) -> Option<&PhonemeEntry> {
        self.gold.get(word).or_else(|| self.silver.get(word))
    }

    /// Direct lookup: gold tier (rating 4) then silver tier (rating 3).
    /// Absence is not an error.
    pub fn lookup(&self, word: &str, tag: Option<&str>) -> Option<(String, u8)> {
        if let Some(entry) = self.gold.get(word) {
            if let Some(ps) = entry.resolve(tag) {
                return Some((ps.to_string(), 4));
            }
        }
        if let Some(entry) = self.silver.get(word) {
            if let Some(ps) = entry.resolve(tag) {
                return Some((ps.to_string(), 3));
            }
        }
        None
    }

    /// Lookup with case folding and inflection stemming.
    pub fn get_word(&self, word: &str, tag: Option<&str>) -> Option<(String, u8)> {
        if let Some(hit) = self.lookup(word, tag) {
            return Some(hit);
        }
        let folded = word.to_lowercase();
        if folded != word {
            if let Some(hit) = self.lookup(&folded, tag) {
                return Some(hit);
            }
        }
        self.stem_s(&folded, tag)
            .or_else(|| self.stem_ed(&folded, tag))
            .or_else(|| self.stem_ing(&folded, tag))
    }

    /// Plural / third-person / possessive -s.
    fn stem_s(&self, word: &str, tag: Option<&str>) -> Option<(String, u8)> {
        if word.len() < 3 || !word.ends_with('s') {
            return None;
        }

        let stem = if !word.ends_with("ss") && self.contains(&word[..word.len() - 1]) {
            word[..word.len() - 1].to_string()
        } else if (word.ends_with("'s")
            || (word.len() > 4 && word.ends_with("es") && !word.ends_with("ies")))
            && self.contains(&word[..word.len() - 2])
        {
            word[..word.len() - 2].to_string()
        } else if word.len() > 4 && word.ends_with("ies") {
            let base = format!("{}y", &word[..word.len() - 3]);
            if !self.contains(&base) {
                return None;
            }
            base
        } else {
            return None;
        };

        self.lookup(&stem, tag)
            .map(|(ps, rating)| (self.suffix_s(&ps), rating))
    }

    /// Voicing-aware -s phonology.
    fn suffix_s(&self, stem: &str) -> String {
        let Some(last) = stem.chars().last() else {
            return String::new();
        };
        if SIBILANT_ENDINGS.contains(last) {
            let schwa = if self.british { "ɪ" } else { "ᵻ" };
            format!("{stem}{schwa}z")
        } else if VOICELESS_ENDINGS.contains(last) {
            format!("{stem}s")
        } else {
            format!("{stem}z")
        }
    }

    /// Past tense -ed.
    fn stem_ed(&self, word: &str, tag: Option<&str>) -> Option<(String, u8)> {
        if word.len() < 4 || !word.ends_with('d') {
            return None;
        }

        let stem = if !word.ends_with("dd") && self.contains(&word[..word.len() - 1]) {
            word[..word.len() - 1].to_string()
        } else if word.len() > 4
            && word.ends_with("ed")
            && !word.ends_with("eed")
            && self.contains(&word[..word.len() - 2])
        {
            word[..word.len() - 2].to_string()
        } else {
            return None;
        };

        self.lookup(&stem, tag)
            .map(|(ps, rating)| (self.suffix_ed(&ps), rating))
    }

    fn suffix_ed(&self, stem: &str) -> String {
        let chars: Vec<char> = stem.chars().collect();
        let Some(&last) = chars.last() else {
            return String::new();
        };
        if "pkfθʃsʧ".contains(last) {
            format!("{stem}t")
        } else if last == 'd' {
            let schwa = if self.british { "ɪ" } else { "ᵻ" };
            format!("{stem}{schwa}d")
        } else if last != 't' {
            format!("{stem}d")
        } else if self.british || chars.len() < 2 {
            format!("{stem}ɪd")
        } else {
            // American flap T between vowels.
            let second_last = chars[chars.len() - 2];
            if "AIOWYiuæɑəɚɛɪɹʊʌ".contains(second_last) {
                let base: String = chars[..chars.len() - 1].iter().collect();
                format!("{base}ɾᵻd")
            } else {
                format!("{stem}ᵻd")
            }
        }
    }

    /// Progressive -ing.
    fn stem_ing(&self, word: &str, tag: Option<&str>) -> Option<(String, u8)> {
        if word.len() < 5 || !word.ends_with("ing") {
            return None;
        }

        let base = &word[..word.len() - 3];
        let stem = if word.len() > 5 && self.contains(base) {
            base.to_string()
        } else if self.contains(&format!("{base}e")) {
            format!("{base}e")
        } else if word.len() > 5
            && ends_with_doubled_consonant(word)
            && self.contains(&word[..word.len() - 4])
        {
            word[..word.len() - 4].to_string()
        } else {
            return None;
        };

        self.lookup(&stem, tag)
            .map(|(ps, rating)| (self.suffix_ing(&ps), rating))
    }

    fn suffix_ing(&self, stem: &str) -> String {
        let chars: Vec<char> = stem.chars().collect();
        if self.british {
            if let Some(&last) = chars.last() {
                // Linking r after a final schwa or long vowel.
                if "əː".contains(last) {
                    return format!("{stem}ɹɪŋ");
                }
            }
        } else if chars.len() > 1 {
            let last = chars[chars.len() - 1];
            let second_last = chars[chars.len() - 2];
            if last == 't' && "AIOWYiuæɑəɚɛɪɹʊʌ".contains(second_last) {
                let base: String = chars[..chars.len() - 1].iter().collect();
                return format!("{base}ɾɪŋ");
            }
        }
        format!("{stem}ɪŋ")
    }
}

/// Check for a doubled consonant before -ing (e.g. "running").
fn ends_with_doubled_consonant(word: &str) -> bool {
    if word.ends_with("cking") {
        return true;
    }
    let chars: Vec<char> = word.chars().collect();
    if !word.ends_with("ing") || chars.len() < 5 {
        return false;
    }
    let c1 = chars[chars.len() - 5];
    let c2 = chars[chars.len() - 4];
    c1 == c2
        && matches!(
            c1,
            'b' | 'c' | 'd' | 'g' | 'k' | 'l' | 'm' | 'n' | 'p' | 'r' | 's' | 't' | 'v' | 'x' | 'z'
        )
}

/// Adjust stress markers on a pronunciation.
///
/// Levels: below -1 strips all stress; -1 (or 0 on an already-stressed
/// pronunciation) demotes primary to secondary; 0 and 1 add secondary stress
/// to an unstressed pronunciation; 1 promotes secondary to primary; above 1
/// adds primary stress to an unstressed pronunciation.
pub fn apply_stress(phonemes: &str, stress: Option<i8>) -> String {
    let Some(stress) = stress else {
        return phonemes.to_string();
    };

    let has_primary = phonemes.contains(PRIMARY_STRESS);
    let has_secondary = phonemes.contains(SECONDARY_STRESS);
    let has_vowel = phonemes.chars().any(|c| VOWELS.contains(c));

    if stress < -1 {
        phonemes
            .chars()
            .filter(|&c| c != PRIMARY_STRESS && c != SECONDARY_STRESS)
            .collect()
    } else if stress == -1 || (stress == 0 && has_primary) {
        phonemes
            .replace(SECONDARY_STRESS, "")
            .replace(PRIMARY_STRESS, &SECONDARY_STRESS.to_string())
    } else if (stress == 0 || stress == 1) && !has_primary && !has_secondary {
        if has_vowel {
            format!("{SECONDARY_STRESS}{phonemes}")
        } else {
            phonemes.to_string()
        }
    } else if stress >= 1 && !has_primary && has_secondary {
        phonemes.replace(SECONDARY_STRESS, &PRIMARY_STRESS.to_string())
    } else if stress > 1 && !has_primary && !has_secondary {
        if has_vowel {
            format!("{PRIMARY_STRESS}{phonemes}")
        } else {
            phonemes.to_string()
        }
    } else {
        phonemes.to_string()
    }
}
