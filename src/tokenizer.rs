//! Phoneme to token ID mapping.
//!
//! The vocabulary is a fixed compile-time table; token IDs are stable across
//! process runs for a given crate version, which is the compatibility
//! contract reported by [`crate::VERSION`].

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Maximum number of tokens in one sequence, excluding the two pads.
pub const MAX_TOKENS: usize = 510;

/// Padding token, emitted at both sentence edges.
pub const PAD_TOKEN: i64 = 0;

/// Reserved token substituted for a phoneme outside the vocabulary. Reaching
/// it means an upstream stage violated the inventory invariant; conversion
/// degrades instead of failing.
pub const UNK_TOKEN: i64 = 7;

/// Phoneme/marker vocabulary. IDs are part of the public contract and must
/// never be renumbered; new symbols take unused IDs.
const VOCAB_TABLE: &[(char, i64)] = &[
    // Punctuation and boundaries
    (';', 1),
    (':', 2),
    (',', 3),
    ('.', 4),
    ('!', 5),
    ('?', 6),
    ('—', 9),
    ('…', 10),
    ('"', 11),
    ('(', 12),
    (')', 13),
    ('“', 14),
    ('”', 15),
    (' ', 16),
    ('\u{0303}', 17), // combining tilde (nasalization)
    // Affricate ligatures
    ('ʣ', 18),
    ('ʥ', 19),
    ('ʦ', 20),
    ('ʨ', 21),
    ('ᵝ', 22),
    ('\u{AB67}', 23),
    // Diphthong shorthand (uppercase letters)
    ('A', 24), // eɪ
    ('I', 25), // aɪ
    ('O', 31), // oʊ (American)
    ('Q', 33), // əʊ (British)
    ('S', 35),
    ('T', 36),
    ('W', 39), // aʊ
    ('Y', 41), // ɔɪ
    ('ᵊ', 42), // syllabic schwa
    // Lowercase letters
    ('a', 43),
    ('b', 44),
    ('c', 45),
    ('d', 46),
    ('e', 47),
    ('f', 48),
    ('h', 50),
    ('i', 51),
    ('j', 52),
    ('k', 53),
    ('l', 54),
    ('m', 55),
    ('n', 56),
    ('o', 57),
    ('p', 58),
    ('q', 59),
    ('r', 60),
    ('s', 61),
    ('t', 62),
    ('u', 63),
    ('v', 64),
    ('w', 65),
    ('x', 66),
    ('y', 67),
    ('z', 68),
    // IPA
    ('ɑ', 69),
    ('ɐ', 70),
    ('ɒ', 71),
    ('æ', 72),
    ('β', 75),
    ('ɔ', 76),
    ('ɕ', 77),
    ('ç', 78),
    ('ɖ', 80),
    ('ð', 81),
    ('ʤ', 82),
    ('ə', 83),
    ('ɚ', 85),
    ('ɛ', 86),
    ('ɜ', 87),
    ('ɟ', 90),
    ('ɡ', 92),
    ('ɥ', 99),
    ('ɨ', 101),
    ('ɪ', 102),
    ('ʝ', 103),
    ('ɯ', 110),
    ('ɰ', 111),
    ('ŋ', 112),
    ('ɳ', 113),
    ('ɲ', 114),
    ('ɴ', 115),
    ('ø', 116),
    ('ɸ', 118),
    ('θ', 119),
    ('œ', 120),
    ('ɹ', 123),
    ('ɾ', 125),
    ('ɻ', 126),
    ('ʁ', 128),
    ('ɽ', 129),
    ('ʂ', 130),
    ('ʃ', 131),
    ('ʈ', 132),
    ('ʧ', 133),
    ('ʊ', 135),
    ('ʋ', 136),
    ('ʌ', 138),
    ('ɣ', 139),
    ('ɤ', 140),
    ('χ', 142),
    ('ʎ', 143),
    ('ʒ', 147),
    ('ʔ', 148),
    // Stress and length
    ('ˈ', 156),
    ('ˌ', 157),
    ('ː', 158),
    // Secondary articulations
    ('ʰ', 162),
    ('ʲ', 164),
    // Intonation
    ('↓', 169),
    ('→', 171),
    ('↗', 172),
    ('↘', 173),
    // American reduced vowel
    ('ᵻ', 177),
];

static VOCAB: Lazy<HashMap<char, i64>> = Lazy::new(|| VOCAB_TABLE.iter().copied().collect());

static ID_TO_CHAR: Lazy<HashMap<i64, char>> =
    Lazy::new(|| VOCAB_TABLE.iter().map(|&(c, id)| (id, c)).collect());

#[inline]
pub fn phoneme_to_id(phoneme: char) -> Option<i64> {
    VOCAB.get(&phoneme).copied()
}

#[inline]
pub fn id_to_phoneme(id: i64) -> Option<char> {
    ID_TO_CHAR.get(&id).copied()
}

/// Whether a character belongs to the vocabulary.
#[inline]
pub fn is_valid_phoneme(c: char) -> bool {
    VOCAB.contains_key(&c)
}

/// All vocabulary characters, ordered by token ID.
pub fn vocabulary() -> Vec<char> {
    let mut entries: Vec<(char, i64)> = VOCAB_TABLE.to_vec();
    entries.sort_by_key(|&(_, id)| id);
    entries.into_iter().map(|(c, _)| c).collect()
}

/// Convert a phoneme string to token IDs, padded at both sentence edges.
///
/// An empty phoneme string encodes to an empty, still-valid buffer. A
/// character outside the vocabulary is an internal-consistency defect: it is
/// logged and replaced with [`UNK_TOKEN`] rather than aborting the call.
pub fn phonemes_to_tokens(phonemes: &str) -> Vec<i64> {
    if phonemes.is_empty() {
        return Vec::new();
    }

    let mut tokens = Vec::with_capacity(phonemes.chars().count() + 2);
    tokens.push(PAD_TOKEN);
    for c in phonemes.chars() {
        match phoneme_to_id(c) {
            Some(id) => tokens.push(id),
            None => {
                tracing::warn!(
                    phoneme = %c,
                    codepoint = c as u32,
                    "phoneme outside vocabulary, substituting unknown token"
                );
                tokens.push(UNK_TOKEN);
            }
        }
    }
    tokens.push(PAD_TOKEN);

    if tokens.len() > MAX_TOKENS + 2 {
        tokens.truncate(MAX_TOKENS + 1);
        tokens.push(PAD_TOKEN);
    }

    tokens
}

/// Convert token IDs back to a phoneme string, skipping structural markers.
pub fn tokens_to_phonemes(tokens: &[i64]) -> String {
    tokens
        .iter()
        .filter(|&&id| id != PAD_TOKEN && id != UNK_TOKEN)
        .filter_map(|&id| id_to_phoneme(id))
        .collect()
}
