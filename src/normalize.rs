//! Text normalization: spoken-form expansion and subtokenization.
//!
//! [`expand`] rewrites numbers, currency, times, ordinals and abbreviations
//! into speakable words; [`segment`] splits the expanded text into classified
//! tokens for the lookup stages. No normalization failure is fatal:
//! unrecognized symbols pass through as single-character tokens.

use std::collections::HashMap;

use num2words::Num2Words;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use unicode_normalization::UnicodeNormalization;

use crate::token::{Token, TokenClass};

static ABBREVIATIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // Titles
        ("Mr.", "Mister"),
        ("Mrs.", "Missus"),
        ("Ms.", "Miss"),
        ("Dr.", "Doctor"),
        ("Prof.", "Professor"),
        ("Sr.", "Senior"),
        ("Jr.", "Junior"),
        ("St.", "Saint"),
        ("Gen.", "General"),
        ("Col.", "Colonel"),
        ("Lt.", "Lieutenant"),
        ("Sgt.", "Sergeant"),
        ("Capt.", "Captain"),
        ("Gov.", "Governor"),
        ("Sen.", "Senator"),
        ("Rep.", "Representative"),
        // Latinisms
        ("vs.", "versus"),
        ("etc.", "etcetera"),
        ("i.e.", "that is"),
        ("e.g.", "for example"),
        ("a.m.", "AM"),
        ("p.m.", "PM"),
        ("A.M.", "AM"),
        ("P.M.", "PM"),
        // Units
        ("ft.", "feet"),
        ("in.", "inches"),
        ("lb.", "pounds"),
        ("lbs.", "pounds"),
        ("oz.", "ounces"),
        ("gal.", "gallons"),
        ("mi.", "miles"),
        ("yd.", "yards"),
        ("sq.", "square"),
        ("hr.", "hour"),
        ("hrs.", "hours"),
        ("min.", "minute"),
        ("mins.", "minutes"),
        ("sec.", "second"),
        ("secs.", "seconds"),
    ])
});

static ABBREV_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let mut keys: Vec<&str> = ABBREVIATIONS.keys().copied().collect();
    // Longest first so "lbs." never loses to "lb.".
    keys.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    let alternation = keys
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{alternation})")).unwrap()
});

/// Currency symbol → (unit, unit plural, subunit, subunit plural).
static CURRENCIES: Lazy<HashMap<char, (&'static str, &'static str, &'static str, &'static str)>> =
    Lazy::new(|| {
        HashMap::from([
            ('$', ("dollar", "dollars", "cent", "cents")),
            ('£', ("pound", "pounds", "penny", "pence")),
            ('€', ("euro", "euros", "cent", "cents")),
            ('¥', ("yen", "yen", "sen", "sen")),
        ])
    });

static TIME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2}):(\d{2})(?::(\d{2}))?\s*(AM|PM|am|pm)?\b").unwrap()
});

static NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?P<pre>^|[^0-9A-Za-z_])(?P<cur>[$£€¥])?(?P<neg>-)?(?P<num>\d+(?:,\d{3})*(?:\.\d+)?)(?P<suf>st|nd|rd|th)?\b",
    )
    .unwrap()
});

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

fn cardinal(n: i64) -> String {
    Num2Words::new(n)
        .to_words()
        .unwrap_or_else(|_| n.to_string())
}

fn ordinal(n: i64) -> String {
    Num2Words::new(n)
        .ordinal()
        .to_words()
        .unwrap_or_else(|_| cardinal(n))
}

fn year(n: i64) -> String {
    Num2Words::new(n)
        .year()
        .to_words()
        .unwrap_or_else(|_| cardinal(n))
}

pub(crate) fn digit_word(d: char) -> String {
    d.to_digit(10)
        .map(|v| cardinal(i64::from(v)))
        .unwrap_or_default()
}

fn currency(amount: f64, negative: bool, symbol: char) -> String {
    let (unit, units, subunit, subunits) = CURRENCIES
        .get(&symbol)
        .copied()
        .unwrap_or(("dollar", "dollars", "cent", "cents"));

    let whole = amount.trunc() as i64;
    let frac = ((amount - whole as f64) * 100.0).round() as i64;

    let mut out = String::new();
    if negative {
        out.push_str("minus ");
    }
    if whole > 0 || frac == 0 {
        out.push_str(&cardinal(whole));
        out.push(' ');
        out.push_str(if whole == 1 { unit } else { units });
    }
    if frac > 0 {
        if whole > 0 {
            out.push_str(" and ");
        }
        out.push_str(&cardinal(frac));
        out.push(' ');
        out.push_str(if frac == 1 { subunit } else { subunits });
    }
    out
}

fn time_words(hours: i64, minutes: i64, seconds: Option<i64>, period: Option<&str>) -> String {
    let h12 = match hours {
        0 => 12,
        13..=23 => hours - 12,
        _ => hours,
    };

    let mut out = cardinal(h12);
    if minutes == 0 {
        if period.is_none() {
            out.push_str(" o'clock");
        }
    } else if minutes < 10 {
        out.push_str(" oh ");
        out.push_str(&cardinal(minutes));
    } else {
        out.push(' ');
        out.push_str(&cardinal(minutes));
    }

    if let Some(s) = seconds {
        if s > 0 {
            out.push_str(" and ");
            out.push_str(&cardinal(s));
            out.push_str(" seconds");
        }
    }

    if let Some(p) = period {
        out.push(' ');
        out.push_str(&p.to_uppercase());
    }

    out
}

fn expand_number(caps: &Captures) -> String {
    let pre = &caps["pre"];
    let digits: String = caps["num"].chars().filter(|c| *c != ',').collect();
    let negative = caps.name("neg").is_some();

    if let Some(cur) = caps.name("cur") {
        let symbol = cur.as_str().chars().next().unwrap_or('$');
        let amount: f64 = digits.parse().unwrap_or(0.0);
        return format!("{pre}{}", currency(amount, negative, symbol));
    }

    let spoken = if let Some(point) = digits.find('.') {
        let whole: i64 = digits[..point].parse().unwrap_or(0);
        let mut s = cardinal(whole);
        s.push_str(" point");
        for d in digits[point + 1..].chars() {
            s.push(' ');
            s.push_str(&digit_word(d));
        }
        s
    } else {
        match digits.parse::<i64>() {
            Ok(n) => {
                if caps.name("suf").is_some() {
                    ordinal(n)
                } else if !negative && (1000..=2100).contains(&n) {
                    // Standalone four-digit integers in this range read as years.
                    year(n)
                } else {
                    cardinal(n)
                }
            }
            // Too large for i64: read digit by digit.
            Err(_) => digits
                .chars()
                .map(digit_word)
                .collect::<Vec<_>>()
                .join(" "),
        }
    };

    if negative {
        format!("{pre}minus {spoken}")
    } else {
        format!("{pre}{spoken}")
    }
}

/// Rewrite the raw text into fully speakable words.
pub fn expand(text: &str) -> String {
    let mut result: String = text.nfkc().collect();

    // Curly apostrophes fold to ASCII so contractions hit the lexicon.
    result = result.replace(['’', '‘'], "'");

    result = ABBREV_PATTERN
        .replace_all(&result, |caps: &Captures| match ABBREVIATIONS.get(&caps[0]) {
            Some(expansion) => (*expansion).to_string(),
            None => caps[0].to_string(),
        })
        .to_string();

    result = TIME_PATTERN
        .replace_all(&result, |caps: &Captures| {
            let hours: i64 = caps[1].parse().unwrap_or(0);
            let minutes: i64 = caps[2].parse().unwrap_or(0);
            let seconds = caps.get(3).and_then(|m| m.as_str().parse().ok());
            let period = caps.get(4).map(|m| m.as_str());
            time_words(hours, minutes, seconds, period)
        })
        .to_string();

    result = NUMBER_PATTERN.replace_all(&result, expand_number).to_string();

    WHITESPACE.replace_all(&result, " ").trim().to_string()
}

/// Subtokenization pattern: acronym runs and camelCase humps split apart
/// (lookahead keeps the boundary letter), words keep internal apostrophes
/// and hyphens, anything else surfaces one symbol at a time.
static SUBTOKEN_PATTERN: Lazy<fancy_regex::Regex> = Lazy::new(|| {
    fancy_regex::Regex::new(
        r"(?x)
        \p{Lu}+(?=\p{Lu}\p{Ll})
        | \p{L}+?(?=\p{Lu}\p{Ll})
        | \p{L}+(?:['’-]\p{L}+)*
        | \d+(?:[.,]\d+)*
        | \S
        ",
    )
    .unwrap()
});

fn classify(piece: &str) -> TokenClass {
    let mut chars = piece.chars();
    let first = chars.next().unwrap_or(' ');
    if chars.next().is_none() && !first.is_alphanumeric() {
        TokenClass::Punctuation
    } else if first.is_ascii_digit() {
        TokenClass::Number
    } else if piece.len() >= 2
        && piece.len() <= 5
        && piece.chars().all(|c| c.is_ascii_uppercase())
    {
        TokenClass::Abbreviation
    } else {
        TokenClass::Word
    }
}

/// Split expanded text into classified tokens, tracking the whitespace that
/// followed each span.
pub fn segment(text: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut last_end = 0;

    for m in SUBTOKEN_PATTERN.find_iter(text).flatten() {
        if m.start() > last_end {
            if let Some(last) = tokens.last_mut() {
                last.whitespace = " ".to_string();
            }
        }
        let piece = m.as_str();
        tokens.push(Token::new(piece, classify(piece)));
        last_end = m.end();
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_expand_to_words() {
        let expanded = expand("I have 3 apples");
        assert!(expanded.contains("three"));
        assert!(!expanded.contains('3'));
    }

    #[test]
    fn decimals_read_digit_by_digit() {
        let expanded = expand("pi is 3.14");
        assert!(expanded.contains("three point one four"));
    }

    #[test]
    fn years_read_as_years() {
        let expanded = expand("born in 1984");
        assert!(expanded.contains("nineteen"), "got: {expanded}");
        assert!(!expanded.contains("thousand"), "got: {expanded}");
    }

    #[test]
    fn ordinals_expand() {
        let expanded = expand("the 1st and the 3rd");
        assert!(expanded.contains("first"));
        assert!(expanded.contains("third"));
    }

    #[test]
    fn currency_expands_with_subunits() {
        let expanded = expand("$123.45");
        assert!(expanded.contains("dollars"), "got: {expanded}");
        assert!(expanded.contains("and"), "got: {expanded}");
        assert!(expanded.contains("cents"), "got: {expanded}");
        assert_eq!(expand("$1"), "one dollar");
    }

    #[test]
    fn times_expand() {
        assert_eq!(expand("2:30 pm"), "two thirty PM");
        assert_eq!(expand("3:05 am"), "three oh five AM");
        assert_eq!(expand("7:00"), "seven o'clock");
    }

    #[test]
    fn abbreviations_expand_at_word_boundaries() {
        let expanded = expand("Dr. Smith vs. Mr. Jones");
        assert!(expanded.contains("Doctor"));
        assert!(expanded.contains("versus"));
        assert!(expanded.contains("Mister"));
        // "in." must not fire inside a larger word.
        assert!(expand("Berlin. Next").starts_with("Berlin."));
    }

    #[test]
    fn negative_numbers() {
        assert!(expand("-5 degrees").starts_with("minus five"));
    }

    #[test]
    fn digits_glued_to_letters_stay_put() {
        assert_eq!(expand("abc123"), "abc123");
    }

    #[test]
    fn segment_keeps_punctuation() {
        let tokens = segment("Hello, world!");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Hello", ",", "world", "!"]);
        assert_eq!(tokens[1].class, TokenClass::Punctuation);
        assert_eq!(tokens[1].whitespace, " ");
        assert_eq!(tokens[0].whitespace, "");
    }

    #[test]
    fn segment_splits_camel_case_and_acronym_runs() {
        let texts: Vec<String> = segment("JavaScript HTTPServer")
            .into_iter()
            .map(|t| t.text)
            .collect();
        assert_eq!(texts, vec!["Java", "Script", "HTTP", "Server"]);
    }

    #[test]
    fn segment_keeps_contractions_and_hyphens_whole() {
        let texts: Vec<String> = segment("don't twenty-one")
            .into_iter()
            .map(|t| t.text)
            .collect();
        assert_eq!(texts, vec!["don't", "twenty-one"]);
    }

    #[test]
    fn curly_apostrophes_fold_to_ascii() {
        assert_eq!(expand("don’t"), "don't");
    }

    #[test]
    fn segment_classifies() {
        let tokens = segment("hello 123 USA ?");
        assert_eq!(tokens[0].class, TokenClass::Word);
        assert_eq!(tokens[1].class, TokenClass::Number);
        assert_eq!(tokens[2].class, TokenClass::Abbreviation);
        assert_eq!(tokens[3].class, TokenClass::Punctuation);
    }

    #[test]
    fn unrecognized_symbols_pass_through() {
        let tokens = segment("a ❄ b");
        assert_eq!(tokens[1].text, "❄");
        assert_eq!(tokens[1].class, TokenClass::Punctuation);
    }
}
