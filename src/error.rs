use thiserror::Error;

/// Errors surfaced by engine construction and the conversion boundary.
///
/// Linguistic conditions (unknown words, unknown variants, ambiguous
/// pronunciations) are never errors; conversion is best-effort by
/// construction.
#[derive(Debug, Error)]
pub enum G2pError {
    /// An embedded lexicon or tagger resource failed to parse. Fatal: no
    /// engine can be built for the requested variant.
    #[error("embedded resource {name} is corrupt: {detail}")]
    Resource {
        name: &'static str,
        detail: String,
    },

    /// Input text was not valid UTF-8. Only reachable through the C
    /// boundary; Rust callers hand over `&str`.
    #[error("input text is not valid UTF-8")]
    InvalidInput,
}
