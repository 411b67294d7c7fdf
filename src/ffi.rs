//! C boundary for language bindings.
//!
//! Owned buffers convert to raw parts here and nowhere else. Each successful
//! acquisition has exactly one matching release; the error signal (null
//! handle) is distinguishable from the empty-but-valid result. A conversion
//! call is never fatal to the process: panics are caught at the edge and
//! yield the empty result.

use std::ffi::{CStr, CString, c_char};
use std::panic::{AssertUnwindSafe, catch_unwind};

use once_cell::sync::Lazy;

use crate::g2p;
use crate::language::Language;

/// Token buffer handed across the C boundary. Release with
/// [`graphon_free_tokens`], passing the triple back unchanged.
#[repr(C)]
pub struct TokenArray {
    pub data: *mut i64,
    pub len: usize,
    pub capacity: usize,
}

impl TokenArray {
    fn from_vec(mut tokens: Vec<i64>) -> Self {
        let array = TokenArray {
            data: tokens.as_mut_ptr(),
            len: tokens.len(),
            capacity: tokens.capacity(),
        };
        std::mem::forget(tokens);
        array
    }

    /// The InvalidInput signal: a null handle, distinguishable from an
    /// empty-but-valid buffer.
    fn invalid() -> Self {
        TokenArray {
            data: std::ptr::null_mut(),
            len: 0,
            capacity: 0,
        }
    }
}

unsafe fn language_arg(language: *const c_char) -> Language {
    if language.is_null() {
        return Language::default();
    }
    match unsafe { CStr::from_ptr(language) }.to_str() {
        Ok(code) => Language::from_code(code),
        Err(_) => Language::default(),
    }
}

/// Convert text to phoneme token IDs.
///
/// # Safety
///
/// `text` must be a null-terminated string; `language` may be null. The
/// returned buffer must be released exactly once with
/// [`graphon_free_tokens`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn graphon_text_to_tokens(
    text: *const c_char,
    language: *const c_char,
) -> TokenArray {
    if text.is_null() {
        return TokenArray::invalid();
    }
    let bytes = unsafe { CStr::from_ptr(text) }.to_bytes();
    let language = unsafe { language_arg(language) };

    match catch_unwind(AssertUnwindSafe(|| {
        g2p::bytes_to_tokens(bytes, language.code())
    })) {
        Ok(Ok(tokens)) => TokenArray::from_vec(tokens),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "conversion rejected input");
            TokenArray::invalid()
        }
        Err(_) => TokenArray::from_vec(Vec::new()),
    }
}

/// Release a buffer returned by [`graphon_text_to_tokens`].
///
/// # Safety
///
/// `array` must be exactly as returned, released at most once.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn graphon_free_tokens(array: TokenArray) {
    if !array.data.is_null() {
        drop(unsafe { Vec::from_raw_parts(array.data, array.len, array.capacity) });
    }
}

/// Convert text to a phoneme string.
///
/// # Safety
///
/// `text` must be a null-terminated string; `language` may be null. Returns
/// null on invalid input. A non-null result must be released exactly once
/// with [`graphon_free_string`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn graphon_text_to_phonemes(
    text: *const c_char,
    language: *const c_char,
) -> *mut c_char {
    if text.is_null() {
        return std::ptr::null_mut();
    }
    let bytes = unsafe { CStr::from_ptr(text) }.to_bytes();
    let language = unsafe { language_arg(language) };

    let phonemes = match catch_unwind(AssertUnwindSafe(|| {
        g2p::bytes_to_phonemes(bytes, language.code())
    })) {
        Ok(Ok(phonemes)) => phonemes,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "conversion rejected input");
            return std::ptr::null_mut();
        }
        Err(_) => String::new(),
    };

    match CString::new(phonemes) {
        Ok(s) => s.into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Release a string returned by [`graphon_text_to_phonemes`].
///
/// # Safety
///
/// `s` must be exactly as returned, released at most once.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn graphon_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

/// Engine and vocabulary version. The returned pointer is static: valid for
/// the process lifetime, never freed by the caller.
#[unsafe(no_mangle)]
pub extern "C" fn graphon_version() -> *const c_char {
    static VERSION_CSTR: Lazy<CString> =
        Lazy::new(|| CString::new(crate::VERSION).unwrap_or_default());
    VERSION_CSTR.as_ptr()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::PAD_TOKEN;
    use std::ffi::CString;

    #[test]
    fn tokens_cross_the_boundary_and_release() {
        let text = CString::new("Hello, world!").unwrap();
        let lang = CString::new("en-us").unwrap();
        let array = unsafe { graphon_text_to_tokens(text.as_ptr(), lang.as_ptr()) };
        assert!(!array.data.is_null());
        assert!(array.len > 2);
        let tokens = unsafe { std::slice::from_raw_parts(array.data, array.len) };
        assert_eq!(tokens[0], PAD_TOKEN);
        assert_eq!(tokens[array.len - 1], PAD_TOKEN);
        unsafe { graphon_free_tokens(array) };
    }

    #[test]
    fn null_language_means_default() {
        let text = CString::new("hello").unwrap();
        let lang = CString::new("en-us").unwrap();
        let with_lang = unsafe { graphon_text_to_tokens(text.as_ptr(), lang.as_ptr()) };
        let without = unsafe { graphon_text_to_tokens(text.as_ptr(), std::ptr::null()) };
        let a = unsafe { std::slice::from_raw_parts(with_lang.data, with_lang.len) }.to_vec();
        let b = unsafe { std::slice::from_raw_parts(without.data, without.len) }.to_vec();
        assert_eq!(a, b);
        unsafe {
            graphon_free_tokens(with_lang);
            graphon_free_tokens(without);
        }
    }

    #[test]
    fn null_text_is_the_error_signal() {
        let array = unsafe { graphon_text_to_tokens(std::ptr::null(), std::ptr::null()) };
        assert!(array.data.is_null());
        assert_eq!(array.len, 0);
        // Releasing the error signal is a no-op, not a crash.
        unsafe { graphon_free_tokens(array) };

        let s = unsafe { graphon_text_to_phonemes(std::ptr::null(), std::ptr::null()) };
        assert!(s.is_null());
        unsafe { graphon_free_string(s) };
    }

    #[test]
    fn invalid_utf8_is_the_error_signal() {
        let bytes = CString::new(vec![0xffu8, 0xfe, 0xfd]).unwrap();
        let array = unsafe { graphon_text_to_tokens(bytes.as_ptr(), std::ptr::null()) };
        assert!(array.data.is_null());
        let s = unsafe { graphon_text_to_phonemes(bytes.as_ptr(), std::ptr::null()) };
        assert!(s.is_null());
    }

    #[test]
    fn empty_text_yields_a_valid_empty_buffer() {
        let text = CString::new("").unwrap();
        let array = unsafe { graphon_text_to_tokens(text.as_ptr(), std::ptr::null()) };
        assert!(!array.data.is_null(), "empty result still has a handle");
        assert_eq!(array.len, 0);
        unsafe { graphon_free_tokens(array) };
    }

    #[test]
    fn phoneme_string_crosses_the_boundary() {
        let text = CString::new("hello").unwrap();
        let lang = CString::new("en-us").unwrap();
        let s = unsafe { graphon_text_to_phonemes(text.as_ptr(), lang.as_ptr()) };
        assert!(!s.is_null());
        let phonemes = unsafe { CStr::from_ptr(s) }.to_str().unwrap().to_string();
        assert!(!phonemes.is_empty());
        unsafe { graphon_free_string(s) };
    }

    #[test]
    fn version_is_static_and_matches_the_crate() {
        let v = graphon_version();
        assert!(!v.is_null());
        assert_eq!(unsafe { CStr::from_ptr(v) }.to_str().unwrap(), crate::VERSION);
        // Stable across calls: same pointer, no ownership transfer.
        assert_eq!(v, graphon_version());
    }
}
