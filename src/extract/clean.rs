// src/extract/clean.rs
// =============================================================================
// Turns raw page text into the plain, printable text the indexer stores.
//
// The steps run in a fixed order because each one changes what the next
// one sees:
// 1. decode literal escapes like \u0041 into real characters
// 2. strip escapes that are still left and any symbol outside [\w\s.,!?-]
// 3. Unicode NFKD normalization (ligatures split, accents detached)
// 4. keep only printable ASCII
// 5. collapse whitespace runs and trim
// =============================================================================

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;
use unicode_normalization::UnicodeNormalization;

// \uXXXX, \UXXXXXXXX and \xXX written out as literal text
static ESCAPE_SEQUENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\(?:u([0-9a-fA-F]{4})|U([0-9a-fA-F]{8})|x([0-9a-fA-F]{2}))")
        .expect("escape pattern is a valid regex")
});

// Escape-looking leftovers (undecodable code points) and symbol noise
static NOISE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\u[0-9a-fA-F]{4}|\\[xuU][0-9a-fA-F]{1,6}|[^\w\s.,!?-]")
        .expect("noise pattern is a valid regex")
});

// Footer phrases that add nothing to a documentation index
static BOILERPLATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:contact us|subscribe|related articles|privacy policy|terms of service|copyright|all rights reserved)\b",
    )
    .expect("boilerplate pattern is a valid regex")
});

/// Cleans extracted page text. See the module header for the exact steps.
///
/// Example:
///   `"Hello\u0041   World! ©"` -> `"HelloA World!"`
pub fn clean_text(raw: &str) -> String {
    let decoded = decode_escapes(raw);
    let denoised = NOISE.replace_all(&decoded, "");
    let printable: String = denoised.nfkd().filter(|c| is_printable(*c)).collect();
    collapse_whitespace(&printable)
}

/// Removes boilerplate phrases ("privacy policy", "subscribe", ...) from
/// already-cleaned text.
pub fn strip_boilerplate(text: &str) -> String {
    collapse_whitespace(&BOILERPLATE.replace_all(text, " "))
}

/// Collapses every whitespace run into one space and trims both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// Escapes naming an invalid code point (lone surrogates) stay literal so
// the noise pass removes them
fn decode_escapes(text: &str) -> Cow<'_, str> {
    ESCAPE_SEQUENCE.replace_all(text, |caps: &Captures| {
        let hex = caps
            .get(1)
            .or_else(|| caps.get(2))
            .or_else(|| caps.get(3))
            .map(|m| m.as_str())
            .unwrap_or_default();

        u32::from_str_radix(hex, 16)
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    })
}

// Printable ASCII: graphic characters plus ASCII whitespace
fn is_printable(c: char) -> bool {
    c.is_ascii_graphic() || matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}
