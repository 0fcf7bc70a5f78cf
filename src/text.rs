//! Shared text helpers: whitespace, tokens and script detection.

use std::sync::OnceLock;

use regex::Regex;

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

fn word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\w+").expect("valid regex"))
}

/// Collapse every whitespace run to one space and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    whitespace_re().replace_all(text, " ").trim().to_string()
}

/// Lower-cased `\w+` tokens, in order and with duplicates.
pub fn word_tokens(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    word_re()
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Check if a character is Hiragana, Katakana or a CJK Unified Ideograph.
pub fn is_cjk_char(c: char) -> bool {
    let code = c as u32;
    // Hiragana
    (0x3040..=0x309F).contains(&code)
    // Katakana
    || (0x30A0..=0x30FF).contains(&code)
    // CJK Unified Ideographs
    || (0x4E00..=0x9FFF).contains(&code)
}

/// True when any character of `text` is CJK. Such text is treated as
/// non-English and embedded with the multilingual model.
pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(is_cjk_char)
}

/// Check if character is from a script that doesn't use word spaces.
///
/// Wider than [`is_cjk_char`]: includes the ideograph extensions and CJK
/// punctuation. Korean uses word spaces and is not included.
pub fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    is_cjk_char(c)
    // CJK Unified Ideographs Extension A
    || (0x3400..=0x4DBF).contains(&code)
    // CJK Unified Ideographs Extension B-F
    || (0x20000..=0x2EBEF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}

/// Python-style `isupper`: at least one cased character and no lower-case one.
pub fn is_all_uppercase(text: &str) -> bool {
    let mut has_upper = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_upper = true;
        }
    }
    has_upper
}

/// First `max_chars` characters, with `"..."` appended when cut.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}
