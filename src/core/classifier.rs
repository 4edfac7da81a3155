// File: src/core/classifier.rs
//! Category decisions for single characters that no explicit rule covers.

use crate::core::types::Category;

/// Category and human label for a flagged character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub category: Category,
    pub label: &'static str,
}

impl Classification {
    const fn new(category: Category, label: &'static str) -> Self {
        Self { category, label }
    }
}

const HIDDEN_RANGES: &[(u32, u32)] = &[
    (0x200B, 0x200F),
    (0x00AD, 0x00AD),
    (0xFEFF, 0xFEFF),
    (0x2060, 0x2064),
    (0x180E, 0x180E),
    (0x034F, 0x034F),
    (0x061C, 0x061C),
    (0x2066, 0x2069),
    (0x202A, 0x202E),
];

const EMOJI_RANGES: &[(u32, u32)] = &[
    (0x1F600, 0x1F64F), // emoticons
    (0x1F300, 0x1F5FF), // symbols & pictographs
    (0x1F680, 0x1F6FF), // transport & map
    (0x1F1E0, 0x1F1FF), // regional indicators (flags)
    (0x2600, 0x26FF),   // misc symbols
    (0x2700, 0x27BF),   // dingbats
    (0x1F900, 0x1F9FF), // supplemental symbols & pictographs
    (0x1FA00, 0x1FA6F),
    (0x1FA70, 0x1FAFF),
    (0xFE00, 0xFE0F), // variation selectors
    (0x20E3, 0x20E3), // combining enclosing keycap
    (0x231A, 0x231B),
    (0x23E9, 0x23F3),
    (0x23F8, 0x23FA),
    (0x25AA, 0x25AB),
    (0x25B6, 0x25B6),
    (0x25C0, 0x25C0),
    (0x25FB, 0x25FE),
];

fn in_ranges(ch: char, ranges: &[(u32, u32)]) -> bool {
    let code = ch as u32;
    ranges.iter().any(|&(lo, hi)| code >= lo && code <= hi)
}

/// Printable ASCII or tab / newline / carriage return.
pub fn is_ascii_safe(ch: char) -> bool {
    matches!(ch, ' '..='~' | '\t' | '\n' | '\r')
}

pub fn is_hidden(ch: char) -> bool {
    in_ranges(ch, HIDDEN_RANGES)
}

pub fn is_emoji(ch: char) -> bool {
    in_ranges(ch, EMOJI_RANGES)
}

/// Latin-1 Supplement letters (minus `×` and `÷`), Latin Extended-A/B and
/// Latin Extended Additional.
pub fn is_accented_latin(ch: char) -> bool {
    let code = ch as u32;
    ((0x00C0..=0x00FF).contains(&code) && code != 0x00D7 && code != 0x00F7)
        || (0x0100..=0x024F).contains(&code)
        || (0x1E00..=0x1EFF).contains(&code)
}

/// Combining Diacritical Marks block.
pub fn is_combining_mark(ch: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&ch)
}

pub fn is_accent(ch: char) -> bool {
    is_accented_latin(ch) || is_combining_mark(ch)
}

/// Sub-label for characters that land in [`Category::Other`]. Cosmetic only.
fn other_label(code: u32) -> &'static str {
    match code {
        0x0000..=0x001F | 0x007F..=0x009F => "Control character",
        0x0370..=0x03FF => "Greek character",
        0x0400..=0x04FF => "Cyrillic character",
        0x0600..=0x06FF => "Arabic character",
        0x0900..=0x097F => "Devanagari character",
        0x4E00..=0x9FFF | 0x3400..=0x4DBF | 0xF900..=0xFAFF => "CJK character",
        0x2190..=0x21FF | 0x27F0..=0x27FF | 0x2900..=0x297F | 0x2B00..=0x2BFF => "Arrow symbol",
        0x2200..=0x22FF | 0x2100..=0x214F | 0x2300..=0x23FF => "Math/symbol",
        0x20A0..=0x20CF => "Currency symbol",
        0x2500..=0x25FF => "Box/geometric symbol",
        _ => "Non-ASCII character",
    }
}

/// Classifies `ch`, or returns `None` for ASCII-safe characters.
pub fn classify(ch: char) -> Option<Classification> {
    if is_ascii_safe(ch) {
        return None;
    }
    if is_hidden(ch) {
        return Some(Classification::new(Category::Hidden, "Hidden character"));
    }
    if is_emoji(ch) {
        return Some(Classification::new(Category::Emoji, "Emoji"));
    }
    if is_accent(ch) {
        return Some(Classification::new(Category::Accent, "Accent simplified"));
    }
    let code = ch as u32;
    if (0x2000..=0x206F).contains(&code) {
        return Some(Classification::new(Category::Punctuation, "Typographic symbol"));
    }
    Some(Classification::new(Category::Other, other_label(code)))
}

/// Renders invisible characters as `[U+XXXX]` so they show up in listings.
pub fn display_char(s: &str) -> String {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if (ch as u32) < 0x20 || is_hidden(ch) => {
            format!("[U+{:04X}]", ch as u32)
        }
        _ => s.to_string(),
    }
}
