// File: src/core/transliterate.rs
//! Best-effort single-character transliteration to ASCII.
//!
//! The seeded table covers the common Western cleanup cases: Latin letters
//! without a canonical decomposition, ligatures, typographic symbols, arrows,
//! math, currency, box drawing, Greek, Cyrillic and a handful of popular
//! emoji. Everything else goes through NFKD with combining marks dropped.
//! Coverage is not exhaustive; unmapped characters return `None`.

use crate::core::classifier::is_hidden;
use unicode_normalization::char::{decompose_compatible, is_combining_mark};

/// Maps one character to an ASCII approximation.
///
/// `None` means "no mapping": callers keep the character as it is.
pub trait Transliterator {
    fn transliterate(&self, ch: char) -> Option<String>;
}

impl<F> Transliterator for F
where
    F: Fn(char) -> Option<String>,
{
    fn transliterate(&self, ch: char) -> Option<String> {
        self(ch)
    }
}

/// The default transliterator: seeded table first, then NFKD.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeededTransliterator;

impl SeededTransliterator {
    pub fn new() -> Self {
        Self
    }
}

impl Transliterator for SeededTransliterator {
    fn transliterate(&self, ch: char) -> Option<String> {
        if ch.is_ascii() || is_hidden(ch) {
            return None;
        }
        if let Some(mapped) = seeded(ch) {
            return Some(mapped);
        }

        let mut out = String::new();
        let mut complete = true;
        decompose_compatible(ch, |c| {
            if c.is_ascii() {
                out.push(c);
            } else if is_combining_mark(c) {
                // dropped
            } else if let Some(mapped) = seeded(c) {
                out.push_str(&mapped);
            } else {
                complete = false;
            }
        });

        if !complete || (out.is_empty() && !is_combining_mark(ch)) {
            return None;
        }
        Some(out)
    }
}

fn seeded(ch: char) -> Option<String> {
    if let Some(s) = symbol(ch).or_else(|| latin(ch)).or_else(|| emoji(ch)) {
        return Some(s.to_string());
    }
    if let Some(letter) = regional_indicator(ch) {
        return Some(letter.to_string());
    }
    script_letter(ch)
}

fn latin(ch: char) -> Option<&'static str> {
    Some(match ch {
        'æ' => "ae",
        'Æ' => "AE",
        'ø' => "o",
        'Ø' => "O",
        'ß' => "ss",
        'ẞ' => "SS",
        'œ' => "oe",
        'Œ' => "OE",
        'đ' | 'ð' => "d",
        'Đ' | 'Ð' => "D",
        'þ' => "th",
        'Þ' => "Th",
        'ł' => "l",
        'Ł' => "L",
        'ħ' => "h",
        'Ħ' => "H",
        'ı' => "i",
        'ĸ' => "k",
        'ŋ' => "ng",
        'Ŋ' => "NG",
        'ſ' => "s",
        'ŧ' => "t",
        'Ŧ' => "T",
        'ƒ' => "f",
        'µ' => "u",
        _ => return None,
    })
}

fn symbol(ch: char) -> Option<&'static str> {
    Some(match ch {
        // Punctuation and spacing marks. Smart quotes and dashes land here
        // only when no punctuation rule applies.
        '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2015}' => "-",
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' => "'",
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' => "\"",
        '\u{2039}' => "<",
        '\u{203A}' => ">",
        '\u{00AB}' => "<<",
        '\u{00BB}' => ">>",
        '\u{2022}' => "*",
        '\u{2023}' => ">",
        '\u{2027}' | '\u{2043}' | '\u{2212}' => "-",
        '\u{00B7}' => ".",
        '\u{2032}' | '\u{02BC}' | '\u{02B9}' | '\u{00B4}' => "'",
        '\u{2033}' | '\u{00A8}' => "\"",
        '\u{2034}' => "'''",
        '\u{2030}' => "%0",
        '\u{2020}' => "+",
        '\u{2021}' => "++",
        '\u{2044}' => "/",
        '\u{203D}' => "?!",
        '\u{2016}' => "||",
        '\u{00B8}' => ",",
        '\u{00AF}' => "-",
        '\u{02DC}' => "~",
        '\u{02C6}' => "^",
        '\u{00A1}' => "!",
        '\u{00BF}' => "?",
        '\u{00A7}' => "S",
        '\u{00B6}' => "P",
        '\u{3001}' => ",",
        '\u{3002}' => ".",
        // Signs
        '\u{00A9}' => "(c)",
        '\u{00AE}' => "(r)",
        '\u{2117}' => "(p)",
        '\u{00B0}' => "deg",
        '\u{00B1}' => "+-",
        '\u{00D7}' => "x",
        '\u{00F7}' => "/",
        '\u{00AC}' => "!",
        // Currency
        '\u{00A2}' => "c",
        '\u{00A3}' => "GBP",
        '\u{00A5}' => "JPY",
        '\u{20AC}' => "EUR",
        '\u{20B9}' => "INR",
        '\u{20BD}' => "RUB",
        '\u{20A9}' => "KRW",
        '\u{20BF}' => "BTC",
        // Arrows
        '←' => "<-",
        '→' => "->",
        '↑' => "^",
        '↓' => "v",
        '↔' => "<->",
        '⇐' => "<=",
        '⇒' => "=>",
        '⇔' => "<=>",
        '⟵' => "<--",
        '⟶' => "-->",
        // Math
        '≤' => "<=",
        '≥' => ">=",
        '≠' => "!=",
        '≈' => "~=",
        '≡' => "==",
        '∞' => "inf",
        '√' => "sqrt",
        '∑' => "sum",
        '∗' => "*",
        '∙' | '⋅' => ".",
        '∘' => "o",
        '∼' => "~",
        '∧' => "^",
        '∨' => "v",
        // Box drawing and shapes
        '─' | '━' | '┄' | '┈' => "-",
        '│' | '┃' | '┆' | '┊' | '║' => "|",
        '═' => "=",
        '┌' | '┐' | '└' | '┘' | '├' | '┤' | '┬' | '┴' | '┼' | '╔' | '╗' | '╚' | '╝' | '╠'
        | '╣' | '╦' | '╩' | '╬' => "+",
        '■' => "#",
        '●' | '◆' => "*",
        '○' => "o",
        '▲' => "^",
        '▼' => "v",
        _ => return None,
    })
}

fn emoji(ch: char) -> Option<&'static str> {
    Some(match ch {
        '😀' => ":grinning:",
        '😃' => ":smiley:",
        '😄' => ":smile:",
        '😁' => ":grin:",
        '😆' => ":laughing:",
        '😅' => ":sweat_smile:",
        '😂' => ":joy:",
        '🙂' => ":slightly_smiling_face:",
        '😉' => ":wink:",
        '😊' => ":blush:",
        '😍' => ":heart_eyes:",
        '😘' => ":kissing_heart:",
        '😎' => ":sunglasses:",
        '🤔' => ":thinking:",
        '😐' => ":neutral_face:",
        '😢' => ":cry:",
        '😭' => ":sob:",
        '😡' => ":rage:",
        '😱' => ":scream:",
        '👍' => ":+1:",
        '👎' => ":-1:",
        '👏' => ":clap:",
        '🙏' => ":pray:",
        '👋' => ":wave:",
        '💪' => ":muscle:",
        '🎉' => ":tada:",
        '🔥' => ":fire:",
        '✨' => ":sparkles:",
        '❤' => ":heart:",
        '💯' => ":100:",
        '✅' => ":white_check_mark:",
        '✔' => ":heavy_check_mark:",
        '❌' => ":x:",
        '⚠' => ":warning:",
        '🚀' => ":rocket:",
        '💡' => ":bulb:",
        '📌' => ":pushpin:",
        '📝' => ":memo:",
        '🐛' => ":bug:",
        '☀' => ":sunny:",
        _ => return None,
    })
}

fn regional_indicator(ch: char) -> Option<char> {
    let code = ch as u32;
    if (0x1F1E6..=0x1F1FF).contains(&code) {
        char::from_u32(u32::from(b'A') + (code - 0x1F1E6))
    } else {
        None
    }
}

fn greek(lower: char) -> Option<&'static str> {
    Some(match lower {
        'α' => "a",
        'β' => "b",
        'γ' => "g",
        'δ' => "d",
        'ε' => "e",
        'ζ' => "z",
        'η' => "e",
        'θ' => "th",
        'ι' => "i",
        'κ' => "k",
        'λ' => "l",
        'μ' => "m",
        'ν' => "n",
        'ξ' => "x",
        'ο' => "o",
        'π' => "p",
        'ρ' => "r",
        'σ' | 'ς' => "s",
        'τ' => "t",
        'υ' => "y",
        'φ' => "f",
        'χ' => "ch",
        'ψ' => "ps",
        'ω' => "o",
        _ => return None,
    })
}

fn cyrillic(lower: char) -> Option<&'static str> {
    Some(match lower {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "y",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "kh",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "shch",
        'ъ' | 'ь' => "",
        'ы' => "y",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    })
}

/// Greek and Cyrillic letters; capitals map to a capitalized lowercase form.
fn script_letter(ch: char) -> Option<String> {
    let mut lowered = ch.to_lowercase();
    let lower = lowered.next()?;
    if lowered.next().is_some() {
        return None;
    }
    let base = greek(lower).or_else(|| cyrillic(lower))?;
    if lower == ch {
        return Some(base.to_string());
    }
    let mut chars = base.chars();
    Some(match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    })
}
