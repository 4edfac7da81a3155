// File: src/config.rs
use serde::{Deserialize, Serialize};

/// What to do with emoji that have no explicit rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmojiMode {
    #[default]
    Remove,
    Keep,
    Convert,
}

/// Named presets. Strict forces ASCII-only output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    #[default]
    Standard,
    Strict,
}

/// The complete conversion configuration.
///
/// Always fully populated: deserializing a partial object fills the gaps from
/// [`Settings::default`], and [`Settings::merge`] is the only way to apply a
/// partial update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub emoji_mode: EmojiMode,
    pub fix_punctuation: bool,
    pub remove_hidden: bool,
    pub keep_accents: bool,
    pub preserve_code: bool,
    pub preserve_links: bool,
    // Presentation only; the converter ignores these.
    pub wrap_text: bool,
    pub markdown_preview: bool,
    pub strictness: Strictness,
}

impl Default for Settings {
    fn default() -> Self {
        Self::preset(Strictness::Standard)
    }
}

impl Settings {
    pub fn preset(level: Strictness) -> Self {
        Self {
            emoji_mode: EmojiMode::Remove,
            fix_punctuation: true,
            remove_hidden: true,
            keep_accents: level == Strictness::Standard,
            preserve_code: true,
            preserve_links: true,
            wrap_text: true,
            markdown_preview: true,
            strictness: level,
        }
    }

    /// Returns a new complete structure with every `Some` field of `patch` applied.
    pub fn merge(&self, patch: &SettingsPatch) -> Self {
        Self {
            emoji_mode: patch.emoji_mode.unwrap_or(self.emoji_mode),
            fix_punctuation: patch.fix_punctuation.unwrap_or(self.fix_punctuation),
            remove_hidden: patch.remove_hidden.unwrap_or(self.remove_hidden),
            keep_accents: patch.keep_accents.unwrap_or(self.keep_accents),
            preserve_code: patch.preserve_code.unwrap_or(self.preserve_code),
            preserve_links: patch.preserve_links.unwrap_or(self.preserve_links),
            wrap_text: patch.wrap_text.unwrap_or(self.wrap_text),
            markdown_preview: patch.markdown_preview.unwrap_or(self.markdown_preview),
            strictness: patch.strictness.unwrap_or(self.strictness),
        }
    }
}

/// A partial settings update. `None` leaves the field as it was.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    pub emoji_mode: Option<EmojiMode>,
    pub fix_punctuation: Option<bool>,
    pub remove_hidden: Option<bool>,
    pub keep_accents: Option<bool>,
    pub preserve_code: Option<bool>,
    pub preserve_links: Option<bool>,
    pub wrap_text: Option<bool>,
    pub markdown_preview: Option<bool>,
    pub strictness: Option<Strictness>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_standard_preset() {
        let s = Settings::default();
        assert_eq!(s.emoji_mode, EmojiMode::Remove);
        assert!(s.fix_punctuation && s.remove_hidden && s.keep_accents);
        assert!(s.preserve_code && s.preserve_links);
        assert_eq!(s.strictness, Strictness::Standard);
    }

    #[test]
    fn strict_preset_only_drops_accents() {
        let strict = Settings::preset(Strictness::Strict);
        let standard = Settings::default();
        assert!(!strict.keep_accents);
        assert_eq!(
            Settings {
                keep_accents: true,
                strictness: Strictness::Standard,
                ..strict
            },
            standard
        );
    }

    #[test]
    fn merge_applies_only_present_fields() {
        let base = Settings::default();
        let patch = SettingsPatch {
            emoji_mode: Some(EmojiMode::Convert),
            keep_accents: Some(false),
            ..Default::default()
        };
        let merged = base.merge(&patch);
        assert_eq!(merged.emoji_mode, EmojiMode::Convert);
        assert!(!merged.keep_accents);
        assert_eq!(merged.fix_punctuation, base.fix_punctuation);
        assert_eq!(merged.preserve_links, base.preserve_links);
    }

    #[test]
    fn partial_json_is_fully_defaulted() {
        let s: Settings = serde_json::from_str(r#"{"emojiMode":"keep"}"#).unwrap();
        assert_eq!(s.emoji_mode, EmojiMode::Keep);
        assert!(s.fix_punctuation);
        assert!(s.keep_accents);
    }
}
