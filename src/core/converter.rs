// src/core/converter.rs
use crate::config::{EmojiMode, Settings};
use crate::core::classifier::{classify, is_accent, is_ascii_safe, is_emoji};
use crate::core::protect::ProtectedRanges;
use crate::core::rules::RuleTable;
use crate::core::transliterate::{SeededTransliterator, Transliterator};
use crate::core::types::{Category, ChangeLogEntry, ConversionResult, Rule, Span};
use log::debug;
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

pub const EMOJI_REMOVED_LABEL: &str = "Emoji removed";
pub const EMOJI_CONVERTED_LABEL: &str = "Emoji converted";

/// What the pipeline decided for one character.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Replacement<'a> {
    text: Cow<'a, str>,
    label: Cow<'a, str>,
    category: Category,
}

/// Deduplicating change-log accumulator keyed by `(original, replacement, skipped)`.
#[derive(Default)]
struct ChangeLog {
    index: HashMap<(char, String, bool), usize>,
    entries: Vec<ChangeLogEntry>,
}

impl ChangeLog {
    fn record(&mut self, original: char, replacement: &Replacement<'_>, skipped: bool, input: Span, output: Span) {
        let key = (original, replacement.text.to_string(), skipped);
        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => {
                self.entries.push(ChangeLogEntry {
                    original: original.to_string(),
                    replacement: key.1.clone(),
                    label: replacement.label.to_string(),
                    category: replacement.category,
                    count: 0,
                    skipped,
                    input_positions: Vec::new(),
                    output_positions: Vec::new(),
                });
                self.index.insert(key, self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        let entry = &mut self.entries[slot];
        entry.count += 1;
        entry.input_positions.push(input);
        if !output.is_empty() {
            entry.output_positions.push(output);
        }
    }

    /// Active entries first, then skipped; each group by descending count.
    /// Ties keep first-seen order.
    fn finish(mut self) -> (Vec<ChangeLogEntry>, usize) {
        self.entries
            .sort_by_key(|e| (e.skipped, std::cmp::Reverse(e.count)));
        let total = self
            .entries
            .iter()
            .filter(|e| !e.skipped)
            .map(|e| e.count)
            .sum();
        (self.entries, total)
    }
}

/// One conversion pass over a consistent snapshot of settings, rules and skip set.
pub struct Converter<'a, T: Transliterator = SeededTransliterator> {
    settings: Settings,
    table: RuleTable<'a>,
    skipped: &'a HashSet<String>,
    transliterator: T,
}

impl<'a> Converter<'a, SeededTransliterator> {
    pub fn new(settings: &Settings, rules: &'a [Rule], skipped: &'a HashSet<String>) -> Self {
        Self {
            settings: *settings,
            table: RuleTable::build(rules, settings),
            skipped,
            transliterator: SeededTransliterator,
        }
    }
}

impl<'a, T: Transliterator> Converter<'a, T> {
    /// Swaps the fallback transliterator.
    pub fn with_transliterator<U: Transliterator>(self, transliterator: U) -> Converter<'a, U> {
        Converter {
            settings: self.settings,
            table: self.table,
            skipped: self.skipped,
            transliterator,
        }
    }

    fn is_skipped(&self, ch: char) -> bool {
        let mut buf = [0u8; 4];
        self.skipped.contains(&*ch.encode_utf8(&mut buf))
    }

    /// Resolution shared by active and skipped characters:
    /// rule, then emoji mode, then accent policy, then transliteration.
    fn resolve(&self, ch: char) -> Option<Replacement<'a>> {
        if let Some(rule) = self.table.lookup_char(ch) {
            return Some(Replacement {
                text: Cow::Borrowed(rule.replace.as_str()),
                label: Cow::Borrowed(rule.label.as_str()),
                category: rule.category,
            });
        }

        if is_emoji(ch) {
            return match self.settings.emoji_mode {
                EmojiMode::Keep => None,
                EmojiMode::Remove => Some(Replacement {
                    text: Cow::Borrowed(""),
                    label: Cow::Borrowed(EMOJI_REMOVED_LABEL),
                    category: Category::Emoji,
                }),
                EmojiMode::Convert => Some(Replacement {
                    text: Cow::Owned(self.transliterator.transliterate(ch).unwrap_or_default()),
                    label: Cow::Borrowed(EMOJI_CONVERTED_LABEL),
                    category: Category::Emoji,
                }),
            };
        }

        if self.settings.keep_accents && is_accent(ch) {
            return None;
        }

        let ascii = self.transliterator.transliterate(ch)?;
        let mut buf = [0u8; 4];
        if ascii == *ch.encode_utf8(&mut buf) {
            return None;
        }
        let class = classify(ch)?;
        Some(Replacement {
            text: Cow::Owned(ascii),
            label: Cow::Borrowed(class.label),
            category: class.category,
        })
    }

    pub fn convert(&self, text: &str) -> ConversionResult {
        if text.is_empty() {
            return ConversionResult::default();
        }

        let protected = ProtectedRanges::find(
            text,
            self.settings.preserve_code,
            self.settings.preserve_links,
        );

        let mut output = String::with_capacity(text.len());
        let mut changes = ChangeLog::default();
        let mut in_pos = 0usize;
        let mut out_pos = 0usize;

        for ch in text.chars() {
            let input = Span::new(in_pos, in_pos + 1);
            in_pos += 1;

            if protected.contains(input.start) || is_ascii_safe(ch) {
                output.push(ch);
                out_pos += 1;
                continue;
            }

            if self.is_skipped(ch) {
                if let Some(would) = self.resolve(ch) {
                    changes.record(ch, &would, true, input, Span::new(out_pos, out_pos + 1));
                }
                output.push(ch);
                out_pos += 1;
                continue;
            }

            match self.resolve(ch) {
                Some(replacement) => {
                    let len = replacement.text.chars().count();
                    output.push_str(&replacement.text);
                    changes.record(ch, &replacement, false, input, Span::new(out_pos, out_pos + len));
                    out_pos += len;
                }
                None => {
                    output.push(ch);
                    out_pos += 1;
                }
            }
        }

        let (change_log, total_changes) = changes.finish();
        debug!(
            "converted {} chars -> {} chars: {} protected spans, {} entries, {} changes",
            in_pos,
            out_pos,
            protected.spans().len(),
            change_log.len(),
            total_changes
        );

        ConversionResult {
            text: output,
            change_log,
            total_changes,
        }
    }
}

/// Converts `text` with the default transliterator.
pub fn convert_text(
    text: &str,
    settings: &Settings,
    rules: &[Rule],
    skipped: &HashSet<String>,
) -> ConversionResult {
    Converter::new(settings, rules, skipped).convert(text)
}

/// Per-category tally of a change log, for one-line summaries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    pub hidden: usize,
    pub punctuation: usize,
    pub emoji: usize,
    pub accent: usize,
    pub other: usize,
    pub custom: usize,
    pub skipped: usize,
}

impl ChangeSummary {
    /// Non-zero counts as short phrases, e.g. `"3 punctuation"`, `"1 symbol"`.
    pub fn parts(&self) -> Vec<String> {
        [
            (self.hidden, "hidden"),
            (self.punctuation, "punctuation"),
            (self.emoji, "emoji"),
            (self.accent, "accent"),
            (self.other, "symbol"),
            (self.custom, "custom"),
            (self.skipped, "skipped"),
        ]
        .into_iter()
        .filter(|&(n, _)| n > 0)
        .map(|(n, name)| format!("{n} {name}"))
        .collect()
    }
}

pub fn summarize(change_log: &[ChangeLogEntry]) -> ChangeSummary {
    let mut summary = ChangeSummary::default();
    for entry in change_log {
        let slot = if entry.skipped {
            &mut summary.skipped
        } else {
            match entry.category {
                Category::Hidden => &mut summary.hidden,
                Category::Punctuation => &mut summary.punctuation,
                Category::Emoji => &mut summary.emoji,
                Category::Accent => &mut summary.accent,
                Category::Other => &mut summary.other,
                Category::Custom => &mut summary.custom,
            }
        };
        *slot += entry.count;
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rules::{default_rules, RuleSet};

    fn run(text: &str, settings: &Settings) -> ConversionResult {
        convert_text(text, settings, &default_rules(), &HashSet::new())
    }

    #[test]
    fn empty_input_short_circuits() {
        let result = run("", &Settings::default());
        assert_eq!(result, ConversionResult::default());
    }

    #[test]
    fn deletion_has_no_output_span() {
        let result = run("a\u{200B}b", &Settings::default());
        assert_eq!(result.text, "ab");
        let entry = &result.change_log[0];
        assert_eq!(entry.input_positions, vec![Span::new(1, 2)]);
        assert!(entry.output_positions.is_empty());
    }

    #[test]
    fn multi_char_replacement_spans() {
        let result = run("x\u{2026}y\u{2026}", &Settings::default());
        assert_eq!(result.text, "x...y...");
        let entry = &result.change_log[0];
        assert_eq!(entry.count, 2);
        assert_eq!(entry.input_positions, vec![Span::new(1, 2), Span::new(3, 4)]);
        assert_eq!(entry.output_positions, vec![Span::new(1, 4), Span::new(5, 8)]);
    }

    #[test]
    fn ordering_active_then_skipped_by_count() {
        let rules = default_rules();
        let skipped: HashSet<String> = ["\u{2014}".to_string()].into();
        let text = "\u{2014}\u{2014}\u{2014} \u{2026} \u{201C}\u{201C}";
        let result = convert_text(text, &Settings::default(), &rules, &skipped);
        let order: Vec<(&str, bool)> = result
            .change_log
            .iter()
            .map(|e| (e.original.as_str(), e.skipped))
            .collect();
        assert_eq!(
            order,
            vec![("\u{201C}", false), ("\u{2026}", false), ("\u{2014}", true)]
        );
        assert_eq!(result.total_changes, 3);
        assert_eq!(result.text, "\u{2014}\u{2014}\u{2014} ... \"\"");
    }

    #[test]
    fn override_shadows_default() {
        let mut set = RuleSet::with_defaults();
        set.upsert_override("\u{2014}", " - ");
        let result = convert_text("a\u{2014}b", &Settings::default(), set.rules(), &HashSet::new());
        assert_eq!(result.text, "a - b");
        assert_eq!(result.change_log[0].category, Category::Custom);
    }

    #[test]
    fn fallback_uses_classifier_label() {
        let result = run("5\u{00B0}C \u{2192}", &Settings::default());
        assert_eq!(result.text, "5degC ->");
        let arrow = result
            .change_log
            .iter()
            .find(|e| e.original == "\u{2192}")
            .unwrap();
        assert_eq!(arrow.label, "Arrow symbol");
        assert_eq!(arrow.category, Category::Other);
    }

    #[test]
    fn untransliterable_passes_through() {
        let result = run("中文", &Settings::default());
        assert_eq!(result.text, "中文");
        assert!(result.change_log.is_empty());
    }

    #[test]
    fn custom_transliterator_is_used() {
        let rules = default_rules();
        let skipped = HashSet::new();
        let settings = Settings::default();
        let converter = Converter::new(&settings, &rules, &skipped)
            .with_transliterator(|c: char| (c == '中').then(|| "zhong".to_string()));
        let result = converter.convert("中");
        assert_eq!(result.text, "zhong");
        assert_eq!(result.change_log[0].label, "CJK character");
    }

    #[test]
    fn summary_parts() {
        let rules = default_rules();
        let skipped: HashSet<String> = ["\u{2026}".to_string()].into();
        let text = "\u{201C}x\u{201D} \u{200B} \u{2192} \u{2026}";
        let result = convert_text(text, &Settings::default(), &rules, &skipped);
        let summary = summarize(&result.change_log);
        assert_eq!(
            summary.parts(),
            vec!["1 hidden", "2 punctuation", "1 symbol", "1 skipped"]
        );
    }
}
