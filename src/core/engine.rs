// File: src/core/engine.rs
use crate::config::{Settings, SettingsPatch, Strictness};
use crate::core::analyzer::analyze_text;
use crate::core::converter::convert_text;
use crate::core::rules::{CustomRule, RulePatch, RuleSet};
use crate::core::types::{AnalysisInventory, ConversionResult, Rule};
use crate::persistence::{export_settings, ImportedSettings};
use log::debug;
use std::collections::HashSet;

/// Session state: input text, settings, rules and the skip set, plus the
/// outputs derived from them.
///
/// Every mutator commits a whole new state and recomputes from scratch, so
/// [`Session::output`] always reflects one consistent snapshot.
pub struct Session {
    input: String,
    settings: Settings,
    rules: RuleSet,
    skipped: HashSet<String>,
    output: ConversionResult,
    analysis: AnalysisInventory,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            input: String::new(),
            settings,
            rules: RuleSet::with_defaults(),
            skipped: HashSet::new(),
            output: ConversionResult::default(),
            analysis: AnalysisInventory::default(),
        }
    }

    fn recompute(&mut self) {
        self.output = convert_text(&self.input, &self.settings, self.rules.rules(), &self.skipped);
        debug!(
            "recomputed: {} changes, {} skipped chars",
            self.output.total_changes,
            self.skipped.len()
        );
    }

    // --- Accessors ---

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn rules(&self) -> &[Rule] {
        self.rules.rules()
    }

    pub fn skipped(&self) -> &HashSet<String> {
        &self.skipped
    }

    pub fn is_skipped(&self, ch: &str) -> bool {
        self.skipped.contains(ch)
    }

    pub fn output(&self) -> &ConversionResult {
        &self.output
    }

    pub fn analysis(&self) -> &AnalysisInventory {
        &self.analysis
    }

    // --- Text ---

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
        self.analysis = analyze_text(&self.input);
        self.recompute();
    }

    pub fn clear_input(&mut self) {
        self.set_input(String::new());
    }

    // --- Settings ---

    pub fn update_settings(&mut self, patch: &SettingsPatch) {
        self.settings = self.settings.merge(patch);
        self.recompute();
    }

    /// Overwrites the preset fields and records the level.
    pub fn apply_strictness(&mut self, level: Strictness) {
        let preset = Settings::preset(level);
        self.settings = Settings {
            wrap_text: self.settings.wrap_text,
            markdown_preview: self.settings.markdown_preview,
            ..preset
        };
        self.recompute();
    }

    // --- Rules ---

    pub fn add_rule(&mut self, find: &str, replace: &str) -> Rule {
        let rule = self.rules.add_rule(find, replace);
        self.recompute();
        rule
    }

    pub fn update_rule(&mut self, id: &str, patch: RulePatch) -> bool {
        let changed = self.rules.update_rule(id, patch);
        if changed {
            self.recompute();
        }
        changed
    }

    pub fn remove_rule(&mut self, id: &str) -> bool {
        let changed = self.rules.remove_rule(id);
        if changed {
            self.recompute();
        }
        changed
    }

    /// Sets a custom replacement for `find` and takes it out of the skip set.
    pub fn upsert_override(&mut self, find: &str, replace: &str) -> String {
        self.skipped.remove(find);
        let id = self.rules.upsert_override(find, replace);
        self.recompute();
        id
    }

    pub fn remove_override(&mut self, find: &str) -> bool {
        let changed = self.rules.remove_override(find);
        if changed {
            self.recompute();
        }
        changed
    }

    pub fn import_custom_rules(&mut self, custom_rules: &[CustomRule]) {
        self.rules.replace_custom_rules(custom_rules);
        self.recompute();
    }

    // --- Skip set ---

    pub fn skip_char(&mut self, ch: &str) {
        if self.skipped.insert(ch.to_string()) {
            self.recompute();
        }
    }

    pub fn unskip_char(&mut self, ch: &str) {
        if self.skipped.remove(ch) {
            self.recompute();
        }
    }

    // --- Export / import ---

    pub fn export_settings(&self) -> serde_json::Result<String> {
        export_settings(&self.settings, self.rules.rules())
    }

    /// Applies a parsed import: merges the settings patch when present and
    /// replaces the custom rules only when the payload carries some.
    pub fn apply_import(&mut self, imported: &ImportedSettings) {
        if let Some(patch) = &imported.settings {
            self.settings = self.settings.merge(patch);
        }
        if !imported.custom_rules.is_empty() {
            self.rules.replace_custom_rules(&imported.custom_rules);
        }
        self.recompute();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmojiMode;
    use crate::core::types::Category;
    use crate::persistence::import_settings;

    #[test]
    fn input_drives_both_outputs() {
        let mut session = Session::new();
        session.set_input("caf\u{00E9} \u{2014} ok");
        assert_eq!(session.output().text, "caf\u{00E9} -- ok");
        assert_eq!(session.analysis().accent.len(), 1);
        assert_eq!(session.analysis().punctuation.len(), 1);

        session.clear_input();
        assert_eq!(session.output(), &ConversionResult::default());
        assert!(session.analysis().is_empty());
    }

    #[test]
    fn settings_patch_recomputes() {
        let mut session = Session::new();
        session.set_input("😀!");
        assert_eq!(session.output().text, "!");
        session.update_settings(&SettingsPatch {
            emoji_mode: Some(EmojiMode::Keep),
            ..Default::default()
        });
        assert_eq!(session.output().text, "😀!");
    }

    #[test]
    fn strict_preset_strips_accents() {
        let mut session = Session::new();
        session.update_settings(&SettingsPatch {
            wrap_text: Some(false),
            ..Default::default()
        });
        session.set_input("na\u{00EF}ve");
        session.apply_strictness(Strictness::Strict);
        assert_eq!(session.output().text, "naive");
        assert_eq!(session.settings().strictness, Strictness::Strict);
        assert!(!session.settings().wrap_text);
        session.apply_strictness(Strictness::Standard);
        assert_eq!(session.output().text, "na\u{00EF}ve");
    }

    #[test]
    fn override_evicts_from_skip_set() {
        let mut session = Session::new();
        session.set_input("a\u{2014}b");
        session.skip_char("\u{2014}");
        assert_eq!(session.output().text, "a\u{2014}b");
        assert!(session.output().change_log[0].skipped);

        session.upsert_override("\u{2014}", "-");
        assert!(!session.is_skipped("\u{2014}"));
        assert_eq!(session.output().text, "a-b");
        assert_eq!(session.output().change_log[0].category, Category::Custom);

        assert!(session.remove_override("\u{2014}"));
        assert_eq!(session.output().text, "a--b");
    }

    #[test]
    fn rule_mutations_recompute() {
        let mut session = Session::new();
        session.set_input("x\u{00E9}");
        let rule = session.add_rule("\u{00E9}", "E");
        assert_eq!(session.output().text, "xE");
        assert!(session.update_rule(&rule.id, RulePatch {
            enabled: Some(false),
            ..Default::default()
        }));
        assert_eq!(session.output().text, "x\u{00E9}");
        assert!(session.remove_rule(&rule.id));
        assert!(!session.remove_rule(&rule.id));
    }

    #[test]
    fn apply_import_replaces_custom_rules() {
        let mut session = Session::new();
        session.add_rule("a", "b");
        session.set_input("\u{00FC}");
        let imported = import_settings(
            r#"{"version":1,"settings":{"keepAccents":false},"customRules":[{"id":"r1","find":"ü","replace":"ue","label":"Umlaut","enabled":true}]}"#,
        )
        .unwrap();
        session.apply_import(&imported);
        assert_eq!(session.output().text, "ue");
        let custom: Vec<_> = session
            .rules()
            .iter()
            .filter(|r| r.category == Category::Custom)
            .collect();
        assert_eq!(custom.len(), 1);
        assert_eq!(custom[0].id, "r1");
        assert!(!session.settings().keep_accents);
    }

    #[test]
    fn partial_import_keeps_unmentioned_settings() {
        let mut session = Session::new();
        session.update_settings(&SettingsPatch {
            emoji_mode: Some(EmojiMode::Keep),
            ..Default::default()
        });
        session.set_input("\u{00E9}\u{1F600}");
        let imported = import_settings(r#"{"version":1,"settings":{"keepAccents":false}}"#).unwrap();
        session.apply_import(&imported);
        assert_eq!(session.settings().emoji_mode, EmojiMode::Keep);
        assert!(!session.settings().keep_accents);
        assert_eq!(session.output().text, "e\u{1F600}");
    }

    #[test]
    fn import_without_rules_keeps_custom_rules() {
        let mut session = Session::new();
        session.upsert_override("\u{2014}", "-");
        session.set_input("a\u{2014}b");
        for json in [
            r#"{"version":1,"settings":{}}"#,
            r#"{"version":1,"customRules":[]}"#,
        ] {
            session.apply_import(&import_settings(json).unwrap());
            let custom = session
                .rules()
                .iter()
                .filter(|r| r.category == Category::Custom)
                .count();
            assert_eq!(custom, 1, "{json}");
            assert_eq!(session.output().text, "a-b");
        }
    }

    #[test]
    fn export_reflects_session() {
        let mut session = Session::new();
        session.upsert_override("\u{2026}", "..");
        let json = session.export_settings().unwrap();
        assert!(json.contains("Custom override"));
    }
}
