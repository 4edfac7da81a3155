// --- File: src/core/rules.rs
use crate::config::Settings;
use crate::core::types::{Category, Rule};
use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const CUSTOM_REPLACEMENT_LABEL: &str = "Custom replacement";
pub const CUSTOM_OVERRIDE_LABEL: &str = "Custom override";

// --- Default catalog ---

const PUNCTUATION_RULES: &[(char, &str, &str)] = &[
    // Smart / curly quotes
    ('\u{2018}', "'", "Left single quote"),
    ('\u{2019}', "'", "Right single quote"),
    ('\u{201C}', "\"", "Left double quote"),
    ('\u{201D}', "\"", "Right double quote"),
    ('\u{201A}', "'", "Single low-9 quote"),
    ('\u{201E}', "\"", "Double low-9 quote"),
    ('\u{2039}', "'", "Single left angle quote"),
    ('\u{203A}', "'", "Single right angle quote"),
    ('\u{00AB}', "\"", "Left guillemet"),
    ('\u{00BB}', "\"", "Right guillemet"),
    // Dashes
    ('\u{2013}', "--", "En dash"),
    ('\u{2014}', "--", "Em dash"),
    ('\u{2015}', "--", "Horizontal bar"),
    ('\u{2026}', "...", "Ellipsis"),
    // Look-alike spaces
    ('\u{00A0}', " ", "Non-breaking space"),
    ('\u{202F}', " ", "Narrow no-break space"),
    ('\u{2007}', " ", "Figure space"),
    ('\u{2009}', " ", "Thin space"),
    ('\u{200A}', " ", "Hair space"),
    ('\u{2002}', " ", "En space"),
    ('\u{2003}', " ", "Em space"),
    // Misc
    ('\u{2022}', "*", "Bullet"),
    ('\u{2023}', ">", "Triangle bullet"),
    ('\u{2043}', "-", "Hyphen bullet"),
    ('\u{2027}', "-", "Hyphenation point"),
    ('\u{00B7}', ".", "Middle dot"),
    ('\u{2212}', "-", "Minus sign"),
];

const HIDDEN_RULES: &[(char, &str)] = &[
    ('\u{200B}', "Zero-width space"),
    ('\u{200C}', "Zero-width non-joiner"),
    ('\u{200D}', "Zero-width joiner"),
    ('\u{200E}', "Left-to-right mark"),
    ('\u{200F}', "Right-to-left mark"),
    ('\u{00AD}', "Soft hyphen"),
    ('\u{FEFF}', "Byte order mark"),
    ('\u{2060}', "Word joiner"),
    ('\u{2061}', "Function application"),
    ('\u{2062}', "Invisible times"),
    ('\u{2063}', "Invisible separator"),
    ('\u{2064}', "Invisible plus"),
    ('\u{180E}', "Mongolian vowel separator"),
    ('\u{034F}', "Combining grapheme joiner"),
    ('\u{061C}', "Arabic letter mark"),
    ('\u{2066}', "Left-to-right isolate"),
    ('\u{2067}', "Right-to-left isolate"),
    ('\u{2068}', "First strong isolate"),
    ('\u{2069}', "Pop directional isolate"),
    ('\u{202A}', "Left-to-right embedding"),
    ('\u{202B}', "Right-to-left embedding"),
    ('\u{202C}', "Pop directional formatting"),
    ('\u{202D}', "Left-to-right override"),
    ('\u{202E}', "Right-to-left override"),
];

/// A fresh copy of the built-in rules: punctuation first, then hidden.
/// Ids are `default-1`, `default-2`, ... in catalog order.
pub fn default_rules() -> Vec<Rule> {
    let punctuation = PUNCTUATION_RULES
        .iter()
        .map(|&(find, replace, label)| (Category::Punctuation, find, replace, label));
    let hidden = HIDDEN_RULES
        .iter()
        .map(|&(find, label)| (Category::Hidden, find, "", label));

    punctuation
        .chain(hidden)
        .enumerate()
        .map(|(i, (category, find, replace, label))| Rule {
            id: format!("default-{}", i + 1),
            category,
            label: label.to_string(),
            find: find.to_string(),
            replace: replace.to_string(),
            enabled: true,
        })
        .collect()
}

/// Looks `ch` up in the built-in catalog, ignoring settings.
pub fn default_rule_for(ch: char) -> Option<(Category, &'static str)> {
    if let Some(&(_, _, label)) = PUNCTUATION_RULES.iter().find(|r| r.0 == ch) {
        return Some((Category::Punctuation, label));
    }
    HIDDEN_RULES
        .iter()
        .find(|r| r.0 == ch)
        .map(|&(_, label)| (Category::Hidden, label))
}

// --- Custom rule records (import/export shape) ---

fn default_custom_label() -> String {
    CUSTOM_REPLACEMENT_LABEL.to_string()
}

fn default_enabled() -> bool {
    true
}

/// A custom rule as it appears in an export payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomRule {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub find: String,
    #[serde(default)]
    pub replace: String,
    #[serde(default = "default_custom_label")]
    pub label: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl From<&Rule> for CustomRule {
    fn from(rule: &Rule) -> Self {
        Self {
            id: rule.id.clone(),
            find: rule.find.clone(),
            replace: rule.replace.clone(),
            label: rule.label.clone(),
            enabled: rule.enabled,
        }
    }
}

/// Field-wise update for [`RuleSet::update_rule`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RulePatch {
    pub label: Option<String>,
    pub find: Option<String>,
    pub replace: Option<String>,
    pub enabled: Option<bool>,
}

// --- RuleSet: the ordered, user-editable collection ---

/// Ordered rule collection. Later rules shadow earlier ones with the same `find`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
    next_custom_id: u64,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules, next_custom_id: 1 }
    }

    pub fn with_defaults() -> Self {
        Self::new(default_rules())
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn custom_rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(|r| r.category == Category::Custom)
    }

    fn fresh_id(&mut self) -> String {
        loop {
            let id = format!("custom-{}", self.next_custom_id);
            self.next_custom_id += 1;
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn new_custom(&mut self, find: &str, replace: &str, label: &str) -> Rule {
        Rule {
            id: self.fresh_id(),
            category: Category::Custom,
            label: label.to_string(),
            find: find.to_string(),
            replace: replace.to_string(),
            enabled: true,
        }
    }

    /// Appends a new enabled custom rule and returns a copy of it.
    pub fn add_rule(&mut self, find: &str, replace: &str) -> Rule {
        let rule = self.new_custom(find, replace, CUSTOM_REPLACEMENT_LABEL);
        self.rules.push(rule.clone());
        rule
    }

    /// Returns `false` if no rule has this id.
    pub fn update_rule(&mut self, id: &str, patch: RulePatch) -> bool {
        let Some(rule) = self.rules.iter_mut().find(|r| r.id == id) else {
            return false;
        };
        if let Some(label) = patch.label {
            rule.label = label;
        }
        if let Some(find) = patch.find {
            rule.find = find;
        }
        if let Some(replace) = patch.replace {
            rule.replace = replace;
        }
        if let Some(enabled) = patch.enabled {
            rule.enabled = enabled;
        }
        true
    }

    pub fn remove_rule(&mut self, id: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|r| r.id != id);
        self.rules.len() != before
    }

    /// Drops every custom rule and appends `imported` in order.
    /// Missing ids are filled with fresh ones.
    pub fn replace_custom_rules(&mut self, imported: &[CustomRule]) {
        self.rules.retain(|r| r.category != Category::Custom);
        for record in imported {
            let id = if record.id.is_empty() {
                self.fresh_id()
            } else {
                record.id.clone()
            };
            self.rules.push(Rule {
                id,
                category: Category::Custom,
                label: if record.label.is_empty() {
                    default_custom_label()
                } else {
                    record.label.clone()
                },
                find: record.find.clone(),
                replace: record.replace.clone(),
                enabled: record.enabled,
            });
        }
    }

    /// Creates a custom override for `find`, or patches the replacement of
    /// the existing one in place, keeping its id. Returns the rule's id.
    pub fn upsert_override(&mut self, find: &str, replace: &str) -> String {
        if let Some(existing) = self
            .rules
            .iter_mut()
            .find(|r| r.category == Category::Custom && r.find == find)
        {
            existing.replace = replace.to_string();
            return existing.id.clone();
        }
        let rule = self.new_custom(find, replace, CUSTOM_OVERRIDE_LABEL);
        let id = rule.id.clone();
        self.rules.push(rule);
        id
    }

    pub fn remove_override(&mut self, find: &str) -> bool {
        let before = self.rules.len();
        self.rules
            .retain(|r| !(r.category == Category::Custom && r.find == find));
        self.rules.len() != before
    }
}

// --- RuleTable: immutable resolved lookup for one conversion pass ---

/// Exact-match lookup over the rules that are active under a given [`Settings`].
#[derive(Debug, Clone, Default)]
pub struct RuleTable<'a> {
    by_find: HashMap<&'a str, &'a Rule>,
}

impl<'a> RuleTable<'a> {
    pub fn build(rules: &'a [Rule], settings: &Settings) -> Self {
        let mut by_find = HashMap::with_capacity(rules.len());
        for rule in rules {
            if !rule.enabled {
                continue;
            }
            match rule.category {
                Category::Punctuation if !settings.fix_punctuation => continue,
                Category::Hidden if !settings.remove_hidden => continue,
                _ => {}
            }
            if let Some(shadowed) = by_find.insert(rule.find.as_str(), rule) {
                trace!("rule {} shadows {} for {:?}", rule.id, shadowed.id, rule.find);
            }
        }
        Self { by_find }
    }

    pub fn lookup(&self, find: &str) -> Option<&'a Rule> {
        self.by_find.get(find).copied()
    }

    pub fn lookup_char(&self, ch: char) -> Option<&'a Rule> {
        let mut buf = [0u8; 4];
        self.lookup(ch.encode_utf8(&mut buf))
    }

    pub fn len(&self) -> usize {
        self.by_find.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_find.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ids_follow_catalog_order() {
        let rules = default_rules();
        assert_eq!(rules.len(), PUNCTUATION_RULES.len() + HIDDEN_RULES.len());
        assert_eq!(rules[0].id, "default-1");
        assert_eq!(rules[0].find, "\u{2018}");
        let zwsp = rules.iter().find(|r| r.find == "\u{200B}").unwrap();
        assert_eq!(zwsp.category, Category::Hidden);
        assert_eq!(zwsp.replace, "");
    }

    #[test]
    fn table_filters_by_settings() {
        let rules = default_rules();
        let settings = Settings {
            fix_punctuation: false,
            ..Settings::default()
        };
        let table = RuleTable::build(&rules, &settings);
        assert!(table.lookup_char('\u{2014}').is_none());
        assert!(table.lookup_char('\u{200B}').is_some());

        let settings = Settings {
            remove_hidden: false,
            ..Settings::default()
        };
        let table = RuleTable::build(&rules, &settings);
        assert!(table.lookup_char('\u{2014}').is_some());
        assert!(table.lookup_char('\u{200B}').is_none());
    }

    #[test]
    fn later_rule_shadows_earlier() {
        let mut set = RuleSet::with_defaults();
        set.upsert_override("\u{2014}", "-");
        let table = RuleTable::build(set.rules(), &Settings::default());
        let rule = table.lookup_char('\u{2014}').unwrap();
        assert_eq!(rule.category, Category::Custom);
        assert_eq!(rule.replace, "-");
    }

    #[test]
    fn custom_rules_survive_punctuation_toggle() {
        let mut set = RuleSet::with_defaults();
        set.add_rule("\u{00E9}", "e");
        let settings = Settings {
            fix_punctuation: false,
            remove_hidden: false,
            ..Settings::default()
        };
        let table = RuleTable::build(set.rules(), &settings);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn disabled_rules_are_ignored() {
        let mut set = RuleSet::with_defaults();
        let id = set.get("default-12").unwrap().id.clone();
        assert!(set.update_rule(&id, RulePatch { enabled: Some(false), ..Default::default() }));
        let table = RuleTable::build(set.rules(), &Settings::default());
        assert!(table.lookup_char('\u{2014}').is_none());
    }

    #[test]
    fn upsert_keeps_id_and_patches_in_place() {
        let mut set = RuleSet::with_defaults();
        let first = set.upsert_override("\u{2026}", "..");
        let second = set.upsert_override("\u{2026}", "~");
        assert_eq!(first, second);
        assert_eq!(set.custom_rules().count(), 1);
        assert_eq!(set.get(&first).unwrap().replace, "~");
        assert_eq!(set.get(&first).unwrap().label, CUSTOM_OVERRIDE_LABEL);
        assert!(set.remove_override("\u{2026}"));
        assert_eq!(set.custom_rules().count(), 0);
    }

    #[test]
    fn replace_custom_rules_fills_missing_ids() {
        let mut set = RuleSet::with_defaults();
        set.add_rule("x", "y");
        let imported = vec![
            CustomRule {
                id: String::new(),
                find: "\u{00FC}".into(),
                replace: "ue".into(),
                label: String::new(),
                enabled: true,
            },
            CustomRule {
                id: "custom-1".into(),
                find: "\u{00DF}".into(),
                replace: "ss".into(),
                label: "German sharp s".into(),
                enabled: false,
            },
        ];
        set.replace_custom_rules(&imported);
        let custom: Vec<_> = set.custom_rules().collect();
        assert_eq!(custom.len(), 2);
        assert!(!custom[0].id.is_empty());
        assert_ne!(custom[0].id, custom[1].id);
        assert_eq!(custom[0].label, CUSTOM_REPLACEMENT_LABEL);
        assert!(!custom[1].enabled);
    }

    #[test]
    fn remove_rule_by_id() {
        let mut set = RuleSet::with_defaults();
        let rule = set.add_rule("a", "b");
        assert!(set.remove_rule(&rule.id));
        assert!(!set.remove_rule(&rule.id));
    }
}
