// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification bucket for a flagged character or a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Punctuation,
    Hidden,
    Custom,
    Emoji,
    Accent,
    Other,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Punctuation => "punctuation",
            Category::Hidden => "hidden",
            Category::Custom => "custom",
            Category::Emoji => "emoji",
            Category::Accent => "accent",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An explicit character-to-replacement mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    pub category: Category,
    pub label: String,
    pub find: String,
    pub replace: String,
    pub enabled: bool,
}

/// A half-open `[start, end)` range of char indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn contains(&self, pos: usize) -> bool {
        pos >= self.start && pos < self.end
    }
}

/// One deduplicated conversion outcome, keyed by `(original, replacement, skipped)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeLogEntry {
    pub original: String,
    pub replacement: String,
    pub label: String,
    pub category: Category,
    pub count: usize,
    pub skipped: bool,
    /// Spans into the original input.
    pub input_positions: Vec<Span>,
    /// Spans into the converted output. Empty for pure deletions.
    pub output_positions: Vec<Span>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub text: String,
    pub change_log: Vec<ChangeLogEntry>,
    /// Sum of `count` over active entries only.
    pub total_changes: usize,
}

/// A distinct flagged character and every index it occurs at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    #[serde(rename = "char")]
    pub ch: char,
    pub label: String,
    pub positions: Vec<usize>,
}

impl InventoryItem {
    pub fn count(&self) -> usize {
        self.positions.len()
    }
}

/// Read-only description of what non-ASCII content a text contains.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisInventory {
    pub hidden: Vec<InventoryItem>,
    pub punctuation: Vec<InventoryItem>,
    pub emoji: Vec<InventoryItem>,
    pub accent: Vec<InventoryItem>,
    pub other: Vec<InventoryItem>,
    pub total_issues: usize,
}

impl AnalysisInventory {
    /// The bucket for `category`. Custom has no inventory bucket.
    pub fn bucket(&self, category: Category) -> Option<&[InventoryItem]> {
        match category {
            Category::Hidden => Some(&self.hidden),
            Category::Punctuation => Some(&self.punctuation),
            Category::Emoji => Some(&self.emoji),
            Category::Accent => Some(&self.accent),
            Category::Other => Some(&self.other),
            Category::Custom => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_issues == 0
    }
}
