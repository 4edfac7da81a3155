// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod persistence;

pub use crate::config::{EmojiMode, Settings, SettingsPatch, Strictness};
pub use crate::core::analyzer::analyze_text;
pub use crate::core::converter::{convert_text, summarize, ChangeSummary, Converter};
pub use crate::core::engine::Session;
pub use crate::core::rules::{default_rules, CustomRule, RulePatch, RuleSet};
pub use crate::core::transliterate::{SeededTransliterator, Transliterator};
pub use crate::core::types::{
    AnalysisInventory, Category, ChangeLogEntry, ConversionResult, InventoryItem, Rule, Span,
};
pub use crate::error::ImportError;
