// File: src/core/analyzer.rs
use crate::core::classifier::{classify, is_hidden};
use crate::core::rules::default_rule_for;
use crate::core::types::{AnalysisInventory, Category, InventoryItem};
use log::debug;
use std::collections::HashMap;

fn categorize(ch: char) -> Option<(Category, &'static str)> {
    let class = classify(ch)?;
    let rule = default_rule_for(ch);
    let category = if is_hidden(ch) {
        Category::Hidden
    } else if matches!(rule, Some((Category::Punctuation, _))) {
        Category::Punctuation
    } else {
        class.category
    };
    let label = rule.map(|(_, label)| label).unwrap_or(class.label);
    Some((category, label))
}

/// Inventories every non-ASCII character in `text` by category.
///
/// Ignores settings, rules and protected ranges: this reports what is
/// present, not what a conversion would change. Positions are char indices.
pub fn analyze_text(text: &str) -> AnalysisInventory {
    let mut inventory = AnalysisInventory::default();
    if text.is_empty() {
        return inventory;
    }

    let mut buckets: Vec<(Category, InventoryItem)> = Vec::new();
    let mut seen: HashMap<char, usize> = HashMap::new();

    for (i, ch) in text.chars().enumerate() {
        let Some((category, label)) = categorize(ch) else {
            continue;
        };
        let slot = *seen.entry(ch).or_insert_with(|| {
            buckets.push((
                category,
                InventoryItem {
                    ch,
                    label: label.to_string(),
                    positions: Vec::new(),
                },
            ));
            buckets.len() - 1
        });
        buckets[slot].1.positions.push(i);
    }

    for (category, item) in buckets {
        inventory.total_issues += item.count();
        let target = match category {
            Category::Hidden => &mut inventory.hidden,
            Category::Punctuation => &mut inventory.punctuation,
            Category::Emoji => &mut inventory.emoji,
            Category::Accent => &mut inventory.accent,
            Category::Other | Category::Custom => &mut inventory.other,
        };
        target.push(item);
    }

    for list in [
        &mut inventory.hidden,
        &mut inventory.punctuation,
        &mut inventory.emoji,
        &mut inventory.accent,
        &mut inventory.other,
    ] {
        list.sort_by_key(|item| std::cmp::Reverse(item.count()));
    }

    debug!("analyzed text: {} flagged occurrences", inventory.total_issues);
    inventory
}
