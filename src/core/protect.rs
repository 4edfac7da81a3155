// File: src/core/protect.rs
//! Spans of the input that must be copied through untouched: fenced code
//! blocks and links.

use crate::core::types::Span;
use regex::Regex;
use std::sync::LazyLock;

static FENCED_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?```").expect("valid regex literal"));

static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`[^`\n]+`").expect("valid regex literal"));

// Markdown `[text](url)` or a bare http(s) URL.
static LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\[[^\]]*\]\([^)]+\)|https?://[^\s)>"']+"#).expect("valid regex literal")
});

static BARE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s)>\]"']+"#).expect("valid regex literal"));

/// Maps byte offsets of `text` to char indices.
struct CharIndex {
    byte_offsets: Vec<usize>,
}

impl CharIndex {
    fn new(text: &str) -> Self {
        Self {
            byte_offsets: text.char_indices().map(|(b, _)| b).collect(),
        }
    }

    fn char_at(&self, byte: usize) -> usize {
        // Regex match boundaries always fall on char boundaries.
        self.byte_offsets.partition_point(|&b| b < byte)
    }
}

fn collect_spans(re: &Regex, text: &str, index: &CharIndex, out: &mut Vec<Span>) {
    for m in re.find_iter(text) {
        out.push(Span::new(index.char_at(m.start()), index.char_at(m.end())));
    }
}

fn merge(mut spans: Vec<Span>) -> Vec<Span> {
    spans.sort_by_key(|s| s.start);
    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }
    merged
}

/// Sorted, disjoint, half-open char-index spans the converter must not touch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtectedRanges {
    spans: Vec<Span>,
}

impl ProtectedRanges {
    /// Fenced (triple-backtick) code blocks when `preserve_code`, links when
    /// `preserve_links`. Inline single-backtick spans are not protected here.
    pub fn find(text: &str, preserve_code: bool, preserve_links: bool) -> Self {
        if !preserve_code && !preserve_links {
            return Self::default();
        }
        let index = CharIndex::new(text);
        let mut spans = Vec::new();
        if preserve_code {
            collect_spans(&FENCED_CODE, text, &index, &mut spans);
        }
        if preserve_links {
            collect_spans(&LINK, text, &index, &mut spans);
        }
        Self {
            spans: merge(spans),
        }
    }

    pub fn contains(&self, pos: usize) -> bool {
        let i = self.spans.partition_point(|s| s.end <= pos);
        self.spans.get(i).is_some_and(|s| s.contains(pos))
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

/// A run of text that is either protected or free to rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub is_protected: bool,
    pub span: Span,
}

/// Splits `text` into alternating protected/unprotected segments for display.
///
/// Unlike [`ProtectedRanges::find`], this also treats inline single-backtick
/// code as protected and only recognizes bare URLs.
pub fn segment_text(text: &str, protect_code: bool, protect_links: bool) -> Vec<Segment> {
    let index = CharIndex::new(text);
    let mut spans = Vec::new();
    if protect_code {
        collect_spans(&FENCED_CODE, text, &index, &mut spans);
        collect_spans(&INLINE_CODE, text, &index, &mut spans);
    }
    if protect_links {
        collect_spans(&BARE_URL, text, &index, &mut spans);
    }

    let chars: Vec<char> = text.chars().collect();
    let slice = |start: usize, end: usize| chars[start..end].iter().collect::<String>();
    let mut segments = Vec::new();
    let mut last = 0;
    for span in merge(spans) {
        if span.start > last {
            segments.push(Segment {
                text: slice(last, span.start),
                is_protected: false,
                span: Span::new(last, span.start),
            });
        }
        segments.push(Segment {
            text: slice(span.start, span.end),
            is_protected: true,
            span,
        });
        last = span.end;
    }
    if last < chars.len() || segments.is_empty() {
        segments.push(Segment {
            text: slice(last, chars.len()),
            is_protected: false,
            span: Span::new(last, chars.len()),
        });
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_block_covers_delimiters() {
        let text = "a ```x“y``` b";
        let ranges = ProtectedRanges::find(text, true, false);
        assert_eq!(ranges.spans(), &[Span::new(2, 11)]);
        assert!(!ranges.contains(1));
        assert!(ranges.contains(2));
        assert!(ranges.contains(10));
        assert!(!ranges.contains(11));
    }

    #[test]
    fn fenced_match_is_non_greedy() {
        let text = "```a``` mid ```b```";
        let ranges = ProtectedRanges::find(text, true, false);
        assert_eq!(ranges.spans().len(), 2);
        assert!(!ranges.contains(8));
    }

    #[test]
    fn inline_code_not_protected_by_converter_ranges() {
        let ranges = ProtectedRanges::find("see `code` here", true, true);
        assert!(ranges.is_empty());
    }

    #[test]
    fn links_and_urls() {
        let text = "go to [déjà](http://x.y/é) or https://a.b/c?d=1) now";
        let ranges = ProtectedRanges::find(text, false, true);
        assert_eq!(ranges.spans().len(), 2);
        let chars: Vec<char> = text.chars().collect();
        let bare = text[..text.find("https").unwrap()].chars().count();
        let paren = chars.iter().rposition(|&c| c == ')').unwrap();
        assert!(ranges.contains(6));
        assert!(!ranges.contains(5));
        assert!(ranges.contains(bare));
        assert!(!ranges.contains(bare - 1));
        // The closing paren stops the bare URL.
        assert!(ranges.contains(paren - 1));
        assert!(!ranges.contains(paren));
    }

    #[test]
    fn url_stops_at_quote() {
        let text = "\"http://a.b/c\" x";
        let ranges = ProtectedRanges::find(text, false, true);
        assert_eq!(ranges.spans(), &[Span::new(1, 13)]);
    }

    #[test]
    fn disabled_flags_protect_nothing() {
        let ranges = ProtectedRanges::find("```x``` http://a.b", false, false);
        assert!(ranges.is_empty());
    }

    #[test]
    fn positions_are_char_indices() {
        let text = "ééé ```x```";
        let ranges = ProtectedRanges::find(text, true, false);
        assert_eq!(ranges.spans(), &[Span::new(4, 11)]);
    }

    #[test]
    fn segments_cover_whole_text() {
        let text = "a `b` c http://d.e f";
        let segments = segment_text(text, true, true);
        let rebuilt: String = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(rebuilt, text);
        let protected: Vec<_> = segments
            .iter()
            .filter(|s| s.is_protected)
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(protected, vec!["`b`", "http://d.e"]);
    }

    #[test]
    fn segment_empty_text() {
        let segments = segment_text("", true, true);
        assert_eq!(segments.len(), 1);
        assert!(!segments[0].is_protected);
    }
}
