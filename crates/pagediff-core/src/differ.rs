//! Per-page content differ
//!
//! Decomposes one aligned page pair into EQUAL / DELETE / INSERT spans using
//! the longest-matching-block recursion over tokens. Span ranges are byte
//! ranges into the page texts and always fall on character boundaries.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::config::{DiffGranularity, EngineConfig};
use crate::matcher::{Match, SequenceMatcher};
use crate::tokenize::{tokenize, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanKind {
    Equal,
    /// Present only in the source page
    Delete,
    /// Present only in the target page
    Insert,
}

/// A contiguous region of an aligned page pair
///
/// DELETE carries only `source_range`, INSERT only `target_range`, EQUAL
/// both. Ranges are never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSpan {
    pub kind: SpanKind,
    pub source_range: Option<Range<usize>>,
    pub target_range: Option<Range<usize>>,
}

impl DiffSpan {
    pub fn equal(source: Range<usize>, target: Range<usize>) -> Self {
        Self {
            kind: SpanKind::Equal,
            source_range: Some(source),
            target_range: Some(target),
        }
    }

    pub fn delete(source: Range<usize>) -> Self {
        Self {
            kind: SpanKind::Delete,
            source_range: Some(source),
            target_range: None,
        }
    }

    pub fn insert(target: Range<usize>) -> Self {
        Self {
            kind: SpanKind::Insert,
            source_range: None,
            target_range: Some(target),
        }
    }

    /// Slice of the source page covered by this span
    pub fn source_text<'s>(&self, source: &'s str) -> Option<&'s str> {
        self.source_range.clone().and_then(|r| source.get(r))
    }

    /// Slice of the target page covered by this span
    pub fn target_text<'t>(&self, target: &'t str) -> Option<&'t str> {
        self.target_range.clone().and_then(|r| target.get(r))
    }

    /// Extend this span with an adjacent one of the same kind
    fn absorb(&mut self, next: &DiffSpan) -> bool {
        if self.kind != next.kind {
            return false;
        }
        match (&mut self.source_range, &next.source_range) {
            (Some(mine), Some(theirs)) if mine.end == theirs.start => mine.end = theirs.end,
            (None, None) => {}
            _ => return false,
        }
        match (&mut self.target_range, &next.target_range) {
            (Some(mine), Some(theirs)) if mine.end == theirs.start => mine.end = theirs.end,
            (None, None) => {}
            _ => return false,
        }
        true
    }
}

/// Differences for one MATCHED page pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairDiff {
    pub source_index: usize,
    pub target_index: usize,
    pub similarity: f64,
    pub spans: Vec<DiffSpan>,
}

impl PairDiff {
    pub fn has_changes(&self) -> bool {
        self.spans.iter().any(|s| s.kind != SpanKind::Equal)
    }

    /// Bytes deleted from the source plus bytes inserted into the target
    pub fn changed_bytes(&self) -> usize {
        self.spans
            .iter()
            .map(|span| match span.kind {
                SpanKind::Equal => 0,
                SpanKind::Delete => span.source_range.as_ref().map_or(0, |r| r.len()),
                SpanKind::Insert => span.target_range.as_ref().map_or(0, |r| r.len()),
            })
            .sum()
    }
}

/// Token differ configured from the engine settings
#[derive(Debug, Clone, Copy)]
pub struct PageDiffer {
    granularity: DiffGranularity,
    min_block: usize,
}

impl PageDiffer {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            granularity: config.granularity,
            min_block: config.min_diff_block_length,
        }
    }

    pub fn diff(&self, source: &str, target: &str) -> Vec<DiffSpan> {
        let src_tokens = tokenize(source, self.granularity);
        let tgt_tokens = tokenize(target, self.granularity);
        let a: Vec<&str> = src_tokens.iter().map(|t| t.text).collect();
        let b: Vec<&str> = tgt_tokens.iter().map(|t| t.text).collect();

        let blocks = SequenceMatcher::new(&a, &b)
            .with_min_block(self.min_block)
            .matching_blocks();

        let mut spans: Vec<DiffSpan> = Vec::new();
        let (mut i, mut j) = (0, 0);

        for (pos, m) in blocks.iter().enumerate() {
            if m.size > 0 && is_noise(m, i, j, blocks.get(pos + 1), &src_tokens) {
                continue;
            }

            if i < m.a {
                push(&mut spans, DiffSpan::delete(byte_range(&src_tokens, i..m.a)));
            }
            if j < m.b {
                push(&mut spans, DiffSpan::insert(byte_range(&tgt_tokens, j..m.b)));
            }
            if m.size > 0 {
                push(
                    &mut spans,
                    DiffSpan::equal(
                        byte_range(&src_tokens, m.a..m.a + m.size),
                        byte_range(&tgt_tokens, m.b..m.b + m.size),
                    ),
                );
            }
            i = m.a + m.size;
            j = m.b + m.size;
        }

        spans
    }
}

/// A whitespace-only block wedged between two changed regions
fn is_noise(m: &Match, i: usize, j: usize, next: Option<&Match>, src: &[Token<'_>]) -> bool {
    let gap_before = i < m.a || j < m.b;
    let gap_after = next.is_some_and(|n| m.a + m.size < n.a || m.b + m.size < n.b);

    gap_before && gap_after && src[m.a..m.a + m.size].iter().all(Token::is_whitespace)
}

/// Byte range covered by a non-empty token range
fn byte_range(tokens: &[Token<'_>], range: Range<usize>) -> Range<usize> {
    tokens[range.start].start..tokens[range.end - 1].end()
}

fn push(spans: &mut Vec<DiffSpan>, span: DiffSpan) {
    if let Some(last) = spans.last_mut() {
        if last.absorb(&span) {
            return;
        }
    }
    spans.push(span);
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn reassemble(spans: &[DiffSpan], source: &str, target: &str) -> (String, String) {
        let mut src = String::new();
        let mut tgt = String::new();
        for span in spans {
            if let Some(text) = span.source_text(source) {
                src.push_str(text);
            }
            if let Some(text) = span.target_text(target) {
                tgt.push_str(text);
            }
        }
        (src, tgt)
    }

    fn granularity() -> impl Strategy<Value = DiffGranularity> {
        prop_oneof![
            Just(DiffGranularity::Word),
            Just(DiffGranularity::Line),
            Just(DiffGranularity::Char),
        ]
    }

    proptest! {
        /// Property: DELETE+EQUAL rebuild the source and INSERT+EQUAL rebuild
        /// the target, with no empty spans
        #[test]
        fn spans_reassemble_both_pages(
            source in "[abé \\n]{0,40}",
            target in "[abé \\n]{0,40}",
            granularity in granularity(),
            min_block in 1usize..4,
        ) {
            let config = EngineConfig::builder()
                .granularity(granularity)
                .min_diff_block_length(min_block)
                .build()
                .unwrap();
            let spans = PageDiffer::new(&config).diff(&source, &target);

            let (src, tgt) = reassemble(&spans, &source, &target);
            prop_assert_eq!(src, source.clone());
            prop_assert_eq!(tgt, target.clone());

            for span in &spans {
                match span.kind {
                    SpanKind::Equal => {
                        prop_assert!(span.source_range.is_some() && span.target_range.is_some());
                        prop_assert_eq!(span.source_text(&source), span.target_text(&target));
                    }
                    SpanKind::Delete => prop_assert!(span.target_range.is_none()),
                    SpanKind::Insert => prop_assert!(span.source_range.is_none()),
                }
                for range in [&span.source_range, &span.target_range].into_iter().flatten() {
                    prop_assert!(!range.is_empty());
                }
            }
        }

        /// Property: identical pages never report a change
        #[test]
        fn identical_pages_unchanged(text in "[a-d \\n]{0,40}", granularity in granularity()) {
            let config = EngineConfig::builder().granularity(granularity).build().unwrap();
            let spans = PageDiffer::new(&config).diff(&text, &text);
            prop_assert!(spans.iter().all(|s| s.kind == SpanKind::Equal));
            prop_assert!(spans.len() <= 1);
        }
    }
}
