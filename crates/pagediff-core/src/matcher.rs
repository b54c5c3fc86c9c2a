//! Longest-matching-block sequence matcher
//!
//! The classic greedy algorithm used by diff libraries: find the longest
//! contiguous block common to both sequences, then repeat on the unmatched
//! prefix and suffix. Ranges are processed from an explicit work-stack, so
//! stack depth stays constant no matter how fragmented the inputs are.
//!
//! Shared by the similarity scorer (over chars), the page differ (over word,
//! line or char tokens) and the unified text diff (over lines).

use std::collections::HashMap;
use std::hash::Hash;
use std::ops::Range;

/// A common block: `a[a..a + size] == b[b..b + size]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpTag {
    Equal,
    Replace,
    Delete,
    Insert,
}

/// One step turning `a` into `b`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opcode {
    pub tag: OpTag,
    pub a: Range<usize>,
    pub b: Range<usize>,
}

impl Opcode {
    fn new(tag: OpTag, a: Range<usize>, b: Range<usize>) -> Self {
        Self { tag, a, b }
    }
}

pub struct SequenceMatcher<'a, T> {
    a: &'a [T],
    /// Positions of every element of `b`, ascending
    b2j: HashMap<&'a T, Vec<usize>>,
    len_b: usize,
    min_block: usize,
}

impl<'a, T: Eq + Hash> SequenceMatcher<'a, T> {
    pub fn new(a: &'a [T], b: &'a [T]) -> Self {
        let mut b2j: HashMap<&'a T, Vec<usize>> = HashMap::new();
        for (j, elt) in b.iter().enumerate() {
            b2j.entry(elt).or_default().push(j);
        }

        Self {
            a,
            b2j,
            len_b: b.len(),
            min_block: 1,
        }
    }

    /// Discard common blocks shorter than `size` elements
    pub fn with_min_block(mut self, size: usize) -> Self {
        self.min_block = size.max(1);
        self
    }

    /// Longest block common to `a[alo..ahi]` and `b[blo..bhi]`
    ///
    /// Among equally long blocks the one starting earliest in `a` wins, then
    /// the one starting earliest in `b`.
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Match {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);

        // j2len[j] = length of the block ending at a[i - 1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        let mut next_j2len: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_j2len.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            std::mem::swap(&mut j2len, &mut next_j2len);
            next_j2len.clear();
        }

        Match {
            a: best_i,
            b: best_j,
            size: best_size,
        }
    }

    /// Non-overlapping common blocks in increasing order, adjacent blocks
    /// merged, terminated by the sentinel `Match { a: len_a, b: len_b, size: 0 }`
    pub fn matching_blocks(&self) -> Vec<Match> {
        let (len_a, len_b) = (self.a.len(), self.len_b);
        let mut stack = vec![(0, len_a, 0, len_b)];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = stack.pop() {
            let m = self.find_longest_match(alo, ahi, blo, bhi);
            if m.size == 0 || m.size < self.min_block {
                continue;
            }
            if alo < m.a && blo < m.b {
                stack.push((alo, m.a, blo, m.b));
            }
            if m.a + m.size < ahi && m.b + m.size < bhi {
                stack.push((m.a + m.size, ahi, m.b + m.size, bhi));
            }
            blocks.push(m);
        }

        blocks.sort_by_key(|m| (m.a, m.b));

        let mut merged: Vec<Match> = Vec::with_capacity(blocks.len() + 1);
        for m in blocks {
            if let Some(last) = merged.last_mut() {
                if last.a + last.size == m.a && last.b + last.size == m.b {
                    last.size += m.size;
                    continue;
                }
            }
            merged.push(m);
        }
        merged.push(Match {
            a: len_a,
            b: len_b,
            size: 0,
        });
        merged
    }

    /// Total number of matched elements
    pub fn matched_len(&self) -> usize {
        self.matching_blocks().iter().map(|m| m.size).sum()
    }

    /// `2 * matched / (len_a + len_b)`, or 1.0 when both are empty
    pub fn ratio(&self) -> f64 {
        let total = self.a.len() + self.len_b;
        if total == 0 {
            return 1.0;
        }
        2.0 * self.matched_len() as f64 / total as f64
    }

    /// Edit script from `a` to `b`
    pub fn opcodes(&self) -> Vec<Opcode> {
        let mut codes = Vec::new();
        let (mut i, mut j) = (0, 0);

        for m in self.matching_blocks() {
            let tag = match (i < m.a, j < m.b) {
                (true, true) => Some(OpTag::Replace),
                (true, false) => Some(OpTag::Delete),
                (false, true) => Some(OpTag::Insert),
                (false, false) => None,
            };
            if let Some(tag) = tag {
                codes.push(Opcode::new(tag, i..m.a, j..m.b));
            }
            i = m.a + m.size;
            j = m.b + m.size;
            if m.size > 0 {
                codes.push(Opcode::new(OpTag::Equal, m.a..i, m.b..j));
            }
        }

        codes
    }

    /// Opcodes clustered into hunks with up to `context` equal elements on
    /// each side; hunks separated by more than `2 * context` equal elements
    /// are split. Identical inputs produce no hunks.
    pub fn grouped_opcodes(&self, context: usize) -> Vec<Vec<Opcode>> {
        let mut codes = self.opcodes();
        if codes.is_empty() {
            codes.push(Opcode::new(OpTag::Equal, 0..1, 0..1));
        }

        if let Some(first) = codes.first_mut() {
            if first.tag == OpTag::Equal {
                first.a.start = first.a.start.max(first.a.end.saturating_sub(context));
                first.b.start = first.b.start.max(first.b.end.saturating_sub(context));
            }
        }
        if let Some(last) = codes.last_mut() {
            if last.tag == OpTag::Equal {
                last.a.end = last.a.end.min(last.a.start + context);
                last.b.end = last.b.end.min(last.b.start + context);
            }
        }

        let mut groups = Vec::new();
        let mut group = Vec::new();
        for mut code in codes {
            if code.tag == OpTag::Equal && code.a.len() > 2 * context {
                group.push(Opcode::new(
                    OpTag::Equal,
                    code.a.start..code.a.end.min(code.a.start + context),
                    code.b.start..code.b.end.min(code.b.start + context),
                ));
                groups.push(std::mem::take(&mut group));
                code.a.start = code.a.start.max(code.a.end.saturating_sub(context));
                code.b.start = code.b.start.max(code.b.end.saturating_sub(context));
            }
            group.push(code);
        }

        let only_equal = group.len() == 1 && group[0].tag == OpTag::Equal;
        if !group.is_empty() && !only_equal {
            groups.push(group);
        }

        groups
    }
}

/// Upper bound on `ratio` from element counts alone
pub fn quick_ratio<T: Eq + Hash>(a: &[T], b: &[T]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let mut available: HashMap<&T, isize> = HashMap::new();
    for elt in b {
        *available.entry(elt).or_insert(0) += 1;
    }

    let mut matches = 0usize;
    for elt in a {
        if let Some(count) = available.get_mut(elt) {
            if *count > 0 {
                matches += 1;
            }
            *count -= 1;
        }
    }

    2.0 * matches as f64 / total as f64
}

/// Upper bound on `ratio` from lengths alone
pub fn real_quick_ratio(len_a: usize, len_b: usize) -> f64 {
    let total = len_a + len_b;
    if total == 0 {
        return 1.0;
    }
    2.0 * len_a.min(len_b) as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_longest_match_prefers_earliest_in_a() {
        let a = chars(" abcd");
        let b = chars("abcd abcd");
        let m = SequenceMatcher::new(&a, &b).find_longest_match(0, 5, 0, 9);
        assert_eq!(m, Match { a: 0, b: 4, size: 5 });
    }

    #[test]
    fn test_matching_blocks_end_with_sentinel() {
        let a = chars("abxcd");
        let b = chars("abcd");
        let blocks = SequenceMatcher::new(&a, &b).matching_blocks();
        assert_eq!(
            blocks,
            vec![
                Match { a: 0, b: 0, size: 2 },
                Match { a: 3, b: 2, size: 2 },
                Match { a: 5, b: 4, size: 0 },
            ]
        );
    }

    #[test]
    fn test_ratio_known_value() {
        // Classic example: "abcd" vs "bcde" shares "bcd"
        let a = chars("abcd");
        let b = chars("bcde");
        let ratio = SequenceMatcher::new(&a, &b).ratio();
        assert!((ratio - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_ratio_empty_inputs() {
        let empty: Vec<char> = vec![];
        let text = chars("x");
        assert_eq!(SequenceMatcher::new(&empty, &empty).ratio(), 1.0);
        assert_eq!(SequenceMatcher::new(&empty, &text).ratio(), 0.0);
    }

    #[test]
    fn test_min_block_drops_short_matches() {
        let a = chars("a-bcdef");
        let b = chars("a+bcdef");
        let blocks = SequenceMatcher::new(&a, &b).with_min_block(3).matching_blocks();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], Match { a: 2, b: 2, size: 5 });
    }

    #[test]
    fn test_opcodes_cover_both_sequences() {
        let a = chars("qabxcd");
        let b = chars("abycdf");
        let codes = SequenceMatcher::new(&a, &b).opcodes();
        let tags: Vec<OpTag> = codes.iter().map(|c| c.tag).collect();
        assert_eq!(
            tags,
            vec![
                OpTag::Delete,
                OpTag::Equal,
                OpTag::Replace,
                OpTag::Equal,
                OpTag::Insert,
            ]
        );
        assert_eq!(codes.first().unwrap().a.start, 0);
        assert_eq!(codes.last().unwrap().a.end, a.len());
        assert_eq!(codes.last().unwrap().b.end, b.len());
    }

    #[test]
    fn test_grouped_opcodes_identical_is_empty() {
        let a = vec!["x", "y", "z"];
        let groups = SequenceMatcher::new(&a, &a).grouped_opcodes(3);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_grouped_opcodes_splits_distant_changes() {
        let a: Vec<String> = (0..20).map(|i| i.to_string()).collect();
        let mut b = a.clone();
        b[1] = "changed".into();
        b[18] = "changed too".into();

        let groups = SequenceMatcher::new(&a, &b).grouped_opcodes(3);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].first().unwrap().a, 0..1);
        assert_eq!(groups[1].last().unwrap().a, 19..20);
    }

    #[test]
    fn test_quick_ratio_bounds_ratio() {
        let a = chars("the quick brown fox");
        let b = chars("brown the fox quick");
        let ratio = SequenceMatcher::new(&a, &b).ratio();
        assert!(quick_ratio(&a, &b) >= ratio);
        assert!(real_quick_ratio(a.len(), b.len()) >= quick_ratio(&a, &b));
    }
}
