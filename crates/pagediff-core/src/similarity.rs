//! Page similarity scoring

use crate::matcher::{quick_ratio, real_quick_ratio, SequenceMatcher};

/// Normalized similarity between two page texts
///
/// Implementations must be deterministic, symmetric, reflexive and return a
/// value in `[0.0, 1.0]`.
pub trait SimilarityScorer {
    fn score(&self, a: &str, b: &str) -> f64;

    /// Cheap value that `score(a, b)` can never exceed
    ///
    /// The planner skips probes whose bound cannot clear its acceptance bar.
    /// The default disables pruning.
    fn upper_bound(&self, _a: &str, _b: &str) -> f64 {
        1.0
    }
}

/// Matching-block ratio over Unicode scalar values
///
/// `2 * matched / (len_a + len_b)` where `matched` counts the characters in
/// the common blocks found by the longest-match recursion.
#[derive(Debug, Clone, Copy, Default)]
pub struct RatioScorer;

impl RatioScorer {
    pub fn new() -> Self {
        Self
    }
}

impl SimilarityScorer for RatioScorer {
    fn score(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return 1.0;
        }

        // The greedy block search is order-sensitive; scoring in a fixed
        // order makes the result symmetric.
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        let first: Vec<char> = first.chars().collect();
        let second: Vec<char> = second.chars().collect();

        SequenceMatcher::new(&first, &second).ratio()
    }

    fn upper_bound(&self, a: &str, b: &str) -> f64 {
        let len_a = a.chars().count();
        let len_b = b.chars().count();
        let bound = real_quick_ratio(len_a, len_b);
        if bound == 0.0 {
            return bound;
        }

        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        quick_ratio(&a, &b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflexive() {
        let scorer = RatioScorer::new();
        assert_eq!(scorer.score("page one text", "page one text"), 1.0);
        assert_eq!(scorer.score("", ""), 1.0);
    }

    #[test]
    fn test_empty_vs_nonempty_is_zero() {
        let scorer = RatioScorer::new();
        assert_eq!(scorer.score("", "anything"), 0.0);
        assert_eq!(scorer.score("anything", ""), 0.0);
    }

    #[test]
    fn test_disjoint_is_zero() {
        assert_eq!(RatioScorer.score("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_known_ratio() {
        let score = RatioScorer.score("p1", "p2");
        assert!((score - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        // "é" is two bytes but one char: 2 * 3 / (4 + 4)
        let score = RatioScorer.score("café", "cafe");
        assert!((score - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_symmetric_on_order_sensitive_input() {
        let a = "abcabc xyz";
        let b = "xyz cbacba abc";
        assert_eq!(RatioScorer.score(a, b), RatioScorer.score(b, a));
    }

    #[test]
    fn test_upper_bound_never_below_score() {
        let a = "Section 4. Payment is due on the first of the month.";
        let b = "Section 5. Payments are due by the fifth of each month.";
        assert!(RatioScorer.upper_bound(a, b) >= RatioScorer.score(a, b));
        assert_eq!(RatioScorer.upper_bound("", "abc"), 0.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: score is symmetric and within [0, 1]
        #[test]
        fn score_symmetric_and_bounded(a in "[a-e ]{0,40}", b in "[a-e ]{0,40}") {
            let ab = RatioScorer.score(&a, &b);
            let ba = RatioScorer.score(&b, &a);
            prop_assert_eq!(ab, ba);
            prop_assert!((0.0..=1.0).contains(&ab));
        }

        /// Property: any text scores 1.0 against itself
        #[test]
        fn score_reflexive(a in ".{0,60}") {
            prop_assert_eq!(RatioScorer.score(&a, &a), 1.0);
        }

        /// Property: extending a text scores at least as well as an unrelated
        /// text of the same length
        #[test]
        fn extension_beats_unrelated(a in "[a-m]{1,30}", suffix in "[a-m]{0,30}") {
            let extended = format!("{}{}", a, suffix);
            let unrelated: String = "z".repeat(extended.chars().count());
            prop_assert!(RatioScorer.score(&a, &extended) >= RatioScorer.score(&a, &unrelated));
        }

        /// Property: the pruning bound never undercuts the real score
        #[test]
        fn upper_bound_is_sound(a in "[a-f ]{0,40}", b in "[a-f ]{0,40}") {
            prop_assert!(RatioScorer.upper_bound(&a, &b) + 1e-12 >= RatioScorer.score(&a, &b));
        }
    }
}
