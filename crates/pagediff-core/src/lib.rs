//! Page-aligned document comparison
//!
//! Given the extracted text of two documents, one string per page, this crate
//! works out which pages correspond (tolerating inserted and deleted pages)
//! and what changed inside every corresponding pair.
//!
//! ```
//! use pagediff_core::{compare_pages, PageSequence};
//!
//! let before = PageSequence::from_texts(["Cover", "Rent is due on the first."]);
//! let after = PageSequence::from_texts(["Cover", "Rent is due on the fifth."]);
//!
//! let comparison = compare_pages(&before, &after);
//! assert_eq!(comparison.summary.matched, 2);
//! assert_eq!(comparison.summary.changed_pairs, 1);
//! ```

pub mod align;
pub mod config;
pub mod differ;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod page;
pub mod similarity;
pub mod tokenize;
pub mod unified;

pub use align::{AlignmentKind, AlignmentPlan, AlignmentPlanner, AlignmentRecord};
pub use config::{DiffGranularity, EngineConfig, EngineConfigBuilder, MAX_LOOKAHEAD_WINDOW};
pub use differ::{DiffSpan, PageDiffer, PairDiff, SpanKind};
pub use engine::{Comparison, ComparisonSummary, PageDiffEngine};
pub use error::PageDiffError;
pub use page::{PageContent, PageSequence};
pub use similarity::{RatioScorer, SimilarityScorer};
pub use unified::{unified_diff, unified_document_diff};

/// Compare two documents with the default configuration
pub fn compare_pages(a: &PageSequence, b: &PageSequence) -> Comparison {
    PageDiffEngine::default().compare(a, b)
}
