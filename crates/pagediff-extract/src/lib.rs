//! Page text extraction for pagediff
//!
//! Turns a document into a [`PageSequence`], one entry per physical page.
//!
//! ## Backends
//!
//! - [`LopdfExtractor`]: per-page extraction with lopdf (preferred for PDFs)
//! - [`LegacyExtractor`]: pdf-extract, used as a fallback
//! - [`PlainTextExtractor`]: UTF-8 text with form-feed page breaks
//!
//! [`ExtractionRouter`] picks between them according to an
//! [`ExtractionStrategy`].
//!
//! [`PageSequence`]: pagediff_core::PageSequence

pub mod error;
pub mod legacy;
pub mod native;
pub mod router;
pub mod text;
pub mod types;

pub use error::ExtractError;
pub use legacy::LegacyExtractor;
pub use native::LopdfExtractor;
pub use router::{ExtractionRouter, ExtractionStrategy};
pub use text::PlainTextExtractor;
pub use types::{Extraction, PageExtractor, FORM_FEED};
