//! Whole-document extraction with pdf-extract
//!
//! pdf-extract returns one string for the whole file. Pages are recovered from
//! form feeds when present; otherwise the text lands on the first page and the
//! remaining pages are left empty so the page count still matches the file.

use pagediff_core::PageSequence;
use tracing::debug;

use crate::error::ExtractError;
use crate::types::{is_pdf, parse_error, split_pages, PageExtractor};

#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyExtractor;

impl LegacyExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl PageExtractor for LegacyExtractor {
    fn name(&self) -> &'static str {
        "legacy"
    }

    fn can_handle(&self, data: &[u8]) -> bool {
        is_pdf(data)
    }

    fn extract(&self, data: &[u8]) -> Result<PageSequence, ExtractError> {
        let text =
            pdf_extract::extract_text_from_mem(data).map_err(|e| parse_error(e.to_string()))?;

        let page_count = match pdf_extract::Document::load_mem(data) {
            Ok(doc) => doc.get_pages().len(),
            Err(_) => 1,
        };

        let mut pages = PageSequence::from_texts(split_pages(&text));
        while pages.len() < page_count {
            pages.push(String::new());
        }

        debug!(
            "pdf-extract produced {} pages ({} in file)",
            pages.len(),
            page_count
        );
        Ok(pages)
    }
}
