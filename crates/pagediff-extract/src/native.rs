//! Per-page extraction with lopdf
//!
//! lopdf resolves the page tree itself, so every physical page yields exactly
//! one entry even when its text cannot be decoded.

use lopdf::Document;
use pagediff_core::PageSequence;
use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::types::{is_pdf, parse_error, PageExtractor};

#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfExtractor;

impl LopdfExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract from an already parsed document
    pub fn extract_document(&self, doc: &Document) -> Result<PageSequence, ExtractError> {
        if doc.is_encrypted() {
            return Err(ExtractError::PasswordProtected);
        }

        let mut pages = PageSequence::new();
        for &number in doc.get_pages().keys() {
            match doc.extract_text(&[number]) {
                Ok(text) => pages.push(text),
                Err(e) => {
                    // Image-only and exotic-encoding pages still occupy a slot
                    warn!("Page {} text could not be decoded, using empty page: {}", number, e);
                    pages.push(String::new());
                }
            }
        }

        debug!("lopdf extracted {} pages", pages.len());
        Ok(pages)
    }
}

impl PageExtractor for LopdfExtractor {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn can_handle(&self, data: &[u8]) -> bool {
        is_pdf(data)
    }

    fn extract(&self, data: &[u8]) -> Result<PageSequence, ExtractError> {
        let doc = Document::load_mem(data).map_err(|e| parse_error(e.to_string()))?;
        self.extract_document(&doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name() {
        assert_eq!(LopdfExtractor::new().name(), "lopdf");
    }

    #[test]
    fn test_rejects_non_pdf_bytes() {
        let extractor = LopdfExtractor::new();
        assert!(!extractor.can_handle(b"Not a PDF file"));
        assert!(extractor.can_handle(b"%PDF-1.4 test"));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let result = LopdfExtractor::new().extract(b"%PDF-1.4 this is not really a pdf");
        assert!(matches!(result, Err(ExtractError::ParseError(_))));
    }
}
