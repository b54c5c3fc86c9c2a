//! Plain-text input, pages separated by form feeds

use pagediff_core::PageSequence;

use crate::error::ExtractError;
use crate::types::{is_pdf, split_pages, PageExtractor};

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl PageExtractor for PlainTextExtractor {
    fn name(&self) -> &'static str {
        "text"
    }

    fn can_handle(&self, data: &[u8]) -> bool {
        !is_pdf(data) && std::str::from_utf8(data).is_ok()
    }

    fn extract(&self, data: &[u8]) -> Result<PageSequence, ExtractError> {
        let text =
            std::str::from_utf8(data).map_err(|e| ExtractError::InvalidUtf8(e.to_string()))?;
        Ok(PageSequence::from_texts(split_pages(text)))
    }
}
