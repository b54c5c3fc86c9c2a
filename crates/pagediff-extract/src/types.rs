//! Backend trait and shared extraction types

use pagediff_core::PageSequence;
use serde::{Deserialize, Serialize};

use crate::error::ExtractError;

/// Separator some producers place between pages
pub const FORM_FEED: char = '\x0C';

/// A source of page text
pub trait PageExtractor {
    /// Short backend name for logs and reports
    fn name(&self) -> &'static str;

    /// Cheap check on the raw bytes, without parsing
    fn can_handle(&self, data: &[u8]) -> bool;

    fn extract(&self, data: &[u8]) -> Result<PageSequence, ExtractError>;
}

/// Pages plus how they were obtained
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub pages: PageSequence,
    /// Name of the backend that produced `pages`
    pub backend: String,
    /// The preferred backend failed or found no text
    pub fallback_occurred: bool,
}

impl Extraction {
    pub fn new(backend: &str, pages: PageSequence) -> Self {
        Self {
            pages,
            backend: backend.to_string(),
            fallback_occurred: false,
        }
    }

    pub fn with_fallback(mut self) -> Self {
        self.fallback_occurred = true;
        self
    }
}

pub(crate) fn is_pdf(data: &[u8]) -> bool {
    data.starts_with(b"%PDF")
}

/// Whether any page carries something other than whitespace
pub(crate) fn has_text(pages: &PageSequence) -> bool {
    pages.iter().any(|p| !p.text.trim().is_empty())
}

/// Map a parser error message, recognising encrypted documents
pub(crate) fn parse_error(message: String) -> ExtractError {
    let lower = message.to_lowercase();
    if lower.contains("encrypt") || lower.contains("password") {
        ExtractError::PasswordProtected
    } else {
        ExtractError::ParseError(message)
    }
}

/// Split on form feeds; a final separator does not open another page
pub(crate) fn split_pages(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    let mut pages: Vec<&str> = text.split(FORM_FEED).collect();
    if pages.len() > 1 && pages.last().is_some_and(|p| p.is_empty()) {
        pages.pop();
    }
    pages
}
