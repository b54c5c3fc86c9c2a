//! Backend selection with fallback
//!
//! ## Auto strategy
//!
//! | Input | Backend | Fallback |
//! |-------|---------|----------|
//! | `%PDF` header | lopdf | pdf-extract when lopdf fails or finds no text |
//! | UTF-8 text | text | none |
//! | anything else | none | `NoBackend` |

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ExtractError;
use crate::legacy::LegacyExtractor;
use crate::native::LopdfExtractor;
use crate::text::PlainTextExtractor;
use crate::types::{has_text, is_pdf, Extraction, PageExtractor};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// Pick a backend from the input bytes
    #[default]
    Auto,
    /// lopdf only
    Lopdf,
    /// pdf-extract only
    Legacy,
    /// Form-feed separated UTF-8 text
    Text,
}

impl FromStr for ExtractionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "lopdf" => Ok(Self::Lopdf),
            "legacy" => Ok(Self::Legacy),
            "text" => Ok(Self::Text),
            other => Err(format!(
                "Unknown extractor '{}'. Use: auto, lopdf, legacy, text",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExtractionRouter {
    strategy: ExtractionStrategy,
    lopdf: LopdfExtractor,
    legacy: LegacyExtractor,
    text: PlainTextExtractor,
}

impl ExtractionRouter {
    pub fn new(strategy: ExtractionStrategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    pub fn strategy(&self) -> ExtractionStrategy {
        self.strategy
    }

    pub fn extract_file(&self, path: &Path) -> Result<Extraction, ExtractError> {
        let data = std::fs::read(path)?;
        self.extract(&data)
    }

    pub fn extract(&self, data: &[u8]) -> Result<Extraction, ExtractError> {
        match self.strategy {
            ExtractionStrategy::Auto => self.extract_auto(data),
            ExtractionStrategy::Lopdf => Self::extract_with(&self.lopdf, data),
            ExtractionStrategy::Legacy => Self::extract_with(&self.legacy, data),
            ExtractionStrategy::Text => Self::extract_with(&self.text, data),
        }
    }

    fn extract_with(backend: &dyn PageExtractor, data: &[u8]) -> Result<Extraction, ExtractError> {
        if !backend.can_handle(data) {
            return Err(ExtractError::NoBackend);
        }
        let pages = backend.extract(data)?;
        Ok(Extraction::new(backend.name(), pages))
    }

    fn extract_auto(&self, data: &[u8]) -> Result<Extraction, ExtractError> {
        if !is_pdf(data) {
            return Self::extract_with(&self.text, data);
        }

        let primary = match self.lopdf.extract(data) {
            Ok(pages) if has_text(&pages) => {
                return Ok(Extraction::new(self.lopdf.name(), pages));
            }
            Err(ExtractError::PasswordProtected) => return Err(ExtractError::PasswordProtected),
            other => other,
        };

        match &primary {
            Ok(_) => warn!("lopdf found no text, trying pdf-extract"),
            Err(e) => warn!("lopdf failed ({}), trying pdf-extract", e),
        }

        match self.legacy.extract(data) {
            Ok(pages) => {
                info!("Extracted {} pages with pdf-extract fallback", pages.len());
                Ok(Extraction::new(self.legacy.name(), pages).with_fallback())
            }
            Err(fallback_err) => {
                warn!("pdf-extract fallback failed: {}", fallback_err);
                // A text-free document is still a valid result
                primary.map(|pages| Extraction::new(self.lopdf.name(), pages))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("AUTO".parse::<ExtractionStrategy>(), Ok(ExtractionStrategy::Auto));
        assert_eq!("legacy".parse::<ExtractionStrategy>(), Ok(ExtractionStrategy::Legacy));
        assert!("browser".parse::<ExtractionStrategy>().is_err());
    }

    #[test]
    fn test_auto_routes_text() {
        let extraction = ExtractionRouter::default()
            .extract(b"first\x0Csecond")
            .unwrap();
        assert_eq!(extraction.backend, "text");
        assert!(!extraction.fallback_occurred);
        assert_eq!(extraction.pages.len(), 2);
    }

    #[test]
    fn test_auto_rejects_binary() {
        let result = ExtractionRouter::default().extract(&[0x00, 0xff, 0xfe, 0x80]);
        assert!(matches!(result, Err(ExtractError::NoBackend)));
    }

    #[test]
    fn test_forced_backend_must_accept_input() {
        let router = ExtractionRouter::new(ExtractionStrategy::Lopdf);
        assert!(matches!(router.extract(b"plain text"), Err(ExtractError::NoBackend)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = ExtractionRouter::default().extract_file(Path::new("/nonexistent/a.pdf"));
        assert!(matches!(result, Err(ExtractError::Io(_))));
    }

    #[test]
    fn test_strategy_deserializes() {
        #[derive(Deserialize)]
        struct Wrapper {
            strategy: ExtractionStrategy,
        }
        let json = r#"{"strategy":"legacy"}"#;
        let wrapper: Wrapper = serde_json::from_str(json).unwrap();
        assert_eq!(wrapper.strategy, ExtractionStrategy::Legacy);
    }
}
