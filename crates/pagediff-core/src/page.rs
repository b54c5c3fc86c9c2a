//! Page text model
//!
//! A `PageSequence` is what an extractor hands to the engine: one text block
//! per physical page, in document order.

use serde::{Deserialize, Serialize};

/// Text of a single page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContent {
    /// Position in the source document (0-indexed)
    pub index: usize,
    /// Extracted text, reading order already resolved
    pub text: String,
}

/// Ordered pages of one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSequence {
    pages: Vec<PageContent>,
}

impl PageSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sequence from page texts, assigning indices by position
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pages = texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| PageContent {
                index,
                text: text.into(),
            })
            .collect();
        Self { pages }
    }

    /// Append a page; its index is its position
    pub fn push(&mut self, text: impl Into<String>) {
        let index = self.pages.len();
        self.pages.push(PageContent {
            index,
            text: text.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PageContent> {
        self.pages.get(index)
    }

    pub fn pages(&self) -> &[PageContent] {
        &self.pages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PageContent> {
        self.pages.iter()
    }

    /// Total characters across all pages
    pub fn total_chars(&self) -> usize {
        self.pages.iter().map(|p| p.text.chars().count()).sum()
    }

    /// Whole document text, pages joined by a newline
    pub fn joined_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<'a> IntoIterator for &'a PageSequence {
    type Item = &'a PageContent;
    type IntoIter = std::slice::Iter<'a, PageContent>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}

impl<S: Into<String>> FromIterator<S> for PageSequence {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_texts(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_follow_position() {
        let seq = PageSequence::from_texts(["one", "two", "three"]);
        let indices: Vec<usize> = seq.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_push_assigns_next_index() {
        let mut seq = PageSequence::new();
        seq.push("a");
        seq.push(String::from("b"));
        assert_eq!(seq.get(1).unwrap().index, 1);
        assert_eq!(seq.len(), 2);
    }

    #[test]
    fn test_joined_text() {
        let seq: PageSequence = vec!["first", "", "third"].into_iter().collect();
        assert_eq!(seq.joined_text(), "first\n\nthird");
        assert_eq!(seq.total_chars(), 10);
    }
}
