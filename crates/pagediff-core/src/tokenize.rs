//! Splitting page text into diff tokens
//!
//! Tokens always tile the input: concatenating every token's text gives the
//! original string back, and each token records its byte offset so spans can
//! be reported against the page text directly.

use crate::config::DiffGranularity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'t> {
    pub text: &'t str,
    /// Byte offset of `text` in the page
    pub start: usize,
}

impl<'t> Token<'t> {
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    pub fn is_whitespace(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }
}

pub fn tokenize(text: &str, granularity: DiffGranularity) -> Vec<Token<'_>> {
    match granularity {
        DiffGranularity::Word => words(text),
        DiffGranularity::Line => lines(text),
        DiffGranularity::Char => text
            .char_indices()
            .map(|(start, c)| Token {
                text: &text[start..start + c.len_utf8()],
                start,
            })
            .collect(),
    }
}

/// Alternating runs of whitespace and non-whitespace
fn words(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut run_start = 0;
    let mut run_is_space: Option<bool> = None;

    for (pos, c) in text.char_indices() {
        let is_space = c.is_whitespace();
        match run_is_space {
            Some(current) if current != is_space => {
                tokens.push(Token {
                    text: &text[run_start..pos],
                    start: run_start,
                });
                run_start = pos;
                run_is_space = Some(is_space);
            }
            Some(_) => {}
            None => run_is_space = Some(is_space),
        }
    }

    if run_start < text.len() {
        tokens.push(Token {
            text: &text[run_start..],
            start: run_start,
        });
    }
    tokens
}

fn lines(text: &str) -> Vec<Token<'_>> {
    let mut start = 0;
    text.split_inclusive('\n')
        .map(|line| {
            let token = Token { text: line, start };
            start += line.len();
            token
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts<'t>(tokens: &[Token<'t>]) -> Vec<&'t str> {
        tokens.iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_words_keep_whitespace_runs() {
        let tokens = tokenize("  Total:\t$1,200 due\n", DiffGranularity::Word);
        assert_eq!(
            texts(&tokens),
            vec!["  ", "Total:", "\t", "$1,200", " ", "due", "\n"]
        );
        assert_eq!(tokens[3].start, 9);
        assert!(tokens[2].is_whitespace());
        assert!(!tokens[3].is_whitespace());
    }

    #[test]
    fn test_lines_keep_terminator() {
        let tokens = tokenize("one\ntwo\r\nthree", DiffGranularity::Line);
        assert_eq!(texts(&tokens), vec!["one\n", "two\r\n", "three"]);
        assert_eq!(tokens[2].start, 9);
    }

    #[test]
    fn test_chars_use_byte_offsets() {
        let tokens = tokenize("né", DiffGranularity::Char);
        assert_eq!(texts(&tokens), vec!["n", "é"]);
        assert_eq!(tokens[1].end(), 3);
    }

    const ALL: [DiffGranularity; 3] = [
        DiffGranularity::Word,
        DiffGranularity::Line,
        DiffGranularity::Char,
    ];

    #[test]
    fn test_empty_text_has_no_tokens() {
        for granularity in ALL {
            assert!(tokenize("", granularity).is_empty());
        }
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: tokens tile the text with no gaps
        #[test]
        fn tokens_tile_text(text in "[a-cé \\n\\t]{0,50}") {
            for granularity in [
                DiffGranularity::Word,
                DiffGranularity::Line,
                DiffGranularity::Char,
            ] {
                let tokens = tokenize(&text, granularity);
                let mut offset = 0;
                for token in &tokens {
                    prop_assert_eq!(token.start, offset);
                    prop_assert!(!token.text.is_empty());
                    offset = token.end();
                }
                prop_assert_eq!(offset, text.len());
            }
        }
    }
}
