//! Whole-document unified text diff

use crate::matcher::{OpTag, SequenceMatcher};
use crate::page::PageSequence;

/// Default header labels for the two documents
pub const DEFAULT_FROM_LABEL: &str = "PDF A";
pub const DEFAULT_TO_LABEL: &str = "PDF B";

/// Unified diff of two documents' text, pages joined by a newline
///
/// Output lines carry no terminator. Identical documents produce no lines.
pub fn unified_document_diff(
    source: &PageSequence,
    target: &PageSequence,
    from_label: &str,
    to_label: &str,
    context: usize,
) -> Vec<String> {
    let source_text = source.joined_text();
    let target_text = target.joined_text();
    let a = split_lines(&source_text);
    let b = split_lines(&target_text);
    unified_diff(&a, &b, from_label, to_label, context)
}

/// Split on every line boundary PDF text tends to carry, not only `\n`
///
/// `\r\n` counts as one break. A trailing break does not open an empty
/// last line.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        let is_break = matches!(
            c,
            '\n' | '\r'
                | '\x0b'
                | '\x0c'
                | '\x1c'
                | '\x1d'
                | '\x1e'
                | '\u{85}'
                | '\u{2028}'
                | '\u{2029}'
        );
        if !is_break {
            continue;
        }
        lines.push(&text[start..pos]);
        start = pos + c.len_utf8();
        if c == '\r' {
            if let Some(&(next, '\n')) = chars.peek() {
                chars.next();
                start = next + 1;
            }
        }
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Unified diff over pre-split lines
pub fn unified_diff(
    a: &[&str],
    b: &[&str],
    from_label: &str,
    to_label: &str,
    context: usize,
) -> Vec<String> {
    let groups = SequenceMatcher::new(a, b).grouped_opcodes(context);
    if groups.is_empty() {
        return Vec::new();
    }

    let mut out = vec![format!("--- {}", from_label), format!("+++ {}", to_label)];

    for group in groups {
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            continue;
        };
        out.push(format!(
            "@@ -{} +{} @@",
            format_range(first.a.start, last.a.end),
            format_range(first.b.start, last.b.end)
        ));

        for code in &group {
            match code.tag {
                OpTag::Equal => {
                    out.extend(a[code.a.clone()].iter().map(|line| format!(" {}", line)));
                }
                OpTag::Delete | OpTag::Replace | OpTag::Insert => {
                    out.extend(a[code.a.clone()].iter().map(|line| format!("-{}", line)));
                    out.extend(b[code.b.clone()].iter().map(|line| format!("+{}", line)));
                }
            }
        }
    }

    out
}

/// Hunk range: `start` is 1-based, a single line omits the length and an
/// empty range points at the line before it
fn format_range(start: usize, stop: usize) -> String {
    let length = stop - start;
    match length {
        0 => format!("{},0", start),
        1 => format!("{}", start + 1),
        _ => format!("{},{}", start + 1, length),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_identical_documents_produce_nothing() {
        let doc = PageSequence::from_texts(["one\ntwo", "three"]);
        assert!(unified_document_diff(&doc, &doc, "PDF A", "PDF B", 3).is_empty());
    }

    #[test]
    fn test_single_changed_line() {
        let a = ["a", "b", "c"];
        let b = ["a", "B", "c"];
        assert_eq!(
            unified_diff(&a, &b, "PDF A", "PDF B", 3),
            vec!["--- PDF A", "+++ PDF B", "@@ -1,3 +1,3 @@", " a", "-b", "+B", " c"]
        );
    }

    #[test]
    fn test_insert_into_empty() {
        let a: [&str; 0] = [];
        let b = ["new"];
        assert_eq!(
            unified_diff(&a, &b, "x", "y", 3),
            vec!["--- x", "+++ y", "@@ -0,0 +1 @@", "+new"]
        );
    }

    #[test]
    fn test_context_limits_hunk() {
        let a: Vec<String> = (1..=10).map(|i| format!("line {}", i)).collect();
        let mut b = a.clone();
        b[4] = "changed".into();
        let a: Vec<&str> = a.iter().map(String::as_str).collect();
        let b: Vec<&str> = b.iter().map(String::as_str).collect();

        let diff = unified_diff(&a, &b, "PDF A", "PDF B", 1);
        assert_eq!(
            diff,
            vec![
                "--- PDF A",
                "+++ PDF B",
                "@@ -4,3 +4,3 @@",
                " line 4",
                "-line 5",
                "+changed",
                " line 6",
            ]
        );
    }

    #[test]
    fn test_split_lines_on_every_boundary() {
        assert_eq!(
            split_lines("a\r\nb\rc\x0cd\u{2028}e\n"),
            vec!["a", "b", "c", "d", "e"]
        );
        assert_eq!(split_lines("x\n\ny"), vec!["x", "", "y"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_lone_carriage_return_separates_lines() {
        let a = PageSequence::from_texts(["one\rtwo"]);
        let b = PageSequence::from_texts(["one\rTWO"]);
        let diff = unified_document_diff(&a, &b, DEFAULT_FROM_LABEL, DEFAULT_TO_LABEL, 3);
        assert_eq!(
            diff,
            vec!["--- PDF A", "+++ PDF B", "@@ -1,2 +1,2 @@", " one", "-two", "+TWO"]
        );
    }

    #[test]
    fn test_pages_joined_with_newline() {
        let a = PageSequence::from_texts(["alpha", "beta"]);
        let b = PageSequence::from_texts(["alpha", "gamma"]);
        let diff = unified_document_diff(&a, &b, DEFAULT_FROM_LABEL, DEFAULT_TO_LABEL, 3);
        assert_eq!(
            diff,
            vec!["--- PDF A", "+++ PDF B", "@@ -1,2 +1,2 @@", " alpha", "-beta", "+gamma"]
        );
    }
}
