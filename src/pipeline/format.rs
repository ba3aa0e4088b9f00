//! XML re-indentation.
//!
//! A line-based pretty-printer: adjacent tags are split onto their own lines
//! and re-indented by a nesting depth inferred from the shape of each tag
//! line. Lines that do not start with a tag are text content and are emitted
//! exactly as they are, leading and trailing whitespace included. There is no
//! parse tree; the input is trusted to be the well-formed output of
//! [`crate::pipeline::xml::build_document`] or similar.
//!
//! ## Line classes
//!
//! | Line                       | Emitted at | Depth after |
//! |----------------------------|------------|-------------|
//! | `</x>`                     | depth − 1  | depth − 1   |
//! | `<?…?>`, `<!…>`            | depth      | depth       |
//! | `<x …/>`                   | depth      | depth       |
//! | `<x …>text</x>`            | depth      | depth       |
//! | `<x …>`                    | depth      | depth + 1   |
//! | anything else (text)       | verbatim   | depth       |
//!
//! Blank lines outside the root element are dropped.

use crate::config::LineEnding;
use once_cell::sync::Lazy;
use regex::Regex;

/// Layout options for [`format_xml`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// Spaces per nesting level.
    pub indent: usize,
    pub line_ending: LineEnding,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            line_ending: LineEnding::Lf,
        }
    }
}

// Whitespace spanning at most one line break is layout; anything more is a
// text run that happens to be blank.
static RE_TAG_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r">[ \t]*(?:\r?\n[ \t]*)?<").unwrap());

static RE_CLOSING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^</[\w:.-]+\s*>").unwrap());

static RE_DECLARATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<[?!]").unwrap());

static RE_SELF_CLOSING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<[\w:.-][^>]*/>$").unwrap());

static RE_INLINE_ELEMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<[\w:.-][^>]*>.*</[\w:.-]+\s*>$").unwrap());

static RE_OPENING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<[\w:.-][^>]*>").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Closing,
    Leaf,
    Opening,
}

fn classify(line: &str) -> LineKind {
    if RE_CLOSING.is_match(line) {
        LineKind::Closing
    } else if RE_DECLARATION.is_match(line)
        || RE_SELF_CLOSING.is_match(line)
        || RE_INLINE_ELEMENT.is_match(line)
    {
        LineKind::Leaf
    } else if RE_OPENING.is_match(line) {
        LineKind::Opening
    } else {
        LineKind::Leaf
    }
}

/// Re-indent an XML string.
///
/// The result has no trailing line terminator. Applying it to its own output
/// returns the same string.
pub fn format_xml(xml: &str, options: FormatOptions) -> String {
    let split = RE_TAG_BOUNDARY.replace_all(xml, ">\n<");
    let pad = " ".repeat(options.indent);
    let mut depth: usize = 0;
    let mut out: Vec<String> = Vec::new();

    for line in split.lines() {
        let tag = line.trim();
        if !tag.starts_with('<') {
            if depth == 0 && tag.is_empty() {
                continue;
            }
            out.push(line.to_string());
            continue;
        }

        match classify(tag) {
            LineKind::Closing => {
                depth = depth.saturating_sub(1);
                out.push(format!("{}{}", pad.repeat(depth), tag));
            }
            LineKind::Leaf => out.push(format!("{}{}", pad.repeat(depth), tag)),
            LineKind::Opening => {
                out.push(format!("{}{}", pad.repeat(depth), tag));
                depth += 1;
            }
        }
    }

    out.join(options.line_ending.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{PageText, TextItem};
    use crate::pipeline::xml::build_document;

    fn sample_document() -> String {
        let pages = vec![
            PageText {
                page_num: 1,
                items: vec![
                    TextItem {
                        text: "Title".into(),
                        x: 72.0,
                        y: 720.0,
                        width: 40.0,
                        height: 14.0,
                    },
                    TextItem {
                        text: "Q&A <draft>".into(),
                        x: 72.0,
                        y: 700.25,
                        width: 60.0,
                        height: 12.0,
                    },
                ],
            },
            PageText {
                page_num: 2,
                items: vec![],
            },
        ];
        build_document("sample.pdf", 2, &pages, None)
    }

    #[test]
    fn builder_output_is_canonical() {
        let xml = sample_document();
        assert_eq!(format_xml(&xml, FormatOptions::default()), xml);
    }

    #[test]
    fn formatting_is_idempotent() {
        let once = format_xml(
            &sample_document(),
            FormatOptions {
                indent: 4,
                line_ending: LineEnding::Crlf,
            },
        );
        let twice = format_xml(
            &once,
            FormatOptions {
                indent: 4,
                line_ending: LineEnding::Crlf,
            },
        );
        assert_eq!(once, twice);
    }

    #[test]
    fn flat_input_is_indented() {
        let flat = "<root><a>1</a><b><c/></b></root>";
        let out = format_xml(flat, FormatOptions::default());
        assert_eq!(out, "<root>\n  <a>1</a>\n  <b>\n    <c/>\n  </b>\n</root>");
    }

    #[test]
    fn self_closing_does_not_nest() {
        let out = format_xml(
            "<root>\n<empty attr=\"1\" />\n<next>x</next>\n</root>",
            FormatOptions::default(),
        );
        assert_eq!(
            out,
            "<root>\n  <empty attr=\"1\" />\n  <next>x</next>\n</root>"
        );
    }

    #[test]
    fn declaration_and_comment_stay_flat() {
        let out = format_xml(
            "<?xml version=\"1.0\"?><!-- note --><root><x>1</x></root>",
            FormatOptions::default(),
        );
        assert_eq!(
            out,
            "<?xml version=\"1.0\"?>\n<!-- note -->\n<root>\n  <x>1</x>\n</root>"
        );
    }

    #[test]
    fn text_lines_are_kept_verbatim() {
        let out = format_xml("<a>\n<b>\nhello  \n   world\n</b>\n</a>", FormatOptions::default());
        assert_eq!(out, "<a>\n  <b>\nhello  \n   world\n  </b>\n</a>");
    }

    #[test]
    fn text_item_whitespace_and_line_breaks_survive() {
        let pages = vec![PageText {
            page_num: 1,
            items: ["  indented", "line1\nline2", "trailing  ", "   ", ""]
                .iter()
                .map(|t| TextItem {
                    text: t.to_string(),
                    x: 1.0,
                    y: 2.0,
                    width: 3.0,
                    height: 4.0,
                })
                .collect(),
        }];
        let raw = build_document("ws.pdf", 1, &pages, None);
        assert!(raw.contains("\n        indented\n"));
        assert!(raw.contains("\n      line1\nline2\n"));

        let formatted = format_xml(&raw, FormatOptions::default());
        assert_eq!(formatted, raw);

        let wide = FormatOptions {
            indent: 4,
            line_ending: LineEnding::Lf,
        };
        let reindented = format_xml(&raw, wide);
        assert!(reindented.contains("\n        indented\n"));
        assert!(reindented.contains("\n      line1\nline2\n"));
        assert_eq!(format_xml(&reindented, wide), reindented);
    }

    #[test]
    fn blank_lines_outside_root_are_dropped() {
        let out = format_xml("\n\n<a>\n<b/>\n</a>\n\n", FormatOptions::default());
        assert_eq!(out, "<a>\n  <b/>\n</a>");
    }

    #[test]
    fn unbalanced_closing_saturates() {
        let out = format_xml("</a>\n</b>\n<c>x</c>", FormatOptions::default());
        assert_eq!(out, "</a>\n</b>\n<c>x</c>");
    }

    #[test]
    fn crlf_and_width() {
        let out = format_xml(
            "<a><b>1</b></a>",
            FormatOptions {
                indent: 3,
                line_ending: LineEnding::Crlf,
            },
        );
        assert_eq!(out, "<a>\r\n   <b>1</b>\r\n</a>");
    }

    #[test]
    fn zero_indent() {
        let out = format_xml(
            "<a><b>1</b></a>",
            FormatOptions {
                indent: 0,
                line_ending: LineEnding::Lf,
            },
        );
        assert_eq!(out, "<a>\n<b>1</b>\n</a>");
    }
}
