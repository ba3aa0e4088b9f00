//! XML document assembly.
//!
//! The document shape is fixed:
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <pdf>
//!   <metadata>
//!     <filename>…</filename>
//!     <pages>N</pages>
//!   </metadata>
//!   <page number="1">
//!     <textItem id="0" x="…" y="…">
//!       …
//!     </textItem>
//!   </page>
//! </pdf>
//! ```
//!
//! [`build_document`] emits this already indented with two spaces, which is
//! the canonical layout of [`crate::pipeline::format::format_xml`].

use crate::output::PageText;
use std::borrow::Cow;
use std::fmt::Write as _;

/// Escape `<`, `>`, `&`, `'` and `"` for use in text content and attribute values.
///
/// Every occurrence is replaced the same way. Escaping already escaped text
/// escapes it again (`&lt;` → `&amp;lt;`).
pub fn escape_text(raw: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(raw)
}

/// Render a coordinate for an `x`/`y` attribute.
///
/// With `precision: None` the shortest decimal that round-trips is used, so
/// whole numbers carry no fractional part (`72`, not `72.0`).
pub fn format_coordinate(value: f32, precision: Option<usize>) -> String {
    // -0 and 0 render identically
    let value = if value == 0.0 { 0.0 } else { value };
    match precision {
        None => value.to_string(),
        Some(p) => {
            let s = format!("{value:.p$}");
            if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
                s[1..].to_string()
            } else {
                s
            }
        }
    }
}

/// Build the XML document for a converted file.
///
/// `page_count` is the total page count of the document; `pages` holds only
/// the converted pages, in page order.
pub fn build_document(
    filename: &str,
    page_count: usize,
    pages: &[PageText],
    precision: Option<usize>,
) -> String {
    let items: usize = pages.iter().map(|p| p.items.len()).sum();
    let mut xml = String::with_capacity(160 + pages.len() * 32 + items * 64);

    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<pdf>\n");
    let _ = write!(
        xml,
        "  <metadata>\n    <filename>{}</filename>\n    <pages>{}</pages>\n  </metadata>\n",
        escape_text(filename),
        page_count
    );

    for page in pages {
        let _ = writeln!(xml, "  <page number=\"{}\">", page.page_num);
        for (index, item) in page.items.iter().enumerate() {
            let _ = write!(
                xml,
                "    <textItem id=\"{}\" x=\"{}\" y=\"{}\">\n      {}\n    </textItem>\n",
                index,
                format_coordinate(item.x, precision),
                format_coordinate(item.y, precision),
                escape_text(&item.text)
            );
        }
        xml.push_str("  </page>\n");
    }

    xml.push_str("</pdf>");
    xml
}
