//! Output types returned by the conversion entry points.

use serde::{Deserialize, Serialize};

/// One positioned string fragment from a page's content stream.
///
/// Coordinates are PDF user-space points with the origin at the bottom-left
/// corner of the page. `x`/`y` are the origin of the run's first glyph, so `y`
/// sits on the text baseline rather than below descenders. When pdfium cannot
/// report a glyph origin they fall back to the bottom-left of the run's bounds.
/// `width`/`height` always come from the bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextItem {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// All text items of one page, in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageText {
    /// 1-indexed page number.
    pub page_num: usize,
    pub items: Vec<TextItem>,
}

/// Document-level information read from the PDF.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    /// Total pages in the document, regardless of page selection.
    pub page_count: usize,
    pub pdf_version: String,
}

/// Timing and volume figures for one conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionStats {
    pub total_pages: usize,
    pub converted_pages: usize,
    pub text_items: usize,
    pub extract_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// The result of a successful conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// Name of the converted file, as staged.
    pub filename: String,
    /// The pretty-printed XML document.
    pub xml: String,
    pub pages: Vec<PageText>,
    pub metadata: DocumentMetadata,
    pub stats: ConversionStats,
}
