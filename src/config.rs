//! Configuration types for PDF-to-XML conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Callers set only what they care about
//! and rely on the documented defaults for the rest.

use crate::error::Pdf2XmlError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest accepted indentation width, in spaces.
pub const MAX_INDENT: usize = 8;

/// Largest accepted number of decimals for coordinates.
pub const MAX_COORDINATE_PRECISION: usize = 6;

/// Configuration for a PDF-to-XML conversion.
///
/// # Example
/// ```rust
/// use edgequake_pdf2xml::{ConversionConfig, LineEnding, PageSelection};
///
/// let config = ConversionConfig::builder()
///     .pages(PageSelection::Range(1, 3))
///     .indent(4)
///     .line_ending(LineEnding::Crlf)
///     .build()
///     .unwrap();
/// assert_eq!(config.indent, 4);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Page selection. Default: all pages.
    pub pages: PageSelection,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Spaces per nesting level in the formatted output. Range: 0–8. Default: 2.
    pub indent: usize,

    /// Line terminator of the formatted output. Default: LF.
    pub line_ending: LineEnding,

    /// Fixed number of decimals for `x`/`y` attributes.
    ///
    /// `None` (default) writes the shortest decimal that round-trips, so a
    /// coordinate of exactly 72 pt is written as `72`.
    pub coordinate_precision: Option<usize>,

    /// Optional per-page progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            pages: PageSelection::default(),
            password: None,
            indent: 2,
            line_ending: LineEnding::default(),
            coordinate_precision: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("pages", &self.pages)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("indent", &self.indent)
            .field("line_ending", &self.line_ending)
            .field("coordinate_precision", &self.coordinate_precision)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn indent(mut self, spaces: usize) -> Self {
        self.config.indent = spaces;
        self
    }

    pub fn line_ending(mut self, ending: LineEnding) -> Self {
        self.config.line_ending = ending;
        self
    }

    pub fn coordinate_precision(mut self, decimals: usize) -> Self {
        self.config.coordinate_precision = Some(decimals);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdf2XmlError> {
        let c = &self.config;
        if c.indent > MAX_INDENT {
            return Err(Pdf2XmlError::InvalidConfig(format!(
                "Indent must be 0–{MAX_INDENT}, got {}",
                c.indent
            )));
        }
        if let Some(p) = c.coordinate_precision {
            if p > MAX_COORDINATE_PRECISION {
                return Err(Pdf2XmlError::InvalidConfig(format!(
                    "Coordinate precision must be 0–{MAX_COORDINATE_PRECISION}, got {p}"
                )));
            }
        }
        if let PageSelection::Range(start, end) = c.pages {
            if start > end {
                return Err(Pdf2XmlError::InvalidConfig(format!(
                    "Page range {start}-{end} is empty"
                )));
            }
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Specifies which pages of the PDF to convert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// Convert all pages (default).
    #[default]
    All,
    /// Convert a single page (1-indexed).
    Single(usize),
    /// Convert a contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Convert specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed page numbers.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if *p >= 1 && *p <= total_pages {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|&&p| p >= 1 && p <= total_pages)
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}

/// Line terminator used between formatted lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineEnding {
    /// `\n` (default)
    #[default]
    Lf,
    /// `\r\n`
    Crlf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = ConversionConfig::default();
        assert_eq!(c.indent, 2);
        assert_eq!(c.line_ending, LineEnding::Lf);
        assert_eq!(c.coordinate_precision, None);
        assert_eq!(c.pages, PageSelection::All);
    }

    #[test]
    fn builder_rejects_wide_indent() {
        let err = ConversionConfig::builder().indent(12).build().unwrap_err();
        assert!(matches!(err, Pdf2XmlError::InvalidConfig(_)));
    }

    #[test]
    fn builder_rejects_excess_precision() {
        let err = ConversionConfig::builder()
            .coordinate_precision(9)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("precision"));
    }

    #[test]
    fn builder_rejects_inverted_range() {
        assert!(ConversionConfig::builder()
            .pages(PageSelection::Range(5, 2))
            .build()
            .is_err());
    }

    #[test]
    fn debug_redacts_password() {
        let c = ConversionConfig::builder()
            .password("hunter2")
            .build()
            .unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn page_selection_to_indices() {
        assert_eq!(PageSelection::All.to_indices(5), vec![0, 1, 2, 3, 4]);
        assert_eq!(PageSelection::Single(3).to_indices(5), vec![2]);
        assert_eq!(PageSelection::Single(6).to_indices(5), Vec::<usize>::new());
        assert_eq!(PageSelection::Range(2, 4).to_indices(5), vec![1, 2, 3]);
        assert_eq!(
            PageSelection::Set(vec![3, 1, 3]).to_indices(5),
            vec![0, 2] // deduplicated and sorted
        );
    }

    #[test]
    fn line_ending_strings() {
        assert_eq!(LineEnding::Lf.as_str(), "\n");
        assert_eq!(LineEnding::Crlf.as_str(), "\r\n");
    }
}
