//! # edgequake-pdf2xml
//!
//! Convert PDF documents to a positioned-text XML document.
//!
//! Each page's text layer is read through pdfium. Every text run becomes a
//! `<textItem>` carrying its x/y placement in PDF user space, and the result
//! is pretty-printed for reading, copying or saving.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input    read the file into memory, tag its MIME type
//!  ├─ 2. Extract  walk pages and text segments via pdfium (spawn_blocking)
//!  ├─ 3. Build    fixed-shape XML with escaped text
//!  ├─ 4. Format   re-indent to the configured width / line ending
//!  └─ 5. Output   XML string + per-page items + stats
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_pdf2xml::{convert, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let output = convert("document.pdf", &ConversionConfig::default()).await?;
//!     println!("{}", output.xml);
//!     eprintln!("{} text items on {} pages",
//!         output.stats.text_items,
//!         output.stats.converted_pages);
//!     Ok(())
//! }
//! ```
//!
//! ## Sessions
//!
//! [`Session`] models the interactive flow of a converter page: stage a file
//! by drop (PDF only) or picker, convert it, then copy or download the XML.
//!
//! ```rust,no_run
//! use edgequake_pdf2xml::{CandidateFile, Osc52Clipboard, Session};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = Session::default();
//! let file = CandidateFile::from_path("paper.pdf").await?;
//! if session.drop_files(vec![file]) {
//!     session.convert().await?;
//!     session.copy_to(&mut Osc52Clipboard::stderr());
//!     session.download(".").await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2xml` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! The pdfium shared library is located at runtime: `PDFIUM_LIB_PATH`, then
//! the working directory, then the system library path.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod clipboard;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use clipboard::{ClipboardSink, Osc52Clipboard};
pub use config::{ConversionConfig, ConversionConfigBuilder, LineEnding, PageSelection};
pub use convert::{
    convert, convert_file, convert_from_bytes, convert_sync, convert_to_file, inspect,
    output_file_name,
};
pub use error::Pdf2XmlError;
pub use output::{ConversionOutput, ConversionStats, DocumentMetadata, PageText, TextItem};
pub use pipeline::format::{format_xml, FormatOptions};
pub use pipeline::input::{CandidateFile, PDF_MIME};
pub use pipeline::xml::{build_document, escape_text};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use session::{Session, Status, StatusKind};
