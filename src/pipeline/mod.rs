//! Pipeline stages for PDF-to-XML conversion.
//!
//! Each submodule implements exactly one transformation step.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ xml ──▶ format
//! (bytes)   (pdfium)    (build) (indent)
//! ```
//!
//! 1. [`input`]   — read the staged file into memory and tag its MIME type
//! 2. [`extract`] — walk selected pages through pdfium on a blocking thread
//!    ([`engine`] binds the shared library)
//! 3. [`xml`]     — emit the fixed-shape document with escaped text
//! 4. [`format`]  — re-indent to the configured width and line ending

pub mod engine;
pub mod extract;
pub mod format;
pub mod input;
pub mod xml;
