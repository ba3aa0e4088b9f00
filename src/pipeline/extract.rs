//! Text extraction: walk selected pages and collect positioned text items via pdfium.
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which keeps
//! thread-local state and must not be driven from async tasks. All work runs
//! inside `tokio::task::spawn_blocking`, one page after another.

use crate::config::PageSelection;
use crate::error::Pdf2XmlError;
use crate::output::{DocumentMetadata, PageText, TextItem};
use crate::pipeline::engine;
use crate::progress::{ConversionProgressCallback, ProgressCallback};
use pdfium_render::prelude::*;
use std::sync::Arc;
use tracing::{debug, info};

/// Metadata plus the text of every selected page.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub metadata: DocumentMetadata,
    pub pages: Vec<PageText>,
}

/// Extract text items from the selected pages of an in-memory PDF.
///
/// `name` is only used in error messages.
pub async fn extract_document(
    name: &str,
    bytes: Arc<[u8]>,
    password: Option<&str>,
    selection: &PageSelection,
    progress: Option<ProgressCallback>,
) -> Result<ExtractedDocument, Pdf2XmlError> {
    let name = name.to_string();
    let password = password.map(str::to_string);
    let selection = selection.clone();

    tokio::task::spawn_blocking(move || {
        extract_blocking(
            &name,
            &bytes,
            password.as_deref(),
            &selection,
            progress.as_deref(),
        )
    })
    .await
    .map_err(|e| Pdf2XmlError::Internal(format!("Extraction task panicked: {}", e)))?
}

/// Read document metadata without touching page text.
pub async fn extract_metadata(
    name: &str,
    bytes: Arc<[u8]>,
    password: Option<&str>,
) -> Result<DocumentMetadata, Pdf2XmlError> {
    let name = name.to_string();
    let password = password.map(str::to_string);

    tokio::task::spawn_blocking(move || {
        let pdfium = engine::bind_pdfium()?;
        let document = load_document(&pdfium, &name, &bytes, password.as_deref())?;
        Ok(read_metadata(&document))
    })
    .await
    .map_err(|e| Pdf2XmlError::Internal(format!("Metadata task panicked: {}", e)))?
}

/// Blocking implementation of text extraction.
fn extract_blocking(
    name: &str,
    bytes: &[u8],
    password: Option<&str>,
    selection: &PageSelection,
    progress: Option<&dyn ConversionProgressCallback>,
) -> Result<ExtractedDocument, Pdf2XmlError> {
    let pdfium = engine::bind_pdfium()?;
    let document = load_document(&pdfium, name, bytes, password)?;
    let metadata = read_metadata(&document);
    let total_pages = metadata.page_count;
    info!("PDF loaded: {} pages", total_pages);

    let indices = resolve_indices(selection, total_pages)?;

    if let Some(cb) = progress {
        cb.on_conversion_start(indices.len());
    }

    let pages = document.pages();
    let mut results = Vec::with_capacity(indices.len());

    for idx in indices.iter().copied() {
        let page_num = idx + 1;
        if let Some(cb) = progress {
            cb.on_page_start(page_num, indices.len());
        }

        let page = pages
            .get(idx as u16)
            .map_err(|e| Pdf2XmlError::ExtractionFailed {
                page: page_num,
                detail: format!("{:?}", e),
            })?;

        let text = page.text().map_err(|e| Pdf2XmlError::ExtractionFailed {
            page: page_num,
            detail: format!("{:?}", e),
        })?;

        let items: Vec<TextItem> = text
            .segments()
            .iter()
            .map(|segment| {
                let bounds = segment.bounds();
                let (x, y) = baseline_origin(&segment)
                    .unwrap_or((bounds.left().value, bounds.bottom().value));
                TextItem {
                    text: normalize_line_breaks(segment.text()),
                    x,
                    y,
                    width: bounds.right().value - bounds.left().value,
                    height: bounds.top().value - bounds.bottom().value,
                }
            })
            .collect();

        debug!("Page {} → {} text items", page_num, items.len());
        if let Some(cb) = progress {
            cb.on_page_complete(page_num, indices.len(), items.len());
        }

        results.push(PageText { page_num, items });
    }

    Ok(ExtractedDocument {
        metadata,
        pages: results,
    })
}

/// Line breaks inside a run are stored as `\n`.
fn normalize_line_breaks(text: String) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text
    }
}

/// Origin of the segment's first glyph: its left edge on the text baseline.
fn baseline_origin(segment: &PdfPageTextSegment) -> Option<(f32, f32)> {
    let chars = segment.chars().ok()?;
    let first = chars.iter().next()?;
    let (x, y) = first.origin().ok()?;
    Some((x.value, y.value))
}

fn load_document<'a>(
    pdfium: &'a Pdfium,
    name: &str,
    bytes: &'a [u8],
    password: Option<&str>,
) -> Result<PdfDocument<'a>, Pdf2XmlError> {
    pdfium
        .load_pdf_from_byte_slice(bytes, password)
        .map_err(|e| classify_load_error(name, password.is_some(), format!("{:?}", e)))
}

/// pdfium reports password problems through the same error type as parse
/// failures; tell them apart by the error text.
fn classify_load_error(name: &str, had_password: bool, detail: String) -> Pdf2XmlError {
    if detail.contains("Password") || detail.contains("password") {
        if had_password {
            Pdf2XmlError::WrongPassword {
                name: name.to_string(),
            }
        } else {
            Pdf2XmlError::PasswordRequired {
                name: name.to_string(),
            }
        }
    } else {
        Pdf2XmlError::CorruptPdf {
            name: name.to_string(),
            detail,
        }
    }
}

fn read_metadata(document: &PdfDocument<'_>) -> DocumentMetadata {
    let metadata = document.metadata();

    let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
        metadata.get(tag).and_then(|t| {
            let v = t.value().to_string();
            if v.is_empty() {
                None
            } else {
                Some(v)
            }
        })
    };

    DocumentMetadata {
        title: get_meta(PdfDocumentMetadataTagType::Title),
        author: get_meta(PdfDocumentMetadataTagType::Author),
        subject: get_meta(PdfDocumentMetadataTagType::Subject),
        creator: get_meta(PdfDocumentMetadataTagType::Creator),
        producer: get_meta(PdfDocumentMetadataTagType::Producer),
        page_count: document.pages().len() as usize,
        pdf_version: format!("{:?}", document.version()),
    }
}

/// Page number to report when a selection matches nothing.
/// 0-based page indices to extract.
///
/// `All` on an empty document yields no pages; an explicit selection that
/// matches nothing is an error.
fn resolve_indices(
    selection: &PageSelection,
    total_pages: usize,
) -> Result<Vec<usize>, Pdf2XmlError> {
    let indices = selection.to_indices(total_pages);
    if indices.is_empty() && !matches!(selection, PageSelection::All) {
        return Err(Pdf2XmlError::PageOutOfRange {
            page: first_requested_page(selection),
            total: total_pages,
        });
    }
    Ok(indices)
}

fn first_requested_page(selection: &PageSelection) -> usize {
    match selection {
        PageSelection::All => 0,
        PageSelection::Single(p) => *p,
        PageSelection::Range(start, _) => *start,
        PageSelection::Set(pages) => pages.iter().copied().min().unwrap_or(0),
    }
}
