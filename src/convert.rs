//! Conversion entry points.
//!
//! Every entry point funnels into [`convert_file`]: extract the page text,
//! build the XML document, re-indent it. The whole document is produced in
//! memory before anything is returned or written.

use crate::config::ConversionConfig;
use crate::error::Pdf2XmlError;
use crate::output::{ConversionOutput, ConversionStats, DocumentMetadata};
use crate::pipeline::format::{format_xml, FormatOptions};
use crate::pipeline::input::{CandidateFile, PDF_MIME};
use crate::pipeline::{extract, xml};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Fallback download name when the input has no usable name.
pub const DEFAULT_OUTPUT_NAME: &str = "converted.xml";

/// Convert a local PDF file to XML.
///
/// # Errors
/// - File not found / permission denied
/// - pdfium could not load the document or a page
/// - The page selection matches no page
pub async fn convert(
    path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2XmlError> {
    let file = CandidateFile::from_path(path).await?;
    convert_file(&file, config).await
}

/// Convert PDF bytes held in memory.
///
/// # Example
/// ```rust,no_run
/// use edgequake_pdf2xml::{convert_from_bytes, ConversionConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let bytes: Vec<u8> = std::fs::read("document.pdf")?;
/// let output = convert_from_bytes("document.pdf", bytes, &ConversionConfig::default()).await?;
/// println!("{}", output.xml);
/// # Ok(())
/// # }
/// ```
pub async fn convert_from_bytes(
    name: impl Into<String>,
    bytes: impl Into<Arc<[u8]>>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2XmlError> {
    let file = CandidateFile::new(name, Some(PDF_MIME.to_string()), bytes);
    convert_file(&file, config).await
}

/// Convert an already staged file.
///
/// The content type is not checked here; callers that accept untrusted
/// input should gate on [`CandidateFile::is_pdf`] first.
pub async fn convert_file(
    file: &CandidateFile,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2XmlError> {
    let result = run_conversion(file, config).await;
    if let (Err(e), Some(cb)) = (&result, &config.progress_callback) {
        cb.on_conversion_failed(&e.to_string());
    }
    result
}

async fn run_conversion(
    file: &CandidateFile,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2XmlError> {
    let total_start = Instant::now();
    info!("Starting conversion: {} ({} bytes)", file.name, file.len());

    // ── Step 1: Extract page text ────────────────────────────────────────
    let extract_start = Instant::now();
    let extracted = extract::extract_document(
        &file.name,
        Arc::clone(&file.bytes),
        config.password.as_deref(),
        &config.pages,
        config.progress_callback.clone(),
    )
    .await?;
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;

    // ── Step 2: Build and format the document ────────────────────────────
    let raw = xml::build_document(
        &file.name,
        extracted.metadata.page_count,
        &extracted.pages,
        config.coordinate_precision,
    );
    let xml = format_xml(
        &raw,
        FormatOptions {
            indent: config.indent,
            line_ending: config.line_ending,
        },
    );
    debug!("Rendered {} bytes of XML", xml.len());

    let text_items = extracted.pages.iter().map(|p| p.items.len()).sum();
    let stats = ConversionStats {
        total_pages: extracted.metadata.page_count,
        converted_pages: extracted.pages.len(),
        text_items,
        extract_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Conversion complete: {}/{} pages, {} text items, {}ms total",
        stats.converted_pages, stats.total_pages, stats.text_items, stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(stats.converted_pages);
    }

    Ok(ConversionOutput {
        filename: file.name.clone(),
        xml,
        pages: extracted.pages,
        metadata: extracted.metadata,
        stats,
    })
}

/// Convert a PDF and write the XML directly to a file.
pub async fn convert_to_file(
    path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionStats, Pdf2XmlError> {
    let output = convert(path, config).await?;
    write_atomic(output_path.as_ref(), &output.xml).await?;
    Ok(output.stats)
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2XmlError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Pdf2XmlError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(path, config))
}

/// Read PDF metadata without extracting any page text.
pub async fn inspect(
    path: impl AsRef<Path>,
    password: Option<&str>,
) -> Result<DocumentMetadata, Pdf2XmlError> {
    let file = CandidateFile::from_path(path).await?;
    extract::extract_metadata(&file.name, Arc::clone(&file.bytes), password).await
}

/// Derive the download name for a converted file.
///
/// A `.pdf` extension (any case) becomes `.xml`; any other name gets `.xml`
/// appended. Empty names fall back to [`DEFAULT_OUTPUT_NAME`].
pub fn output_file_name(input_name: &str) -> String {
    let base = Path::new(input_name.trim())
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if base.is_empty() {
        return DEFAULT_OUTPUT_NAME.to_string();
    }

    let path = Path::new(&base);
    let is_pdf = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);

    if is_pdf {
        path.with_extension("xml").to_string_lossy().into_owned()
    } else {
        format!("{base}.xml")
    }
}

/// Write `contents` to `path` via a temp file in the same directory plus rename.
pub(crate) async fn write_atomic(path: &Path, contents: &str) -> Result<PathBuf, Pdf2XmlError> {
    let write_err = |source: std::io::Error| Pdf2XmlError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    tokio::fs::create_dir_all(&parent).await.map_err(write_err)?;

    let target = path.to_path_buf();
    let data = contents.as_bytes().to_vec();
    tokio::task::spawn_blocking(move || -> std::io::Result<()> {
        use std::io::Write;
        let mut tmp = tempfile::NamedTempFile::new_in(&parent)?;
        tmp.write_all(&data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&target).map_err(|e| e.error)?;
        Ok(())
    })
    .await
    .map_err(|e| Pdf2XmlError::Internal(format!("Write task panicked: {}", e)))?
    .map_err(write_err)?;

    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(path.to_path_buf())
}
