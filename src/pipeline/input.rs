//! Input acquisition: read a user-supplied file into memory.
//!
//! The whole file is read up front and held as an `Arc<[u8]>`, so the staged
//! bytes can be handed to the blocking pdfium worker without another copy.
//! The content type is guessed from the file extension only. It is never
//! sniffed from the bytes.

use crate::error::Pdf2XmlError;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// MIME type accepted by the drop zone.
pub const PDF_MIME: &str = "application/pdf";

/// A file offered by a drop or picker event.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Arc<[u8]>,
}

impl CandidateFile {
    pub fn new(
        name: impl Into<String>,
        content_type: Option<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type,
            bytes: bytes.into(),
        }
    }

    /// Read a local file into memory, guessing its MIME type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, Pdf2XmlError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => Pdf2XmlError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => Pdf2XmlError::FileNotFound {
                path: path.to_path_buf(),
            },
        })?;

        let content_type = mime_guess::from_path(path).first().map(|m| m.to_string());
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        debug!(
            "Read '{}' ({} bytes, {})",
            path.display(),
            bytes.len(),
            content_type.as_deref().unwrap_or("unknown type")
        );

        Ok(Self::new(name, content_type, bytes))
    }

    /// Whether the declared content type is `application/pdf`.
    pub fn is_pdf(&self) -> bool {
        self.content_type.as_deref() == Some(PDF_MIME)
    }

    /// Reject anything that is not tagged `application/pdf`.
    pub fn ensure_pdf(&self) -> Result<(), Pdf2XmlError> {
        if self.is_pdf() {
            Ok(())
        } else {
            Err(Pdf2XmlError::UnsupportedFileType {
                name: self.name.clone(),
                content_type: self.content_type.clone(),
            })
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
