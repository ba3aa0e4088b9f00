//! pdfium library binding.
//!
//! Lookup order:
//! 1. `PDFIUM_LIB_PATH` — either the library file itself or a directory
//!    containing the platform library (`libpdfium.so`, `libpdfium.dylib`,
//!    `pdfium.dll`)
//! 2. the current working directory
//! 3. the system library search path

use crate::error::Pdf2XmlError;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming an explicit pdfium library.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Bind to a pdfium library, trying each location in turn.
pub fn bind_pdfium() -> Result<Pdfium, Pdf2XmlError> {
    let mut attempts: Vec<String> = Vec::new();

    if let Some(path) = env_library_path() {
        match Pdfium::bind_to_library(&path) {
            Ok(bindings) => {
                debug!("Bound pdfium from {}", path.display());
                return Ok(Pdfium::new(bindings));
            }
            Err(e) => attempts.push(format!("{}: {e}", path.display())),
        }
    }

    let local = Pdfium::pdfium_platform_library_name_at_path("./");
    match Pdfium::bind_to_library(&local) {
        Ok(bindings) => {
            debug!("Bound pdfium from {}", local.display());
            return Ok(Pdfium::new(bindings));
        }
        Err(e) => attempts.push(format!("{}: {e}", local.display())),
    }

    match Pdfium::bind_to_system_library() {
        Ok(bindings) => {
            debug!("Bound system pdfium library");
            Ok(Pdfium::new(bindings))
        }
        Err(e) => {
            attempts.push(format!("system library: {e}"));
            Err(Pdf2XmlError::PdfiumBindingFailed(attempts.join("; ")))
        }
    }
}

/// Resolve `PDFIUM_LIB_PATH` to a library file, if set and non-empty.
fn env_library_path() -> Option<PathBuf> {
    let raw = std::env::var(PDFIUM_LIB_PATH_ENV).ok()?;
    if raw.trim().is_empty() {
        return None;
    }
    Some(library_file(Path::new(raw.trim())))
}

/// Directories are expanded to the platform library name inside them.
fn library_file(path: &Path) -> PathBuf {
    if path.is_dir() {
        Pdfium::pdfium_platform_library_name_at_path(path)
    } else {
        path.to_path_buf()
    }
}
