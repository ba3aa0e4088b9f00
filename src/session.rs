//! Single-document conversion session.
//!
//! A [`Session`] holds the state behind one converter page: at most one
//! staged file, the output of the most recent successful conversion, and a
//! status line. Drag-and-drop and the file picker both feed the same staged
//! slot; only the drop path checks the content type.
//!
//! `convert` borrows the session mutably, so a second conversion cannot
//! start while one is in flight.

use crate::clipboard::ClipboardSink;
use crate::config::ConversionConfig;
use crate::convert::{self, output_file_name};
use crate::error::Pdf2XmlError;
use crate::output::ConversionOutput;
use crate::pipeline::input::CandidateFile;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Visual class of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusKind {
    Neutral,
    Success,
    Error,
}

/// The status line shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub message: String,
    pub kind: StatusKind,
}

impl Status {
    fn new(message: impl Into<String>, kind: StatusKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

pub const MSG_NOT_A_PDF: &str = "Please upload a PDF file";
pub const MSG_PROCESSING: &str = "Processing PDF...";
pub const MSG_CONVERTED: &str = "Conversion successful!";
pub const MSG_COPIED: &str = "XML copied to clipboard!";

pub struct Session {
    config: ConversionConfig,
    staged: Option<CandidateFile>,
    output: Option<ConversionOutput>,
    status: Option<Status>,
}

impl Session {
    pub fn new(config: ConversionConfig) -> Self {
        Self {
            config,
            staged: None,
            output: None,
            status: None,
        }
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    pub fn staged(&self) -> Option<&CandidateFile> {
        self.staged.as_ref()
    }

    pub fn output(&self) -> Option<&ConversionOutput> {
        self.output.as_ref()
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    /// Whether the convert action is available.
    pub fn can_convert(&self) -> bool {
        self.staged.is_some()
    }

    /// Handle files dropped onto the drop zone.
    ///
    /// Only the first file is considered, and only if it is a PDF. Otherwise
    /// the status reports the rejection and nothing is staged. Returns
    /// whether a file was staged.
    pub fn drop_files(&mut self, files: Vec<CandidateFile>) -> bool {
        match files.into_iter().next() {
            Some(file) => self.drop_file(file).is_ok(),
            None => {
                self.status = Some(Status::new(MSG_NOT_A_PDF, StatusKind::Error));
                false
            }
        }
    }

    /// Drop a single file, returning the rejection as an error.
    ///
    /// On rejection the status line and staged file behave as in
    /// [`Session::drop_files`].
    pub fn drop_file(&mut self, file: CandidateFile) -> Result<(), Pdf2XmlError> {
        if let Err(e) = file.ensure_pdf() {
            warn!("Rejected drop: {}", e);
            self.status = Some(Status::new(MSG_NOT_A_PDF, StatusKind::Error));
            return Err(e);
        }
        self.stage(file);
        Ok(())
    }

    /// Handle a file-picker selection. The first file is staged as-is; an
    /// empty selection changes nothing.
    pub fn select_files(&mut self, files: Vec<CandidateFile>) -> bool {
        match files.into_iter().next() {
            Some(file) => {
                self.stage(file);
                true
            }
            None => false,
        }
    }

    fn stage(&mut self, file: CandidateFile) {
        info!("Staged '{}' ({} bytes)", file.name, file.len());
        self.status = Some(Status::new(
            format!("File ready: {}", file.name),
            StatusKind::Success,
        ));
        self.staged = Some(file);
    }

    /// Convert the staged file.
    ///
    /// Does nothing when no file is staged. On failure the previous output,
    /// if any, is kept and the error is both reported in the status line and
    /// returned.
    pub async fn convert(&mut self) -> Result<(), Pdf2XmlError> {
        let Some(file) = self.staged.as_ref() else {
            return Ok(());
        };

        self.status = Some(Status::new(MSG_PROCESSING, StatusKind::Neutral));

        match convert::convert_file(file, &self.config).await {
            Ok(output) => {
                self.output = Some(output);
                self.status = Some(Status::new(MSG_CONVERTED, StatusKind::Success));
                Ok(())
            }
            Err(e) => {
                error!("Error converting PDF: {}", e);
                self.status = Some(Status::new(
                    format!("Error converting PDF: {e}"),
                    StatusKind::Error,
                ));
                Err(e)
            }
        }
    }

    /// Copy the rendered XML to `sink`. Does nothing without output.
    pub fn copy_to(&mut self, sink: &mut dyn ClipboardSink) -> bool {
        let Some(output) = self.output.as_ref() else {
            return false;
        };

        match sink.write_text(&output.xml) {
            Ok(()) => {
                self.status = Some(Status::new(MSG_COPIED, StatusKind::Success));
                true
            }
            Err(e) => {
                self.status = Some(Status::new(
                    format!("Failed to copy: {e}"),
                    StatusKind::Error,
                ));
                false
            }
        }
    }

    /// Save the rendered XML into `dir` under the name derived from the
    /// converted file. Returns `Ok(None)` and writes nothing without output.
    pub async fn download(&self, dir: impl AsRef<Path>) -> Result<Option<PathBuf>, Pdf2XmlError> {
        let Some(output) = self.output.as_ref() else {
            return Ok(None);
        };
        let path = dir.as_ref().join(output_file_name(&output.filename));
        convert::write_atomic(&path, &output.xml).await.map(Some)
    }

    /// Save the rendered XML to an explicit path. Same no-op rule as [`Session::download`].
    pub async fn save_as(&self, path: impl AsRef<Path>) -> Result<Option<PathBuf>, Pdf2XmlError> {
        let Some(output) = self.output.as_ref() else {
            return Ok(None);
        };
        convert::write_atomic(path.as_ref(), &output.xml).await.map(Some)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(ConversionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{ConversionStats, DocumentMetadata};
    use crate::pipeline::input::PDF_MIME;
    use std::io;

    fn pdf(name: &str) -> CandidateFile {
        CandidateFile::new(name, Some(PDF_MIME.into()), b"%PDF-1.4".to_vec())
    }

    fn text(name: &str) -> CandidateFile {
        CandidateFile::new(name, Some("text/plain".into()), b"hello".to_vec())
    }

    fn fake_output(filename: &str) -> ConversionOutput {
        ConversionOutput {
            filename: filename.to_string(),
            xml: "<pdf>\n</pdf>".to_string(),
            pages: vec![],
            metadata: DocumentMetadata::default(),
            stats: ConversionStats::default(),
        }
    }

    struct RecordingSink(Vec<String>);

    impl ClipboardSink for RecordingSink {
        fn write_text(&mut self, text: &str) -> io::Result<()> {
            self.0.push(text.to_string());
            Ok(())
        }
    }

    struct BrokenSink;

    impl ClipboardSink for BrokenSink {
        fn write_text(&mut self, _text: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "no terminal"))
        }
    }

    #[test]
    fn drop_pdf_stages_file() {
        let mut s = Session::default();
        assert!(s.drop_files(vec![pdf("a.pdf")]));
        assert_eq!(s.staged().unwrap().name, "a.pdf");
        assert!(s.can_convert());
        let status = s.status().unwrap();
        assert_eq!(status.message, "File ready: a.pdf");
        assert_eq!(status.kind, StatusKind::Success);
    }

    #[test]
    fn drop_non_pdf_is_rejected() {
        let mut s = Session::default();
        assert!(!s.drop_files(vec![text("notes.txt")]));
        assert!(s.staged().is_none());
        assert!(!s.can_convert());
        let status = s.status().unwrap();
        assert_eq!(status.message, MSG_NOT_A_PDF);
        assert_eq!(status.kind, StatusKind::Error);
    }

    #[test]
    fn drop_file_returns_typed_rejection() {
        let mut s = Session::default();
        let err = s.drop_file(text("notes.txt")).unwrap_err();
        assert!(matches!(
            err,
            Pdf2XmlError::UnsupportedFileType { ref name, .. } if name == "notes.txt"
        ));
        assert!(s.staged().is_none());
        assert_eq!(s.status().unwrap().message, MSG_NOT_A_PDF);

        s.drop_file(pdf("a.pdf")).unwrap();
        assert_eq!(s.staged().unwrap().name, "a.pdf");
    }

    #[test]
    fn drop_only_checks_first_file() {
        let mut s = Session::default();
        assert!(!s.drop_files(vec![text("a.txt"), pdf("b.pdf")]));
        assert!(s.staged().is_none());
    }

    #[test]
    fn empty_drop_is_rejected() {
        let mut s = Session::default();
        assert!(!s.drop_files(vec![]));
        assert_eq!(s.status().unwrap().message, MSG_NOT_A_PDF);
    }

    #[test]
    fn rejected_drop_keeps_previous_file() {
        let mut s = Session::default();
        s.drop_files(vec![pdf("first.pdf")]);
        s.drop_files(vec![text("second.txt")]);
        assert_eq!(s.staged().unwrap().name, "first.pdf");
    }

    #[test]
    fn picker_skips_type_check() {
        let mut s = Session::default();
        assert!(s.select_files(vec![text("anything.bin")]));
        assert_eq!(s.staged().unwrap().name, "anything.bin");
    }

    #[test]
    fn empty_picker_selection_changes_nothing() {
        let mut s = Session::default();
        assert!(!s.select_files(vec![]));
        assert!(s.status().is_none());
    }

    #[test]
    fn new_selection_replaces_staged_file() {
        let mut s = Session::default();
        s.select_files(vec![pdf("one.pdf")]);
        s.drop_files(vec![pdf("two.pdf")]);
        assert_eq!(s.staged().unwrap().name, "two.pdf");
    }

    #[test]
    fn convert_without_file_is_noop() {
        let mut s = Session::default();
        tokio_test::block_on(s.convert()).unwrap();
        assert!(s.output().is_none());
        assert!(s.status().is_none());
    }

    #[test]
    fn copy_without_output_is_noop() {
        let mut s = Session::default();
        let mut sink = RecordingSink(vec![]);
        assert!(!s.copy_to(&mut sink));
        assert!(sink.0.is_empty());
        assert!(s.status().is_none());
    }

    #[test]
    fn copy_writes_xml_and_reports() {
        let mut s = Session::default();
        s.output = Some(fake_output("a.pdf"));
        let mut sink = RecordingSink(vec![]);
        assert!(s.copy_to(&mut sink));
        assert_eq!(sink.0, vec!["<pdf>\n</pdf>".to_string()]);
        assert_eq!(s.status().unwrap().message, MSG_COPIED);
    }

    #[test]
    fn copy_failure_is_reported() {
        let mut s = Session::default();
        s.output = Some(fake_output("a.pdf"));
        assert!(!s.copy_to(&mut BrokenSink));
        let status = s.status().unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert!(status.message.starts_with("Failed to copy: "));
        assert!(status.message.contains("no terminal"));
    }

    #[tokio::test]
    async fn download_before_conversion_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let s = Session::default();
        assert_eq!(s.download(dir.path()).await.unwrap(), None);
        assert_eq!(s.save_as(dir.path().join("x.xml")).await.unwrap(), None);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn download_uses_converted_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = Session::default();
        s.output = Some(fake_output("Quarterly.PDF"));
        // Staging a different file afterwards does not rename the download.
        s.select_files(vec![pdf("other.pdf")]);

        let path = s.download(dir.path()).await.unwrap().unwrap();
        assert_eq!(path, dir.path().join("Quarterly.xml"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "<pdf>\n</pdf>");
    }

    #[tokio::test]
    async fn failed_conversion_keeps_previous_output() {
        let mut s = Session::default();
        s.output = Some(fake_output("good.pdf"));
        // Not a loadable document: fails at pdfium binding or at load time.
        s.select_files(vec![CandidateFile::new("bad.pdf", Some(PDF_MIME.into()), b"garbage".to_vec())]);

        let err = s.convert().await.unwrap_err();
        let status = s.status().unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert_eq!(status.message, format!("Error converting PDF: {err}"));
        assert_eq!(s.output().unwrap().filename, "good.pdf");
    }
}
