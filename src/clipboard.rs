//! Clipboard sinks for the "copy" action.
//!
//! [`Osc52Clipboard`] sets the system clipboard through the terminal: it
//! writes an OSC 52 escape sequence carrying the base64 payload, which
//! terminal emulators (and tmux with `set-clipboard on`) forward to the host
//! clipboard. This works over SSH and needs no display server.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::io::{self, Write};
use tracing::debug;

/// Destination for copied text.
pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> io::Result<()>;
}

/// Writes `ESC ] 52 ; c ; <base64> BEL` to the wrapped writer.
pub struct Osc52Clipboard<W: Write> {
    writer: W,
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl Osc52Clipboard<io::Stderr> {
    /// Clipboard backed by the process's stderr.
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

/// Encode `text` as a complete OSC 52 sequence.
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text.as_bytes()))
}

impl<W: Write> ClipboardSink for Osc52Clipboard<W> {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        let seq = osc52_sequence(text);
        debug!("OSC 52 copy: {} bytes → {} byte sequence", text.len(), seq.len());
        self.writer.write_all(seq.as_bytes())?;
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_wraps_base64_payload() {
        assert_eq!(osc52_sequence("hi"), "\x1b]52;c;aGk=\x07");
    }

    #[test]
    fn sink_writes_sequence() {
        let mut sink = Osc52Clipboard::new(Vec::new());
        sink.write_text("<pdf/>").unwrap();
        let written = String::from_utf8(sink.into_inner()).unwrap();
        assert!(written.starts_with("\x1b]52;c;"));
        assert!(written.ends_with('\x07'));

        let payload = &written["\x1b]52;c;".len()..written.len() - 1];
        let decoded = STANDARD.decode(payload).unwrap();
        assert_eq!(decoded, b"<pdf/>");
    }
}
