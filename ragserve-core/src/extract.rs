//! Text extraction seam.
//!
//! Extraction is an external collaborator to the RAG pipeline: given raw
//! upload bytes and a filename, produce plain text or fail. The built-in
//! [`PlainTextExtractor`] handles plain-text uploads; richer formats (PDF
//! and friends) plug in behind the same trait.

use std::path::Path;

use crate::error::{RagError, Result};

/// Turns raw document bytes into plain text.
pub trait TextExtractor: Send + Sync {
    /// Extract text from `bytes`.
    ///
    /// # Errors
    ///
    /// [`RagError::UnsupportedFormat`] if this extractor does not handle
    /// the file type, [`RagError::ExtractionError`] if a supported file
    /// cannot be decoded.
    fn extract(&self, filename: &str, bytes: &[u8]) -> Result<String>;
}

/// Extractor for plain-text uploads (`.txt`, `.md`).
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    /// Create a new plain-text extractor.
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("txt") | Some("md") => {
                std::str::from_utf8(bytes).map(str::to_string).map_err(|e| {
                    RagError::ExtractionError {
                        filename: filename.to_string(),
                        message: format!("file is not valid UTF-8: {e}"),
                    }
                })
            }
            _ => Err(RagError::UnsupportedFormat { filename: filename.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_txt_and_md() {
        let extractor = PlainTextExtractor::new();
        assert_eq!(extractor.extract("notes.txt", b"hello").unwrap(), "hello");
        assert_eq!(extractor.extract("README.MD", b"# title").unwrap(), "# title");
    }

    #[test]
    fn rejects_unknown_extensions() {
        let extractor = PlainTextExtractor::new();
        let err = extractor.extract("slides.pdf", b"%PDF-1.4").unwrap_err();
        assert!(matches!(err, RagError::UnsupportedFormat { .. }));
        assert!(extractor.extract("archive", b"data").is_err());
    }

    #[test]
    fn surfaces_invalid_utf8_with_filename() {
        let extractor = PlainTextExtractor::new();
        match extractor.extract("broken.txt", &[0xff, 0xfe, 0x00]) {
            Err(RagError::ExtractionError { filename, .. }) => assert_eq!(filename, "broken.txt"),
            other => panic!("expected ExtractionError, got {other:?}"),
        }
    }
}
