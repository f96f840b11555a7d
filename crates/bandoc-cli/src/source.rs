//! Host-side text source for documents that already contain plain text.
//!
//! OCR-backed sources for scans and PDFs live outside this binary; the
//! pipeline only sees the boundary trait.

use std::fs;
use std::path::Path;

use bandoc_core::error::TextError;
use bandoc_core::{Document, ExtractedText, TextSource};

/// Reads plain-text document files from disk.
pub struct FileTextSource;

impl FileTextSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileTextSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSource for FileTextSource {
    fn extract(&self, document: &Document) -> Result<ExtractedText, TextError> {
        let path = Path::new(&document.file_path);
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "txt" | "text" => {
                let text =
                    fs::read_to_string(path).map_err(|e| TextError::Engine(e.to_string()))?;
                Ok(ExtractedText::new(text, 1.0))
            }
            _ => Err(TextError::UnsupportedFormat(extension)),
        }
    }
}
