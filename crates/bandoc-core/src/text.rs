//! Boundary to the external raw-text extraction engine.
//!
//! The pipeline consumes pre-extracted text; OCR engines, PDF readers and
//! word-processor parsers live behind this trait in the hosting system.

use crate::error::TextError;
use crate::models::document::Document;

/// Raw text returned by the extraction engine for one document.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    /// Extracted text content.
    pub text: String,

    /// Engine confidence in the extraction (0.0 - 1.0).
    pub confidence: f32,
}

impl ExtractedText {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}

/// Trait for text extraction engines.
pub trait TextSource: Send + Sync {
    /// Extract raw text for the given document.
    fn extract(&self, document: &Document) -> Result<ExtractedText, TextError>;
}
