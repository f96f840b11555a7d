//! Error types for the bandoc-core library.

use thiserror::Error;

/// Main error type for the bandoc library.
#[derive(Error, Debug)]
pub enum BandocError {
    /// Raw-text extraction error from the OCR boundary.
    #[error("text extraction error: {0}")]
    Text(#[from] TextError),

    /// Entity annotation error from the NLP boundary.
    #[error("annotation error: {0}")]
    Annotation(#[from] AnnotationError),

    /// Classification model artifact error.
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the external text-extraction engine.
#[derive(Error, Debug)]
pub enum TextError {
    /// The file format is not handled by the engine.
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// The engine produced no text at all.
    #[error("no text content in document")]
    Empty,

    /// The engine itself failed.
    #[error("text engine failure: {0}")]
    Engine(String),
}

/// Errors from the external entity-annotation engine.
#[derive(Error, Debug)]
pub enum AnnotationError {
    /// The engine itself failed.
    #[error("annotation engine failure: {0}")]
    Engine(String),
}

/// Errors from a statistical classification model artifact.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The artifact file is missing.
    #[error("model artifact not found: {0}")]
    NotFound(String),

    /// The artifact could not be decoded.
    #[error("model artifact is corrupt: {0}")]
    Corrupt(String),

    /// Prediction failed at inference time.
    #[error("prediction failed: {0}")]
    Predict(String),
}

/// Result type for the bandoc library.
pub type Result<T> = std::result::Result<T, BandocError>;
