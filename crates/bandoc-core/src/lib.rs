//! Core library for bank document intake processing.
//!
//! This crate provides:
//! - Document classification against per-type keyword pattern tables
//! - Rule- and entity-driven field extraction (cédulas, account statements,
//!   employment letters, credit applications)
//! - Compliance validation with per-type check tables
//! - Heuristic fraud-risk scoring
//! - A processing agent that sequences the stages and owns the document
//!   lifecycle state machine

pub mod agent;
pub mod classifier;
pub mod entities;
pub mod error;
pub mod extractor;
pub mod fraud;
pub mod models;
pub mod patterns;
pub mod store;
pub mod text;
pub mod validator;

pub use error::{AnnotationError, BandocError, ModelError, Result, TextError};
pub use models::document::{
    ClassificationResult, Document, DocumentType, ExtractionResult, FraudDetectionResult,
    ProcessingResult, ProcessingStatus, ValidationResult,
};
pub use models::config::BandocConfig;
pub use agent::{Action, DocumentAgent};
pub use classifier::{
    ClassifierModel, DocumentClassifier, ModelClassifier, ModelPrediction, PatternClassifier,
};
pub use entities::{Entity, EntityAnnotator, EntityKind};
pub use extractor::FieldExtractor;
pub use fraud::FraudDetector;
pub use patterns::PatternLibrary;
pub use store::{MemoryRepository, Repository};
pub use text::{ExtractedText, TextSource};
pub use validator::ComplianceValidator;
