//! Processing agent: sequences the pipeline stages and owns the document
//! lifecycle state machine.
//!
//! One `process` call drives `pending -> processing -> {completed, failed,
//! rejected}`. Stage faults surface as explicit values folded into the
//! result's error list; the agent never returns an error to its caller.

use std::time::Instant;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::classifier::{ClassifierModel, DocumentClassifier, ModelClassifier, PatternClassifier};
use crate::extractor::FieldExtractor;
use crate::fraud::FraudDetector;
use crate::models::config::BandocConfig;
use crate::models::document::{Document, ProcessingResult, ProcessingStatus};
use crate::text::TextSource;
use crate::validator::ComplianceValidator;

// Text-engine confidence below this is logged, not treated as an error.
const TEXT_CONFIDENCE_WARN: f32 = 0.3;

/// A pipeline stage that can be requested per processing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Classify,
    Extract,
    Validate,
    DetectFraud,
}

impl Action {
    /// Stages run when the caller does not request a specific set.
    pub const DEFAULT: [Action; 3] = [Action::Classify, Action::Extract, Action::Validate];
}

/// Agent that runs the interpretation pipeline over one document at a time.
pub struct DocumentAgent {
    text_source: Box<dyn TextSource>,
    classifier: Box<dyn DocumentClassifier>,
    extractor: FieldExtractor,
    validator: ComplianceValidator,
    fraud_detector: FraudDetector,
}

impl DocumentAgent {
    /// Create an agent with default components around a text source.
    pub fn new(text_source: Box<dyn TextSource>) -> Self {
        Self {
            text_source,
            classifier: Box::new(PatternClassifier::new()),
            extractor: FieldExtractor::new(),
            validator: ComplianceValidator::new(),
            fraud_detector: FraudDetector::new(),
        }
    }

    /// Create an agent whose components use the given configuration.
    pub fn from_config(text_source: Box<dyn TextSource>, config: &BandocConfig) -> Self {
        Self {
            text_source,
            classifier: Box::new(PatternClassifier::with_config(
                config.classification.clone(),
            )),
            extractor: FieldExtractor::with_config(config.extraction.clone()),
            validator: ComplianceValidator::with_config(config.validation.clone()),
            fraud_detector: FraudDetector::with_config(config.fraud.clone()),
        }
    }

    /// Replace the classifier.
    pub fn with_classifier(mut self, classifier: Box<dyn DocumentClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Replace the extractor.
    pub fn with_extractor(mut self, extractor: FieldExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Try to use a statistical classification model. An artifact that
    /// fails to load keeps the current classifier.
    pub fn with_model(self, mut model: Box<dyn ClassifierModel>) -> Self {
        if model.load() {
            info!("classification model loaded");
            self.with_classifier(Box::new(ModelClassifier::new(model)))
        } else {
            warn!("classification model unavailable, keeping pattern scoring");
            self
        }
    }

    /// Process a document with the default action set.
    pub fn process(&self, document: &mut Document) -> ProcessingResult {
        self.process_with_actions(document, &Action::DEFAULT)
    }

    /// Process a document, running only the requested stages in pipeline
    /// order.
    pub fn process_with_actions(
        &self,
        document: &mut Document,
        actions: &[Action],
    ) -> ProcessingResult {
        let start = Instant::now();
        let mut result = ProcessingResult::new(document.clone());

        document.status = ProcessingStatus::Processing;

        let Some(text) = self.obtain_text(document, &mut result.errors) else {
            return self.finish(document, result, start);
        };

        if actions.contains(&Action::Classify) {
            debug!(document = %document.id, "classifying document");
            let classification = self.classifier.classify(&text);
            document.document_type = Some(classification.document_type);
            result.classification = Some(classification);
        }

        if actions.contains(&Action::Extract) {
            if let Some(document_type) = document.document_type {
                debug!(document = %document.id, "extracting fields");
                result.extraction = Some(self.extractor.extract(&text, document_type));
            }
        }

        if actions.contains(&Action::Validate) {
            debug!(document = %document.id, "validating document");
            result.validation = Some(
                self.validator
                    .validate(result.extraction.as_ref(), document.document_type),
            );
        }

        if actions.contains(&Action::DetectFraud) {
            debug!(document = %document.id, "analyzing fraud signals");
            result.fraud_detection = Some(
                self.fraud_detector
                    .detect(&text, result.extraction.as_ref()),
            );
        }

        self.finish(document, result, start)
    }

    fn obtain_text(&self, document: &Document, errors: &mut Vec<String>) -> Option<String> {
        match self.text_source.extract(document) {
            Ok(extracted) => {
                if extracted.confidence < TEXT_CONFIDENCE_WARN {
                    warn!(
                        document = %document.id,
                        confidence = extracted.confidence,
                        "low text extraction confidence"
                    );
                }
                if extracted.text.trim().is_empty() {
                    errors.push("no text could be extracted from the document".to_string());
                    None
                } else {
                    Some(extracted.text)
                }
            }
            Err(err) => {
                errors.push(format!("text extraction failed: {err}"));
                None
            }
        }
    }

    fn finish(
        &self,
        document: &mut Document,
        mut result: ProcessingResult,
        start: Instant,
    ) -> ProcessingResult {
        document.status = if !result.errors.is_empty() {
            ProcessingStatus::Failed
        } else if result.validation.as_ref().is_some_and(|v| !v.is_valid) {
            ProcessingStatus::Rejected
        } else {
            ProcessingStatus::Completed
        };
        document.processed_at = Some(Utc::now());

        result.processing_time_ms = Some(start.elapsed().as_millis() as u64);
        result.document = document.clone();

        info!(
            document = %document.id,
            status = %document.status,
            time_ms = result.processing_time_ms,
            "document processing finished"
        );

        result
    }
}
