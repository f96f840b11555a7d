//! Document and per-stage result models.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Supported bank document types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Cédula de ciudadanía (national ID card).
    Cedula,
    /// Passport.
    Pasaporte,
    /// Driver's license.
    Licencia,
    /// RUT (tax registry certificate).
    Rut,
    /// Bank account statement.
    EstadoCuenta,
    /// Employment certification letter.
    CartaLaboral,
    /// Income tax declaration.
    DeclaracionRenta,
    /// Credit application form.
    SolicitudCredito,
    /// Contract.
    Contrato,
    /// Promissory note.
    Pagare,
}

impl DocumentType {
    /// All document types, in canonical order. Scoring ties break toward
    /// the earlier entry.
    pub const ALL: [DocumentType; 10] = [
        DocumentType::Cedula,
        DocumentType::Pasaporte,
        DocumentType::Licencia,
        DocumentType::Rut,
        DocumentType::EstadoCuenta,
        DocumentType::CartaLaboral,
        DocumentType::DeclaracionRenta,
        DocumentType::SolicitudCredito,
        DocumentType::Contrato,
        DocumentType::Pagare,
    ];

    /// Stable identifier used in configuration and rule tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Cedula => "cedula",
            DocumentType::Pasaporte => "pasaporte",
            DocumentType::Licencia => "licencia",
            DocumentType::Rut => "rut",
            DocumentType::EstadoCuenta => "estado_cuenta",
            DocumentType::CartaLaboral => "carta_laboral",
            DocumentType::DeclaracionRenta => "declaracion_renta",
            DocumentType::SolicitudCredito => "solicitud_credito",
            DocumentType::Contrato => "contrato",
            DocumentType::Pagare => "pagare",
        }
    }

    /// Human-readable Spanish name.
    pub fn display_name(&self) -> &'static str {
        match self {
            DocumentType::Cedula => "Cédula de Ciudadanía",
            DocumentType::Pasaporte => "Pasaporte",
            DocumentType::Licencia => "Licencia de Conducir",
            DocumentType::Rut => "RUT",
            DocumentType::EstadoCuenta => "Estado de Cuenta",
            DocumentType::CartaLaboral => "Carta Laboral",
            DocumentType::DeclaracionRenta => "Declaración de Renta",
            DocumentType::SolicitudCredito => "Solicitud de Crédito",
            DocumentType::Contrato => "Contrato",
            DocumentType::Pagare => "Pagaré",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle states of a document inside the pipeline.
///
/// Transitions within a single processing run are one-directional:
/// `pending -> processing -> {completed, failed, rejected}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Rejected,
}

impl ProcessingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingStatus::Pending => "pending",
            ProcessingStatus::Processing => "processing",
            ProcessingStatus::Completed => "completed",
            ProcessingStatus::Failed => "failed",
            ProcessingStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document received for processing.
///
/// `document_type` and `status` are the only fields the pipeline mutates;
/// everything else is origin metadata owned by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document identifier.
    pub id: String,

    /// Original file name.
    pub filename: String,

    /// Path to the stored file.
    pub file_path: String,

    /// Classified document type, set by the classification stage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<DocumentType>,

    /// Current lifecycle status.
    pub status: ProcessingStatus,

    /// Upload timestamp.
    pub uploaded_at: DateTime<Utc>,

    /// Timestamp of the last completed processing run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,

    /// File size in bytes.
    pub file_size: u64,

    /// Declared MIME type.
    pub mime_type: String,
}

impl Document {
    /// Create a pending document from origin metadata.
    pub fn new(
        id: impl Into<String>,
        filename: impl Into<String>,
        file_path: impl Into<String>,
        file_size: u64,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            filename: filename.into(),
            file_path: file_path.into(),
            document_type: None,
            status: ProcessingStatus::Pending,
            uploaded_at: Utc::now(),
            processed_at: None,
            file_size,
            mime_type: mime_type.into(),
        }
    }
}

/// Result of document classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Best-scoring document type.
    pub document_type: DocumentType,

    /// Classification confidence (0.0 - 1.0).
    pub confidence: f32,

    /// Optional trace of how the decision was reached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

/// Result of field extraction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Extracted fields, keyed by canonical field name.
    pub fields: HashMap<String, String>,

    /// Per-field confidence scores. Every key here is also present in
    /// `fields`.
    pub confidence_scores: HashMap<String, f32>,

    /// Truncated echo of the source text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,

    /// Fields projected onto the document type's expected-field list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_data: Option<HashMap<String, String>>,
}

impl ExtractionResult {
    /// Mean of all field confidences, or None when nothing was scored.
    pub fn mean_confidence(&self) -> Option<f32> {
        if self.confidence_scores.is_empty() {
            return None;
        }
        let sum: f32 = self.confidence_scores.values().sum();
        Some(sum / self.confidence_scores.len() as f32)
    }
}

/// Result of compliance validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True iff no errors were recorded. Warnings never affect validity.
    pub is_valid: bool,

    /// Compliance errors.
    pub errors: Vec<String>,

    /// Compliance warnings.
    pub warnings: Vec<String>,

    /// Compliance score (0.0 - 1.0).
    pub compliance_score: f32,
}

/// Result of fraud-risk analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudDetectionResult {
    /// True iff `risk_score` exceeds the fraud threshold.
    pub is_fraudulent: bool,

    /// Accumulated risk score (0.0 - 1.0).
    pub risk_score: f32,

    /// Triggered risk signals.
    pub risk_factors: Vec<String>,

    /// Suggested follow-up actions for the reviewer.
    pub recommendations: Vec<String>,
}

/// Aggregate result of one processing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingResult {
    /// The processed document, including its final status.
    pub document: Document,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<ClassificationResult>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction: Option<ExtractionResult>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationResult>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fraud_detection: Option<FraudDetectionResult>,

    /// Wall-clock processing time in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,

    /// Errors accumulated across stages.
    pub errors: Vec<String>,
}

impl ProcessingResult {
    /// Create an empty result for a document.
    pub fn new(document: Document) -> Self {
        Self {
            document,
            classification: None,
            extraction: None,
            validation: None,
            fraud_detection: None,
            processing_time_ms: None,
            errors: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_document_starts_pending() {
        let doc = Document::new("doc-1", "cedula.txt", "/tmp/cedula.txt", 128, "text/plain");
        assert_eq!(doc.status, ProcessingStatus::Pending);
        assert!(doc.document_type.is_none());
        assert!(doc.processed_at.is_none());
    }

    #[test]
    fn test_document_type_serializes_snake_case() {
        let json = serde_json::to_string(&DocumentType::EstadoCuenta).unwrap();
        assert_eq!(json, "\"estado_cuenta\"");

        let back: DocumentType = serde_json::from_str("\"carta_laboral\"").unwrap();
        assert_eq!(back, DocumentType::CartaLaboral);
    }

    #[test]
    fn test_mean_confidence() {
        let mut extraction = ExtractionResult::default();
        assert_eq!(extraction.mean_confidence(), None);

        extraction
            .confidence_scores
            .insert("numero_documento".to_string(), 0.8);
        extraction.confidence_scores.insert("nombres".to_string(), 0.6);

        let mean = extraction.mean_confidence().unwrap();
        assert!((mean - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_canonical_order_covers_all_types() {
        assert_eq!(DocumentType::ALL.len(), 10);
        assert_eq!(DocumentType::ALL[0], DocumentType::Cedula);
        assert_eq!(DocumentType::ALL[9], DocumentType::Pagare);
    }
}
