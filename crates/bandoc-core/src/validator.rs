//! Compliance validation of extracted fields.

use tracing::debug;

use crate::models::config::ValidationConfig;
use crate::models::document::{DocumentType, ExtractionResult, ValidationResult};
use crate::patterns::{PatternLibrary, Requirement};

/// Validator applying per-type compliance check tables.
///
/// Errors decide validity; warnings only lower the compliance score.
pub struct ComplianceValidator {
    library: &'static PatternLibrary,
    config: ValidationConfig,
}

impl ComplianceValidator {
    /// Create a validator with default thresholds.
    pub fn new() -> Self {
        Self::with_config(ValidationConfig::default())
    }

    /// Create a validator with the given thresholds.
    pub fn with_config(config: ValidationConfig) -> Self {
        Self {
            library: PatternLibrary::builtin(),
            config,
        }
    }

    /// Validate an extraction for a document type.
    ///
    /// Works without an extraction or a known type; both degrade to the
    /// strongest possible findings rather than failing.
    pub fn validate(
        &self,
        extraction: Option<&ExtractionResult>,
        document_type: Option<DocumentType>,
    ) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut score = 1.0f32;

        let Some(extraction) = extraction.filter(|e| !e.fields.is_empty()) else {
            return ValidationResult {
                is_valid: false,
                errors: vec!["no information was extracted from the document".to_string()],
                warnings,
                compliance_score: 0.0,
            };
        };

        if let Some(document_type) = document_type {
            for check in self.library.field_checks(document_type) {
                match extraction.fields.get(check.field) {
                    None => match check.requirement {
                        Requirement::Required { penalty } => {
                            errors.push(check.missing_message.to_string());
                            score -= penalty;
                        }
                        Requirement::Optional { penalty } => {
                            warnings.push(check.missing_message.to_string());
                            score -= penalty;
                        }
                    },
                    Some(value) => {
                        if let Some(min_len) = check.min_len {
                            if value.chars().count() < min_len.len {
                                errors.push(min_len.message.to_string());
                                score -= min_len.penalty;
                            }
                        }
                    }
                }
            }
        }

        let mean_confidence = extraction.mean_confidence().unwrap_or(0.0);
        if mean_confidence < self.config.low_confidence_threshold {
            warnings.push(format!("low extraction confidence: {mean_confidence:.2}"));
            score -= self.config.low_confidence_penalty;
        }

        let compliance_score = score.clamp(0.0, 1.0);
        debug!(compliance_score, error_count = errors.len(), "validation finished");

        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
            warnings,
            compliance_score,
        }
    }
}

impl Default for ComplianceValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extraction(fields: &[(&str, &str)], confidence: f32) -> ExtractionResult {
        let mut result = ExtractionResult::default();
        for (key, value) in fields {
            result.fields.insert(key.to_string(), value.to_string());
            result.confidence_scores.insert(key.to_string(), confidence);
        }
        result
    }

    #[test]
    fn test_complete_cedula_is_valid() {
        let extraction = extraction(
            &[("numero_documento", "12345678"), ("nombres", "JUAN PEREZ")],
            0.9,
        );
        let validator = ComplianceValidator::new();
        let result = validator.validate(Some(&extraction), Some(DocumentType::Cedula));

        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert_eq!(result.compliance_score, 1.0);
    }

    #[test]
    fn test_missing_document_number_is_an_error() {
        let extraction = extraction(&[("nombres", "JUAN PEREZ")], 0.9);
        let validator = ComplianceValidator::new();
        let result = validator.validate(Some(&extraction), Some(DocumentType::Cedula));

        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.contains("document number")));
        // Deducted at least the missing-required penalty from the baseline.
        assert!(result.compliance_score <= 1.0 - 0.3 + 1e-6);
    }

    #[test]
    fn test_short_document_number_is_an_error() {
        let extraction = extraction(&[("numero_documento", "123"), ("nombres", "ANA")], 0.9);
        let validator = ComplianceValidator::new();
        let result = validator.validate(Some(&extraction), Some(DocumentType::Cedula));

        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.contains("invalid")));
        assert!((result.compliance_score - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_no_extraction_scores_zero() {
        let validator = ComplianceValidator::new();
        let result = validator.validate(None, Some(DocumentType::Cedula));

        assert!(!result.is_valid);
        assert_eq!(result.compliance_score, 0.0);
        assert!(result.errors[0].contains("no information"));

        let empty = ExtractionResult::default();
        let result = validator.validate(Some(&empty), Some(DocumentType::Cedula));
        assert_eq!(result.compliance_score, 0.0);
    }

    #[test]
    fn test_missing_optional_field_is_only_a_warning() {
        let extraction = extraction(&[("numero_cuenta", "1234567890")], 0.9);
        let validator = ComplianceValidator::new();
        let result = validator.validate(Some(&extraction), Some(DocumentType::EstadoCuenta));

        assert!(result.is_valid);
        assert!(result.warnings.iter().any(|w| w.contains("balance")));
        assert!((result.compliance_score - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_low_mean_confidence_adds_warning_and_penalty() {
        let extraction = extraction(
            &[("numero_documento", "12345678"), ("nombres", "JUAN PEREZ")],
            0.4,
        );
        let validator = ComplianceValidator::new();
        let result = validator.validate(Some(&extraction), Some(DocumentType::Cedula));

        assert!(result.is_valid);
        assert!(result.warnings.iter().any(|w| w.contains("confidence")));
        assert!((result.compliance_score - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_score_never_goes_negative() {
        let mut extraction = ExtractionResult::default();
        extraction.fields.insert("otro".to_string(), "x".to_string());
        extraction.confidence_scores.insert("otro".to_string(), 0.1);

        let validator = ComplianceValidator::new();
        let result = validator.validate(Some(&extraction), Some(DocumentType::EstadoCuenta));

        // Missing account number (-0.4), missing balance (-0.1), low
        // confidence (-0.2): still clamped within range.
        assert!(!result.is_valid);
        assert!(result.compliance_score >= 0.0);
        assert!((result.compliance_score - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_unknown_type_runs_generic_checks_only() {
        let extraction = extraction(&[("campo", "valor")], 0.9);
        let validator = ComplianceValidator::new();
        let result = validator.validate(Some(&extraction), None);

        assert!(result.is_valid);
        assert_eq!(result.compliance_score, 1.0);
    }

    #[test]
    fn test_errors_never_raise_the_score() {
        let validator = ComplianceValidator::new();

        let complete = extraction(
            &[("numero_documento", "12345678"), ("nombres", "JUAN")],
            0.9,
        );
        let baseline = validator
            .validate(Some(&complete), Some(DocumentType::Cedula))
            .compliance_score;

        let incomplete = extraction(&[("nombres", "JUAN")], 0.9);
        let degraded = validator
            .validate(Some(&incomplete), Some(DocumentType::Cedula))
            .compliance_score;

        assert!(degraded < baseline);
    }
}
