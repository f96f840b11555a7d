//! Heuristic fraud-risk scoring.

use tracing::debug;

use crate::models::config::FraudConfig;
use crate::models::document::{ExtractionResult, FraudDetectionResult};

// Wording that points at manipulated or copied documents. Each distinct
// term counts once per run.
const SUSPICIOUS_TERMS: [&str; 8] = [
    "photoshop",
    "editado",
    "modificado",
    "alterado",
    "copia",
    "duplicado",
    "falso",
    "fraudulento",
];

const LOW_QUALITY_WEIGHT: f32 = 0.3;
const SUSPICIOUS_TERM_WEIGHT: f32 = 0.4;
const MALFORMED_ID_WEIGHT: f32 = 0.2;

/// Detector accumulating independent risk signals into one score.
pub struct FraudDetector {
    config: FraudConfig,
}

impl FraudDetector {
    /// Create a detector with default thresholds.
    pub fn new() -> Self {
        Self::with_config(FraudConfig::default())
    }

    /// Create a detector with the given thresholds.
    pub fn with_config(config: FraudConfig) -> Self {
        Self { config }
    }

    /// Analyze raw text and extracted fields for fraud signals.
    pub fn detect(
        &self,
        text: &str,
        extraction: Option<&ExtractionResult>,
    ) -> FraudDetectionResult {
        let mut risk_factors = Vec::new();
        let mut recommendations = Vec::new();
        let mut risk_score = 0.0f32;

        let text_lower = text.to_lowercase();

        if let Some(mean) = extraction.and_then(ExtractionResult::mean_confidence) {
            if mean < self.config.low_quality_threshold {
                risk_factors.push("low document or image quality".to_string());
                risk_score += LOW_QUALITY_WEIGHT;
            }
        }

        for term in SUSPICIOUS_TERMS {
            if text_lower.contains(term) {
                risk_factors.push(format!("suspicious wording detected: {term}"));
                risk_score += SUSPICIOUS_TERM_WEIGHT;
            }
        }

        if let Some(number) = extraction.and_then(|e| e.fields.get("numero_documento")) {
            if !number.chars().all(|c| c.is_ascii_digit()) || number.chars().count() < 6 {
                risk_factors.push("malformed document number".to_string());
                risk_score += MALFORMED_ID_WEIGHT;
            }
        }

        if risk_score > self.config.review_threshold {
            recommendations.push("review the document manually".to_string());
            recommendations.push("verify authenticity against official sources".to_string());
        }
        if risk_score > self.config.supplement_threshold {
            recommendations.push("request supporting documents".to_string());
        }

        let risk_score = risk_score.clamp(0.0, 1.0);
        debug!(risk_score, factor_count = risk_factors.len(), "fraud analysis finished");

        FraudDetectionResult {
            is_fraudulent: risk_score > self.config.fraud_threshold,
            risk_score,
            risk_factors,
            recommendations,
        }
    }
}

impl Default for FraudDetector {
    fn default() -> Self {
        Self::new()
    }
}
