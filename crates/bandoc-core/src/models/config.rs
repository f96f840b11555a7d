//! Configuration structures for the processing pipeline.

use serde::{Deserialize, Serialize};

/// Main configuration for the bandoc pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BandocConfig {
    /// Classification configuration.
    pub classification: ClassificationConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Compliance validation configuration.
    pub validation: ValidationConfig,

    /// Fraud detection configuration.
    pub fraud: FraudConfig,

    /// Document intake limits.
    pub intake: IntakeConfig,
}

/// Classification thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Minimum normalized pattern score; below this the generic fallback
    /// applies.
    pub min_score: f32,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self { min_score: 0.1 }
    }
}

/// Field extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Confidence assigned to rule-derived fields.
    pub rule_confidence: f32,

    /// Maximum characters echoed back in `raw_text`.
    pub raw_text_limit: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            rule_confidence: 0.8,
            raw_text_limit: 500,
        }
    }
}

/// Compliance validation thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Mean extraction confidence below this adds a warning.
    pub low_confidence_threshold: f32,

    /// Score deduction applied with the low-confidence warning.
    pub low_confidence_penalty: f32,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            low_confidence_threshold: 0.5,
            low_confidence_penalty: 0.2,
        }
    }
}

/// Fraud detection thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FraudConfig {
    /// Mean extraction confidence below this counts as a quality signal.
    pub low_quality_threshold: f32,

    /// Risk above this recommends manual review.
    pub review_threshold: f32,

    /// Risk above this recommends requesting supporting documents.
    pub supplement_threshold: f32,

    /// Risk strictly above this marks the document fraudulent.
    pub fraud_threshold: f32,
}

impl Default for FraudConfig {
    fn default() -> Self {
        Self {
            low_quality_threshold: 0.4,
            review_threshold: 0.5,
            supplement_threshold: 0.3,
            fraud_threshold: 0.6,
        }
    }
}

/// Intake limits enforced by the hosting system before processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Accepted file extensions.
    pub supported_formats: Vec<String>,

    /// Maximum accepted file size in bytes.
    pub max_file_size: u64,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            supported_formats: [".pdf", ".png", ".jpg", ".jpeg", ".tiff", ".docx", ".txt"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_file_size: 50 * 1024 * 1024,
        }
    }
}

impl BandocConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }

    /// Whether a file extension (with leading dot) is accepted for intake.
    pub fn accepts_format(&self, extension: &str) -> bool {
        let normalized = extension.to_lowercase();
        self.intake
            .supported_formats
            .iter()
            .any(|f| f.eq_ignore_ascii_case(&normalized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_match_pipeline_constants() {
        let config = BandocConfig::default();
        assert_eq!(config.classification.min_score, 0.1);
        assert_eq!(config.extraction.rule_confidence, 0.8);
        assert_eq!(config.validation.low_confidence_threshold, 0.5);
        assert_eq!(config.fraud.fraud_threshold, 0.6);
        assert!(config.accepts_format(".txt"));
        assert!(config.accepts_format(".PDF"));
        assert!(!config.accepts_format(".exe"));
    }

    #[test]
    fn test_round_trips_through_json() {
        let config = BandocConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: BandocConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.fraud.review_threshold, config.fraud.review_threshold);
        assert_eq!(back.intake.max_file_size, config.intake.max_file_size);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let back: BandocConfig =
            serde_json::from_str(r#"{"classification": {"min_score": 0.2}}"#).unwrap();
        assert_eq!(back.classification.min_score, 0.2);
        assert_eq!(back.extraction.raw_text_limit, 500);
    }
}
