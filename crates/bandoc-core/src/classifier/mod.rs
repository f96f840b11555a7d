//! Document classification against the pattern library.

mod model;

pub use model::{ClassifierModel, ModelPrediction};

use tracing::{debug, warn};

use crate::models::config::ClassificationConfig;
use crate::models::document::{ClassificationResult, DocumentType};
use crate::patterns::PatternLibrary;

/// Trait for document classifiers.
///
/// Classification never fails: implementations degrade internally and always
/// produce a result.
pub trait DocumentClassifier: Send + Sync {
    /// Classify raw document text into a document type.
    fn classify(&self, text: &str) -> ClassificationResult;
}

/// Keyword-scoring classifier backed by the static pattern library.
pub struct PatternClassifier {
    library: &'static PatternLibrary,
    config: ClassificationConfig,
}

impl PatternClassifier {
    /// Create a classifier with default thresholds.
    pub fn new() -> Self {
        Self::with_config(ClassificationConfig::default())
    }

    /// Create a classifier with the given thresholds.
    pub fn with_config(config: ClassificationConfig) -> Self {
        Self {
            library: PatternLibrary::builtin(),
            config,
        }
    }
}

impl Default for PatternClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentClassifier for PatternClassifier {
    fn classify(&self, text: &str) -> ClassificationResult {
        let text_lower = text.to_lowercase();
        let mut scores: Vec<(DocumentType, f32)> = Vec::new();

        for document_type in DocumentType::ALL {
            let Some(patterns) = self.library.classification_patterns(document_type) else {
                continue;
            };

            let mut score = 0.0f32;
            for pattern in patterns {
                if text_lower.contains(pattern) {
                    // Longer phrases are more specific and weigh more.
                    score += pattern.split_whitespace().count() as f32 / 10.0 + 0.1;
                }
            }

            scores.push((document_type, score / patterns.len() as f32));
        }

        // First maximum wins: ties resolve toward the earlier type.
        let (mut best_type, mut confidence) = scores[0];
        for &(document_type, score) in &scores[1..] {
            if score > confidence {
                best_type = document_type;
                confidence = score;
            }
        }

        if confidence < self.config.min_score {
            if text_lower.contains("banco") || text_lower.contains("cuenta") {
                best_type = DocumentType::EstadoCuenta;
                confidence = 0.5;
            } else {
                best_type = DocumentType::Cedula;
                confidence = 0.3;
            }
        }

        debug!(document_type = %best_type, confidence, "pattern classification");

        let reasoning = scores
            .iter()
            .map(|(document_type, score)| format!("{document_type}={score:.3}"))
            .collect::<Vec<_>>()
            .join(", ");

        ClassificationResult {
            document_type: best_type,
            confidence: confidence.min(1.0),
            reasoning: Some(format!("pattern scores: {reasoning}")),
        }
    }
}

/// Classifier backed by an opaque statistical model, with pattern fallback.
pub struct ModelClassifier {
    model: Box<dyn ClassifierModel>,
    fallback: PatternClassifier,
}

impl ModelClassifier {
    /// Wrap a loaded model with the default pattern fallback.
    pub fn new(model: Box<dyn ClassifierModel>) -> Self {
        Self {
            model,
            fallback: PatternClassifier::new(),
        }
    }

    /// Wrap a loaded model with a specific fallback classifier.
    pub fn with_fallback(model: Box<dyn ClassifierModel>, fallback: PatternClassifier) -> Self {
        Self { model, fallback }
    }
}

impl DocumentClassifier for ModelClassifier {
    fn classify(&self, text: &str) -> ClassificationResult {
        match self.model.predict(text) {
            Ok(prediction) => {
                let confidence = prediction
                    .probability_of(prediction.label)
                    .unwrap_or(0.0)
                    .clamp(0.0, 1.0);

                let reasoning = prediction
                    .probabilities
                    .iter()
                    .map(|(document_type, probability)| {
                        format!("{document_type}={probability:.3}")
                    })
                    .collect::<Vec<_>>()
                    .join(", ");

                ClassificationResult {
                    document_type: prediction.label,
                    confidence,
                    reasoning: Some(format!("model probabilities: {reasoning}")),
                }
            }
            Err(err) => {
                warn!("model prediction failed, falling back to pattern scoring: {err}");
                self.fallback.classify(text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use pretty_assertions::assert_eq;

    const CEDULA_TEXT: &str = r#"
        REPÚBLICA DE COLOMBIA
        CÉDULA DE CIUDADANÍA
        Número de documento: 12345678
        Nombres: JUAN CARLOS
        Apellidos: PÉREZ GONZÁLEZ
        Fecha de nacimiento: 15/05/1990
        Lugar de expedición: BOGOTÁ D.C.
    "#;

    #[test]
    fn test_classify_cedula() {
        let classifier = PatternClassifier::new();
        let result = classifier.classify(CEDULA_TEXT);

        assert_eq!(result.document_type, DocumentType::Cedula);
        // Above the fallback threshold: the score itself won.
        assert!(result.confidence >= 0.1);
        assert!(result.confidence <= 1.0);
        assert!(result.reasoning.unwrap().contains("cedula"));
    }

    #[test]
    fn test_classify_estado_cuenta() {
        let text = r#"
            BANCO COLOMBIA
            ESTADO DE CUENTA
            Número de cuenta: 1234567890
            Titular: JUAN PÉREZ
            Saldo disponible: $1,500,000
            Fecha de corte: 31/12/2023
            Movimientos del período
        "#;

        let classifier = PatternClassifier::new();
        let result = classifier.classify(text);

        assert_eq!(result.document_type, DocumentType::EstadoCuenta);
        assert!(result.confidence >= 0.1);
    }

    #[test]
    fn test_classify_carta_laboral() {
        let text = r#"
            CERTIFICACIÓN LABORAL

            La empresa TECNOLOGÍA S.A.S certifica que el señor
            JUAN CARLOS PÉREZ se encuentra vinculado laboralmente.

            Cargo: Desarrollador Senior
            Salario: $4,500,000 mensuales

            Recursos Humanos
        "#;

        let classifier = PatternClassifier::new();
        let result = classifier.classify(text);

        assert_eq!(result.document_type, DocumentType::CartaLaboral);
    }

    #[test]
    fn test_empty_text_defaults_to_cedula() {
        let classifier = PatternClassifier::new();
        let result = classifier.classify("");

        assert_eq!(result.document_type, DocumentType::Cedula);
        assert_eq!(result.confidence, 0.3);
    }

    #[test]
    fn test_generic_banking_text_falls_back_to_estado_cuenta() {
        let classifier = PatternClassifier::new();
        let result = classifier.classify("Texto cualquiera que menciona un banco una vez");

        assert_eq!(result.document_type, DocumentType::EstadoCuenta);
        assert_eq!(result.confidence, 0.5);
    }

    #[test]
    fn test_ambiguous_text_keeps_low_confidence() {
        let classifier = PatternClassifier::new();
        let result = classifier.classify("Este es un documento sin contenido específico");

        assert!(result.confidence < 0.5);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let classifier = PatternClassifier::new();
        let first = classifier.classify(CEDULA_TEXT);
        let second = classifier.classify(CEDULA_TEXT);

        assert_eq!(first.document_type, second.document_type);
        assert_eq!(first.confidence, second.confidence);
    }

    struct StubModel {
        fail: bool,
    }

    impl ClassifierModel for StubModel {
        fn load(&mut self) -> bool {
            true
        }

        fn predict(&self, _text: &str) -> Result<ModelPrediction, ModelError> {
            if self.fail {
                return Err(ModelError::Predict("backend unavailable".to_string()));
            }
            Ok(ModelPrediction {
                label: DocumentType::Rut,
                probabilities: vec![
                    (DocumentType::Rut, 0.9),
                    (DocumentType::Cedula, 0.1),
                ],
            })
        }
    }

    #[test]
    fn test_model_classifier_uses_predicted_probability() {
        let classifier = ModelClassifier::new(Box::new(StubModel { fail: false }));
        let result = classifier.classify("anything");

        assert_eq!(result.document_type, DocumentType::Rut);
        assert!((result.confidence - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_model_failure_falls_back_to_patterns() {
        let classifier = ModelClassifier::new(Box::new(StubModel { fail: true }));
        let result = classifier.classify(CEDULA_TEXT);

        assert_eq!(result.document_type, DocumentType::Cedula);
    }
}
