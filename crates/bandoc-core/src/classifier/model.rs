//! Boundary to an opaque, externally trained classification model.

use crate::error::ModelError;
use crate::models::document::DocumentType;

/// A model prediction with per-class probabilities.
#[derive(Debug, Clone)]
pub struct ModelPrediction {
    /// Predicted label.
    pub label: DocumentType,

    /// Probability per class.
    pub probabilities: Vec<(DocumentType, f32)>,
}

impl ModelPrediction {
    /// Probability assigned to a specific class.
    pub fn probability_of(&self, document_type: DocumentType) -> Option<f32> {
        self.probabilities
            .iter()
            .find(|(candidate, _)| *candidate == document_type)
            .map(|(_, probability)| *probability)
    }
}

/// A loadable classification model artifact.
///
/// Implementations wrap whatever artifact format the hosting system trains
/// and ships. The pipeline only ever observes predictions; a model that
/// fails to load or predict is replaced by pattern scoring.
pub trait ClassifierModel: Send + Sync {
    /// Load the artifact. Returns false when it is absent or corrupt.
    fn load(&mut self) -> bool;

    /// Predict the document type for the given text.
    fn predict(&self, text: &str) -> Result<ModelPrediction, ModelError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probability_lookup() {
        let prediction = ModelPrediction {
            label: DocumentType::Contrato,
            probabilities: vec![
                (DocumentType::Contrato, 0.7),
                (DocumentType::Pagare, 0.3),
            ],
        };

        assert_eq!(prediction.probability_of(DocumentType::Contrato), Some(0.7));
        assert_eq!(prediction.probability_of(DocumentType::Cedula), None);
    }
}
