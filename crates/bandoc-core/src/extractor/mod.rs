//! Field extraction from raw document text.
//!
//! Two passes feed one merged field map: a rule pass over the document
//! type's regex table, and an entity pass over externally supplied
//! annotations plus a generic date scan. Rule-derived values always win on
//! key collisions.

pub mod dates;

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

use crate::entities::{Entity, EntityAnnotator, EntityKind};
use crate::error::AnnotationError;
use crate::models::config::ExtractionConfig;
use crate::models::document::{DocumentType, ExtractionResult};
use crate::patterns::{FieldKind, PatternLibrary};

lazy_static! {
    static ref NON_DIGITS: Regex = Regex::new(r"[^\d]").unwrap();
    static ref NON_MONEY_CHARS: Regex = Regex::new(r"[^\d,.]").unwrap();

    // Generic date shapes scanned when no labeled date rule fired.
    static ref DATE_SCAN_PATTERNS: [Regex; 3] = [
        Regex::new(r"\d{1,2}/\d{1,2}/\d{4}").unwrap(),
        Regex::new(r"\d{1,2}-\d{1,2}-\d{4}").unwrap(),
        Regex::new(r"\d{1,2}\s+de\s+\w+\s+de\s+\d{4}").unwrap(),
    ];
}

const IDENTITY_CONFIDENCE: f32 = 0.7;
const MONEY_CONFIDENCE: f32 = 0.6;
const DATE_CONFIDENCE: f32 = 0.6;

type FieldMap = (HashMap<String, String>, HashMap<String, f32>);

/// Rule- and entity-driven field extractor.
pub struct FieldExtractor {
    library: &'static PatternLibrary,
    annotator: Option<Box<dyn EntityAnnotator>>,
    config: ExtractionConfig,
}

impl FieldExtractor {
    /// Create an extractor with default settings and no annotator.
    pub fn new() -> Self {
        Self::with_config(ExtractionConfig::default())
    }

    /// Create an extractor with the given settings.
    pub fn with_config(config: ExtractionConfig) -> Self {
        Self {
            library: PatternLibrary::builtin(),
            annotator: None,
            config,
        }
    }

    /// Attach an entity annotation engine.
    pub fn with_annotator(mut self, annotator: Box<dyn EntityAnnotator>) -> Self {
        self.annotator = Some(annotator);
        self
    }

    /// Extract fields for the given document type.
    ///
    /// Never fails: an annotation fault degrades to an empty result with
    /// the raw-text echo preserved.
    pub fn extract(&self, text: &str, document_type: DocumentType) -> ExtractionResult {
        match self.try_extract(text, document_type) {
            Ok(result) => result,
            Err(err) => {
                warn!(%document_type, "field extraction failed, returning empty result: {err}");
                ExtractionResult {
                    fields: HashMap::new(),
                    confidence_scores: HashMap::new(),
                    raw_text: Some(truncate_echo(text, self.config.raw_text_limit)),
                    structured_data: Some(HashMap::new()),
                }
            }
        }
    }

    fn try_extract(
        &self,
        text: &str,
        document_type: DocumentType,
    ) -> Result<ExtractionResult, AnnotationError> {
        let (rule_fields, rule_scores) = self.rule_pass(text, document_type);

        let (mut fields, mut scores) = match &self.annotator {
            Some(annotator) => {
                let entities = annotator.annotate(text)?;
                self.entity_pass(&entities, text, document_type)
            }
            None => (HashMap::new(), HashMap::new()),
        };

        // Rule-derived values take precedence on key collisions.
        fields.extend(rule_fields);
        scores.extend(rule_scores);

        let structured_data: HashMap<String, String> = self
            .library
            .expected_fields(document_type)
            .iter()
            .filter_map(|field| {
                fields
                    .get(*field)
                    .map(|value| ((*field).to_string(), value.clone()))
            })
            .collect();

        debug!(
            %document_type,
            field_count = fields.len(),
            "field extraction finished"
        );

        Ok(ExtractionResult {
            fields,
            confidence_scores: scores,
            raw_text: Some(truncate_echo(text, self.config.raw_text_limit)),
            structured_data: Some(structured_data),
        })
    }

    fn rule_pass(&self, text: &str, document_type: DocumentType) -> FieldMap {
        let mut fields = HashMap::new();
        let mut scores = HashMap::new();

        for rule in self.library.field_rules(document_type) {
            let Some(caps) = rule.pattern.captures(text) else {
                continue;
            };
            let Some(capture) = caps.get(1) else {
                continue;
            };

            let raw = capture.as_str().trim();
            let value = match rule.kind {
                FieldKind::NumericId => NON_DIGITS.replace_all(raw, "").into_owned(),
                FieldKind::Monetary => NON_MONEY_CHARS.replace_all(raw, "").into_owned(),
                FieldKind::Date => match dates::normalize_date(raw) {
                    Some(normalized) => normalized,
                    None => continue,
                },
                FieldKind::Text => raw.to_string(),
            };

            fields.insert(rule.name.to_string(), value);
            scores.insert(rule.name.to_string(), self.config.rule_confidence);
        }

        (fields, scores)
    }

    fn entity_pass(
        &self,
        entities: &[Entity],
        text: &str,
        document_type: DocumentType,
    ) -> FieldMap {
        let mut fields: HashMap<String, String> = HashMap::new();
        let mut scores: HashMap<String, f32> = HashMap::new();

        for entity in entities {
            match entity.kind {
                EntityKind::Person => {
                    if !fields.contains_key("nombres") {
                        fields.insert("nombres".to_string(), entity.text.clone());
                        scores.insert("nombres".to_string(), IDENTITY_CONFIDENCE);
                    } else if !fields.contains_key("empleado") {
                        fields.insert("empleado".to_string(), entity.text.clone());
                        scores.insert("empleado".to_string(), IDENTITY_CONFIDENCE);
                    }
                }
                EntityKind::Organization => {
                    if !fields.contains_key("empresa") {
                        fields.insert("empresa".to_string(), entity.text.clone());
                        scores.insert("empresa".to_string(), IDENTITY_CONFIDENCE);
                    }
                }
                EntityKind::Money => {
                    let value = NON_MONEY_CHARS.replace_all(&entity.text, "").into_owned();
                    if document_type == DocumentType::EstadoCuenta
                        && !fields.contains_key("saldo")
                    {
                        fields.insert("saldo".to_string(), value);
                        scores.insert("saldo".to_string(), MONEY_CONFIDENCE);
                    } else if document_type == DocumentType::CartaLaboral
                        && !fields.contains_key("salario")
                    {
                        fields.insert("salario".to_string(), value);
                        scores.insert("salario".to_string(), MONEY_CONFIDENCE);
                    }
                }
                EntityKind::Date | EntityKind::Other => {}
            }
        }

        // Generic date scan fills the birth-date slot with the first
        // normalizable hit.
        if !fields.contains_key("fecha_nacimiento") {
            'scan: for pattern in DATE_SCAN_PATTERNS.iter() {
                for hit in pattern.find_iter(text) {
                    if let Some(normalized) = dates::normalize_date(hit.as_str()) {
                        fields.insert("fecha_nacimiento".to_string(), normalized);
                        scores.insert("fecha_nacimiento".to_string(), DATE_CONFIDENCE);
                        break 'scan;
                    }
                }
            }
        }

        (fields, scores)
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn truncate_echo(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        let mut echo: String = text.chars().take(limit).collect();
        echo.push_str("...");
        echo
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CEDULA_TEXT: &str =
        "CÉDULA DE CIUDADANÍA\nNúmero de documento: 12345678\nFecha de nacimiento: 15/05/1990\nNombres: JUAN CARLOS";

    struct StubAnnotator {
        entities: Vec<Entity>,
        fail: bool,
    }

    impl EntityAnnotator for StubAnnotator {
        fn annotate(&self, _text: &str) -> Result<Vec<Entity>, AnnotationError> {
            if self.fail {
                return Err(AnnotationError::Engine("model not loaded".to_string()));
            }
            Ok(self.entities.clone())
        }
    }

    #[test]
    fn test_rule_pass_extracts_and_cleans_cedula_fields() {
        let extractor = FieldExtractor::new();
        let result = extractor.extract(CEDULA_TEXT, DocumentType::Cedula);

        assert_eq!(result.fields["numero_documento"], "12345678");
        assert_eq!(result.fields["nombres"], "JUAN CARLOS");
        assert_eq!(result.fields["fecha_nacimiento"], "15/05/1990");
        assert_eq!(result.confidence_scores["numero_documento"], 0.8);
        assert_eq!(result.confidence_scores["nombres"], 0.8);
    }

    #[test]
    fn test_monetary_field_keeps_digits_commas_periods() {
        let text = "ESTADO DE CUENTA\nSaldo disponible: $1,500,000";
        let extractor = FieldExtractor::new();
        let result = extractor.extract(text, DocumentType::EstadoCuenta);

        assert_eq!(result.fields["saldo"], "1,500,000");
    }

    #[test]
    fn test_unparseable_date_is_omitted() {
        let text = "Fecha de corte: 99/99/2024\nCuenta: 1234567890";
        let extractor = FieldExtractor::new();
        let result = extractor.extract(text, DocumentType::EstadoCuenta);

        assert!(!result.fields.contains_key("fecha_corte"));
        assert!(!result.confidence_scores.contains_key("fecha_corte"));
        assert_eq!(result.fields["numero_cuenta"], "1234567890");
    }

    #[test]
    fn test_rule_value_wins_over_entity_value() {
        let annotator = StubAnnotator {
            entities: vec![
                Entity::new(EntityKind::Person, "MARIA LOPEZ"),
                Entity::new(EntityKind::Person, "PEDRO RUIZ"),
            ],
            fail: false,
        };
        let extractor = FieldExtractor::new().with_annotator(Box::new(annotator));
        let result = extractor.extract(CEDULA_TEXT, DocumentType::Cedula);

        // The labeled rule hit beats the annotated person span.
        assert_eq!(result.fields["nombres"], "JUAN CARLOS");
        assert_eq!(result.confidence_scores["nombres"], 0.8);

        // The second person span lands in the employee slot.
        assert_eq!(result.fields["empleado"], "PEDRO RUIZ");
        assert_eq!(result.confidence_scores["empleado"], 0.7);
    }

    #[test]
    fn test_entity_fills_missing_money_field() {
        let annotator = StubAnnotator {
            entities: vec![Entity::new(EntityKind::Money, "$2.000.000")],
            fail: false,
        };
        let extractor = FieldExtractor::new().with_annotator(Box::new(annotator));
        let result = extractor.extract(
            "EXTRACTO BANCARIO sin montos etiquetados",
            DocumentType::EstadoCuenta,
        );

        assert_eq!(result.fields["saldo"], "2.000.000");
        assert_eq!(result.confidence_scores["saldo"], 0.6);
    }

    #[test]
    fn test_date_scan_fills_birth_date() {
        let annotator = StubAnnotator {
            entities: Vec::new(),
            fail: false,
        };
        let extractor = FieldExtractor::new().with_annotator(Box::new(annotator));
        let result = extractor.extract(
            "Documento sin etiquetas. Nacido el 15 de mayo de 1990 en Cali.",
            DocumentType::Cedula,
        );

        assert_eq!(result.fields["fecha_nacimiento"], "15/05/1990");
        assert_eq!(result.confidence_scores["fecha_nacimiento"], 0.6);
    }

    #[test]
    fn test_structured_data_is_projected_onto_expected_fields() {
        let annotator = StubAnnotator {
            entities: vec![
                Entity::new(EntityKind::Person, "MARIA LOPEZ"),
                Entity::new(EntityKind::Person, "PEDRO RUIZ"),
            ],
            fail: false,
        };
        let extractor = FieldExtractor::new().with_annotator(Box::new(annotator));
        let result = extractor.extract(CEDULA_TEXT, DocumentType::Cedula);

        let structured = result.structured_data.unwrap();
        assert!(structured.contains_key("numero_documento"));
        assert!(structured.contains_key("nombres"));
        // The employee slot is not an expected field for an ID card.
        assert!(result.fields.contains_key("empleado"));
        assert!(!structured.contains_key("empleado"));
    }

    #[test]
    fn test_annotator_failure_yields_empty_result_with_echo() {
        let annotator = StubAnnotator {
            entities: Vec::new(),
            fail: true,
        };
        let extractor = FieldExtractor::new().with_annotator(Box::new(annotator));
        let result = extractor.extract(CEDULA_TEXT, DocumentType::Cedula);

        assert!(result.fields.is_empty());
        assert!(result.confidence_scores.is_empty());
        assert!(result.raw_text.unwrap().contains("CÉDULA"));
    }

    #[test]
    fn test_raw_text_echo_is_truncated() {
        let long_text = "ESTADO DE CUENTA ".repeat(100);
        let extractor = FieldExtractor::new();
        let result = extractor.extract(&long_text, DocumentType::EstadoCuenta);

        let echo = result.raw_text.unwrap();
        assert_eq!(echo.chars().count(), 503);
        assert!(echo.ends_with("..."));
    }

    #[test]
    fn test_scores_only_for_populated_fields() {
        let extractor = FieldExtractor::new();
        let result = extractor.extract(CEDULA_TEXT, DocumentType::Cedula);

        for key in result.confidence_scores.keys() {
            assert!(result.fields.contains_key(key), "dangling score for {key}");
        }
    }
}
