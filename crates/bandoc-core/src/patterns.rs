//! Static pattern and rule tables, keyed by document type.
//!
//! All per-type knowledge of the pipeline lives here as data: recognition
//! keyword sets for classification, named regex rules for field extraction,
//! expected-field lists, and compliance check tables. Adding a document type
//! is a data change in this module, not a new code path.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::document::DocumentType;

/// Post-processing category applied to an extracted field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Identification number; all non-digits are stripped.
    NumericId,
    /// Monetary amount; everything but digits, comma and period is stripped.
    Monetary,
    /// Date; normalized to DD/MM/YYYY or omitted.
    Date,
    /// Free text; trimmed only.
    Text,
}

/// A named regex rule extracting a single field.
///
/// Patterns are case-insensitive and multi-line, with exactly one capturing
/// group holding the field value.
#[derive(Debug)]
pub struct FieldRule {
    /// Canonical field name.
    pub name: &'static str,

    /// Extraction pattern.
    pub pattern: Regex,

    /// Post-processing category.
    pub kind: FieldKind,
}

/// Presence requirement of a compliance check.
#[derive(Debug, Clone, Copy)]
pub enum Requirement {
    /// Missing field is an error.
    Required { penalty: f32 },
    /// Missing field is a warning.
    Optional { penalty: f32 },
}

/// Minimum-length subcheck applied when the field is present.
#[derive(Debug, Clone, Copy)]
pub struct MinLenCheck {
    pub len: usize,
    pub penalty: f32,
    pub message: &'static str,
}

/// A single compliance check for one field of a document type.
#[derive(Debug, Clone)]
pub struct FieldCheck {
    /// Field the check applies to.
    pub field: &'static str,

    /// Whether absence is an error or a warning, and its score penalty.
    pub requirement: Requirement,

    /// Message recorded when the field is missing.
    pub missing_message: &'static str,

    /// Optional minimum-length subcheck.
    pub min_len: Option<MinLenCheck>,
}

/// Static library of per-type recognition and extraction rules.
pub struct PatternLibrary {
    classification: HashMap<DocumentType, Vec<&'static str>>,
    extraction: HashMap<DocumentType, Vec<FieldRule>>,
    expected_fields: HashMap<DocumentType, Vec<&'static str>>,
    validation: HashMap<DocumentType, Vec<FieldCheck>>,
}

lazy_static! {
    static ref BUILTIN: PatternLibrary = PatternLibrary::build();
}

impl PatternLibrary {
    /// The shared built-in library.
    pub fn builtin() -> &'static PatternLibrary {
        &BUILTIN
    }

    /// Recognition keyword set for a document type, if it has one.
    pub fn classification_patterns(&self, document_type: DocumentType) -> Option<&[&'static str]> {
        self.classification
            .get(&document_type)
            .map(Vec::as_slice)
    }

    /// Field extraction rules for a document type (empty when none exist).
    pub fn field_rules(&self, document_type: DocumentType) -> &[FieldRule] {
        self.extraction
            .get(&document_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Expected field names for a document type (empty when none exist).
    pub fn expected_fields(&self, document_type: DocumentType) -> &[&'static str] {
        self.expected_fields
            .get(&document_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Compliance checks for a document type (empty when none exist).
    pub fn field_checks(&self, document_type: DocumentType) -> &[FieldCheck] {
        self.validation
            .get(&document_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn build() -> PatternLibrary {
        PatternLibrary {
            classification: classification_table(),
            extraction: extraction_table(),
            expected_fields: expected_fields_table(),
            validation: validation_table(),
        }
    }
}

fn classification_table() -> HashMap<DocumentType, Vec<&'static str>> {
    let mut table = HashMap::new();
    table.insert(
        DocumentType::Cedula,
        vec![
            "cédula",
            "ciudadanía",
            "documento de identidad",
            "CC",
            "número de documento",
            "lugar de expedición",
            "fecha de nacimiento",
            "registraduría",
        ],
    );
    table.insert(
        DocumentType::Pasaporte,
        vec![
            "pasaporte",
            "passport",
            "república de colombia",
            "tipo P",
            "lugar de nacimiento",
            "nacionalidad",
            "fecha de expedición",
            "cancillería",
        ],
    );
    table.insert(
        DocumentType::Rut,
        vec![
            "rut",
            "registro único tributario",
            "dian",
            "actividad económica",
            "nit",
            "contribuyente",
            "régimen tributario",
            "responsabilidades",
        ],
    );
    table.insert(
        DocumentType::EstadoCuenta,
        vec![
            "estado de cuenta",
            "extracto bancario",
            "saldo",
            "movimientos",
            "transacciones",
            "débitos",
            "créditos",
            "fecha de corte",
            "banco",
            "cuenta",
        ],
    );
    table.insert(
        DocumentType::CartaLaboral,
        vec![
            "carta laboral",
            "certificación laboral",
            "empresa",
            "empleado",
            "cargo",
            "salario",
            "fecha de ingreso",
            "recursos humanos",
            "contrato de trabajo",
        ],
    );
    table.insert(
        DocumentType::DeclaracionRenta,
        vec![
            "declaración de renta",
            "formulario 210",
            "año gravable",
            "patrimonio",
            "ingresos",
            "deducciones",
            "retenciones",
            "impuesto",
            "dian",
        ],
    );
    table.insert(
        DocumentType::SolicitudCredito,
        vec![
            "solicitud de crédito",
            "préstamo",
            "financiación",
            "monto solicitado",
            "plazo",
            "cuotas",
            "ingresos mensuales",
            "referencias comerciales",
        ],
    );
    table.insert(
        DocumentType::Contrato,
        vec![
            "contrato",
            "acuerdo",
            "partes",
            "cláusulas",
            "obligaciones",
            "términos",
            "condiciones",
            "firmantes",
            "testigos",
        ],
    );
    table
}

fn rule(name: &'static str, kind: FieldKind, pattern: &str) -> FieldRule {
    FieldRule {
        name,
        kind,
        pattern: Regex::new(pattern).unwrap(),
    }
}

fn extraction_table() -> HashMap<DocumentType, Vec<FieldRule>> {
    let mut table = HashMap::new();
    table.insert(
        DocumentType::Cedula,
        vec![
            rule(
                "numero_documento",
                FieldKind::NumericId,
                r"(?im)(?:CC|C\.C\.|Cédula|Documento)\s*:?\s*(\d{6,12})",
            ),
            rule(
                "nombres",
                FieldKind::Text,
                r"(?im)(?:Nombres?|Apellidos?\s+y\s+Nombres?)\s*:?\s*([A-ZÁÉÍÓÚÑ][a-záéíóúñ\s]+)",
            ),
            rule(
                "fecha_nacimiento",
                FieldKind::Date,
                r"(?im)(?:Fecha\s+de\s+nacimiento|Nacimiento)\s*:?\s*(\d{1,2}/\d{1,2}/\d{4})",
            ),
            rule(
                "lugar_expedicion",
                FieldKind::Text,
                r"(?im)(?:Lugar\s+de\s+expedición|Expedida\s+en)\s*:?\s*([A-ZÁÉÍÓÚÑ][a-záéíóúñ\s,]+)",
            ),
        ],
    );
    table.insert(
        DocumentType::EstadoCuenta,
        vec![
            rule(
                "numero_cuenta",
                FieldKind::NumericId,
                r"(?im)(?:Cuenta|Número\s+de\s+cuenta)\s*:?\s*(\d{10,20})",
            ),
            rule(
                "titular",
                FieldKind::Text,
                r"(?im)(?:Titular|Cliente)\s*:?\s*([A-ZÁÉÍÓÚÑ][a-záéíóúñ\s]+)",
            ),
            rule(
                "saldo",
                FieldKind::Monetary,
                r"(?im)(?:Saldo|Disponible)\s*:?\s*\$?([\d,]+\.?\d*)",
            ),
            rule(
                "fecha_corte",
                FieldKind::Date,
                r"(?im)(?:Fecha\s+de\s+corte|Corte)\s*:?\s*(\d{1,2}/\d{1,2}/\d{4})",
            ),
        ],
    );
    table.insert(
        DocumentType::CartaLaboral,
        vec![
            rule(
                "empleado",
                FieldKind::Text,
                r"(?im)(?:Empleado|Trabajador|Señor|Señora)\s*:?\s*([A-ZÁÉÍÓÚÑ][a-záéíóúñ\s]+)",
            ),
            rule(
                "empresa",
                FieldKind::Text,
                r"(?im)(?:Empresa|Compañía|Razón\s+social)\s*:?\s*([A-ZÁÉÍÓÚÑ][a-záéíóúñ\s&.,]+)",
            ),
            rule(
                "cargo",
                FieldKind::Text,
                r"(?im)(?:Cargo|Posición|Desempeña)\s*:?\s*([A-ZÁÉÍÓÚÑ][a-záéíóúñ\s]+)",
            ),
            rule(
                "salario",
                FieldKind::Monetary,
                r"(?im)(?:Salario|Sueldo|Ingresos?)\s*:?\s*\$?([\d,]+\.?\d*)",
            ),
            rule(
                "fecha_ingreso",
                FieldKind::Date,
                r"(?im)(?:Fecha\s+de\s+ingreso|Ingresó)\s*:?\s*(\d{1,2}/\d{1,2}/\d{4})",
            ),
        ],
    );
    table.insert(
        DocumentType::SolicitudCredito,
        vec![
            rule(
                "solicitante",
                FieldKind::Text,
                r"(?im)(?:Solicitante|Cliente|Nombres?)\s*:?\s*([A-ZÁÉÍÓÚÑ][a-záéíóúñ\s]+)",
            ),
            rule(
                "monto",
                FieldKind::Monetary,
                r"(?im)(?:Monto|Valor|Crédito)\s*:?\s*\$?([\d,]+\.?\d*)",
            ),
            rule(
                "plazo",
                FieldKind::Text,
                r"(?im)(?:Plazo|Término|Cuotas)\s*:?\s*(\d+)\s*(?:meses?|años?)",
            ),
            rule(
                "ingresos",
                FieldKind::Monetary,
                r"(?im)(?:Ingresos?\s+mensuales?|Salario)\s*:?\s*\$?([\d,]+\.?\d*)",
            ),
        ],
    );
    table
}

fn expected_fields_table() -> HashMap<DocumentType, Vec<&'static str>> {
    let mut table = HashMap::new();
    table.insert(
        DocumentType::Cedula,
        vec![
            "numero_documento",
            "nombres",
            "apellidos",
            "fecha_nacimiento",
            "lugar_expedicion",
        ],
    );
    table.insert(
        DocumentType::EstadoCuenta,
        vec!["numero_cuenta", "titular", "saldo", "fecha_corte", "movimientos"],
    );
    table.insert(
        DocumentType::CartaLaboral,
        vec!["empleado", "empresa", "cargo", "salario", "fecha_ingreso"],
    );
    table.insert(
        DocumentType::SolicitudCredito,
        vec!["solicitante", "monto", "plazo", "destino", "ingresos"],
    );
    table
}

fn validation_table() -> HashMap<DocumentType, Vec<FieldCheck>> {
    let mut table = HashMap::new();
    table.insert(
        DocumentType::Cedula,
        vec![
            FieldCheck {
                field: "numero_documento",
                requirement: Requirement::Required { penalty: 0.3 },
                missing_message: "document number not found",
                min_len: Some(MinLenCheck {
                    len: 6,
                    penalty: 0.2,
                    message: "document number is invalid",
                }),
            },
            FieldCheck {
                field: "nombres",
                requirement: Requirement::Optional { penalty: 0.1 },
                missing_message: "names not clearly extracted",
                min_len: None,
            },
        ],
    );
    table.insert(
        DocumentType::EstadoCuenta,
        vec![
            FieldCheck {
                field: "numero_cuenta",
                requirement: Requirement::Required { penalty: 0.4 },
                missing_message: "account number not found",
                min_len: None,
            },
            FieldCheck {
                field: "saldo",
                requirement: Requirement::Optional { penalty: 0.1 },
                missing_message: "balance not identified",
                min_len: None,
            },
        ],
    );
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_cover_known_types() {
        let library = PatternLibrary::builtin();

        assert!(library.classification_patterns(DocumentType::Cedula).is_some());
        assert!(library.classification_patterns(DocumentType::Contrato).is_some());
        // No recognition sets exist for these; scoring can never select them.
        assert!(library.classification_patterns(DocumentType::Licencia).is_none());
        assert!(library.classification_patterns(DocumentType::Pagare).is_none());

        assert_eq!(library.field_rules(DocumentType::Cedula).len(), 4);
        assert_eq!(library.field_rules(DocumentType::EstadoCuenta).len(), 4);
        assert!(library.field_rules(DocumentType::Pasaporte).is_empty());

        assert_eq!(library.expected_fields(DocumentType::CartaLaboral).len(), 5);
        assert_eq!(library.field_checks(DocumentType::Cedula).len(), 2);
        assert!(library.field_checks(DocumentType::Contrato).is_empty());
    }

    #[test]
    fn test_document_number_rule_matches_labeled_value() {
        let library = PatternLibrary::builtin();
        let rule = &library.field_rules(DocumentType::Cedula)[0];

        let caps = rule
            .pattern
            .captures("Número de documento: 12345678")
            .unwrap();
        assert_eq!(&caps[1], "12345678");
        assert_eq!(rule.kind, FieldKind::NumericId);
    }

    #[test]
    fn test_balance_rule_matches_currency_amount() {
        let library = PatternLibrary::builtin();
        let rule = library
            .field_rules(DocumentType::EstadoCuenta)
            .iter()
            .find(|r| r.name == "saldo")
            .unwrap();

        let caps = rule.pattern.captures("Saldo disponible: $1,500,000").unwrap();
        assert_eq!(&caps[1], "1,500,000");
    }
}
