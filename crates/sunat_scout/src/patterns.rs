//! Pattern registry: the fixed, ordered table of SUNAT filename grammars.
//!
//! Order matters. The classifier returns the first grammar that matches, so a
//! new document type is added by appending an entry here (and a variant in
//! [`DocumentKind`]/[`DocumentFields`]). Every grammar is anchored and
//! case-insensitive; captured groups are named after the record fields.

use crate::types::DocumentKind;
use once_cell::sync::Lazy;
use regex::Regex;

/// One filename grammar.
pub struct DocumentPattern {
    kind: DocumentKind,
    regex: Regex,
}

impl DocumentPattern {
    fn new(kind: DocumentKind, grammar: &str) -> Self {
        let source = format!("(?i)^{}$", grammar);
        let regex = Regex::new(&source)
            .unwrap_or_else(|e| panic!("invalid built-in grammar for {}: {}", kind, e));
        Self { kind, regex }
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Declared field names, in capture order.
    pub fn field_names(&self) -> Vec<&str> {
        self.regex.capture_names().flatten().collect()
    }
}

/// Immutable, ordered list of grammars.
pub struct PatternRegistry {
    patterns: Vec<DocumentPattern>,
}

static BUILTIN: Lazy<PatternRegistry> = Lazy::new(|| PatternRegistry {
    patterns: builtin_patterns(),
});

impl PatternRegistry {
    /// The SUNAT grammar table.
    pub fn builtin() -> &'static PatternRegistry {
        &BUILTIN
    }

    pub fn patterns(&self) -> &[DocumentPattern] {
        &self.patterns
    }

    pub fn get(&self, kind: DocumentKind) -> Option<&DocumentPattern> {
        self.patterns.iter().find(|p| p.kind == kind)
    }
}

const VOUCHER_TAIL: &str = r"-(?P<serie>[A-Z0-9]{4})-(?P<correlativo>\d{1,8})\.(?P<ext>xml|zip|pdf)";

fn voucher(kind: DocumentKind, code: &str) -> DocumentPattern {
    DocumentPattern::new(
        kind,
        &format!(r"(?:\d{{11}}-)?(?P<tipo_doc>{}){}", code, VOUCHER_TAIL),
    )
}

fn builtin_patterns() -> Vec<DocumentPattern> {
    vec![
        DocumentPattern::new(
            DocumentKind::GuiaRemision,
            r"(?P<ruc>\d{11})-09-(?P<serie>[A-Z0-9]{4})-(?P<correlativo>\d{1,8})\.(?P<ext>pdf|xml)",
        ),
        DocumentPattern::new(
            DocumentKind::ReportePlanillaZip,
            r"(?P<ruc>\d{11})_[A-Z]+_(?P<periodo>\d{8})\.(?P<ext>zip)",
        ),
        DocumentPattern::new(
            DocumentKind::DeclaracionesPagos,
            r"DetalleDeclaraciones_(?P<ruc>\d{11})_(?P<timestamp>\d{14})\.(?P<ext>xlsx)",
        ),
        DocumentPattern::new(
            DocumentKind::FichaRuc,
            r"reporteec_ficharuc_(?P<ruc>\d{11})_(?P<timestamp>\d{14})\.(?P<ext>pdf)",
        ),
        DocumentPattern::new(
            DocumentKind::IngresoRecaudacion,
            r"ridetrac_(?P<ruc>\d{11})_(?P<num_operacion>\d{13})_(?P<timestamp>\d{14})_(?P<id>\d{9})\.(?P<ext>pdf)",
        ),
        DocumentPattern::new(
            DocumentKind::LiberacionFondos,
            r"rilf_(?P<ruc>\d{11})_(?P<num_operacion>\d{13})_(?P<timestamp>\d{14})_(?P<id>\d{9})\.(?P<ext>pdf)",
        ),
        DocumentPattern::new(
            DocumentKind::Multa,
            r"rmgen_(?P<ruc>\d{11})_(?P<cod1>\d{3})-(?P<cod2>\d{3})-(?P<num_multa>\d{7})_(?P<timestamp>\d{14})_(?P<id>\d{9})\.(?P<ext>pdf)",
        ),
        DocumentPattern::new(
            DocumentKind::Notificacion,
            r"constancia_(?P<timestamp>\d{14})_(?P<id_notif>\d{20})_(?P<num_operacion>\d{13})_(?P<id>\d{9})\.(?P<ext>pdf)",
        ),
        DocumentPattern::new(
            DocumentKind::Valores,
            r"rvalores_(?P<ruc>\d{11})_(?P<num_valor>[A-Z0-9]{12,17})_(?P<timestamp>\d{14})_(?P<id>\d{9})\.(?P<ext>pdf)",
        ),
        DocumentPattern::new(
            DocumentKind::Coactiva,
            r"recgen_(?P<ruc>\d{11})_(?P<num_expediente>\d{13})_(?P<timestamp>\d{14})_(?P<id>\d{9})\.(?P<ext>pdf)",
        ),
        DocumentPattern::new(
            DocumentKind::BajaOficio,
            r"bod_(?P<id_baja>\d{6})_(?P<ruc>\d{11})_(?P<periodo>\d{4})\.(?P<ext>pdf)",
        ),
        voucher(DocumentKind::Factura, "01"),
        voucher(DocumentKind::Boleta, "03"),
        voucher(DocumentKind::NotaCredito, "07"),
        voucher(DocumentKind::NotaDebito, "08"),
        DocumentPattern::new(
            DocumentKind::ReciboHonorarios,
            r"(?:\d{11}-)?(?P<tipo_doc>RHE)-(?P<serie>[A-Z0-9]{4})-(?P<correlativo>\d{1,8})\.(?P<ext>xml|pdf)",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_follows_kind_order() {
        let kinds: Vec<DocumentKind> = PatternRegistry::builtin()
            .patterns()
            .iter()
            .map(|p| p.kind())
            .collect();
        assert_eq!(kinds, DocumentKind::ALL.to_vec());
    }

    #[test]
    fn every_grammar_captures_an_extension() {
        for pattern in PatternRegistry::builtin().patterns() {
            assert!(
                pattern.field_names().contains(&"ext"),
                "{} has no ext field",
                pattern.kind()
            );
        }
    }

    #[test]
    fn field_names_are_in_capture_order() {
        let registry = PatternRegistry::builtin();
        let multa = registry.get(DocumentKind::Multa).unwrap();
        assert_eq!(
            multa.field_names(),
            vec!["ruc", "cod1", "cod2", "num_multa", "timestamp", "id", "ext"]
        );
        let factura = registry.get(DocumentKind::Factura).unwrap();
        assert_eq!(
            factura.field_names(),
            vec!["tipo_doc", "serie", "correlativo", "ext"]
        );
    }
}
