//! Filename classification against the pattern registry.
//!
//! Only the bare filename is inspected; directories and archive context never
//! influence the result. "No match" is a normal outcome, not an error.

use crate::patterns::{DocumentPattern, PatternRegistry};
use crate::types::{
    BajaOficioFields, CoactivaFields, ComprobanteFields, DocumentFields, DocumentKind, GuiaFields,
    MultaFields, NotificacionFields, OperationFields, PlanillaFields, StampedReportFields,
    ValoresFields,
};
use regex::Captures;

/// First-match-wins classifier over a pattern registry.
#[derive(Clone, Copy)]
pub struct Classifier {
    registry: &'static PatternRegistry,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier {
    pub fn new() -> Self {
        Self {
            registry: PatternRegistry::builtin(),
        }
    }

    /// Classify a bare filename. Registry order breaks ties.
    pub fn classify(&self, filename: &str) -> Option<DocumentFields> {
        self.registry
            .patterns()
            .iter()
            .find_map(|pattern| try_pattern(pattern, filename))
    }

    pub fn is_match(&self, filename: &str) -> bool {
        self.registry
            .patterns()
            .iter()
            .any(|pattern| pattern.regex().is_match(filename))
    }
}

/// Classify with the built-in registry.
pub fn classify(filename: &str) -> Option<DocumentFields> {
    Classifier::new().classify(filename)
}

fn try_pattern(pattern: &DocumentPattern, filename: &str) -> Option<DocumentFields> {
    let caps = pattern.regex().captures(filename)?;
    Some(build_fields(pattern.kind(), &caps))
}

fn field(caps: &Captures<'_>, name: &str) -> String {
    caps.name(name)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn comprobante(caps: &Captures<'_>) -> ComprobanteFields {
    ComprobanteFields {
        tipo_doc: field(caps, "tipo_doc"),
        serie: field(caps, "serie"),
        correlativo: field(caps, "correlativo"),
        ext: field(caps, "ext"),
    }
}

fn stamped(caps: &Captures<'_>) -> StampedReportFields {
    StampedReportFields {
        ruc: field(caps, "ruc"),
        timestamp: field(caps, "timestamp"),
        ext: field(caps, "ext"),
    }
}

fn operation(caps: &Captures<'_>) -> OperationFields {
    OperationFields {
        ruc: field(caps, "ruc"),
        num_operacion: field(caps, "num_operacion"),
        timestamp: field(caps, "timestamp"),
        id: field(caps, "id"),
        ext: field(caps, "ext"),
    }
}

fn build_fields(kind: DocumentKind, caps: &Captures<'_>) -> DocumentFields {
    match kind {
        DocumentKind::GuiaRemision => DocumentFields::GuiaRemision(GuiaFields {
            ruc: field(caps, "ruc"),
            serie: field(caps, "serie"),
            correlativo: field(caps, "correlativo"),
            ext: field(caps, "ext"),
        }),
        DocumentKind::ReportePlanillaZip => DocumentFields::ReportePlanillaZip(PlanillaFields {
            ruc: field(caps, "ruc"),
            periodo: field(caps, "periodo"),
            ext: field(caps, "ext"),
        }),
        DocumentKind::DeclaracionesPagos => DocumentFields::DeclaracionesPagos(stamped(caps)),
        DocumentKind::FichaRuc => DocumentFields::FichaRuc(stamped(caps)),
        DocumentKind::IngresoRecaudacion => DocumentFields::IngresoRecaudacion(operation(caps)),
        DocumentKind::LiberacionFondos => DocumentFields::LiberacionFondos(operation(caps)),
        DocumentKind::Multa => DocumentFields::Multa(MultaFields {
            ruc: field(caps, "ruc"),
            cod1: field(caps, "cod1"),
            cod2: field(caps, "cod2"),
            num_multa: field(caps, "num_multa"),
            timestamp: field(caps, "timestamp"),
            id: field(caps, "id"),
            ext: field(caps, "ext"),
        }),
        DocumentKind::Notificacion => DocumentFields::Notificacion(NotificacionFields {
            timestamp: field(caps, "timestamp"),
            id_notif: field(caps, "id_notif"),
            num_operacion: field(caps, "num_operacion"),
            id: field(caps, "id"),
            ext: field(caps, "ext"),
        }),
        DocumentKind::Valores => DocumentFields::Valores(ValoresFields {
            ruc: field(caps, "ruc"),
            num_valor: field(caps, "num_valor"),
            timestamp: field(caps, "timestamp"),
            id: field(caps, "id"),
            ext: field(caps, "ext"),
        }),
        DocumentKind::Coactiva => DocumentFields::Coactiva(CoactivaFields {
            ruc: field(caps, "ruc"),
            num_expediente: field(caps, "num_expediente"),
            timestamp: field(caps, "timestamp"),
            id: field(caps, "id"),
            ext: field(caps, "ext"),
        }),
        DocumentKind::BajaOficio => DocumentFields::BajaOficio(BajaOficioFields {
            id_baja: field(caps, "id_baja"),
            ruc: field(caps, "ruc"),
            periodo: field(caps, "periodo"),
            ext: field(caps, "ext"),
        }),
        DocumentKind::Factura => DocumentFields::Factura(comprobante(caps)),
        DocumentKind::Boleta => DocumentFields::Boleta(comprobante(caps)),
        DocumentKind::NotaCredito => DocumentFields::NotaCredito(comprobante(caps)),
        DocumentKind::NotaDebito => DocumentFields::NotaDebito(comprobante(caps)),
        DocumentKind::ReciboHonorarios => DocumentFields::ReciboHonorarios(comprobante(caps)),
    }
}
