//! Core types: document classifications, typed field sets and discovery records

use crate::address::DocumentAddress;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of SUNAT document classifications, in registry order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    GuiaRemision,
    ReportePlanillaZip,
    DeclaracionesPagos,
    FichaRuc,
    IngresoRecaudacion,
    LiberacionFondos,
    Multa,
    Notificacion,
    Valores,
    Coactiva,
    BajaOficio,
    Factura,
    Boleta,
    NotaCredito,
    NotaDebito,
    ReciboHonorarios,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 16] = [
        DocumentKind::GuiaRemision,
        DocumentKind::ReportePlanillaZip,
        DocumentKind::DeclaracionesPagos,
        DocumentKind::FichaRuc,
        DocumentKind::IngresoRecaudacion,
        DocumentKind::LiberacionFondos,
        DocumentKind::Multa,
        DocumentKind::Notificacion,
        DocumentKind::Valores,
        DocumentKind::Coactiva,
        DocumentKind::BajaOficio,
        DocumentKind::Factura,
        DocumentKind::Boleta,
        DocumentKind::NotaCredito,
        DocumentKind::NotaDebito,
        DocumentKind::ReciboHonorarios,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::GuiaRemision => "guia_remision",
            DocumentKind::ReportePlanillaZip => "reporte_planilla_zip",
            DocumentKind::DeclaracionesPagos => "declaraciones_pagos",
            DocumentKind::FichaRuc => "ficha_ruc",
            DocumentKind::IngresoRecaudacion => "ingreso_recaudacion",
            DocumentKind::LiberacionFondos => "liberacion_fondos",
            DocumentKind::Multa => "multa",
            DocumentKind::Notificacion => "notificacion",
            DocumentKind::Valores => "valores",
            DocumentKind::Coactiva => "coactiva",
            DocumentKind::BajaOficio => "baja_oficio",
            DocumentKind::Factura => "factura",
            DocumentKind::Boleta => "boleta",
            DocumentKind::NotaCredito => "nota_credito",
            DocumentKind::NotaDebito => "nota_debito",
            DocumentKind::ReciboHonorarios => "recibo_honorarios",
        }
    }

    /// Folder used by the organizer for this classification.
    pub fn folder_name(&self) -> &'static str {
        match self {
            DocumentKind::GuiaRemision => "Guias_Remision",
            DocumentKind::ReportePlanillaZip => "Reportes_Planilla",
            DocumentKind::DeclaracionesPagos => "Declaraciones",
            DocumentKind::FichaRuc => "Reportes_Ficha_RUC",
            DocumentKind::IngresoRecaudacion => "Retenciones_y_Detracciones",
            DocumentKind::LiberacionFondos => "Liberacion_Fondos",
            DocumentKind::Multa => "Multas",
            DocumentKind::Notificacion => "Constancias",
            DocumentKind::Valores => "Valores",
            DocumentKind::Coactiva => "Cobranza_Coactiva",
            DocumentKind::BajaOficio => "Bajas_de_Oficio",
            DocumentKind::Factura => "Facturas",
            DocumentKind::Boleta => "Boletas",
            DocumentKind::NotaCredito => "Notas_Credito",
            DocumentKind::NotaDebito => "Notas_Debito",
            DocumentKind::ReciboHonorarios => "Recibos_Honorarios",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Guia de remision: `<ruc>-09-<serie>-<correlativo>.<ext>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuiaFields {
    pub ruc: String,
    pub serie: String,
    pub correlativo: String,
    pub ext: String,
}

/// Payroll report archive: `<ruc>_<NAME>_<periodo>.zip`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanillaFields {
    pub ruc: String,
    pub periodo: String,
    pub ext: String,
}

/// Reports stamped only with the taxpayer and a generation timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StampedReportFields {
    pub ruc: String,
    pub timestamp: String,
    pub ext: String,
}

/// Payment operation receipts (detracciones, fund releases).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationFields {
    pub ruc: String,
    pub num_operacion: String,
    pub timestamp: String,
    pub id: String,
    pub ext: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultaFields {
    pub ruc: String,
    pub cod1: String,
    pub cod2: String,
    pub num_multa: String,
    pub timestamp: String,
    pub id: String,
    pub ext: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificacionFields {
    pub timestamp: String,
    pub id_notif: String,
    pub num_operacion: String,
    pub id: String,
    pub ext: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValoresFields {
    pub ruc: String,
    pub num_valor: String,
    pub timestamp: String,
    pub id: String,
    pub ext: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoactivaFields {
    pub ruc: String,
    pub num_expediente: String,
    pub timestamp: String,
    pub id: String,
    pub ext: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BajaOficioFields {
    pub id_baja: String,
    pub ruc: String,
    pub periodo: String,
    pub ext: String,
}

/// Electronic vouchers (facturas, boletas, notas, recibos por honorarios).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComprobanteFields {
    pub tipo_doc: String,
    pub serie: String,
    pub correlativo: String,
    pub ext: String,
}

/// Classification together with its strongly typed captured fields.
///
/// Serialized flat: a `classification` tag next to the variant's fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "classification", rename_all = "snake_case")]
pub enum DocumentFields {
    GuiaRemision(GuiaFields),
    ReportePlanillaZip(PlanillaFields),
    DeclaracionesPagos(StampedReportFields),
    FichaRuc(StampedReportFields),
    IngresoRecaudacion(OperationFields),
    LiberacionFondos(OperationFields),
    Multa(MultaFields),
    Notificacion(NotificacionFields),
    Valores(ValoresFields),
    Coactiva(CoactivaFields),
    BajaOficio(BajaOficioFields),
    Factura(ComprobanteFields),
    Boleta(ComprobanteFields),
    NotaCredito(ComprobanteFields),
    NotaDebito(ComprobanteFields),
    ReciboHonorarios(ComprobanteFields),
}

impl DocumentFields {
    pub fn kind(&self) -> DocumentKind {
        match self {
            DocumentFields::GuiaRemision(_) => DocumentKind::GuiaRemision,
            DocumentFields::ReportePlanillaZip(_) => DocumentKind::ReportePlanillaZip,
            DocumentFields::DeclaracionesPagos(_) => DocumentKind::DeclaracionesPagos,
            DocumentFields::FichaRuc(_) => DocumentKind::FichaRuc,
            DocumentFields::IngresoRecaudacion(_) => DocumentKind::IngresoRecaudacion,
            DocumentFields::LiberacionFondos(_) => DocumentKind::LiberacionFondos,
            DocumentFields::Multa(_) => DocumentKind::Multa,
            DocumentFields::Notificacion(_) => DocumentKind::Notificacion,
            DocumentFields::Valores(_) => DocumentKind::Valores,
            DocumentFields::Coactiva(_) => DocumentKind::Coactiva,
            DocumentFields::BajaOficio(_) => DocumentKind::BajaOficio,
            DocumentFields::Factura(_) => DocumentKind::Factura,
            DocumentFields::Boleta(_) => DocumentKind::Boleta,
            DocumentFields::NotaCredito(_) => DocumentKind::NotaCredito,
            DocumentFields::NotaDebito(_) => DocumentKind::NotaDebito,
            DocumentFields::ReciboHonorarios(_) => DocumentKind::ReciboHonorarios,
        }
    }

    /// Extension exactly as it appeared in the filename.
    pub fn ext(&self) -> &str {
        match self {
            DocumentFields::GuiaRemision(f) => &f.ext,
            DocumentFields::ReportePlanillaZip(f) => &f.ext,
            DocumentFields::DeclaracionesPagos(f) | DocumentFields::FichaRuc(f) => &f.ext,
            DocumentFields::IngresoRecaudacion(f) | DocumentFields::LiberacionFondos(f) => &f.ext,
            DocumentFields::Multa(f) => &f.ext,
            DocumentFields::Notificacion(f) => &f.ext,
            DocumentFields::Valores(f) => &f.ext,
            DocumentFields::Coactiva(f) => &f.ext,
            DocumentFields::BajaOficio(f) => &f.ext,
            DocumentFields::Factura(f)
            | DocumentFields::Boleta(f)
            | DocumentFields::NotaCredito(f)
            | DocumentFields::NotaDebito(f)
            | DocumentFields::ReciboHonorarios(f) => &f.ext,
        }
    }

    /// Taxpayer RUC when the grammar carries one.
    pub fn ruc(&self) -> Option<&str> {
        match self {
            DocumentFields::GuiaRemision(f) => Some(&f.ruc),
            DocumentFields::ReportePlanillaZip(f) => Some(&f.ruc),
            DocumentFields::DeclaracionesPagos(f) | DocumentFields::FichaRuc(f) => Some(&f.ruc),
            DocumentFields::IngresoRecaudacion(f) | DocumentFields::LiberacionFondos(f) => {
                Some(&f.ruc)
            }
            DocumentFields::Multa(f) => Some(&f.ruc),
            DocumentFields::Valores(f) => Some(&f.ruc),
            DocumentFields::Coactiva(f) => Some(&f.ruc),
            DocumentFields::BajaOficio(f) => Some(&f.ruc),
            DocumentFields::Notificacion(_)
            | DocumentFields::Factura(_)
            | DocumentFields::Boleta(_)
            | DocumentFields::NotaCredito(_)
            | DocumentFields::NotaDebito(_)
            | DocumentFields::ReciboHonorarios(_) => None,
        }
    }
}

/// Per-run uniqueness of a bare filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    Unique,
    Duplicate,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Unique => "UNIQUE",
            DocumentStatus::Duplicate => "DUPLICATE",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified occurrence of a document found during discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Bare file name, independent of directory or archive nesting.
    pub filename: String,
    /// Physical path plus in-archive segments (serialized as `path:seg:seg`).
    pub address: DocumentAddress,
    #[serde(flatten)]
    pub fields: DocumentFields,
    pub status: DocumentStatus,
}

impl DocumentRecord {
    pub fn kind(&self) -> DocumentKind {
        self.fields.kind()
    }

    pub fn is_unique(&self) -> bool {
        self.status == DocumentStatus::Unique
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> DocumentRecord {
        DocumentRecord {
            filename: "20123456789-09-T001-00000001.pdf".to_string(),
            address: DocumentAddress::parse("/data/reports.zip:inner/20123456789-09-T001-00000001.pdf"),
            fields: DocumentFields::GuiaRemision(GuiaFields {
                ruc: "20123456789".to_string(),
                serie: "T001".to_string(),
                correlativo: "00000001".to_string(),
                ext: "pdf".to_string(),
            }),
            status: DocumentStatus::Duplicate,
        }
    }

    #[test]
    fn record_serializes_as_flat_mapping() {
        let value = serde_json::to_value(sample_record()).unwrap();
        assert_eq!(value["classification"], "guia_remision");
        assert_eq!(value["filename"], "20123456789-09-T001-00000001.pdf");
        assert_eq!(
            value["address"],
            "/data/reports.zip:inner/20123456789-09-T001-00000001.pdf"
        );
        assert_eq!(value["ruc"], "20123456789");
        assert_eq!(value["serie"], "T001");
        assert_eq!(value["correlativo"], "00000001");
        assert_eq!(value["ext"], "pdf");
        assert_eq!(value["status"], "DUPLICATE");
    }

    #[test]
    fn record_deserializes_from_flat_mapping() {
        let json = serde_json::to_string(&sample_record()).unwrap();
        let parsed: DocumentRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sample_record());
    }

    #[test]
    fn kind_names_match_serde_tags() {
        for kind in DocumentKind::ALL {
            let value = serde_json::to_value(kind).unwrap();
            assert_eq!(value, kind.as_str());
        }
    }

    #[test]
    fn vouchers_have_no_ruc_field() {
        let fields = DocumentFields::Boleta(ComprobanteFields {
            tipo_doc: "03".to_string(),
            serie: "B001".to_string(),
            correlativo: "15".to_string(),
            ext: "xml".to_string(),
        });
        assert_eq!(fields.kind(), DocumentKind::Boleta);
        assert_eq!(fields.ext(), "xml");
        assert!(fields.ruc().is_none());
    }
}
