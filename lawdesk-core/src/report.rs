//! Accounts reports: open receivables and payables with their grand total.
//!
//! A report is a read-only snapshot computed by the server. The body is
//! `{ "items": [...], "total_geral": <amount>, "quantidade_items": <n> }`;
//! a `null` body is an empty report.

use crate::entities::{fmt_day, lenient, or_dash, Money};
use crate::error::DecodeError;
use crate::resource::RecordId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Receivables,
    Payables,
}

impl ReportKind {
    pub fn all() -> &'static [ReportKind] {
        &[ReportKind::Receivables, ReportKind::Payables]
    }

    /// Position in [`ReportKind::all`].
    pub fn index(&self) -> usize {
        match self {
            ReportKind::Receivables => 0,
            ReportKind::Payables => 1,
        }
    }

    /// Path of the report endpoint, relative to the API base URL.
    pub fn path(&self) -> &'static str {
        match self {
            ReportKind::Receivables => "relatorios/contas-a-receber",
            ReportKind::Payables => "relatorios/contas-a-pagar",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Receivables => "Receivables report",
            ReportKind::Payables => "Payables report",
        }
    }

    /// Column headers, matching [`ReportItem::cells`].
    pub fn headers(&self) -> &'static [&'static str] {
        match self {
            ReportKind::Receivables => {
                &["Description", "Client", "Case", "Amount", "Due", "Status"]
            }
            ReportKind::Payables => &["Description", "Case", "Amount", "Due", "Status"],
        }
    }

    /// Column widths in percent, matching [`ReportKind::headers`].
    pub fn widths(&self) -> &'static [u16] {
        match self {
            ReportKind::Receivables => &[28, 18, 18, 13, 11, 12],
            ReportKind::Payables => &[34, 24, 15, 13, 14],
        }
    }

    pub fn status_column(&self) -> usize {
        self.headers().len() - 1
    }

    pub fn total_label(&self) -> &'static str {
        match self {
            ReportKind::Receivables => "Total receivable",
            ReportKind::Payables => "Total payable",
        }
    }

    pub fn empty_message(&self) -> &'static str {
        match self {
            ReportKind::Receivables => "No pending or overdue receivables.",
            ReportKind::Payables => "No pending or overdue payables.",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// One open entry of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportItem {
    pub id: RecordId,
    pub descricao: String,
    pub valor: Money,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cliente_nome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caso_titulo: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_day",
        skip_serializing_if = "Option::is_none"
    )]
    pub data_vencimento: Option<NaiveDate>,
}

impl ReportItem {
    pub fn cells(&self, kind: ReportKind) -> Vec<String> {
        match kind {
            ReportKind::Receivables => vec![
                self.descricao.clone(),
                or_dash(&self.cliente_nome),
                or_dash(&self.caso_titulo),
                self.valor.to_brl(),
                fmt_day(self.data_vencimento),
                self.status.clone(),
            ],
            ReportKind::Payables => vec![
                self.descricao.clone(),
                self.caso_titulo
                    .clone()
                    .filter(|title| !title.trim().is_empty())
                    .unwrap_or_else(|| "General expense".to_string()),
                self.valor.to_brl(),
                fmt_day(self.data_vencimento),
                self.status.clone(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Report {
    pub items: Vec<ReportItem>,
    pub total_geral: Money,
    pub quantidade_items: usize,
}

impl Report {
    /// Decode a report body. Missing totals fall back to zero and to the
    /// number of decoded items.
    pub fn decode(kind: ReportKind, body: serde_json::Value) -> Result<Self, DecodeError> {
        let mut object = match body {
            serde_json::Value::Null => return Ok(Self::default()),
            serde_json::Value::Object(object) => object,
            _ => return Err(DecodeError::NotAReport { report: kind }),
        };
        let items = match object.remove("items") {
            None | Some(serde_json::Value::Null) => Vec::new(),
            Some(serde_json::Value::Array(rows)) => rows
                .into_iter()
                .enumerate()
                .map(|(index, row)| {
                    serde_json::from_value(row).map_err(|source| DecodeError::InvalidReportItem {
                        report: kind,
                        index,
                        source,
                    })
                })
                .collect::<Result<Vec<ReportItem>, _>>()?,
            Some(_) => return Err(DecodeError::NotACollection { key: "items" }),
        };
        let total_geral = match object.remove("total_geral") {
            None | Some(serde_json::Value::Null) => Money::default(),
            Some(value) => serde_json::from_value(value)?,
        };
        let quantidade_items = object
            .get("quantidade_items")
            .and_then(serde_json::Value::as_u64)
            .map(|count| count as usize)
            .unwrap_or(items.len());
        Ok(Self {
            items,
            total_geral,
            quantidade_items,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Totals line, e.g. `Total receivable: R$ 1.234,56 (3 item(s))`.
    pub fn totals_line(&self, kind: ReportKind) -> String {
        format!(
            "{}: {} ({} item(s))",
            kind.total_label(),
            self.total_geral.to_brl(),
            self.quantidade_items
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn receivables_body() -> serde_json::Value {
        json!({
            "items": [
                {
                    "id": 3,
                    "descricao": "Honorários iniciais",
                    "cliente_nome": "Maria Silva",
                    "caso_titulo": "Ação trabalhista",
                    "valor": "1500.00",
                    "data_vencimento": "2024-05-10",
                    "status": "Pendente"
                },
                {
                    "id": 4,
                    "descricao": "Parcela 2",
                    "cliente_nome": null,
                    "valor": 250.5,
                    "data_vencimento": "2024-04-01T00:00:00",
                    "status": "Vencido"
                }
            ],
            "total_geral": "1750.50",
            "quantidade_items": 2
        })
    }

    #[test]
    fn test_decode_receivables_report() {
        let report = Report::decode(ReportKind::Receivables, receivables_body()).unwrap();
        assert_eq!(report.items.len(), 2);
        assert_eq!(report.total_geral, Money::from_cents(175_050));
        assert_eq!(report.quantidade_items, 2);
        assert_eq!(
            report.items[0].cells(ReportKind::Receivables),
            vec![
                "Honorários iniciais",
                "Maria Silva",
                "Ação trabalhista",
                "R$ 1.500,00",
                "10/05/2024",
                "Pendente"
            ]
        );
        assert_eq!(report.items[1].cells(ReportKind::Receivables)[1], "-");
        assert_eq!(
            report.totals_line(ReportKind::Receivables),
            "Total receivable: R$ 1.750,50 (2 item(s))"
        );
    }

    #[test]
    fn test_payables_without_case_are_general() {
        let body = json!({
            "items": [{
                "id": 9,
                "descricao": "Aluguel",
                "valor": 3200,
                "status": "A Pagar"
            }],
            "total_geral": 3200
        });
        let report = Report::decode(ReportKind::Payables, body).unwrap();
        let cells = report.items[0].cells(ReportKind::Payables);
        assert_eq!(cells.len(), ReportKind::Payables.headers().len());
        assert_eq!(cells[1], "General expense");
        assert_eq!(cells[3], "-");
        assert_eq!(report.quantidade_items, 1);
    }

    #[test]
    fn test_null_body_is_empty_report() {
        let report = Report::decode(ReportKind::Payables, serde_json::Value::Null).unwrap();
        assert!(report.is_empty());
        assert_eq!(
            report.totals_line(ReportKind::Payables),
            "Total payable: R$ 0,00 (0 item(s))"
        );
    }

    #[test]
    fn test_bad_item_reports_its_index() {
        let body = json!({
            "items": [
                {"id": 1, "descricao": "ok", "valor": 1, "status": "Pendente"},
                {"id": 2, "descricao": "sem valor", "status": "Pendente"}
            ]
        });
        let err = Report::decode(ReportKind::Receivables, body).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidReportItem { index: 1, .. }));
        let err = Report::decode(ReportKind::Receivables, json!([])).unwrap_err();
        assert!(matches!(err, DecodeError::NotAReport { .. }));
    }

    #[test]
    fn test_headers_and_widths_line_up() {
        for kind in ReportKind::all() {
            assert_eq!(kind.headers().len(), kind.widths().len());
            assert_eq!(kind.headers()[kind.status_column()], "Status");
            assert_eq!(kind.widths().iter().sum::<u16>(), 100);
            assert_eq!(ReportKind::all()[kind.index()], *kind);
        }
    }
}
