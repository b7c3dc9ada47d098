//! Record schemas returned by the collection endpoints.
//!
//! Field names follow the API's wire format. Optional fields tolerate both
//! `null` and absence; required fields fail decoding at the boundary.

use crate::error::DecodeError;
use crate::resource::{RecordId, Resource, ResourceKind};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ============================================================================
// VALUE TYPES
// ============================================================================

/// Monetary amount in cents. The API sends amounts either as a decimal
/// string (`"1500.00"`) or a JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money {
    cents: i64,
}

impl Money {
    pub fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Parse a decimal amount such as `1500`, `1500.5` or `1500,50`.
    pub fn parse(input: &str) -> Option<Self> {
        let normalized = input.trim().replace(',', ".");
        if normalized.is_empty() {
            return None;
        }
        let (negative, digits) = match normalized.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, normalized.as_str()),
        };
        let (whole, fraction) = match digits.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (digits, ""),
        };
        if whole.is_empty() && fraction.is_empty() {
            return None;
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
            || fraction.len() > 2
        {
            return None;
        }
        let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
        let fraction: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().ok()? * 10,
            _ => fraction.parse().ok()?,
        };
        let cents = whole.checked_mul(100)?.checked_add(fraction)?;
        Some(Self {
            cents: if negative { -cents } else { cents },
        })
    }

    /// Brazilian real formatting, e.g. `R$ 1.234,56`.
    pub fn to_brl(&self) -> String {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.unsigned_abs();
        let whole = (abs / 100).to_string();
        let mut grouped = String::new();
        for (index, digit) in whole.chars().enumerate() {
            if index > 0 && (whole.len() - index) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(digit);
        }
        format!("{}R$ {},{:02}", sign, grouped, abs % 100)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.cents as f64 / 100.0)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(f64),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Text(text) => Money::parse(&text)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid amount '{}'", text))),
            Raw::Number(number) if number.is_finite() => Ok(Money {
                cents: (number * 100.0).round() as i64,
            }),
            Raw::Number(number) => Err(serde::de::Error::custom(format!(
                "invalid amount {}",
                number
            ))),
        }
    }
}

/// Client person type: individual (PF) or company (PJ).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersonType {
    #[serde(rename = "PF")]
    Individual,
    #[serde(rename = "PJ")]
    Company,
}

impl PersonType {
    pub fn as_api_str(&self) -> &'static str {
        match self {
            PersonType::Individual => "PF",
            PersonType::Company => "PJ",
        }
    }

    /// Number of digits of the CPF (PF) or CNPJ (PJ) document.
    pub fn document_digits(&self) -> usize {
        match self {
            PersonType::Individual => 11,
            PersonType::Company => 14,
        }
    }
}

impl fmt::Display for PersonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_api_str())
    }
}

// ============================================================================
// LENIENT DATE PARSING
// ============================================================================

/// Accepts `2024-01-31T10:00:00[.ffffff]`, RFC 3339 with offset, or a bare
/// date (midnight).
pub fn parse_timestamp(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    input
        .parse::<NaiveDateTime>()
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(input).ok().map(|dt| dt.naive_local()))
        .or_else(|| NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S").ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Accepts a bare date or the date part of a timestamp.
pub fn parse_day(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(input).map(|dt| dt.date()))
}

pub(crate) mod lenient {
    use super::{parse_day, parse_timestamp};
    use chrono::{NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer};

    pub fn timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        parse_timestamp(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", raw)))
    }

    pub fn opt_timestamp<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        match Option::<String>::deserialize(d)? {
            Some(raw) if !raw.trim().is_empty() => parse_timestamp(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", raw))),
            _ => Ok(None),
        }
    }

    pub fn opt_day<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        match Option::<String>::deserialize(d)? {
            Some(raw) if !raw.trim().is_empty() => parse_day(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", raw))),
            _ => Ok(None),
        }
    }
}

pub fn fmt_day(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn fmt_timestamp(ts: Option<NaiveDateTime>) -> String {
    ts.map(|t| t.format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub(crate) fn or_dash(value: &Option<String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.clone(),
        _ => "-".to_string(),
    }
}

fn fmt_size(bytes: Option<u64>) -> String {
    match bytes {
        None => "-".to_string(),
        Some(b) if b < 1024 => format!("{} B", b),
        Some(b) if b < 1024 * 1024 => format!("{:.1} KB", b as f64 / 1024.0),
        Some(b) => format!("{:.1} MB", b as f64 / (1024.0 * 1024.0)),
    }
}

// ============================================================================
// RECORDS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: RecordId,
    pub nome_razao_social: String,
    pub cpf_cnpj: String,
    pub tipo_pessoa: PersonType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefone: Option<String>,
}

impl Resource for Client {
    const KIND: ResourceKind = ResourceKind::Client;

    fn id(&self) -> RecordId {
        self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.nome_razao_social.clone(),
            self.cpf_cnpj.clone(),
            self.tipo_pessoa.to_string(),
            or_dash(&self.email),
            or_dash(&self.telefone),
        ]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Client ID", self.id.to_string()),
            ("Name", self.nome_razao_social.clone()),
            ("CPF/CNPJ", self.cpf_cnpj.clone()),
            ("Type", self.tipo_pessoa.to_string()),
            ("Email", or_dash(&self.email)),
            ("Phone", or_dash(&self.telefone)),
        ]
    }
}

/// Client reference embedded in case rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClientSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nome_razao_social: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub id: RecordId,
    pub titulo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numero_processo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cliente_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cliente: Option<ClientSummary>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub data_criacao: Option<NaiveDateTime>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub data_atualizacao: Option<NaiveDateTime>,
}

impl Case {
    pub fn client_name(&self) -> String {
        self.cliente
            .as_ref()
            .and_then(|c| c.nome_razao_social.clone())
            .unwrap_or_else(|| "N/A".to_string())
    }
}

impl Resource for Case {
    const KIND: ResourceKind = ResourceKind::Case;

    fn id(&self) -> RecordId {
        self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.titulo.clone(),
            self.client_name(),
            or_dash(&self.numero_processo),
            or_dash(&self.status),
            fmt_timestamp(self.data_criacao),
            fmt_timestamp(self.data_atualizacao),
        ]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Case ID", self.id.to_string()),
            ("Title", self.titulo.clone()),
            ("Client", self.client_name()),
            ("Case No.", or_dash(&self.numero_processo)),
            ("Status", or_dash(&self.status)),
            ("Description", or_dash(&self.descricao)),
            ("Created", fmt_timestamp(self.data_criacao)),
            ("Updated", fmt_timestamp(self.data_atualizacao)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receivable {
    pub id: RecordId,
    pub descricao: String,
    pub valor: Money,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categoria: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cliente_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cliente_nome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caso_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caso_titulo: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_day",
        skip_serializing_if = "Option::is_none"
    )]
    pub data_vencimento: Option<NaiveDate>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_day",
        skip_serializing_if = "Option::is_none"
    )]
    pub data_recebimento: Option<NaiveDate>,
}

impl Resource for Receivable {
    const KIND: ResourceKind = ResourceKind::Receivable;

    fn id(&self) -> RecordId {
        self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.descricao.clone(),
            or_dash(&self.cliente_nome),
            or_dash(&self.caso_titulo),
            self.valor.to_brl(),
            fmt_day(self.data_vencimento),
            self.status.clone(),
        ]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Receivable ID", self.id.to_string()),
            ("Description", self.descricao.clone()),
            ("Category", or_dash(&self.categoria)),
            ("Client", or_dash(&self.cliente_nome)),
            ("Case", or_dash(&self.caso_titulo)),
            ("Amount", self.valor.to_brl()),
            ("Due", fmt_day(self.data_vencimento)),
            ("Received", fmt_day(self.data_recebimento)),
            ("Status", self.status.clone()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: RecordId,
    pub descricao: String,
    pub valor: Money,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categoria: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caso_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caso_titulo: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_day",
        skip_serializing_if = "Option::is_none"
    )]
    pub data_vencimento: Option<NaiveDate>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_day",
        skip_serializing_if = "Option::is_none"
    )]
    pub data_despesa: Option<NaiveDate>,
}

impl Resource for Expense {
    const KIND: ResourceKind = ResourceKind::Expense;

    fn id(&self) -> RecordId {
        self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.descricao.clone(),
            self.caso_titulo
                .clone()
                .unwrap_or_else(|| "General expense".to_string()),
            self.valor.to_brl(),
            fmt_day(self.data_vencimento),
            self.status.clone(),
        ]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Expense ID", self.id.to_string()),
            ("Description", self.descricao.clone()),
            ("Category", or_dash(&self.categoria)),
            ("Case", or_dash(&self.caso_titulo)),
            ("Amount", self.valor.to_brl()),
            ("Due", fmt_day(self.data_vencimento)),
            ("Spent", fmt_day(self.data_despesa)),
            ("Status", self.status.clone()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: RecordId,
    pub nome_original_arquivo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cliente_nome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caso_titulo: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub data_upload: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tamanho_bytes: Option<u64>,
}

impl Resource for Document {
    const KIND: ResourceKind = ResourceKind::Document;

    fn id(&self) -> RecordId {
        self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.nome_original_arquivo.clone(),
            or_dash(&self.descricao),
            or_dash(&self.cliente_nome),
            or_dash(&self.caso_titulo),
            fmt_timestamp(self.data_upload),
            fmt_size(self.tamanho_bytes),
        ]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Document ID", self.id.to_string()),
            ("File", self.nome_original_arquivo.clone()),
            ("Description", or_dash(&self.descricao)),
            ("Client", or_dash(&self.cliente_nome)),
            ("Case", or_dash(&self.caso_titulo)),
            ("Uploaded", fmt_timestamp(self.data_upload)),
            ("Size", fmt_size(self.tamanho_bytes)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgendaEvent {
    pub id: RecordId,
    pub titulo: String,
    pub tipo_evento: String,
    #[serde(deserialize_with = "lenient::timestamp")]
    pub data_inicio: NaiveDateTime,
    #[serde(
        default,
        deserialize_with = "lenient::opt_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub data_fim: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cliente_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caso_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caso_titulo: Option<String>,
    #[serde(default)]
    pub concluido: bool,
}

impl Resource for AgendaEvent {
    const KIND: ResourceKind = ResourceKind::AgendaEvent;

    fn id(&self) -> RecordId {
        self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            fmt_timestamp(Some(self.data_inicio)),
            self.titulo.clone(),
            self.tipo_evento.clone(),
            self.caso_titulo
                .clone()
                .unwrap_or_else(|| "General".to_string()),
            if self.concluido { "yes" } else { "no" }.to_string(),
        ]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Event ID", self.id.to_string()),
            ("Title", self.titulo.clone()),
            ("Type", self.tipo_evento.clone()),
            ("Start", fmt_timestamp(Some(self.data_inicio))),
            ("End", fmt_timestamp(self.data_fim)),
            ("Case", or_dash(&self.caso_titulo)),
            ("Description", or_dash(&self.descricao)),
            ("Completed", if self.concluido { "yes" } else { "no" }.to_string()),
        ]
    }
}

// ============================================================================
// RESPONSE ENVELOPES
// ============================================================================

/// Error body sent by the API on non-2xx responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub erro: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// The server-provided message, preferring `erro`.
    pub fn into_message(self) -> Option<String> {
        self.erro
            .or(self.message)
            .filter(|message| !message.trim().is_empty())
    }
}

/// Extract and decode `{ "<collection_key>": [ ... ] }`.
pub fn decode_collection<R: Resource>(body: serde_json::Value) -> Result<Vec<R>, DecodeError> {
    let key = R::KIND.collection_key();
    let mut object = match body {
        serde_json::Value::Object(object) => object,
        _ => return Err(DecodeError::MissingCollection { key }),
    };
    let rows = match object.remove(key) {
        Some(serde_json::Value::Array(rows)) => rows,
        Some(_) => return Err(DecodeError::NotACollection { key }),
        None => return Err(DecodeError::MissingCollection { key }),
    };
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            serde_json::from_value(row).map_err(|source| DecodeError::InvalidRecord {
                resource: R::KIND,
                index,
                source,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_money_accepts_string_and_number() {
        let from_text: Money = serde_json::from_value(json!("1500.5")).unwrap();
        let from_number: Money = serde_json::from_value(json!(1500.5)).unwrap();
        assert_eq!(from_text.cents(), 150_050);
        assert_eq!(from_text, from_number);
        assert!(serde_json::from_value::<Money>(json!("abc")).is_err());
    }

    #[test]
    fn test_money_brl_format() {
        assert_eq!(Money::from_cents(123_456).to_brl(), "R$ 1.234,56");
        assert_eq!(Money::from_cents(5).to_brl(), "R$ 0,05");
        assert_eq!(Money::from_cents(100_000_000).to_brl(), "R$ 1.000.000,00");
        assert_eq!(Money::parse("10,5"), Some(Money::from_cents(1050)));
        assert_eq!(Money::parse("1.234"), None);
    }

    #[test]
    fn test_decode_clients() {
        let body = json!({
            "clientes": [
                {
                    "id": 1,
                    "nome_razao_social": "Maria Silva",
                    "cpf_cnpj": "12345678901",
                    "tipo_pessoa": "PF",
                    "email": null
                },
                {
                    "id": 2,
                    "nome_razao_social": "Silva Ltda",
                    "cpf_cnpj": "12345678000199",
                    "tipo_pessoa": "PJ",
                    "telefone": "11 5555-0000"
                }
            ]
        });
        let clients = decode_collection::<Client>(body).unwrap();
        assert_eq!(clients.len(), 2);
        assert_eq!(clients[1].tipo_pessoa, PersonType::Company);
        assert_eq!(clients[0].cells()[3], "-");
    }

    #[test]
    fn test_decode_requires_collection_key() {
        let err = decode_collection::<Client>(json!({"casos": []})).unwrap_err();
        assert!(matches!(err, DecodeError::MissingCollection { key: "clientes" }));
        let err = decode_collection::<Client>(json!({"clientes": {}})).unwrap_err();
        assert!(matches!(err, DecodeError::NotACollection { .. }));
    }

    #[test]
    fn test_decode_reports_bad_record_index() {
        let body = json!({"eventos": [
            {
                "id": 1,
                "titulo": "Audiência",
                "tipo_evento": "Audiência",
                "data_inicio": "2024-03-01T14:00:00"
            },
            {"id": 2, "titulo": "Prazo", "tipo_evento": "Prazo", "data_inicio": "amanhã"}
        ]});
        let err = decode_collection::<AgendaEvent>(body).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidRecord { index: 1, .. }));
    }

    #[test]
    fn test_lenient_timestamps() {
        assert!(parse_timestamp("2024-03-01T14:00:00.123456").is_some());
        assert!(parse_timestamp("2024-03-01T14:00:00Z").is_some());
        assert!(parse_timestamp("2024-03-01").is_some());
        assert_eq!(
            parse_day("2024-03-01T14:00:00"),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
    }

    #[test]
    fn test_error_body_prefers_erro() {
        let body: ErrorBody = serde_json::from_value(json!({
            "erro": "registros associados",
            "message": "x"
        }))
        .unwrap();
        assert_eq!(body.into_message().as_deref(), Some("registros associados"));
        let body: ErrorBody = serde_json::from_value(json!({"message": ""})).unwrap();
        assert_eq!(body.into_message(), None);
    }
}
