//! Create/update payloads and their client-side validation.
//!
//! A draft is validated before any request is built; every failing field is
//! reported at once so the user can correct them together.

use crate::entities::{AgendaEvent, Money, PersonType};
use crate::error::ValidationError;
use crate::resource::{RecordId, ResourceKind};
use crate::schema::{CASE_STATUSES, EVENT_TYPES, EXPENSE_STATUSES, RECEIVABLE_STATUSES};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// A JSON body for `POST /{resource}` or `PUT /{resource}/{id}`.
pub trait Draft: Serialize + Send + Sync {
    const KIND: ResourceKind;

    fn validate(&self) -> Result<(), Vec<ValidationError>>;
}

fn require(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(ValidationError::required(field));
    }
}

fn require_one_of(errors: &mut Vec<ValidationError>, field: &str, value: &str, options: &[&str]) {
    if value.trim().is_empty() {
        errors.push(ValidationError::required(field));
    } else if !options.contains(&value) {
        errors.push(ValidationError::invalid(
            field,
            format!("expected one of: {}", options.join(", ")),
        ));
    }
}

fn require_positive(errors: &mut Vec<ValidationError>, field: &str, value: Money) {
    if value.cents() <= 0 {
        errors.push(ValidationError::invalid(field, "must be a positive amount"));
    }
}

fn finish(errors: Vec<ValidationError>) -> Result<(), Vec<ValidationError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Loose `local@domain.tld` shape check.
pub fn is_plausible_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientDraft {
    pub nome_razao_social: String,
    pub cpf_cnpj: String,
    pub tipo_pessoa: PersonType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefone: Option<String>,
}

impl Draft for ClientDraft {
    const KIND: ResourceKind = ResourceKind::Client;

    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        require(&mut errors, "nome_razao_social", &self.nome_razao_social);
        let digits = self.cpf_cnpj.chars().filter(char::is_ascii_digit).count();
        if self.cpf_cnpj.trim().is_empty() {
            errors.push(ValidationError::required("cpf_cnpj"));
        } else if digits != self.tipo_pessoa.document_digits() {
            errors.push(ValidationError::invalid(
                "cpf_cnpj",
                format!(
                    "{} must have {} digits",
                    if self.tipo_pessoa == PersonType::Individual { "CPF" } else { "CNPJ" },
                    self.tipo_pessoa.document_digits()
                ),
            ));
        }
        if let Some(email) = self.email.as_deref().filter(|e| !e.trim().is_empty()) {
            if !is_plausible_email(email) {
                errors.push(ValidationError::invalid("email", "invalid email format"));
            }
        }
        finish(errors)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseDraft {
    pub titulo: String,
    pub cliente_id: RecordId,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numero_processo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valor_causa: Option<Money>,
}

impl Draft for CaseDraft {
    const KIND: ResourceKind = ResourceKind::Case;

    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        require(&mut errors, "titulo", &self.titulo);
        if self.cliente_id <= 0 {
            errors.push(ValidationError::required("cliente_id"));
        }
        require_one_of(&mut errors, "status", &self.status, CASE_STATUSES);
        if let Some(value) = self.valor_causa {
            if value.cents() < 0 {
                errors.push(ValidationError::invalid("valor_causa", "must not be negative"));
            }
        }
        finish(errors)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceivableDraft {
    pub descricao: String,
    pub cliente_id: RecordId,
    pub caso_id: RecordId,
    pub categoria: String,
    pub valor: Money,
    pub data_vencimento: NaiveDate,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_recebimento: Option<NaiveDate>,
}

impl Draft for ReceivableDraft {
    const KIND: ResourceKind = ResourceKind::Receivable;

    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        require(&mut errors, "descricao", &self.descricao);
        if self.cliente_id <= 0 {
            errors.push(ValidationError::required("cliente_id"));
        }
        if self.caso_id <= 0 {
            errors.push(ValidationError::required("caso_id"));
        }
        require(&mut errors, "categoria", &self.categoria);
        require_positive(&mut errors, "valor", self.valor);
        require_one_of(&mut errors, "status", &self.status, RECEIVABLE_STATUSES);
        finish(errors)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseDraft {
    pub descricao: String,
    /// `None` records a general expense, not tied to a case.
    pub caso_id: Option<RecordId>,
    pub categoria: String,
    pub valor: Money,
    pub data_vencimento: NaiveDate,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_despesa: Option<NaiveDate>,
}

impl Draft for ExpenseDraft {
    const KIND: ResourceKind = ResourceKind::Expense;

    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        require(&mut errors, "descricao", &self.descricao);
        require(&mut errors, "categoria", &self.categoria);
        require_positive(&mut errors, "valor", self.valor);
        require_one_of(&mut errors, "status", &self.status, EXPENSE_STATUSES);
        finish(errors)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgendaEventDraft {
    pub titulo: String,
    pub tipo_evento: String,
    #[serde(with = "naive_seconds")]
    pub data_inicio: NaiveDateTime,
    #[serde(with = "naive_seconds_opt")]
    pub data_fim: Option<NaiveDateTime>,
    pub descricao: Option<String>,
    pub caso_id: Option<RecordId>,
    pub concluido: bool,
}

impl AgendaEventDraft {
    /// Draft that re-submits `event` with its completion flag flipped.
    pub fn toggled(event: &AgendaEvent) -> Self {
        Self {
            titulo: event.titulo.clone(),
            tipo_evento: event.tipo_evento.clone(),
            data_inicio: event.data_inicio,
            data_fim: event.data_fim,
            descricao: event.descricao.clone(),
            caso_id: event.caso_id,
            concluido: !event.concluido,
        }
    }
}

impl Draft for AgendaEventDraft {
    const KIND: ResourceKind = ResourceKind::AgendaEvent;

    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        require(&mut errors, "titulo", &self.titulo);
        require_one_of(&mut errors, "tipo_evento", &self.tipo_evento, EVENT_TYPES);
        if let Some(end) = self.data_fim {
            if end < self.data_inicio {
                errors.push(ValidationError::InvertedRange {
                    from: "data_inicio".to_string(),
                    to: "data_fim".to_string(),
                });
            }
        }
        finish(errors)
    }
}

// Timestamps go out without fractional seconds or offset.
mod naive_seconds {
    use chrono::NaiveDateTime;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.format("%Y-%m-%dT%H:%M:%S").to_string())
    }
}

mod naive_seconds_opt {
    use chrono::NaiveDateTime;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        s: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => s.serialize_str(&value.format("%Y-%m-%dT%H:%M:%S").to_string()),
            None => s.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::parse_timestamp;

    fn client_draft() -> ClientDraft {
        ClientDraft {
            nome_razao_social: "Maria Silva".to_string(),
            cpf_cnpj: "123.456.789-01".to_string(),
            tipo_pessoa: PersonType::Individual,
            email: Some("maria@example.com".to_string()),
            telefone: None,
        }
    }

    #[test]
    fn test_valid_client_passes() {
        assert!(client_draft().validate().is_ok());
    }

    #[test]
    fn test_client_document_digits_follow_person_type() {
        let mut draft = client_draft();
        draft.tipo_pessoa = PersonType::Company;
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field(), "cpf_cnpj");
    }

    #[test]
    fn test_all_failures_reported() {
        let draft = ReceivableDraft {
            descricao: " ".to_string(),
            cliente_id: 0,
            caso_id: 3,
            categoria: "Consultoria".to_string(),
            valor: Money::from_cents(0),
            data_vencimento: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            status: "Pago".to_string(),
            data_recebimento: None,
        };
        let fields: Vec<String> = draft
            .validate()
            .unwrap_err()
            .iter()
            .map(|e| e.field().to_string())
            .collect();
        assert_eq!(fields, vec!["descricao", "cliente_id", "valor"]);
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_plausible_email("a@b.co"));
        assert!(!is_plausible_email("a@b"));
        assert!(!is_plausible_email("a b@c.d"));
        assert!(!is_plausible_email("@c.d"));
    }

    #[test]
    fn test_toggled_event_draft() {
        let event = AgendaEvent {
            id: 9,
            titulo: "Audiência".to_string(),
            tipo_evento: "Audiência".to_string(),
            data_inicio: parse_timestamp("2024-03-01T14:00:00.500").unwrap(),
            data_fim: None,
            descricao: None,
            cliente_id: None,
            caso_id: Some(4),
            caso_titulo: Some("Silva x Souza".to_string()),
            concluido: false,
        };
        let draft = AgendaEventDraft::toggled(&event);
        assert!(draft.concluido);
        assert!(draft.validate().is_ok());
        let body = serde_json::to_value(&draft).unwrap();
        assert_eq!(body["data_inicio"], "2024-03-01T14:00:00");
        assert!(body.get("caso_titulo").is_none());
    }
}
