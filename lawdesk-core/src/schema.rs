//! Per-resource schemas driving the generic list view.
//!
//! A schema declares which filters a collection endpoint accepts (in the
//! order they are sent), which columns the table shows and which of them
//! the server can sort by, and the default sort.

use crate::resource::ResourceKind;
use crate::sort::{SortDirection, SortState};

pub const CASE_STATUSES: &[&str] = &["Ativo", "Suspenso", "Encerrado", "Arquivado"];
pub const RECEIVABLE_STATUSES: &[&str] = &["Pendente", "Pago", "Vencido", "Cancelado"];
pub const EXPENSE_STATUSES: &[&str] = &["A Pagar", "Paga", "Vencida", "Cancelada"];
pub const EVENT_TYPES: &[&str] = &["Prazo", "Audiência", "Reunião", "Lembrete", "Outro"];
pub const PERSON_TYPES: &[&str] = &["PF", "PJ"];

/// How a filter value is entered and sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Free text, sent as typed.
    Text,
    /// One of a fixed set of values.
    Choice(&'static [&'static str]),
    /// Calendar date bound, sent as `YYYY-MM-DD`.
    Date,
    /// Reference to another record by id.
    RecordId,
    /// Reference to a case, or records not linked to any case.
    CaseLink,
    /// Boolean flag, sent as `true`/`false`.
    Flag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSpec {
    /// Query parameter name.
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FilterKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub label: &'static str,
    /// `sort_by` value when the column is sortable.
    pub sort_key: Option<&'static str>,
    /// Share of the table width, in percent.
    pub width: u16,
}

#[derive(Debug)]
pub struct ResourceSchema {
    pub kind: ResourceKind,
    pub filters: &'static [FilterSpec],
    /// Pairs of date filters where the first must not be after the second.
    pub date_ranges: &'static [(&'static str, &'static str)],
    pub columns: &'static [ColumnSpec],
    pub default_sort: (&'static str, SortDirection),
}

impl ResourceSchema {
    pub fn filter(&self, name: &str) -> Option<&'static FilterSpec> {
        self.filters.iter().find(|spec| spec.name == name)
    }

    pub fn is_sortable(&self, field: &str) -> bool {
        self.columns
            .iter()
            .any(|column| column.sort_key == Some(field))
    }

    pub fn default_sort(&self) -> SortState {
        let (field, direction) = self.default_sort;
        SortState::new(field, direction)
    }

    /// Index of the column sorted by `field`.
    pub fn column_index(&self, field: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.sort_key == Some(field))
    }
}

const fn text(name: &'static str, label: &'static str) -> FilterSpec {
    FilterSpec {
        name,
        label,
        kind: FilterKind::Text,
    }
}

const fn choice(
    name: &'static str,
    label: &'static str,
    options: &'static [&'static str],
) -> FilterSpec {
    FilterSpec {
        name,
        label,
        kind: FilterKind::Choice(options),
    }
}

const fn date(name: &'static str, label: &'static str) -> FilterSpec {
    FilterSpec {
        name,
        label,
        kind: FilterKind::Date,
    }
}

const fn record(name: &'static str, label: &'static str) -> FilterSpec {
    FilterSpec {
        name,
        label,
        kind: FilterKind::RecordId,
    }
}

const fn sortable(label: &'static str, key: &'static str, width: u16) -> ColumnSpec {
    ColumnSpec {
        label,
        sort_key: Some(key),
        width,
    }
}

const fn plain(label: &'static str, width: u16) -> ColumnSpec {
    ColumnSpec {
        label,
        sort_key: None,
        width,
    }
}

pub static CLIENT: ResourceSchema = ResourceSchema {
    kind: ResourceKind::Client,
    filters: &[
        text("search", "Name or CPF/CNPJ"),
        choice("tipo_pessoa", "Person type", PERSON_TYPES),
    ],
    date_ranges: &[],
    columns: &[
        sortable("Name", "nome_razao_social", 30),
        sortable("CPF/CNPJ", "cpf_cnpj", 18),
        sortable("Type", "tipo_pessoa", 8),
        plain("Email", 26),
        plain("Phone", 18),
    ],
    default_sort: ("nome_razao_social", SortDirection::Ascending),
};

pub static CASE: ResourceSchema = ResourceSchema {
    kind: ResourceKind::Case,
    filters: &[
        text("search", "Title or case number"),
        choice("status", "Status", CASE_STATUSES),
        record("cliente_id", "Client id"),
        date("data_criacao_inicio", "Created from"),
        date("data_criacao_fim", "Created until"),
        date("data_atualizacao_inicio", "Updated from"),
        date("data_atualizacao_fim", "Updated until"),
    ],
    date_ranges: &[
        ("data_criacao_inicio", "data_criacao_fim"),
        ("data_atualizacao_inicio", "data_atualizacao_fim"),
    ],
    columns: &[
        sortable("Title", "titulo", 24),
        sortable("Client", "cliente_nome", 20),
        sortable("Case No.", "numero_processo", 18),
        sortable("Status", "status", 10),
        sortable("Created", "data_criacao", 14),
        sortable("Updated", "data_atualizacao", 14),
    ],
    default_sort: ("data_atualizacao", SortDirection::Descending),
};

pub static RECEIVABLE: ResourceSchema = ResourceSchema {
    kind: ResourceKind::Receivable,
    filters: &[
        text("search", "Description"),
        record("cliente_id", "Client id"),
        record("caso_id", "Case id"),
        choice("status", "Status", RECEIVABLE_STATUSES),
        date("data_vencimento_inicio", "Due from"),
        date("data_vencimento_fim", "Due until"),
        date("data_recebimento_inicio", "Received from"),
        date("data_recebimento_fim", "Received until"),
    ],
    date_ranges: &[
        ("data_vencimento_inicio", "data_vencimento_fim"),
        ("data_recebimento_inicio", "data_recebimento_fim"),
    ],
    columns: &[
        sortable("Description", "descricao", 26),
        sortable("Client", "cliente_nome", 18),
        sortable("Case", "caso_titulo", 18),
        sortable("Amount", "valor", 12),
        sortable("Due", "data_vencimento", 12),
        sortable("Status", "status", 14),
    ],
    default_sort: ("data_vencimento", SortDirection::Descending),
};

pub static EXPENSE: ResourceSchema = ResourceSchema {
    kind: ResourceKind::Expense,
    filters: &[
        text("search", "Description"),
        record("cliente_id", "Client id"),
        FilterSpec {
            name: "caso_id",
            label: "Case id (or 'none')",
            kind: FilterKind::CaseLink,
        },
        choice("status", "Status", EXPENSE_STATUSES),
        date("data_vencimento_inicio", "Due from"),
        date("data_vencimento_fim", "Due until"),
        date("data_despesa_inicio", "Spent from"),
        date("data_despesa_fim", "Spent until"),
    ],
    date_ranges: &[
        ("data_vencimento_inicio", "data_vencimento_fim"),
        ("data_despesa_inicio", "data_despesa_fim"),
    ],
    columns: &[
        sortable("Description", "descricao", 32),
        sortable("Case", "caso_titulo", 24),
        sortable("Amount", "valor", 14),
        sortable("Due", "data_vencimento", 14),
        sortable("Status", "status", 16),
    ],
    default_sort: ("data_vencimento", SortDirection::Descending),
};

pub static DOCUMENT: ResourceSchema = ResourceSchema {
    kind: ResourceKind::Document,
    filters: &[
        record("cliente_id", "Client id"),
        record("caso_id", "Case id"),
        text("search", "File name or description"),
    ],
    date_ranges: &[],
    columns: &[
        sortable("File", "nome_original_arquivo", 26),
        sortable("Description", "descricao", 22),
        plain("Client", 14),
        plain("Case", 14),
        sortable("Uploaded", "data_upload", 14),
        plain("Size", 10),
    ],
    default_sort: ("data_upload", SortDirection::Descending),
};

pub static AGENDA_EVENT: ResourceSchema = ResourceSchema {
    kind: ResourceKind::AgendaEvent,
    filters: &[
        text("search", "Title or description"),
        record("cliente_id", "Client id"),
        FilterSpec {
            name: "caso_id",
            label: "Case id (or 'none')",
            kind: FilterKind::CaseLink,
        },
        choice("tipo_evento", "Event type", EVENT_TYPES),
        FilterSpec {
            name: "concluido",
            label: "Completed (yes/no)",
            kind: FilterKind::Flag,
        },
        date("start", "From"),
        date("end", "Until"),
    ],
    date_ranges: &[("start", "end")],
    columns: &[
        sortable("Start", "data_inicio", 18),
        sortable("Title", "titulo", 30),
        sortable("Type", "tipo_evento", 14),
        sortable("Case", "caso_titulo", 26),
        sortable("Done", "concluido", 12),
    ],
    default_sort: ("data_inicio", SortDirection::Ascending),
};
