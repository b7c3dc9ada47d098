//! Resource kinds and the trait that ties a record type to its endpoint.

use crate::schema::{self, ResourceSchema};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-side primary key of a record.
pub type RecordId = i64;

/// One managed business object exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Client,
    Case,
    Receivable,
    Expense,
    Document,
    AgendaEvent,
}

impl ResourceKind {
    pub fn all() -> &'static [ResourceKind] {
        &[
            ResourceKind::Client,
            ResourceKind::Case,
            ResourceKind::Receivable,
            ResourceKind::Expense,
            ResourceKind::Document,
            ResourceKind::AgendaEvent,
        ]
    }

    /// Path segment of the collection endpoint, also the JSON key that
    /// wraps the returned rows.
    pub fn path(&self) -> &'static str {
        match self {
            ResourceKind::Client => "clientes",
            ResourceKind::Case => "casos",
            ResourceKind::Receivable => "recebimentos",
            ResourceKind::Expense => "despesas",
            ResourceKind::Document => "documentos",
            ResourceKind::AgendaEvent => "eventos",
        }
    }

    pub fn collection_key(&self) -> &'static str {
        self.path()
    }

    /// Plural display title.
    pub fn title(&self) -> &'static str {
        match self {
            ResourceKind::Client => "Clients",
            ResourceKind::Case => "Cases",
            ResourceKind::Receivable => "Receivables",
            ResourceKind::Expense => "Expenses",
            ResourceKind::Document => "Documents",
            ResourceKind::AgendaEvent => "Agenda",
        }
    }

    /// Singular, lowercase noun used in messages.
    pub fn noun(&self) -> &'static str {
        match self {
            ResourceKind::Client => "client",
            ResourceKind::Case => "case",
            ResourceKind::Receivable => "receivable",
            ResourceKind::Expense => "expense",
            ResourceKind::Document => "document",
            ResourceKind::AgendaEvent => "event",
        }
    }

    pub fn schema(&self) -> &'static ResourceSchema {
        match self {
            ResourceKind::Client => &schema::CLIENT,
            ResourceKind::Case => &schema::CASE,
            ResourceKind::Receivable => &schema::RECEIVABLE,
            ResourceKind::Expense => &schema::EXPENSE,
            ResourceKind::Document => &schema::DOCUMENT,
            ResourceKind::AgendaEvent => &schema::AGENDA_EVENT,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// A record type returned by one collection endpoint.
///
/// Implemented by each entity in [`crate::entities`]. The generic list view
/// is parameterized over this trait, so one implementation serves every
/// resource.
pub trait Resource:
    DeserializeOwned + Serialize + Clone + fmt::Debug + Send + Sync + 'static
{
    const KIND: ResourceKind;

    fn id(&self) -> RecordId;

    /// Table cells, one per column of the resource schema.
    fn cells(&self) -> Vec<String>;

    /// Label/value pairs for the detail panel.
    fn details(&self) -> Vec<(&'static str, String)>;

    fn schema() -> &'static ResourceSchema {
        Self::KIND.schema()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_unique() {
        let mut paths: Vec<_> = ResourceKind::all().iter().map(|k| k.path()).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), ResourceKind::all().len());
    }

    #[test]
    fn test_schema_kind_matches() {
        for kind in ResourceKind::all() {
            assert_eq!(kind.schema().kind, *kind);
        }
    }
}
