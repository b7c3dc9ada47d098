//! Navigation and view switching utilities.

use lawdesk_core::ResourceKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum View {
    Clients,
    Cases,
    Receivables,
    Expenses,
    Documents,
    Agenda,
}

impl View {
    pub fn title(&self) -> &'static str {
        self.kind().title()
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            View::Clients => ResourceKind::Client,
            View::Cases => ResourceKind::Case,
            View::Receivables => ResourceKind::Receivable,
            View::Expenses => ResourceKind::Expense,
            View::Documents => ResourceKind::Document,
            View::Agenda => ResourceKind::AgendaEvent,
        }
    }

    pub fn from_kind(kind: ResourceKind) -> View {
        match kind {
            ResourceKind::Client => View::Clients,
            ResourceKind::Case => View::Cases,
            ResourceKind::Receivable => View::Receivables,
            ResourceKind::Expense => View::Expenses,
            ResourceKind::Document => View::Documents,
            ResourceKind::AgendaEvent => View::Agenda,
        }
    }

    pub fn all() -> &'static [View] {
        &[
            View::Clients,
            View::Cases,
            View::Receivables,
            View::Expenses,
            View::Documents,
            View::Agenda,
        ]
    }

    pub fn index(&self) -> usize {
        Self::all().iter().position(|v| v == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<View> {
        Self::all().get(index).copied()
    }

    pub fn next(&self) -> View {
        let all = Self::all();
        all[(self.index() + 1) % all.len()]
    }

    pub fn previous(&self) -> View {
        let all = Self::all();
        let idx = self.index();
        let prev = if idx == 0 { all.len() - 1 } else { idx - 1 };
        all[prev]
    }
}
