//! Read-only accounts report screen.
//!
//! Fetches follow the list views: [`ReportView::begin_fetch`] hands out a
//! generation-tagged [`ReportTicket`] and [`ReportView::complete_fetch`]
//! drops results of superseded tickets.

use crate::api_client::{ApiClientError, CollectionApi};
use crate::list_view::FetchOutcome;
use lawdesk_core::{Report, ReportKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTicket {
    pub kind: ReportKind,
    pub generation: u64,
}

#[derive(Debug, Clone)]
pub struct ReportView {
    kind: ReportKind,
    report: Option<Report>,
    error: Option<String>,
    loading: bool,
    generation: u64,
    selected: Option<usize>,
}

impl ReportView {
    pub fn new(kind: ReportKind) -> Self {
        Self {
            kind,
            report: None,
            error: None,
            loading: false,
            generation: 0,
            selected: None,
        }
    }

    pub fn kind(&self) -> ReportKind {
        self.kind
    }

    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub async fn fetch<A>(&mut self, api: &A) -> FetchOutcome
    where
        A: CollectionApi + ?Sized,
    {
        let ticket = self.begin_fetch();
        let result = api.report(ticket.kind).await;
        self.complete_fetch(ticket.generation, result)
    }

    pub fn begin_fetch(&mut self) -> ReportTicket {
        self.generation += 1;
        self.loading = true;
        tracing::debug!(report = %self.kind, generation = self.generation, "Report fetch started");
        ReportTicket {
            kind: self.kind,
            generation: self.generation,
        }
    }

    pub fn complete_fetch(
        &mut self,
        generation: u64,
        result: Result<serde_json::Value, ApiClientError>,
    ) -> FetchOutcome {
        if generation != self.generation {
            tracing::debug!(
                report = %self.kind,
                generation,
                latest = self.generation,
                "Discarding stale report"
            );
            return FetchOutcome::Stale;
        }
        self.loading = false;
        let kind = self.kind;
        let decoded =
            result.and_then(|body| Report::decode(kind, body).map_err(ApiClientError::from));
        match decoded {
            Ok(report) => {
                tracing::info!(
                    report = %kind,
                    generation,
                    items = report.items.len(),
                    "Report applied"
                );
                self.selected = if report.is_empty() { None } else { Some(0) };
                self.report = Some(report);
                self.error = None;
            }
            Err(err) => {
                tracing::warn!(report = %kind, generation, error = %err, "Report fetch failed");
                self.error = Some(format!(
                    "Failed to load {}: {}",
                    kind.title().to_lowercase(),
                    err.user_message()
                ));
            }
        }
        FetchOutcome::Applied
    }

    pub fn row_count(&self) -> usize {
        self.report.as_ref().map_or(0, |report| report.items.len())
    }

    pub fn table_rows(&self) -> Vec<Vec<String>> {
        match &self.report {
            Some(report) => report
                .items
                .iter()
                .map(|item| item.cells(self.kind))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn select_next(&mut self) {
        let count = self.row_count();
        self.selected = match (self.selected, count) {
            (_, 0) => None,
            (Some(index), _) => Some((index + 1) % count),
            (None, _) => Some(0),
        };
    }

    pub fn select_previous(&mut self) {
        let count = self.row_count();
        self.selected = match (self.selected, count) {
            (_, 0) => None,
            (Some(0), _) | (None, _) => Some(count - 1),
            (Some(index), _) => Some(index - 1),
        };
    }

    /// Loading notice, empty-state message, or the totals line.
    pub fn footer_text(&self) -> String {
        match &self.report {
            None if self.loading => format!("Loading {}...", self.kind.title().to_lowercase()),
            None => String::new(),
            Some(report) if report.is_empty() => self.kind.empty_message().to_string(),
            Some(report) => report.totals_line(self.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payables(count: usize) -> serde_json::Value {
        let items: Vec<_> = (1..=count)
            .map(|id| {
                json!({
                    "id": id,
                    "descricao": format!("Conta {}", id),
                    "valor": "100.00",
                    "data_vencimento": "2024-06-01",
                    "status": "A Pagar"
                })
            })
            .collect();
        json!({
            "items": items,
            "total_geral": format!("{}.00", count * 100),
            "quantidade_items": count
        })
    }

    #[test]
    fn test_loaded_report_shows_totals() {
        let mut view = ReportView::new(ReportKind::Payables);
        let ticket = view.begin_fetch();
        assert!(view.is_loading());
        assert_eq!(view.footer_text(), "Loading payables report...");

        let outcome = view.complete_fetch(ticket.generation, Ok(payables(3)));

        assert_eq!(outcome, FetchOutcome::Applied);
        assert!(!view.is_loading());
        assert_eq!(view.row_count(), 3);
        assert_eq!(view.selected_index(), Some(0));
        assert_eq!(view.table_rows()[2][2], "R$ 100,00");
        assert_eq!(view.footer_text(), "Total payable: R$ 300,00 (3 item(s))");
    }

    #[test]
    fn test_empty_report_shows_empty_state() {
        let mut view = ReportView::new(ReportKind::Receivables);
        let ticket = view.begin_fetch();
        view.complete_fetch(
            ticket.generation,
            Ok(json!({ "items": [], "total_geral": 0, "quantidade_items": 0 })),
        );
        assert_eq!(view.footer_text(), "No pending or overdue receivables.");
        assert_eq!(view.selected_index(), None);
    }

    #[test]
    fn test_older_report_is_stale() {
        let mut view = ReportView::new(ReportKind::Payables);
        let first = view.begin_fetch();
        let second = view.begin_fetch();
        assert_eq!(
            view.complete_fetch(first.generation, Ok(payables(1))),
            FetchOutcome::Stale
        );
        assert!(view.is_loading());
        view.complete_fetch(second.generation, Ok(payables(2)));
        assert_eq!(view.row_count(), 2);
    }

    #[test]
    fn test_failure_keeps_previous_report() {
        let mut view = ReportView::new(ReportKind::Payables);
        let ticket = view.begin_fetch();
        view.complete_fetch(ticket.generation, Ok(payables(2)));

        let ticket = view.begin_fetch();
        view.complete_fetch(
            ticket.generation,
            Err(ApiClientError::Http {
                status: 500,
                message: "Erro interno".to_string(),
            }),
        );

        assert_eq!(
            view.error(),
            Some("Failed to load payables report: Erro interno")
        );
        assert_eq!(view.row_count(), 2);
        assert!(!view.is_loading());
    }

    #[test]
    fn test_selection_wraps() {
        let mut view = ReportView::new(ReportKind::Payables);
        let ticket = view.begin_fetch();
        view.complete_fetch(ticket.generation, Ok(payables(2)));
        view.select_previous();
        assert_eq!(view.selected_index(), Some(1));
        view.select_next();
        assert_eq!(view.selected_index(), Some(0));
    }
}
