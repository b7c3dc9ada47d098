//! Generic list/filter/sort view over one collection endpoint.
//!
//! One `ListView<R>` exists per resource. A fetch is split in two so the
//! event loop never waits on the network: [`ListController::begin_fetch`]
//! issues a generation-tagged [`FetchTicket`], and
//! [`ListController::complete_fetch`] applies a result only when it belongs
//! to the latest ticket. Rows are replaced wholesale and stay on screen
//! while a newer fetch is in flight.

use crate::api_client::{ApiClientError, CollectionApi};
use crate::confirm::Confirmation;
use lawdesk_core::{
    decode_collection, AgendaEvent, AgendaEventDraft, CollectionQuery, FilterError, FilterState,
    FilterValue, RecordId, Resource, ResourceKind, ResourceSchema, SortError, SortState,
};
use std::time::{Duration, Instant};

/// A fetch that was started and must be completed with its generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub kind: ResourceKind,
    pub generation: u64,
    pub query: CollectionQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer fetch was issued after this one; the result was dropped.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Declined,
    Deleted,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct ListView<R: Resource> {
    filters: FilterState,
    sort: SortState,
    rows: Vec<R>,
    error: Option<String>,
    loading: bool,
    loaded_once: bool,
    generation: u64,
    selected: Option<RecordId>,
    sort_cursor: usize,
    dirty_since: Option<Instant>,
}

impl<R: Resource> ListView<R> {
    pub fn new() -> Self {
        let schema = R::schema();
        let sort = schema.default_sort();
        let sort_cursor = schema.column_index(&sort.field).unwrap_or(0);
        Self {
            filters: FilterState::new(),
            sort,
            rows: Vec::new(),
            error: None,
            loading: false,
            loaded_once: false,
            generation: 0,
            selected: None,
            sort_cursor,
            dirty_since: None,
        }
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn selected_row(&self) -> Option<&R> {
        let id = self.selected?;
        self.rows.iter().find(|row| row.id() == id)
    }

    /// Build the query, issue `GET`, and apply the result.
    ///
    /// Returns `None` when the filters did not validate and no request was
    /// sent.
    pub async fn fetch<A>(&mut self, api: &A) -> Option<FetchOutcome>
    where
        A: CollectionApi + ?Sized,
    {
        let ticket = self.begin_fetch()?;
        let result = api.list(ticket.kind, &ticket.query).await;
        Some(self.complete_fetch(ticket.generation, result))
    }

    /// Wait for `confirmation`, then delete `id` and re-fetch on success.
    pub async fn delete_row<A>(
        &mut self,
        id: RecordId,
        confirmation: Confirmation,
        api: &A,
    ) -> DeleteOutcome
    where
        A: CollectionApi + ?Sized,
    {
        if !confirmation.await {
            return DeleteOutcome::Declined;
        }
        let result = api.delete(R::KIND, id).await;
        let outcome = self.complete_delete(id, result);
        if outcome == DeleteOutcome::Deleted {
            self.fetch(api).await;
        }
        outcome
    }

    fn fix_selection(&mut self) {
        let still_present = self
            .selected
            .map(|id| self.rows.iter().any(|row| row.id() == id))
            .unwrap_or(false);
        if !still_present {
            self.selected = self.rows.first().map(Resource::id);
        }
    }

    fn noun(&self) -> &'static str {
        R::KIND.noun()
    }

    fn failure_message(&self, verb: &str, id: RecordId, err: &ApiClientError) -> String {
        if err.is_conflict() {
            err.user_message()
        } else {
            format!(
                "Failed to {} {} #{}: {}",
                verb,
                self.noun(),
                id,
                err.user_message()
            )
        }
    }
}

impl<R: Resource> Default for ListView<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl ListView<AgendaEvent> {
    /// Id and `PUT` body that flip the completion flag of the selected event.
    pub fn completion_toggle(&self) -> Option<(RecordId, AgendaEventDraft)> {
        let event = self.selected_row()?;
        Some((event.id, AgendaEventDraft::toggled(event)))
    }
}

/// Resource-independent view operations, used by the app to drive the
/// active view without knowing its record type.
pub trait ListController: Send {
    fn kind(&self) -> ResourceKind;

    fn schema(&self) -> &'static ResourceSchema {
        self.kind().schema()
    }

    fn filters(&self) -> &FilterState;

    fn sort(&self) -> &SortState;

    fn error(&self) -> Option<&str>;

    fn is_loading(&self) -> bool;

    /// Generation of the most recently issued fetch.
    fn generation(&self) -> u64;

    /// Set or clear a filter. The re-fetch is debounced, see
    /// [`ListController::poll_debounce`].
    fn set_filter(&mut self, name: &str, value: Option<FilterValue>) -> Result<(), FilterError>;

    /// Parse user input and set the filter. Blank input clears it.
    fn set_filter_input(&mut self, name: &str, input: &str) -> Result<(), FilterError>;

    /// Same field flips the direction, a new field sorts ascending. Issues
    /// the re-fetch immediately.
    fn request_sort(&mut self, field: &str) -> Result<Option<FetchTicket>, SortError>;

    /// Sort by the column under the sort cursor.
    fn sort_by_cursor(&mut self) -> Result<Option<FetchTicket>, SortError>;

    fn sort_cursor(&self) -> usize;

    /// Move the sort cursor over sortable columns, wrapping around.
    fn move_sort_cursor(&mut self, forward: bool);

    /// Adopt a previously saved sort. Unsortable fields are ignored.
    fn restore_sort(&mut self, sort: SortState) -> bool;

    /// Clear all filters, restore the default sort, and re-fetch.
    fn reset_filters(&mut self) -> Option<FetchTicket>;

    /// Start a fetch of the current filters and sort.
    ///
    /// Returns `None` and sets the error line when the filters fail
    /// client-side validation; no request is sent in that case.
    fn begin_fetch(&mut self) -> Option<FetchTicket>;

    /// Start the pending debounced fetch once `delay` has passed since the
    /// last filter edit.
    fn poll_debounce(&mut self, now: Instant, delay: Duration) -> Option<FetchTicket>;

    fn has_pending_edit(&self) -> bool;

    fn complete_fetch(
        &mut self,
        generation: u64,
        result: Result<serde_json::Value, ApiClientError>,
    ) -> FetchOutcome;

    fn complete_delete(&mut self, id: RecordId, result: Result<(), ApiClientError>)
        -> DeleteOutcome;

    /// Returns `true` when the update succeeded and the view should re-fetch.
    fn complete_update(
        &mut self,
        id: RecordId,
        result: Result<serde_json::Value, ApiClientError>,
    ) -> bool;

    fn selected_id(&self) -> Option<RecordId>;

    fn selected_index(&self) -> Option<usize>;

    fn selected_details(&self) -> Option<Vec<(&'static str, String)>>;

    fn select_next(&mut self);

    fn select_previous(&mut self);

    fn row_count(&self) -> usize;

    /// Table cells of every row, one entry per schema column.
    fn table_rows(&self) -> Vec<Vec<String>>;

    fn footer_text(&self) -> String;
}

impl<R: Resource> ListController for ListView<R> {
    fn kind(&self) -> ResourceKind {
        R::KIND
    }

    fn filters(&self) -> &FilterState {
        &self.filters
    }

    fn sort(&self) -> &SortState {
        &self.sort
    }

    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn is_loading(&self) -> bool {
        self.loading
    }

    fn generation(&self) -> u64 {
        self.generation
    }

    fn set_filter(&mut self, name: &str, value: Option<FilterValue>) -> Result<(), FilterError> {
        let before = self.filters.clone();
        self.filters.set(R::schema(), name, value)?;
        if self.filters != before {
            self.dirty_since = Some(Instant::now());
        }
        Ok(())
    }

    fn set_filter_input(&mut self, name: &str, input: &str) -> Result<(), FilterError> {
        let before = self.filters.clone();
        if let Err(err) = self.filters.set_input(R::schema(), name, input) {
            // The last parsed value no longer matches the input; drop it and
            // hold the fetch until the input parses again.
            if matches!(err, FilterError::Invalid(_)) {
                let _ = self.filters.set(R::schema(), name, None);
                self.dirty_since = None;
            }
            return Err(err);
        }
        if self.filters != before {
            self.dirty_since = Some(Instant::now());
        }
        Ok(())
    }

    fn request_sort(&mut self, field: &str) -> Result<Option<FetchTicket>, SortError> {
        let schema = R::schema();
        if !schema.is_sortable(field) {
            return Err(SortError::UnsortableField {
                resource: R::KIND,
                field: field.to_string(),
            });
        }
        self.sort.toggle(field);
        if let Some(index) = schema.column_index(field) {
            self.sort_cursor = index;
        }
        Ok(self.begin_fetch())
    }

    fn sort_by_cursor(&mut self) -> Result<Option<FetchTicket>, SortError> {
        let column = R::schema().columns.get(self.sort_cursor);
        match column.and_then(|column| column.sort_key) {
            Some(field) => self.request_sort(field),
            None => Err(SortError::UnsortableField {
                resource: R::KIND,
                field: column.map(|c| c.label).unwrap_or_default().to_string(),
            }),
        }
    }

    fn sort_cursor(&self) -> usize {
        self.sort_cursor
    }

    fn move_sort_cursor(&mut self, forward: bool) {
        let columns = R::schema().columns;
        if columns.is_empty() {
            return;
        }
        let len = columns.len();
        let mut index = self.sort_cursor.min(len - 1);
        for _ in 0..len {
            index = if forward {
                (index + 1) % len
            } else if index == 0 {
                len - 1
            } else {
                index - 1
            };
            if columns[index].sort_key.is_some() {
                self.sort_cursor = index;
                return;
            }
        }
    }

    fn restore_sort(&mut self, sort: SortState) -> bool {
        let schema = R::schema();
        if !schema.is_sortable(&sort.field) {
            return false;
        }
        if let Some(index) = schema.column_index(&sort.field) {
            self.sort_cursor = index;
        }
        self.sort = sort;
        true
    }

    fn reset_filters(&mut self) -> Option<FetchTicket> {
        let schema = R::schema();
        self.filters.clear();
        self.sort = schema.default_sort();
        self.sort_cursor = schema.column_index(&self.sort.field).unwrap_or(0);
        self.begin_fetch()
    }

    fn begin_fetch(&mut self) -> Option<FetchTicket> {
        self.dirty_since = None;
        let query = match CollectionQuery::build(R::schema(), &self.filters, &self.sort) {
            Ok(query) => query,
            Err(err) => {
                tracing::debug!(resource = %R::KIND, error = %err, "Filters rejected");
                // Results of fetches for the previous filters no longer apply.
                self.generation += 1;
                self.loading = false;
                self.error = Some(err.to_string());
                return None;
            }
        };
        self.generation += 1;
        self.loading = true;
        tracing::debug!(
            resource = %R::KIND,
            generation = self.generation,
            query = %query,
            "Fetch started"
        );
        Some(FetchTicket {
            kind: R::KIND,
            generation: self.generation,
            query,
        })
    }

    fn poll_debounce(&mut self, now: Instant, delay: Duration) -> Option<FetchTicket> {
        let since = self.dirty_since?;
        if now.saturating_duration_since(since) < delay {
            return None;
        }
        self.begin_fetch()
    }

    fn has_pending_edit(&self) -> bool {
        self.dirty_since.is_some()
    }

    fn complete_fetch(
        &mut self,
        generation: u64,
        result: Result<serde_json::Value, ApiClientError>,
    ) -> FetchOutcome {
        if generation != self.generation {
            tracing::debug!(
                resource = %R::KIND,
                generation,
                latest = self.generation,
                "Discarding stale fetch result"
            );
            return FetchOutcome::Stale;
        }
        self.loading = false;
        let decoded =
            result.and_then(|body| decode_collection::<R>(body).map_err(ApiClientError::from));
        match decoded {
            Ok(rows) => {
                tracing::info!(
                    resource = %R::KIND,
                    generation,
                    rows = rows.len(),
                    "Fetch applied"
                );
                self.rows = rows;
                self.error = None;
                self.loaded_once = true;
                self.fix_selection();
            }
            Err(err) => {
                tracing::warn!(resource = %R::KIND, generation, error = %err, "Fetch failed");
                self.error = Some(format!(
                    "Failed to load {}: {}",
                    R::KIND.title().to_lowercase(),
                    err.user_message()
                ));
            }
        }
        FetchOutcome::Applied
    }

    fn complete_delete(
        &mut self,
        id: RecordId,
        result: Result<(), ApiClientError>,
    ) -> DeleteOutcome {
        match result {
            Ok(()) => {
                tracing::info!(resource = %R::KIND, id, "Record deleted");
                DeleteOutcome::Deleted
            }
            Err(err) => {
                let message = self.failure_message("delete", id, &err);
                tracing::warn!(resource = %R::KIND, id, error = %err, "Delete failed");
                self.error = Some(message.clone());
                DeleteOutcome::Failed(message)
            }
        }
    }

    fn complete_update(
        &mut self,
        id: RecordId,
        result: Result<serde_json::Value, ApiClientError>,
    ) -> bool {
        match result {
            Ok(_) => {
                tracing::info!(resource = %R::KIND, id, "Record updated");
                true
            }
            Err(err) => {
                tracing::warn!(resource = %R::KIND, id, error = %err, "Update failed");
                self.error = Some(self.failure_message("update", id, &err));
                false
            }
        }
    }

    fn selected_id(&self) -> Option<RecordId> {
        self.selected
    }

    fn selected_index(&self) -> Option<usize> {
        let id = self.selected?;
        self.rows.iter().position(|row| row.id() == id)
    }

    fn selected_details(&self) -> Option<Vec<(&'static str, String)>> {
        self.selected_row().map(Resource::details)
    }

    fn select_next(&mut self) {
        select_next_id(&self.rows, &mut self.selected);
    }

    fn select_previous(&mut self) {
        select_prev_id(&self.rows, &mut self.selected);
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn table_rows(&self) -> Vec<Vec<String>> {
        self.rows.iter().map(Resource::cells).collect()
    }

    fn footer_text(&self) -> String {
        if self.loading && !self.loaded_once {
            return format!("Loading {}...", R::KIND.title().to_lowercase());
        }
        match self.rows.len() {
            0 => format!("No {} found.", self.noun()),
            n => format!("{} {}(s) found", n, self.noun()),
        }
    }
}

fn select_next_id<R: Resource>(rows: &[R], selected: &mut Option<RecordId>) {
    if rows.is_empty() {
        *selected = None;
        return;
    }
    let next = selected
        .and_then(|id| rows.iter().position(|row| row.id() == id))
        .map(|index| (index + 1) % rows.len())
        .unwrap_or(0);
    *selected = Some(rows[next].id());
}

fn select_prev_id<R: Resource>(rows: &[R], selected: &mut Option<RecordId>) {
    if rows.is_empty() {
        *selected = None;
        return;
    }
    let index = selected
        .and_then(|id| rows.iter().position(|row| row.id() == id))
        .unwrap_or(0);
    let prev = if index == 0 { rows.len() - 1 } else { index - 1 };
    *selected = Some(rows[prev].id());
}

#[cfg(test)]
mod tests {
    use super::*;
    use lawdesk_core::{Case, Client, SortDirection};
    use serde_json::json;

    fn clients(ids: &[i64]) -> serde_json::Value {
        let rows: Vec<_> = ids
            .iter()
            .map(|id| {
                json!({
                    "id": id,
                    "nome_razao_social": format!("Client {}", id),
                    "tipo_pessoa": "PF",
                    "cpf_cnpj": "12345678901",
                })
            })
            .collect();
        json!({ "clientes": rows })
    }

    fn loaded(ids: &[i64]) -> ListView<Client> {
        let mut view = ListView::<Client>::new();
        let ticket = view.begin_fetch().unwrap();
        view.complete_fetch(ticket.generation, Ok(clients(ids)));
        view
    }

    #[test]
    fn test_new_view_uses_default_sort() {
        let view = ListView::<Case>::new();
        assert_eq!(view.sort(), &Case::schema().default_sort());
        assert_eq!(
            Case::schema().columns[view.sort_cursor()].sort_key,
            Some(view.sort().field.as_str())
        );
    }

    #[test]
    fn test_success_replaces_rows_and_selects_first() {
        let view = loaded(&[1, 2, 3]);
        assert_eq!(view.row_count(), 3);
        assert_eq!(view.selected_id(), Some(1));
        assert!(!view.is_loading());
        assert!(view.error().is_none());
    }

    #[test]
    fn test_selection_survives_refetch() {
        let mut view = loaded(&[1, 2, 3]);
        view.select_next();
        assert_eq!(view.selected_id(), Some(2));
        let ticket = view.begin_fetch().unwrap();
        view.complete_fetch(ticket.generation, Ok(clients(&[3, 2])));
        assert_eq!(view.selected_id(), Some(2));
        let ticket = view.begin_fetch().unwrap();
        view.complete_fetch(ticket.generation, Ok(clients(&[5])));
        assert_eq!(view.selected_id(), Some(5));
    }

    #[test]
    fn test_rows_kept_while_refetching() {
        let mut view = loaded(&[1, 2]);
        let _ticket = view.begin_fetch().unwrap();
        assert!(view.is_loading());
        assert_eq!(view.row_count(), 2);
        assert_eq!(view.footer_text(), "2 client(s) found");
    }

    #[test]
    fn test_missing_collection_key_is_an_error() {
        let mut view = loaded(&[1]);
        let ticket = view.begin_fetch().unwrap();
        view.complete_fetch(ticket.generation, Ok(json!({ "data": [] })));
        assert_eq!(view.row_count(), 1);
        assert!(view.error().unwrap().contains("clientes"));
    }

    #[test]
    fn test_stale_result_leaves_loading_on() {
        let mut view = ListView::<Client>::new();
        let first = view.begin_fetch().unwrap();
        let second = view.begin_fetch().unwrap();
        assert!(second.generation > first.generation);
        assert_eq!(
            view.complete_fetch(first.generation, Ok(clients(&[1]))),
            FetchOutcome::Stale
        );
        assert!(view.is_loading());
        assert_eq!(view.row_count(), 0);
    }

    #[test]
    fn test_request_sort_rejects_unsortable_field() {
        let mut view = ListView::<Client>::new();
        let err = view.request_sort("email").unwrap_err();
        assert!(matches!(err, SortError::UnsortableField { .. }));
        assert_eq!(view.generation(), 0);
    }

    #[test]
    fn test_request_sort_toggles_and_fetches() {
        let mut view = ListView::<Client>::new();
        let ticket = view.request_sort("nome_razao_social").unwrap().unwrap();
        assert_eq!(ticket.query.get("sort_order"), Some("desc"));
        let ticket = view.request_sort("cpf_cnpj").unwrap().unwrap();
        assert_eq!(ticket.query.get("sort_by"), Some("cpf_cnpj"));
        assert_eq!(view.sort().direction, SortDirection::Ascending);
    }

    #[test]
    fn test_sort_cursor_skips_plain_columns() {
        let mut view = ListView::<Case>::new();
        for _ in 0..Case::schema().columns.len() * 2 {
            view.move_sort_cursor(true);
            assert!(Case::schema().columns[view.sort_cursor()].sort_key.is_some());
        }
        view.move_sort_cursor(false);
        assert!(Case::schema().columns[view.sort_cursor()].sort_key.is_some());
    }

    #[test]
    fn test_restore_sort_ignores_unknown_field() {
        let mut view = ListView::<Client>::new();
        assert!(!view.restore_sort(SortState::ascending("nope")));
        assert_eq!(view.sort(), &Client::schema().default_sort());
        let saved = SortState::new("cpf_cnpj", SortDirection::Descending);
        assert!(view.restore_sort(saved.clone()));
        assert_eq!(view.sort(), &saved);
    }

    #[test]
    fn test_debounce_fires_once_after_quiet_period() {
        let mut view = ListView::<Client>::new();
        view.set_filter_input("search", "Sil").unwrap();
        view.set_filter_input("search", "Silva").unwrap();
        let delay = Duration::from_secs(60);
        assert!(view.poll_debounce(Instant::now(), delay).is_none());
        let later = Instant::now() + delay;
        let ticket = view.poll_debounce(later, delay).unwrap();
        assert_eq!(ticket.query.get("search"), Some("Silva"));
        assert!(view.poll_debounce(later, delay).is_none());
    }

    #[test]
    fn test_unchanged_filter_does_not_schedule_fetch() {
        let mut view = ListView::<Client>::new();
        view.set_filter_input("search", "   ").unwrap();
        assert!(!view.has_pending_edit());
    }

    #[test]
    fn test_inverted_range_sets_error_without_request() {
        let mut view = ListView::<lawdesk_core::Expense>::new();
        view.set_filter_input("data_despesa_inicio", "2024-05-10").unwrap();
        view.set_filter_input("data_despesa_fim", "2024-05-01").unwrap();
        assert!(view.begin_fetch().is_none());
        assert!(view.error().is_some());
        assert!(!view.is_loading());
    }

    #[test]
    fn test_rejected_filters_outlive_inflight_fetch() {
        let mut view = ListView::<lawdesk_core::Expense>::new();
        let first = view.begin_fetch().unwrap();
        let expenses = json!({
            "despesas": [
                { "id": 1, "descricao": "Custas", "valor": "150.00", "status": "A Pagar" },
                { "id": 2, "descricao": "Perícia", "valor": 900, "status": "Paga" },
            ]
        });
        view.complete_fetch(first.generation, Ok(expenses.clone()));

        let inflight = view.begin_fetch().unwrap();
        view.set_filter_input("data_despesa_inicio", "2024-05-10").unwrap();
        view.set_filter_input("data_despesa_fim", "2024-05-01").unwrap();
        assert!(view.begin_fetch().is_none());
        let rejected = view.error().map(str::to_string);

        let outcome = view.complete_fetch(inflight.generation, Ok(expenses));

        assert_eq!(outcome, FetchOutcome::Stale);
        assert_eq!(view.error().map(str::to_string), rejected);
        assert!(!view.is_loading());
        assert_eq!(view.row_count(), 2);
    }

    #[test]
    fn test_empty_footer() {
        let view = loaded(&[]);
        assert_eq!(view.footer_text(), "No client found.");
        assert_eq!(view.selected_id(), None);
    }

    #[test]
    fn test_select_prev_wraps() {
        let mut view = loaded(&[1, 2, 3]);
        view.select_previous();
        assert_eq!(view.selected_id(), Some(3));
        view.select_next();
        assert_eq!(view.selected_id(), Some(1));
    }
}
