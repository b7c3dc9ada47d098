//! Application state and input handling.
//!
//! The app never performs I/O itself. Input and task results go in through
//! [`App::handle_key`], [`App::on_tick`] and [`App::apply_event`]; what
//! must happen next comes out as [`Command`]s for the event loop to run.

use crate::config::TuiConfig;
use crate::confirm::{confirm, Confirmation, ConfirmDialog};
use crate::events::TuiEvent;
use crate::keys::{map_confirm_key, map_key, Action};
use crate::list_view::{DeleteOutcome, FetchTicket, ListController, ListView};
use crate::nav::View;
use crate::notifications::{Notification, NotificationLevel};
use crate::persistence::PersistedState;
use crate::report_view::{ReportTicket, ReportView};
use crate::theme::SynthBruteTheme;
use crate::widgets::{EditorSignal, FilterEditor};
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent};
use lawdesk_core::{
    AgendaEvent, Case, Client, Document, Draft, Expense, Receivable, RecordId, ReportKind,
    ResourceKind,
};
use std::time::{Duration, Instant};

const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

/// Work the event loop performs on behalf of the app.
#[derive(Debug)]
pub enum Command {
    Fetch(FetchTicket),
    FetchReport(ReportTicket),
    /// Wait for the confirmation, then delete.
    Delete {
        kind: ResourceKind,
        id: RecordId,
        confirmation: Confirmation,
    },
    Update {
        kind: ResourceKind,
        id: RecordId,
        body: serde_json::Value,
    },
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    Help,
    Details {
        title: String,
        fields: Vec<(&'static str, String)>,
    },
}

pub struct App {
    pub config: TuiConfig,
    pub theme: SynthBruteTheme,
    pub active_view: View,

    pub clients: ListView<Client>,
    pub cases: ListView<Case>,
    pub receivables: ListView<Receivable>,
    pub expenses: ListView<Expense>,
    pub documents: ListView<Document>,
    pub agenda: ListView<AgendaEvent>,

    pub receivables_report: ReportView,
    pub payables_report: ReportView,
    /// Report shown instead of the active list, if any.
    pub open_report: Option<ReportKind>,

    pub notifications: Vec<Notification>,
    pub modal: Option<Modal>,
    pub confirm: Option<ConfirmDialog>,
    pub filter_editor: Option<FilterEditor>,
}

impl App {
    pub fn new(config: TuiConfig) -> Self {
        Self {
            config,
            theme: SynthBruteTheme::synthbrute(),
            active_view: View::Clients,
            clients: ListView::new(),
            cases: ListView::new(),
            receivables: ListView::new(),
            expenses: ListView::new(),
            documents: ListView::new(),
            agenda: ListView::new(),
            receivables_report: ReportView::new(ReportKind::Receivables),
            payables_report: ReportView::new(ReportKind::Payables),
            open_report: None,
            notifications: Vec::new(),
            modal: None,
            confirm: None,
            filter_editor: None,
        }
    }

    pub fn list(&self, view: View) -> &dyn ListController {
        match view {
            View::Clients => &self.clients,
            View::Cases => &self.cases,
            View::Receivables => &self.receivables,
            View::Expenses => &self.expenses,
            View::Documents => &self.documents,
            View::Agenda => &self.agenda,
        }
    }

    pub fn list_mut(&mut self, view: View) -> &mut dyn ListController {
        match view {
            View::Clients => &mut self.clients,
            View::Cases => &mut self.cases,
            View::Receivables => &mut self.receivables,
            View::Expenses => &mut self.expenses,
            View::Documents => &mut self.documents,
            View::Agenda => &mut self.agenda,
        }
    }

    pub fn report(&self, kind: ReportKind) -> &ReportView {
        match kind {
            ReportKind::Receivables => &self.receivables_report,
            ReportKind::Payables => &self.payables_report,
        }
    }

    pub fn report_mut(&mut self, kind: ReportKind) -> &mut ReportView {
        match kind {
            ReportKind::Receivables => &mut self.receivables_report,
            ReportKind::Payables => &mut self.payables_report,
        }
    }

    pub fn active_list(&self) -> &dyn ListController {
        self.list(self.active_view)
    }

    pub fn active_list_mut(&mut self) -> &mut dyn ListController {
        self.list_mut(self.active_view)
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(Notification::new(level, message));
    }

    /// The most recent notification that has not expired yet.
    pub fn current_notification(&self) -> Option<&Notification> {
        let now = Utc::now();
        self.notifications
            .last()
            .filter(|note| !note.is_expired(now, NOTIFICATION_TTL))
    }

    pub fn restore(&mut self, state: PersistedState) {
        self.active_view = state.active_view;
        for (kind, sort) in state.sorts {
            let field = sort.field.clone();
            if !self.list_mut(View::from_kind(kind)).restore_sort(sort) {
                tracing::debug!(resource = %kind, field = %field, "Ignoring saved sort");
            }
        }
    }

    pub fn persisted(&self) -> PersistedState {
        PersistedState {
            active_view: self.active_view,
            sorts: View::all()
                .iter()
                .map(|view| (view.kind(), self.list(*view).sort().clone()))
                .collect(),
        }
    }

    /// Fetch of the active view, issued at startup.
    pub fn start(&mut self) -> Vec<Command> {
        self.active_list_mut()
            .begin_fetch()
            .map(Command::Fetch)
            .into_iter()
            .collect()
    }

    pub fn on_tick(&mut self, now: Instant) -> Vec<Command> {
        let delay = Duration::from_millis(self.config.search_debounce_ms);
        let cutoff = Utc::now();
        self.notifications
            .retain(|note| !note.is_expired(cutoff, NOTIFICATION_TTL));
        View::all()
            .iter()
            .filter_map(|view| self.list_mut(*view).poll_debounce(now, delay))
            .map(Command::Fetch)
            .collect()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Command> {
        if self.confirm.is_some() {
            self.handle_confirm_key(key);
            return Vec::new();
        }
        if self.filter_editor.is_some() {
            return self.handle_editor_key(key);
        }
        if self.modal.is_some() {
            if matches!(
                key.code,
                KeyCode::Esc
                    | KeyCode::Enter
                    | KeyCode::Char('q')
                    | KeyCode::Char('e')
                    | KeyCode::Char('?')
            ) {
                self.modal = None;
            }
            return Vec::new();
        }
        match map_key(key) {
            Some(action) => self.handle_action(action),
            None => Vec::new(),
        }
    }

    pub fn handle_action(&mut self, action: Action) -> Vec<Command> {
        if let Some(kind) = self.open_report {
            if let Some(commands) = self.handle_report_action(kind, action) {
                return commands;
            }
        }
        let mut commands = Vec::new();
        match action {
            Action::Quit => commands.push(Command::Quit),
            Action::ShowReport(kind) => commands.push(self.show_report(kind)),
            Action::NextView => commands.extend(self.switch_view(self.active_view.next())),
            Action::PrevView => commands.extend(self.switch_view(self.active_view.previous())),
            Action::SwitchView(index) => {
                if let Some(view) = View::from_index(index) {
                    commands.extend(self.switch_view(view));
                }
            }
            Action::MoveDown => self.active_list_mut().select_next(),
            Action::MoveUp => self.active_list_mut().select_previous(),
            Action::SortCursorLeft => self.active_list_mut().move_sort_cursor(false),
            Action::SortCursorRight => self.active_list_mut().move_sort_cursor(true),
            Action::Sort => match self.active_list_mut().sort_by_cursor() {
                Ok(ticket) => commands.extend(ticket.map(Command::Fetch)),
                Err(err) => self.notify(NotificationLevel::Warning, err.to_string()),
            },
            Action::OpenSearch => {
                self.filter_editor = FilterEditor::search(self.active_list());
                if self.filter_editor.is_none() {
                    self.notify(
                        NotificationLevel::Info,
                        format!("{} has no search filter", self.active_view.title()),
                    );
                }
            }
            Action::OpenFilters => {
                self.filter_editor = Some(FilterEditor::all(self.active_list()));
            }
            Action::ResetFilters => {
                commands.extend(self.active_list_mut().reset_filters().map(Command::Fetch));
            }
            Action::Refresh => {
                commands.extend(self.active_list_mut().begin_fetch().map(Command::Fetch));
            }
            Action::ShowDetails => {
                let list = self.active_list();
                let details = list
                    .selected_id()
                    .zip(list.selected_details())
                    .map(|(id, fields)| Modal::Details {
                        title: format!("{} #{}", capitalize(list.kind().noun()), id),
                        fields,
                    });
                if details.is_some() {
                    self.modal = details;
                }
            }
            Action::DeleteItem => commands.extend(self.request_delete()),
            Action::ToggleCompleted => commands.extend(self.request_completion_toggle()),
            Action::OpenHelp => self.modal = Some(Modal::Help),
            Action::Cancel => {}
        }
        commands
    }

    /// Apply a task result and return any follow-up work.
    pub fn apply_event(&mut self, event: TuiEvent) -> Vec<Command> {
        let mut commands = Vec::new();
        match event {
            TuiEvent::Fetched {
                kind,
                generation,
                result,
            } => {
                self.list_mut(View::from_kind(kind))
                    .complete_fetch(generation, result);
            }
            TuiEvent::Deleted { kind, id, result } => {
                let list = self.list_mut(View::from_kind(kind));
                // Failures are shown on the view's status line only.
                if list.complete_delete(id, result) == DeleteOutcome::Deleted {
                    commands.extend(list.begin_fetch().map(Command::Fetch));
                    self.notify(
                        NotificationLevel::Success,
                        format!("{} #{} deleted", capitalize(kind.noun()), id),
                    );
                }
            }
            TuiEvent::Updated { kind, id, result } => {
                let list = self.list_mut(View::from_kind(kind));
                if list.complete_update(id, result) {
                    commands.extend(list.begin_fetch().map(Command::Fetch));
                    self.notify(
                        NotificationLevel::Success,
                        format!("{} #{} updated", capitalize(kind.noun()), id),
                    );
                }
            }
            TuiEvent::ReportFetched {
                kind,
                generation,
                result,
            } => {
                self.report_mut(kind).complete_fetch(generation, result);
            }
            TuiEvent::Input(key) => commands.extend(self.handle_key(key)),
            TuiEvent::Resize { .. } => {}
        }
        commands
    }

    /// Show `kind` and fetch a fresh snapshot of it.
    fn show_report(&mut self, kind: ReportKind) -> Command {
        self.open_report = Some(kind);
        Command::FetchReport(self.report_mut(kind).begin_fetch())
    }

    /// Actions while a report is shown. `None` hands the action on to the
    /// list handling, after closing the report where it navigates away.
    fn handle_report_action(&mut self, kind: ReportKind, action: Action) -> Option<Vec<Command>> {
        match action {
            Action::MoveDown => self.report_mut(kind).select_next(),
            Action::MoveUp => self.report_mut(kind).select_previous(),
            Action::Refresh => return Some(vec![self.show_report(kind)]),
            Action::Cancel => self.open_report = None,
            Action::SwitchView(_) | Action::NextView | Action::PrevView => {
                self.open_report = None;
                return None;
            }
            Action::Quit | Action::OpenHelp | Action::ShowReport(_) => return None,
            // Reports are read-only.
            Action::SortCursorLeft
            | Action::SortCursorRight
            | Action::Sort
            | Action::OpenSearch
            | Action::OpenFilters
            | Action::ResetFilters
            | Action::ShowDetails
            | Action::DeleteItem
            | Action::ToggleCompleted => {}
        }
        Some(Vec::new())
    }

    fn switch_view(&mut self, view: View) -> Option<Command> {
        if view == self.active_view {
            return None;
        }
        self.active_view = view;
        self.active_list_mut().begin_fetch().map(Command::Fetch)
    }

    fn request_delete(&mut self) -> Option<Command> {
        let list = self.active_list();
        let kind = list.kind();
        let id = list.selected_id()?;
        let (dialog, confirmation) = confirm(
            format!("Delete {}", kind.noun()),
            format!(
                "Delete {} #{}? This cannot be undone. [y/n]",
                kind.noun(),
                id
            ),
        );
        self.confirm = Some(dialog);
        Some(Command::Delete {
            kind,
            id,
            confirmation,
        })
    }

    fn request_completion_toggle(&mut self) -> Option<Command> {
        if self.active_view != View::Agenda {
            return None;
        }
        let (id, draft) = self.agenda.completion_toggle()?;
        if let Err(errors) = draft.validate() {
            let message = errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            self.notify(NotificationLevel::Warning, message);
            return None;
        }
        match serde_json::to_value(&draft) {
            Ok(body) => Some(Command::Update {
                kind: ResourceKind::AgendaEvent,
                id,
                body,
            }),
            Err(err) => {
                self.notify(NotificationLevel::Error, err.to_string());
                None
            }
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        let Some(accepted) = map_confirm_key(key) else {
            return;
        };
        if let Some(dialog) = self.confirm.take() {
            if accepted {
                dialog.accept();
            } else {
                dialog.decline();
            }
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) -> Vec<Command> {
        let Some(mut editor) = self.filter_editor.take() else {
            return Vec::new();
        };
        let mut commands = Vec::new();
        let list = self.list_mut(View::from_kind(editor.kind()));
        match editor.handle_key(key) {
            EditorSignal::Edited => {
                let text = editor.current_text();
                editor.error = list
                    .set_filter_input(editor.current().name, &text)
                    .err()
                    .map(|err| err.to_string());
            }
            EditorSignal::Submit if editor.error.is_none() => {
                commands.extend(list.begin_fetch().map(Command::Fetch));
                return commands;
            }
            EditorSignal::Cancel => return commands,
            EditorSignal::Submit | EditorSignal::Moved | EditorSignal::Ignored => {}
        }
        self.filter_editor = Some(editor);
        commands
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::ApiClientError;
    use crossterm::event::KeyModifiers;
    use lawdesk_core::Resource;
    use serde_json::json;

    // ========================================================================
    // Test Fixtures
    // ========================================================================

    fn test_config() -> TuiConfig {
        TuiConfig::from_toml(
            r#"
api_base_url = "http://127.0.0.1:5000/api"
request_timeout_ms = 5000
refresh_interval_ms = 250
search_debounce_ms = 300
persistence_path = "/tmp/lawdesk/state.json"
log_path = "/tmp/lawdesk/lawdesk.log"

[auth]

[theme]
name = "synthbrute"
"#,
        )
        .unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn fetch_ticket(commands: &[Command]) -> &FetchTicket {
        commands
            .iter()
            .find_map(|command| match command {
                Command::Fetch(ticket) => Some(ticket),
                _ => None,
            })
            .expect("expected a fetch command")
    }

    fn with_clients(app: &mut App, ids: &[i64]) {
        let rows: Vec<_> = ids
            .iter()
            .map(|id| {
                json!({
                    "id": id,
                    "nome_razao_social": format!("Client {}", id),
                    "tipo_pessoa": "PJ",
                    "cpf_cnpj": "12345678000199",
                })
            })
            .collect();
        let commands = app.start();
        let ticket = fetch_ticket(&commands).clone();
        app.apply_event(TuiEvent::Fetched {
            kind: ticket.kind,
            generation: ticket.generation,
            result: Ok(json!({ "clientes": rows })),
        });
    }

    fn agenda_app() -> App {
        let mut app = App::new(test_config());
        let commands = app.handle_action(Action::SwitchView(5));
        let ticket = fetch_ticket(&commands).clone();
        app.apply_event(TuiEvent::Fetched {
            kind: ResourceKind::AgendaEvent,
            generation: ticket.generation,
            result: Ok(json!({
                "eventos": [{
                    "id": 7,
                    "titulo": "Audiência inicial",
                    "tipo_evento": "Audiência",
                    "data_inicio": "2024-03-10T14:00:00",
                    "concluido": false
                }]
            })),
        });
        app
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    #[test]
    fn test_switching_view_fetches_it() {
        let mut app = App::new(test_config());
        let commands = app.handle_key(key(KeyCode::Char('2')));
        assert_eq!(app.active_view, View::Cases);
        assert_eq!(fetch_ticket(&commands).kind, ResourceKind::Case);
    }

    #[test]
    fn test_switching_to_same_view_is_noop() {
        let mut app = App::new(test_config());
        assert!(app.handle_key(key(KeyCode::Char('1'))).is_empty());
    }

    #[test]
    fn test_quit() {
        let mut app = App::new(test_config());
        let commands = app.handle_key(key(KeyCode::Char('q')));
        assert!(matches!(commands.as_slice(), [Command::Quit]));
    }

    // ========================================================================
    // Filters and sort
    // ========================================================================

    #[test]
    fn test_search_editor_debounces_then_fetches() {
        let mut app = App::new(test_config());
        app.handle_key(key(KeyCode::Char('/')));
        assert!(app.filter_editor.is_some());
        for c in "Silva".chars() {
            assert!(app.handle_key(key(KeyCode::Char(c))).is_empty());
        }
        assert!(app.on_tick(Instant::now()).is_empty());
        let later = Instant::now() + Duration::from_millis(300);
        let commands = app.on_tick(later);
        assert_eq!(
            fetch_ticket(&commands).query.to_query_string(),
            "?search=Silva&sort_by=nome_razao_social&sort_order=asc"
        );
    }

    #[test]
    fn test_editor_submit_fetches_immediately() {
        let mut app = App::new(test_config());
        app.handle_key(key(KeyCode::Char('/')));
        app.handle_key(key(KeyCode::Char('x')));
        let commands = app.handle_key(key(KeyCode::Enter));
        assert!(app.filter_editor.is_none());
        assert_eq!(fetch_ticket(&commands).query.get("search"), Some("x"));
        assert!(app.on_tick(Instant::now() + Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn test_invalid_filter_keeps_editor_open() {
        let mut app = App::new(test_config());
        app.handle_key(key(KeyCode::Char('3')));
        app.handle_key(key(KeyCode::Char('f')));
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Char('x')));
        let editor = app.filter_editor.as_ref().unwrap();
        assert_eq!(editor.current().name, "cliente_id");
        assert!(editor.error.is_some());
        assert!(app.handle_key(key(KeyCode::Enter)).is_empty());
        assert!(app.filter_editor.is_some());
    }

    #[test]
    fn test_unparsable_input_cancels_pending_fetch() {
        let mut app = App::new(test_config());
        app.handle_key(key(KeyCode::Char('3')));
        app.handle_key(key(KeyCode::Char('f')));
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Char('1')));
        app.handle_key(key(KeyCode::Char('2')));
        assert!(app.receivables.has_pending_edit());

        app.handle_key(key(KeyCode::Char('x')));

        assert!(app.filter_editor.as_ref().unwrap().error.is_some());
        assert!(!app.receivables.has_pending_edit());
        assert_eq!(app.receivables.filters().get("cliente_id"), None);
        assert!(app.on_tick(Instant::now() + Duration::from_secs(1)).is_empty());

        app.handle_key(key(KeyCode::Backspace));
        assert!(app.filter_editor.as_ref().unwrap().error.is_none());
        let commands = app.on_tick(Instant::now() + Duration::from_secs(1));
        assert_eq!(fetch_ticket(&commands).query.get("cliente_id"), Some("12"));
    }

    #[test]
    fn test_sort_key_toggles_active_column() {
        let mut app = App::new(test_config());
        let commands = app.handle_key(key(KeyCode::Char('s')));
        assert_eq!(fetch_ticket(&commands).query.get("sort_order"), Some("desc"));
        app.handle_key(key(KeyCode::Char('l')));
        let commands = app.handle_key(key(KeyCode::Char('s')));
        let ticket = fetch_ticket(&commands);
        assert_eq!(ticket.query.get("sort_by"), Some("cpf_cnpj"));
        assert_eq!(ticket.query.get("sort_order"), Some("asc"));
    }

    #[test]
    fn test_reset_restores_default_query() {
        let mut app = App::new(test_config());
        app.handle_key(key(KeyCode::Char('2')));
        app.cases.set_filter_input("status", "Ativo").unwrap();
        app.handle_key(key(KeyCode::Char('s')));
        let commands = app.handle_key(key(KeyCode::Char('R')));
        assert_eq!(
            fetch_ticket(&commands).query.to_query_string(),
            "?sort_by=data_atualizacao&sort_order=desc"
        );
    }

    // ========================================================================
    // Row actions
    // ========================================================================

    #[tokio::test]
    async fn test_delete_waits_for_confirmation() {
        let mut app = App::new(test_config());
        with_clients(&mut app, &[1, 2]);
        let mut commands = app.handle_key(key(KeyCode::Char('d')));
        assert!(app.confirm.is_some());
        let Some(Command::Delete { id, confirmation, .. }) = commands.pop() else {
            panic!("expected a delete command");
        };
        assert_eq!(id, 1);
        app.handle_key(key(KeyCode::Char('y')));
        assert!(app.confirm.is_none());
        assert!(confirmation.await);
    }

    #[tokio::test]
    async fn test_declined_delete_resolves_false() {
        let mut app = App::new(test_config());
        with_clients(&mut app, &[1]);
        let mut commands = app.handle_key(key(KeyCode::Char('d')));
        let Some(Command::Delete { confirmation, .. }) = commands.pop() else {
            panic!("expected a delete command");
        };
        app.handle_key(key(KeyCode::Esc));
        assert!(!confirmation.await);
    }

    #[test]
    fn test_conflict_shows_exact_message_once() {
        let mut app = App::new(test_config());
        with_clients(&mut app, &[1, 2]);
        let commands = app.apply_event(TuiEvent::Deleted {
            kind: ResourceKind::Client,
            id: 1,
            result: Err(ApiClientError::Conflict {
                message: "registros associados".to_string(),
            }),
        });
        assert!(commands.is_empty());
        assert_eq!(app.clients.error(), Some("registros associados"));
        assert!(app.notifications.is_empty());
        assert_eq!(app.clients.row_count(), 2);
    }

    #[test]
    fn test_successful_delete_refetches() {
        let mut app = App::new(test_config());
        with_clients(&mut app, &[1, 2]);
        let commands = app.apply_event(TuiEvent::Deleted {
            kind: ResourceKind::Client,
            id: 1,
            result: Ok(()),
        });
        assert_eq!(fetch_ticket(&commands).kind, ResourceKind::Client);
        assert_eq!(
            app.current_notification().map(|n| n.level),
            Some(NotificationLevel::Success)
        );
    }

    #[test]
    fn test_toggle_completion_builds_put_body() {
        let mut app = agenda_app();
        let commands = app.handle_key(key(KeyCode::Char('c')));
        match commands.as_slice() {
            [Command::Update { kind, id, body }] => {
                assert_eq!(*kind, ResourceKind::AgendaEvent);
                assert_eq!(*id, 7);
                assert_eq!(body["concluido"], json!(true));
                assert_eq!(body["data_inicio"], json!("2024-03-10T14:00:00"));
            }
            other => panic!("unexpected commands: {:?}", other),
        }
    }

    #[test]
    fn test_toggle_completion_only_on_agenda() {
        let mut app = App::new(test_config());
        with_clients(&mut app, &[1]);
        assert!(app.handle_key(key(KeyCode::Char('c'))).is_empty());
    }

    #[test]
    fn test_details_modal_for_selection() {
        let mut app = App::new(test_config());
        with_clients(&mut app, &[4]);
        app.handle_key(key(KeyCode::Enter));
        match &app.modal {
            Some(Modal::Details { title, fields }) => {
                assert_eq!(title, "Client #4");
                assert!(fields.contains(&("Name", "Client 4".to_string())));
            }
            other => panic!("unexpected modal: {:?}", other),
        }
        app.handle_key(key(KeyCode::Esc));
        assert!(app.modal.is_none());
    }

    // ========================================================================
    // Reports
    // ========================================================================

    fn report_ticket(commands: &[Command]) -> &ReportTicket {
        commands
            .iter()
            .find_map(|command| match command {
                Command::FetchReport(ticket) => Some(ticket),
                _ => None,
            })
            .expect("expected a report fetch")
    }

    fn receivables_report() -> serde_json::Value {
        json!({
            "items": [
                {
                    "id": 1,
                    "descricao": "Honorários",
                    "cliente_nome": "Maria Silva",
                    "valor": "1200.00",
                    "data_vencimento": "2024-05-10",
                    "status": "Pendente"
                },
                {
                    "id": 2,
                    "descricao": "Parcela 3",
                    "valor": "34.56",
                    "data_vencimento": "2024-04-10",
                    "status": "Vencido"
                }
            ],
            "total_geral": "1234.56",
            "quantidade_items": 2
        })
    }

    #[test]
    fn test_report_key_opens_and_fetches() {
        let mut app = App::new(test_config());
        let commands = app.handle_key(key(KeyCode::Char('7')));
        let ticket = report_ticket(&commands).clone();
        assert_eq!(ticket.kind, ReportKind::Receivables);
        assert_eq!(app.open_report, Some(ReportKind::Receivables));

        app.apply_event(TuiEvent::ReportFetched {
            kind: ticket.kind,
            generation: ticket.generation,
            result: Ok(receivables_report()),
        });

        let report = app.report(ReportKind::Receivables);
        assert_eq!(report.row_count(), 2);
        assert_eq!(report.footer_text(), "Total receivable: R$ 1.234,56 (2 item(s))");
        app.handle_key(key(KeyCode::Char('j')));
        assert_eq!(app.report(ReportKind::Receivables).selected_index(), Some(1));
    }

    #[test]
    fn test_report_ignores_row_actions() {
        let mut app = App::new(test_config());
        with_clients(&mut app, &[1]);
        app.handle_key(key(KeyCode::Char('8')));
        for code in [KeyCode::Char('d'), KeyCode::Char('s'), KeyCode::Char('f')] {
            assert!(app.handle_key(key(code)).is_empty());
        }
        assert!(app.confirm.is_none());
        assert!(app.filter_editor.is_none());
        assert_eq!(app.clients.sort(), &Client::schema().default_sort());
    }

    #[test]
    fn test_report_closes_on_escape_or_view_switch() {
        let mut app = App::new(test_config());
        app.handle_key(key(KeyCode::Char('8')));
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.open_report, None);
        assert_eq!(app.active_view, View::Clients);

        app.handle_key(key(KeyCode::Char('7')));
        let commands = app.handle_key(key(KeyCode::Char('2')));
        assert_eq!(app.open_report, None);
        assert_eq!(fetch_ticket(&commands).kind, ResourceKind::Case);
    }

    #[test]
    fn test_report_refresh_supersedes_older_fetch() {
        let mut app = App::new(test_config());
        let first = report_ticket(&app.handle_key(key(KeyCode::Char('7')))).clone();
        let refresh = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL);
        let second = report_ticket(&app.handle_key(refresh)).clone();
        assert!(second.generation > first.generation);

        app.apply_event(TuiEvent::ReportFetched {
            kind: ReportKind::Receivables,
            generation: first.generation,
            result: Ok(receivables_report()),
        });
        let report = app.report(ReportKind::Receivables);
        assert!(report.is_loading());
        assert_eq!(report.row_count(), 0);
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    #[test]
    fn test_persisted_roundtrip_restores_sorts() {
        let mut app = App::new(test_config());
        app.handle_key(key(KeyCode::Char('4')));
        app.handle_key(key(KeyCode::Char('s')));
        let saved = app.persisted();

        let mut restored = App::new(test_config());
        restored.restore(saved.clone());
        assert_eq!(restored.active_view, View::Expenses);
        assert_eq!(restored.expenses.sort(), app.expenses.sort());
        assert_eq!(restored.persisted(), saved);
    }
}
