//! Keybinding definitions for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use lawdesk_core::ReportKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextView,
    PrevView,
    SwitchView(usize),
    ShowReport(ReportKind),
    MoveUp,
    MoveDown,
    SortCursorLeft,
    SortCursorRight,
    Sort,
    OpenSearch,
    OpenFilters,
    ResetFilters,
    Refresh,
    ShowDetails,
    DeleteItem,
    ToggleCompleted,
    OpenHelp,
    Cancel,
}

/// Keys of the list views and the report screen.
pub fn map_key(event: KeyEvent) -> Option<Action> {
    let KeyEvent { code, modifiers, .. } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Refresh),
            _ => None,
        };
    }

    match code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('?') => Some(Action::OpenHelp),
        KeyCode::Char('/') => Some(Action::OpenSearch),
        KeyCode::Char('f') => Some(Action::OpenFilters),
        KeyCode::Char('R') => Some(Action::ResetFilters),
        KeyCode::Char('s') => Some(Action::Sort),
        KeyCode::Char('e') | KeyCode::Enter => Some(Action::ShowDetails),
        KeyCode::Char('d') => Some(Action::DeleteItem),
        KeyCode::Char('c') => Some(Action::ToggleCompleted),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Tab => Some(Action::NextView),
        KeyCode::BackTab => Some(Action::PrevView),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Left | KeyCode::Char('h') => Some(Action::SortCursorLeft),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::SortCursorRight),
        KeyCode::Char(c @ '1'..='6') => Some(Action::SwitchView(c as usize - '1' as usize)),
        KeyCode::Char('7') => Some(Action::ShowReport(ReportKind::Receivables)),
        KeyCode::Char('8') => Some(Action::ShowReport(ReportKind::Payables)),
        _ => None,
    }
}

/// Keys of an open confirmation dialog: `Some(true)` accepts,
/// `Some(false)` declines.
pub fn map_confirm_key(event: KeyEvent) -> Option<bool> {
    match event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Some(true),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(false),
        _ => None,
    }
}
