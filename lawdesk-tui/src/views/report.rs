//! Accounts report screen: open items table and totals line.

use crate::report_view::ReportView;
use crate::state::App;
use crate::theme::record_status_color;
use crate::widgets::{ReportTable, StatusIndicator, TableStyle};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, view: &ReportView, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let theme = &app.theme;
    let kind = view.kind();
    let status_column = kind.status_column();
    let row_style = move |cells: &[String]| -> Style {
        match cells.get(status_column) {
            Some(status) => Style::default().fg(record_status_color(status, theme)),
            None => Style::default().fg(theme.text),
        }
    };
    let title = if view.is_loading() {
        format!("{} (loading...)", kind.title())
    } else {
        kind.title().to_string()
    };
    ReportTable {
        title,
        headers: kind.headers(),
        widths: kind.widths(),
        rows: view.table_rows(),
        selected: view.selected_index(),
        style: TableStyle {
            header: Style::default().fg(theme.primary_dim),
            sorted_header: Style::default().fg(theme.primary),
            cursor: Style::default(),
            highlight: Style::default()
                .bg(theme.bg_highlight)
                .fg(theme.secondary)
                .add_modifier(Modifier::BOLD),
            border: Style::default().fg(theme.border_focus),
        },
        row_style: Some(&row_style),
    }
    .render(f, chunks[0]);

    StatusIndicator::for_report(
        view,
        Style::default().fg(theme.tertiary).add_modifier(Modifier::BOLD),
        Style::default().fg(theme.error),
    )
    .render(f, chunks[1]);
}
