//! Generic resource list view: filter bar, sortable table, status line.

use crate::list_view::ListController;
use crate::nav::View;
use crate::state::App;
use crate::theme::{event_type_color, record_status_color};
use crate::widgets::{FilterBar, FilterOption, ResourceTable, StatusIndicator, TableStyle};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let controller = app.active_list();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let filters = FilterOption::from_controller(controller);
    FilterBar {
        title: "Filters [/ search • f edit • R reset]",
        filters: &filters,
        active_style: Style::default().fg(app.theme.tertiary),
        inactive_style: Style::default().fg(app.theme.text_dim),
    }
    .render(f, chunks[0]);

    let theme = &app.theme;
    let color_column = color_column(app.active_view, controller);
    let row_style = move |cells: &[String]| -> Style {
        match color_column {
            Some((index, by_event_type)) => match cells.get(index) {
                Some(value) if by_event_type => Style::default().fg(event_type_color(value, theme)),
                Some(value) => Style::default().fg(record_status_color(value, theme)),
                None => Style::default(),
            },
            None => Style::default().fg(theme.text),
        }
    };
    ResourceTable {
        controller,
        style: TableStyle {
            header: Style::default().fg(theme.primary_dim),
            sorted_header: Style::default().fg(theme.primary),
            cursor: Style::default().add_modifier(Modifier::UNDERLINED),
            highlight: Style::default()
                .bg(theme.bg_highlight)
                .fg(theme.secondary)
                .add_modifier(Modifier::BOLD),
            border: Style::default().fg(theme.border_focus),
        },
        row_style: Some(&row_style),
    }
    .render(f, chunks[1]);

    StatusIndicator::for_view(
        controller,
        Style::default().fg(theme.text_dim),
        Style::default().fg(theme.error),
    )
    .render(f, chunks[2]);
}

/// Column whose value colors the row, and whether it holds an event type.
fn color_column(view: View, controller: &dyn ListController) -> Option<(usize, bool)> {
    let schema = controller.schema();
    match view {
        View::Agenda => schema.column_index("tipo_evento").map(|index| (index, true)),
        View::Cases | View::Receivables | View::Expenses => {
            schema.column_index("status").map(|index| (index, false))
        }
        View::Clients | View::Documents => None,
    }
}
