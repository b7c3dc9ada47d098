//! Record tables: the sortable list table and the read-only report table.

use crate::list_view::ListController;
use lawdesk_core::SortDirection;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

pub struct TableStyle {
    pub header: Style,
    pub sorted_header: Style,
    pub cursor: Style,
    pub highlight: Style,
    pub border: Style,
}

/// Header label with the sort arrow of the active column.
pub fn header_label(label: &str, direction: Option<SortDirection>) -> String {
    match direction {
        Some(SortDirection::Ascending) => format!("{} ▲", label),
        Some(SortDirection::Descending) => format!("{} ▼", label),
        None => label.to_string(),
    }
}

/// Per-row style override, e.g. by status.
pub type RowStyle<'a> = &'a dyn Fn(&[String]) -> Style;

fn styled_rows(rows: Vec<Vec<String>>, row_style: Option<RowStyle<'_>>) -> Vec<Row<'static>> {
    rows.into_iter()
        .map(|cells| {
            let style = row_style
                .map(|row_style| row_style(cells.as_slice()))
                .unwrap_or_default();
            Row::new(cells.into_iter().map(Cell::from)).style(style)
        })
        .collect()
}

fn render_framed(
    f: &mut Frame<'_>,
    area: Rect,
    table: Table<'_>,
    title: String,
    style: &TableStyle,
    selected: Option<usize>,
) {
    let table = table
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(style.border),
        )
        .highlight_style(style.highlight)
        .highlight_symbol("> ");
    let mut state = TableState::default();
    state.select(selected);
    f.render_stateful_widget(table, area, &mut state);
}

pub struct ResourceTable<'a> {
    pub controller: &'a dyn ListController,
    pub style: TableStyle,
    pub row_style: Option<RowStyle<'a>>,
}

impl<'a> ResourceTable<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let controller = self.controller;
        let schema = controller.schema();
        let sort = controller.sort();

        let header = Row::new(schema.columns.iter().enumerate().map(|(index, column)| {
            let direction = column
                .sort_key
                .and_then(|key| sort.direction_of(key));
            let mut style = if direction.is_some() {
                self.style.sorted_header
            } else {
                self.style.header
            };
            if index == controller.sort_cursor() {
                style = style.patch(self.style.cursor);
            }
            Cell::from(Span::styled(header_label(column.label, direction), style))
        }));

        let rows = styled_rows(controller.table_rows(), self.row_style);

        let widths: Vec<Constraint> = schema
            .columns
            .iter()
            .map(|column| Constraint::Percentage(column.width))
            .collect();

        let title = if controller.is_loading() {
            format!("{} (loading...)", schema.kind.title())
        } else {
            schema.kind.title().to_string()
        };

        let table = Table::new(rows, widths)
            .header(header.style(Style::default().add_modifier(Modifier::BOLD)));
        render_framed(
            f,
            area,
            table,
            title,
            &self.style,
            controller.selected_index(),
        );
    }
}

/// Fixed-column table without sorting, used by the reports.
pub struct ReportTable<'a> {
    pub title: String,
    pub headers: &'a [&'a str],
    pub widths: &'a [u16],
    pub rows: Vec<Vec<String>>,
    pub selected: Option<usize>,
    pub style: TableStyle,
    pub row_style: Option<RowStyle<'a>>,
}

impl<'a> ReportTable<'a> {
    pub fn render(self, f: &mut Frame<'_>, area: Rect) {
        let header = Row::new(
            self.headers
                .iter()
                .map(|label| Cell::from(Span::styled(label.to_string(), self.style.header))),
        );
        let widths: Vec<Constraint> = self
            .widths
            .iter()
            .map(|width| Constraint::Percentage(*width))
            .collect();
        let table = Table::new(styled_rows(self.rows, self.row_style), widths)
            .header(header.style(Style::default().add_modifier(Modifier::BOLD)));
        render_framed(f, area, table, self.title, &self.style, self.selected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_label_arrows() {
        assert_eq!(header_label("Name", None), "Name");
        assert_eq!(header_label("Name", Some(SortDirection::Ascending)), "Name ▲");
        assert_eq!(header_label("Due", Some(SortDirection::Descending)), "Due ▼");
    }
}
