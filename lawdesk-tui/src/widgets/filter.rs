//! Filter bar and filter editor widgets.

use crate::list_view::ListController;
use crossterm::event::{KeyCode, KeyEvent};
use lawdesk_core::{FilterKind, FilterSpec, FilterValue, ResourceKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tui_textarea::{CursorMove, TextArea};

#[derive(Debug, Clone)]
pub struct FilterOption {
    pub label: String,
    pub active: bool,
}

impl FilterOption {
    /// One entry per schema filter, active when it has a value.
    pub fn from_controller(controller: &dyn ListController) -> Vec<FilterOption> {
        let filters = controller.filters();
        controller
            .schema()
            .filters
            .iter()
            .map(|spec| match filters.get(spec.name) {
                Some(value) => FilterOption {
                    label: format!("{}: {}", spec.label, value.to_input()),
                    active: true,
                },
                None => FilterOption {
                    label: spec.label.to_string(),
                    active: false,
                },
            })
            .collect()
    }
}

pub struct FilterBar<'a> {
    pub title: &'a str,
    pub filters: &'a [FilterOption],
    pub active_style: Style,
    pub inactive_style: Style,
}

impl<'a> FilterBar<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let spans: Vec<Span> = self
            .filters
            .iter()
            .map(|filter| {
                let style = if filter.active {
                    self.active_style
                } else {
                    self.inactive_style
                };
                Span::styled(format!(" {} ", filter.label), style)
            })
            .collect();

        let paragraph = Paragraph::new(Line::from(spans))
            .block(Block::default().title(self.title).borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }
}

/// What a key did to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorSignal {
    /// The text of the current field changed.
    Edited,
    /// The focused field changed.
    Moved,
    Submit,
    Cancel,
    Ignored,
}

/// Modal editor over the filters of one view.
///
/// Edits are reported per keystroke so the view can debounce its re-fetch;
/// Tab and Shift-Tab move between fields.
pub struct FilterEditor {
    kind: ResourceKind,
    fields: Vec<&'static FilterSpec>,
    inputs: Vec<String>,
    index: usize,
    textarea: TextArea<'static>,
    pub error: Option<String>,
}

impl FilterEditor {
    /// Editor over the `search` filter only.
    pub fn search(controller: &dyn ListController) -> Option<Self> {
        let spec = controller.schema().filter("search")?;
        Some(Self::with_fields(controller, vec![spec]))
    }

    /// Editor over every filter of the view.
    pub fn all(controller: &dyn ListController) -> Self {
        let fields = controller.schema().filters.iter().collect();
        Self::with_fields(controller, fields)
    }

    fn with_fields(controller: &dyn ListController, fields: Vec<&'static FilterSpec>) -> Self {
        let inputs = fields
            .iter()
            .map(|spec| {
                controller
                    .filters()
                    .get(spec.name)
                    .map(FilterValue::to_input)
                    .unwrap_or_default()
            })
            .collect();
        let mut editor = Self {
            kind: controller.kind(),
            fields,
            inputs,
            index: 0,
            textarea: TextArea::default(),
            error: None,
        };
        editor.load_field();
        editor
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn current(&self) -> &'static FilterSpec {
        self.fields[self.index]
    }

    pub fn current_text(&self) -> String {
        self.textarea.lines().concat()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> EditorSignal {
        match key.code {
            KeyCode::Enter => EditorSignal::Submit,
            KeyCode::Esc => EditorSignal::Cancel,
            KeyCode::Tab => self.move_field(true),
            KeyCode::BackTab => self.move_field(false),
            _ => {
                let before = self.current_text();
                self.textarea.input(key);
                let after = self.current_text();
                if after == before {
                    EditorSignal::Ignored
                } else {
                    self.inputs[self.index] = after;
                    EditorSignal::Edited
                }
            }
        }
    }

    fn move_field(&mut self, forward: bool) -> EditorSignal {
        if self.fields.len() < 2 || self.error.is_some() {
            return EditorSignal::Ignored;
        }
        let len = self.fields.len();
        self.index = if forward {
            (self.index + 1) % len
        } else {
            (self.index + len - 1) % len
        };
        self.load_field();
        EditorSignal::Moved
    }

    fn load_field(&mut self) {
        self.textarea = TextArea::new(vec![self.inputs[self.index].clone()]);
        self.textarea.move_cursor(CursorMove::End);
        self.textarea.set_cursor_line_style(Style::default());
        self.textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .title(self.current().label),
        );
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect, accent: Style, dim: Style) {
        let height = (self.fields.len() as u16 + 6).min(area.height);
        let popup = centered(area, 60, height);
        f.render_widget(Clear, popup);

        let block = Block::default()
            .title(format!("Filter {}", self.kind.title()))
            .borders(Borders::ALL)
            .border_style(accent);
        let inner = block.inner(popup);
        f.render_widget(block, popup);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(inner);

        let lines: Vec<Line> = self
            .fields
            .iter()
            .zip(&self.inputs)
            .enumerate()
            .map(|(index, (spec, input))| {
                let style = if index == self.index {
                    accent.add_modifier(Modifier::BOLD)
                } else {
                    dim
                };
                Line::from(vec![
                    Span::styled(format!("{}: ", spec.label), style),
                    Span::raw(input.clone()),
                    Span::styled(hint(spec.kind), dim),
                ])
            })
            .collect();
        f.render_widget(Paragraph::new(lines), chunks[0]);

        f.render_widget(&self.textarea, chunks[1]);

        let status = match &self.error {
            Some(error) => Span::styled(error.clone(), accent),
            None => Span::styled("Enter apply • Tab next field • Esc close", dim),
        };
        f.render_widget(Paragraph::new(Line::from(status)), chunks[2]);
    }
}

fn hint(kind: FilterKind) -> String {
    match kind {
        FilterKind::Text => String::new(),
        FilterKind::Choice(options) => format!("  ({})", options.join("/")),
        FilterKind::Date => "  (YYYY-MM-DD)".to_string(),
        FilterKind::RecordId => "  (id)".to_string(),
        FilterKind::CaseLink => "  (id or none)".to_string(),
        FilterKind::Flag => "  (yes/no)".to_string(),
    }
}

/// Rectangle of `percent_x` width and `height` rows centered in `area`.
pub fn centered(area: Rect, percent_x: u16, height: u16) -> Rect {
    let width = area.width * percent_x / 100;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list_view::ListView;
    use crossterm::event::KeyModifiers;
    use lawdesk_core::{Case, Client, Resource};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typing_reports_edits() {
        let view = ListView::<Client>::new();
        let mut editor = FilterEditor::search(&view).unwrap();
        assert_eq!(editor.handle_key(key(KeyCode::Char('S'))), EditorSignal::Edited);
        assert_eq!(editor.handle_key(key(KeyCode::Char('i'))), EditorSignal::Edited);
        assert_eq!(editor.current_text(), "Si");
        assert_eq!(editor.handle_key(key(KeyCode::Enter)), EditorSignal::Submit);
    }

    #[test]
    fn test_editor_starts_from_current_filters() {
        let mut view = ListView::<Case>::new();
        view.set_filter_input("status", "ativo").unwrap();
        let mut editor = FilterEditor::all(&view);
        assert_eq!(editor.current().name, "search");
        assert_eq!(editor.handle_key(key(KeyCode::Tab)), EditorSignal::Moved);
        assert_eq!(editor.current().name, "status");
        assert_eq!(editor.current_text(), "Ativo");
    }

    #[test]
    fn test_tab_wraps_backwards() {
        let view = ListView::<Case>::new();
        let mut editor = FilterEditor::all(&view);
        editor.handle_key(key(KeyCode::BackTab));
        let last = Case::schema().filters.last().unwrap();
        assert_eq!(editor.current().name, last.name);
    }

    #[test]
    fn test_centered_fits_area() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered(area, 60, 10);
        assert_eq!(popup, Rect::new(20, 15, 60, 10));
    }
}
