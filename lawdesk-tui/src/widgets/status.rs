//! Status line of a list or report view: row count or totals, or the last
//! error.

use crate::list_view::ListController;
use crate::report_view::ReportView;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct StatusIndicator {
    pub title: String,
    pub status: String,
    pub style: Style,
}

impl StatusIndicator {
    /// The view's error when it has one, its footer text otherwise.
    pub fn for_view(controller: &dyn ListController, normal: Style, error: Style) -> Self {
        let (status, style) = match controller.error() {
            Some(message) => (message.to_string(), error),
            None => (controller.footer_text(), normal),
        };
        Self {
            title: "Status".to_string(),
            status,
            style,
        }
    }

    /// The report's error when it has one, its totals otherwise.
    pub fn for_report(view: &ReportView, normal: Style, error: Style) -> Self {
        let (status, style) = match view.error() {
            Some(message) => (message.to_string(), error),
            None => (view.footer_text(), normal),
        };
        Self {
            title: "Totals".to_string(),
            status,
            style,
        }
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let paragraph = Paragraph::new(self.status.clone()).style(self.style).block(
            Block::default()
                .title(self.title.as_str())
                .borders(Borders::ALL),
        );
        f.render_widget(paragraph, area);
    }
}
