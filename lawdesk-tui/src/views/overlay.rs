//! Modal overlays: help, record details, confirmation.

use crate::confirm::ConfirmDialog;
use crate::state::{App, Modal};
use crate::widgets::{centered, DetailPanel};
use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const HELP: &[(&str, &str)] = &[
    ("Tab / Shift-Tab / 1-6", "switch resource"),
    ("7 / 8", "receivables / payables report"),
    ("j / k", "move selection"),
    ("h / l", "move sort column"),
    ("s", "sort by column (again to flip)"),
    ("/", "search"),
    ("f", "edit filters"),
    ("R", "reset filters and sort"),
    ("Ctrl-r", "refresh"),
    ("Esc", "close report"),
    ("e / Enter", "details"),
    ("d", "delete"),
    ("c", "toggle completed (agenda)"),
    ("q", "quit"),
];

pub fn render_modal(f: &mut Frame<'_>, app: &App, modal: &Modal, area: Rect) {
    match modal {
        Modal::Help => {
            let fields: Vec<(&'static str, String)> = HELP
                .iter()
                .map(|(keys, action)| (*keys, action.to_string()))
                .collect();
            DetailPanel {
                title: "Keybindings",
                fields: &fields,
                label_style: Style::default().fg(app.theme.primary),
                border_style: Style::default().fg(app.theme.border_focus),
            }
            .render(f, centered(area, 60, HELP.len() as u16 + 2));
        }
        Modal::Details { title, fields } => {
            DetailPanel {
                title,
                fields,
                label_style: Style::default().fg(app.theme.secondary),
                border_style: Style::default().fg(app.theme.border_focus),
            }
            .render(f, centered(area, 70, fields.len() as u16 + 2));
        }
    }
}

pub fn render_confirm(f: &mut Frame<'_>, app: &App, dialog: &ConfirmDialog, area: Rect) {
    let popup = centered(area, 50, 5);
    f.render_widget(Clear, popup);
    let widget = Paragraph::new(vec![
        Line::from(dialog.message.as_str()),
        Line::from(""),
        Line::styled(
            "y / Enter confirm • n / Esc cancel",
            Style::default().fg(app.theme.text_dim),
        ),
    ])
    .block(
        Block::default()
            .title(dialog.title.as_str())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.warning)),
    )
    .wrap(Wrap { trim: true });
    f.render_widget(widget, popup);
}
