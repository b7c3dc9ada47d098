//! View rendering dispatch.

pub mod list;
pub mod overlay;
pub mod report;

use crate::nav::View;
use crate::state::App;
use crate::theme::notification_color;
use lawdesk_core::ReportKind;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

pub fn render_view(f: &mut Frame<'_>, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    render_header(f, app, layout[0]);
    match app.open_report {
        Some(kind) => report::render(f, app, app.report(kind), layout[1]),
        None => list::render(f, app, layout[1]),
    }
    render_footer(f, app, layout[2]);

    if let Some(modal) = &app.modal {
        overlay::render_modal(f, app, modal, layout[1]);
    }
    if let Some(editor) = &app.filter_editor {
        editor.render(
            f,
            layout[1],
            Style::default().fg(app.theme.primary),
            Style::default().fg(app.theme.text_dim),
        );
    }
    if let Some(dialog) = &app.confirm {
        overlay::render_confirm(f, app, dialog, layout[1]);
    }
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let views = View::all().iter().map(|view| view.title());
    let reports = ReportKind::all().iter().map(|kind| kind.title());
    let titles: Vec<Line> = views
        .chain(reports)
        .enumerate()
        .map(|(index, title)| Line::from(format!("{} {}", index + 1, title)))
        .collect();
    let selected = match app.open_report {
        Some(kind) => View::all().len() + kind.index(),
        None => app.active_view.index(),
    };
    let tabs = Tabs::new(titles)
        .select(selected)
        .block(
            Block::default().borders(Borders::ALL).title(Span::styled(
                format!("lawdesk | {}", app.config.api_base_url),
                Style::default().fg(app.theme.primary),
            )),
        )
        .style(Style::default().fg(app.theme.text_dim))
        .highlight_style(
            Style::default()
                .fg(app.theme.secondary)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, area);
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let help = match app.open_report {
        Some(_) => "j/k move • Ctrl-r refresh • Esc back • 1-6 resources • ? help • q quit",
        None => {
            "j/k move • h/l column • s sort • / search • f filters • e details • d delete \
             • 7/8 reports • ? help • q quit"
        }
    };
    let (text, style) = match app.current_notification() {
        Some(note) => (
            note.message.clone(),
            Style::default().fg(notification_color(note.level, &app.theme)),
        ),
        None => (help.to_string(), Style::default().fg(app.theme.text_dim)),
    };
    let footer = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .style(style);
    f.render_widget(footer, area);
}
