//! SynthBrute theme and color utilities.

use crate::notifications::NotificationLevel;
use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct SynthBruteTheme {
    pub bg: Color,
    pub bg_highlight: Color,
    pub primary: Color,
    pub primary_dim: Color,
    pub secondary: Color,
    pub tertiary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub text: Color,
    pub text_dim: Color,
    pub border: Color,
    pub border_focus: Color,
}

impl SynthBruteTheme {
    pub fn synthbrute() -> Self {
        Self {
            bg: Color::Rgb(10, 10, 10),
            bg_highlight: Color::Rgb(42, 42, 42),
            primary: Color::Rgb(0, 255, 255),
            primary_dim: Color::Rgb(0, 136, 136),
            secondary: Color::Rgb(255, 0, 255),
            tertiary: Color::Rgb(255, 255, 0),
            success: Color::Rgb(0, 255, 0),
            warning: Color::Rgb(255, 255, 0),
            error: Color::Rgb(255, 0, 0),
            info: Color::Rgb(0, 255, 255),
            text: Color::Rgb(255, 255, 255),
            text_dim: Color::Rgb(136, 136, 136),
            border: Color::Rgb(68, 68, 68),
            border_focus: Color::Rgb(0, 255, 255),
        }
    }
}

/// Color of a record status as returned by the API (cases, receivables,
/// expenses).
pub fn record_status_color(status: &str, theme: &SynthBruteTheme) -> Color {
    match status.trim().to_lowercase().as_str() {
        "ativo" | "pago" | "paga" => theme.success,
        "pendente" | "a pagar" | "suspenso" => theme.warning,
        "vencido" | "vencida" => theme.error,
        "encerrado" | "arquivado" | "cancelado" | "cancelada" => theme.text_dim,
        _ => theme.text,
    }
}

pub fn event_type_color(event_type: &str, theme: &SynthBruteTheme) -> Color {
    match event_type.trim().to_lowercase().as_str() {
        "prazo" => theme.error,
        "audiência" | "audiencia" => theme.secondary,
        "reunião" | "reuniao" => theme.primary,
        "lembrete" => theme.tertiary,
        _ => theme.text_dim,
    }
}

pub fn notification_color(level: NotificationLevel, theme: &SynthBruteTheme) -> Color {
    match level {
        NotificationLevel::Info => theme.info,
        NotificationLevel::Warning => theme.warning,
        NotificationLevel::Error => theme.error,
        NotificationLevel::Success => theme.success,
    }
}
