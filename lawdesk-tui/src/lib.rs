//! lawdesk TUI library exports.

pub mod api_client;
pub mod auth;
pub mod config;
pub mod confirm;
pub mod error;
pub mod events;
pub mod keys;
pub mod list_view;
pub mod logging;
pub mod nav;
pub mod notifications;
pub mod persistence;
pub mod report_view;
pub mod state;
pub mod tasks;
pub mod theme;
pub mod views;
pub mod widgets;
