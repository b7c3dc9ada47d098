//! Event types for the TUI event loop.

use crate::api_client::ApiClientError;
use crossterm::event::KeyEvent;
use lawdesk_core::{RecordId, ReportKind, ResourceKind};

#[derive(Debug)]
pub enum TuiEvent {
    Input(KeyEvent),
    Resize { width: u16, height: u16 },
    Fetched {
        kind: ResourceKind,
        generation: u64,
        result: Result<serde_json::Value, ApiClientError>,
    },
    Deleted {
        kind: ResourceKind,
        id: RecordId,
        result: Result<(), ApiClientError>,
    },
    Updated {
        kind: ResourceKind,
        id: RecordId,
        result: Result<serde_json::Value, ApiClientError>,
    },
    ReportFetched {
        kind: ReportKind,
        generation: u64,
        result: Result<serde_json::Value, ApiClientError>,
    },
}
