//! Reusable widget components.

pub mod detail;
pub mod filter;
pub mod status;
pub mod table;

pub use detail::DetailPanel;
pub use filter::{centered, EditorSignal, FilterBar, FilterEditor, FilterOption};
pub use status::StatusIndicator;
pub use table::{ReportTable, ResourceTable, TableStyle};
