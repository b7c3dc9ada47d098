//! lawdesk core - resource data types
//!
//! Pure data: resource schemas, typed records, filter and sort state, query
//! building, draft validation and the accounts reports. No I/O; the client
//! crate depends on this.

pub mod entities;
pub mod error;
pub mod filter;
pub mod query;
pub mod report;
pub mod resource;
pub mod schema;
pub mod sort;
pub mod validation;

pub use entities::{
    decode_collection, AgendaEvent, Case, Client, ClientSummary, Document, ErrorBody, Expense,
    Money, PersonType, Receivable,
};
pub use error::{DecodeError, FilterError, SortError, ValidationError};
pub use filter::{FilterState, FilterValue};
pub use query::CollectionQuery;
pub use report::{Report, ReportItem, ReportKind};
pub use resource::{RecordId, Resource, ResourceKind};
pub use schema::{ColumnSpec, FilterKind, FilterSpec, ResourceSchema};
pub use sort::{SortDirection, SortState};
pub use validation::{
    AgendaEventDraft, CaseDraft, ClientDraft, Draft, ExpenseDraft, ReceivableDraft,
};
