//! Error types for lawdesk core operations

use crate::{ReportKind, ResourceKind};
use thiserror::Error;

/// Client-side validation errors, raised before any request is sent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Invalid range {from}..{to}: start is after end")]
    InvertedRange { from: String, to: String },
}

impl ValidationError {
    pub fn required(field: impl Into<String>) -> Self {
        Self::RequiredFieldMissing {
            field: field.into(),
        }
    }

    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// The field this error refers to.
    pub fn field(&self) -> &str {
        match self {
            Self::RequiredFieldMissing { field } | Self::InvalidValue { field, .. } => field,
            Self::InvertedRange { from, .. } => from,
        }
    }
}

/// Errors when editing a view's filter state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("{resource} has no filter named '{name}'")]
    UnknownFilter { resource: ResourceKind, name: String },

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Errors when changing a view's sort state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SortError {
    #[error("{resource} cannot be sorted by '{field}'")]
    UnsortableField { resource: ResourceKind, field: String },
}

/// Errors when parsing a response body at the API boundary.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Response body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Response body has no '{key}' collection")]
    MissingCollection { key: &'static str },

    #[error("Response '{key}' is not an array")]
    NotACollection { key: &'static str },

    #[error("Invalid {resource} record at index {index}: {source}")]
    InvalidRecord {
        resource: ResourceKind,
        index: usize,
        source: serde_json::Error,
    },

    #[error("{report} body is not an object")]
    NotAReport { report: ReportKind },

    #[error("Invalid {report} item at index {index}: {source}")]
    InvalidReportItem {
        report: ReportKind,
        index: usize,
        source: serde_json::Error,
    },
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display_required() {
        let err = ValidationError::required("descricao");
        let msg = format!("{}", err);
        assert!(msg.contains("Required field missing"));
        assert!(msg.contains("descricao"));
        assert_eq!(err.field(), "descricao");
    }

    #[test]
    fn test_filter_error_display_unknown() {
        let err = FilterError::UnknownFilter {
            resource: ResourceKind::Client,
            name: "cor".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Clients"));
        assert!(msg.contains("cor"));
    }

    #[test]
    fn test_decode_error_display_missing_collection() {
        let err = DecodeError::MissingCollection { key: "clientes" };
        assert!(format!("{}", err).contains("'clientes'"));
    }

    #[test]
    fn test_decode_error_display_report() {
        let err = DecodeError::NotAReport {
            report: ReportKind::Payables,
        };
        assert_eq!(format!("{}", err), "Payables report body is not an object");
    }
}
