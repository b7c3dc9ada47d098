//! Filter state for collection views.
//!
//! Values are typed per [`FilterKind`]; user input is parsed once, when it
//! enters the state, and rendered back to query form by the query builder.

use crate::error::{FilterError, ValidationError};
use crate::resource::RecordId;
use crate::schema::{FilterKind, FilterSpec, ResourceSchema};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Query value the API uses for "records without a case".
pub const UNLINKED_CASE: &str = "-1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Choice(&'static str),
    Date(NaiveDate),
    Record(RecordId),
    Unlinked,
    Flag(bool),
}

impl FilterValue {
    /// Parse user input for `spec`. Blank input yields `None`, which clears
    /// the filter.
    pub fn parse(spec: &FilterSpec, input: &str) -> Result<Option<Self>, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let value = match spec.kind {
            FilterKind::Text => FilterValue::Text(trimmed.to_string()),
            FilterKind::Choice(options) => options
                .iter()
                .find(|option| option.to_lowercase() == trimmed.to_lowercase())
                .map(|option| FilterValue::Choice(*option))
                .ok_or_else(|| {
                    ValidationError::invalid(
                        spec.name,
                        format!("expected one of: {}", options.join(", ")),
                    )
                })?,
            FilterKind::Date => FilterValue::Date(parse_date(spec.name, trimmed)?),
            FilterKind::RecordId => FilterValue::Record(parse_record_id(spec.name, trimmed)?),
            FilterKind::CaseLink => match trimmed.to_ascii_lowercase().as_str() {
                "none" | "-" | "geral" | UNLINKED_CASE => FilterValue::Unlinked,
                _ => FilterValue::Record(parse_record_id(spec.name, trimmed)?),
            },
            FilterKind::Flag => match trimmed.to_lowercase().as_str() {
                "yes" | "y" | "true" | "sim" | "1" | "concluido" => FilterValue::Flag(true),
                "no" | "n" | "false" | "nao" | "não" | "0" | "pendente" => {
                    FilterValue::Flag(false)
                }
                _ => {
                    return Err(ValidationError::invalid(spec.name, "expected yes or no"));
                }
            },
        };
        Ok(Some(value))
    }

    /// Whether this value can be held by a filter of `kind`.
    pub fn fits(&self, kind: FilterKind) -> bool {
        match (self, kind) {
            (FilterValue::Text(_), FilterKind::Text) => true,
            (FilterValue::Choice(value), FilterKind::Choice(options)) => options.contains(value),
            (FilterValue::Date(_), FilterKind::Date) => true,
            (FilterValue::Record(_), FilterKind::RecordId | FilterKind::CaseLink) => true,
            (FilterValue::Unlinked, FilterKind::CaseLink) => true,
            (FilterValue::Flag(_), FilterKind::Flag) => true,
            _ => false,
        }
    }

    /// Value as sent in the query string, before percent-encoding.
    pub fn to_query_value(&self) -> String {
        match self {
            FilterValue::Text(text) => text.clone(),
            FilterValue::Choice(choice) => choice.to_string(),
            FilterValue::Date(date) => date.format("%Y-%m-%d").to_string(),
            FilterValue::Record(id) => id.to_string(),
            FilterValue::Unlinked => UNLINKED_CASE.to_string(),
            FilterValue::Flag(flag) => flag.to_string(),
        }
    }

    /// Value as shown back in the filter editor.
    pub fn to_input(&self) -> String {
        match self {
            FilterValue::Unlinked => "none".to_string(),
            FilterValue::Flag(true) => "yes".to_string(),
            FilterValue::Flag(false) => "no".to_string(),
            other => other.to_query_value(),
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, FilterValue::Text(text) if text.trim().is_empty())
    }
}

fn parse_date(field: &str, input: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(input, "%d/%m/%Y"))
        .map_err(|_| ValidationError::invalid(field, "expected a date as YYYY-MM-DD"))
}

fn parse_record_id(field: &str, input: &str) -> Result<RecordId, ValidationError> {
    match input.parse::<RecordId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ValidationError::invalid(field, "expected a positive record id")),
    }
}

/// Current filter criteria of one view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    values: HashMap<&'static str, FilterValue>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear (`None`) the filter `name`.
    pub fn set(
        &mut self,
        schema: &ResourceSchema,
        name: &str,
        value: Option<FilterValue>,
    ) -> Result<(), FilterError> {
        let spec = schema.filter(name).ok_or_else(|| FilterError::UnknownFilter {
            resource: schema.kind,
            name: name.to_string(),
        })?;
        match value {
            Some(value) if !value.is_empty() => {
                if !value.fits(spec.kind) {
                    return Err(ValidationError::invalid(
                        spec.name,
                        "value does not match the filter type",
                    )
                    .into());
                }
                self.values.insert(spec.name, value);
            }
            _ => {
                self.values.remove(spec.name);
            }
        }
        Ok(())
    }

    /// Parse `input` for the filter `name` and set it.
    pub fn set_input(
        &mut self,
        schema: &ResourceSchema,
        name: &str,
        input: &str,
    ) -> Result<(), FilterError> {
        let spec = schema.filter(name).ok_or_else(|| FilterError::UnknownFilter {
            resource: schema.kind,
            name: name.to_string(),
        })?;
        let value = FilterValue::parse(spec, input)?;
        self.set(schema, name, value)
    }

    pub fn get(&self, name: &str) -> Option<&FilterValue> {
        self.values.get(name)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Non-empty filters as `(name, value)` pairs, in schema order.
    pub fn active(&self, schema: &ResourceSchema) -> Vec<(&'static str, String)> {
        schema
            .filters
            .iter()
            .filter_map(|spec| {
                self.values
                    .get(spec.name)
                    .map(|value| (spec.name, value.to_query_value()))
            })
            .collect()
    }

    /// Reject inverted date ranges before a request is built.
    pub fn validate(&self, schema: &ResourceSchema) -> Result<(), ValidationError> {
        for (from, to) in schema.date_ranges {
            if let (Some(FilterValue::Date(start)), Some(FilterValue::Date(end))) =
                (self.values.get(from), self.values.get(to))
            {
                if start > end {
                    return Err(ValidationError::InvertedRange {
                        from: from.to_string(),
                        to: to.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}
