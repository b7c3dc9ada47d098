//! Sort state for collection views.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Value of the `sort_order` query parameter.
    pub fn as_query_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_query_str())
    }
}

/// The single active sort of a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub field: String,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn ascending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Ascending)
    }

    /// Same field flips the direction, a new field starts ascending.
    pub fn toggle(&mut self, field: &str) {
        if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field.to_string();
            self.direction = SortDirection::Ascending;
        }
    }

    /// Direction for `field` if it is the active sort.
    pub fn direction_of(&self, field: &str) -> Option<SortDirection> {
        (self.field == field).then_some(self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_same_field_flips() {
        let mut sort = SortState::ascending("nome_razao_social");
        sort.toggle("nome_razao_social");
        assert_eq!(sort.direction, SortDirection::Descending);
        sort.toggle("nome_razao_social");
        assert_eq!(sort.direction, SortDirection::Ascending);
    }

    #[test]
    fn test_toggle_new_field_resets_to_ascending() {
        let mut sort = SortState::new("data_vencimento", SortDirection::Descending);
        sort.toggle("valor");
        assert_eq!(sort, SortState::ascending("valor"));
    }

    #[test]
    fn test_direction_of() {
        let sort = SortState::new("titulo", SortDirection::Descending);
        assert_eq!(sort.direction_of("titulo"), Some(SortDirection::Descending));
        assert_eq!(sort.direction_of("status"), None);
    }
}
