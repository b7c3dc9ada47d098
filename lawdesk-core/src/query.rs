//! Query string construction for collection endpoints.

use crate::error::ValidationError;
use crate::filter::FilterState;
use crate::schema::ResourceSchema;
use crate::sort::SortState;
use std::fmt;

/// A validated `GET /{resource}` query: active filters in schema order,
/// followed by `sort_by` and `sort_order`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionQuery {
    pairs: Vec<(String, String)>,
}

impl CollectionQuery {
    pub fn build(
        schema: &ResourceSchema,
        filters: &FilterState,
        sort: &SortState,
    ) -> Result<Self, ValidationError> {
        filters.validate(schema)?;
        let mut pairs: Vec<(String, String)> = filters
            .active(schema)
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();
        pairs.push(("sort_by".to_string(), sort.field.clone()));
        pairs.push((
            "sort_order".to_string(),
            sort.direction.as_query_str().to_string(),
        ));
        Ok(Self { pairs })
    }

    /// Unencoded `(key, value)` pairs.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Percent-encoded query string including the leading `?`.
    pub fn to_query_string(&self) -> String {
        let encoded: Vec<String> = self
            .pairs
            .iter()
            .map(|(key, value)| {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
            })
            .collect();
        format!("?{}", encoded.join("&"))
    }
}

impl fmt::Display for CollectionQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}
