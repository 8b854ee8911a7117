//! Common query parameter types shared across list endpoints.

use std::collections::BTreeMap;

/// Pagination, projection and filter parameters for list operations.
///
/// Every field is forwarded to the remote API as-is; the client adds no
/// query semantics of its own. Use the builder methods to set only what
/// the call needs.
///
/// # Example
///
/// ```
/// use sysaid::models::ListParams;
///
/// let params = ListParams::new()
///     .with_limit(25)
///     .with_sort("update_time")
///     .with_dir("desc")
///     .with_filter("responsibility", "7");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    /// Server-side view name.
    pub view: Option<String>,

    /// Comma-separated list of SR fields to return.
    pub fields: Option<String>,

    /// Comma-separated list of SR ids to restrict to.
    pub ids: Option<String>,

    /// SR type filter (`incident`, `request`, `problem`, `change`, `all`).
    pub sr_type: Option<String>,

    /// Pagination offset.
    pub offset: Option<u32>,

    /// Maximum number of results.
    pub limit: Option<u32>,

    /// Field to sort by.
    pub sort: Option<String>,

    /// Sort direction (`asc` or `desc`).
    pub dir: Option<String>,

    /// Additional field filters, forwarded as individual query pairs.
    pub filters: BTreeMap<String, String>,
}

impl ListParams {
    /// Creates empty parameters (server defaults apply).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the server-side view.
    #[must_use]
    pub fn with_view(mut self, view: impl Into<String>) -> Self {
        self.view = Some(view.into());
        self
    }

    /// Restricts the SR fields returned.
    #[must_use]
    pub fn with_fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    /// Restricts results to the given comma-separated ids.
    #[must_use]
    pub fn with_ids(mut self, ids: impl Into<String>) -> Self {
        self.ids = Some(ids.into());
        self
    }

    /// Filters by SR type.
    #[must_use]
    pub fn with_type(mut self, sr_type: impl Into<String>) -> Self {
        self.sr_type = Some(sr_type.into());
        self
    }

    /// Sets the pagination offset.
    #[must_use]
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets the maximum number of results.
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the sort field.
    #[must_use]
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Sets the sort direction.
    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<String>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// Adds a field filter, forwarded verbatim as a query pair.
    #[must_use]
    pub fn with_filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(field.into(), value.into());
        self
    }

    /// Converts the parameters to query pairs, skipping unset fields.
    pub(crate) fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(ref view) = self.view {
            query.push(("view".to_string(), view.clone()));
        }
        if let Some(ref fields) = self.fields {
            query.push(("fields".to_string(), fields.clone()));
        }
        if let Some(ref ids) = self.ids {
            query.push(("ids".to_string(), ids.clone()));
        }
        if let Some(ref sr_type) = self.sr_type {
            query.push(("type".to_string(), sr_type.clone()));
        }
        if let Some(offset) = self.offset {
            query.push(("offset".to_string(), offset.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(ref sort) = self.sort {
            query.push(("sort".to_string(), sort.clone()));
        }
        if let Some(ref dir) = self.dir {
            query.push(("dir".to_string(), dir.clone()));
        }
        for (field, value) in &self.filters {
            query.push((field.clone(), value.clone()));
        }
        query
    }
}
