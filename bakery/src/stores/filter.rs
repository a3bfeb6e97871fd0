use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use transport::QueryParams;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        })
    }
}

/// Committed list filter of one resource. Serialized straight into the list
/// request's query string.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListFilter {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    pub sort_order: SortDirection,
    pub search_term: String,
    /// Resource-specific filters (`status`, `categoryId`, ...).
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for ListFilter {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            sort_by: None,
            sort_order: SortDirection::Asc,
            search_term: String::new(),
            extra: BTreeMap::new(),
        }
    }
}

impl ListFilter {
    pub fn with_page_size(limit: u32) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Shallow merge: only the fields present in `patch` change.
    pub fn merge(&mut self, patch: FilterPatch) {
        if let Some(page) = patch.page {
            self.page = page.max(1);
        }
        if let Some(limit) = patch.limit {
            self.limit = limit;
        }
        if let Some(sort_by) = patch.sort_by {
            self.sort_by = sort_by;
        }
        if let Some(sort_order) = patch.sort_order {
            self.sort_order = sort_order;
        }
        if let Some(search_term) = patch.search_term {
            self.search_term = search_term;
        }
        for (key, value) in patch.extra {
            if value.is_null() {
                self.extra.remove(&key);
            } else {
                self.extra.insert(key, value);
            }
        }
    }

    pub fn merged(mut self, patch: FilterPatch) -> Self {
        self.merge(patch);
        self
    }

    pub fn to_query(&self) -> Result<QueryParams, serde_json::Error> {
        QueryParams::from_serializable(self)
    }
}

/// Partial filter update. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPatch {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort_by: Option<Option<String>>,
    pub sort_order: Option<SortDirection>,
    pub search_term: Option<String>,
    /// A JSON null removes the key.
    pub extra: BTreeMap<String, Value>,
}

impl FilterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn sort(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_by = Some(Some(column.into()));
        self.sort_order = Some(direction);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    pub fn extra(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
