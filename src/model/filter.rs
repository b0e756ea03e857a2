//! Database query bodies and responses.
//!
//! `Filter` mirrors the subset of the Notion filter language the ledger uses. It serializes to the
//! exact JSON shape the query endpoint expects and can also be evaluated against a `Page`, which
//! is how the in-memory store answers queries.

use crate::model::{Page, PageId};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Value};

/// The largest page size the query endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A database filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// The `title` property equals `value` exactly.
    TitleEquals { property: String, value: String },
    /// The `relation` property contains a link to `page_id`.
    RelationContains { property: String, page_id: PageId },
    /// Every nested filter matches.
    And(Vec<Filter>),
}

impl Filter {
    pub fn title_equals(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self::TitleEquals {
            property: property.into(),
            value: value.into(),
        }
    }

    pub fn relation_contains(property: impl Into<String>, page_id: PageId) -> Self {
        Self::RelationContains {
            property: property.into(),
            page_id,
        }
    }

    pub fn and(filters: impl IntoIterator<Item = Filter>) -> Self {
        Self::And(filters.into_iter().collect())
    }

    /// Evaluates the filter locally.
    pub fn matches(&self, page: &Page) -> bool {
        match self {
            Filter::TitleEquals { property, value } => {
                page.title(property).as_deref() == Some(value.as_str())
            }
            Filter::RelationContains { property, page_id } => {
                page.relation(property).contains(page_id)
            }
            Filter::And(filters) => filters.iter().all(|f| f.matches(page)),
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Filter::TitleEquals { property, value } => json!({
                "property": property,
                "title": { "equals": value },
            }),
            Filter::RelationContains { property, page_id } => json!({
                "property": property,
                "relation": { "contains": page_id },
            }),
            Filter::And(filters) => json!({
                "and": filters.iter().map(Filter::to_json).collect::<Vec<_>>(),
            }),
        }
    }
}

impl Serialize for Filter {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json().serialize(serializer)
    }
}

/// The body of a database query request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Query {
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<Filter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_cursor: Option<String>,
}

impl Query {
    /// A query matching every page in the database.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn filtered(filter: Filter) -> Self {
        Self {
            filter: Some(filter),
            ..Self::default()
        }
    }

    /// Limits the number of results per response, clamped to `1..=MAX_PAGE_SIZE`.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size.clamp(1, MAX_PAGE_SIZE));
        self
    }

    pub fn starting_at(mut self, cursor: Option<String>) -> Self {
        self.start_cursor = cursor;
        self
    }

    pub fn filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    pub fn page_size(&self) -> Option<u32> {
        self.page_size
    }

    pub fn start_cursor(&self) -> Option<&str> {
        self.start_cursor.as_deref()
    }
}

/// One page of query results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<Page>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}
