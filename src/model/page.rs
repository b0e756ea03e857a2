//! A page (record) returned by the Notion database query endpoint, and accessors for the handful
//! of property types the ledger reads.

use crate::model::Amount;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};

/// The opaque identifier Notion assigns to every page.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PageId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A single database row. Only the ID and the raw property map are kept; typed values are read
/// on demand so that unexpected or missing properties never fail a whole query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    id: PageId,
    #[serde(default)]
    properties: Map<String, Value>,
}

impl Page {
    pub fn new(id: PageId, properties: Map<String, Value>) -> Self {
        Self { id, properties }
    }

    pub fn id(&self) -> &PageId {
        &self.id
    }

    /// The text of a `title` property. Segments are concatenated. Returns `None` when the property
    /// is missing or has no text.
    pub fn title(&self, property: &str) -> Option<String> {
        self.text(property, "title")
    }

    /// The text of a `rich_text` property.
    pub fn rich_text(&self, property: &str) -> Option<String> {
        self.text(property, "rich_text")
    }

    /// The value of a `number` property. Null, missing and non-numeric values yield `None`.
    pub fn number(&self, property: &str) -> Option<Amount> {
        self.properties
            .get(property)?
            .get("number")?
            .as_f64()
            .and_then(Amount::from_f64)
    }

    /// The start date of a `date` property.
    pub fn date(&self, property: &str) -> Option<NaiveDate> {
        let start = self
            .properties
            .get(property)?
            .get("date")?
            .get("start")?
            .as_str()?;
        // Date-time values carry a time component after the calendar date.
        NaiveDate::parse_from_str(start.get(..10)?, "%Y-%m-%d").ok()
    }

    /// The IDs referenced by a `relation` property, in stored order.
    pub fn relation(&self, property: &str) -> Vec<PageId> {
        self.properties
            .get(property)
            .and_then(|p| p.get("relation"))
            .and_then(Value::as_array)
            .map(|links| {
                links
                    .iter()
                    .filter_map(|link| link.get("id")?.as_str())
                    .map(PageId::from)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn text(&self, property: &str, kind: &str) -> Option<String> {
        let segments = self.properties.get(property)?.get(kind)?.as_array()?;
        let text: String = segments.iter().filter_map(segment_text).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Notion responses carry `plain_text`; request payloads (and therefore pages created by the
/// in-memory store) only carry `text.content`.
fn segment_text(segment: &Value) -> Option<&str> {
    segment
        .get("plain_text")
        .and_then(Value::as_str)
        .or_else(|| segment.get("text")?.get("content")?.as_str())
}
