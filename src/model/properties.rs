use crate::model::{Amount, PageId};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{json, Map, Value};

/// The property values of a page that is about to be created, keyed by property name, in the
/// shape the page-create endpoint expects.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Properties(Map<String, Value>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, property: &str, text: &str) -> Self {
        self.0
            .insert(property.to_string(), json!({ "title": text_segments(text) }));
        self
    }

    pub fn rich_text(mut self, property: &str, text: &str) -> Self {
        self.0
            .insert(property.to_string(), json!({ "rich_text": text_segments(text) }));
        self
    }

    pub fn number(mut self, property: &str, amount: Amount) -> Self {
        self.0
            .insert(property.to_string(), json!({ "number": amount }));
        self
    }

    /// A calendar date without a time component, formatted as ISO 8601.
    pub fn date(mut self, property: &str, date: NaiveDate) -> Self {
        self.0.insert(
            property.to_string(),
            json!({ "date": { "start": date.format("%Y-%m-%d").to_string() } }),
        );
        self
    }

    pub fn relation(mut self, property: &str, ids: &[PageId]) -> Self {
        let links: Vec<Value> = ids.iter().map(|id| json!({ "id": id })).collect();
        self.0
            .insert(property.to_string(), json!({ "relation": links }));
        self
    }

    pub fn contains(&self, property: &str) -> bool {
        self.0.contains_key(property)
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Properties {
    fn from(value: Map<String, Value>) -> Self {
        Self(value)
    }
}

fn text_segments(text: &str) -> Value {
    json!([{ "text": { "content": text } }])
}
