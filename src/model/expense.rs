use crate::model::{
    Amount, PageId, Properties, AMOUNT, CATEGORY_RELATION, CATEGORY_TEXT, DATE, MONTH_RELATION,
    NAME, NOTE,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An expense as submitted by the entry form.
///
/// The German field names sent by the entry form (`betrag`, `datum`, `kategorie`, `monat`,
/// `notiz`) are accepted as aliases. Empty strings in the optional fields are treated the same as
/// absent values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Where or what was bought, e.g. "Migros".
    pub name: String,
    #[serde(alias = "betrag")]
    pub amount: Amount,
    #[serde(alias = "datum")]
    pub date: NaiveDate,
    /// The display name of a page in the categories database.
    #[serde(default, alias = "kategorie")]
    pub category: Option<String>,
    /// The display name of a page in the months database.
    #[serde(default, alias = "monat")]
    pub month: Option<String>,
    #[serde(default, alias = "notiz")]
    pub note: Option<String>,
}

impl Expense {
    pub fn new(name: impl Into<String>, amount: Amount, date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            amount,
            date,
            category: None,
            month: None,
            note: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_month(mut self, month: impl Into<String>) -> Self {
        self.month = Some(month.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn category(&self) -> Option<&str> {
        non_empty(&self.category)
    }

    pub fn month(&self) -> Option<&str> {
        non_empty(&self.month)
    }

    pub fn note(&self) -> Option<&str> {
        non_empty(&self.note)
    }

    /// Builds the properties of the page that records this expense. Relations are only set for
    /// the IDs that were resolved.
    pub fn properties(&self, category_id: Option<&PageId>, month_id: Option<&PageId>) -> Properties {
        let mut properties = Properties::new()
            .title(NAME, &self.name)
            .number(AMOUNT, self.amount)
            .date(DATE, self.date);
        if let Some(category) = self.category() {
            properties = properties.rich_text(CATEGORY_TEXT, category);
        }
        if let Some(note) = self.note() {
            properties = properties.rich_text(NOTE, note);
        }
        if let Some(id) = category_id {
            properties = properties.relation(CATEGORY_RELATION, std::slice::from_ref(id));
        }
        if let Some(id) = month_id {
            properties = properties.relation(MONTH_RELATION, std::slice::from_ref(id));
        }
        properties
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}
