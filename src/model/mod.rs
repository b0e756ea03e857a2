//! Types that represent the data model: expenses, pages, filters and the amounts stored in them.
mod amount;
mod expense;
mod filter;
mod page;
mod properties;

pub use amount::Amount;
pub use expense::Expense;
pub use filter::{Filter, Query, QueryResponse, MAX_PAGE_SIZE};
pub use page::{Page, PageId};
pub use properties::Properties;

/// The title property every page carries. Category and month pages are matched on it.
pub const NAME: &str = "Name";
/// The number property holding the amount of an expense.
pub const AMOUNT: &str = "Betrag";
/// The date property holding the day of an expense.
pub const DATE: &str = "Datum";
/// A plain-text copy of the category name, kept even when the relation cannot be set.
pub const CATEGORY_TEXT: &str = "Kategorie_Text";
/// The optional free-text note.
pub const NOTE: &str = "Notiz";
/// The relation from an expense to its category page.
pub const CATEGORY_RELATION: &str = "Kategorien";
/// The relation from an expense to its month page.
pub const MONTH_RELATION: &str = "Monat";
