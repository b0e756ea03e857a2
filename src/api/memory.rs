//! Implements the `Store` trait using in-memory data.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the
//! whole service, top-to-bottom, without a Notion workspace.

use crate::api::Store;
use crate::model::{
    Amount, Page, PageId, Properties, Query, QueryResponse, AMOUNT, CATEGORY_RELATION,
    CATEGORY_TEXT, DATE, MAX_PAGE_SIZE, MONTH_RELATION, NAME,
};
use crate::{Config, Result};
use anyhow::{bail, Context};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// An implementation of the `Store` trait that holds databases in memory. Clones share the same
/// data, so a test can keep a handle while the ledger owns another.
///
/// It also counts requests and can be told to fail them, which lets tests observe how many remote
/// calls an operation makes and how it behaves when the store is unavailable.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

#[derive(Debug, Default)]
struct State {
    databases: HashMap<String, Vec<Page>>,
    query_calls: usize,
    create_calls: usize,
    fail_queries: bool,
    fail_creates: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with the databases named in `config`, filled with a few categories, months
    /// and expenses.
    pub fn seeded(config: &Config) -> Self {
        let store = Self::new();
        store.create_database(config.transactions_db());

        let categories: HashMap<&str, PageId> = match config.categories_db() {
            Some(db) => {
                store.create_database(db);
                SEED_CATEGORIES
                    .iter()
                    .map(|name| (*name, store.add_named(db, name)))
                    .collect()
            }
            None => HashMap::new(),
        };
        let months: HashMap<&str, PageId> = match config.months_db() {
            Some(db) => {
                store.create_database(db);
                SEED_MONTHS
                    .iter()
                    .map(|name| (*name, store.add_named(db, name)))
                    .collect()
            }
            None => HashMap::new(),
        };

        for (name, cents, date, category, month) in SEED_EXPENSES {
            let mut properties = Properties::new()
                .title(NAME, name)
                .number(AMOUNT, Amount::new(Decimal::new(*cents, 2)))
                .rich_text(CATEGORY_TEXT, category);
            if let Some(date) = NaiveDate::from_ymd_opt(date.0, date.1, date.2) {
                properties = properties.date(DATE, date);
            }
            if let Some(id) = categories.get(category) {
                properties = properties.relation(CATEGORY_RELATION, std::slice::from_ref(id));
            }
            if let Some(id) = months.get(month) {
                properties = properties.relation(MONTH_RELATION, std::slice::from_ref(id));
            }
            store.add_page(config.transactions_db(), properties);
        }
        store
    }

    /// Adds an empty database. Querying or creating pages in an unknown database fails, the same
    /// way Notion answers with `object_not_found`.
    pub fn create_database(&self, database_id: &str) {
        self.state()
            .databases
            .entry(database_id.to_string())
            .or_default();
    }

    /// Adds a page directly, without counting it as a create call, and returns its new ID.
    pub fn add_page(&self, database_id: &str, properties: Properties) -> PageId {
        let page = Page::new(new_page_id(), properties.into_inner());
        let id = page.id().clone();
        self.state()
            .databases
            .entry(database_id.to_string())
            .or_default()
            .push(page);
        id
    }

    /// Adds a page that only has a `Name` title.
    pub fn add_named(&self, database_id: &str, name: &str) -> PageId {
        self.add_page(database_id, Properties::new().title(NAME, name))
    }

    /// All pages of a database, in insertion order.
    pub fn pages(&self, database_id: &str) -> Vec<Page> {
        self.state()
            .databases
            .get(database_id)
            .cloned()
            .unwrap_or_default()
    }

    /// The number of `query` calls received, including failed ones.
    pub fn query_calls(&self) -> usize {
        self.state().query_calls
    }

    /// The number of `create_page` calls received, including failed ones.
    pub fn create_calls(&self) -> usize {
        self.state().create_calls
    }

    /// Makes every subsequent query fail when `fail` is true.
    pub fn fail_queries(&self, fail: bool) {
        self.state().fail_queries = fail;
    }

    /// Makes every subsequent page creation fail when `fail` is true.
    pub fn fail_creates(&self, fail: bool) {
        self.state().fail_creates = fail;
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl Store for InMemoryStore {
    async fn query(&self, database_id: &str, query: &Query) -> Result<QueryResponse> {
        let mut state = self.state();
        state.query_calls += 1;
        if state.fail_queries {
            bail!("The in-memory store is configured to fail queries")
        }
        let pages = state
            .databases
            .get(database_id)
            .with_context(|| format!("Could not find database with ID: {database_id}"))?;

        let matching: Vec<&Page> = pages
            .iter()
            .filter(|page| query.filter().map_or(true, |f| f.matches(page)))
            .collect();

        // The cursor is the ID of the first page of the next batch.
        let start = match query.start_cursor() {
            Some(cursor) => matching
                .iter()
                .position(|page| page.id().as_str() == cursor)
                .with_context(|| format!("Invalid start_cursor: {cursor}"))?,
            None => 0,
        };
        let page_size = query.page_size().unwrap_or(MAX_PAGE_SIZE) as usize;
        let end = (start + page_size).min(matching.len());
        let next_cursor = matching.get(end).map(|page| page.id().to_string());

        Ok(QueryResponse {
            results: matching[start..end].iter().map(|p| (*p).clone()).collect(),
            has_more: next_cursor.is_some(),
            next_cursor,
        })
    }

    async fn create_page(&self, database_id: &str, properties: Properties) -> Result<Page> {
        let mut state = self.state();
        state.create_calls += 1;
        if state.fail_creates {
            bail!("The in-memory store is configured to fail page creation")
        }
        let pages = state
            .databases
            .get_mut(database_id)
            .with_context(|| format!("Could not find database with ID: {database_id}"))?;
        let page = Page::new(new_page_id(), properties.into_inner());
        pages.push(page.clone());
        Ok(page)
    }
}

fn new_page_id() -> PageId {
    PageId::new(Uuid::new_v4().to_string())
}

/// Seed categories.
const SEED_CATEGORIES: &[&str] = &["Lebensmittel", "Haushalt", "Freizeit", "Kleidung"];

/// Seed months.
const SEED_MONTHS: &[&str] = &["Januar", "Februar", "März", "April"];

/// Seed expenses: name, amount in cents, date, category, month.
type SeedExpense = (&'static str, i64, (i32, u32, u32), &'static str, &'static str);

const SEED_EXPENSES: &[SeedExpense] = &[
    ("Migros", 8743, (2025, 3, 3), "Lebensmittel", "März"),
    ("Coop", 2310, (2025, 3, 8), "Lebensmittel", "März"),
    ("IKEA", 12995, (2025, 3, 9), "Haushalt", "März"),
    ("Aldi", 4120, (2025, 3, 15), "Lebensmittel", "März"),
    ("Kino", 1950, (2025, 3, 21), "Freizeit", "März"),
    ("Lidl", 3385, (2025, 4, 2), "Lebensmittel", "April"),
    ("H&M", 5990, (2025, 4, 5), "Kleidung", "April"),
];
