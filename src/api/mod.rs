//! Access to the remote document store.
//!
//! The `Store` trait is the seam between the ledger and Notion. `NotionStore` talks to the real
//! REST API; `InMemoryStore` keeps pages in memory so that the whole service can run, and be
//! tested, without a Notion workspace.

mod memory;
mod notion;

use crate::model::{Filter, Page, Properties, Query, QueryResponse, MAX_PAGE_SIZE};
use crate::{Config, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub use memory::InMemoryStore;
pub use notion::{NotionStore, NOTION_VERSION};

/// The environment variable that switches the service to the in-memory store.
pub const TEST_MODE_ENV: &str = "SHOPPING_LEDGER_IN_TEST_MODE";

/// The two operations the ledger needs from the store.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    /// Runs a single query request against `database_id` and returns one page of results.
    async fn query(&self, database_id: &str, query: &Query) -> Result<QueryResponse>;

    /// Creates a page in `database_id` with the given property values.
    async fn create_page(&self, database_id: &str, properties: Properties) -> Result<Page>;
}

/// Which `Store` implementation backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Talk to the Notion REST API.
    #[default]
    Notion,
    /// Serve seeded, in-memory data.
    Testing,
}

serde_plain::derive_display_from_serialize!(Mode);
serde_plain::derive_fromstr_from_deserialize!(Mode);

impl Mode {
    /// Returns `Mode::Testing` when `SHOPPING_LEDGER_IN_TEST_MODE` is set and non-empty,
    /// otherwise `Mode::Notion`.
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => Mode::Testing,
            _ => Mode::Notion,
        }
    }
}

/// Creates the `Store` for `mode`.
pub fn store(config: &Config, mode: Mode) -> Result<Arc<dyn Store>> {
    info!("Using the {mode} store");
    match mode {
        Mode::Notion => Ok(Arc::new(NotionStore::new(config)?)),
        Mode::Testing => Ok(Arc::new(InMemoryStore::seeded(config))),
    }
}

/// Runs `filter` against `database_id` and follows the cursor until every matching page has been
/// fetched. Stops early if the store hands back a cursor it has already returned.
pub(crate) async fn query_all(
    store: &dyn Store,
    database_id: &str,
    filter: Option<Filter>,
) -> Result<Vec<Page>> {
    let mut query = match filter {
        Some(filter) => Query::filtered(filter),
        None => Query::all(),
    }
    .with_page_size(MAX_PAGE_SIZE);

    let mut pages = Vec::new();
    let mut seen = HashSet::new();
    loop {
        let response = store.query(database_id, &query).await?;
        pages.extend(response.results);
        match response.next_cursor {
            Some(cursor) if response.has_more => {
                if !seen.insert(cursor.clone()) {
                    warn!("Database {database_id} returned cursor {cursor} twice, stopping");
                    break;
                }
                debug!("Fetching the next page of {database_id} at cursor {cursor}");
                query = query.starting_at(Some(cursor));
            }
            _ => break,
        }
    }
    Ok(pages)
}
