//! Runtime configuration for the ledger.
//!
//! The configuration is assembled once at startup from [`NotionArgs`] (flags or environment
//! variables) and then handed to every component that needs it. It holds the Notion credential,
//! the API base URL, the three database identifiers and the name of the tracked category.

use crate::args::NotionArgs;
use crate::Result;
use anyhow::{bail, Context};
use std::fmt::{Debug, Formatter};
use url::Url;

/// The default Notion API endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.notion.com/v1";

/// The default name of the category whose monthly total is reported.
pub const DEFAULT_TRACKED_CATEGORY: &str = "Lebensmittel";

/// The `Config` object carries everything the ledger needs to talk to Notion. Construct it with
/// [`Config::new`] (which validates the required values) or from parsed command-line arguments
/// with [`Config::from_args`].
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    api_key: String,
    api_base: Url,
    transactions_db: String,
    categories_db: Option<String>,
    months_db: Option<String>,
    tracked_category: String,
}

impl Config {
    /// Creates a configuration from the two required values, using defaults for everything else.
    ///
    /// # Errors
    /// - Returns an error if `api_key` or `transactions_db` is empty or only whitespace.
    pub fn new(api_key: impl Into<String>, transactions_db: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into().trim().to_string();
        let transactions_db = transactions_db.into().trim().to_string();
        if api_key.is_empty() {
            bail!("The Notion API key is missing, set NOTION_API_KEY or pass --api-key")
        }
        if transactions_db.is_empty() {
            bail!(
                "The transactions database ID is missing, set NOTION_TRANSAKT_DB_ID or pass \
                --transactions-db"
            )
        }
        let api_base = Url::parse(DEFAULT_API_BASE).context("Invalid default API base URL")?;
        Ok(Self {
            api_key,
            api_base,
            transactions_db,
            categories_db: None,
            months_db: None,
            tracked_category: DEFAULT_TRACKED_CATEGORY.to_string(),
        })
    }

    /// Builds and validates a configuration from parsed arguments.
    ///
    /// # Errors
    /// - Returns an error if the API key or the transactions database ID was not provided.
    pub fn from_args(args: &NotionArgs) -> Result<Self> {
        let config = Self::new(
            args.api_key().unwrap_or_default(),
            args.transactions_db().unwrap_or_default(),
        )?
        .with_categories_db(args.categories_db())
        .with_months_db(args.months_db())
        .with_tracked_category(args.tracked_category())
        .with_api_base(args.api_base().clone());
        Ok(config)
    }

    /// Sets the categories database. A blank ID is treated as unset.
    pub fn with_categories_db(mut self, id: Option<impl AsRef<str>>) -> Self {
        self.categories_db = non_blank(id);
        self
    }

    /// Sets the months database. A blank ID is treated as unset.
    pub fn with_months_db(mut self, id: Option<impl AsRef<str>>) -> Self {
        self.months_db = non_blank(id);
        self
    }

    pub fn with_tracked_category(mut self, name: impl Into<String>) -> Self {
        self.tracked_category = name.into();
        self
    }

    pub fn with_api_base(mut self, api_base: Url) -> Self {
        self.api_base = api_base;
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    pub fn transactions_db(&self) -> &str {
        &self.transactions_db
    }

    pub fn categories_db(&self) -> Option<&str> {
        self.categories_db.as_deref()
    }

    pub fn months_db(&self) -> Option<&str> {
        self.months_db.as_deref()
    }

    pub fn tracked_category(&self) -> &str {
        &self.tracked_category
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"********")
            .field("api_base", &self.api_base.as_str())
            .field("transactions_db", &self.transactions_db)
            .field("categories_db", &self.categories_db)
            .field("months_db", &self.months_db)
            .field("tracked_category", &self.tracked_category)
            .finish()
    }
}

fn non_blank(id: Option<impl AsRef<str>>) -> Option<String> {
    id.map(|s| s.as_ref().trim().to_string())
        .filter(|s| !s.is_empty())
}
