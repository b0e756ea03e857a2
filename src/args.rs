//! These structs provide the command-line and environment interface for the shopping-ledger
//! server.

use clap::Parser;
use std::net::SocketAddr;
use tracing_subscriber::filter::LevelFilter;
use url::Url;

/// shopping-ledger: record shopping expenses into Notion.
///
/// The server exposes a tiny JSON API that lists the categories and months found in your Notion
/// databases, records new expenses into the transactions database and reports the running total
/// of one tracked category for a given month.
///
/// Every setting can be passed either as a flag or as an environment variable. The Notion API key
/// and the transactions database ID are required; the server refuses to start without them.
#[derive(Debug, Parser, Clone)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[clap(flatten)]
    notion: NotionArgs,
}

impl Args {
    pub fn new(common: Common, notion: NotionArgs) -> Self {
        Self { common, notion }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn notion(&self) -> &NotionArgs {
        &self.notion
    }
}

/// Arguments that control the process itself rather than the Notion connection.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The socket address the HTTP server listens on.
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:8000")]
    bind: SocketAddr,
}

impl Common {
    pub fn new(log_level: LevelFilter, bind: SocketAddr) -> Self {
        Self { log_level, bind }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn bind(&self) -> SocketAddr {
        self.bind
    }
}

/// Credentials and database identifiers for the Notion workspace.
#[derive(Debug, Parser, Clone)]
pub struct NotionArgs {
    /// The Notion integration secret used as the bearer credential.
    #[arg(long, env = "NOTION_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// The ID of the database that expenses are recorded into.
    #[arg(long, env = "NOTION_TRANSAKT_DB_ID")]
    transactions_db: Option<String>,

    /// The ID of the database holding one page per category.
    #[arg(long, env = "NOTION_KATEG_DB_ID")]
    categories_db: Option<String>,

    /// The ID of the database holding one page per month.
    #[arg(long, env = "NOTION_MONAT_DB_ID")]
    months_db: Option<String>,

    /// The category whose monthly total is reported by the sum endpoint.
    #[arg(long, env = "TRACKED_CATEGORY", default_value = "Lebensmittel")]
    tracked_category: String,

    /// The base URL of the Notion REST API.
    #[arg(long, env = "NOTION_API_BASE", default_value = "https://api.notion.com/v1")]
    api_base: Url,
}

impl NotionArgs {
    pub fn new(
        api_key: Option<String>,
        transactions_db: Option<String>,
        categories_db: Option<String>,
        months_db: Option<String>,
        tracked_category: impl Into<String>,
        api_base: Url,
    ) -> Self {
        Self {
            api_key,
            transactions_db,
            categories_db,
            months_db,
            tracked_category: tracked_category.into(),
            api_base,
        }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn transactions_db(&self) -> Option<&str> {
        self.transactions_db.as_deref()
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

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }
}
