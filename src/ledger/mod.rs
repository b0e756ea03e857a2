//! The expense ledger: name resolution, option listing, monthly sums and expense recording on top
//! of a `Store`.
//!
//! Reads never fail outright. They return a [`Lookup`] so that "nothing matched" and "the store
//! could not be reached" stay distinguishable in the logs, even though the HTTP layer reports both
//! as an empty list or a zero total.

mod options;
mod record;
mod resolve;
mod sum;

use crate::api::Store;
use crate::Config;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

pub use options::FormOptions;

/// The outcome of a read against the store.
#[derive(Debug)]
pub enum Lookup<T> {
    /// The read succeeded.
    Found(T),
    /// There was nothing to read: an empty name, an unset database or no matching page.
    Missing,
    /// The store could not answer.
    Unavailable(anyhow::Error),
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Missing | Lookup::Unavailable(_) => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Lookup::Missing)
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Lookup::Unavailable(_))
    }

    /// The found value, or `T::default()` for both `Missing` and `Unavailable`.
    pub fn unwrap_or_default(self) -> T
    where
        T: Default,
    {
        self.found().unwrap_or_default()
    }
}

/// The ledger owns the configuration and a shared handle to the store. Cloning is cheap and every
/// clone talks to the same store.
#[derive(Clone)]
pub struct Ledger {
    config: Arc<Config>,
    store: Arc<dyn Store>,
}

impl Ledger {
    pub fn new(config: Config, store: Arc<dyn Store>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }
}

impl Debug for Ledger {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
