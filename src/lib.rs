//! shopping-ledger records shopping expenses into Notion databases and reports the running
//! monthly total of one tracked category.
//!
//! The [`ledger::Ledger`] translates category and month names into Notion page IDs, creates expense
//! pages and sums amounts. It reaches Notion through the [`api::Store`] trait, and the [`server`]
//! module exposes it over HTTP.

pub mod api;
pub mod args;
mod config;
mod error;
pub mod ledger;
pub mod model;
pub mod server;


pub use api::Mode;
pub use config::Config;
pub use error::Error;
pub use error::Result;
