use crate::api::query_all;
use crate::ledger::{Ledger, Lookup};
use crate::model::NAME;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// The choices offered by the entry form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormOptions {
    pub categories: Vec<String>,
    pub months: Vec<String>,
}

impl Ledger {
    /// Lists the `Name` of every page in `database_id`, in the order the store returns them.
    ///
    /// Returns `Lookup::Missing` without contacting the store when `database_id` is unset. Pages
    /// without a title are skipped.
    pub async fn list_names(&self, database_id: Option<&str>) -> Lookup<Vec<String>> {
        let Some(database_id) = database_id else {
            debug!("Not listing names, the database is not configured");
            return Lookup::Missing;
        };
        match query_all(self.store(), database_id, None).await {
            Ok(pages) => Lookup::Found(pages.iter().filter_map(|p| p.title(NAME)).collect()),
            Err(e) => {
                warn!("Unable to list the pages of database {database_id}: {e:#}");
                Lookup::Unavailable(e)
            }
        }
    }

    /// Lists category and month names for the entry form. Either list is empty when its database
    /// is unset or could not be read.
    pub async fn options(&self) -> FormOptions {
        let categories = self.list_names(self.config().categories_db()).await;
        let months = self.list_names(self.config().months_db()).await;
        FormOptions {
            categories: categories.unwrap_or_default(),
            months: months.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ledger::FormOptions;
    use crate::model::Properties;
    use crate::test::{TestEnv, MONTHS_DB};

    #[tokio::test]
    async fn test_list_names_in_store_order() {
        let env = TestEnv::new();
        for month in ["März", "Januar", "Februar"] {
            env.add_month(month);
        }
        env.store().add_page(MONTHS_DB, Properties::new());

        let names = env.ledger().list_names(Some(MONTHS_DB)).await;

        assert_eq!(
            names.found(),
            Some(vec![
                "März".to_string(),
                "Januar".to_string(),
                "Februar".to_string()
            ])
        );
    }

    #[tokio::test]
    async fn test_list_names_unset_database_makes_no_call() {
        let env = TestEnv::new();

        let names = env.ledger().list_names(None).await;

        assert!(names.is_missing());
        assert!(names.unwrap_or_default().is_empty());
        assert_eq!(env.store().query_calls(), 0);
    }

    #[tokio::test]
    async fn test_list_names_failure_is_empty() {
        let env = TestEnv::new();
        env.add_month("März");
        env.store().fail_queries(true);

        let names = env.ledger().list_names(Some(MONTHS_DB)).await;

        assert!(names.is_unavailable());
        assert!(names.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn test_options() {
        let env = TestEnv::new();
        env.add_category("Lebensmittel");
        env.add_category("Haushalt");
        env.add_month("April");

        let options = env.ledger().options().await;

        assert_eq!(
            options,
            FormOptions {
                categories: vec!["Lebensmittel".to_string(), "Haushalt".to_string()],
                months: vec!["April".to_string()],
            }
        );
    }

    #[tokio::test]
    async fn test_options_without_optional_databases() {
        let env = TestEnv::with_databases(None, None);

        let options = env.ledger().options().await;

        assert_eq!(options, FormOptions::default());
        assert_eq!(env.store().query_calls(), 0);
    }
}
