use crate::ledger::{Ledger, Lookup};
use crate::model::{Expense, PageId};
use crate::Result;
use anyhow::Context;
use tracing::info;

impl Ledger {
    /// Records `expense` as a new page in the transactions database and returns its ID.
    ///
    /// The category and month names are resolved first. A name that does not resolve, or that
    /// cannot be resolved because the store is unreachable, leaves its relation unset; the page is
    /// still created. The plain-text category copy is written whenever a category was given.
    ///
    /// # Errors
    /// - Returns an error if the page could not be created. Nothing is retried.
    pub async fn record(&self, expense: &Expense) -> Result<PageId> {
        let category_id = match expense.category() {
            Some(name) => self.resolve_for_relation(self.config().categories_db(), name).await,
            None => None,
        };
        let month_id = match expense.month() {
            Some(name) => self.resolve_for_relation(self.config().months_db(), name).await,
            None => None,
        };

        let properties = expense.properties(category_id.as_ref(), month_id.as_ref());
        let page = self
            .store()
            .create_page(self.config().transactions_db(), properties)
            .await
            .with_context(|| format!("Unable to record the expense '{}'", expense.name))?;

        info!(
            "Recorded '{}' ({}) on {} as {}",
            expense.name,
            expense.amount,
            expense.date,
            page.id()
        );
        Ok(page.id().clone())
    }

    async fn resolve_for_relation(&self, database_id: Option<&str>, name: &str) -> Option<PageId> {
        match self.resolve(database_id, name).await {
            Lookup::Found(id) => Some(id),
            Lookup::Missing => {
                info!("No page named '{name}' to link, the relation is left empty");
                None
            }
            // The resolver has already logged the failure.
            Lookup::Unavailable(_) => None,
        }
    }
}
