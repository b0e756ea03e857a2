use crate::api::query_all;
use crate::ledger::{Ledger, Lookup};
use crate::model::{Amount, Filter, AMOUNT, CATEGORY_RELATION, MONTH_RELATION};
use anyhow::anyhow;
use tracing::{debug, info, warn};

impl Ledger {
    /// Sums the amounts of every expense linked to both the month page named `month` and the
    /// tracked category page, rounded to two decimal places.
    ///
    /// Returns `Lookup::Missing` without contacting the store when `month` is empty or one of the
    /// three databases is unset, and after contacting it when either name does not resolve.
    /// Expenses without a numeric amount count as zero.
    pub async fn sum_for_month(&self, month: &str) -> Lookup<Amount> {
        let config = self.config();
        let (Some(categories_db), Some(months_db)) = (config.categories_db(), config.months_db())
        else {
            debug!("Not summing, the categories or months database is not configured");
            return Lookup::Missing;
        };
        if month.is_empty() {
            return Lookup::Missing;
        }
        let category = config.tracked_category();

        let month_id = match self.resolve(Some(months_db), month).await {
            Lookup::Found(id) => id,
            Lookup::Missing => {
                info!("No month named '{month}', reporting a total of zero");
                return Lookup::Missing;
            }
            Lookup::Unavailable(e) => return Lookup::Unavailable(e),
        };
        let category_id = match self.resolve(Some(categories_db), category).await {
            Lookup::Found(id) => id,
            Lookup::Missing => {
                info!("No category named '{category}', reporting a total of zero");
                return Lookup::Missing;
            }
            Lookup::Unavailable(e) => return Lookup::Unavailable(e),
        };

        let filter = Filter::and([
            Filter::relation_contains(MONTH_RELATION, month_id),
            Filter::relation_contains(CATEGORY_RELATION, category_id),
        ]);
        let pages = match query_all(self.store(), config.transactions_db(), Some(filter)).await {
            Ok(pages) => pages,
            Err(e) => {
                warn!("Unable to query the {category} expenses for {month}: {e:#}");
                return Lookup::Unavailable(e);
            }
        };

        let total = pages
            .iter()
            .map(|page| {
                page.number(AMOUNT).unwrap_or_else(|| {
                    debug!("Expense {} has no numeric amount, counting zero", page.id());
                    Amount::ZERO
                })
            })
            .try_fold(Amount::ZERO, Amount::checked_add);
        let Some(total) = total else {
            warn!("The {category} total for {month} is too large to represent");
            return Lookup::Unavailable(anyhow!(
                "The {category} total for {month} overflowed"
            ));
        };
        let total = total.rounded();
        debug!("{category} total for {month} over {} expenses: {total}", pages.len());
        Lookup::Found(total)
    }
}
