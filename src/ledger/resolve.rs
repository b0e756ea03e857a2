use crate::ledger::{Ledger, Lookup};
use crate::model::{Filter, PageId, Query, NAME};
use tracing::{debug, warn};

impl Ledger {
    /// Finds the page in `database_id` whose `Name` title equals `name` exactly.
    ///
    /// Returns `Lookup::Missing` without contacting the store when `name` is empty or `database_id`
    /// is unset. At most one result is requested; when several pages share the name, the first one
    /// the store returns wins and a warning is logged.
    pub async fn resolve(&self, database_id: Option<&str>, name: &str) -> Lookup<PageId> {
        let Some(database_id) = database_id else {
            debug!("Cannot resolve '{name}', the database is not configured");
            return Lookup::Missing;
        };
        if name.is_empty() {
            return Lookup::Missing;
        }

        let query = Query::filtered(Filter::title_equals(NAME, name)).with_page_size(1);
        let response = match self.store().query(database_id, &query).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Unable to resolve '{name}' in database {database_id}: {e:#}");
                return Lookup::Unavailable(e);
            }
        };

        if response.has_more {
            warn!(
                "More than one page in database {database_id} is named '{name}', using the first \
                one returned"
            );
        }
        match response.results.into_iter().next() {
            Some(page) => {
                debug!("Resolved '{name}' to {}", page.id());
                Lookup::Found(page.id().clone())
            }
            None => {
                debug!("No page named '{name}' in database {database_id}");
                Lookup::Missing
            }
        }
    }
}
