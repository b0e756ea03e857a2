use crate::ledger::{FormOptions, Ledger, Lookup};
use crate::model::{Amount, Expense};
use crate::server::error::ServerError;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

pub(super) async fn get_root() -> Json<Value> {
    Json(json!({ "message": "Einkaufs-App-API läuft" }))
}

pub(super) async fn get_options(State(ledger): State<Ledger>) -> Json<FormOptions> {
    Json(ledger.options().await)
}

/// Query parameters of the tracked-category sum.
#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct SumParams {
    #[serde(default, alias = "monat")]
    month: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(super) struct SumResponse {
    pub(super) sum: Amount,
    pub(super) month: String,
}

/// Reports zero whenever no total could be computed, whatever the reason.
pub(super) async fn get_tracked_sum(
    State(ledger): State<Ledger>,
    Query(params): Query<SumParams>,
) -> Json<SumResponse> {
    let sum = match ledger.sum_for_month(&params.month).await {
        Lookup::Found(sum) => sum,
        Lookup::Missing => Amount::ZERO,
        Lookup::Unavailable(e) => {
            debug!("Reporting zero for '{}' after a store failure: {e}", params.month);
            Amount::ZERO
        }
    };
    Json(SumResponse {
        sum,
        month: params.month,
    })
}

pub(super) async fn post_add(
    State(ledger): State<Ledger>,
    Json(expense): Json<Expense>,
) -> Result<Json<Value>, ServerError> {
    ledger.record(&expense).await?;
    Ok(Json(json!({ "status": "ok" })))
}
