//! The HTTP server: routes, request tracing and graceful shutdown.

pub mod endpoints;
mod error;
mod handlers;

use crate::ledger::Ledger;
use crate::Result;
use anyhow::Context;
use axum::extract::{MatchedPath, Request};
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

pub use error::ServerError;

/// Returns a router with all routes of the service.
pub fn build_router(ledger: Ledger) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(handlers::get_root))
        .route(endpoints::OPTIONS, get(handlers::get_options))
        .route(endpoints::TRACKED_SUM, get(handlers::get_tracked_sum))
        .route(endpoints::ADD, post(handlers::post_add))
        .with_state(ledger)
}

/// Binds `addr` and serves the router until Ctrl+C or SIGTERM is received.
pub async fn serve(ledger: Ledger, addr: SocketAddr) -> Result<()> {
    let router = add_tracing_layer(build_router(ledger));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Unable to listen on {addr}"))?;
    info!("HTTP server listening on {addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("The HTTP server stopped unexpectedly")
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Write failures are logged by `ServerError`.
        .on_failure(());

    router.layer(tracing_layer)
}

/// Waits for either the Ctrl+C or the terminate signal, whichever comes first.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Unable to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(e) => {
                tracing::error!("Unable to listen for the terminate signal: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => debug!("Received ctrl+c signal."),
        _ = terminate => debug!("Received terminate signal."),
    }
    info!("Shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{TestEnv, TRANSACTIONS_DB};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use super::handlers::SumResponse;
    use rust_decimal_macros::dec;
    use serde_json::{json, Value};

    fn server(env: &TestEnv) -> TestServer {
        TestServer::new(build_router(env.ledger().clone()))
    }

    #[tokio::test]
    async fn test_root() {
        let env = TestEnv::new();
        let response = server(&env).get(endpoints::ROOT).await;
        response.assert_status_ok();
        assert!(response.json::<Value>()["message"].is_string());
    }

    #[tokio::test]
    async fn test_options() {
        let env = TestEnv::new();
        env.add_category("Lebensmittel");
        env.add_month("März");
        env.add_month("April");

        let response = server(&env).get(endpoints::OPTIONS).await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "categories": ["Lebensmittel"],
            "months": ["März", "April"]
        }));
    }

    #[tokio::test]
    async fn test_options_when_store_fails() {
        let env = TestEnv::new();
        env.add_category("Lebensmittel");
        env.store().fail_queries(true);

        let response = server(&env).get(endpoints::OPTIONS).await;

        response.assert_status_ok();
        response.assert_json(&json!({"categories": [], "months": []}));
    }

    #[tokio::test]
    async fn test_tracked_sum() {
        let env = TestEnv::new();
        let groceries = env.add_category("Lebensmittel");
        let household = env.add_category("Haushalt");
        let march = env.add_month("März");
        env.add_expense("Migros", dec!(10.00), Some(&groceries), Some(&march));
        env.add_expense("Coop", dec!(5.50), Some(&groceries), Some(&march));
        env.add_expense("IKEA", dec!(100.00), Some(&household), Some(&march));

        let response = server(&env)
            .get(endpoints::TRACKED_SUM)
            .add_query_param("month", "März")
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({"sum": 15.5, "month": "März"}));
    }

    #[tokio::test]
    async fn test_tracked_sum_german_parameter() {
        let env = TestEnv::new();
        let groceries = env.add_category("Lebensmittel");
        let april = env.add_month("April");
        env.add_expense("Lidl", dec!(33.85), Some(&groceries), Some(&april));

        let response = server(&env)
            .get(endpoints::TRACKED_SUM)
            .add_query_param("monat", "April")
            .await;

        let body = response.json::<SumResponse>();
        assert_eq!(
            body,
            SumResponse {
                sum: dec!(33.85).into(),
                month: "April".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_tracked_sum_without_month_is_zero() {
        let env = TestEnv::new();

        let response = server(&env).get(endpoints::TRACKED_SUM).await;

        response.assert_status_ok();
        response.assert_json(&json!({"sum": 0.0, "month": ""}));
        assert_eq!(env.store().query_calls(), 0);
    }

    #[tokio::test]
    async fn test_tracked_sum_when_store_fails_is_zero() {
        let env = TestEnv::new();
        env.add_category("Lebensmittel");
        env.add_month("März");
        env.store().fail_queries(true);

        let response = server(&env)
            .get(endpoints::TRACKED_SUM)
            .add_query_param("month", "März")
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({"sum": 0.0, "month": "März"}));
    }

    #[tokio::test]
    async fn test_add() {
        let env = TestEnv::new();
        env.add_category("Lebensmittel");
        env.add_month("März");

        let response = server(&env)
            .post(endpoints::ADD)
            .json(&json!({
                "name": "Migros",
                "amount": 23.45,
                "date": "2025-03-14",
                "category": "Lebensmittel",
                "month": "März"
            }))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({"status": "ok"}));
        assert_eq!(env.store().pages(TRANSACTIONS_DB).len(), 1);
    }

    #[tokio::test]
    async fn test_add_german_fields() {
        let env = TestEnv::new();

        let response = server(&env)
            .post(endpoints::ADD)
            .json(&json!({
                "name": "Coop",
                "betrag": 5.5,
                "datum": "2025-04-01",
                "kategorie": null,
                "monat": null,
                "notiz": "Brot"
            }))
            .await;

        response.assert_status_ok();
        assert_eq!(env.store().pages(TRANSACTIONS_DB).len(), 1);
    }

    #[tokio::test]
    async fn test_add_write_failure_is_500() {
        let env = TestEnv::new();
        env.store().fail_creates(true);

        let response = server(&env)
            .post(endpoints::ADD)
            .json(&json!({"name": "Migros", "amount": 1, "date": "2025-03-14"}))
            .expect_failure()
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body = response.json::<Value>();
        assert!(body["detail"].as_str().unwrap().contains("Migros"));
    }

    #[tokio::test]
    async fn test_add_malformed_body_is_rejected() {
        let env = TestEnv::new();

        let response = server(&env)
            .post(endpoints::ADD)
            .json(&json!({"name": "Migros", "amount": "viel"}))
            .expect_failure()
            .await;

        assert!(response.status_code().is_client_error());
        assert_eq!(env.store().create_calls(), 0);
    }
}
