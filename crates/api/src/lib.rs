//! HTTP API server with observability for the order fulfillment system.
//!
//! Provides the REST surface over the fulfillment orchestrator, with
//! structured logging (tracing) and Prometheus metrics. All order
//! endpoints live under `/api/v1`.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post, put};
use gateways::{CatalogGateway, DirectoryGateway, InventoryGateway, PaymentGateway};
use metrics_exporter_prometheus::PrometheusHandle;
use order_store::OrderStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<C, D, I, P, S>(
    state: Arc<AppState<C, D, I, P, S>>,
    metrics_handle: PrometheusHandle,
) -> Router
where
    C: CatalogGateway + 'static,
    D: DirectoryGateway + 'static,
    I: InventoryGateway + 'static,
    P: PaymentGateway + 'static,
    S: OrderStore + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    let api_router = Router::new()
        .route("/orders", get(routes::orders::list::<C, D, I, P, S>))
        .route("/orders", post(routes::orders::create::<C, D, I, P, S>))
        .route(
            "/orders/findByEmail",
            get(routes::orders::find_by_email::<C, D, I, P, S>),
        )
        .route(
            "/orders/findByISBN",
            get(routes::orders::find_by_isbn::<C, D, I, P, S>),
        )
        .route(
            "/orders/submit",
            post(routes::orders::submit::<C, D, I, P, S>),
        )
        .route(
            "/orders/cancel",
            post(routes::orders::cancel::<C, D, I, P, S>),
        )
        .route(
            "/orders/delete-all",
            delete(routes::orders::delete_all::<C, D, I, P, S>),
        )
        .route("/orders/{id}", get(routes::orders::get::<C, D, I, P, S>))
        .route("/orders/{id}", put(routes::orders::update::<C, D, I, P, S>))
        .route(
            "/orders/{id}",
            delete(routes::orders::delete::<C, D, I, P, S>),
        )
        .route("/version", get(routes::version::get::<C, D, I, P, S>))
        .with_state(state);

    Router::new()
        .route("/health", get(routes::health::check))
        .nest("/api/v1", api_router)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
