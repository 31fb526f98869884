//! Service version endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use gateways::{CatalogGateway, DirectoryGateway, InventoryGateway, PaymentGateway};
use order_store::OrderStore;
use serde::Serialize;

use crate::error::ApiError;
use crate::routes::orders::AppState;

#[derive(Serialize)]
pub struct VersionResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub details: String,
}

/// GET /version — service identity plus the stored order count.
pub async fn get<C, D, I, P, S>(
    State(state): State<Arc<AppState<C, D, I, P, S>>>,
) -> Result<Json<VersionResponse>, ApiError>
where
    C: CatalogGateway + 'static,
    D: DirectoryGateway + 'static,
    I: InventoryGateway + 'static,
    P: PaymentGateway + 'static,
    S: OrderStore + 'static,
{
    let count = state.service.order_count().await?;
    Ok(Json(VersionResponse {
        service: "orders",
        version: env!("CARGO_PKG_VERSION"),
        status: "OK",
        details: format!("Count: {count}"),
    }))
}
