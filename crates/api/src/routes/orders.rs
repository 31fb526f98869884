//! Order endpoints: CRUD plus the submit and cancel workflows.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::Utc;
use common::{Email, Isbn, OrderId};
use domain::{Money, NewOrder, Order};
use gateways::{CatalogGateway, DirectoryGateway, InventoryGateway, PaymentGateway};
use orchestrator::FulfillmentService;
use order_store::OrderStore;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<C, D, I, P, S> {
    pub service: FulfillmentService<C, D, I, P, S>,
}

// -- Request types --

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub email: String,
    pub isbn: String,
    pub quantity: u32,
    pub price_cents: i64,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct UpdateOrderRequest {
    pub id: i64,
    pub email: String,
    pub isbn: String,
    pub quantity: u32,
    pub price_cents: i64,
    pub completed: bool,
}

/// Body for submit and cancel: the order is located by `(email, isbn)`
/// and the quantity is adopted before the workflow runs.
#[derive(Deserialize)]
pub struct OrderKeyRequest {
    pub email: String,
    pub isbn: String,
    pub quantity: u32,
}

#[derive(Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

#[derive(Deserialize)]
pub struct IsbnQuery {
    pub isbn: String,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: i64,
    pub email: String,
    pub isbn: String,
    pub quantity: u32,
    pub price_cents: i64,
    pub completed: bool,
    pub created_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id.as_i64(),
            email: order.email.to_string(),
            isbn: order.isbn.to_string(),
            quantity: order.quantity,
            price_cents: order.price.cents(),
            completed: order.completed,
            created_at: order.created_at.to_rfc3339(),
        }
    }
}

fn to_responses(orders: Vec<Order>) -> Vec<OrderResponse> {
    orders.into_iter().map(OrderResponse::from).collect()
}

// -- Handlers --

/// POST /orders — create an order; a request marked completed runs the
/// buy workflow before it returns.
#[tracing::instrument(skip(state, req))]
pub async fn create<C, D, I, P, S>(
    State(state): State<Arc<AppState<C, D, I, P, S>>>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError>
where
    C: CatalogGateway + 'static,
    D: DirectoryGateway + 'static,
    I: InventoryGateway + 'static,
    P: PaymentGateway + 'static,
    S: OrderStore + 'static,
{
    let order = state
        .service
        .create_order(NewOrder {
            email: Email::new(req.email),
            isbn: Isbn::new(req.isbn),
            quantity: req.quantity,
            price: Money::from_cents(req.price_cents),
            completed: req.completed,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(order.into())))
}

/// GET /orders — list all orders, sorted by (email, creation time).
#[tracing::instrument(skip(state))]
pub async fn list<C, D, I, P, S>(
    State(state): State<Arc<AppState<C, D, I, P, S>>>,
) -> Result<Json<Vec<OrderResponse>>, ApiError>
where
    C: CatalogGateway + 'static,
    D: DirectoryGateway + 'static,
    I: InventoryGateway + 'static,
    P: PaymentGateway + 'static,
    S: OrderStore + 'static,
{
    let orders = state.service.list_orders().await?;
    Ok(Json(to_responses(orders)))
}

/// GET /orders/{id} — load an order by id.
#[tracing::instrument(skip(state))]
pub async fn get<C, D, I, P, S>(
    State(state): State<Arc<AppState<C, D, I, P, S>>>,
    Path(id): Path<i64>,
) -> Result<Json<OrderResponse>, ApiError>
where
    C: CatalogGateway + 'static,
    D: DirectoryGateway + 'static,
    I: InventoryGateway + 'static,
    P: PaymentGateway + 'static,
    S: OrderStore + 'static,
{
    let order = state.service.get_order(OrderId::new(id)).await?;
    Ok(Json(order.into()))
}

/// GET /orders/findByEmail?email= — a client's orders.
#[tracing::instrument(skip(state, query), fields(email = %query.email))]
pub async fn find_by_email<C, D, I, P, S>(
    State(state): State<Arc<AppState<C, D, I, P, S>>>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<OrderResponse>>, ApiError>
where
    C: CatalogGateway + 'static,
    D: DirectoryGateway + 'static,
    I: InventoryGateway + 'static,
    P: PaymentGateway + 'static,
    S: OrderStore + 'static,
{
    let orders = state
        .service
        .orders_for_client(&Email::new(query.email))
        .await?;
    Ok(Json(to_responses(orders)))
}

/// GET /orders/findByISBN?isbn= — a book's orders.
#[tracing::instrument(skip(state, query), fields(isbn = %query.isbn))]
pub async fn find_by_isbn<C, D, I, P, S>(
    State(state): State<Arc<AppState<C, D, I, P, S>>>,
    Query(query): Query<IsbnQuery>,
) -> Result<Json<Vec<OrderResponse>>, ApiError>
where
    C: CatalogGateway + 'static,
    D: DirectoryGateway + 'static,
    I: InventoryGateway + 'static,
    P: PaymentGateway + 'static,
    S: OrderStore + 'static,
{
    let orders = state
        .service
        .orders_for_book(&Isbn::new(query.isbn))
        .await?;
    Ok(Json(to_responses(orders)))
}

/// PUT /orders/{id} — update an order, running the buy or return
/// workflow if the update crosses the fulfillment boundary.
#[tracing::instrument(skip(state, req))]
pub async fn update<C, D, I, P, S>(
    State(state): State<Arc<AppState<C, D, I, P, S>>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateOrderRequest>,
) -> Result<Json<OrderResponse>, ApiError>
where
    C: CatalogGateway + 'static,
    D: DirectoryGateway + 'static,
    I: InventoryGateway + 'static,
    P: PaymentGateway + 'static,
    S: OrderStore + 'static,
{
    // created_at is a placeholder here; the store keeps the stored one.
    let order = Order {
        id: OrderId::new(req.id),
        email: Email::new(req.email),
        isbn: Isbn::new(req.isbn),
        quantity: req.quantity,
        price: Money::from_cents(req.price_cents),
        completed: req.completed,
        created_at: Utc::now(),
    };

    let updated = state.service.update_order(OrderId::new(id), order).await?;
    Ok(Json(updated.into()))
}

/// POST /orders/submit — fulfill the pending order for (email, isbn).
#[tracing::instrument(skip(state, req), fields(email = %req.email, isbn = %req.isbn))]
pub async fn submit<C, D, I, P, S>(
    State(state): State<Arc<AppState<C, D, I, P, S>>>,
    Json(req): Json<OrderKeyRequest>,
) -> Result<Json<OrderResponse>, ApiError>
where
    C: CatalogGateway + 'static,
    D: DirectoryGateway + 'static,
    I: InventoryGateway + 'static,
    P: PaymentGateway + 'static,
    S: OrderStore + 'static,
{
    let order = state
        .service
        .submit_order(&Email::new(req.email), &Isbn::new(req.isbn), req.quantity)
        .await?;
    Ok(Json(order.into()))
}

/// POST /orders/cancel — unwind the fulfilled order for (email, isbn).
#[tracing::instrument(skip(state, req), fields(email = %req.email, isbn = %req.isbn))]
pub async fn cancel<C, D, I, P, S>(
    State(state): State<Arc<AppState<C, D, I, P, S>>>,
    Json(req): Json<OrderKeyRequest>,
) -> Result<Json<OrderResponse>, ApiError>
where
    C: CatalogGateway + 'static,
    D: DirectoryGateway + 'static,
    I: InventoryGateway + 'static,
    P: PaymentGateway + 'static,
    S: OrderStore + 'static,
{
    let order = state
        .service
        .cancel_order(&Email::new(req.email), &Isbn::new(req.isbn), req.quantity)
        .await?;
    Ok(Json(order.into()))
}

/// DELETE /orders/{id} — delete an order.
#[tracing::instrument(skip(state))]
pub async fn delete<C, D, I, P, S>(
    State(state): State<Arc<AppState<C, D, I, P, S>>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
    C: CatalogGateway + 'static,
    D: DirectoryGateway + 'static,
    I: InventoryGateway + 'static,
    P: PaymentGateway + 'static,
    S: OrderStore + 'static,
{
    state.service.delete_order(OrderId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /orders/delete-all — delete every order.
#[tracing::instrument(skip(state))]
pub async fn delete_all<C, D, I, P, S>(
    State(state): State<Arc<AppState<C, D, I, P, S>>>,
) -> Result<StatusCode, ApiError>
where
    C: CatalogGateway + 'static,
    D: DirectoryGateway + 'static,
    I: InventoryGateway + 'static,
    P: PaymentGateway + 'static,
    S: OrderStore + 'static,
{
    state.service.delete_all_orders().await?;
    Ok(StatusCode::NO_CONTENT)
}
