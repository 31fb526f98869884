//! The order fulfillment service.

use common::{Email, Isbn, OrderId};
use domain::{
    Book, NewOrder, Order, Payment, PriceDecision, StorageRecord, WorkflowAction, reconcile_price,
    required_action,
};
use gateways::{CatalogGateway, DirectoryGateway, GatewayError, InventoryGateway, PaymentGateway};
use order_store::OrderStore;

use crate::error::{FulfillmentError, Result};
use crate::validate;

/// Orchestrates the order lifecycle across the catalog, directory,
/// inventory and payment services and the order store.
///
/// Every operation validates against the gateways before mutating
/// anything, runs the buy or return workflow the transition requires,
/// and is the only writer of the order's `completed` and `price`
/// fields. Gateway calls within a workflow are sequential; each step's
/// input depends on the previous step's confirmed effect.
pub struct FulfillmentService<C, D, I, P, S> {
    catalog: C,
    directory: D,
    inventory: I,
    payment: P,
    store: S,
}

impl<C, D, I, P, S> FulfillmentService<C, D, I, P, S>
where
    C: CatalogGateway,
    D: DirectoryGateway,
    I: InventoryGateway,
    P: PaymentGateway,
    S: OrderStore,
{
    /// Creates a new fulfillment service.
    pub fn new(catalog: C, directory: D, inventory: I, payment: P, store: S) -> Self {
        Self {
            catalog,
            directory,
            inventory,
            payment,
            store,
        }
    }

    /// Creates an order after validating client, book and stock.
    ///
    /// A request arriving already marked complete triggers the buy
    /// workflow immediately; if that workflow fails, the order remains
    /// persisted as pending and the failure is surfaced.
    #[tracing::instrument(skip(self, request), fields(email = %request.email, isbn = %request.isbn))]
    pub async fn create_order(&self, request: NewOrder) -> Result<Order> {
        validate::verify_quantity(request.quantity)?;
        let book = validate::verify_book(&self.catalog, &request.isbn).await?;
        validate::verify_client(&self.directory, &request.email).await?;
        let storage =
            validate::verify_storage(&self.inventory, &request.isbn, request.quantity).await?;

        let fulfill_now = request.completed;
        let mut order = self
            .store
            .insert(NewOrder {
                completed: false,
                ..request
            })
            .await?;
        metrics::counter!("orders_created_total").increment(1);

        if fulfill_now {
            self.buy_from_storage(&storage, &mut order, &book).await?;
            order = self.store.update(&order).await?;
        }
        Ok(order)
    }

    /// Updates an order's fields, running the buy or return workflow if
    /// the update crosses the fulfillment boundary.
    #[tracing::instrument(skip(self, order), fields(order_id = %id))]
    pub async fn update_order(&self, id: OrderId, mut order: Order) -> Result<Order> {
        let existing = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| FulfillmentError::OrderNotFound(format!("Order not found: {id}")))?;
        if order.id != id {
            return Err(FulfillmentError::BadRequest("bad order id".to_string()));
        }
        validate::verify_quantity(order.quantity)?;
        let storage =
            validate::verify_storage(&self.inventory, &order.isbn, order.quantity).await?;

        match required_action(existing.phase(), order.phase()) {
            WorkflowAction::Buy => {
                let book = validate::verify_book(&self.catalog, &order.isbn).await?;
                self.buy_from_storage(&storage, &mut order, &book).await?;
            }
            WorkflowAction::Return => {
                self.return_to_storage(&storage, &mut order).await?;
            }
            WorkflowAction::NoEffect => {}
        }

        Ok(self.store.update(&order).await?)
    }

    /// Fulfills the pending order identified by `(email, isbn)`.
    #[tracing::instrument(skip(self), fields(email = %email, isbn = %isbn))]
    pub async fn submit_order(&self, email: &Email, isbn: &Isbn, quantity: u32) -> Result<Order> {
        let mut order = self
            .store
            .find_by_email_and_isbn(email, isbn)
            .await?
            .ok_or_else(|| {
                FulfillmentError::OrderNotFound(format!(
                    "Order not found, ISBN {isbn} client {email}"
                ))
            })?;
        if order.completed {
            return Err(FulfillmentError::AlreadyCompleted {
                email: email.clone(),
                isbn: isbn.clone(),
            });
        }

        validate::verify_quantity(quantity)?;
        validate::verify_client(&self.directory, email).await?;
        let book = validate::verify_book(&self.catalog, isbn).await?;
        let storage = validate::verify_storage(&self.inventory, isbn, quantity).await?;

        order.quantity = quantity;
        self.buy_from_storage(&storage, &mut order, &book).await?;
        Ok(self.store.update(&order).await?)
    }

    /// Unwinds the fulfilled order identified by `(email, isbn)`.
    #[tracing::instrument(skip(self), fields(email = %email, isbn = %isbn))]
    pub async fn cancel_order(&self, email: &Email, isbn: &Isbn, quantity: u32) -> Result<Order> {
        let mut order = self
            .store
            .find_by_email_and_isbn(email, isbn)
            .await?
            .ok_or_else(|| {
                FulfillmentError::OrderNotFound(format!(
                    "Order not found, ISBN {isbn} client {email}"
                ))
            })?;
        if !order.completed {
            return Err(FulfillmentError::NotCompleted {
                email: email.clone(),
                isbn: isbn.clone(),
            });
        }

        validate::verify_quantity(quantity)?;
        validate::verify_client(&self.directory, email).await?;
        let storage = validate::verify_storage(&self.inventory, isbn, quantity).await?;

        order.quantity = quantity;
        self.return_to_storage(&storage, &mut order).await?;
        Ok(self.store.update(&order).await?)
    }

    /// Retrieves an order by id.
    pub async fn get_order(&self, id: OrderId) -> Result<Order> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| FulfillmentError::OrderNotFound(format!("Order not found: {id}")))
    }

    /// Lists every order, sorted by `(email, created_at)` ascending.
    pub async fn list_orders(&self) -> Result<Vec<Order>> {
        Ok(self.store.list_all().await?)
    }

    /// Lists a client's orders, confirming the client exists first.
    pub async fn orders_for_client(&self, email: &Email) -> Result<Vec<Order>> {
        validate::verify_client(&self.directory, email).await?;
        Ok(self.store.find_by_email(email).await?)
    }

    /// Lists a book's orders, confirming the book exists first.
    pub async fn orders_for_book(&self, isbn: &Isbn) -> Result<Vec<Order>> {
        validate::verify_book(&self.catalog, isbn).await?;
        Ok(self.store.find_by_isbn(isbn).await?)
    }

    /// Deletes an order by id.
    pub async fn delete_order(&self, id: OrderId) -> Result<()> {
        Ok(self.store.delete(id).await?)
    }

    /// Deletes every order.
    pub async fn delete_all_orders(&self) -> Result<()> {
        Ok(self.store.delete_all().await?)
    }

    /// Returns the number of stored orders.
    pub async fn order_count(&self) -> Result<u64> {
        Ok(self.store.count().await?)
    }

    /// Buy workflow: inventory decrement, then payment capture, with
    /// compensation on capture failure.
    ///
    /// On success the order is left fulfilled with its reconciled
    /// price. On failure every speculative change has been reverted,
    /// unless the compensating restock itself failed, which surfaces as
    /// `CompensationFailed`.
    #[tracing::instrument(skip(self, storage, order, book), fields(order_id = %order.id, isbn = %order.isbn))]
    async fn buy_from_storage(
        &self,
        storage: &StorageRecord,
        order: &mut Order,
        book: &Book,
    ) -> Result<()> {
        metrics::counter!("buy_workflows_total").increment(1);
        let started = std::time::Instant::now();

        if storage.isbn != order.isbn {
            return Err(FulfillmentError::BadRequest(format!(
                "Wrong storage record for ISBN: {}",
                order.isbn
            )));
        }

        match reconcile_price(book.price, order.price) {
            PriceDecision::Regression => {
                return Err(FulfillmentError::PurchaseForbidden(format!(
                    "Price changed for book ISBN: {}",
                    book.isbn
                )));
            }
            PriceDecision::Adopt(price) => order.price = price,
            PriceDecision::Unchanged => {}
        }

        // Speculative flip; every failure path below reverts it.
        order.completed = true;

        // The quantity sent is the order's requested quantity; the
        // inventory service interprets it as the adjustment.
        let adjustment = StorageRecord {
            isbn: order.isbn.clone(),
            quantity: order.quantity as i64,
        };

        if let Err(err) = self.inventory.sell(&adjustment).await {
            order.completed = false;
            return Err(match err {
                GatewayError::Rejected(message) => FulfillmentError::PurchaseForbidden(message),
                other => other.into(),
            });
        }

        let request =
            Payment::capture_request(order.id, order.price.squared(), order.email.clone());
        let failure = match self.payment.capture(&request).await {
            Ok(settled) if settled.succeeded => None,
            Ok(settled) => Some(
                settled
                    .message
                    .unwrap_or_else(|| "Payment Failed".to_string()),
            ),
            Err(err) => Some(err.to_string()),
        };

        if let Some(reason) = failure {
            metrics::counter!("buy_compensations_total").increment(1);
            tracing::warn!(order_id = %order.id, %reason, "payment capture failed, releasing inventory");
            // Inventory is released before the fulfilled flag reverts.
            self.inventory.restock(&adjustment).await.map_err(|err| {
                FulfillmentError::CompensationFailed {
                    step: "release_inventory".to_string(),
                    reason: err.to_string(),
                }
            })?;
            order.completed = false;
            return Err(FulfillmentError::Payment(reason));
        }

        metrics::histogram!("buy_workflow_duration_seconds").record(started.elapsed().as_secs_f64());
        Ok(())
    }

    /// Return workflow: restock inventory and unwind the fulfilled
    /// flag. A rejected restock reverts the flag and is reported as a
    /// warning rather than an error; the order simply stays fulfilled.
    /// No refund is issued for the earlier capture.
    #[tracing::instrument(skip(self, storage, order), fields(order_id = %order.id, isbn = %order.isbn))]
    async fn return_to_storage(&self, storage: &StorageRecord, order: &mut Order) -> Result<()> {
        metrics::counter!("return_workflows_total").increment(1);

        if storage.isbn != order.isbn {
            return Err(FulfillmentError::BadRequest(format!(
                "Wrong storage record for ISBN: {}",
                order.isbn
            )));
        }

        order.completed = false;

        let adjustment = StorageRecord {
            isbn: order.isbn.clone(),
            quantity: order.quantity as i64,
        };

        match self.inventory.restock(&adjustment).await {
            Ok(_) => Ok(()),
            Err(GatewayError::Rejected(message)) => {
                metrics::counter!("return_rejections_total").increment(1);
                tracing::warn!(order_id = %order.id, %message, "restock rejected, order remains fulfilled");
                order.completed = true;
                Ok(())
            }
            Err(other) => Err(other.into()),
        }
    }
}
