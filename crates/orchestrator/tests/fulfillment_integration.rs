//! Integration tests for the order fulfillment workflows.

use common::{Email, Isbn, OrderId};
use domain::{Book, Money, NewOrder};
use gateways::{
    InMemoryCatalogGateway, InMemoryDirectoryGateway, InMemoryInventoryGateway,
    InMemoryPaymentGateway,
};
use orchestrator::{FulfillmentError, FulfillmentService};
use order_store::InMemoryOrderStore;

type TestService = FulfillmentService<
    InMemoryCatalogGateway,
    InMemoryDirectoryGateway,
    InMemoryInventoryGateway,
    InMemoryPaymentGateway,
    InMemoryOrderStore,
>;

struct TestHarness {
    service: TestService,
    catalog: InMemoryCatalogGateway,
    directory: InMemoryDirectoryGateway,
    inventory: InMemoryInventoryGateway,
    payment: InMemoryPaymentGateway,
}

impl TestHarness {
    fn new() -> Self {
        let catalog = InMemoryCatalogGateway::new();
        let directory = InMemoryDirectoryGateway::new();
        let inventory = InMemoryInventoryGateway::new();
        let payment = InMemoryPaymentGateway::new();
        let store = InMemoryOrderStore::new();

        let service = FulfillmentService::new(
            catalog.clone(),
            directory.clone(),
            inventory.clone(),
            payment.clone(),
            store,
        );

        Self {
            service,
            catalog,
            directory,
            inventory,
            payment,
        }
    }

    fn stock_book(&self, isbn: &str, price_dollars: i64, quantity: i64) {
        self.catalog.put_book(Book {
            isbn: Isbn::new(isbn),
            price: Money::from_dollars(price_dollars),
            published: true,
        });
        self.inventory.set_quantity(Isbn::new(isbn), quantity);
    }

    fn register_client(&self, email: &str) {
        self.directory.add_client(Email::new(email));
    }

    fn order_request(&self, email: &str, isbn: &str, quantity: u32) -> NewOrder {
        NewOrder {
            email: Email::new(email),
            isbn: Isbn::new(isbn),
            quantity,
            price: Money::from_dollars(10),
            completed: false,
        }
    }
}

#[tokio::test]
async fn order_cycles_between_pending_and_fulfilled_repeatedly() {
    let h = TestHarness::new();
    h.stock_book("ISBN-1", 10, 5);
    h.register_client("reader@example.com");

    let email = Email::new("reader@example.com");
    let isbn = Isbn::new("ISBN-1");

    h.service
        .create_order(h.order_request("reader@example.com", "ISBN-1", 2))
        .await
        .unwrap();

    // Buy, return, buy again: there is no terminal phase.
    let fulfilled = h.service.submit_order(&email, &isbn, 2).await.unwrap();
    assert!(fulfilled.completed);
    assert_eq!(h.inventory.quantity_of(&isbn), Some(3));

    let pending = h.service.cancel_order(&email, &isbn, 2).await.unwrap();
    assert!(!pending.completed);
    assert_eq!(h.inventory.quantity_of(&isbn), Some(5));

    let fulfilled_again = h.service.submit_order(&email, &isbn, 3).await.unwrap();
    assert!(fulfilled_again.completed);
    assert_eq!(fulfilled_again.quantity, 3);
    assert_eq!(h.inventory.quantity_of(&isbn), Some(2));

    // Each fulfillment captured a fresh payment; the return refunded
    // nothing.
    assert_eq!(h.payment.capture_count(), 2);
}

#[tokio::test]
async fn buy_then_return_restores_the_pre_buy_stock_level() {
    let h = TestHarness::new();
    h.stock_book("ISBN-1", 10, 7);
    h.register_client("reader@example.com");

    let email = Email::new("reader@example.com");
    let isbn = Isbn::new("ISBN-1");

    h.service
        .create_order(h.order_request("reader@example.com", "ISBN-1", 4))
        .await
        .unwrap();
    h.service.submit_order(&email, &isbn, 4).await.unwrap();
    assert_eq!(h.inventory.quantity_of(&isbn), Some(3));

    h.service.cancel_order(&email, &isbn, 4).await.unwrap();
    assert_eq!(h.inventory.quantity_of(&isbn), Some(7));
}

#[tokio::test]
async fn fulfilled_is_only_observable_with_both_effects_recorded() {
    let h = TestHarness::new();
    h.stock_book("ISBN-1", 10, 5);
    h.register_client("reader@example.com");

    let email = Email::new("reader@example.com");
    let isbn = Isbn::new("ISBN-1");

    h.service
        .create_order(h.order_request("reader@example.com", "ISBN-1", 2))
        .await
        .unwrap();
    h.payment.set_decline("card expired");

    let result = h.service.submit_order(&email, &isbn, 2).await;
    assert!(matches!(result, Err(FulfillmentError::Payment(_))));

    // Neither effect is outstanding: the decrement was compensated and
    // no order is fulfilled.
    assert_eq!(h.inventory.quantity_of(&isbn), Some(5));
    assert_eq!(h.payment.capture_count(), 0);
    let orders = h.service.orders_for_client(&email).await.unwrap();
    assert!(orders.iter().all(|o| !o.completed));
}

#[tokio::test]
async fn submit_for_an_unknown_order_is_not_found() {
    let h = TestHarness::new();
    h.stock_book("ISBN-1", 10, 5);
    h.register_client("reader@example.com");

    let result = h
        .service
        .submit_order(&Email::new("reader@example.com"), &Isbn::new("ISBN-1"), 1)
        .await;
    assert!(matches!(result, Err(FulfillmentError::OrderNotFound(_))));
}

#[tokio::test]
async fn validation_failures_abort_before_any_mutation() {
    let h = TestHarness::new();
    h.stock_book("ISBN-1", 10, 1);
    h.register_client("reader@example.com");

    // Unknown client
    let result = h
        .service
        .create_order(h.order_request("stranger@example.com", "ISBN-1", 1))
        .await;
    assert!(matches!(result, Err(FulfillmentError::ClientNotFound(_))));

    // Unknown book
    let result = h
        .service
        .create_order(h.order_request("reader@example.com", "ISBN-9", 1))
        .await;
    assert!(matches!(result, Err(FulfillmentError::BookNotFound(_))));

    // Not enough stock
    let result = h
        .service
        .create_order(h.order_request("reader@example.com", "ISBN-1", 2))
        .await;
    assert!(matches!(
        result,
        Err(FulfillmentError::InsufficientResources { .. })
    ));

    assert!(h.inventory.ops().is_empty());
    assert_eq!(h.payment.capture_count(), 0);
    assert_eq!(h.service.order_count().await.unwrap(), 0);
}

#[tokio::test]
async fn unpublished_books_are_not_sellable() {
    let h = TestHarness::new();
    h.catalog.put_book(Book {
        isbn: Isbn::new("ISBN-1"),
        price: Money::from_dollars(10),
        published: false,
    });
    h.inventory.set_quantity(Isbn::new("ISBN-1"), 5);
    h.register_client("reader@example.com");

    let result = h
        .service
        .create_order(h.order_request("reader@example.com", "ISBN-1", 1))
        .await;
    assert!(matches!(result, Err(FulfillmentError::BookNotSellable(_))));
}

#[tokio::test]
async fn listings_are_ordered_and_scoped() {
    let h = TestHarness::new();
    h.stock_book("ISBN-1", 10, 10);
    h.stock_book("ISBN-2", 10, 10);
    h.register_client("a@example.com");
    h.register_client("b@example.com");

    h.service
        .create_order(h.order_request("b@example.com", "ISBN-1", 1))
        .await
        .unwrap();
    h.service
        .create_order(h.order_request("a@example.com", "ISBN-2", 1))
        .await
        .unwrap();
    h.service
        .create_order(h.order_request("a@example.com", "ISBN-1", 1))
        .await
        .unwrap();

    let all = h.service.list_orders().await.unwrap();
    let emails: Vec<_> = all.iter().map(|o| o.email.as_str().to_string()).collect();
    assert_eq!(emails, vec!["a@example.com", "a@example.com", "b@example.com"]);

    let for_client = h
        .service
        .orders_for_client(&Email::new("a@example.com"))
        .await
        .unwrap();
    assert_eq!(for_client.len(), 2);

    let for_book = h
        .service
        .orders_for_book(&Isbn::new("ISBN-1"))
        .await
        .unwrap();
    assert_eq!(for_book.len(), 2);
}

#[tokio::test]
async fn listing_queries_validate_their_subject_first() {
    let h = TestHarness::new();
    h.stock_book("ISBN-1", 10, 5);
    h.register_client("reader@example.com");

    let result = h
        .service
        .orders_for_client(&Email::new("stranger@example.com"))
        .await;
    assert!(matches!(result, Err(FulfillmentError::ClientNotFound(_))));

    let result = h.service.orders_for_book(&Isbn::new("ISBN-9")).await;
    assert!(matches!(result, Err(FulfillmentError::BookNotFound(_))));
}

#[tokio::test]
async fn delete_operations() {
    let h = TestHarness::new();
    h.stock_book("ISBN-1", 10, 10);
    h.register_client("a@example.com");
    h.register_client("b@example.com");

    let order = h
        .service
        .create_order(h.order_request("a@example.com", "ISBN-1", 1))
        .await
        .unwrap();
    h.service
        .create_order(h.order_request("b@example.com", "ISBN-1", 1))
        .await
        .unwrap();

    h.service.delete_order(order.id).await.unwrap();
    assert_eq!(h.service.order_count().await.unwrap(), 1);

    let result = h.service.delete_order(OrderId::new(999)).await;
    assert!(matches!(result, Err(FulfillmentError::OrderNotFound(_))));

    h.service.delete_all_orders().await.unwrap();
    assert_eq!(h.service.order_count().await.unwrap(), 0);
}

#[tokio::test]
async fn get_order_reports_missing_ids() {
    let h = TestHarness::new();
    let result = h.service.get_order(OrderId::new(1)).await;
    assert!(matches!(result, Err(FulfillmentError::OrderNotFound(_))));
}
