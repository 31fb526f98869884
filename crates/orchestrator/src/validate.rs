//! The validation gate.
//!
//! Every check here is a pure read against a gateway: idempotent,
//! safely repeatable, and run before any mutating side effect.

use common::{Email, Isbn};
use domain::{Book, Client, StorageRecord};
use gateways::{CatalogGateway, DirectoryGateway, InventoryGateway};

use crate::error::{FulfillmentError, Result};

/// Confirms the client exists in the directory.
pub(crate) async fn verify_client<D: DirectoryGateway>(
    directory: &D,
    email: &Email,
) -> Result<Client> {
    directory
        .lookup(email)
        .await?
        .ok_or_else(|| FulfillmentError::ClientNotFound(email.clone()))
}

/// Confirms the book exists and is sellable, returning the current
/// catalog projection.
pub(crate) async fn verify_book<C: CatalogGateway>(catalog: &C, isbn: &Isbn) -> Result<Book> {
    let book = catalog
        .lookup(isbn)
        .await?
        .ok_or_else(|| FulfillmentError::BookNotFound(isbn.clone()))?;
    if !book.published {
        return Err(FulfillmentError::BookNotSellable(isbn.clone()));
    }
    Ok(book)
}

/// Confirms the inventory can cover the requested quantity, returning
/// the current storage record.
pub(crate) async fn verify_storage<I: InventoryGateway>(
    inventory: &I,
    isbn: &Isbn,
    quantity: u32,
) -> Result<StorageRecord> {
    inventory
        .lookup(isbn)
        .await?
        .filter(|record| record.quantity >= quantity as i64)
        .ok_or_else(|| FulfillmentError::InsufficientResources { isbn: isbn.clone() })
}

/// Rejects a non-positive quantity before any gateway is consulted.
pub(crate) fn verify_quantity(quantity: u32) -> Result<()> {
    if quantity == 0 {
        return Err(FulfillmentError::BadRequest(
            "Order quantity must be positive".to_string(),
        ));
    }
    Ok(())
}
