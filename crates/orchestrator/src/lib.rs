//! Compensating-transaction orchestration for book purchase orders.
//!
//! This crate makes a sequence of non-transactional remote calls appear
//! atomic to the caller. The buy workflow runs these steps in order:
//!
//! 1. Cross-check the storage record against the order
//! 2. Reconcile the order price with the current catalog price
//! 3. Flip the order to fulfilled speculatively
//! 4. Decrement inventory
//! 5. Capture payment
//!
//! If payment fails after the decrement, the inventory is restored and
//! the fulfilled flag reverted, in that order. A failure of the restore
//! itself leaves order and inventory out of sync and is surfaced as a
//! distinct fatal condition rather than a normal error. The return
//! workflow restocks inventory and unwinds the fulfilled flag; it never
//! refunds the earlier capture.

pub mod error;
pub mod service;
mod validate;

pub use error::FulfillmentError;
pub use service::FulfillmentService;
