//! Shared identifier types used across the order fulfillment crates.

pub mod types;

pub use types::{Email, Isbn, OrderId};
