//! Domain model for book purchase orders.
//!
//! The order record and the read-only projections of the external
//! collaborators (catalog, directory, inventory, payment) live here,
//! together with the pure pieces of the fulfillment logic: the money
//! arithmetic, the price reconciliation policy, and the order phase
//! transition planner. Everything effectful stays in the orchestrator.

pub mod external;
pub mod money;
pub mod order;
pub mod phase;

pub use external::{Book, Client, Payment, StorageRecord};
pub use money::{Money, PriceDecision, reconcile_price};
pub use order::{NewOrder, Order};
pub use phase::{OrderPhase, WorkflowAction, required_action};
