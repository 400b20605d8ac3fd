//! Application layer containing the order fulfillment orchestration.
//!
//! `OrderProcessor` is the entry point: it loads an order and hands each product
//! to `PurchaseRules`, which decides between selling a unit and notifying.

pub mod processor;
pub mod purchase;
