//! Domain types and the ports the application layer talks through.

pub mod order;
pub mod ports;
pub mod product;
