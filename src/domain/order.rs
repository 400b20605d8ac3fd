use super::product::Product;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An order resolved for processing: its id plus the products it contains.
#[derive(Debug, PartialEq, Clone)]
pub struct Order {
    pub id: u64,
    /// Each product appears once, ordered by product id.
    pub items: Vec<Product>,
}

/// The persisted shape of an order: membership only, products live in the product store.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct OrderRecord {
    pub id: u64,
    pub product_ids: BTreeSet<u64>,
}

impl OrderRecord {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            product_ids: BTreeSet::new(),
        }
    }

    pub fn with_products(id: u64, product_ids: impl IntoIterator<Item = u64>) -> Self {
        Self {
            id,
            product_ids: product_ids.into_iter().collect(),
        }
    }
}

/// A single `order_id,product_id` row from an orders seed file.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
pub struct OrderLine {
    pub order_id: u64,
    pub product_id: u64,
}

/// Folds seed rows into order records, merging repeated memberships.
pub fn group_order_lines(lines: impl IntoIterator<Item = OrderLine>) -> Vec<OrderRecord> {
    let mut records: Vec<OrderRecord> = Vec::new();
    for line in lines {
        match records.iter_mut().find(|r| r.id == line.order_id) {
            Some(record) => {
                record.product_ids.insert(line.product_id);
            }
            None => records.push(OrderRecord::with_products(line.order_id, [line.product_id])),
        }
    }
    records
}
