use super::purchase::{PurchaseOutcome, PurchaseRules};
use crate::domain::ports::OrderStoreBox;
use crate::domain::product::ProductType;
use crate::error::{FulfillmentError, Result};
use tokio::sync::Mutex;

/// The main entry point for order fulfillment.
///
/// `OrderProcessor` resolves an order and runs every product it contains through
/// the purchase rule matching its category. Calls are serialized so the
/// check-then-decrement on stock never interleaves between two requests.
pub struct OrderProcessor {
    order_store: OrderStoreBox,
    rules: PurchaseRules,
    in_flight: Mutex<()>,
}

impl OrderProcessor {
    /// Creates a new `OrderProcessor`.
    ///
    /// # Arguments
    ///
    /// * `order_store` - Where orders are loaded from.
    /// * `rules` - The purchase rules, owning the product store, notifier and clock.
    pub fn new(order_store: OrderStoreBox, rules: PurchaseRules) -> Self {
        Self {
            order_store,
            rules,
            in_flight: Mutex::new(()),
        }
    }

    /// Processes every product of the order and returns the order id.
    ///
    /// Fails with `OrderNotFound` for an unknown id, and with `InvalidArgument`
    /// when one of the order's products carries an unknown category. Category
    /// validation happens while loading, so in that case no product is touched.
    /// Any other failure stops processing; products handled before it keep
    /// their changes.
    pub async fn process_order(&self, order_id: u64) -> Result<u64> {
        let _guard = self.in_flight.lock().await;

        let order = self
            .order_store
            .find_by_id(order_id)
            .await?
            .ok_or(FulfillmentError::OrderNotFound(order_id))?;

        tracing::debug!(order_id, items = order.items.len(), "processing order");

        for mut product in order.items {
            let outcome = match product.product_type {
                ProductType::Normal => self.rules.purchase_normal(&mut product).await?,
                ProductType::Seasonal => self.rules.purchase_seasonal(&mut product).await?,
                ProductType::Expirable => self.rules.purchase_expirable(&mut product).await?,
            };

            match outcome {
                PurchaseOutcome::Sold => tracing::info!(
                    order_id,
                    product = %product.name,
                    available = product.available,
                    "product sold"
                ),
                PurchaseOutcome::Unfulfilled => tracing::info!(
                    order_id,
                    product = %product.name,
                    product_type = %product.product_type,
                    "product unfulfilled"
                ),
            }
        }

        Ok(order_id)
    }
}
