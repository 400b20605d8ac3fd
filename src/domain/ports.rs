use super::order::{Order, OrderRecord};
use super::product::{Product, ProductRecord};
use crate::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Persists the full product state, assigning an id to new products.
    async fn save(&self, product: Product) -> Result<Product>;
    async fn find_by_id(&self, product_id: u64) -> Result<Option<Product>>;
    /// Writes a raw row without validating it.
    async fn import(&self, record: ProductRecord) -> Result<()>;
    async fn all(&self) -> Result<Vec<ProductRecord>>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Loads an order with its products resolved and validated.
    async fn find_by_id(&self, order_id: u64) -> Result<Option<Order>>;
    async fn import(&self, record: OrderRecord) -> Result<()>;
}

#[async_trait]
pub trait NotificationGateway: Send + Sync {
    async fn send_delay_notification(&self, lead_time: u32, product_name: &str) -> Result<()>;
    async fn send_out_of_stock_notification(&self, product_name: &str) -> Result<()>;
    async fn send_expiration_notification(
        &self,
        product_name: &str,
        expiry_date: NaiveDate,
    ) -> Result<()>;
}

/// Source of "today" for every date comparison the purchase rules make.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

pub type ProductStoreBox = Box<dyn ProductStore>;
pub type OrderStoreBox = Box<dyn OrderStore>;
pub type NotificationGatewayBox = Box<dyn NotificationGateway>;
pub type ClockBox = Box<dyn Clock>;
