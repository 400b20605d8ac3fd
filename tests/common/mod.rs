#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use order_fulfillment::application::processor::OrderProcessor;
use order_fulfillment::application::purchase::PurchaseRules;
use order_fulfillment::domain::order::OrderRecord;
use order_fulfillment::domain::ports::{
    NotificationGateway, NotificationGatewayBox, OrderStore, ProductStore,
};
use order_fulfillment::domain::product::{Product, ProductRecord};
use order_fulfillment::error::{FulfillmentError, Result as FulfillmentResult};
use order_fulfillment::infrastructure::clock::FixedClock;
use order_fulfillment::infrastructure::in_memory::InMemoryCatalog;
use order_fulfillment::infrastructure::notifications::RecordingNotifier;
use std::io::Error;
use std::path::Path;

pub const PRODUCTS_HEADER: [&str; 8] = [
    "id",
    "lead_time",
    "available",
    "type",
    "name",
    "expiry_date",
    "season_start_date",
    "season_end_date",
];

/// The day every test runs against.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

pub fn days_from_today(days: i64) -> NaiveDate {
    today() + chrono::Duration::days(days)
}

/// Records notifications like `RecordingNotifier`, except every delay
/// notification fails.
#[derive(Clone)]
pub struct FailingDelayNotifier {
    recorder: RecordingNotifier,
}

#[async_trait]
impl NotificationGateway for FailingDelayNotifier {
    async fn send_delay_notification(
        &self,
        _lead_time: u32,
        _product_name: &str,
    ) -> FulfillmentResult<()> {
        Err(FulfillmentError::StorageError("mail relay unavailable".to_string()))
    }

    async fn send_out_of_stock_notification(&self, product_name: &str) -> FulfillmentResult<()> {
        self.recorder.send_out_of_stock_notification(product_name).await
    }

    async fn send_expiration_notification(
        &self,
        product_name: &str,
        expiry_date: NaiveDate,
    ) -> FulfillmentResult<()> {
        self.recorder
            .send_expiration_notification(product_name, expiry_date)
            .await
    }
}

pub struct Harness {
    pub catalog: InMemoryCatalog,
    pub notifier: RecordingNotifier,
    pub processor: OrderProcessor,
}

impl Harness {
    pub fn new() -> Self {
        let notifier = RecordingNotifier::new();
        Self::wired(Box::new(notifier.clone()), notifier)
    }

    /// Same as `new`, but delay notifications fail.
    pub fn failing_delays() -> Self {
        let notifier = RecordingNotifier::new();
        let gateway = FailingDelayNotifier {
            recorder: notifier.clone(),
        };
        Self::wired(Box::new(gateway), notifier)
    }

    fn wired(gateway: NotificationGatewayBox, notifier: RecordingNotifier) -> Self {
        let catalog = InMemoryCatalog::new();
        let rules = PurchaseRules::new(
            Box::new(catalog.clone()),
            gateway,
            Box::new(FixedClock::new(today())),
        );
        let processor = OrderProcessor::new(Box::new(catalog.clone()), rules);
        Self {
            catalog,
            notifier,
            processor,
        }
    }

    /// Stores the products under ids 1..=n and one order holding all of them.
    pub async fn with_order(order_id: u64, products: Vec<Product>) -> Self {
        Self::new().seed_order(order_id, products).await
    }

    pub async fn seed_order(self, order_id: u64, products: Vec<Product>) -> Self {
        let harness = self;
        let mut ids = Vec::new();
        for (index, product) in products.into_iter().enumerate() {
            let id = index as u64 + 1;
            harness.import_record(product.with_id(id).into()).await;
            ids.push(id);
        }
        OrderStore::import(&harness.catalog, OrderRecord::with_products(order_id, ids))
            .await
            .unwrap();
        harness
    }

    pub async fn import_record(&self, record: ProductRecord) {
        ProductStore::import(&self.catalog, record).await.unwrap();
    }

    pub async fn product(&self, id: u64) -> Product {
        ProductStore::find_by_id(&self.catalog, id)
            .await
            .unwrap()
            .unwrap()
    }
}

pub fn write_products_csv(path: &Path, rows: &[[&str; 8]]) -> Result<(), Error> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(PRODUCTS_HEADER)?;
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_orders_csv(path: &Path, rows: &[(u64, u64)]) -> Result<(), Error> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["order_id", "product_id"])?;
    for (order_id, product_id) in rows {
        wtr.write_record([order_id.to_string(), product_id.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}
