use crate::domain::order::{Order, OrderRecord};
use crate::domain::ports::{OrderStore, ProductStore};
use crate::domain::product::{Product, ProductRecord};
use crate::error::{FulfillmentError, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// A thread-safe in-memory catalog holding both products and orders.
///
/// Orders only keep product ids, so a single struct backs both ports and
/// resolves order membership against its own product table. `Clone` shares state.
#[derive(Default, Clone)]
pub struct InMemoryCatalog {
    products: Arc<RwLock<BTreeMap<u64, ProductRecord>>>,
    orders: Arc<RwLock<HashMap<u64, OrderRecord>>>,
    saves: Arc<AtomicUsize>,
}

impl InMemoryCatalog {
    /// Creates a new, empty in-memory catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `save` calls served so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

fn next_id(products: &BTreeMap<u64, ProductRecord>) -> Result<u64> {
    match products.keys().next_back() {
        Some(last) => last
            .checked_add(1)
            .ok_or_else(|| FulfillmentError::StorageError("product ids exhausted".to_string())),
        None => Ok(1),
    }
}

#[async_trait]
impl ProductStore for InMemoryCatalog {
    async fn save(&self, mut product: Product) -> Result<Product> {
        let mut products = self.products.write().await;
        let id = match product.id {
            Some(id) => id,
            None => next_id(&products)?,
        };
        product.id = Some(id);
        products.insert(id, ProductRecord::from(product.clone()));
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(product)
    }

    async fn find_by_id(&self, product_id: u64) -> Result<Option<Product>> {
        let products = self.products.read().await;
        products
            .get(&product_id)
            .cloned()
            .map(Product::try_from)
            .transpose()
    }

    async fn import(&self, mut record: ProductRecord) -> Result<()> {
        let mut products = self.products.write().await;
        let id = match record.id {
            Some(id) => id,
            None => next_id(&products)?,
        };
        record.id = Some(id);
        products.insert(id, record);
        Ok(())
    }

    async fn all(&self) -> Result<Vec<ProductRecord>> {
        let products = self.products.read().await;
        Ok(products.values().cloned().collect())
    }
}

#[async_trait]
impl OrderStore for InMemoryCatalog {
    async fn find_by_id(&self, order_id: u64) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        let Some(record) = orders.get(&order_id) else {
            return Ok(None);
        };

        let products = self.products.read().await;
        let items = record
            .product_ids
            .iter()
            .map(|product_id| {
                let row = products.get(product_id).cloned().ok_or_else(|| {
                    FulfillmentError::StorageError(format!(
                        "order {} references missing product {}",
                        order_id, product_id
                    ))
                })?;
                Product::try_from(row)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(Order {
            id: order_id,
            items,
        }))
    }

    async fn import(&self, record: OrderRecord) -> Result<()> {
        let mut orders = self.orders.write().await;
        orders.insert(record.id, record);
        Ok(())
    }
}
