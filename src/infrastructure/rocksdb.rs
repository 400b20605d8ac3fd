use crate::domain::order::{Order, OrderRecord};
use crate::domain::ports::{OrderStore, ProductStore};
use crate::domain::product::{Product, ProductRecord};
use crate::error::{FulfillmentError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing product rows.
pub const CF_PRODUCTS: &str = "products";
/// Column Family for storing order membership.
pub const CF_ORDERS: &str = "orders";

/// A persistent store implementation using RocksDB.
///
/// Products and orders live in separate Column Families, keyed by their id in
/// big-endian so iteration follows id order. Values are JSON records.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families ("products" and "orders") exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_products = ColumnFamilyDescriptor::new(CF_PRODUCTS, Options::default());
        let cf_orders = ColumnFamilyDescriptor::new(CF_ORDERS, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_products, cf_orders])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            FulfillmentError::InternalError(Box::new(std::io::Error::other(format!(
                "{} column family not found",
                name
            ))))
        })
    }

    fn product_record(&self, product_id: u64) -> Result<Option<ProductRecord>> {
        let cf = self.cf(CF_PRODUCTS)?;
        match self.db.get_cf(cf, product_id.to_be_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn put_product(&self, record: &ProductRecord, product_id: u64) -> Result<()> {
        let cf = self.cf(CF_PRODUCTS)?;
        let value = serde_json::to_vec(record)?;
        self.db.put_cf(cf, product_id.to_be_bytes(), value)?;
        Ok(())
    }

    fn next_product_id(&self) -> Result<u64> {
        let cf = self.cf(CF_PRODUCTS)?;
        match self.db.iterator_cf(cf, IteratorMode::End).next() {
            Some(item) => {
                let (key, _value) = item?;
                let bytes: [u8; 8] = key.as_ref().try_into().map_err(|_| {
                    FulfillmentError::StorageError("malformed product key".to_string())
                })?;
                u64::from_be_bytes(bytes).checked_add(1).ok_or_else(|| {
                    FulfillmentError::StorageError("product ids exhausted".to_string())
                })
            }
            None => Ok(1),
        }
    }
}

#[async_trait]
impl ProductStore for RocksDBStore {
    async fn save(&self, mut product: Product) -> Result<Product> {
        let id = match product.id {
            Some(id) => id,
            None => self.next_product_id()?,
        };
        product.id = Some(id);
        self.put_product(&ProductRecord::from(product.clone()), id)?;
        Ok(product)
    }

    async fn find_by_id(&self, product_id: u64) -> Result<Option<Product>> {
        self.product_record(product_id)?
            .map(Product::try_from)
            .transpose()
    }

    async fn import(&self, mut record: ProductRecord) -> Result<()> {
        let id = match record.id {
            Some(id) => id,
            None => self.next_product_id()?,
        };
        record.id = Some(id);
        self.put_product(&record, id)
    }

    async fn all(&self) -> Result<Vec<ProductRecord>> {
        let cf = self.cf(CF_PRODUCTS)?;

        let mut records = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            records.push(serde_json::from_slice(&value)?);
        }

        Ok(records)
    }
}

#[async_trait]
impl OrderStore for RocksDBStore {
    async fn find_by_id(&self, order_id: u64) -> Result<Option<Order>> {
        let cf = self.cf(CF_ORDERS)?;
        let Some(bytes) = self.db.get_cf(cf, order_id.to_be_bytes())? else {
            return Ok(None);
        };
        let record: OrderRecord = serde_json::from_slice(&bytes)?;

        let mut items = Vec::with_capacity(record.product_ids.len());
        for product_id in &record.product_ids {
            let row = self.product_record(*product_id)?.ok_or_else(|| {
                FulfillmentError::StorageError(format!(
                    "order {} references missing product {}",
                    order_id, product_id
                ))
            })?;
            items.push(Product::try_from(row)?);
        }

        Ok(Some(Order {
            id: order_id,
            items,
        }))
    }

    async fn import(&self, record: OrderRecord) -> Result<()> {
        let cf = self.cf(CF_ORDERS)?;
        let value = serde_json::to_vec(&record)?;
        self.db.put_cf(cf, record.id.to_be_bytes(), value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_rocksdb_open_cf() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).expect("Failed to open RocksDB");

        assert!(store.db.cf_handle(CF_PRODUCTS).is_some());
        assert!(store.db.cf_handle(CF_ORDERS).is_some());
    }

    #[tokio::test]
    async fn test_rocksdb_product_store() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).unwrap();

        let saved = ProductStore::save(&store, Product::normal("USB Cable", 30, 15))
            .await
            .unwrap();
        assert_eq!(saved.id, Some(1));

        let again = ProductStore::save(&store, Product::normal("USB Dongle", 10, 2))
            .await
            .unwrap();
        assert_eq!(again.id, Some(2));

        let retrieved = ProductStore::find_by_id(&store, 1).await.unwrap().unwrap();
        assert_eq!(retrieved, saved);

        let all = ProductStore::all(&store).await.unwrap();
        assert_eq!(all.len(), 2);

        assert!(ProductStore::find_by_id(&store, 3).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rocksdb_save_fails_when_ids_are_exhausted() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).unwrap();

        ProductStore::import(
            &store,
            Product::normal("USB Cable", 1, 1).with_id(u64::MAX).into(),
        )
        .await
        .unwrap();

        let result = ProductStore::save(&store, Product::normal("USB Dongle", 1, 1)).await;
        assert!(matches!(result, Err(FulfillmentError::StorageError(_))));
        assert_eq!(ProductStore::all(&store).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rocksdb_order_store() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).unwrap();

        ProductStore::import(&store, Product::normal("USB Cable", 30, 15).with_id(5).into())
            .await
            .unwrap();
        OrderStore::import(&store, OrderRecord::with_products(1, [5]))
            .await
            .unwrap();

        let order = OrderStore::find_by_id(&store, 1).await.unwrap().unwrap();
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].id, Some(5));

        assert!(OrderStore::find_by_id(&store, 2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rocksdb_unknown_product_type_survives_until_load() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).unwrap();

        let mut record = ProductRecord::from(Product::normal("Mystery", 1, 1).with_id(1));
        record.r#type = "PERISHABLE".to_string();
        ProductStore::import(&store, record).await.unwrap();
        OrderStore::import(&store, OrderRecord::with_products(1, [1]))
            .await
            .unwrap();

        assert_eq!(ProductStore::all(&store).await.unwrap().len(), 1);
        let result = OrderStore::find_by_id(&store, 1).await;
        assert!(matches!(result, Err(FulfillmentError::InvalidArgument(_))));
    }
}
