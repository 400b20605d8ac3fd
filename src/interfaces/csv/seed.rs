use super::catalog_reader::CatalogReader;
use crate::domain::order::group_order_lines;
use crate::domain::ports::{OrderStore, ProductStore};
use crate::error::Result;
use std::io::Read;

/// Imports every readable product row. Malformed rows are logged and skipped.
pub async fn import_products<R: Read>(
    store: &dyn ProductStore,
    reader: CatalogReader<R>,
) -> Result<usize> {
    let mut imported = 0;
    for row in reader.products() {
        match row {
            Ok(record) => {
                store.import(record).await?;
                imported += 1;
            }
            Err(e) => tracing::warn!(error = %e, "Error reading product row"),
        }
    }
    Ok(imported)
}

/// Imports orders from `order_id,product_id` rows, returning how many orders were written.
pub async fn import_orders<R: Read>(
    store: &dyn OrderStore,
    reader: CatalogReader<R>,
) -> Result<usize> {
    let lines = reader.order_lines().filter_map(|row| match row {
        Ok(line) => Some(line),
        Err(e) => {
            tracing::warn!(error = %e, "Error reading order row");
            None
        }
    });

    let records = group_order_lines(lines);
    let imported = records.len();
    for record in records {
        store.import(record).await?;
    }
    Ok(imported)
}
