use crate::domain::order::OrderLine;
use crate::domain::product::ProductRecord;
use crate::error::{FulfillmentError, Result};
use serde::de::DeserializeOwned;
use std::io::Read;

/// Reads seed rows (products or order lines) from a CSV source.
///
/// Wraps `csv::Reader` with whitespace trimming; empty fields become `None`
/// for optional columns such as the product dates.
pub struct CatalogReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CatalogReader<R> {
    /// Creates a new `CatalogReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily reads `id,lead_time,available,type,name,expiry_date,season_start_date,season_end_date` rows.
    pub fn products(self) -> impl Iterator<Item = Result<ProductRecord>> {
        self.rows()
    }

    /// Lazily reads `order_id,product_id` rows.
    pub fn order_lines(self) -> impl Iterator<Item = Result<OrderLine>> {
        self.rows()
    }

    fn rows<T: DeserializeOwned>(self) -> impl Iterator<Item = Result<T>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(FulfillmentError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_reader_products() {
        let data = "id, lead_time, available, type, name, expiry_date, season_start_date, season_end_date\n\
                    1, 15, 30, NORMAL, USB Cable, , ,\n\
                    2, 15, 30, EXPIRABLE, Butter, 2024-06-20, ,\n\
                    3, 15, 30, SEASONAL, Watermelon, , 2024-06-01, 2024-08-31";
        let reader = CatalogReader::new(data.as_bytes());
        let results: Vec<Result<ProductRecord>> = reader.products().collect();

        assert_eq!(results.len(), 3);
        let cable = results[0].as_ref().unwrap();
        assert_eq!(cable.id, Some(1));
        assert_eq!(cable.r#type, "NORMAL");
        assert_eq!(cable.expiry_date, None);

        let butter = results[1].as_ref().unwrap();
        assert_eq!(butter.expiry_date, NaiveDate::from_ymd_opt(2024, 6, 20));

        let melon = results[2].as_ref().unwrap();
        assert_eq!(melon.season_end_date, NaiveDate::from_ymd_opt(2024, 8, 31));
    }

    #[test]
    fn test_reader_keeps_unknown_type_tag() {
        let data = "id,lead_time,available,type,name,expiry_date,season_start_date,season_end_date\n\
                    9,1,1,PERISHABLE,Mystery,,,";
        let reader = CatalogReader::new(data.as_bytes());
        let record = reader.products().next().unwrap().unwrap();
        assert_eq!(record.r#type, "PERISHABLE");
    }

    #[test]
    fn test_reader_malformed_line() {
        let data = "id,lead_time,available,type,name,expiry_date,season_start_date,season_end_date\n\
                    1,-4,1,NORMAL,Cable,,,";
        let reader = CatalogReader::new(data.as_bytes());
        let results: Vec<Result<ProductRecord>> = reader.products().collect();

        assert!(results[0].is_err());
    }

    #[test]
    fn test_reader_order_lines() {
        let data = "order_id,product_id\n1,1\n1,2";
        let reader = CatalogReader::new(data.as_bytes());
        let lines: Vec<OrderLine> = reader.order_lines().map(|l| l.unwrap()).collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], OrderLine { order_id: 1, product_id: 2 });
    }
}
