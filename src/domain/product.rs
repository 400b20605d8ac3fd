use crate::error::FulfillmentError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The purchase rule family a product belongs to.
///
/// Persisted as the upper-case tags `NORMAL`, `SEASONAL` and `EXPIRABLE`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProductType {
    Normal,
    Seasonal,
    Expirable,
}

impl ProductType {
    pub fn as_tag(&self) -> &'static str {
        match self {
            ProductType::Normal => "NORMAL",
            ProductType::Seasonal => "SEASONAL",
            ProductType::Expirable => "EXPIRABLE",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl FromStr for ProductType {
    type Err = FulfillmentError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "NORMAL" => Ok(ProductType::Normal),
            "SEASONAL" => Ok(ProductType::Seasonal),
            "EXPIRABLE" => Ok(ProductType::Expirable),
            other => Err(FulfillmentError::InvalidArgument(format!(
                "Unknown product type: {}",
                other
            ))),
        }
    }
}

/// A product as seen by the purchase rules.
///
/// The date fields only carry meaning for their own category: `expiry_date` for
/// expirable products, the season bounds for seasonal ones.
#[derive(Debug, PartialEq, Clone)]
pub struct Product {
    /// Store-assigned identifier, `None` until first saved.
    pub id: Option<u64>,
    /// Days needed to restock once depleted.
    pub lead_time: u32,
    /// Units currently in stock.
    pub available: u32,
    pub product_type: ProductType,
    pub name: String,
    pub expiry_date: Option<NaiveDate>,
    pub season_start_date: Option<NaiveDate>,
    pub season_end_date: Option<NaiveDate>,
}

impl Product {
    pub fn normal(name: impl Into<String>, available: u32, lead_time: u32) -> Self {
        Self {
            id: None,
            lead_time,
            available,
            product_type: ProductType::Normal,
            name: name.into(),
            expiry_date: None,
            season_start_date: None,
            season_end_date: None,
        }
    }

    pub fn seasonal(
        name: impl Into<String>,
        available: u32,
        lead_time: u32,
        season_start_date: NaiveDate,
        season_end_date: NaiveDate,
    ) -> Self {
        Self {
            season_start_date: Some(season_start_date),
            season_end_date: Some(season_end_date),
            product_type: ProductType::Seasonal,
            ..Self::normal(name, available, lead_time)
        }
    }

    pub fn expirable(
        name: impl Into<String>,
        available: u32,
        lead_time: u32,
        expiry_date: NaiveDate,
    ) -> Self {
        Self {
            expiry_date: Some(expiry_date),
            product_type: ProductType::Expirable,
            ..Self::normal(name, available, lead_time)
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    /// Takes one unit out of stock. Returns `false` when nothing was left.
    pub fn take_one(&mut self) -> bool {
        match self.available.checked_sub(1) {
            Some(rest) => {
                self.available = rest;
                true
            }
            None => false,
        }
    }

    pub fn mark_out_of_stock(&mut self) {
        self.available = 0;
    }

    /// Season bounds, present for every validated seasonal product.
    pub fn season(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.season_start_date.zip(self.season_end_date)
    }
}

/// The persisted shape of a product, as stored and as read from seed files.
///
/// The category stays a raw tag here so rows written by other tools survive
/// until they are loaded for processing.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct ProductRecord {
    pub id: Option<u64>,
    pub lead_time: u32,
    pub available: u32,
    pub r#type: String,
    pub name: String,
    pub expiry_date: Option<NaiveDate>,
    pub season_start_date: Option<NaiveDate>,
    pub season_end_date: Option<NaiveDate>,
}

impl From<Product> for ProductRecord {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            lead_time: product.lead_time,
            available: product.available,
            r#type: product.product_type.as_tag().to_string(),
            name: product.name,
            expiry_date: product.expiry_date,
            season_start_date: product.season_start_date,
            season_end_date: product.season_end_date,
        }
    }
}

impl TryFrom<ProductRecord> for Product {
    type Error = FulfillmentError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        let product_type: ProductType = record.r#type.parse()?;

        match product_type {
            ProductType::Seasonal
                if record.season_start_date.is_none() || record.season_end_date.is_none() =>
            {
                return Err(FulfillmentError::InvalidArgument(format!(
                    "Seasonal product {} has no season dates",
                    record.name
                )));
            }
            ProductType::Expirable if record.expiry_date.is_none() => {
                return Err(FulfillmentError::InvalidArgument(format!(
                    "Expirable product {} has no expiry date",
                    record.name
                )));
            }
            _ => {}
        }

        Ok(Self {
            id: record.id,
            lead_time: record.lead_time,
            available: record.available,
            product_type,
            name: record.name,
            expiry_date: record.expiry_date,
            season_start_date: record.season_start_date,
            season_end_date: record.season_end_date,
        })
    }
}
