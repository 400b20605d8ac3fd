//! CSV seed files for products and orders, and the product table writer.

pub mod catalog_reader;
pub mod product_writer;
pub mod seed;
