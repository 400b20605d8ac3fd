use crate::domain::product::ProductRecord;
use crate::error::Result;
use std::io::Write;

/// Writes product rows as CSV, in the same layout the seed reader accepts.
pub struct ProductWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ProductWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_products(
        &mut self,
        products: impl IntoIterator<Item = ProductRecord>,
    ) -> Result<()> {
        for product in products {
            self.writer.serialize(product)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
