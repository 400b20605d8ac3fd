use crate::domain::ports::{ClockBox, NotificationGatewayBox, ProductStoreBox};
use crate::domain::product::Product;
use crate::error::{FulfillmentError, Result};
use chrono::{Days, NaiveDate};

/// What happened to a single product during one purchase attempt.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PurchaseOutcome {
    /// One unit was taken out of stock and the product was saved.
    Sold,
    /// Nothing was sold; a notification may have been sent instead.
    Unfulfilled,
}

/// Category-specific purchase rules for a single product.
///
/// Every rule mutates the product in place and persists it only on the paths
/// that change stock. "Today" always comes from the injected clock.
pub struct PurchaseRules {
    product_store: ProductStoreBox,
    notifier: NotificationGatewayBox,
    clock: ClockBox,
}

impl PurchaseRules {
    pub fn new(
        product_store: ProductStoreBox,
        notifier: NotificationGatewayBox,
        clock: ClockBox,
    ) -> Self {
        Self {
            product_store,
            notifier,
            clock,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Sells one unit if any is left. Otherwise notifies the restock delay,
    /// unless the product has no lead time, in which case nothing happens.
    pub async fn purchase_normal(&self, product: &mut Product) -> Result<PurchaseOutcome> {
        if product.available > 0 {
            return self.sell_one(product).await;
        }

        if product.lead_time > 0 {
            self.notify_delay(product.lead_time, product).await?;
        }
        Ok(PurchaseOutcome::Unfulfilled)
    }

    /// Sells one unit when today is strictly inside the season and stock is left.
    pub async fn purchase_seasonal(&self, product: &mut Product) -> Result<PurchaseOutcome> {
        let (start, end) = season_of(product)?;
        let today = self.today();

        if today > start && today < end && product.available > 0 {
            self.sell_one(product).await
        } else {
            self.handle_seasonal_shortage(product).await
        }
    }

    /// Handles a seasonal product that cannot be sold right now.
    ///
    /// - restock would land after the season ends: out of stock, stock zeroed and saved
    /// - season has not started: out of stock notification only
    /// - otherwise: delay notification
    pub async fn handle_seasonal_shortage(
        &self,
        product: &mut Product,
    ) -> Result<PurchaseOutcome> {
        let (start, end) = season_of(product)?;
        let today = self.today();
        let restocked = today.checked_add_days(Days::new(u64::from(product.lead_time)));

        if restocked.is_none_or(|date| date > end) {
            self.notifier
                .send_out_of_stock_notification(&product.name)
                .await?;
            product.mark_out_of_stock();
            self.save(product).await?;
        } else if start > today {
            self.notifier
                .send_out_of_stock_notification(&product.name)
                .await?;
        } else {
            self.notify_delay(product.lead_time, product).await?;
        }
        Ok(PurchaseOutcome::Unfulfilled)
    }

    /// Sells one unit if stock is left and the expiry date is strictly after today.
    pub async fn purchase_expirable(&self, product: &mut Product) -> Result<PurchaseOutcome> {
        let expiry_date = expiry_of(product)?;

        if product.available > 0 && expiry_date > self.today() {
            self.sell_one(product).await
        } else {
            self.handle_expiry(product).await
        }
    }

    /// Sells one unit if the product is still sellable. Otherwise notifies the
    /// expiration, zeroes the stock and saves, even if it was already zero.
    pub async fn handle_expiry(&self, product: &mut Product) -> Result<PurchaseOutcome> {
        let expiry_date = expiry_of(product)?;

        if product.available > 0 && expiry_date > self.today() {
            return self.sell_one(product).await;
        }

        self.notifier
            .send_expiration_notification(&product.name, expiry_date)
            .await?;
        product.mark_out_of_stock();
        self.save(product).await?;
        Ok(PurchaseOutcome::Unfulfilled)
    }

    pub async fn notify_delay(&self, lead_time: u32, product: &Product) -> Result<()> {
        self.notifier
            .send_delay_notification(lead_time, &product.name)
            .await
    }

    async fn sell_one(&self, product: &mut Product) -> Result<PurchaseOutcome> {
        if !product.take_one() {
            return Ok(PurchaseOutcome::Unfulfilled);
        }
        self.save(product).await?;
        Ok(PurchaseOutcome::Sold)
    }

    async fn save(&self, product: &mut Product) -> Result<()> {
        *product = self.product_store.save(product.clone()).await?;
        Ok(())
    }
}

fn season_of(product: &Product) -> Result<(NaiveDate, NaiveDate)> {
    product.season().ok_or_else(|| {
        FulfillmentError::InvalidArgument(format!(
            "Seasonal product {} has no season dates",
            product.name
        ))
    })
}

fn expiry_of(product: &Product) -> Result<NaiveDate> {
    product.expiry_date.ok_or_else(|| {
        FulfillmentError::InvalidArgument(format!(
            "Expirable product {} has no expiry date",
            product.name
        ))
    })
}
