use crate::domain::ports::NotificationGateway;
use crate::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Notification {
    Delay { lead_time: u32, product_name: String },
    OutOfStock { product_name: String },
    Expiration { product_name: String, expiry_date: NaiveDate },
}

/// Delivers notifications as structured `tracing` events under the
/// `notifications` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

#[async_trait]
impl NotificationGateway for TracingNotifier {
    async fn send_delay_notification(&self, lead_time: u32, product_name: &str) -> Result<()> {
        tracing::info!(
            target: "notifications",
            product = product_name,
            lead_time,
            "delay notification"
        );
        Ok(())
    }

    async fn send_out_of_stock_notification(&self, product_name: &str) -> Result<()> {
        tracing::info!(
            target: "notifications",
            product = product_name,
            "out of stock notification"
        );
        Ok(())
    }

    async fn send_expiration_notification(
        &self,
        product_name: &str,
        expiry_date: NaiveDate,
    ) -> Result<()> {
        tracing::info!(
            target: "notifications",
            product = product_name,
            %expiry_date,
            "expiration notification"
        );
        Ok(())
    }
}

/// Keeps every notification it is asked to send. `Clone` shares the log.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications sent so far, oldest first.
    pub async fn sent(&self) -> Vec<Notification> {
        self.sent.lock().await.clone()
    }

    async fn record(&self, notification: Notification) -> Result<()> {
        self.sent.lock().await.push(notification);
        Ok(())
    }
}

#[async_trait]
impl NotificationGateway for RecordingNotifier {
    async fn send_delay_notification(&self, lead_time: u32, product_name: &str) -> Result<()> {
        self.record(Notification::Delay {
            lead_time,
            product_name: product_name.to_string(),
        })
        .await
    }

    async fn send_out_of_stock_notification(&self, product_name: &str) -> Result<()> {
        self.record(Notification::OutOfStock {
            product_name: product_name.to_string(),
        })
        .await
    }

    async fn send_expiration_notification(
        &self,
        product_name: &str,
        expiry_date: NaiveDate,
    ) -> Result<()> {
        self.record(Notification::Expiration {
            product_name: product_name.to_string(),
            expiry_date,
        })
        .await
    }
}
