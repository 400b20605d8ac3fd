//! HTTP surface: the order processing route and the error-to-status mapping.

use crate::application::processor::OrderProcessor;
use crate::error::FulfillmentError;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ProcessOrderResponse {
    pub id: u64,
}

pub fn router(processor: Arc<OrderProcessor>) -> Router {
    Router::new()
        .route("/orders/:order_id/processOrder", post(process_order))
        .layer(TraceLayer::new_for_http())
        .with_state(processor)
}

pub async fn process_order(
    State(processor): State<Arc<OrderProcessor>>,
    Path(order_id): Path<u64>,
) -> Result<Json<ProcessOrderResponse>, FulfillmentError> {
    let id = processor.process_order(order_id).await?;
    Ok(Json(ProcessOrderResponse { id }))
}

impl IntoResponse for FulfillmentError {
    fn into_response(self) -> Response {
        let status = match &self {
            FulfillmentError::OrderNotFound(order_id) => {
                tracing::debug!(order_id, "order not found");
                StatusCode::NOT_FOUND
            }
            FulfillmentError::InvalidArgument(message) => {
                tracing::warn!(%message, "invalid argument");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            other => {
                tracing::error!(error = %other, "order processing failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}
