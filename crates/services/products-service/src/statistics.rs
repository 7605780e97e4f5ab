//! Product view statistics.
//!
//! Each successful single-product read appends the product, as JSON, to a
//! Redis stream.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, Client};
use tracing::instrument;

use domain::Product;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[derive(Debug, thiserror::Error)]
pub enum StatisticsError {
    #[error("Redis connection error: {0}")]
    Connection(String),

    #[error("Redis command error: {0}")]
    Command(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait StatisticsSink: Send + Sync {
    /// Record one view of `product`
    async fn send(&self, product: &Product) -> Result<(), StatisticsError>;
}

/// Appends product views to a Redis stream with `XADD`.
#[derive(Clone)]
pub struct RedisStatisticsSink {
    connection: ConnectionManager,
    stream_key: String,
}

impl RedisStatisticsSink {
    /// Connect to Redis and publish to `stream_key`.
    pub async fn connect(redis_url: &str, stream_key: impl Into<String>) -> Result<Self, StatisticsError> {
        let client = Client::open(redis_url).map_err(|e| StatisticsError::Connection(e.to_string()))?;
        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| StatisticsError::Connection(e.to_string()))?;

        tracing::info!("Statistics stream connected");

        Ok(Self {
            connection,
            stream_key: stream_key.into(),
        })
    }
}

/// Stream entry body for one product view.
fn payload(product: &Product) -> Result<String, StatisticsError> {
    serde_json::to_string(product).map_err(|e| StatisticsError::Serialization(e.to_string()))
}

#[async_trait]
impl StatisticsSink for RedisStatisticsSink {
    #[instrument(skip_all, fields(stream_key = %self.stream_key, product_id = product.id), err)]
    async fn send(&self, product: &Product) -> Result<(), StatisticsError> {
        let body = payload(product)?;
        let mut conn = self.connection.clone();

        let _: String = redis::cmd("XADD")
            .arg(&self.stream_key)
            .arg("*")
            .arg("product")
            .arg(body)
            .query_async(&mut conn)
            .await
            .map_err(|e| StatisticsError::Command(e.to_string()))?;

        Ok(())
    }
}
