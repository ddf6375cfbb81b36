use super::{HealthProbe, JsonClient, TickerStore, url};
use crate::errors::AppResult;
use crate::models::{NewTicker, StoredTicker};
use async_trait::async_trait;
use reqwest::{Method, header::HeaderMap};

/// Client for the ticker persistence service (the DRF server).
#[derive(Debug, Clone)]
pub struct StoreClient {
    http: JsonClient,
    base_url: String,
}

impl StoreClient {
    pub fn new(http: JsonClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl TickerStore for StoreClient {
    async fn list_tickers(&self) -> AppResult<Vec<StoredTicker>> {
        let url = url::store_tickers_url(&self.base_url)?;
        let tickers = self
            .http
            .request::<(), Vec<StoredTicker>>(Method::GET, &url, None, HeaderMap::new())
            .await?;
        Ok(tickers.unwrap_or_default())
    }

    async fn create_ticker(&self, ticker: &NewTicker) -> AppResult<()> {
        let url = url::store_tickers_url(&self.base_url)?;
        self.http
            .send(Method::POST, &url, Some(ticker), HeaderMap::new())
            .await
    }

    async fn delete_ticker(&self, id: i64) -> AppResult<()> {
        let url = url::store_ticker_url(&self.base_url, id)?;
        self.http
            .send::<()>(Method::DELETE, &url, None, HeaderMap::new())
            .await
    }
}

#[async_trait]
impl HealthProbe for StoreClient {
    async fn probe(&self) -> AppResult<()> {
        let url = url::store_health_url(&self.base_url)?;
        self.http
            .send::<()>(Method::GET, &url, None, HeaderMap::new())
            .await
    }
}
