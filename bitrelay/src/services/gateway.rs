use super::{HealthProbe, JsonClient, TickerSource, url};
use crate::errors::AppResult;
use crate::models::{ProductCode, Ticker};
use async_trait::async_trait;
use reqwest::{Method, header::HeaderMap};

/// Client for the compute service that relays exchange tickers.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: JsonClient,
    base_url: String,
}

impl GatewayClient {
    pub fn new(http: JsonClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl TickerSource for GatewayClient {
    async fn fetch_ticker(&self, product_code: ProductCode) -> AppResult<Ticker> {
        let url = url::gateway_ticker_url(&self.base_url, Some(product_code))?;
        self.http.get_json(&url).await
    }
}

#[async_trait]
impl HealthProbe for GatewayClient {
    async fn probe(&self) -> AppResult<()> {
        let url = url::gateway_health_url(&self.base_url)?;
        self.http
            .send::<()>(Method::GET, &url, None, HeaderMap::new())
            .await
    }
}
