use super::ExchangeApi;
use crate::config::{self, Credential};
use crate::errors::{AppError, AppResult};
use crate::models::{ChildOrder, ChildOrderResponse, ProductCode, Ticker};
use crate::services::{JsonClient, url};
use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::{
    Method,
    header::{HeaderMap, HeaderValue},
};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone)]
pub struct BitFlyer {
    http: JsonClient,
    base_url: String,
    api_key: Credential,
    api_secret: Credential,
}

impl BitFlyer {
    pub fn new(http: JsonClient, credentials: &config::BitFlyer) -> Self {
        Self::with_base_url(http, credentials, url::BITFLYER_BASE_URL)
    }

    pub fn with_base_url(
        http: JsonClient,
        credentials: &config::BitFlyer,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: credentials.api_key.clone(),
            api_secret: credentials.api_secret.clone(),
        }
    }

    /// Hex HMAC-SHA256 of `timestamp + method + path + body`, the value of
    /// the `ACCESS-SIGN` header.
    pub fn sign(
        secret: &str,
        timestamp: &str,
        method: &Method,
        path: &str,
        body: &[u8],
    ) -> AppResult<String> {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| AppError::Internal(format!("invalid signing key: {}", e)))?;
        mac.update(timestamp.as_bytes());
        mac.update(method.as_str().as_bytes());
        mac.update(path.as_bytes());
        mac.update(body);
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    fn private_headers(&self, method: &Method, url: &str, body: &[u8]) -> AppResult<HeaderMap> {
        if self.api_key.is_empty() || self.api_secret.is_empty() {
            return Err(AppError::Internal(
                "bitflyer api key or secret is empty".to_string(),
            ));
        }

        let path = ::url::Url::parse(url)?.path().to_string();
        let timestamp = Utc::now().timestamp().to_string();
        let sign = Self::sign(self.api_secret.expose(), &timestamp, method, &path, body)?;

        let mut headers = HeaderMap::new();
        headers.insert("ACCESS-KEY", header_value(self.api_key.expose())?);
        headers.insert("ACCESS-TIMESTAMP", header_value(&timestamp)?);
        headers.insert("ACCESS-SIGN", header_value(&sign)?);
        Ok(headers)
    }
}

fn header_value(value: &str) -> AppResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| AppError::Internal("header value is not visible ASCII".to_string()))
}

#[async_trait]
impl ExchangeApi for BitFlyer {
    async fn get_ticker(&self, product_code: ProductCode) -> AppResult<Ticker> {
        let url = url::exchange_ticker_url(&self.base_url, Some(product_code))?;
        tracing::debug!(url = %url, "Fetching ticker from bitFlyer");
        self.http.get_json(&url).await
    }

    async fn send_child_order(
        &self,
        order: &ChildOrder,
        is_dry: bool,
    ) -> AppResult<ChildOrderResponse> {
        if is_dry {
            tracing::info!(?order, "Dry run: child order not sent");
            return Ok(ChildOrderResponse::default());
        }

        let url = url::exchange_send_child_order_url(&self.base_url)?;
        let body = serde_json::to_vec(order)?;
        let headers = self.private_headers(&Method::POST, &url, &body)?;

        tracing::info!(
            product_code = %order.product_code,
            side = %order.side,
            size = order.size,
            price = order.price,
            "Sending child order to bitFlyer"
        );
        let response: Option<ChildOrderResponse> = self
            .http
            .request(Method::POST, &url, Some(order), headers)
            .await?;
        response.ok_or_else(|| AppError::Internal("empty child order response".to_string()))
    }
}
