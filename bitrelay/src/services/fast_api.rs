use super::{HealthProbe, JsonClient, url};
use crate::errors::AppResult;
use async_trait::async_trait;
use reqwest::{Method, header::HeaderMap};

#[derive(Debug, Clone)]
pub struct FastApiClient {
    http: JsonClient,
    base_url: String,
}

impl FastApiClient {
    pub fn new(http: JsonClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl HealthProbe for FastApiClient {
    async fn probe(&self) -> AppResult<()> {
        let url = url::fast_api_health_url(&self.base_url)?;
        self.http
            .send::<()>(Method::GET, &url, None, HeaderMap::new())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::spawn_stub;
    use axum::{Json, Router, routing::get};

    #[tokio::test]
    async fn probe_hits_healthcheck_path() {
        let router = Router::new().route(
            "/healthcheck/",
            get(|| async { Json(serde_json::json!({"status": "ok"})) }),
        );
        let base = spawn_stub(router).await;
        let client = FastApiClient::new(JsonClient::new().unwrap(), base);

        client.probe().await.unwrap();
    }
}
