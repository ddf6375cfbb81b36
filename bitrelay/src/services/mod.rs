pub mod fast_api;
pub mod gateway;
pub mod http;
pub mod line;
pub mod store;
pub mod url;

use crate::errors::AppResult;
use crate::models::{NewTicker, ProductCode, StoredTicker, Ticker};
use async_trait::async_trait;

pub use fast_api::FastApiClient;
pub use gateway::GatewayClient;
pub use http::JsonClient;
pub use line::LineClient;
pub use store::StoreClient;

/// One health-check call against a collaborator.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn probe(&self) -> AppResult<()>;
}

/// Where the relay reads the current ticker from.
#[async_trait]
pub trait TickerSource: Send + Sync {
    async fn fetch_ticker(&self, product_code: ProductCode) -> AppResult<Ticker>;
}

/// CRUD surface of the persistence service.
#[async_trait]
pub trait TickerStore: Send + Sync {
    async fn list_tickers(&self) -> AppResult<Vec<StoredTicker>>;
    async fn create_ticker(&self, ticker: &NewTicker) -> AppResult<()>;
    async fn delete_ticker(&self, id: i64) -> AppResult<()>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn post_message(&self, message: &str) -> AppResult<()>;
}

#[cfg(test)]
pub(crate) mod testing {
    use axum::Router;

    /// Serves `router` on an ephemeral local port and returns its base url.
    pub async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }
}
