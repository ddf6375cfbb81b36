use crate::errors::{AppError, AppResult};
use reqwest::{
    Method,
    header::{CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};

/// JSON-over-HTTP caller shared by every service client.
///
/// Holds one `reqwest::Client`; cloning is cheap and shares the connection pool.
#[derive(Debug, Clone, Default)]
pub struct JsonClient {
    inner: reqwest::Client,
}

impl JsonClient {
    pub fn new() -> AppResult<Self> {
        let inner = reqwest::Client::builder()
            .user_agent(concat!("bitrelay/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { inner })
    }

    /// Sends `body` as JSON and returns the decoded response, or `None` when
    /// the server replied with an empty body.
    pub async fn request<B, T>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
        headers: HeaderMap,
    ) -> AppResult<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let bytes = self.execute(method, url, body, headers).await?;
        if bytes.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> AppResult<T> {
        self.request::<(), T>(Method::GET, url, None, HeaderMap::new())
            .await?
            .ok_or_else(|| AppError::Internal(format!("empty response body from {}", url)))
    }

    /// Like [`JsonClient::request`] but discards whatever the server sent back.
    pub async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
        headers: HeaderMap,
    ) -> AppResult<()> {
        self.execute(method, url, body, headers).await?;
        Ok(())
    }

    async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
        mut headers: HeaderMap,
    ) -> AppResult<Vec<u8>> {
        if !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        let mut request = self.inner.request(method.clone(), url).headers(headers);
        if let Some(body) = body {
            request = request.body(serde_json::to_vec(body)?);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if status.as_u16() >= 400 {
            let body = String::from_utf8_lossy(&bytes).into_owned();
            tracing::debug!(%method, url, status = status.as_u16(), body = %body, "Request failed");
            return Err(AppError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::spawn_stub;
    use axum::{
        Json, Router,
        http::{HeaderMap as AxumHeaders, StatusCode},
        routing::{get, post},
    };
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Echo {
        message: String,
    }

    #[tokio::test]
    async fn round_trips_json_and_sets_content_type() {
        let router = Router::new().route(
            "/echo/",
            post(|headers: AxumHeaders, Json(body): Json<Echo>| async move {
                let content_type = headers
                    .get("content-type")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                Json(Echo {
                    message: format!("{}|{}", body.message, content_type),
                })
            }),
        );
        let base = spawn_stub(router).await;
        let client = JsonClient::new().unwrap();

        let echoed: Option<Echo> = client
            .request(
                Method::POST,
                &format!("{}/echo/", base),
                Some(&Echo {
                    message: "hi".to_string(),
                }),
                HeaderMap::new(),
            )
            .await
            .unwrap();

        assert_eq!(echoed.unwrap().message, "hi|application/json");
    }

    #[tokio::test]
    async fn error_status_carries_body() {
        let router = Router::new().route(
            "/broken/",
            get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let base = spawn_stub(router).await;
        let client = JsonClient::new().unwrap();

        let err = client
            .send::<()>(Method::GET, &format!("{}/broken/", base), None, HeaderMap::new())
            .await
            .unwrap_err();

        match err {
            AppError::Status { status, body } => {
                assert_eq!(status, 502);
                assert_eq!(body, "upstream down");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn empty_body_decodes_to_none() {
        let router = Router::new().route("/empty/", get(|| async { StatusCode::NO_CONTENT }));
        let base = spawn_stub(router).await;
        let client = JsonClient::new().unwrap();

        let result: Option<Echo> = client
            .request::<(), Echo>(Method::GET, &format!("{}/empty/", base), None, HeaderMap::new())
            .await
            .unwrap();
        assert!(result.is_none());

        let err = client
            .get_json::<Echo>(&format!("{}/empty/", base))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn connection_failure_is_an_http_error() {
        let client = JsonClient::new().unwrap();
        let err = client
            .send::<()>(Method::GET, "http://127.0.0.1:1/", None, HeaderMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Http(_)));
    }
}
