use super::{JsonClient, Notifier};
use crate::config::{Credential, Line};
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::{
    Method,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde::Serialize;

pub const LINE_PUSH_URL: &str = "https://api.line.me/v2/bot/message/push";

#[derive(Debug, Serialize)]
struct PushMessage<'a> {
    to: &'a str,
    messages: [TextMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

/// Pushes text messages to a LINE group.
#[derive(Debug, Clone)]
pub struct LineClient {
    http: JsonClient,
    push_url: String,
    channel_token: Credential,
    group_id: Credential,
}

impl LineClient {
    pub fn new(http: JsonClient, line: &Line) -> AppResult<Self> {
        Self::with_push_url(http, line, LINE_PUSH_URL)
    }

    pub fn with_push_url(
        http: JsonClient,
        line: &Line,
        push_url: impl Into<String>,
    ) -> AppResult<Self> {
        if line.channel_token.is_empty() || line.channel_secret.is_empty() {
            return Err(AppError::Internal(
                "line channel token or secret is empty".to_string(),
            ));
        }

        Ok(Self {
            http,
            push_url: push_url.into(),
            channel_token: line.channel_token.clone(),
            group_id: line.group_id.clone(),
        })
    }
}

#[async_trait]
impl Notifier for LineClient {
    async fn post_message(&self, message: &str) -> AppResult<()> {
        if self.group_id.is_empty() {
            return Err(AppError::Internal("line group ID is empty".to_string()));
        }
        if message.is_empty() {
            return Err(AppError::BadRequest("message is empty".to_string()));
        }

        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.channel_token.expose()))
            .map_err(|_| AppError::Internal("line channel token is not a valid header".to_string()))?;
        headers.insert(AUTHORIZATION, bearer);

        let body = PushMessage {
            to: self.group_id.expose(),
            messages: [TextMessage {
                kind: "text",
                text: message,
            }],
        };

        self.http
            .send(Method::POST, &self.push_url, Some(&body), headers)
            .await?;

        tracing::info!(chars = message.chars().count(), "Message sent successfully");
        Ok(())
    }
}
