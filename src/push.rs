//! Client for an Expo-compatible push gateway.
//!
//! Sends are best-effort: a failed chunk is logged and recorded in the
//! [`PushOutcome`], the rest are still attempted and nothing is retried.

use std::time::Duration;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::PushConfig;

/// Most messages the gateway accepts in one request.
pub const MAX_CHUNK_SIZE: usize = 100;

const PUSH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PushMessage {
    pub to: String,
    pub sound: &'static str,
    pub title: String,
    pub body: String,
    pub data: Value,
    pub priority: &'static str,
    pub channel_id: &'static str,
}

impl PushMessage {
    pub fn new(to: &str, title: &str, body: &str, data: Value) -> Self {
        Self {
            to: to.to_string(),
            sound: "default",
            title: title.to_string(),
            body: body.to_string(),
            data,
            priority: "high",
            channel_id: "default",
        }
    }
}

#[derive(Debug, Default)]
pub struct PushOutcome {
    pub tickets: Vec<Value>,
    pub errors: Vec<String>,
}

impl PushOutcome {
    fn failed<S: ToString>(error: S) -> Self {
        Self {
            tickets: Vec::new(),
            errors: vec![error.to_string()],
        }
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Deserialize)]
struct GatewayResponse {
    #[serde(default)]
    data: Vec<Value>,
}

/// Accepts `ExponentPushToken[..]`, `ExpoPushToken[..]` or a bare UUID.
pub fn is_valid_push_token(token: &str) -> bool {
    let bracketed = |prefix: &str| {
        token
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_suffix(']'))
            .map_or(false, |inner| !inner.is_empty())
    };
    if bracketed("ExponentPushToken[") || bracketed("ExpoPushToken[") {
        return true;
    }

    let groups: Vec<&str> = token.split('-').collect();
    groups.len() == 5
        && groups
            .iter()
            .zip([8, 4, 4, 4, 12])
            .all(|(group, len)| group.len() == len && group.chars().all(|c| c.is_ascii_hexdigit()))
}

pub fn chunk_messages(messages: &[PushMessage]) -> std::slice::Chunks<'_, PushMessage> {
    messages.chunks(MAX_CHUNK_SIZE)
}

pub struct PushClient {
    http: reqwest::Client,
    config: PushConfig,
}

impl PushClient {
    pub fn new(config: PushConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(PUSH_TIMEOUT)
            .build()
            .context("Failed to create push HTTP client")?;
        Ok(Self { http, config })
    }

    pub async fn send(&self, token: &str, title: &str, body: &str, data: Value) -> PushOutcome {
        if !is_valid_push_token(token) {
            tracing::warn!(token, "not a valid push token");
            return PushOutcome::failed("Invalid push token");
        }

        self.send_bulk(&[token.to_string()], title, body, data).await
    }

    /// Sends one message per valid token, skipping the invalid ones.
    pub async fn send_bulk(
        &self,
        tokens: &[String],
        title: &str,
        body: &str,
        data: Value,
    ) -> PushOutcome {
        let messages: Vec<PushMessage> = tokens
            .iter()
            .filter(|t| is_valid_push_token(t))
            .map(|t| PushMessage::new(t, title, body, data.clone()))
            .collect();

        if messages.is_empty() {
            tracing::warn!("no valid push tokens provided");
            return PushOutcome::failed("No valid push tokens");
        }

        self.deliver(messages).await
    }

    async fn deliver(&self, messages: Vec<PushMessage>) -> PushOutcome {
        let mut outcome = PushOutcome::default();

        if !self.config.enabled {
            for message in &messages {
                tracing::info!(to = %message.to, title = %message.title, "push disabled, not sent");
            }
            return outcome;
        }

        for chunk in chunk_messages(&messages) {
            match self.post_chunk(chunk).await {
                Ok(tickets) => outcome.tickets.extend(tickets),
                Err(err) => {
                    tracing::error!(error = ?err, size = chunk.len(), "push chunk failed");
                    outcome.errors.push(err.to_string());
                }
            }
        }

        tracing::info!(
            sent = messages.len(),
            failed_chunks = outcome.errors.len(),
            "push notifications dispatched"
        );
        outcome
    }

    async fn post_chunk(&self, chunk: &[PushMessage]) -> anyhow::Result<Vec<Value>> {
        let mut request = self.http.post(&self.config.api_url).json(chunk);
        if let Some(token) = &self.config.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.context("push request failed")?;
        if !response.status().is_success() {
            bail!("push gateway returned {}", response.status());
        }

        let body: GatewayResponse = response
            .json()
            .await
            .context("invalid push gateway response")?;
        Ok(body.data)
    }
}
