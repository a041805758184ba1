//! Async HTTP client for the Escopo admin callables.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use escopo_core::directory::CombinedUserView;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};

/// Connection settings for the callables server.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  /// Bearer token of an admin account.
  pub token:    String,
}

/// Async HTTP client for the callable endpoints.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

/// Response envelope: exactly one of `result` / `error` is set.
#[derive(Deserialize)]
struct Envelope<T> {
  result: Option<T>,
  error:  Option<CallableFailure>,
}

#[derive(Debug, Deserialize)]
struct CallableFailure {
  status:  String,
  message: String,
}

#[derive(Deserialize)]
struct StatusMessage {
  message: String,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, name: &str) -> String {
    format!("{}/{}", self.config.base_url.trim_end_matches('/'), name)
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    if self.config.token.is_empty() {
      req
    } else {
      req.bearer_auth(&self.config.token)
    }
  }

  /// Invoke callable `name` with `data` and decode its `result`.
  async fn call<T: DeserializeOwned>(&self, name: &str, data: Value) -> Result<T> {
    tracing::debug!(%name, "invoking callable");
    let resp = self
      .auth(self.client.post(self.url(name)))
      .json(&json!({ "data": data }))
      .send()
      .await
      .with_context(|| format!("POST /{name} failed"))?;

    let status = resp.status();
    let bytes = resp
      .bytes()
      .await
      .with_context(|| format!("reading /{name} response"))?;

    let envelope: Envelope<T> = match serde_json::from_slice(&bytes) {
      Ok(e) => e,
      Err(_) if !status.is_success() => return Err(anyhow!("POST /{name} → {status}")),
      Err(e) => return Err(e).with_context(|| format!("deserialising /{name} response")),
    };

    if let Some(failure) = envelope.error {
      return Err(anyhow!("{}: {}", failure.status, failure.message));
    }
    envelope
      .result
      .ok_or_else(|| anyhow!("POST /{name} → {status} without result"))
  }

  /// `POST /listUsers`
  pub async fn list_users(&self) -> Result<Vec<CombinedUserView>> {
    self.call("listUsers", Value::Null).await
  }

  /// `POST /setUserStatus` — returns the server's confirmation message.
  pub async fn set_user_status(&self, uid: &str, disabled: bool) -> Result<String> {
    let msg: StatusMessage = self
      .call("setUserStatus", json!({ "uid": uid, "disabled": disabled }))
      .await?;
    Ok(msg.message)
  }
}
