//! reqwest client for the mock API

use crate::config::ClientConfig;
use crate::core::adapter::{normalize_food, normalize_list};
use crate::core::cancel::CancelToken;
use crate::core::error::{FoodError, FoodResult};
use crate::core::food::FoodRecord;
use crate::core::service::FoodApi;
use crate::remote::FoodPayload;
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, Url};
use serde_json::Value;
use tracing::{debug, error};

/// Production [`FoodApi`] talking JSON over HTTP
#[derive(Debug, Clone)]
pub struct HttpFoodApi {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpFoodApi {
    /// Build a client from a validated configuration
    ///
    /// Every request carries `Content-Type: application/json`. A timeout is
    /// only set when `request_timeout_secs` is configured.
    pub fn new(config: ClientConfig) -> FoodResult<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| FoodError::Internal(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send one request and check its status
    async fn execute(
        &self,
        method: &Method,
        url: Url,
        body: Option<&FoodPayload>,
    ) -> FoodResult<reqwest::Response> {
        let path = url.path().to_string();
        debug!(method = %method, path = %path, "sending request");

        let mut request = self.client.request(method.clone(), url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            let message = describe_reqwest_error(&e);
            error!(method = %method, path = %path, error = %message, "request failed without response");
            FoodError::Network { message }
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(method = %method, path = %path, status = status.as_u16(), "remote returned error status");
            return Err(FoodError::Transport {
                method: method.to_string(),
                path,
                status: status.as_u16(),
            });
        }
        debug!(method = %method, path = %path, status = status.as_u16(), "request completed");
        Ok(response)
    }

    /// Send one request and decode its body as JSON
    ///
    /// Returns `None` for an empty body.
    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&FoodPayload>,
    ) -> FoodResult<Option<Value>> {
        let path = url.path().to_string();
        let response = self.execute(&method, url, body).await?;

        let bytes = response.bytes().await.map_err(|e| {
            let message = describe_reqwest_error(&e);
            error!(method = %method, path = %path, error = %message, "failed to read response body");
            FoodError::Network { message }
        })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    async fn send_record(
        &self,
        method: Method,
        url: Url,
        body: &FoodPayload,
    ) -> FoodResult<FoodRecord> {
        let value = self.send(method, url, Some(body)).await?.ok_or_else(|| {
            FoodError::Decode {
                message: "expected a food record, got an empty body".to_string(),
            }
        })?;
        Ok(normalize_food(&value)?)
    }
}

#[async_trait]
impl FoodApi for HttpFoodApi {
    async fn list(&self, cancel: &CancelToken) -> FoodResult<Vec<FoodRecord>> {
        let url = self.config.collection_url()?;
        cancel
            .run(async {
                match self.send(Method::GET, url, None).await? {
                    Some(Value::Array(items)) => {
                        let foods = normalize_list(items);
                        debug!(count = foods.len(), "listed foods");
                        Ok(foods)
                    }
                    other => Err(FoodError::Decode {
                        message: format!("expected a JSON array, got {}", json_kind(other.as_ref())),
                    }),
                }
            })
            .await
    }

    async fn create(
        &self,
        payload: &FoodPayload,
        cancel: &CancelToken,
    ) -> FoodResult<FoodRecord> {
        let url = self.config.collection_url()?;
        cancel
            .run(self.send_record(Method::POST, url, payload))
            .await
    }

    async fn update(
        &self,
        id: &str,
        payload: &FoodPayload,
        cancel: &CancelToken,
    ) -> FoodResult<FoodRecord> {
        let url = self.config.record_url(id)?;
        cancel
            .run(self.send_record(Method::PUT, url, payload))
            .await
    }

    async fn delete(&self, id: &str, cancel: &CancelToken) -> FoodResult<()> {
        let url = self.config.record_url(id)?;
        cancel
            .run(async {
                // success is decided by status alone; the body is never read
                self.execute(&Method::DELETE, url, None).await.map(drop)
            })
            .await
    }
}

fn describe_reqwest_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("timeout: {}", e)
    } else if e.is_connect() {
        format!("connection error: {}", e)
    } else if e.is_body() || e.is_decode() {
        format!("response body error: {}", e)
    } else {
        e.to_string()
    }
}

fn json_kind(value: Option<&Value>) -> &'static str {
    match value {
        None => "an empty body",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "a boolean",
        Some(Value::Number(_)) => "a number",
        Some(Value::String(_)) => "a string",
        Some(Value::Array(_)) => "an array",
        Some(Value::Object(_)) => "an object",
    }
}
