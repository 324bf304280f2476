use crate::errors::{ClientError, Result};
use crate::metrics_defs::{BACKEND_CALLS, BACKEND_CALL_FAILURES};
use serde_json::{Map, Value};
use shared::counter;
use url::Url;

/// Maximum number of characters of a non-JSON body kept for diagnostics.
const SNIPPET_LIMIT: usize = 200;

/// Methods the backend endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallMethod {
    Get,
    Post,
}

/// Thin envelope client for the spreadsheet-script backend.
///
/// Every call goes to the same base path (normally the relay). Responses are
/// expected to carry the `{ok, data?, error?}` envelope; anything else is
/// normalized into a [`ClientError`]. Stateless between calls.
#[derive(Clone)]
pub struct Transport {
    client: reqwest::Client,
    base_url: Url,
}

impl Transport {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Transport {
            client: reqwest::Client::new(),
            base_url: Url::parse(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Issues one backend call and unwraps the response envelope.
    ///
    /// GET encodes `action` and `query` on the query string and sends no
    /// body. POST merges `action` into the JSON body next to the payload
    /// fields. The raw response body is read as text before any JSON parse
    /// so a non-JSON error page fails cleanly instead of crashing the
    /// deserializer mid-stream.
    pub async fn call(
        &self,
        method: CallMethod,
        action: &str,
        payload: Option<Map<String, Value>>,
        query: &[(&str, &str)],
    ) -> Result<Value> {
        counter!(BACKEND_CALLS, "action" => action.to_string()).increment(1);

        let result = self.call_inner(method, action, payload, query).await;
        if let Err(err) = &result {
            counter!(BACKEND_CALL_FAILURES, "action" => action.to_string()).increment(1);
            tracing::warn!(action, error = %err, "backend call failed");
        }
        result
    }

    async fn call_inner(
        &self,
        method: CallMethod,
        action: &str,
        payload: Option<Map<String, Value>>,
        query: &[(&str, &str)],
    ) -> Result<Value> {
        let request = match method {
            CallMethod::Get => self
                .client
                .get(self.base_url.clone())
                .query(&[("action", action)])
                .query(query),
            CallMethod::Post => {
                let mut body = payload.unwrap_or_default();
                body.insert("action".to_string(), Value::String(action.to_string()));
                self.client
                    .post(self.base_url.clone())
                    .json(&Value::Object(body))
            }
        };

        let response = request.send().await?;
        let status = response.status();
        let raw = response.text().await?;

        let parsed: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(_) => {
                return Err(ClientError::NonJsonResponse {
                    status: status.as_u16(),
                    snippet: raw.chars().take(SNIPPET_LIMIT).collect(),
                });
            }
        };

        let error_field = parsed
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_owned);

        if !status.is_success() {
            return Err(ClientError::Application(
                error_field.unwrap_or_else(|| format!("HTTP {}", status.as_u16())),
            ));
        }

        if !parsed.get("ok").and_then(Value::as_bool).unwrap_or(false) {
            return Err(ClientError::Application(
                error_field.unwrap_or_else(|| "Error".to_string()),
            ));
        }

        Ok(parsed.get("data").cloned().unwrap_or(Value::Null))
    }
}
