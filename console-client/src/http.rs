//! HTTP transport for the adapter API
//!
//! Owns the request pipeline: credential short-circuit, bearer header,
//! status mapping, envelope decoding with double-nesting compensation, and
//! the single retry on a timed-out request.

use reqwest::{Client, RequestBuilder, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use shared::ApiEnvelope;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::token::{TokenProbe, TokenStore};

/// HTTP client for the bank-adapter REST API
///
/// Cloning is cheap; clones share the connection pool and the token store.
#[derive(Debug, Clone)]
pub struct AdapterClient {
    client: Client,
    base_url: String,
    store: Arc<TokenStore>,
}

impl AdapterClient {
    /// Create a client, opening the token store under the configured data dir
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_store(config, Arc::new(TokenStore::open(&config.data_dir)))
    }

    /// Create a client around an existing token store
    pub fn with_store(config: &ClientConfig, store: Arc<TokenStore>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            store,
        }
    }

    /// Shared token store backing this client
    pub fn token_store(&self) -> Arc<TokenStore> {
        Arc::clone(&self.store)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Stored token, or the short-circuit error before any request is built
    fn require_token(&self) -> ClientResult<String> {
        self.store.get().ok_or(ClientError::MissingCredential)
    }

    // ========== Request dispatch ==========

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<ApiEnvelope<T>> {
        let token = self.require_token()?;
        let request = self
            .client
            .get(self.url(path))
            .header(header::AUTHORIZATION, bearer(&token));
        self.dispatch(request).await
    }

    pub(crate) async fn get_with_query<T, Q>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<ApiEnvelope<T>>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let token = self.require_token()?;
        let request = self
            .client
            .get(self.url(path))
            .query(query)
            .header(header::AUTHORIZATION, bearer(&token));
        self.dispatch(request).await
    }

    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> ClientResult<ApiEnvelope<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let token = self.require_token()?;
        let request = self
            .client
            .post(self.url(path))
            .json(body)
            .header(header::AUTHORIZATION, bearer(&token));
        self.dispatch(request).await
    }

    pub(crate) async fn put<T, B>(&self, path: &str, body: &B) -> ClientResult<ApiEnvelope<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let token = self.require_token()?;
        let request = self
            .client
            .put(self.url(path))
            .json(body)
            .header(header::AUTHORIZATION, bearer(&token));
        self.dispatch(request).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> ClientResult<ApiEnvelope<T>> {
        let token = self.require_token()?;
        let request = self
            .client
            .delete(self.url(path))
            .header(header::AUTHORIZATION, bearer(&token));
        self.dispatch(request).await
    }

    /// Send a request, retrying exactly once if the deadline elapsed
    ///
    /// Only a client-side timeout earns the retry; every other failure
    /// propagates on the first attempt.
    async fn dispatch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> ClientResult<ApiEnvelope<T>> {
        let retry = request.try_clone();
        match self.send(request).await {
            Err(ClientError::Timeout) => {
                let Some(retry) = retry else {
                    return Err(ClientError::Timeout);
                };
                tracing::warn!("request deadline elapsed, retrying once");
                self.send(retry).await
            }
            settled => settled,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> ClientResult<ApiEnvelope<T>> {
        let response = request.send().await.map_err(classify_transport)?;
        Self::handle_response(response).await
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> ClientResult<ApiEnvelope<T>> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = extract_error(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
            return match status {
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(message)),
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    Err(ClientError::ValidationFailed(message))
                }
                _ => Err(ClientError::ServerError {
                    status: status.as_u16(),
                }),
            };
        }

        let raw: ApiEnvelope<Value> = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout
            } else {
                ClientError::InvalidResponse(e.to_string())
            }
        })?;
        decode_envelope(flatten_envelope(raw))
    }

    // ========== Token probe ==========

    /// Probe the adapter with a candidate token
    ///
    /// Issues the cheapest authorized call and reports a three-way verdict.
    /// The stored token is neither consulted nor modified, so a candidate
    /// can be checked before saving it.
    pub async fn test_token(&self, token: &str) -> TokenProbe {
        let result = self
            .client
            .get(self.url("member/list"))
            .query(&[("page", "1"), ("limit", "1")])
            .header(header::AUTHORIZATION, bearer(token.trim()))
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => TokenProbe::Valid,
            Ok(response) => TokenProbe::Invalid {
                status: response.status().as_u16(),
            },
            Err(e) => {
                tracing::debug!(error = %e, "token probe could not reach the adapter");
                TokenProbe::Unreachable {
                    reason: e.to_string(),
                }
            }
        }
    }
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Sort a transport failure into the retryable and terminal buckets
fn classify_transport(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout
    } else if e.is_connect() {
        ClientError::Unreachable(e.to_string())
    } else {
        ClientError::Http(e)
    }
}

/// Pull the adapter's failure message out of an error body, when it is one
fn extract_error(body: &str) -> Option<String> {
    let envelope: ApiEnvelope<Value> = serde_json::from_str(body).ok()?;
    envelope.error
}

/// Unwrap one level of a double-nested payload
///
/// Some adapter routes deliver `data: { data: <payload>, ... }`. When the
/// payload slot is an object carrying a non-null `data` key, the inner value
/// replaces the outer one and every other envelope field is kept. The
/// compensation runs once per response and never recurses, so a payload that
/// arrives flat is passed through untouched.
fn flatten_envelope(mut envelope: ApiEnvelope<Value>) -> ApiEnvelope<Value> {
    let nested = match envelope.data.as_ref() {
        Some(Value::Object(outer)) => outer
            .get("data")
            .filter(|inner| !inner.is_null())
            .cloned(),
        _ => None,
    };
    if let Some(inner) = nested {
        envelope.data = Some(inner);
    }
    envelope
}

/// Decode the payload slot into its typed form
///
/// Only success envelopes carry a typed payload; failure envelopes keep
/// their message and status fields with an empty payload slot.
fn decode_envelope<T: DeserializeOwned>(envelope: ApiEnvelope<Value>) -> ClientResult<ApiEnvelope<T>> {
    let data = match (envelope.success, envelope.data) {
        (true, Some(value)) => Some(serde_json::from_value(value).map_err(|e| {
            ClientError::InvalidResponse(format!("payload decode failed: {e}"))
        })?),
        _ => None,
    };
    Ok(ApiEnvelope {
        success: envelope.success,
        data,
        prefix: envelope.prefix,
        timestamp: envelope.timestamp,
        error: envelope.error,
        status_code: envelope.status_code,
        details: envelope.details,
    })
}
