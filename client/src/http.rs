//! HTTP client for the IMS API
//!
//! Wraps one configured `reqwest::Client`. Every request carries the session
//! token when there is one, and every failed response passes through
//! [`HttpClient::intercept`] which raises the matching toast before the error
//! is handed back to the caller.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::{Config, QueryConfig};
use crate::error::{ClientError, ClientResult, ErrorBody};
use crate::notify::{Notifier, UnauthorizedThrottle};
use crate::session::Session;

/// Upper bound on the delay between two query attempts
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Retry behaviour for read queries. Mutations are sent once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &QueryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.retry_base_ms),
        }
    }

    /// Never retry
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    /// Whether to try again after `failure_count` earlier failures (0 on the
    /// first failure). Authorization failures and local errors are final.
    pub fn should_retry(&self, failure_count: u32, err: &ClientError) -> bool {
        let retryable = matches!(
            err,
            ClientError::NotFound { .. }
                | ClientError::Server { .. }
                | ClientError::Network(_)
                | ClientError::Decode(_)
        );
        retryable && failure_count < self.max_retries
    }

    /// Delay before the retry that follows failure number `failure_count`
    pub fn delay(&self, failure_count: u32) -> Duration {
        let factor = 2u32.checked_pow(failure_count).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(MAX_RETRY_DELAY)
            .min(MAX_RETRY_DELAY)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&QueryConfig::default())
    }
}

/// API client shared by every resource module
pub struct HttpClient {
    client: Client,
    base_url: String,
    session: Arc<Session>,
    notifier: Arc<dyn Notifier>,
    throttle: UnauthorizedThrottle,
    retry: RetryPolicy,
}

impl HttpClient {
    /// Create a client for the configured API host
    pub fn new(
        config: &Config,
        session: Arc<Session>,
        notifier: Arc<dyn Notifier>,
    ) -> ClientResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.api.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.api.v1_base(),
            session,
            notifier,
            throttle: UnauthorizedThrottle::new(Duration::from_millis(
                config.notifications.unauthorized_cooldown_ms,
            )),
            retry: RetryPolicy::from_config(&config.query),
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Absolute URL for an endpoint path such as `requisitions/4`
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    // ------------------------------------------------------------------
    // Reads (retried)
    // ------------------------------------------------------------------

    /// GET without query parameters
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.get_with(path, &()).await
    }

    /// GET with query parameters, retried per the read policy
    pub async fn get_with<Q, T>(&self, path: &str, params: &Q) -> ClientResult<T>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut failures = 0u32;
        loop {
            let request = self.request(Method::GET, path).query(params);
            match self.send(path, request).await {
                Ok(value) => return Ok(value),
                Err(err) if self.retry.should_retry(failures, &err) => {
                    let delay = self.retry.delay(failures);
                    tracing::debug!(path, attempt = failures + 1, ?delay, "retrying query");
                    tokio::time::sleep(delay).await;
                    failures += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    // ------------------------------------------------------------------
    // Mutations (sent once)
    // ------------------------------------------------------------------

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(path, self.request(Method::POST, path).json(body))
            .await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(path, self.request(Method::PUT, path).json(body))
            .await
    }

    /// DELETE; any response body is ignored
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        let request = self.request(Method::DELETE, path);
        match self.execute(request).await {
            Ok(_) => Ok(()),
            Err(err) => {
                self.intercept(path, &err);
                Err(err)
            }
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!(%method, %url, "request");
        let builder = self.client.request(method, url);
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, path: &str, request: RequestBuilder) -> ClientResult<T> {
        let result = match self.execute(request).await {
            Ok(bytes) => decode(&bytes),
            Err(err) => Err(err),
        };
        if let Err(err) = &result {
            self.intercept(path, err);
        }
        result
    }

    async fn execute(&self, request: RequestBuilder) -> ClientResult<Vec<u8>> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body: ErrorBody = response.json().await.unwrap_or_default();
            return Err(ClientError::from_status(status, body.message));
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// Turn a failed response into a toast
    fn intercept(&self, path: &str, err: &ClientError) {
        tracing::warn!(path, status = ?err.status(), error = %err, "request failed");
        match err {
            ClientError::Unauthorized { .. } => {
                if self.throttle.should_show() {
                    self.notifier.notify(err.notification());
                } else {
                    tracing::debug!("unauthorized toast suppressed");
                }
            }
            ClientError::Forbidden { .. }
            | ClientError::NotFound { .. }
            | ClientError::Server { .. }
            | ClientError::Network(_)
            | ClientError::Decode(_) => self.notifier.notify(err.notification()),
            _ => {}
        }
    }
}

/// Decode a success body; an empty body reads as JSON `null`
fn decode<T: DeserializeOwned>(bytes: &[u8]) -> ClientResult<T> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_slice(b"null")?);
    }
    Ok(serde_json::from_slice(bytes)?)
}
