use crate::archive::ErrorBody;
use crate::config::RecapConfig;
use crate::error::{Error, Result};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

const INITIAL_BACKOFF_MS: u64 = 100;
const MAX_BACKOFF_MS: u64 = 5000;

/// HTTP transport for the archive API
///
/// Retries timeouts, connection failures, HTTP 429 and 5xx responses with
/// exponential backoff. Responses carrying an archive `errorCode` are final
/// and surface as [`Error::Api`].
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
    max_retries: u32,
}

/// Retry bookkeeping for one request
struct RetryState {
    attempt: u32,
    max_retries: u32,
    backoff_ms: u64,
}

impl RetryState {
    fn new(max_retries: u32) -> Self {
        Self {
            attempt: 0,
            max_retries: max_retries.max(1),
            backoff_ms: INITIAL_BACKOFF_MS,
        }
    }

    fn can_retry(&self) -> bool {
        self.attempt < self.max_retries - 1
    }

    fn increment(&mut self) {
        self.attempt += 1;
        self.backoff_ms = (self.backoff_ms * 2).min(MAX_BACKOFF_MS);
    }

    async fn wait(&self, delay_ms: u64) {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}

/// Delay requested by a `Retry-After` header, in milliseconds
fn retry_after_ms(response: &Response) -> Option<u64> {
    response
        .headers()
        .get("Retry-After")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(|secs| (secs * 1000).min(MAX_BACKOFF_MS))
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Extract the archive `errorCode` from a response body
fn domain_error_code(body: &str) -> Option<i64> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error_code)
}

impl HttpClient {
    pub fn new(config: &RecapConfig) -> Result<Self> {
        let user_agent = format!(
            "Recap-RS/{} ({})",
            env!("CARGO_PKG_VERSION"),
            std::env::consts::OS
        );
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::NetworkError(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| Error::Config(format!("Invalid base URL {}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "Base URL cannot carry a path: {}",
                config.base_url
            )));
        }

        Ok(Self {
            client,
            base_url,
            max_retries: config.max_retries,
        })
    }

    /// Build an endpoint URL; each segment is percent-encoded on its own
    pub fn endpoint_url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Execute a request with retry logic
    async fn with_retry<F, Fut>(&self, request_fn: F) -> Result<String>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = reqwest::Result<Response>>,
    {
        let mut state = RetryState::new(self.max_retries);

        loop {
            let result = request_fn().await;

            match result {
                Ok(response) => {
                    let status = response.status();
                    let retry_after = retry_after_ms(&response);
                    let body = response.text().await?;

                    if let Some(code) = domain_error_code(&body) {
                        debug!("Archive returned error code {} (HTTP {})", code, status);
                        return Err(Error::Api {
                            status: status.as_u16(),
                            code,
                        });
                    }

                    if status.is_success() {
                        return Ok(body);
                    }

                    if is_retryable_status(status) && state.can_retry() {
                        let delay = retry_after.unwrap_or(state.backoff_ms);
                        warn!(
                            "HTTP {} (attempt {}/{}), retrying in {}ms",
                            status,
                            state.attempt + 1,
                            state.max_retries,
                            delay
                        );
                        state.wait(delay).await;
                        state.increment();
                        continue;
                    }

                    return Err(Error::HttpStatus {
                        status: status.as_u16(),
                        body,
                    });
                }
                Err(e) if (e.is_timeout() || e.is_connect()) && state.can_retry() => {
                    warn!(
                        "Connection error (attempt {}/{}): {}, retrying in {}ms",
                        state.attempt + 1,
                        state.max_retries,
                        e,
                        state.backoff_ms
                    );
                    state.wait(state.backoff_ms).await;
                    state.increment();
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// GET a JSON document from the endpoint named by `segments`
    pub async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.endpoint_url(segments);
        debug!("GET {}", url);
        let body = self
            .with_retry(|| {
                self.client
                    .get(url.clone())
                    .header("Content-Type", "application/json")
                    .send()
            })
            .await?;
        Ok(serde_json::from_str(&body)?)
    }
}
