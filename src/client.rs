use std::env;
use std::pin::Pin;
use std::time::{Duration, Instant};

use futures::Stream;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use serde::Deserialize;
use url::Url;

use crate::error::{Error, Result};
use crate::observability::{
    CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUEST_RETRIES, CLIENT_REQUESTS,
    CLIENT_RETRY_BACKOFF,
};
use crate::sse::process_sse;
use crate::types::{ChatCompletion, ChatCompletionChunk, ChatCompletionParams, StreamOptions};

/// Base URL used when the configuration does not name one.
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/";
/// Environment variable consulted when no API key is configured.
pub const API_KEY_ENV: &str = "VTWO_API_KEY";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(500);
const MAX_RETRY_BACKOFF: Duration = Duration::from_secs(8);
const MAX_RETRY_AFTER: Duration = Duration::from_secs(30);

/// A boxed stream of completion chunks.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<ChatCompletionChunk>> + Send>>;

/// Client for an OpenAI-compatible `chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct Client {
    api_key: String,
    client: ReqwestClient,
    base_url: Url,
    timeout: Duration,
    max_retries: u32,
    retry_backoff: Duration,
}

impl Client {
    /// Create a new client against the default endpoint.
    ///
    /// The API key can be provided directly or read from the `VTWO_API_KEY`
    /// environment variable.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_options(api_key, None, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(
        api_key: Option<String>,
        base_url: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let api_key = match api_key.filter(|key| !key.is_empty()) {
            Some(key) => key,
            None => env::var(API_KEY_ENV).map_err(|_| {
                Error::authentication(
                    "API key not configured and VTWO_API_KEY environment variable not set",
                )
            })?,
        };

        let base_url = parse_base_url(base_url.unwrap_or(DEFAULT_API_URL))?;
        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {e}"),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            api_key,
            client,
            base_url,
            timeout,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        })
    }

    /// Set how many times a failed request is retried before giving up.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the delay before the first retry; it doubles on every attempt.
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// The endpoint requests are posted to.
    pub fn endpoint(&self) -> Result<Url> {
        Ok(self.base_url.join("chat/completions")?)
    }

    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self, accept: &'static str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static(accept));
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|_| Error::authentication("API key contains invalid header characters"))?;
        headers.insert(header::AUTHORIZATION, bearer);
        Ok(headers)
    }

    /// Process API response errors and convert to our Error type
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|val| val.to_str().ok())
            .and_then(|val| val.trim().parse::<u64>().ok());

        #[derive(Deserialize)]
        struct ErrorResponse {
            error: Option<ErrorDetail>,
        }

        #[derive(Deserialize)]
        struct ErrorDetail {
            #[serde(rename = "type")]
            error_type: Option<String>,
            message: Option<String>,
            param: Option<String>,
        }

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {e}"),
                    Some(Box::new(e)),
                );
            }
        };

        let detail = serde_json::from_str::<ErrorResponse>(&error_body)
            .ok()
            .and_then(|e| e.error);
        let (error_type, message, param) = match detail {
            Some(detail) => (
                detail.error_type,
                detail.message.unwrap_or_else(|| error_body.clone()),
                detail.param,
            ),
            None => (None, error_body, None),
        };

        match status_code {
            400 => Error::bad_request(message, param),
            401 => Error::authentication(message),
            403 => Error::permission(message),
            404 => Error::not_found(message),
            408 => Error::timeout(message, None),
            429 => Error::rate_limit(message, retry_after),
            500 => Error::internal_server(message),
            502..=504 => Error::service_unavailable(message, retry_after),
            _ => Error::api(status_code, error_type, message),
        }
    }

    fn map_send_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {e}"),
                Some(self.timeout.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("Connection error: {e}"), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {e}"), Some(Box::new(e)))
        }
    }

    /// Post `params` and return the first successful response, retrying
    /// retryable failures with exponential backoff.
    async fn post(&self, params: &ChatCompletionParams, accept: &'static str) -> Result<Response> {
        let url = self.endpoint()?;
        let headers = self.default_headers(accept)?;
        let mut attempt = 0;
        loop {
            CLIENT_REQUESTS.click();
            let start = Instant::now();
            tracing::debug!(%url, model = %params.model, attempt, "posting chat completion");
            let result = self
                .client
                .post(url.clone())
                .headers(headers.clone())
                .json(params)
                .send()
                .await;
            CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());

            let err = match result {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => Self::process_error_response(response).await,
                Err(e) => self.map_send_error(e),
            };
            CLIENT_REQUEST_ERRORS.click();

            if !err.is_retryable() || attempt >= self.max_retries {
                return Err(err);
            }
            let delay = self.backoff(attempt, err.retry_after());
            tracing::warn!(error = %err, attempt, ?delay, "request failed, retrying");
            CLIENT_REQUEST_RETRIES.click();
            CLIENT_RETRY_BACKOFF.add(delay.as_secs_f64());
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    fn backoff(&self, attempt: u32, retry_after: Option<u64>) -> Duration {
        if let Some(secs) = retry_after {
            return Duration::from_secs(secs).min(MAX_RETRY_AFTER);
        }
        self.retry_backoff
            .saturating_mul(1u32 << attempt.min(16))
            .min(MAX_RETRY_BACKOFF)
    }

    /// Send a request and wait for the complete response.
    pub async fn send(&self, mut params: ChatCompletionParams) -> Result<ChatCompletion> {
        params.stream = false;
        params.stream_options = None;

        let response = self.post(&params, "application/json").await?;
        response.json::<ChatCompletion>().await.map_err(|e| {
            Error::serialization(
                format!("Failed to parse response: {e}"),
                Some(Box::new(e)),
            )
        })
    }

    /// Send a request and get a streaming response.
    ///
    /// Returns a stream of chunks that can be rendered incrementally. Usage is
    /// requested for the trailing chunk unless the caller set stream options.
    pub async fn stream(&self, mut params: ChatCompletionParams) -> Result<ChunkStream> {
        params.stream = true;
        if params.stream_options.is_none() {
            params.stream_options = Some(StreamOptions {
                include_usage: true,
            });
        }

        let response = self.post(&params, "text/event-stream").await?;
        Ok(Box::pin(process_sse(response.bytes_stream())))
    }
}

/// Parse a base URL, making sure relative joins land beneath it.
fn parse_base_url(base_url: &str) -> Result<Url> {
    let base_url = base_url.trim();
    if base_url.ends_with('/') {
        Ok(Url::parse(base_url)?)
    } else {
        Ok(Url::parse(&format!("{base_url}/"))?)
    }
}
