//! Random dog photos from the dog.ceo API
//!
//! A fetch is two GET requests: the API endpoint answers with
//! `{ "message": "<image url>", "status": "success" }`, then the image URL is
//! downloaded. Each request is retried on transient failures (connect
//! errors, timeouts, HTTP 429 and 5xx) with exponential backoff. Anything
//! else fails immediately.

use std::{future::Future, time::Duration};

use async_trait::async_trait;
use reqwest::{Response, StatusCode, header::HeaderMap};
use serde::Deserialize;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::{ImageSource, SourceImage};
use crate::{
    constants,
    error::{LgtmError, LgtmResult},
};

/// Connection and retry settings for [`DogApiSource`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DogApiConfig {
    /// Endpoint returning a random image URL
    pub api_url:          String,
    /// Timeout for each individual request
    pub timeout:          Duration,
    /// Retries after the first attempt, per request
    pub max_retries:      u32,
    /// Delay before the first retry
    pub retry_base_delay: Duration,
    /// Upper bound for any retry delay
    pub retry_max_delay:  Duration,
    /// Largest accepted image body
    pub max_source_bytes: u64,
}

impl Default for DogApiConfig {
    fn default() -> Self {
        Self {
            api_url:          constants::DOG_API_URL.to_string(),
            timeout:          Duration::from_millis(constants::FETCH_TIMEOUT_MS),
            max_retries:      constants::FETCH_MAX_RETRIES,
            retry_base_delay: Duration::from_millis(constants::FETCH_RETRY_BASE_DELAY_MS),
            retry_max_delay:  Duration::from_millis(constants::FETCH_RETRY_MAX_DELAY_MS),
            max_source_bytes: constants::MAX_SOURCE_BYTES,
        }
    }
}

impl DogApiConfig {
    /// Builds the configuration from defaults and `LGTM_*` overrides
    pub fn from_env() -> Self {
        Self {
            api_url: constants::dog_api_url(),
            timeout: Duration::from_millis(constants::fetch_timeout_ms()),
            max_retries: constants::fetch_max_retries(),
            retry_base_delay: Duration::from_millis(constants::fetch_retry_base_delay_ms()),
            max_source_bytes: constants::max_source_bytes(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Deserialize)]
struct RandomImageResponse {
    message: String,
    status:  String,
}

/// One failed attempt, tagged with whether trying again could help
#[derive(Debug)]
struct AttemptError {
    error:       LgtmError,
    transient:   bool,
    retry_after: Option<Duration>,
}

impl AttemptError {
    fn fatal(error: LgtmError) -> Self {
        Self {
            error,
            transient: false,
            retry_after: None,
        }
    }

    fn transient(error: LgtmError, retry_after: Option<Duration>) -> Self {
        Self {
            error,
            transient: true,
            retry_after,
        }
    }

    fn from_reqwest(stage: &str, error: reqwest::Error) -> Self {
        let transient = error.is_timeout() || error.is_connect();
        Self {
            error: LgtmError::fetch(stage, error.to_string()),
            transient,
            retry_after: None,
        }
    }
}

/// HTTP image source backed by the dog.ceo random image API
///
/// # Examples
///
/// ```
/// use lgtm_dog_mcp::source::{DogApiSource, ImageSource, dog_api::DogApiConfig};
///
/// let source = DogApiSource::new(DogApiConfig::default()).unwrap();
/// assert_eq!(source.name(), "dog.ceo");
/// ```
#[derive(Debug, Clone)]
pub struct DogApiSource {
    client: reqwest::Client,
    config: DogApiConfig,
}

impl DogApiSource {
    /// Creates a source with the given settings
    pub fn new(config: DogApiConfig) -> LgtmResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(constants::USER_AGENT)
            .build()
            .map_err(|e| LgtmError::fetch("client setup", e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Creates a source configured from the environment
    pub fn from_env() -> LgtmResult<Self> {
        Self::new(DogApiConfig::from_env())
    }

    /// The active settings
    pub fn config(&self) -> &DogApiConfig {
        &self.config
    }

    async fn request_image_url(&self) -> Result<String, AttemptError> {
        const STAGE: &str = "api request";

        let response = self
            .client
            .get(&self.config.api_url)
            .send()
            .await
            .map_err(|e| AttemptError::from_reqwest(STAGE, e))?;
        let response = check_status(STAGE, response)?;

        let body: RandomImageResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                AttemptError::from_reqwest(STAGE, e)
            } else {
                AttemptError::fatal(LgtmError::fetch(
                    STAGE,
                    format!("malformed API response: {}", e),
                ))
            }
        })?;

        if body.status != "success" {
            return Err(AttemptError::fatal(LgtmError::UpstreamStatus {
                status: body.status,
            }));
        }

        let url = body.message.trim();
        if url.is_empty() {
            return Err(AttemptError::fatal(LgtmError::fetch(
                STAGE,
                "API response contained no image URL",
            )));
        }

        Ok(url.to_string())
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, AttemptError> {
        const STAGE: &str = "image download";
        let max = self.config.max_source_bytes;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AttemptError::from_reqwest(STAGE, e))?;
        let mut response = check_status(STAGE, response)?;

        let declared = response.content_length();
        if let Some(declared) = declared
            && declared > max
        {
            return Err(AttemptError::fatal(LgtmError::SourceTooLarge {
                size: declared,
                max,
            }));
        }

        // Chunked bodies carry no length, so the limit is enforced while reading.
        let capacity = declared.unwrap_or(0).min(max);
        let mut body = Vec::with_capacity(usize::try_from(capacity).unwrap_or(0));
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| AttemptError::from_reqwest(STAGE, e))?
        {
            let size = (body.len() + chunk.len()) as u64;
            if size > max {
                return Err(AttemptError::fatal(LgtmError::SourceTooLarge { size, max }));
            }
            body.extend_from_slice(&chunk);
        }

        if body.is_empty() {
            return Err(AttemptError::fatal(LgtmError::fetch(STAGE, "image body was empty")));
        }

        Ok(body)
    }

    async fn with_retries<T, F, Fut>(&self, stage: &str, mut operation: F) -> LgtmResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AttemptError>>,
    {
        let mut delay = self.config.retry_base_delay;
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match operation().await {
                Ok(value) => return Ok(value),
                Err(failure) if failure.transient && attempt <= self.config.max_retries => {
                    let wait = failure
                        .retry_after
                        .map_or(delay, |after| after.max(delay))
                        .min(self.config.retry_max_delay);
                    warn!(
                        "{} failed: {}; retrying in {:.1}s (attempt {}/{})",
                        stage,
                        failure.error,
                        wait.as_secs_f32(),
                        attempt,
                        self.config.max_retries + 1
                    );
                    sleep(wait).await;
                    delay = next_delay(delay, self.config.retry_max_delay);
                }
                Err(failure) => return Err(failure.error),
            }
        }
    }
}

#[async_trait]
impl ImageSource for DogApiSource {
    async fn fetch_image(&self) -> LgtmResult<SourceImage> {
        debug!("Requesting random image URL from {}", self.config.api_url);
        let url = self
            .with_retries("api request", || self.request_image_url())
            .await?;

        debug!("Downloading source image {}", url);
        let bytes = self
            .with_retries("image download", || self.download(&url))
            .await?;

        info!("Fetched source image ({} bytes) from {}", bytes.len(), url);
        Ok(SourceImage::new(bytes, url))
    }

    fn name(&self) -> &str {
        "dog.ceo"
    }
}

fn check_status(stage: &str, response: Response) -> Result<Response, AttemptError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error = LgtmError::fetch(stage, format!("HTTP {}", status));
    if is_transient_status(status) {
        Err(AttemptError::transient(error, retry_after(response.headers())))
    } else {
        Err(AttemptError::fatal(error))
    }
}

fn is_transient_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get("retry-after")?.to_str().ok()?.trim();
    value.parse::<u64>().ok().map(Duration::from_secs)
}

fn next_delay(current: Duration, max: Duration) -> Duration {
    current.saturating_mul(2).min(max)
}
