//! Static image source for testing
//!
//! [`StaticImageSource`] implements [`ImageSource`] without touching the
//! network. It serves fixed bytes, optionally after a delay, or fails with an
//! injected error.
//!
//! # Examples
//!
//! ```
//! use lgtm_dog_mcp::source::{ImageSource, StaticImageSource};
//!
//! #[tokio::main]
//! async fn main() {
//!     let source = StaticImageSource::from_test_pattern(640, 480).unwrap();
//!     let image = source.fetch_image().await.unwrap();
//!     assert!(!image.is_empty());
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use super::{ImageSource, SourceImage};
use crate::{
    error::{AnnotateResult, LgtmError, LgtmResult},
    overlay::{Raster, codec},
};

/// Image source returning the same bytes on every call
#[derive(Debug)]
pub struct StaticImageSource {
    /// Bytes returned by every fetch
    bytes:           Vec<u8>,
    /// Optional delay to simulate network latency
    delay:           Option<Duration>,
    /// Optional error to inject for testing error handling
    error_injection: Option<LgtmError>,
}

impl StaticImageSource {
    /// Creates a source serving `bytes`
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            delay: None,
            error_injection: None,
        }
    }

    /// Creates a source serving a PNG gradient of the given size
    ///
    /// # Examples
    ///
    /// ```
    /// use lgtm_dog_mcp::source::StaticImageSource;
    ///
    /// let source = StaticImageSource::from_test_pattern(320, 240).unwrap();
    /// ```
    pub fn from_test_pattern(width: u32, height: u32) -> AnnotateResult<Self> {
        let png = codec::encode_png(&Raster::from_test_pattern(width, height))?;
        Ok(Self::new(png))
    }

    /// Sleeps for `delay` before every fetch
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fails every fetch with `error`
    ///
    /// # Examples
    ///
    /// ```
    /// use lgtm_dog_mcp::{error::LgtmError, source::StaticImageSource};
    ///
    /// let source = StaticImageSource::new(Vec::new()).with_error(LgtmError::UpstreamStatus {
    ///     status: "error".to_string(),
    /// });
    /// ```
    pub fn with_error(mut self, error: LgtmError) -> Self {
        self.error_injection = Some(error);
        self
    }

    async fn apply_delay(&self) {
        if let Some(duration) = self.delay {
            sleep(duration).await;
        }
    }

    fn check_error_injection(&self) -> LgtmResult<()> {
        if let Some(ref error) = self.error_injection {
            return Err(match error {
                LgtmError::Fetch { stage, reason } => LgtmError::Fetch {
                    stage:  stage.clone(),
                    reason: reason.clone(),
                },
                LgtmError::UpstreamStatus { status } => LgtmError::UpstreamStatus {
                    status: status.clone(),
                },
                LgtmError::SourceTooLarge { size, max } => LgtmError::SourceTooLarge {
                    size: *size,
                    max:  *max,
                },
                LgtmError::Annotate(inner) => LgtmError::Annotate(inner.clone()),
                LgtmError::Output { path, source } => LgtmError::Output {
                    path:   path.clone(),
                    source: std::io::Error::new(source.kind(), source.to_string()),
                },
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ImageSource for StaticImageSource {
    async fn fetch_image(&self) -> LgtmResult<SourceImage> {
        self.apply_delay().await;
        self.check_error_injection()?;
        Ok(SourceImage::new(self.bytes.clone(), "static"))
    }

    fn name(&self) -> &str {
        "static"
    }
}
