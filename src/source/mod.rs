//! Source image providers
//!
//! The annotation core works on bytes it is handed; this module is where
//! those bytes come from.
//!
//! - [`DogApiSource`]: fetches a random photo over HTTP
//! - [`StaticImageSource`]: serves fixed bytes, for tests and offline runs

pub mod dog_api;
pub mod mock;

use async_trait::async_trait;

pub use self::{dog_api::DogApiSource, mock::StaticImageSource};
use crate::error::LgtmResult;

/// Raw bytes of a source photo plus where they came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    /// Encoded image bytes, format unknown until decoded
    pub bytes:  Vec<u8>,
    /// URL or description of the origin, for logging
    pub origin: String,
}

impl SourceImage {
    /// Creates a new SourceImage
    pub fn new(bytes: Vec<u8>, origin: impl Into<String>) -> Self {
        Self {
            bytes,
            origin: origin.into(),
        }
    }

    /// Size of the encoded image in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether no bytes were received
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Capability: provides one source photo per call.
///
/// Implementations own their retry policy; callers treat any error as final
/// for the current request.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetches one image
    async fn fetch_image(&self) -> LgtmResult<SourceImage>;

    /// Short name for logs (e.g. "dog.ceo")
    fn name(&self) -> &str;
}
