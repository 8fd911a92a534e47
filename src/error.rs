//! Error types for LGTM image generation
//!
//! Two layers of errors live here:
//!
//! - [`AnnotateError`]: failures of the pure image annotation core (decode,
//!   encode, glyph lookup). These never involve I/O.
//! - [`LgtmError`]: failures of the surrounding service (fetching the source
//!   photo, writing the output file), which wraps [`AnnotateError`].
//!
//! Every variant carries enough context (operation, offending character,
//! path) to build a user-facing message, and `remediation_hint()` suggests
//! what to do next.

use std::path::PathBuf;

/// Result type alias for annotation core operations
pub type AnnotateResult<T> = Result<T, AnnotateError>;

/// Result type alias for service-level operations
pub type LgtmResult<T> = Result<T, LgtmError>;

/// Errors produced by the image annotation core
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnnotateError {
    /// Input bytes are not a recognizable image, are truncated, or exceed the
    /// configured decode limits
    #[error("Failed to decode source image: {reason}")]
    Decode {
        /// Reason reported by the decoder
        reason: String,
    },

    /// Producing the output bytes failed
    #[error("Failed to encode image as {format}: {reason}")]
    Encode {
        /// Output format that failed
        format: String,
        /// Reason for encoding failure
        reason: String,
    },

    /// The marker contains a character with no glyph definition
    #[error("No glyph for character {character:?} at position {position} in marker {marker:?}")]
    UnsupportedGlyph {
        /// The offending character
        character: char,
        /// Zero-based character index within the marker
        position:  usize,
        /// The full marker string
        marker:    String,
    },
}

impl AnnotateError {
    pub(crate) fn decode(reason: impl Into<String>) -> Self {
        AnnotateError::Decode {
            reason: reason.into(),
        }
    }

    pub(crate) fn encode(format: &str, reason: impl Into<String>) -> Self {
        AnnotateError::Encode {
            format: format.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns an actionable remediation hint for this error
    ///
    /// # Examples
    ///
    /// ```
    /// use lgtm_dog_mcp::error::AnnotateError;
    ///
    /// let error = AnnotateError::UnsupportedGlyph {
    ///     character: 'ß',
    ///     position:  2,
    ///     marker:    "OKß".to_string(),
    /// };
    /// assert!(error.remediation_hint().contains("glyph table"));
    /// ```
    pub fn remediation_hint(&self) -> &str {
        match self {
            AnnotateError::Decode { .. } => {
                "The source image could not be read. It may be truncated, in an unsupported \
                 format, or larger than the decode limits. Try again to fetch a different image."
            }
            AnnotateError::Encode { .. } => {
                "Encoding the annotated image failed. This usually indicates memory pressure; \
                 retrying will not help until resources are freed."
            }
            AnnotateError::UnsupportedGlyph { .. } => {
                "The marker uses a character outside the glyph table (A-Z, 0-9, space, ! ? . -). \
                 This is a configuration defect: fix the marker constant."
            }
        }
    }
}

/// Errors produced by the LGTM service around the annotation core
#[derive(Debug, thiserror::Error)]
pub enum LgtmError {
    /// Fetching the source image failed
    #[error("Failed to fetch source image ({stage}): {reason}")]
    Fetch {
        /// Which step failed (e.g. "api request", "image download")
        stage:  String,
        /// Reason for the failure
        reason: String,
    },

    /// The image API answered with a non-success status
    #[error("Image API reported status '{status}'")]
    UpstreamStatus {
        /// Status string reported by the API
        status: String,
    },

    /// The downloaded image is larger than allowed
    #[error("Source image is {size} bytes, exceeding the {max} byte limit")]
    SourceTooLarge {
        /// Actual or declared size in bytes
        size: u64,
        /// Configured maximum in bytes
        max:  u64,
    },

    /// The annotation core failed
    #[error(transparent)]
    Annotate(#[from] AnnotateError),

    /// Writing the output file failed
    #[error("Failed to write output file {}: {source}", .path.display())]
    Output {
        /// Target path
        path:   PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl LgtmError {
    pub(crate) fn fetch(stage: &str, reason: impl Into<String>) -> Self {
        LgtmError::Fetch {
            stage:  stage.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns an actionable remediation hint for this error
    pub fn remediation_hint(&self) -> &str {
        match self {
            LgtmError::Fetch { .. } => {
                "The dog image service could not be reached. Check network connectivity and \
                 proxy settings, or point LGTM_DOG_API_URL at a reachable endpoint."
            }
            LgtmError::UpstreamStatus { .. } => {
                "The dog image API returned an unexpected status. The service may be degraded; \
                 try again shortly."
            }
            LgtmError::SourceTooLarge { .. } => {
                "The fetched photo is too large. Try again for a different image, or raise \
                 LGTM_MAX_SOURCE_BYTES."
            }
            LgtmError::Annotate(inner) => inner.remediation_hint(),
            LgtmError::Output { .. } => {
                "Check that the output directory exists or can be created, that it is writable, \
                 and that there is free disk space. Pass outputPath to choose another location."
            }
        }
    }
}
