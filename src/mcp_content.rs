//! MCP content builders for generate_lgtm_dog results
//!
//! A successful result carries a human-readable summary, a JSON metadata
//! block, and, when requested, the PNG itself as inline image content. A
//! failed generation is still a valid tool result: it is flagged with
//! `is_error` and carries the error message plus a remediation hint, so the
//! calling agent can explain what went wrong.
//!
//! # Examples
//!
//! ```
//! use lgtm_dog_mcp::{
//!     mcp_content::build_generation_result,
//!     model::{Dimensions, GenerationMetadata},
//! };
//!
//! let metadata = GenerationMetadata {
//!     path:                "/tmp/lgtm-dog-1.png".to_string(),
//!     dimensions:          Dimensions {
//!         width:  640,
//!         height: 480,
//!     },
//!     size_bytes:          8,
//!     scale:               15,
//!     source_format:       Some("jpeg".to_string()),
//!     fallback_dimensions: false,
//!     marker:              "LGTM".to_string(),
//! };
//!
//! let result = build_generation_result(&metadata, &[137, 80, 78, 71], false).unwrap();
//! assert!(!result.is_error.unwrap_or(false));
//! assert_eq!(result.content.len(), 2); // Summary + Metadata
//! ```

use base64::{Engine, engine::general_purpose::STANDARD};
use rmcp::model::{CallToolResult, Content};

use crate::{error::LgtmError, model::GenerationMetadata};

/// MIME type of every generated image
pub const PNG_MIME_TYPE: &str = "image/png";

/// Builds MCP image content from raw image bytes
///
/// # Examples
///
/// ```
/// use lgtm_dog_mcp::mcp_content::build_image_content;
///
/// let png_data = vec![137, 80, 78, 71, 13, 10, 26, 10, 0, 0, 0, 13];
/// let content = build_image_content(&png_data, "image/png");
/// assert!(content.as_image().is_some());
/// ```
pub fn build_image_content(data: &[u8], mime_type: &str) -> Content {
    Content::image(STANDARD.encode(data), mime_type)
}

/// Builds the summary text pointing the user at the saved file
pub fn build_summary(path: &str) -> Content {
    Content::text(format!(
        "LGTM dog image generated successfully!\n\nImage saved to: {}\n\nYou can open this file \
         to view the image.",
        path
    ))
}

/// Builds the JSON metadata block
pub fn build_metadata_content(metadata: &GenerationMetadata) -> serde_json::Result<Content> {
    let json = serde_json::to_string_pretty(metadata)?;
    Ok(Content::text(format!("## Generation Metadata\n\n```json\n{}\n```", json)))
}

/// Builds the successful tool result
///
/// Content order: summary, metadata, then the inline PNG if
/// `include_image` is set.
pub fn build_generation_result(
    metadata: &GenerationMetadata,
    png: &[u8],
    include_image: bool,
) -> serde_json::Result<CallToolResult> {
    let mut content = vec![build_summary(&metadata.path), build_metadata_content(metadata)?];
    if include_image {
        content.push(build_image_content(png, PNG_MIME_TYPE));
    }
    Ok(CallToolResult::success(content))
}

/// Builds a tool-level error result for a failed generation
///
/// # Examples
///
/// ```
/// use lgtm_dog_mcp::{error::LgtmError, mcp_content::build_error_result};
///
/// let error = LgtmError::UpstreamStatus {
///     status: "error".to_string(),
/// };
/// let result = build_error_result(&error);
/// assert_eq!(result.is_error, Some(true));
/// ```
pub fn build_error_result(error: &LgtmError) -> CallToolResult {
    CallToolResult::error(vec![
        Content::text(format!("Error generating LGTM dog image: {}", error)),
        Content::text(format!("Hint: {}", error.remediation_hint())),
    ])
}
