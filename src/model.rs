//! Data models and type definitions for lgtm-dog-mcp
//!
//! This module defines the types exchanged over MCP:
//! - Tool parameters for `generate_lgtm_dog`
//! - The JSON metadata block returned alongside a generated image

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the generate_lgtm_dog tool
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateLgtmParams {
    /// Where to save the PNG. A leading `~/` expands to the home directory.
    /// Defaults to ~/Downloads/lgtm-dog-<timestamp>.png
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,

    /// Also return the PNG inline as base64 image content (default: false)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_image: Option<bool>,
}

impl GenerateLgtmParams {
    /// The caller's output path, ignoring blank strings
    pub fn requested_path(&self) -> Option<&str> {
        self.output_path
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
    }

    /// Whether to attach the image inline
    pub fn wants_inline_image(&self) -> bool {
        self.include_image.unwrap_or(false)
    }
}

/// Pixel dimensions of a generated image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Dimensions {
    /// Width in pixels
    pub width:  u32,
    /// Height in pixels
    pub height: u32,
}

/// Metadata describing one generated LGTM image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationMetadata {
    /// Absolute path of the written file
    pub path:                String,
    /// Output dimensions
    pub dimensions:          Dimensions,
    /// Size of the PNG in bytes
    pub size_bytes:          u64,
    /// Glyph cell size used for the marker
    pub scale:               u32,
    /// Format detected in the source image (e.g. "jpeg"), if known
    pub source_format:       Option<String>,
    /// Whether the fallback 800x600 canvas replaced an unreadable size
    pub fallback_dimensions: bool,
    /// The text stamped onto the image
    pub marker:              String,
}
