//! MCP Server Test Harness
//!
//! Provides reusable fixtures for exercising the LGTM dog MCP server against
//! offline image sources, with output confined to a temporary directory.
//!
//! # Usage
//!
//! ```rust
//! use common::mcp_harness::{ContentValidator, McpTestContext};
//!
//! #[tokio::test]
//! async fn test_generate() {
//!     let ctx = McpTestContext::with_pattern(640, 480);
//!     let result = ctx.generate_default().await.unwrap();
//!     let path = ContentValidator::saved_path(&result).unwrap();
//!     assert!(path.exists());
//! }
//! ```

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use base64::{Engine, engine::general_purpose::STANDARD};
use lgtm_dog_mcp::{
    mcp::LgtmMcpServer,
    model::GenerateLgtmParams,
    source::{ImageSource, StaticImageSource},
    util::output::OutputWriter,
};
use rmcp::{
    handler::server::wrapper::Parameters,
    model::{CallToolResult, ErrorData},
};
use tempfile::TempDir;

/// Test fixture for MCP server integration tests
///
/// Wraps an `LgtmMcpServer` whose default output directory is a fresh temp
/// directory, removed when the context is dropped.
pub struct McpTestContext {
    /// The MCP server instance
    pub server:     LgtmMcpServer,
    /// Default output directory for generated names
    pub output_dir: TempDir,
}

impl McpTestContext {
    /// Create test context serving a gradient PNG of the given size
    pub fn with_pattern(width: u32, height: u32) -> Self {
        let source = StaticImageSource::from_test_pattern(width, height)
            .expect("test pattern should encode");
        Self::with_source(source)
    }

    /// Create test context serving fixed bytes
    pub fn with_bytes(bytes: Vec<u8>) -> Self {
        Self::with_source(StaticImageSource::new(bytes))
    }

    /// Create test context around any image source
    ///
    /// Use this to inject errors or delays through `StaticImageSource`.
    pub fn with_source(source: impl ImageSource + 'static) -> Self {
        let output_dir = tempfile::tempdir().expect("temp dir should be created");
        let output = Arc::new(OutputWriter::new(output_dir.path()));
        let server = LgtmMcpServer::new(Arc::new(source), output);
        Self { server, output_dir }
    }

    // --- Tool invocation helpers ---

    /// Call generate_lgtm_dog with full parameters
    pub async fn generate(&self, params: GenerateLgtmParams) -> Result<CallToolResult, ErrorData> {
        self.server.generate_lgtm_dog(Parameters(params)).await
    }

    /// Call generate_lgtm_dog with no arguments
    pub async fn generate_default(&self) -> Result<CallToolResult, ErrorData> {
        self.generate(GenerateLgtmParams::default()).await
    }

    /// Convenience: generate into an explicit path
    pub async fn generate_to(
        &self,
        path: &Path,
        include_image: bool,
    ) -> Result<CallToolResult, ErrorData> {
        self.generate(GenerateLgtmParams {
            output_path:   Some(path.display().to_string()),
            include_image: Some(include_image),
        })
        .await
    }

    // --- Utility methods ---

    /// Files currently in the output directory
    pub fn output_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(self.output_dir.path())
            .expect("output dir should be readable")
            .map(|entry| entry.expect("dir entry should be readable").path())
            .collect();
        files.sort();
        files
    }
}

// ============================================================================
// Content Validators
// ============================================================================

/// Validation utilities for generate_lgtm_dog results
pub struct ContentValidator;

impl ContentValidator {
    /// Text of the content item at `index`
    pub fn text_at(result: &CallToolResult, index: usize) -> Result<String, String> {
        let content = result
            .content
            .get(index)
            .ok_or_else(|| format!("Missing content item {}", index))?;
        let text = content
            .as_text()
            .ok_or_else(|| format!("Content item {} is not text", index))?;
        Ok(text.text.clone())
    }

    /// Extract the saved path from the summary (first content item)
    pub fn saved_path(result: &CallToolResult) -> Result<PathBuf, String> {
        let summary = Self::text_at(result, 0)?;
        summary
            .lines()
            .find_map(|line| line.strip_prefix("Image saved to: "))
            .map(PathBuf::from)
            .ok_or_else(|| "Summary does not name a saved file".to_string())
    }

    /// Parse the JSON metadata block (second content item)
    pub fn metadata(result: &CallToolResult) -> Result<serde_json::Value, String> {
        let text = Self::text_at(result, 1)?;

        let start = text.find("```json").ok_or("Metadata has no JSON code block")? + 7;
        let end = text[start..]
            .find("```")
            .map(|i| start + i)
            .ok_or("Unclosed JSON code block")?;

        serde_json::from_str(text[start..end].trim()).map_err(|e| format!("Invalid JSON: {}", e))
    }

    /// Decode the inline PNG (third content item)
    pub fn inline_image(result: &CallToolResult) -> Result<Vec<u8>, String> {
        let content = result.content.get(2).ok_or("Missing image content")?;
        let image = content.as_image().ok_or("Third content is not an image")?;

        if image.mime_type != "image/png" {
            return Err(format!("Expected MIME type 'image/png', got '{}'", image.mime_type));
        }

        STANDARD
            .decode(&image.data)
            .map_err(|e| format!("Invalid base64: {}", e))
    }

    /// Verify PNG magic bytes
    pub fn is_valid_png(bytes: &[u8]) -> bool {
        bytes.starts_with(&lgtm_dog_mcp::overlay::codec::PNG_SIGNATURE)
    }
}
