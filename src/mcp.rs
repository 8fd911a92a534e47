//! MCP service implementation with tool routing
//!
//! This module provides the lgtm-dog-mcp server and its single tool,
//! `generate_lgtm_dog`, which fetches a random dog photo, stamps "LGTM" on
//! it, and saves the PNG.

use std::sync::Arc;

use rmcp::{
    ServerHandler,
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, ErrorData as McpError, Implementation, ServerCapabilities, ServerInfo,
    },
    tool, tool_handler, tool_router,
};
use tracing::{error, info};

use crate::{
    constants,
    error::{LgtmError, LgtmResult},
    mcp_content::{build_error_result, build_generation_result},
    model::{Dimensions, GenerateLgtmParams, GenerationMetadata},
    overlay::{LGTM_MARKER, OverlayConfig, annotate_detailed},
    source::{DogApiSource, ImageSource},
    util::output::OutputWriter,
};

/// LGTM dog MCP server
///
/// # Tools
///
/// - `generate_lgtm_dog`: Fetch a random dog photo, overlay "LGTM", save
///   it as PNG
#[derive(Clone)]
pub struct LgtmMcpServer {
    /// Tool router for dispatching tool calls
    tool_router: ToolRouter<Self>,
    /// Where source photos come from
    source:      Arc<dyn ImageSource>,
    /// Where generated PNGs go
    output:      Arc<OutputWriter>,
    /// Overlay proportions and decode limits
    overlay:     OverlayConfig,
    /// Text stamped onto every image
    marker:      &'static str,
}

#[tool_router]
impl LgtmMcpServer {
    /// Creates a new LgtmMcpServer with the default overlay settings
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use lgtm_dog_mcp::{
    ///     mcp::LgtmMcpServer, source::StaticImageSource, util::output::OutputWriter,
    /// };
    ///
    /// let source = Arc::new(StaticImageSource::from_test_pattern(320, 240).unwrap());
    /// let output = Arc::new(OutputWriter::new(std::env::temp_dir()));
    /// let server = LgtmMcpServer::new(source, output);
    /// ```
    pub fn new(source: Arc<dyn ImageSource>, output: Arc<OutputWriter>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            source,
            output,
            overlay: OverlayConfig::default(),
            marker: LGTM_MARKER,
        }
    }

    /// Creates a server wired to the dog.ceo API, configured from the
    /// environment
    pub fn from_env() -> LgtmResult<Self> {
        let source = Arc::new(DogApiSource::from_env()?);
        let output = Arc::new(OutputWriter::from_env());
        Ok(Self::new(source, output).with_overlay_config(constants::overlay_config()))
    }

    /// Replaces the overlay settings
    pub fn with_overlay_config(mut self, overlay: OverlayConfig) -> Self {
        self.overlay = overlay;
        self
    }

    /// Replaces the stamped text
    pub fn with_marker(mut self, marker: &'static str) -> Self {
        self.marker = marker;
        self
    }

    /// Generates an LGTM dog image
    ///
    /// # Parameters
    ///
    /// - `outputPath` (optional): Where to save the PNG (default:
    ///   `~/Downloads/lgtm-dog-<timestamp>.png`)
    /// - `includeImage` (optional): Also return the PNG inline (default:
    ///   false)
    ///
    /// # Returns
    ///
    /// A `CallToolResult` containing:
    /// 1. A summary naming the saved file
    /// 2. Metadata (path, dimensions, size, scale, source format)
    /// 3. The PNG as image content, if `includeImage` is true
    ///
    /// Fetch, decode, and write failures come back as a result with
    /// `is_error` set, not as a protocol error.
    ///
    /// # Examples
    ///
    /// Request:
    /// ```json
    /// {
    ///   "method": "tools/call",
    ///   "params": {
    ///     "name": "generate_lgtm_dog",
    ///     "arguments": { "outputPath": "~/Pictures/lgtm.png" }
    ///   }
    /// }
    /// ```
    #[tool(description = "Generate a dog image with LGTM overlay")]
    pub async fn generate_lgtm_dog(
        &self,
        Parameters(params): Parameters<GenerateLgtmParams>,
    ) -> Result<CallToolResult, McpError> {
        info!("generate_lgtm_dog called (source: {})", self.source.name());

        let source_image = match self.source.fetch_image().await {
            Ok(image) => image,
            Err(e) => return Ok(failure(e)),
        };

        let marker = self.marker;
        let overlay = self.overlay;
        let annotated = tokio::task::spawn_blocking(move || {
            annotate_detailed(&source_image.bytes, marker, &overlay)
        })
        .await
        .map_err(|e| McpError::internal_error(format!("Annotation task failed: {}", e), None))?;

        let annotated = match annotated {
            Ok(annotated) => annotated,
            Err(e) => return Ok(failure(e.into())),
        };
        if annotated.fallback_dimensions {
            info!("Source dimensions unreadable, used fallback canvas");
        }

        let written = match self
            .output
            .write_png(&annotated.png, params.requested_path())
            .await
        {
            Ok(written) => written,
            Err(e) => return Ok(failure(e)),
        };

        let metadata = GenerationMetadata {
            path:                written.path.display().to_string(),
            dimensions:          Dimensions {
                width:  annotated.width,
                height: annotated.height,
            },
            size_bytes:          written.size,
            scale:               annotated.scale,
            source_format:       annotated
                .source_format
                .map(|format| format!("{:?}", format).to_lowercase()),
            fallback_dimensions: annotated.fallback_dimensions,
            marker:              self.marker.to_string(),
        };

        build_generation_result(&metadata, &annotated.png, params.wants_inline_image()).map_err(
            |e| {
                McpError::internal_error(
                    format!("Failed to serialize generation metadata: {}", e),
                    None,
                )
            },
        )
    }
}

fn failure(error: LgtmError) -> CallToolResult {
    error!("generate_lgtm_dog failed: {}", error);
    build_error_result(&error)
}

#[tool_handler]
impl ServerHandler for LgtmMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "lgtm-dog-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(
                "Call generate_lgtm_dog to create a dog photo stamped with LGTM, for approving \
                 pull requests."
                    .to_string(),
            ),
            ..Default::default()
        }
    }
}
