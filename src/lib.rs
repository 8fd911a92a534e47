//! lgtm-dog-mcp: LGTM image generation MCP server
//!
//! This library provides a Model Context Protocol (MCP) server that fetches
//! a random dog photo, stamps a centered "LGTM" marker onto it, and saves the
//! result as PNG.
//!
//! The image work lives in [`overlay`], a pure decode → paint → encode
//! pipeline with no I/O. Everything around it (fetching, file output, the
//! MCP tool) is in the remaining modules.

pub mod constants;
pub mod error;
pub mod mcp;
pub mod mcp_content;
pub mod model;
pub mod overlay;
pub mod source;
pub mod util;
