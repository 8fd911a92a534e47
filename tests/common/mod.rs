//! Shared test utilities for integration tests
#![allow(dead_code)]

pub mod http_stub;
pub mod mcp_harness;

use image::Rgba;
use lgtm_dog_mcp::overlay::{Raster, codec};

/// Encodes a solid-color raster as PNG
pub fn solid_png(width: u32, height: u32, color: Rgba<u8>) -> Vec<u8> {
    codec::encode_png(&Raster::filled(width, height, color)).expect("solid fixture should encode")
}

/// Encodes the gradient test pattern as PNG
pub fn pattern_png(width: u32, height: u32) -> Vec<u8> {
    codec::encode_png(&Raster::from_test_pattern(width, height))
        .expect("pattern fixture should encode")
}
