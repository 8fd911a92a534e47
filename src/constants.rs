//! Defaults and environment overrides for the LGTM service.
//!
//! The annotation core never reads the environment; everything here is
//! resolved by the service layer and passed down as plain values.
//!
//! # Runtime Configuration
//!
//! | Environment Variable | Default | Description |
//! |---------------------|---------|-------------|
//! | `LGTM_DOG_API_URL` | `https://dog.ceo/api/breeds/image/random` | Random image API endpoint |
//! | `LGTM_FETCH_TIMEOUT_MS` | 15000 | Per-request HTTP timeout |
//! | `LGTM_FETCH_MAX_RETRIES` | 2 | Retries for transient fetch failures |
//! | `LGTM_FETCH_RETRY_BASE_DELAY_MS` | 500 | First retry delay (doubles, capped at 5s) |
//! | `LGTM_MAX_SOURCE_BYTES` | 20971520 | Largest accepted source image |
//! | `LGTM_MIN_PIXEL_SIZE` | 3 | Smallest glyph cell size, in [1, 64] |
//! | `LGTM_MAX_WIDTH_RATIO` | 0.7 | Largest text width share, in (0, 1] |
//! | `LGTM_MAX_HEIGHT_RATIO` | 0.25 | Largest text height share, in (0, 1] |
//! | `LGTM_MAX_DECODE_DIMENSION` | 16384 | Decoder width/height limit |
//! | `LGTM_OUTPUT_DIR` | `~/Downloads` | Directory for generated files |
//!
//! Invalid values fall back to the defaults.

use std::path::PathBuf;

use crate::overlay::layout::{
    DEFAULT_MAX_DECODE_DIMENSION, DEFAULT_MAX_HEIGHT_RATIO, DEFAULT_MAX_WIDTH_RATIO,
    DEFAULT_MIN_PIXEL_SIZE, OverlayConfig,
};

/// Endpoint returning `{ "message": <image url>, "status": "success" }`
pub const DOG_API_URL: &str = "https://dog.ceo/api/breeds/image/random";

/// Timeout for each HTTP request (API call or image download).
///
/// The API answers in well under a second; image downloads of a few MB can
/// take several seconds on slow links.
pub const FETCH_TIMEOUT_MS: u64 = 15_000;

/// Retries after the first attempt for transient fetch failures
pub const FETCH_MAX_RETRIES: u32 = 2;

/// Delay before the first retry. Doubles on each further retry.
pub const FETCH_RETRY_BASE_DELAY_MS: u64 = 500;

/// Upper bound for any single retry delay
pub const FETCH_RETRY_MAX_DELAY_MS: u64 = 5_000;

/// Largest source image accepted, in bytes (20 MiB)
pub const MAX_SOURCE_BYTES: u64 = 20 * 1024 * 1024;

/// Prefix of generated output file names
pub const OUTPUT_FILE_PREFIX: &str = "lgtm-dog";

/// Largest accepted `LGTM_MIN_PIXEL_SIZE`
///
/// Only tiny images ever run at the minimum scale, so a larger floor just
/// pushes the marker off the raster.
pub const MAX_MIN_PIXEL_SIZE: u32 = 64;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("lgtm-dog-mcp/", env!("CARGO_PKG_VERSION"));

// =============================================================================
// Environment Variable Overrides
// =============================================================================

fn get_from_env<T: std::str::FromStr>(env_var: &str, default: T) -> T {
    std::env::var(env_var)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn get_bounded_from_env(env_var: &str, default: u32, min: u32, max: u32) -> u32 {
    let value = get_from_env(env_var, default);
    if (min..=max).contains(&value) { value } else { default }
}

fn get_ratio_from_env(env_var: &str, default: f64) -> f64 {
    let value = get_from_env(env_var, default);
    if value > 0.0 && value <= 1.0 { value } else { default }
}

/// Get the image API endpoint.
///
/// Override with: `LGTM_DOG_API_URL`
pub fn dog_api_url() -> String {
    std::env::var("LGTM_DOG_API_URL")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DOG_API_URL.to_string())
}

/// Get the per-request fetch timeout.
///
/// Override with: `LGTM_FETCH_TIMEOUT_MS`
pub fn fetch_timeout_ms() -> u64 {
    get_from_env("LGTM_FETCH_TIMEOUT_MS", FETCH_TIMEOUT_MS)
}

/// Get the retry count for transient fetch failures.
///
/// Override with: `LGTM_FETCH_MAX_RETRIES`
pub fn fetch_max_retries() -> u32 {
    get_from_env("LGTM_FETCH_MAX_RETRIES", FETCH_MAX_RETRIES)
}

/// Get the first retry delay.
///
/// Override with: `LGTM_FETCH_RETRY_BASE_DELAY_MS`
pub fn fetch_retry_base_delay_ms() -> u64 {
    get_from_env("LGTM_FETCH_RETRY_BASE_DELAY_MS", FETCH_RETRY_BASE_DELAY_MS)
}

/// Get the source image size limit.
///
/// Override with: `LGTM_MAX_SOURCE_BYTES`
pub fn max_source_bytes() -> u64 {
    get_from_env("LGTM_MAX_SOURCE_BYTES", MAX_SOURCE_BYTES)
}

/// Get the output directory override, if any.
///
/// Override with: `LGTM_OUTPUT_DIR`
pub fn output_dir_override() -> Option<PathBuf> {
    std::env::var_os("LGTM_OUTPUT_DIR")
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

/// Build the overlay configuration from defaults and overrides.
///
/// Override with: `LGTM_MIN_PIXEL_SIZE`, `LGTM_MAX_WIDTH_RATIO`,
/// `LGTM_MAX_HEIGHT_RATIO`, `LGTM_MAX_DECODE_DIMENSION`
///
/// # Example
///
/// ```bash
/// # Smaller marker, at most half the width
/// export LGTM_MAX_WIDTH_RATIO=0.5
/// ```
pub fn overlay_config() -> OverlayConfig {
    OverlayConfig {
        min_pixel_size: get_bounded_from_env(
            "LGTM_MIN_PIXEL_SIZE",
            DEFAULT_MIN_PIXEL_SIZE,
            1,
            MAX_MIN_PIXEL_SIZE,
        ),
        max_width_ratio: get_ratio_from_env("LGTM_MAX_WIDTH_RATIO", DEFAULT_MAX_WIDTH_RATIO),
        max_height_ratio: get_ratio_from_env("LGTM_MAX_HEIGHT_RATIO", DEFAULT_MAX_HEIGHT_RATIO),
        max_decode_dimension: get_from_env(
            "LGTM_MAX_DECODE_DIMENSION",
            DEFAULT_MAX_DECODE_DIMENSION,
        ),
        ..OverlayConfig::default()
    }
}
