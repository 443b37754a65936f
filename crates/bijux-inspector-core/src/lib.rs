// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use sha2::{Digest, Sha256};

pub mod canonical;
pub mod identity;

pub const CRATE_NAME: &str = "bijux-inspector-core";

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    Usage = 2,
    Validation = 3,
    DependencyFailure = 4,
    Internal = 10,
}

pub const ENV_INSPECTOR_LOG_JSON: &str = "INSPECTOR_LOG_JSON";
pub const ENV_INSPECTOR_FILTER_DEBOUNCE_MS: &str = "INSPECTOR_FILTER_DEBOUNCE_MS";
pub const ENV_INSPECTOR_CROSS_QUERY_DEBOUNCE_MS: &str = "INSPECTOR_CROSS_QUERY_DEBOUNCE_MS";
pub const ENV_INSPECTOR_CATEGORY_DEBOUNCE_MS: &str = "INSPECTOR_CATEGORY_DEBOUNCE_MS";
pub const ENV_INSPECTOR_SCHEMA_CACHE_CAPACITY: &str = "INSPECTOR_SCHEMA_CACHE_CAPACITY";
pub const ENV_INSPECTOR_PERF_CAPACITY: &str = "INSPECTOR_PERF_CAPACITY";
pub const ENV_INSPECTOR_SAMPLE_FAST: &str = "INSPECTOR_SAMPLE_FAST";
pub const ENV_INSPECTOR_SAMPLE_BALANCED: &str = "INSPECTOR_SAMPLE_BALANCED";
pub const ENV_INSPECTOR_SAMPLE_FULL: &str = "INSPECTOR_SAMPLE_FULL";

#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Milliseconds since the unix epoch, or 0 when the clock is before it.
#[must_use]
pub fn unix_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
