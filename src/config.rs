//! Service configuration.
//!
//! Settings are resolved in layers, each overriding the one before:
//!
//! 1. stock defaults (below),
//! 2. an optional TOML file (`imgrelay.toml`, or `--config PATH`),
//! 3. environment variables.
//!
//! ## Config File
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [storage]
//! original_bucket = "imgrelay-original-files"
//! processed_bucket = "imgrelay-processed-files"
//! region = "us-east-1"
//! # endpoint = "http://localhost:9000"  # S3-compatible endpoint override
//! url_expiry_secs = 3600                 # Presigned download URL lifetime
//!
//! [limits]
//! max_upload_bytes = 26214400            # 25 MiB, measured after base64 decoding
//! max_output_pixels = 100000000          # Largest exact resize (width * height)
//!
//! [http]
//! semantic_status = false                # true: 400/500 transport status on failure
//! ```
//!
//! Files are sparse: override just the keys you need. Unknown keys are
//! rejected so typos surface immediately.
//!
//! ## Environment
//!
//! | Variable | Key |
//! |---|---|
//! | `ORIGINAL_BUCKET` | `storage.original_bucket` |
//! | `PROCESSED_BUCKET` | `storage.processed_bucket` |
//! | `AWS_REGION` | `storage.region` |
//! | `IMGRELAY_S3_ENDPOINT` | `storage.endpoint` |

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "imgrelay.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Complete service configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    pub storage: StorageConfig,
    pub limits: LimitsConfig,
    pub http: HttpConfig,
}

impl ServiceConfig {
    /// Validate config values are within acceptable ranges.
    ///
    /// Empty bucket names are allowed: persistence then reports
    /// `saved: false` instead of touching the network.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // S3 caps presigned URLs at seven days.
        if self.storage.url_expiry_secs == 0 || self.storage.url_expiry_secs > 604_800 {
            return Err(ConfigError::Validation(
                "storage.url_expiry_secs must be 1-604800".into(),
            ));
        }
        if self.limits.max_upload_bytes == 0 {
            return Err(ConfigError::Validation(
                "limits.max_upload_bytes must be non-zero".into(),
            ));
        }
        if self.limits.max_output_pixels == 0 {
            return Err(ConfigError::Validation(
                "limits.max_output_pixels must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// Apply environment overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|name| std::env::var(name).ok());
    }

    /// Apply environment overrides using `lookup` to read variables.
    ///
    /// Empty values are treated as unset.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(bucket) = var("ORIGINAL_BUCKET") {
            self.storage.original_bucket = bucket;
        }
        if let Some(bucket) = var("PROCESSED_BUCKET") {
            self.storage.processed_bucket = bucket;
        }
        if let Some(region) = var("AWS_REGION") {
            self.storage.region = region;
        }
        if let Some(endpoint) = var("IMGRELAY_S3_ENDPOINT") {
            self.storage.endpoint = Some(endpoint);
        }
    }
}

/// Object storage settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Bucket receiving the decoded upload.
    pub original_bucket: String,
    /// Bucket receiving transform output.
    pub processed_bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible stores (MinIO, LocalStack).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Lifetime of presigned download URLs, in seconds.
    pub url_expiry_secs: u64,
}

impl StorageConfig {
    pub fn url_expiry(&self) -> Duration {
        Duration::from_secs(self.url_expiry_secs)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            original_bucket: "imgrelay-original-files".to_string(),
            processed_bucket: "imgrelay-processed-files".to_string(),
            region: "us-east-1".to_string(),
            endpoint: None,
            url_expiry_secs: 3600,
        }
    }
}

/// Request size limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    /// Largest accepted upload after base64 decoding.
    pub max_upload_bytes: usize,
    /// Largest `width * height` an exact (non-aspect) resize may request.
    pub max_output_pixels: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 25 * 1024 * 1024,
            max_output_pixels: 100_000_000,
        }
    }
}

/// Response transport settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    /// Report failures with their semantic status (400/500) instead of 200.
    pub semantic_status: bool,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(ServiceConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional file layer onto the stock defaults and deserialize.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<ServiceConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ServiceConfig = merged.try_into()?;
    Ok(config)
}

/// Load the full configuration: defaults, then `path` (or
/// [`DEFAULT_CONFIG_FILE`]), then the environment. Validates the result.
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    let path = path.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
    let mut config = resolve_config(load_raw_config(path)?)?;
    config.apply_env();
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock config file.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# imgrelay configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.
#
# Environment variables override this file:
#   ORIGINAL_BUCKET, PROCESSED_BUCKET, AWS_REGION, IMGRELAY_S3_ENDPOINT

# ---------------------------------------------------------------------------
# Object storage
# ---------------------------------------------------------------------------
[storage]
# Bucket receiving every decoded upload, under originals/.
original_bucket = "imgrelay-original-files"

# Bucket receiving transform output, under processed/<operation>/.
processed_bucket = "imgrelay-processed-files"

region = "us-east-1"

# Custom endpoint for S3-compatible stores.
# endpoint = "http://localhost:9000"

# Lifetime of presigned download URLs, in seconds (max 604800).
url_expiry_secs = 3600

# ---------------------------------------------------------------------------
# Limits
# ---------------------------------------------------------------------------
[limits]
# Largest accepted upload, measured after base64 decoding (25 MiB).
max_upload_bytes = 26214400

# Largest output an exact resize (maintainRatio = false) may request, as
# width * height. Larger requests are rejected before anything is stored.
max_output_pixels = 100000000

# ---------------------------------------------------------------------------
# HTTP
# ---------------------------------------------------------------------------
[http]
# false: every response is transport status 200 and clients read `success`.
# true:  validation failures are 400, processing failures 500.
semantic_status = false
"##
}
