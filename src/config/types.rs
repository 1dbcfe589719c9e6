use serde::Deserialize;

use crate::config::settings::LoggingConfig;
use crate::utils::constants::{METADATA_BASE_URL, METADATA_DEFAULT_ACCOUNT};

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub fetch: FetchConfig,
    pub credentials: CredentialsConfig,
    pub logging: Option<LoggingConfig>,
}

/// ================================
/// Object fetching
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct FetchConfig {
    pub bucket_name: String,
    #[serde(default = "default_connect_timeout_seconds")]
    pub connect_timeout_seconds: u64,
    #[serde(default = "default_transfer_timeout_seconds")]
    pub transfer_timeout_seconds: u64,
    /// Off by default: every request gets a fresh connection.
    #[serde(default)]
    pub reuse_connections: bool,
    /// Applied at token validity-check time only.
    #[serde(default)]
    pub token_expiry_leeway_millis: i64,
}

/// ================================
/// Credential source selector
/// ================================
///
/// Exactly one variant per fetcher instance, immutable for its lifetime.
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialsConfig {
    ServiceAccount {
        /// Path to a JSON key file.
        key_file: Option<String>,
        /// Inline key file content, alternative to `key_file`.
        key: Option<String>,
    },
    WorkloadIdentity {
        #[serde(default = "default_metadata_account")]
        account: String,
        #[serde(default = "default_metadata_base_url")]
        base_url: String,
    },
}

fn default_connect_timeout_seconds() -> u64 {
    3
}

fn default_transfer_timeout_seconds() -> u64 {
    12
}

fn default_metadata_account() -> String {
    METADATA_DEFAULT_ACCOUNT.to_string()
}

fn default_metadata_base_url() -> String {
    METADATA_BASE_URL.to_string()
}
