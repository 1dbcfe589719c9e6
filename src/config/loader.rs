use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::config::key_file::ServiceAccountKey;
use crate::config::types::{CredentialsConfig, ServiceConfig};

/// Credential source with its key material resolved and validated.
#[derive(Debug, Clone)]
pub enum Credentials {
    ServiceAccount(ServiceAccountKey),
    WorkloadIdentity { account: String, base_url: String },
}

pub async fn load_config(config_path: impl AsRef<Path>) -> Result<ServiceConfig> {
    let path = config_path.as_ref();
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    serde_yaml::from_str(&content).map_err(|e| anyhow!("invalid config format: {}", e))
}

/// Resolves the configured credential selector into usable credentials.
///
/// A `service_account` entry must carry exactly one of `key_file` / `key`.
pub async fn load_credentials(config: &CredentialsConfig) -> Result<Credentials> {
    match config {
        CredentialsConfig::ServiceAccount { key_file, key } => {
            let content = match (key_file, key) {
                (Some(path), None) => tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("failed to read key file {}", path))?,
                (None, Some(inline)) => inline.clone(),
                (Some(_), Some(_)) => {
                    return Err(anyhow!(
                        "service_account credentials: 'key_file' and 'key' are mutually exclusive"
                    ))
                }
                (None, None) => {
                    return Err(anyhow!(
                        "service_account credentials: one of 'key_file' or 'key' is required"
                    ))
                }
            };
            let key = ServiceAccountKey::parse(&content)
                .map_err(|e| anyhow!("invalid service-account key file: {}", e))?;
            Ok(Credentials::ServiceAccount(key))
        }
        CredentialsConfig::WorkloadIdentity { account, base_url } => {
            Ok(Credentials::WorkloadIdentity {
                account: account.clone(),
                base_url: base_url.clone(),
            })
        }
    }
}
