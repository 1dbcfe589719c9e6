//! Token sources
//!
//! The two ways this crate obtains an access token, behind one capability:
//! [`ExchangeTokens::exchange`]. The cache is agnostic to which variant it
//! holds.

use serde::Deserialize;

use crate::config::loader::Credentials;
use crate::error::ExchangeError;

pub mod metadata;
pub mod service_account;

use metadata::MetadataSource;
use reqwest::Client;
use service_account::ServiceAccountSource;

/// Wire shape shared by the OAuth2 token endpoint and the metadata server.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
    /// Lifetime in seconds, relative to the moment of issuance.
    pub expires_in: u64,
    pub token_type: String,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Exchanges the configured credential for a fresh access token.
pub trait ExchangeTokens {
    fn exchange(
        &self,
    ) -> impl std::future::Future<Output = Result<AccessTokenResponse, ExchangeError>> + Send;
}

#[derive(Debug, Clone)]
pub enum SourceKind {
    ServiceAccount(ServiceAccountSource),
    Metadata(MetadataSource),
}

impl ExchangeTokens for SourceKind {
    async fn exchange(&self) -> Result<AccessTokenResponse, ExchangeError> {
        match self {
            SourceKind::ServiceAccount(s) => s.exchange().await,
            SourceKind::Metadata(s) => s.exchange().await,
        }
    }
}

pub fn build_source(credentials: Credentials, client: Client) -> SourceKind {
    match credentials {
        Credentials::ServiceAccount(key) => {
            SourceKind::ServiceAccount(ServiceAccountSource::new(&key, client))
        }
        Credentials::WorkloadIdentity { account, base_url } => {
            SourceKind::Metadata(MetadataSource::new(account, base_url, client))
        }
    }
}
