use std::time::Duration;

use http::header::AUTHORIZATION;
use http::StatusCode;
use reqwest::Client;
use tracing::warn;

use crate::cache::token_cache::TokenCache;
use crate::config::loader::Credentials;
use crate::config::types::FetchConfig;
use crate::error::FetchError;
use crate::sources::{build_source, SourceKind};
use crate::utils::constants::STORAGE_API_BASE;

/// Authenticated object fetcher for one bucket.
///
/// Per call: request with the cached token; on the first 401 force one
/// token refresh and retry exactly once. A second 401, or any other
/// failure, propagates unchanged — this is the only retry policy in the
/// crate, and it never fires for generic network errors.
#[derive(Debug)]
pub struct GcsFetcher {
    cache: TokenCache<SourceKind>,
    client: Client,
    object_base: String,
}

impl GcsFetcher {
    pub fn new(fetch: &FetchConfig, credentials: Credentials) -> anyhow::Result<Self> {
        Self::with_api_base(fetch, credentials, STORAGE_API_BASE)
    }

    /// Same as [`GcsFetcher::new`] with a non-default storage API base,
    /// for emulators and tests.
    pub fn with_api_base(
        fetch: &FetchConfig,
        credentials: Credentials,
        api_base: &str,
    ) -> anyhow::Result<Self> {
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(fetch.connect_timeout_seconds))
            .timeout(Duration::from_secs(fetch.transfer_timeout_seconds));
        if !fetch.reuse_connections {
            builder = builder.pool_max_idle_per_host(0);
        }
        let client = builder.build()?;

        let source = build_source(credentials, client.clone());
        let cache = TokenCache::new(source, fetch.token_expiry_leeway_millis);
        let object_base = format!("{}/b/{}/o/", api_base, fetch.bucket_name);

        Ok(Self {
            cache,
            client,
            object_base,
        })
    }

    /// Fetches one object; `object_name` is expected URL-encoded already.
    pub async fn fetch_file(&self, object_name: &str) -> Result<Vec<u8>, FetchError> {
        let token = self.cache.get_token(false).await?;
        match self.get_object(object_name, &token).await {
            Err(FetchError::Unauthorized { .. }) => {
                warn!(object = object_name, "object fetch unauthorized, forcing token refresh");
                let token = self.cache.get_token(true).await?;
                self.get_object(object_name, &token).await
            }
            other => other,
        }
    }

    pub(crate) fn object_url(&self, object_name: &str) -> String {
        format!("{}{}?alt=media", self.object_base, object_name)
    }

    pub(crate) async fn cached_token(&self) -> Option<crate::cache::token::CachedToken> {
        self.cache.current().await
    }

    async fn get_object(&self, object_name: &str, token: &str) -> Result<Vec<u8>, FetchError> {
        let url = self.object_url(object_name);
        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(FetchError::Unauthorized {
                object: object_name.to_owned(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                object: object_name.to_owned(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
