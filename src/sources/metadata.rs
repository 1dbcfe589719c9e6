use reqwest::Client;
use tracing::debug;

use crate::error::ExchangeError;
use crate::sources::{AccessTokenResponse, ExchangeTokens};
use crate::utils::constants::{METADATA_FLAVOR_HEADER, METADATA_FLAVOR_VALUE};

/// Token source backed by the platform metadata server.
///
/// The metadata endpoint authenticates the caller by network origin; there
/// is no signing step.
#[derive(Debug, Clone)]
pub struct MetadataSource {
    account: String,
    base_url: String,
    client: Client,
}

impl MetadataSource {
    pub fn new(account: String, base_url: String, client: Client) -> Self {
        Self {
            account,
            base_url,
            client,
        }
    }

    fn token_url(&self) -> String {
        format!("{}{}/token", self.base_url, self.account)
    }
}

impl ExchangeTokens for MetadataSource {
    async fn exchange(&self) -> Result<AccessTokenResponse, ExchangeError> {
        let url = self.token_url();
        debug!(account = %self.account, "requesting workload-identity token");

        let response = self
            .client
            .get(&url)
            .header(METADATA_FLAVOR_HEADER, METADATA_FLAVOR_VALUE)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ExchangeError::Endpoint {
                status: response.status(),
            });
        }

        response
            .json::<AccessTokenResponse>()
            .await
            .map_err(ExchangeError::Decode)
    }
}
