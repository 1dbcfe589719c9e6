use std::fmt;
use std::sync::Arc;

use reqwest::Client;
use tracing::debug;

use crate::config::key_file::ServiceAccountKey;
use crate::error::ExchangeError;
use crate::helpers::time::now_seconds;
use crate::jwt::{AssertionClaims, Rs256Signer, SignAssertion};
use crate::sources::{AccessTokenResponse, ExchangeTokens};
use crate::utils::constants::GRANT_TYPE_JWT_BEARER;

/// Token source performing the JWT-bearer grant with a service-account key.
///
/// The POST target and the assertion's `aud` are both the key file's
/// `token_uri`.
#[derive(Clone)]
pub struct ServiceAccountSource {
    iss: String,
    private_key_pem: String,
    token_uri: String,
    signer: Arc<dyn SignAssertion>,
    client: Client,
}

impl ServiceAccountSource {
    pub fn new(key: &ServiceAccountKey, client: Client) -> Self {
        Self::with_signer(key, Arc::new(Rs256Signer), client)
    }

    pub fn with_signer(
        key: &ServiceAccountKey,
        signer: Arc<dyn SignAssertion>,
        client: Client,
    ) -> Self {
        Self {
            iss: key.client_email.clone(),
            private_key_pem: key.private_key.clone(),
            token_uri: key.token_uri.clone(),
            signer,
            client,
        }
    }
}

impl ExchangeTokens for ServiceAccountSource {
    async fn exchange(&self) -> Result<AccessTokenResponse, ExchangeError> {
        let claims = AssertionClaims::new(&self.iss, &self.token_uri, now_seconds());
        let assertion = self.signer.sign(&claims, &self.private_key_pem)?;

        debug!(iss = %self.iss, "exchanging signed assertion for access token");
        let form = [
            ("grant_type", GRANT_TYPE_JWT_BEARER),
            ("assertion", assertion.as_str()),
        ];
        let response = self.client.post(&self.token_uri).form(&form).send().await?;
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

// Key material stays out of logs.
impl fmt::Debug for ServiceAccountSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountSource")
            .field("iss", &self.iss)
            .field("token_uri", &self.token_uri)
            .field("private_key_pem", &"redacted")
            .finish()
    }
}
