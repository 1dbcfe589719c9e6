use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use crate::error::SigningError;
use crate::jwt::claims::AssertionClaims;

/// Capability boundary around JWS creation.
///
/// The token source never touches key material parsing or signature
/// primitives directly; any RS256-capable backend can sit behind this.
pub trait SignAssertion: Send + Sync {
    /// Signs `claims` with the PEM-encoded RSA private key into a compact
    /// JWT.
    fn sign(&self, claims: &AssertionClaims, private_key_pem: &str)
        -> Result<String, SigningError>;
}

/// RS256 signer backed by `jsonwebtoken`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rs256Signer;

impl SignAssertion for Rs256Signer {
    fn sign(
        &self,
        claims: &AssertionClaims,
        private_key_pem: &str,
    ) -> Result<String, SigningError> {
        let key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .map_err(SigningError::from)?;
        Ok(encode(&Header::new(Algorithm::RS256), claims, &key)?)
    }
}
