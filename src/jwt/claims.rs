use serde::{Deserialize, Serialize};

use crate::utils::constants::STORAGE_READ_SCOPE;

/// Fixed validity of the signed assertion, half an hour.
///
/// A protocol constant of the JWT-bearer grant, unrelated to the
/// configurable expiry leeway of the *access* token it is exchanged for.
pub const ASSERTION_LIFETIME_SECONDS: i64 = 1800;

/// Claim set of the JWT-bearer assertion presented to the token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl AssertionClaims {
    /// Builds the claim set for `iss`, valid from `iat_seconds` for
    /// [`ASSERTION_LIFETIME_SECONDS`], requesting read-only storage access.
    pub fn new(iss: &str, aud: &str, iat_seconds: i64) -> Self {
        Self {
            iss: iss.to_owned(),
            scope: STORAGE_READ_SCOPE.to_owned(),
            aud: aud.to_owned(),
            iat: iat_seconds,
            exp: iat_seconds + ASSERTION_LIFETIME_SECONDS,
        }
    }
}
