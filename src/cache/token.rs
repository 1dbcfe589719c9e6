use crate::sources::AccessTokenResponse;

/// Access token with its absolute expiration.
///
/// Owned exclusively by the cache; replaced whole on refresh, never
/// mutated in place.
#[derive(Debug, Clone)]
pub struct CachedToken {
    pub value: String,
    pub expires_at_millis: i64,
}

impl CachedToken {
    pub fn new(value: String, expires_at_millis: i64) -> Self {
        Self {
            value,
            expires_at_millis,
        }
    }

    pub fn from_response(response: &AccessTokenResponse, now_millis: i64) -> Self {
        Self {
            value: response.access_token.clone(),
            expires_at_millis: now_millis + response.expires_in as i64 * 1000,
        }
    }

    /// Usable iff `now - leeway < expires_at`. Leeway is applied here,
    /// at check time only, never baked into the stored expiry.
    pub fn is_usable(&self, now_millis: i64, leeway_millis: i64) -> bool {
        now_millis - leeway_millis < self.expires_at_millis
    }
}
