use tokio::sync::Mutex;
use tracing::debug;

use crate::cache::token::CachedToken;
use crate::error::ExchangeError;
use crate::helpers::time::now_millis;
use crate::sources::ExchangeTokens;

/// Single-slot access-token cache over one exchange source.
///
/// The lock is held across the network round-trip of a refresh: at most one
/// refresh is in flight per cache, and every caller — including ones whose
/// cached token is still valid — queues behind it. Each fetcher owns its
/// own cache; there is no process-wide state.
#[derive(Debug)]
pub struct TokenCache<S> {
    source: S,
    leeway_millis: i64,
    slot: Mutex<Option<CachedToken>>,
}

impl<S: ExchangeTokens> TokenCache<S> {
    pub fn new(source: S, leeway_millis: i64) -> Self {
        Self {
            source,
            leeway_millis,
            slot: Mutex::new(None),
        }
    }

    /// Returns the cached token value, refreshing it first if it is absent,
    /// expired per the leeway rule, or `force_refresh` is set.
    ///
    /// On exchange failure the error propagates unchanged and the slot keeps
    /// its prior state; the slot is only replaced once the exchange has
    /// completed, so a canceled call cannot leave it partially updated.
    pub async fn get_token(&self, force_refresh: bool) -> Result<String, ExchangeError> {
        let mut slot = self.slot.lock().await;

        if let Some(token) = slot.as_ref() {
            if !force_refresh && token.is_usable(now_millis(), self.leeway_millis) {
                return Ok(token.value.clone());
            }
        }

        debug!(force_refresh, "refreshing access token");
        let response = self.source.exchange().await?;
        let token = CachedToken::from_response(&response, now_millis());
        let value = token.value.clone();
        *slot = Some(token);
        Ok(value)
    }

    /// Snapshot of the current slot, for diagnostics.
    pub async fn current(&self) -> Option<CachedToken> {
        self.slot.lock().await.clone()
    }
}
