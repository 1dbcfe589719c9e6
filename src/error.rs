//! Error taxonomy of the token and fetch paths.
//!
//! Every error surfaces to the immediate caller; nothing in this crate
//! logs-and-swallows.

use http::StatusCode;
use thiserror::Error;

/// The RS256 backend failed to produce an assertion JWT.
///
/// Fatal for the exchange attempt it occurred in; never retried and no
/// fallback algorithm is tried.
#[derive(Debug, Error)]
#[error("failed to sign assertion: {0}")]
pub struct SigningError(#[from] jsonwebtoken::errors::Error);

/// A token exchange attempt failed.
///
/// Fatal for the `get_token` call: no stale token is substituted and the
/// cache keeps its prior state.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error(transparent)]
    Signing(#[from] SigningError),

    /// The token endpoint answered with a non-success status.
    #[error("token endpoint returned {status}")]
    Endpoint { status: StatusCode },

    /// The token endpoint answered 2xx but the body was not an
    /// `AccessTokenResponse`.
    #[error("failed to decode token response: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("token request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// An object fetch failed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Token acquisition failed before or during the fetch.
    #[error(transparent)]
    Auth(#[from] ExchangeError),

    /// The storage endpoint answered 401. The first occurrence per call
    /// triggers one forced token refresh and retry; the second is terminal.
    #[error("unauthorized fetching object '{object}'")]
    Unauthorized { object: String },

    /// Any other non-success status. Never retried.
    #[error("object fetch returned {status} for '{object}'")]
    Status { status: StatusCode, object: String },

    /// Network failure or timeout. Never retried.
    #[error("object fetch failed: {0}")]
    Transport(#[from] reqwest::Error),
}
