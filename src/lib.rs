//! # GCS Fetcher Library
//!
//! Fetches objects from a Google Cloud Storage bucket over HTTPS,
//! authorizing each request with a cached short-lived bearer token
//! obtained from either a service-account JWT-bearer exchange or the
//! platform metadata server.
//!
//! Modules:
//! - `config` — service configuration and credential file types
//! - `cache` — single-slot access-token cache
//! - `sources` — service-account and workload-identity token sources
//! - `jwt` — assertion claims and the RS256 signing boundary
//! - `fetcher` — the authenticated object fetcher

pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod helpers;
pub mod jwt;
pub mod sources;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::config::loader::{load_config, load_credentials};
pub use crate::config::types::{CredentialsConfig, FetchConfig, ServiceConfig};
pub use crate::error::{ExchangeError, FetchError, SigningError};
pub use crate::fetcher::gcs::GcsFetcher;
pub use crate::sources::AccessTokenResponse;
