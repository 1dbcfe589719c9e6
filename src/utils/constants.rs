//! Shared constants and invariants

/// Google OAuth2 token endpoint; also the `aud` of service-account assertions.
pub const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

pub const STORAGE_API_BASE: &str = "https://storage.googleapis.com/storage/v1";

/// Read-only storage scope requested for every access token.
pub const STORAGE_READ_SCOPE: &str = "https://www.googleapis.com/auth/devstorage.read_only";

pub const GRANT_TYPE_JWT_BEARER: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

// Metadata-server workload identity
pub const METADATA_BASE_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/";
pub const METADATA_DEFAULT_ACCOUNT: &str = "default";
pub const METADATA_FLAVOR_HEADER: &str = "Metadata-Flavor";
pub const METADATA_FLAVOR_VALUE: &str = "Google";
