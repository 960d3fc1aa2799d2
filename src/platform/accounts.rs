//! Account-token providers
//!
//! The API client never stores credentials of its own. Every config refresh
//! asks an [`AccountProvider`] for the current service statuses and takes the
//! first authenticated one.

use serde::Deserialize;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Environment variable holding an OAuth access token
pub const ACCESS_TOKEN_ENV: &str = "VIMEO_ACCESS_TOKEN";
/// Environment variable holding an application client id
pub const CLIENT_ID_ENV: &str = "VIMEO_CLIENT_ID";
/// Environment variable holding an application client secret
pub const CLIENT_SECRET_ENV: &str = "VIMEO_CLIENT_SECRET";

/// Authentication state of one account as reported by a provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServiceStatus {
    pub authenticated: bool,
    pub access_token: String,
    pub client_id: String,
    pub client_secret: String,
}

impl ServiceStatus {
    /// Status of an account holding an OAuth access token
    pub fn with_token(access_token: &str) -> Self {
        Self {
            authenticated: true,
            access_token: access_token.to_string(),
            ..Self::default()
        }
    }
}

/// Source of account credentials, queried afresh on every config refresh
pub trait AccountProvider: Send + Sync {
    fn service_statuses(&self) -> Vec<ServiceStatus>;
}

/// Provider that never reports an account
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAccounts;

impl AccountProvider for NoAccounts {
    fn service_statuses(&self) -> Vec<ServiceStatus> {
        Vec::new()
    }
}

/// Provider with a fixed list of statuses
#[derive(Debug, Clone, Default)]
pub struct StaticAccounts(pub Vec<ServiceStatus>);

impl AccountProvider for StaticAccounts {
    fn service_statuses(&self) -> Vec<ServiceStatus> {
        self.0.clone()
    }
}

/// Provider reading credentials from the process environment on every call
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvAccounts;

impl AccountProvider for EnvAccounts {
    fn service_statuses(&self) -> Vec<ServiceStatus> {
        let read = |name: &str| std::env::var(name).unwrap_or_default();

        let status = ServiceStatus {
            authenticated: false,
            access_token: read(ACCESS_TOKEN_ENV),
            client_id: read(CLIENT_ID_ENV),
            client_secret: read(CLIENT_SECRET_ENV),
        };

        let has_app_credentials = !status.client_id.is_empty() && !status.client_secret.is_empty();
        if status.access_token.is_empty() && !has_app_credentials {
            return Vec::new();
        }

        vec![ServiceStatus {
            authenticated: true,
            ..status
        }]
    }
}

/// Provider re-reading a JSON array of [`ServiceStatus`] from disk on every call
#[derive(Debug, Clone)]
pub struct FileAccounts {
    path: PathBuf,
}

impl FileAccounts {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl AccountProvider for FileAccounts {
    fn service_statuses(&self) -> Vec<ServiceStatus> {
        let contents = match std::fs::read(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read accounts file {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Vec<ServiceStatus>>(&contents) {
            Ok(statuses) => {
                debug!("Loaded {} account statuses from {}", statuses.len(), self.path.display());
                statuses
            }
            Err(e) => {
                warn!("Malformed accounts file {}: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }
}
