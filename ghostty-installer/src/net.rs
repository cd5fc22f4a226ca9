//! Centralized logic for initializing http clients to
//! ensure uniform configuration.

use std::time::Duration;

use axoasset::reqwest;

use crate::config::{Config, DEFAULT_HTTP_TIMEOUT};
use crate::errors::{InstallerError, InstallerResult};

/// Settings for http clients
///
/// Any settings that should apply to all http requests should
/// be stored here, to avoid different configurations.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Upper bound on a whole request, body included
    pub timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

impl ClientSettings {
    /// Create new ClientSettings using all necessary values
    pub fn new(cfg: &Config) -> Self {
        Self {
            timeout: cfg.http_timeout,
        }
    }
}

fn create_reqwest_client(settings: &ClientSettings) -> InstallerResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(settings.timeout)
        .user_agent(concat!("ghostty-installer/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|details| InstallerError::HttpClient { details })
}

/// Create an AxoClient
///
/// Ideally this should be called only once and reused!
pub fn create_axoasset_client(settings: &ClientSettings) -> InstallerResult<axoasset::AxoClient> {
    let client = create_reqwest_client(settings)?;
    Ok(axoasset::AxoClient::with_reqwest(client))
}
