//! CLI configuration.

use anyhow::{Context, Result};
use csip_client::ClientOptions;
use csip_client_http::HttpTransportConfig;
use std::path::PathBuf;
use std::time::Duration;

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Transport settings
    pub transport: HttpTransportConfig,

    /// Client timeouts
    pub options: ClientOptions,

    /// Path of the device capability resource
    pub dcap_path: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            transport: HttpTransportConfig::default(),
            options: ClientOptions::default(),
            dcap_path: "/dcap".to_string(),
        }
    }
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CSIP_BASE_URL`: Server base URL
    /// - `CSIP_DCAP_PATH`: Device capability path (default `/dcap`)
    /// - `CSIP_BEARER_TOKEN`: Bearer token
    /// - `CSIP_CA_CERT`: CA certificate (PEM)
    /// - `CSIP_CLIENT_CERT`: Client certificate for mTLS (PEM)
    /// - `CSIP_CLIENT_KEY`: Client private key for mTLS (PEM)
    /// - `CSIP_TIMEOUT_SECS`: Per-request timeout in seconds
    /// - `CSIP_HANDSHAKE_TIMEOUT_SECS`: Whole-handshake timeout in seconds
    ///
    /// # Errors
    ///
    /// Returns error if a timeout is not a whole number of seconds.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`CliConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup("CSIP_BASE_URL") {
            config.transport.base_url = url;
        }

        if let Some(path) = lookup("CSIP_DCAP_PATH") {
            config.dcap_path = path;
        }

        if let Some(token) = lookup("CSIP_BEARER_TOKEN") {
            config.transport.bearer_token = Some(token);
        }

        if let Some(path) = lookup("CSIP_CA_CERT") {
            config.transport.ca_cert_path = Some(PathBuf::from(path));
        }

        if let Some(path) = lookup("CSIP_CLIENT_CERT") {
            config.transport.client_cert_path = Some(PathBuf::from(path));
        }

        if let Some(path) = lookup("CSIP_CLIENT_KEY") {
            config.transport.client_key_path = Some(PathBuf::from(path));
        }

        if let Some(secs) = lookup("CSIP_TIMEOUT_SECS") {
            let timeout = parse_secs(&secs).context("Invalid CSIP_TIMEOUT_SECS")?;
            config.transport.timeout = timeout;
            config.options.request_timeout = Some(timeout);
        }

        if let Some(secs) = lookup("CSIP_HANDSHAKE_TIMEOUT_SECS") {
            config.options.handshake_timeout =
                Some(parse_secs(&secs).context("Invalid CSIP_HANDSHAKE_TIMEOUT_SECS")?);
        }

        Ok(config)
    }
}

fn parse_secs(value: &str) -> Result<Duration> {
    let secs: u64 = value.trim().parse()?;
    Ok(Duration::from_secs(secs))
}
