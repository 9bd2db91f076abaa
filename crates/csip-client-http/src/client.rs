//! reqwest-backed transport.
//!
//! One `HttpTransport` serves one session: the base address and bearer
//! credential are fixed at construction and attached to every request.

use crate::transport::{Transport, TransportError, TransportResponse};
use csip_client_proto::SEP_XML;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// HTTP transport configuration.
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Base URL of the CSIP server (e.g., <https://localhost:8443>)
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Optional bearer token for authentication
    pub bearer_token: Option<String>,
    /// Custom CA certificate path for self-signed server certs (PEM format)
    pub ca_cert_path: Option<PathBuf>,
    /// Client certificate path for mTLS authentication (PEM format)
    pub client_cert_path: Option<PathBuf>,
    /// Client private key path for mTLS authentication (PEM format)
    pub client_key_path: Option<PathBuf>,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8443".to_string(),
            timeout: Duration::from_secs(30),
            bearer_token: None,
            ca_cert_path: None,
            client_cert_path: None,
            client_key_path: None,
        }
    }
}

/// HTTP transport for a CSIP server.
///
/// Cheap to clone; clones share one connection pool and TLS identity.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    config: HttpTransportConfig,
}

impl HttpTransport {
    /// Create a new transport.
    ///
    /// Over HTTPS the device authenticates with its client certificate and
    /// key; configuring only one of the two is an error.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is invalid, the HTTP client cannot be
    /// created, or TLS certificate files cannot be read or parsed.
    pub fn new(config: HttpTransportConfig) -> Result<Self, TransportError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| TransportError::Init(format!("invalid base URL {}: {e}", config.base_url)))?;

        let mut builder = Client::builder().timeout(config.timeout);

        if base_url.scheme() == "https" {
            builder = builder.use_rustls_tls();

            match device_identity(&config)? {
                Some(identity) => builder = builder.identity(identity),
                None => tracing::warn!(
                    base_url = %base_url,
                    "No client certificate configured; the server cannot identify this device"
                ),
            }

            if let Some(ca_path) = &config.ca_cert_path {
                let cert = reqwest::Certificate::from_pem(&read_pem("CA certificate", ca_path)?)
                    .map_err(|e| TransportError::Init(format!("failed to parse CA certificate: {e}")))?;
                builder = builder.add_root_certificate(cert);
                tracing::debug!(ca_path = %ca_path.display(), "Trusting server CA");
            }
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::Init(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// The base address hrefs are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an href against the base address.
    ///
    /// # Errors
    ///
    /// Returns error if the href cannot be joined onto the base URL.
    pub fn resolve(&self, href: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(href)
            .map_err(|e| TransportError::InvalidUri {
                uri: href.to_string(),
                reason: e.to_string(),
            })
    }

    /// Build the authorization header if configured.
    fn auth_header(&self) -> Option<String> {
        self.config
            .bearer_token
            .as_ref()
            .map(|t| format!("Bearer {t}"))
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<String>,
    ) -> Result<TransportResponse, TransportError> {
        let url = self.resolve(uri)?;

        tracing::debug!(%method, %url, "HTTP request");

        let mut request = self.client.request(method, url).header(ACCEPT, SEP_XML);
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, SEP_XML).body(body);
        }
        if let Some(auth) = self.auth_header() {
            request = request.header(AUTHORIZATION, auth);
        }

        let response = request.send().await.map_err(request_error)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await.map_err(request_error)?;

        tracing::debug!(status, content_type = ?content_type, len = body.len(), "HTTP response");

        Ok(TransportResponse {
            status,
            content_type,
            body,
        })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, uri: &str) -> Result<TransportResponse, TransportError> {
        self.send(Method::GET, uri, None).await
    }

    async fn post(&self, uri: &str, body: String) -> Result<TransportResponse, TransportError> {
        self.send(Method::POST, uri, Some(body)).await
    }

    async fn put(&self, uri: &str, body: String) -> Result<TransportResponse, TransportError> {
        self.send(Method::PUT, uri, Some(body)).await
    }
}

/// The certificate and key that identify this device, concatenated into one
/// PEM identity.
fn device_identity(config: &HttpTransportConfig) -> Result<Option<reqwest::Identity>, TransportError> {
    let (cert_path, key_path) = match (&config.client_cert_path, &config.client_key_path) {
        (Some(cert), Some(key)) => (cert, key),
        (None, None) => return Ok(None),
        (Some(_), None) => {
            return Err(TransportError::Init(
                "client certificate configured without a private key".to_string(),
            ))
        }
        (None, Some(_)) => {
            return Err(TransportError::Init(
                "client private key configured without a certificate".to_string(),
            ))
        }
    };

    let mut pem = read_pem("client certificate", cert_path)?;
    pem.extend_from_slice(&read_pem("client key", key_path)?);

    let identity = reqwest::Identity::from_pem(&pem)
        .map_err(|e| TransportError::Init(format!("failed to create device identity: {e}")))?;
    tracing::debug!(
        cert_path = %cert_path.display(),
        key_path = %key_path.display(),
        "Loaded device identity"
    );
    Ok(Some(identity))
}

fn read_pem(what: &str, path: &Path) -> Result<Vec<u8>, TransportError> {
    fs::read(path)
        .map_err(|e| TransportError::Init(format!("failed to read {what} {}: {e}", path.display())))
}

fn request_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Request(e.to_string())
    }
}
