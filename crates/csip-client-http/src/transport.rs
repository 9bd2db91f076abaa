//! Transport abstraction.

use std::future::Future;
use std::sync::Arc;

/// What the server sent back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// `Content-Type` header, if the server sent one
    pub content_type: Option<String>,
    /// Response body, fully read
    pub body: String,
}

impl TransportResponse {
    /// Whether the status is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues requests against the server.
///
/// Implementations attach whatever session-wide headers they carry (base
/// address, authorization) to every request. Every call reads the body to
/// completion before returning.
///
/// Implemented for `&T` and `Arc<T>` so one transport can back a client
/// that is mid-handshake and any number of command senders at once.
pub trait Transport: Send + Sync {
    /// GET `uri`.
    fn get(&self, uri: &str) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send;

    /// POST `body` to `uri`.
    fn post(
        &self,
        uri: &str,
        body: String,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send;

    /// PUT `body` to `uri`.
    fn put(
        &self,
        uri: &str,
        body: String,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send;
}

impl<T: Transport> Transport for &T {
    fn get(&self, uri: &str) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send {
        (**self).get(uri)
    }

    fn post(
        &self,
        uri: &str,
        body: String,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send {
        (**self).post(uri, body)
    }

    fn put(
        &self,
        uri: &str,
        body: String,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send {
        (**self).put(uri, body)
    }
}

impl<T: Transport> Transport for Arc<T> {
    fn get(&self, uri: &str) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send {
        (**self).get(uri)
    }

    fn post(
        &self,
        uri: &str,
        body: String,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send {
        (**self).post(uri, body)
    }

    fn put(
        &self,
        uri: &str,
        body: String,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send {
        (**self).put(uri, body)
    }
}

/// Errors that can occur before a response status is available.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Transport initialization failed
    #[error("transport init error: {0}")]
    Init(String),
    /// The href cannot be resolved against the base address
    #[error("invalid uri {uri:?}: {reason}")]
    InvalidUri {
        /// Offending href
        uri: String,
        /// Why it was rejected
        reason: String,
    },
    /// Connection, TLS, or I/O failure
    #[error("request error: {0}")]
    Request(String),
    /// The transport's own timeout elapsed
    #[error("request timed out")]
    Timeout,
}
