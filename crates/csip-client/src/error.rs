//! Error taxonomy of the client.

use csip_client_http::TransportError;
use csip_client_proto::CodecError;

/// Status reported by `RequestFailed` when the transport failed before the
/// server produced a status.
pub const FALLBACK_FAILURE_STATUS: u16 = 400;

/// Errors that can occur talking to a CSIP server.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A resource a step depends on has not been loaded
    #[error("precondition failed: {0} is not available")]
    Precondition(String),
    /// A GET response did not carry a recognized document
    #[error("unsupported media type (href: {href:?}, content type: {content_type:?})")]
    UnsupportedMediaType {
        /// Link that was resolved, `None` if the parent resource had no link
        href: Option<String>,
        /// `Content-Type` the server sent
        content_type: Option<String>,
    },
    /// The server answered with a non-success status
    #[error("request to {uri} failed with status {status}: {message}")]
    RequestFailed {
        /// Target of the request
        uri: String,
        /// HTTP status, or [`FALLBACK_FAILURE_STATUS`] if none was received
        status: u16,
        /// Response body or transport failure description
        message: String,
    },
    /// Two different aggregates were built for one LFDI in the same run
    #[error("device {lfdi} was discovered twice with different resources")]
    AggregationConflict {
        /// Canonical LFDI
        lfdi: String,
    },
    /// A deadline or the transport timeout expired
    #[error("request to {uri} timed out")]
    Timeout {
        /// Target of the request
        uri: String,
    },
    /// Transport failure during traversal
    #[error("transport error at {uri}: {source}")]
    Transport {
        /// Target of the request
        uri: String,
        /// Underlying failure
        #[source]
        source: TransportError,
    },
    /// Body could not be decoded or payload encoded
    #[error("codec error at {uri}: {source}")]
    Codec {
        /// Target of the request
        uri: String,
        /// Underlying failure
        #[source]
        source: CodecError,
    },
    /// The handshake stopped at an inner failure
    #[error("handshake failed: {0}")]
    HandshakeFailed(#[source] Box<ClientError>),
}

impl ClientError {
    pub(crate) fn precondition(what: impl Into<String>) -> Self {
        Self::Precondition(what.into())
    }

    /// The innermost error, looking through `HandshakeFailed`.
    #[must_use]
    pub fn root_cause(&self) -> &ClientError {
        match self {
            Self::HandshakeFailed(inner) => inner.root_cause(),
            other => other,
        }
    }

    /// HTTP status carried by a `RequestFailed`, wherever it is nested.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self.root_cause() {
            Self::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether a deadline expired.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self.root_cause(), Self::Timeout { .. })
    }
}
