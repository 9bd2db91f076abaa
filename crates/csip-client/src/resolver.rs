//! Single-link resolution.
//!
//! One GET per call. The response must carry a recognized XML media type
//! before anything else is looked at; a recognized document with a failure
//! status is reported as `RequestFailed`.

use crate::deadline::Deadline;
use crate::error::ClientError;
use csip_client_core::{Link, Resource};
use csip_client_http::{Transport, TransportError};
use csip_client_proto::{decode, is_document};
use std::time::Duration;

/// Resolves links into typed resources through a transport.
pub struct LinkResolver<'a, T> {
    transport: &'a T,
    deadline: Deadline,
    request_timeout: Option<Duration>,
}

impl<'a, T: Transport> LinkResolver<'a, T> {
    /// Create a resolver bounded by `deadline`, with an optional per-request
    /// timeout on top of it.
    #[must_use]
    pub fn new(transport: &'a T, deadline: Deadline, request_timeout: Option<Duration>) -> Self {
        Self {
            transport,
            deadline,
            request_timeout,
        }
    }

    /// Fetch `link` and decode it as `R`.
    ///
    /// # Errors
    ///
    /// - `UnsupportedMediaType` if the response has no document media type
    /// - `RequestFailed` if the status is not 2xx
    /// - `Codec` if the body is not an `R` document
    /// - `Timeout` / `Transport` if no response arrives
    pub async fn resolve<R: Resource>(&self, link: &Link) -> Result<R, ClientError> {
        let uri = link.href();
        let deadline = self.deadline.earliest(Deadline::after(self.request_timeout));

        tracing::debug!(uri, expected = R::ROOT, "Resolving link");

        let response = deadline
            .guard(uri, self.transport.get(uri))
            .await?
            .map_err(|e| traversal_error(uri, e))?;

        if !is_document(response.content_type.as_deref()) {
            tracing::warn!(
                uri,
                status = response.status,
                content_type = ?response.content_type,
                "Response is not a recognized document"
            );
            return Err(ClientError::UnsupportedMediaType {
                href: Some(uri.to_string()),
                content_type: response.content_type,
            });
        }

        if !response.is_success() {
            tracing::warn!(uri, status = response.status, "GET failed");
            return Err(ClientError::RequestFailed {
                uri: uri.to_string(),
                status: response.status,
                message: response.body,
            });
        }

        decode::<R>(&response.body).map_err(|source| ClientError::Codec {
            uri: uri.to_string(),
            source,
        })
    }

    /// Fetch `link` if the parent resource had one.
    ///
    /// Returns the link alongside the resource so callers can key by it.
    ///
    /// # Errors
    ///
    /// Same as [`LinkResolver::resolve`].
    pub async fn resolve_optional<R: Resource>(
        &self,
        link: Option<&Link>,
    ) -> Result<Option<(Link, R)>, ClientError> {
        match link {
            Some(link) => Ok(Some((link.clone(), self.resolve(link).await?))),
            None => Ok(None),
        }
    }
}

fn traversal_error(uri: &str, e: TransportError) -> ClientError {
    match e {
        TransportError::Timeout => ClientError::Timeout {
            uri: uri.to_string(),
        },
        source => ClientError::Transport {
            uri: uri.to_string(),
            source,
        },
    }
}
