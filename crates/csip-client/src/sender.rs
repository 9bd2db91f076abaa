//! Pushing payloads to the server.
//!
//! POST for one-shot submissions (log events, first registration of a
//! mirror usage point), PUT for state the server keeps a single copy of
//! (DER status, capability, settings, availability). No retries; repeating
//! a call is the caller's decision.

use crate::deadline::Deadline;
use crate::error::{ClientError, FALLBACK_FAILURE_STATUS};
use csip_client_core::{Link, Resource};
use csip_client_http::{Transport, TransportError, TransportResponse};
use csip_client_proto::encode;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Post,
    Put,
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verb::Post => write!(f, "POST"),
            Verb::Put => write!(f, "PUT"),
        }
    }
}

/// Sends payloads to caller-supplied links.
///
/// Holds only a transport reference, so any number of senders may run
/// alongside each other and alongside a handshake.
pub struct CommandSender<'a, T> {
    transport: &'a T,
    deadline: Deadline,
    request_timeout: Option<Duration>,
}

impl<'a, T: Transport> CommandSender<'a, T> {
    /// Create a sender with an optional per-request timeout.
    #[must_use]
    pub fn new(transport: &'a T, request_timeout: Option<Duration>) -> Self {
        Self {
            transport,
            deadline: Deadline::none(),
            request_timeout,
        }
    }

    /// Bound every request by `deadline` in addition to the request timeout.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = deadline;
        self
    }

    /// POST `payload` to `link`.
    ///
    /// # Errors
    ///
    /// Returns `RequestFailed` with the server's status on a non-2xx
    /// response, or with [`FALLBACK_FAILURE_STATUS`] if the transport failed
    /// first; `Timeout` if a deadline expired.
    pub async fn submit<P: Resource>(&self, link: &Link, payload: &P) -> Result<(), ClientError> {
        self.send(Verb::Post, link, payload).await
    }

    /// PUT `payload` to `link`.
    ///
    /// # Errors
    ///
    /// Same as [`CommandSender::submit`].
    pub async fn update<P: Resource>(&self, link: &Link, payload: &P) -> Result<(), ClientError> {
        self.send(Verb::Put, link, payload).await
    }

    async fn send<P: Resource>(&self, verb: Verb, link: &Link, payload: &P) -> Result<(), ClientError> {
        let uri = link.href();
        let body = encode(payload).map_err(|source| ClientError::Codec {
            uri: uri.to_string(),
            source,
        })?;
        let deadline = self.deadline.earliest(Deadline::after(self.request_timeout));

        tracing::debug!(%verb, uri, payload = P::ROOT, "Sending payload");

        let result = match verb {
            Verb::Post => deadline.guard(uri, self.transport.post(uri, body)).await?,
            Verb::Put => deadline.guard(uri, self.transport.put(uri, body)).await?,
        };

        classify(verb, uri, result)
    }
}

fn classify(
    verb: Verb,
    uri: &str,
    result: Result<TransportResponse, TransportError>,
) -> Result<(), ClientError> {
    let response = match result {
        Ok(response) => response,
        Err(TransportError::Timeout) => {
            return Err(ClientError::Timeout {
                uri: uri.to_string(),
            })
        }
        Err(e) => {
            tracing::warn!(%verb, uri, error = %e, "Transport failed before a status was received");
            return Err(ClientError::RequestFailed {
                uri: uri.to_string(),
                status: FALLBACK_FAILURE_STATUS,
                message: e.to_string(),
            });
        }
    };

    if !response.is_success() {
        tracing::warn!(%verb, uri, status = response.status, "Request rejected");
        return Err(ClientError::RequestFailed {
            uri: uri.to_string(),
            status: response.status,
            message: response.body,
        });
    }

    tracing::debug!(%verb, uri, status = response.status, "Request accepted");
    Ok(())
}
