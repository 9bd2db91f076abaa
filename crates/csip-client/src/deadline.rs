//! Deadlines threaded through resolver and sender calls.

use crate::error::ClientError;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Point in time after which pending requests are abandoned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    /// No deadline.
    #[must_use]
    pub const fn none() -> Self {
        Self(None)
    }

    /// Expire at `instant`.
    #[must_use]
    pub const fn at(instant: Instant) -> Self {
        Self(Some(instant))
    }

    /// Expire `timeout` from now, or never if `None`.
    #[must_use]
    pub fn after(timeout: Option<Duration>) -> Self {
        Self(timeout.map(|t| Instant::now() + t))
    }

    /// The earlier of two deadlines.
    #[must_use]
    pub fn earliest(self, other: Self) -> Self {
        match (self.0, other.0) {
            (Some(a), Some(b)) => Self(Some(a.min(b))),
            (a, b) => Self(a.or(b)),
        }
    }

    /// When the deadline expires, if ever.
    #[must_use]
    pub fn instant(&self) -> Option<Instant> {
        self.0
    }

    /// Run `fut`, failing with `Timeout` for `uri` if the deadline passes.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Timeout` on expiry.
    pub async fn guard<F: Future>(self, uri: &str, fut: F) -> Result<F::Output, ClientError> {
        match self.0 {
            None => Ok(fut.await),
            Some(at) => tokio::time::timeout_at(at, fut)
                .await
                .map_err(|_| ClientError::Timeout {
                    uri: uri.to_string(),
                }),
        }
    }
}
