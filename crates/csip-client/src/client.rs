//! The client a caller holds for one server session.

use crate::deadline::Deadline;
use crate::error::ClientError;
use crate::handshake::HandshakeState;
use crate::resolver::LinkResolver;
use crate::sender::CommandSender;
use csip_client_core::{
    ClientSession, DerAvailability, DerCapability, DerSettings, DerStatus, DeviceCapability, Link,
    LogEvent, MirrorUsagePoint, Resource,
};
use csip_client_http::Transport;
use std::time::Duration;

/// Timeouts applied on top of the transport's own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientOptions {
    /// Upper bound for any single request
    pub request_timeout: Option<Duration>,
    /// Upper bound for a whole handshake
    pub handshake_timeout: Option<Duration>,
}

/// A CSIP client: one transport, one session.
///
/// Traversal methods take `&mut self` since they write into the session;
/// only one handshake can be in flight at a time. Command methods take
/// `&self` and never touch the session.
pub struct CsipClient<T> {
    pub(crate) transport: T,
    pub(crate) options: ClientOptions,
    pub(crate) session: ClientSession,
    pub(crate) state: HandshakeState,
}

impl<T: Transport> CsipClient<T> {
    /// Create a client with default options.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self::with_options(transport, ClientOptions::default())
    }

    /// Create a client with explicit timeouts.
    #[must_use]
    pub fn with_options(transport: T, options: ClientOptions) -> Self {
        Self {
            transport,
            options,
            session: ClientSession::new(),
            state: HandshakeState::Init,
        }
    }

    /// Everything loaded so far.
    #[must_use]
    pub fn session(&self) -> &ClientSession {
        &self.session
    }

    /// Where the last handshake stands.
    #[must_use]
    pub fn state(&self) -> HandshakeState {
        self.state
    }

    /// The underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Configured timeouts.
    #[must_use]
    pub fn options(&self) -> ClientOptions {
        self.options
    }

    pub(crate) fn resolver(&self, deadline: Deadline) -> LinkResolver<'_, T> {
        LinkResolver::new(&self.transport, deadline, self.options.request_timeout)
    }

    /// A sender bound to this client's transport and request timeout.
    #[must_use]
    pub fn sender(&self) -> CommandSender<'_, T> {
        CommandSender::new(&self.transport, self.options.request_timeout)
    }

    // ── Commands ──────────────────────────────────────────────────────

    /// POST a log event.
    ///
    /// # Errors
    ///
    /// Returns `RequestFailed` or `Timeout` (see [`CommandSender::submit`]).
    pub async fn submit_event(&self, link: &Link, event: &LogEvent) -> Result<(), ClientError> {
        self.sender().submit(link, event).await
    }

    /// POST a mirror usage point for first-time registration.
    ///
    /// # Errors
    ///
    /// Returns `RequestFailed` or `Timeout` (see [`CommandSender::submit`]).
    pub async fn submit_usage_point(
        &self,
        link: &Link,
        mirror_usage_point: &MirrorUsagePoint,
    ) -> Result<(), ClientError> {
        self.sender().submit(link, mirror_usage_point).await
    }

    /// PUT a DER status.
    ///
    /// # Errors
    ///
    /// Returns `RequestFailed` or `Timeout` (see [`CommandSender::update`]).
    pub async fn update_der_status(&self, link: &Link, status: &DerStatus) -> Result<(), ClientError> {
        self.sender().update(link, status).await
    }

    /// PUT a DER capability.
    ///
    /// # Errors
    ///
    /// Returns `RequestFailed` or `Timeout` (see [`CommandSender::update`]).
    pub async fn update_der_capability(
        &self,
        link: &Link,
        capability: &DerCapability,
    ) -> Result<(), ClientError> {
        self.sender().update(link, capability).await
    }

    /// PUT DER settings.
    ///
    /// # Errors
    ///
    /// Returns `RequestFailed` or `Timeout` (see [`CommandSender::update`]).
    pub async fn update_der_settings(
        &self,
        link: &Link,
        settings: &DerSettings,
    ) -> Result<(), ClientError> {
        self.sender().update(link, settings).await
    }

    /// PUT a DER availability.
    ///
    /// # Errors
    ///
    /// Returns `RequestFailed` or `Timeout` (see [`CommandSender::update`]).
    pub async fn update_der_availability(
        &self,
        link: &Link,
        availability: &DerAvailability,
    ) -> Result<(), ClientError> {
        self.sender().update(link, availability).await
    }

    // ── Capability-level resources ───────────────────────────────────

    /// Load the usage point list linked from the capability document.
    ///
    /// # Errors
    ///
    /// Returns `Precondition` if the capability or its link is missing, and
    /// any resolver error.
    pub async fn load_usage_points(&mut self) -> Result<(), ClientError> {
        self.session.usage_point_list = Some(
            self.resolve_from_capability("usage point list link", |d| {
                d.usage_point_list_link.as_ref()
            })
            .await?,
        );
        Ok(())
    }

    /// Load the mirror usage point list linked from the capability document.
    ///
    /// # Errors
    ///
    /// Returns `Precondition` if the capability or its link is missing, and
    /// any resolver error.
    pub async fn load_mirror_usage_points(&mut self) -> Result<(), ClientError> {
        self.session.mirror_usage_point_list = Some(
            self.resolve_from_capability("mirror usage point list link", |d| {
                d.mirror_usage_point_list_link.as_ref()
            })
            .await?,
        );
        Ok(())
    }

    /// Load the response set list linked from the capability document.
    ///
    /// # Errors
    ///
    /// Returns `Precondition` if the capability or its link is missing, and
    /// any resolver error.
    pub async fn load_response_sets(&mut self) -> Result<(), ClientError> {
        self.session.response_set_list = Some(
            self.resolve_from_capability("response set list link", |d| {
                d.response_set_list_link.as_ref()
            })
            .await?,
        );
        Ok(())
    }

    /// Load the server time linked from the capability document.
    ///
    /// # Errors
    ///
    /// Returns `Precondition` if the capability or its link is missing, and
    /// any resolver error.
    pub async fn load_time(&mut self) -> Result<(), ClientError> {
        self.session.time =
            Some(self.resolve_from_capability("time link", |d| d.time_link.as_ref()).await?);
        Ok(())
    }

    async fn resolve_from_capability<R: Resource>(
        &self,
        what: &str,
        pick: fn(&DeviceCapability) -> Option<&Link>,
    ) -> Result<R, ClientError> {
        let capability = self
            .session
            .device_capability
            .as_ref()
            .ok_or_else(|| ClientError::precondition("device capability"))?;
        let link = pick(capability).ok_or_else(|| ClientError::precondition(what))?;

        self.resolver(Deadline::none()).resolve(link).await
    }
}
