//! Handshake orchestration.
//!
//! ```text
//! Init ──► CapabilityLoaded ──► DevicesLoaded ──► DeviceDataLoaded
//!   │              │                  │
//!   └──────────────┴──────────────────┴──► Failed
//! ```
//!
//! Steps run strictly in sequence and the first failure stops the run.
//! Capability and device list are replaced on every handshake; device
//! aggregates are merged into what earlier handshakes registered.

use crate::aggregator::ResourceAggregator;
use crate::client::CsipClient;
use crate::deadline::Deadline;
use crate::error::ClientError;
use crate::resolver::LinkResolver;
use csip_client_core::{ClientAggregate, DeviceCapability, EndDeviceList, Link};
use csip_client_http::Transport;
use std::collections::HashMap;

/// Progress of a handshake.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HandshakeState {
    /// Nothing loaded yet
    #[default]
    Init,
    /// Device capability loaded
    CapabilityLoaded,
    /// End device list loaded
    DevicesLoaded,
    /// Every device aggregated and registered
    DeviceDataLoaded,
    /// A step failed
    Failed,
}

impl std::fmt::Display for HandshakeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandshakeState::Init => write!(f, "init"),
            HandshakeState::CapabilityLoaded => write!(f, "capability-loaded"),
            HandshakeState::DevicesLoaded => write!(f, "devices-loaded"),
            HandshakeState::DeviceDataLoaded => write!(f, "device-data-loaded"),
            HandshakeState::Failed => write!(f, "failed"),
        }
    }
}

impl<T: Transport> CsipClient<T> {
    /// Discover the server's tree starting at the capability `endpoint`.
    ///
    /// Bounded by the configured handshake timeout, if any.
    ///
    /// # Errors
    ///
    /// Returns `HandshakeFailed` wrapping the first step's error.
    pub async fn handshake(&mut self, endpoint: &str) -> Result<(), ClientError> {
        let deadline = Deadline::after(self.options.handshake_timeout);
        self.handshake_with_deadline(endpoint, deadline).await
    }

    /// Discover the server's tree, abandoning it once `deadline` passes.
    ///
    /// # Errors
    ///
    /// Returns `HandshakeFailed` wrapping the first step's error.
    pub async fn handshake_with_deadline(
        &mut self,
        endpoint: &str,
        deadline: Deadline,
    ) -> Result<(), ClientError> {
        tracing::info!(endpoint, "Starting handshake");

        self.state = HandshakeState::Init;
        self.session.reset_discovery();

        let result = self.run_steps(endpoint, deadline).await;
        match result {
            Ok(()) => {
                tracing::info!(devices = self.session.device_count(), "Handshake complete");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, reached = %self.state, "Handshake failed");
                self.state = HandshakeState::Failed;
                Err(ClientError::HandshakeFailed(Box::new(e)))
            }
        }
    }

    async fn run_steps(&mut self, endpoint: &str, deadline: Deadline) -> Result<(), ClientError> {
        self.capability_step(endpoint, deadline).await?;
        self.end_device_step(deadline).await?;
        self.device_data_step(deadline).await
    }

    /// Load the device capability document at `endpoint`.
    ///
    /// Clears the capability and end device list loaded before, so a failed
    /// reload leaves later steps without a capability to work from.
    ///
    /// # Errors
    ///
    /// Returns any resolver error.
    pub async fn load_capability(&mut self, endpoint: &str) -> Result<(), ClientError> {
        let deadline = Deadline::after(self.options.handshake_timeout);
        self.session.reset_discovery();
        let result = self.capability_step(endpoint, deadline).await;
        self.track(result)
    }

    /// Load the end device list linked from the capability document.
    ///
    /// # Errors
    ///
    /// Returns `Precondition` if the capability or its end device list link
    /// is missing, and any resolver error.
    pub async fn load_end_devices(&mut self) -> Result<(), ClientError> {
        let deadline = Deadline::after(self.options.handshake_timeout);
        let result = self.end_device_step(deadline).await;
        self.track(result)
    }

    /// Aggregate every device of the loaded end device list.
    ///
    /// # Errors
    ///
    /// Returns `Precondition` if no end device list is loaded or a device
    /// has no LFDI, `AggregationConflict` on a conflicting duplicate LFDI,
    /// and any aggregation error.
    pub async fn load_device_data(&mut self) -> Result<(), ClientError> {
        let deadline = Deadline::after(self.options.handshake_timeout);
        let result = self.device_data_step(deadline).await;
        self.track(result)
    }

    fn track(&mut self, result: Result<(), ClientError>) -> Result<(), ClientError> {
        if result.is_err() {
            self.state = HandshakeState::Failed;
        }
        result
    }

    async fn capability_step(&mut self, endpoint: &str, deadline: Deadline) -> Result<(), ClientError> {
        let capability: DeviceCapability = self
            .resolver(deadline)
            .resolve(&Link::new(endpoint))
            .await?;

        tracing::info!(
            endpoint,
            end_devices = capability.end_device_list_link.is_some(),
            "Loaded device capability"
        );

        self.session.device_capability = Some(capability);
        self.state = HandshakeState::CapabilityLoaded;
        Ok(())
    }

    async fn end_device_step(&mut self, deadline: Deadline) -> Result<(), ClientError> {
        let capability = self
            .session
            .device_capability
            .as_ref()
            .ok_or_else(|| ClientError::precondition("device capability"))?;
        let link = capability
            .end_device_list_link
            .clone()
            .ok_or_else(|| ClientError::precondition("end device list link"))?;

        let list: EndDeviceList = self.resolver(deadline).resolve(&link).await?;

        tracing::info!(uri = %link, devices = list.end_device.len(), "Loaded end device list");

        self.session.end_device_list = Some(list);
        self.state = HandshakeState::DevicesLoaded;
        Ok(())
    }

    async fn device_data_step(&mut self, deadline: Deadline) -> Result<(), ClientError> {
        let devices = self
            .session
            .end_device_list
            .as_ref()
            .ok_or_else(|| ClientError::precondition("end device list"))?
            .end_device
            .clone();

        let resolver = LinkResolver::new(&self.transport, deadline, self.options.request_timeout);
        let aggregator = ResourceAggregator::new(&resolver);
        let mut this_run: HashMap<String, ClientAggregate> = HashMap::new();

        for device in &devices {
            let lfdi = device.lfdi.as_ref().ok_or_else(|| {
                ClientError::precondition(format!(
                    "lFDI of end device {}",
                    device.href.as_deref().unwrap_or("<unnamed>")
                ))
            })?;

            let aggregate = aggregator.aggregate(device).await?;

            if let Some(previous) = this_run.get(lfdi.as_str()) {
                if *previous == aggregate {
                    tracing::debug!(%lfdi, "Skipping identical duplicate device");
                    continue;
                }
                tracing::warn!(%lfdi, "Device listed twice with different resources");
                return Err(ClientError::AggregationConflict {
                    lfdi: lfdi.to_string(),
                });
            }

            this_run.insert(lfdi.as_str().to_string(), aggregate.clone());
            self.session.register_device(lfdi, aggregate);

            tracing::info!(%lfdi, device = ?device.href, "Registered device");
        }

        self.state = HandshakeState::DeviceDataLoaded;
        Ok(())
    }
}
