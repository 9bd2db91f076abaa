//! Client-side view of the server's resource tree.

use crate::aggregate::ClientAggregate;
use crate::lfdi::Lfdi;
use crate::resources::{
    DeviceCapability, EndDeviceList, MirrorUsagePointList, ResponseSetList, Time, UsagePointList,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything the client has learned from the server.
///
/// Capability and end device list are replaced wholesale by each handshake.
/// Device aggregates accumulate across handshakes and are keyed by the
/// canonical LFDI string.
#[derive(Debug, Clone, Default)]
pub struct ClientSession {
    /// Root resource
    pub device_capability: Option<DeviceCapability>,
    /// Devices discovered by the last handshake
    pub end_device_list: Option<EndDeviceList>,
    /// Usage points
    pub usage_point_list: Option<UsagePointList>,
    /// Mirror usage points
    pub mirror_usage_point_list: Option<MirrorUsagePointList>,
    /// Response sets
    pub response_set_list: Option<ResponseSetList>,
    /// Server time fetched through the capability's time link
    pub time: Option<Time>,
    devices: BTreeMap<String, ClientAggregate>,
}

impl ClientSession {
    /// Create an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the capability and device list ahead of a fresh discovery.
    pub fn reset_discovery(&mut self) {
        self.device_capability = None;
        self.end_device_list = None;
    }

    /// Register a device's aggregate under its LFDI.
    ///
    /// If the device is already known the aggregate is merged into the
    /// stored one (see [`ClientAggregate::merge`]).
    pub fn register_device(&mut self, lfdi: &Lfdi, aggregate: ClientAggregate) {
        match self.devices.get_mut(lfdi.as_str()) {
            Some(existing) => {
                existing.merge(aggregate);
                tracing::debug!(%lfdi, "Merged device aggregate");
            }
            None => {
                self.devices.insert(lfdi.as_str().to_string(), aggregate);
                tracing::debug!(%lfdi, "Registered device aggregate");
            }
        }
    }

    /// Aggregate of the device with the given canonical LFDI string.
    #[must_use]
    pub fn device(&self, lfdi: &str) -> Option<&ClientAggregate> {
        self.devices.get(lfdi)
    }

    /// All registered devices in key order.
    pub fn devices(&self) -> impl Iterator<Item = (&str, &ClientAggregate)> {
        self.devices.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of registered devices.
    #[must_use]
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Serializable digest of the session.
    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            capability_loaded: self.device_capability.is_some(),
            end_devices: self.end_device_list.as_ref().map(|l| l.end_device.len()),
            usage_points: self.usage_point_list.as_ref().map(|l| l.usage_point.len()),
            mirror_usage_points: self
                .mirror_usage_point_list
                .as_ref()
                .map(|l| l.mirror_usage_point.len()),
            response_sets: self.response_set_list.as_ref().map(|l| l.response_set.len()),
            server_time: self.time.as_ref().map(|t| t.current_time),
            devices: self
                .devices
                .iter()
                .map(|(lfdi, aggregate)| DeviceSummary::new(lfdi, aggregate))
                .collect(),
        }
    }
}

/// Digest of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    /// Whether the capability document is loaded
    pub capability_loaded: bool,
    /// Number of discovered end devices
    pub end_devices: Option<usize>,
    /// Number of usage points
    pub usage_points: Option<usize>,
    /// Number of mirror usage points
    pub mirror_usage_points: Option<usize>,
    /// Number of response sets
    pub response_sets: Option<usize>,
    /// Server time, seconds since the epoch
    pub server_time: Option<i64>,
    /// Per-device digests in LFDI order
    pub devices: Vec<DeviceSummary>,
}

/// Digest of one device aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceSummary {
    /// Canonical LFDI
    pub lfdi: String,
    /// Function set assignment lists
    pub function_set_assignment_lists: usize,
    /// Program lists
    pub program_lists: usize,
    /// Programs across all lists
    pub programs: usize,
    /// Active controls in the latest active list
    pub active_controls: Option<usize>,
    /// Default controls
    pub default_controls: usize,
    /// Control lists
    pub control_lists: usize,
    /// Curve lists
    pub curve_lists: usize,
    /// DERs attached to the device
    pub ders: Option<usize>,
}

impl DeviceSummary {
    fn new(lfdi: &str, aggregate: &ClientAggregate) -> Self {
        Self {
            lfdi: lfdi.to_string(),
            function_set_assignment_lists: aggregate.function_set_assignments.len(),
            program_lists: aggregate.der_programs.len(),
            programs: aggregate.program_count(),
            active_controls: aggregate
                .active_der_controls
                .as_ref()
                .map(|l| l.der_control.len()),
            default_controls: aggregate.default_der_controls.len(),
            control_lists: aggregate.der_controls.len(),
            curve_lists: aggregate.der_curves.len(),
            ders: aggregate.der_list.as_ref().map(|l| l.der.len()),
        }
    }
}
