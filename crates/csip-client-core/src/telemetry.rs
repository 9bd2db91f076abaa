//! Payloads the client pushes to the server.

use crate::lfdi::Lfdi;
use crate::resources::Resource;
use serde::{Deserialize, Serialize};

/// An active power value: `value * 10^multiplier` watts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePower {
    /// Power of ten applied to `value`
    #[serde(rename = "multiplier")]
    pub multiplier: i8,
    /// Mantissa
    #[serde(rename = "value")]
    pub value: i16,
}

impl ActivePower {
    /// Create a power value.
    #[must_use]
    pub fn new(value: i16, multiplier: i8) -> Self {
        Self { multiplier, value }
    }

    /// Value in watts.
    #[must_use]
    pub fn watts(&self) -> f64 {
        f64::from(self.value) * 10f64.powi(i32::from(self.multiplier))
    }
}

/// A timestamped status code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusValue {
    /// When the status was observed, seconds since the epoch
    #[serde(rename = "dateTime")]
    pub date_time: i64,
    /// Status code
    #[serde(rename = "value")]
    pub value: u8,
}

/// An event-log entry submitted with POST.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "LogEvent")]
pub struct LogEvent {
    /// When the event occurred, seconds since the epoch
    #[serde(rename = "createdDateTime")]
    pub created_date_time: i64,
    /// Free-form details
    #[serde(rename = "details", default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Vendor specific data
    #[serde(rename = "extendedData", default, skip_serializing_if = "Option::is_none")]
    pub extended_data: Option<u32>,
    /// Function set the event belongs to
    #[serde(rename = "functionSet")]
    pub function_set: u8,
    /// Event code within the function set
    #[serde(rename = "logEventCode")]
    pub log_event_code: u8,
    /// Device-unique event identifier
    #[serde(rename = "logEventID")]
    pub log_event_id: u16,
    /// Private enterprise number of the code's owner
    #[serde(rename = "logEventPEN")]
    pub log_event_pen: u32,
    /// Profile the code is defined in
    #[serde(rename = "profileID")]
    pub profile_id: u8,
}

/// A single reading in a mirror meter reading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    /// Reading value
    #[serde(rename = "value")]
    pub value: i64,
}

/// A meter reading mirrored to the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MirrorMeterReading {
    /// Master resource identifier
    #[serde(rename = "mRID")]
    pub m_rid: String,
    /// Human readable description
    #[serde(rename = "description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Latest reading
    #[serde(rename = "Reading", default, skip_serializing_if = "Option::is_none")]
    pub reading: Option<Reading>,
}

/// A usage point the client mirrors onto the server, registered with POST.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "MirrorUsagePoint")]
pub struct MirrorUsagePoint {
    /// Location of this resource, assigned by the server
    #[serde(rename = "@href", default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Master resource identifier
    #[serde(rename = "mRID")]
    pub m_rid: String,
    /// Human readable description
    #[serde(rename = "description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Role flags, hex encoded
    #[serde(rename = "roleFlags")]
    pub role_flags: String,
    /// Service category code
    #[serde(rename = "serviceCategoryKind")]
    pub service_category_kind: u8,
    /// Status code
    #[serde(rename = "status")]
    pub status: u8,
    /// Device the readings originate from
    #[serde(rename = "deviceLFDI")]
    pub device_lfdi: Lfdi,
    /// Readings
    #[serde(rename = "MirrorMeterReading", default)]
    pub mirror_meter_reading: Vec<MirrorMeterReading>,
}

/// Current operational status of a DER, updated with PUT.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "DERStatus")]
pub struct DerStatus {
    /// Generator connection status
    #[serde(rename = "genConnectStatus", default, skip_serializing_if = "Option::is_none")]
    pub gen_connect_status: Option<StatusValue>,
    /// Inverter status
    #[serde(rename = "inverterStatus", default, skip_serializing_if = "Option::is_none")]
    pub inverter_status: Option<StatusValue>,
    /// Operational mode status
    #[serde(
        rename = "operationalModeStatus",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub operational_mode_status: Option<StatusValue>,
    /// When the status was read, seconds since the epoch
    #[serde(rename = "readingTime")]
    pub reading_time: i64,
    /// State of charge, for storage
    #[serde(rename = "stateOfChargeStatus", default, skip_serializing_if = "Option::is_none")]
    pub state_of_charge_status: Option<StatusValue>,
}

/// Nameplate capability of a DER, updated with PUT.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "DERCapability")]
pub struct DerCapability {
    /// Supported control modes, hex encoded bitmap
    #[serde(rename = "modesSupported")]
    pub modes_supported: String,
    /// Rated maximum active power
    #[serde(rename = "rtgMaxW")]
    pub rtg_max_w: ActivePower,
    /// DER type code
    #[serde(rename = "type")]
    pub der_type: u8,
}

/// Configured settings of a DER, updated with PUT.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "DERSettings")]
pub struct DerSettings {
    /// Default ramp rate, hundredths of a percent per second
    #[serde(rename = "setGradW")]
    pub set_grad_w: u16,
    /// Configured maximum active power
    #[serde(rename = "setMaxW")]
    pub set_max_w: ActivePower,
    /// When the settings last changed, seconds since the epoch
    #[serde(rename = "updatedTime")]
    pub updated_time: i64,
}

/// Available energy and power of a DER, updated with PUT.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "DERAvailability")]
pub struct DerAvailability {
    /// How long the stated availability can be sustained, seconds
    #[serde(
        rename = "availabilityDuration",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub availability_duration: Option<u32>,
    /// When availability was read, seconds since the epoch
    #[serde(rename = "readingTime")]
    pub reading_time: i64,
    /// Active power available
    #[serde(rename = "statWAvail", default, skip_serializing_if = "Option::is_none")]
    pub stat_w_avail: Option<ActivePower>,
}

impl Resource for LogEvent {
    const ROOT: &'static str = "LogEvent";
}

impl Resource for MirrorUsagePoint {
    const ROOT: &'static str = "MirrorUsagePoint";
}

impl Resource for DerStatus {
    const ROOT: &'static str = "DERStatus";
}

impl Resource for DerCapability {
    const ROOT: &'static str = "DERCapability";
}

impl Resource for DerSettings {
    const ROOT: &'static str = "DERSettings";
}

impl Resource for DerAvailability {
    const ROOT: &'static str = "DERAvailability";
}
