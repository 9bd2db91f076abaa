//! Resource documents served by a CSIP server.
//!
//! Field names follow the IEEE 2030.5 XML schema: attributes are prefixed
//! with `@`, child elements use their schema element names. Only the
//! elements a client needs to traverse and act on the resource tree are
//! modelled; unknown elements are ignored on decode.

use crate::lfdi::Lfdi;
use crate::link::Link;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A document that can be exchanged with the server.
pub trait Resource: Serialize + DeserializeOwned {
    /// Local name of the document's root element.
    const ROOT: &'static str;
}

macro_rules! resource {
    ($($ty:ty => $root:literal),+ $(,)?) => {
        $(impl Resource for $ty {
            const ROOT: &'static str = $root;
        })+
    };
}

resource! {
    DeviceCapability => "DeviceCapability",
    EndDeviceList => "EndDeviceList",
    EndDevice => "EndDevice",
    FunctionSetAssignmentsList => "FunctionSetAssignmentsList",
    DerProgramList => "DERProgramList",
    DerControlList => "DERControlList",
    DefaultDerControl => "DefaultDERControl",
    DerCurveList => "DERCurveList",
    DerList => "DERList",
    UsagePointList => "UsagePointList",
    MirrorUsagePointList => "MirrorUsagePointList",
    ResponseSetList => "ResponseSetList",
    Time => "Time",
}

/// Root resource of the server's tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "DeviceCapability")]
pub struct DeviceCapability {
    /// Location of this resource
    #[serde(rename = "@href", default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Suggested polling interval in seconds
    #[serde(rename = "@pollRate", default, skip_serializing_if = "Option::is_none")]
    pub poll_rate: Option<u32>,
    /// Link to the server time
    #[serde(rename = "TimeLink", default, skip_serializing_if = "Option::is_none")]
    pub time_link: Option<Link>,
    /// Link to the usage point list
    #[serde(rename = "UsagePointListLink", default, skip_serializing_if = "Option::is_none")]
    pub usage_point_list_link: Option<Link>,
    /// Link to the end device list
    #[serde(rename = "EndDeviceListLink", default, skip_serializing_if = "Option::is_none")]
    pub end_device_list_link: Option<Link>,
    /// Link to the mirror usage point list
    #[serde(
        rename = "MirrorUsagePointListLink",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub mirror_usage_point_list_link: Option<Link>,
    /// Link to the response set list
    #[serde(rename = "ResponseSetListLink", default, skip_serializing_if = "Option::is_none")]
    pub response_set_list_link: Option<Link>,
}

/// One managed device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "EndDevice")]
pub struct EndDevice {
    /// Location of this resource
    #[serde(rename = "@href", default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Link to the device's DER list
    #[serde(rename = "DERListLink", default, skip_serializing_if = "Option::is_none")]
    pub der_list_link: Option<Link>,
    /// Long-form device identifier
    #[serde(rename = "lFDI", default, skip_serializing_if = "Option::is_none")]
    pub lfdi: Option<Lfdi>,
    /// Link to the device's event log
    #[serde(rename = "LogEventListLink", default, skip_serializing_if = "Option::is_none")]
    pub log_event_list_link: Option<Link>,
    /// Short-form device identifier
    #[serde(rename = "sFDI", default, skip_serializing_if = "Option::is_none")]
    pub sfdi: Option<u64>,
    /// Time of the last change, seconds since the epoch
    #[serde(rename = "changedTime", default, skip_serializing_if = "Option::is_none")]
    pub changed_time: Option<i64>,
    /// Whether the device is enabled
    #[serde(rename = "enabled", default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Link to the device's function set assignments
    #[serde(
        rename = "FunctionSetAssignmentsListLink",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub function_set_assignments_list_link: Option<Link>,
}

/// Ordered list of end devices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "EndDeviceList")]
pub struct EndDeviceList {
    /// Location of this resource
    #[serde(rename = "@href", default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Total entries on the server
    #[serde(rename = "@all", default, skip_serializing_if = "Option::is_none")]
    pub all: Option<u32>,
    /// Entries in this page
    #[serde(rename = "@results", default, skip_serializing_if = "Option::is_none")]
    pub results: Option<u32>,
    /// Devices in server order
    #[serde(rename = "EndDevice", default)]
    pub end_device: Vec<EndDevice>,
}

/// A block of function sets assigned to a device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionSetAssignments {
    /// Location of this resource
    #[serde(rename = "@href", default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Master resource identifier
    #[serde(rename = "mRID", default, skip_serializing_if = "Option::is_none")]
    pub m_rid: Option<String>,
    /// Human readable description
    #[serde(rename = "description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Link to the assigned DER programs
    #[serde(rename = "DERProgramListLink", default, skip_serializing_if = "Option::is_none")]
    pub der_program_list_link: Option<Link>,
    /// Link to the time resource for this assignment
    #[serde(rename = "TimeLink", default, skip_serializing_if = "Option::is_none")]
    pub time_link: Option<Link>,
}

/// Function set assignments of one device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "FunctionSetAssignmentsList")]
pub struct FunctionSetAssignmentsList {
    /// Location of this resource
    #[serde(rename = "@href", default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Total entries on the server
    #[serde(rename = "@all", default, skip_serializing_if = "Option::is_none")]
    pub all: Option<u32>,
    /// Entries in this page
    #[serde(rename = "@results", default, skip_serializing_if = "Option::is_none")]
    pub results: Option<u32>,
    /// Assignment blocks
    #[serde(rename = "FunctionSetAssignments", default)]
    pub function_set_assignments: Vec<FunctionSetAssignments>,
}

/// A DER program and the links to its controls and curves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerProgram {
    /// Location of this resource
    #[serde(rename = "@href", default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Master resource identifier
    #[serde(rename = "mRID", default, skip_serializing_if = "Option::is_none")]
    pub m_rid: Option<String>,
    /// Human readable description
    #[serde(rename = "description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Link to the currently active controls
    #[serde(
        rename = "ActiveDERControlListLink",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub active_der_control_list_link: Option<Link>,
    /// Link to the default control
    #[serde(rename = "DefaultDERControlLink", default, skip_serializing_if = "Option::is_none")]
    pub default_der_control_link: Option<Link>,
    /// Link to all scheduled controls
    #[serde(rename = "DERControlListLink", default, skip_serializing_if = "Option::is_none")]
    pub der_control_list_link: Option<Link>,
    /// Link to the program's curves
    #[serde(rename = "DERCurveListLink", default, skip_serializing_if = "Option::is_none")]
    pub der_curve_list_link: Option<Link>,
    /// Program priority, lower wins
    #[serde(rename = "primacy", default, skip_serializing_if = "Option::is_none")]
    pub primacy: Option<u8>,
}

/// DER programs behind one function set assignment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "DERProgramList")]
pub struct DerProgramList {
    /// Location of this resource
    #[serde(rename = "@href", default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Total entries on the server
    #[serde(rename = "@all", default, skip_serializing_if = "Option::is_none")]
    pub all: Option<u32>,
    /// Entries in this page
    #[serde(rename = "@results", default, skip_serializing_if = "Option::is_none")]
    pub results: Option<u32>,
    /// Programs
    #[serde(rename = "DERProgram", default)]
    pub der_program: Vec<DerProgram>,
}

/// Operating-mode settings carried by a control.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerControlBase {
    /// Connect (true) or disconnect (false)
    #[serde(rename = "opModConnect", default, skip_serializing_if = "Option::is_none")]
    pub op_mod_connect: Option<bool>,
    /// Energize (true) or cease to energize (false)
    #[serde(rename = "opModEnergize", default, skip_serializing_if = "Option::is_none")]
    pub op_mod_energize: Option<bool>,
    /// Fixed active power as a percentage of rated, in hundredths
    #[serde(rename = "opModFixedW", default, skip_serializing_if = "Option::is_none")]
    pub op_mod_fixed_w: Option<i16>,
    /// Maximum active power limit as a percentage of rated, in hundredths
    #[serde(rename = "opModMaxLimW", default, skip_serializing_if = "Option::is_none")]
    pub op_mod_max_lim_w: Option<u16>,
}

/// Interval during which a control is in effect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateTimeInterval {
    /// Duration in seconds
    #[serde(rename = "duration")]
    pub duration: u32,
    /// Start, seconds since the epoch
    #[serde(rename = "start")]
    pub start: i64,
}

/// A scheduled control event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerControl {
    /// Location of this resource
    #[serde(rename = "@href", default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Master resource identifier
    #[serde(rename = "mRID", default, skip_serializing_if = "Option::is_none")]
    pub m_rid: Option<String>,
    /// Human readable description
    #[serde(rename = "description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Time the event was created, seconds since the epoch
    #[serde(rename = "creationTime", default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<i64>,
    /// When the control applies
    #[serde(rename = "interval", default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<DateTimeInterval>,
    /// Control settings
    #[serde(rename = "DERControlBase", default)]
    pub der_control_base: DerControlBase,
}

/// List of controls. Served both as the full control list and as the
/// active control list of a program.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "DERControlList")]
pub struct DerControlList {
    /// Location of this resource
    #[serde(rename = "@href", default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Total entries on the server
    #[serde(rename = "@all", default, skip_serializing_if = "Option::is_none")]
    pub all: Option<u32>,
    /// Entries in this page
    #[serde(rename = "@results", default, skip_serializing_if = "Option::is_none")]
    pub results: Option<u32>,
    /// Controls
    #[serde(rename = "DERControl", default)]
    pub der_control: Vec<DerControl>,
}

/// Control applied when no scheduled control is active.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "DefaultDERControl")]
pub struct DefaultDerControl {
    /// Location of this resource
    #[serde(rename = "@href", default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Master resource identifier
    #[serde(rename = "mRID", default, skip_serializing_if = "Option::is_none")]
    pub m_rid: Option<String>,
    /// Human readable description
    #[serde(rename = "description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Control settings
    #[serde(rename = "DERControlBase", default)]
    pub der_control_base: DerControlBase,
    /// Default ramp rate, hundredths of a percent per second
    #[serde(rename = "setGradW", default, skip_serializing_if = "Option::is_none")]
    pub set_grad_w: Option<u16>,
}

/// One point of a curve.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveData {
    /// Independent value
    #[serde(rename = "xvalue")]
    pub x_value: i32,
    /// Dependent value
    #[serde(rename = "yvalue")]
    pub y_value: i32,
}

/// A volt-var, volt-watt, or similar curve.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerCurve {
    /// Location of this resource
    #[serde(rename = "@href", default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Master resource identifier
    #[serde(rename = "mRID", default, skip_serializing_if = "Option::is_none")]
    pub m_rid: Option<String>,
    /// Human readable description
    #[serde(rename = "description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Curve points in ascending x order
    #[serde(rename = "CurveData", default)]
    pub curve_data: Vec<CurveData>,
    /// Curve type code
    #[serde(rename = "curveType", default)]
    pub curve_type: u8,
}

/// Curves of one program.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "DERCurveList")]
pub struct DerCurveList {
    /// Location of this resource
    #[serde(rename = "@href", default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Total entries on the server
    #[serde(rename = "@all", default, skip_serializing_if = "Option::is_none")]
    pub all: Option<u32>,
    /// Entries in this page
    #[serde(rename = "@results", default, skip_serializing_if = "Option::is_none")]
    pub results: Option<u32>,
    /// Curves
    #[serde(rename = "DERCurve", default)]
    pub der_curve: Vec<DerCurve>,
}

/// A physical DER attached to an end device.
///
/// Its links are the targets of status, capability, settings, and
/// availability updates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Der {
    /// Location of this resource
    #[serde(rename = "@href", default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Where availability is reported
    #[serde(rename = "DERAvailabilityLink", default, skip_serializing_if = "Option::is_none")]
    pub der_availability_link: Option<Link>,
    /// Where nameplate capability is reported
    #[serde(rename = "DERCapabilityLink", default, skip_serializing_if = "Option::is_none")]
    pub der_capability_link: Option<Link>,
    /// Where settings are reported
    #[serde(rename = "DERSettingsLink", default, skip_serializing_if = "Option::is_none")]
    pub der_settings_link: Option<Link>,
    /// Where status is reported
    #[serde(rename = "DERStatusLink", default, skip_serializing_if = "Option::is_none")]
    pub der_status_link: Option<Link>,
}

/// DERs of one end device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "DERList")]
pub struct DerList {
    /// Location of this resource
    #[serde(rename = "@href", default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Total entries on the server
    #[serde(rename = "@all", default, skip_serializing_if = "Option::is_none")]
    pub all: Option<u32>,
    /// Entries in this page
    #[serde(rename = "@results", default, skip_serializing_if = "Option::is_none")]
    pub results: Option<u32>,
    /// DERs
    #[serde(rename = "DER", default)]
    pub der: Vec<Der>,
}

/// A metering point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsagePoint {
    /// Location of this resource
    #[serde(rename = "@href", default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Master resource identifier
    #[serde(rename = "mRID", default, skip_serializing_if = "Option::is_none")]
    pub m_rid: Option<String>,
    /// Human readable description
    #[serde(rename = "description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Role flags, hex encoded
    #[serde(rename = "roleFlags", default, skip_serializing_if = "Option::is_none")]
    pub role_flags: Option<String>,
    /// Service category code
    #[serde(rename = "serviceCategoryKind", default, skip_serializing_if = "Option::is_none")]
    pub service_category_kind: Option<u8>,
    /// Status code
    #[serde(rename = "status", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u8>,
    /// Link to the meter readings
    #[serde(rename = "MeterReadingListLink", default, skip_serializing_if = "Option::is_none")]
    pub meter_reading_list_link: Option<Link>,
}

/// Usage points visible to the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "UsagePointList")]
pub struct UsagePointList {
    /// Location of this resource
    #[serde(rename = "@href", default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Total entries on the server
    #[serde(rename = "@all", default, skip_serializing_if = "Option::is_none")]
    pub all: Option<u32>,
    /// Entries in this page
    #[serde(rename = "@results", default, skip_serializing_if = "Option::is_none")]
    pub results: Option<u32>,
    /// Usage points
    #[serde(rename = "UsagePoint", default)]
    pub usage_point: Vec<UsagePoint>,
}

/// Mirror usage points registered on the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "MirrorUsagePointList")]
pub struct MirrorUsagePointList {
    /// Location of this resource
    #[serde(rename = "@href", default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Total entries on the server
    #[serde(rename = "@all", default, skip_serializing_if = "Option::is_none")]
    pub all: Option<u32>,
    /// Entries in this page
    #[serde(rename = "@results", default, skip_serializing_if = "Option::is_none")]
    pub results: Option<u32>,
    /// Mirror usage points
    #[serde(rename = "MirrorUsagePoint", default)]
    pub mirror_usage_point: Vec<crate::telemetry::MirrorUsagePoint>,
}

/// A set of responses to server events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseSet {
    /// Location of this resource
    #[serde(rename = "@href", default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Master resource identifier
    #[serde(rename = "mRID", default, skip_serializing_if = "Option::is_none")]
    pub m_rid: Option<String>,
    /// Human readable description
    #[serde(rename = "description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Link to the responses
    #[serde(rename = "ResponseListLink", default, skip_serializing_if = "Option::is_none")]
    pub response_list_link: Option<Link>,
}

/// Response sets exposed by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "ResponseSetList")]
pub struct ResponseSetList {
    /// Location of this resource
    #[serde(rename = "@href", default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Total entries on the server
    #[serde(rename = "@all", default, skip_serializing_if = "Option::is_none")]
    pub all: Option<u32>,
    /// Entries in this page
    #[serde(rename = "@results", default, skip_serializing_if = "Option::is_none")]
    pub results: Option<u32>,
    /// Response sets
    #[serde(rename = "ResponseSet", default)]
    pub response_set: Vec<ResponseSet>,
}

/// Server time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "Time")]
pub struct Time {
    /// Location of this resource
    #[serde(rename = "@href", default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Current UTC time, seconds since the epoch
    #[serde(rename = "currentTime")]
    pub current_time: i64,
    /// End of daylight saving time, seconds since the epoch
    #[serde(rename = "dstEndTime", default, skip_serializing_if = "Option::is_none")]
    pub dst_end_time: Option<i64>,
    /// Daylight saving offset in seconds
    #[serde(rename = "dstOffset", default, skip_serializing_if = "Option::is_none")]
    pub dst_offset: Option<i32>,
    /// Start of daylight saving time, seconds since the epoch
    #[serde(rename = "dstStartTime", default, skip_serializing_if = "Option::is_none")]
    pub dst_start_time: Option<i64>,
    /// Local time, seconds since the epoch
    #[serde(rename = "localTime", default, skip_serializing_if = "Option::is_none")]
    pub local_time: Option<i64>,
    /// Time source quality
    #[serde(rename = "quality", default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<u8>,
    /// Time zone offset in seconds
    #[serde(rename = "tzOffset", default, skip_serializing_if = "Option::is_none")]
    pub tz_offset: Option<i32>,
}

impl Time {
    /// Server time as a UTC timestamp.
    ///
    /// Returns `None` if `currentTime` is outside the representable range.
    #[must_use]
    pub fn current_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.current_time, 0)
    }

    /// Offset between server time and `now`, in seconds (positive when the
    /// server is ahead).
    #[must_use]
    pub fn offset_from(&self, now: DateTime<Utc>) -> i64 {
        self.current_time - now.timestamp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_names_follow_schema() {
        assert_eq!(DerProgramList::ROOT, "DERProgramList");
        assert_eq!(DefaultDerControl::ROOT, "DefaultDERControl");
        assert_eq!(DerCurveList::ROOT, "DERCurveList");
        assert_eq!(EndDeviceList::ROOT, "EndDeviceList");
    }

    #[test]
    fn time_conversion() {
        let time = Time {
            current_time: 1_700_000_000,
            ..Default::default()
        };
        let dt = time.current_datetime().unwrap();
        assert_eq!(dt.timestamp(), 1_700_000_000);

        let now = DateTime::from_timestamp(1_699_999_990, 0).unwrap();
        assert_eq!(time.offset_from(now), 10);
    }
}
