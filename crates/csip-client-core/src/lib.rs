//! # CSIP Client Core
//!
//! Resource model and aggregation state for an IEEE 2030.5 / CSIP client.
//!
//! This crate provides:
//! - `Link` and `Lfdi`, the two identities the traversal keys on
//! - Typed resource documents served by a CSIP server
//! - Outgoing telemetry payloads (status, capability, settings, availability, events)
//! - `ClientAggregate`, the per-device result of a traversal, and the
//!   `ClientSession` that owns every aggregate

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aggregate;
pub mod lfdi;
pub mod link;
pub mod resources;
pub mod session;
pub mod telemetry;

pub use aggregate::{ClientAggregate, ProgramResources};
pub use lfdi::{Lfdi, LfdiError};
pub use link::Link;
pub use resources::{
    CurveData, DateTimeInterval, DefaultDerControl, Der, DerControl, DerControlBase,
    DerControlList, DerCurve, DerCurveList, DerList, DerProgram, DerProgramList,
    DeviceCapability, EndDevice, EndDeviceList, FunctionSetAssignments,
    FunctionSetAssignmentsList, MirrorUsagePointList, Resource, ResponseSet, ResponseSetList,
    Time, UsagePoint, UsagePointList,
};
pub use session::{ClientSession, DeviceSummary, SessionSummary};
pub use telemetry::{
    ActivePower, DerAvailability, DerCapability, DerSettings, DerStatus, LogEvent,
    MirrorMeterReading, MirrorUsagePoint, Reading, StatusValue,
};
