//! # CSIP Client
//!
//! Handshake and resource traversal against an IEEE 2030.5 / CSIP server.
//!
//! ## Handshake
//!
//! A handshake discovers the server's tree in three steps:
//!
//! 1. `DeviceCapability` at a caller-supplied endpoint
//! 2. `EndDeviceList` through the capability's `EndDeviceListLink`
//! 3. For every end device: function set assignments, DER programs, their
//!    active/default/scheduled controls and curves, and the device's DER list
//!
//! Each device's result is stored in the session under its canonical LFDI.
//! Any failure stops the handshake and surfaces as `HandshakeFailed`
//! wrapping the step's error.
//!
//! ## Commands
//!
//! Log events and mirror usage points are POSTed; DER status, capability,
//! settings, and availability are PUT. Failures carry the server's status.
//!
//! ## Media types
//!
//! Every GET response must carry an XML media type (`application/sep+xml`
//! and friends). Anything else, including a missing `Content-Type`, is
//! `UnsupportedMediaType` regardless of status.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aggregator;
pub mod client;
pub mod deadline;
pub mod error;
pub mod handshake;
pub mod resolver;
pub mod sender;

pub use aggregator::ResourceAggregator;
pub use client::{ClientOptions, CsipClient};
pub use deadline::Deadline;
pub use error::{ClientError, FALLBACK_FAILURE_STATUS};
pub use handshake::HandshakeState;
pub use resolver::LinkResolver;
pub use sender::CommandSender;

pub use csip_client_core::{ClientAggregate, ClientSession, Lfdi, Link};
pub use csip_client_http::{HttpTransport, HttpTransportConfig, Transport, TransportResponse};
