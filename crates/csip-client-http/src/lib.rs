//! # CSIP HTTP Transport
//!
//! The request/response seam between the CSIP engine and the network.
//!
//! - [`Transport`]: GET/POST/PUT returning status, content type, and body
//! - [`HttpTransport`]: reqwest implementation with a base address, a bearer
//!   `Authorization` header on every request, and optional custom CA and
//!   client certificate (mTLS) for HTTPS servers
//!
//! Relative hrefs are resolved against the configured base address.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod transport;

pub use client::{HttpTransport, HttpTransportConfig};
pub use transport::{Transport, TransportError, TransportResponse};
