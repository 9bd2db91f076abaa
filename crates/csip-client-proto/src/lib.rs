//! # CSIP Client Protocol
//!
//! Wire representation of IEEE 2030.5 resources.
//!
//! ## Codec
//!
//! - `decode::<T>(body)`: checks the root element against `T::ROOT`, then
//!   deserializes
//! - `encode(&payload)`: serializes and stamps the 2030.5 namespace
//!
//! ## Media types
//!
//! Documents are recognized by their `Content-Type`: `application/sep+xml`,
//! `application/xml`, `text/xml`, or any `application/*+xml`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod media;

pub use codec::{decode, encode, root_element, CodecError, SEP_NAMESPACE};
pub use media::{is_document, MediaType, SEP_XML};
