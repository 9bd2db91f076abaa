//! XML codec for IEEE 2030.5 resources.
//!
//! The expected resource type is chosen by the caller through the type
//! parameter; the document's root element must match it.

use csip_client_core::Resource;
use quick_xml::events::Event;
use quick_xml::Reader;

/// XML namespace of IEEE 2030.5 documents.
pub const SEP_NAMESPACE: &str = "urn:ieee:std:2030.5:ns";

/// Local name of the first element in `body`.
///
/// # Errors
///
/// Returns error if the body is not well-formed up to its first element or
/// contains no element at all.
pub fn root_element(body: &str) -> Result<String, CodecError> {
    let mut reader = Reader::from_str(body);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e) | Event::Empty(e)) => {
                return Ok(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Ok(Event::Eof) => return Err(CodecError::Empty),
            Ok(_) => {}
            Err(e) => return Err(CodecError::Deserialize(e.to_string())),
        }
    }
}

/// Decode a document of type `T`.
///
/// # Errors
///
/// Returns error if the root element is not `T::ROOT` or the document does
/// not deserialize into `T`.
///
/// # Examples
///
/// ```
/// use csip_client_core::Time;
/// use csip_client_proto::decode;
///
/// let time: Time = decode(r#"<Time href="/tm"><currentTime>1700000000</currentTime></Time>"#).unwrap();
/// assert_eq!(time.current_time, 1_700_000_000);
/// ```
pub fn decode<T: Resource>(body: &str) -> Result<T, CodecError> {
    let root = root_element(body)?;
    if root != T::ROOT {
        return Err(CodecError::UnexpectedRoot {
            expected: T::ROOT,
            found: root,
        });
    }

    quick_xml::de::from_str(body).map_err(|e| CodecError::Deserialize(e.to_string()))
}

/// Encode a payload as a namespaced 2030.5 document.
///
/// # Errors
///
/// Returns error if serialization fails.
pub fn encode<T: Resource>(payload: &T) -> Result<String, CodecError> {
    let xml = quick_xml::se::to_string(payload).map_err(|e| CodecError::Serialize(e.to_string()))?;
    let body = stamp_namespace(&xml, T::ROOT);
    tracing::trace!(root = T::ROOT, len = body.len(), "Encoded payload");
    Ok(body)
}

fn stamp_namespace(xml: &str, root: &str) -> String {
    let open = format!("<{root}");
    match xml.strip_prefix(&open) {
        Some(rest) => format!("<{root} xmlns=\"{SEP_NAMESPACE}\"{rest}"),
        None => xml.to_string(),
    }
}

/// Errors that can occur encoding or decoding documents.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The body has no root element
    #[error("document is empty")]
    Empty,
    /// The root element names a different resource
    #[error("expected <{expected}> document, found <{found}>")]
    UnexpectedRoot {
        /// Root element the call site expects
        expected: &'static str,
        /// Root element in the body
        found: String,
    },
    /// Malformed XML or a value of the wrong shape
    #[error("deserialize error: {0}")]
    Deserialize(String),
    /// Payload could not be written
    #[error("serialize error: {0}")]
    Serialize(String),
}
