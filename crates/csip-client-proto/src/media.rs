//! Media types of 2030.5 documents.
//!
//! A GET response counts as a document only when its `Content-Type` names
//! an XML media type. Anything else, including a missing header, is
//! rejected before the body is decoded.

/// Media type registered for IEEE 2030.5 XML documents.
pub const SEP_XML: &str = "application/sep+xml";

/// A parsed `Content-Type` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType {
    /// Top-level type, lower-cased
    pub top: String,
    /// Subtype, lower-cased
    pub subtype: String,
    /// Parameters in header order, names lower-cased
    pub params: Vec<(String, String)>,
}

impl MediaType {
    /// Parse a `Content-Type` header value.
    ///
    /// Returns `None` if the value has no `type/subtype` part.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let mut parts = value.split(';');
        let essence = parts.next()?.trim();
        let (top, subtype) = essence.split_once('/')?;
        let (top, subtype) = (top.trim(), subtype.trim());
        if top.is_empty() || subtype.is_empty() {
            return None;
        }

        let params = parts
            .filter_map(|p| {
                let (name, value) = p.split_once('=')?;
                Some((
                    name.trim().to_ascii_lowercase(),
                    value.trim().trim_matches('"').to_string(),
                ))
            })
            .collect();

        Some(Self {
            top: top.to_ascii_lowercase(),
            subtype: subtype.to_ascii_lowercase(),
            params,
        })
    }

    /// `type/subtype` without parameters.
    #[must_use]
    pub fn essence(&self) -> String {
        format!("{}/{}", self.top, self.subtype)
    }

    /// Value of the `charset` parameter, if any.
    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.params
            .iter()
            .find(|(name, _)| name == "charset")
            .map(|(_, value)| value.as_str())
    }

    /// Whether this names an XML document type.
    #[must_use]
    pub fn is_document(&self) -> bool {
        match (self.top.as_str(), self.subtype.as_str()) {
            ("application" | "text", "xml") => true,
            ("application", sub) => sub.ends_with("+xml"),
            _ => false,
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.top, self.subtype)?;
        for (name, value) in &self.params {
            write!(f, "; {name}={value}")?;
        }
        Ok(())
    }
}

/// Whether a response with this `Content-Type` carries a document.
///
/// # Examples
///
/// ```
/// use csip_client_proto::is_document;
///
/// assert!(is_document(Some("application/sep+xml; charset=utf-8")));
/// assert!(!is_document(None));
/// ```
#[must_use]
pub fn is_document(content_type: Option<&str>) -> bool {
    content_type
        .and_then(MediaType::parse)
        .is_some_and(|m| m.is_document())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_with_params() {
        let media = MediaType::parse("Application/SEP+XML; charset=\"UTF-8\"; level=1").unwrap();
        assert_eq!(media.essence(), SEP_XML);
        assert_eq!(media.charset(), Some("UTF-8"));
        assert_eq!(media.params.len(), 2);
        assert_eq!(media.to_string(), "application/sep+xml; charset=UTF-8; level=1");
    }

    #[test]
    fn parse_rejects_missing_subtype() {
        assert!(MediaType::parse("").is_none());
        assert!(MediaType::parse("xml").is_none());
        assert!(MediaType::parse("application/").is_none());
    }

    #[test]
    fn document_types() {
        assert!(is_document(Some(SEP_XML)));
        assert!(is_document(Some("application/xml")));
        assert!(is_document(Some("text/xml;charset=utf-8")));
        assert!(is_document(Some("application/atom+xml")));

        assert!(!is_document(None));
        assert!(!is_document(Some("")));
        assert!(!is_document(Some("application/json")));
        assert!(!is_document(Some("text/html")));
        assert!(!is_document(Some("text/plain")));
    }
}
