//! Long-form device identifier.

use serde::{Deserialize, Serialize};

/// Maximum number of hex digits in an LFDI (160 bits).
pub const LFDI_MAX_DIGITS: usize = 40;

/// Long-form device identifier.
///
/// Stored in canonical form: upper-case hex digits without a `0x` prefix.
/// The canonical string is the key under which a device's aggregate is
/// registered in the session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Lfdi(String);

impl Lfdi {
    /// Parse an LFDI from its hex representation.
    ///
    /// Accepts an optional `0x`/`0X` prefix and digits in either case.
    ///
    /// # Errors
    ///
    /// Returns error if the value is empty, too long, or not hex.
    ///
    /// # Examples
    ///
    /// ```
    /// use csip_client_core::Lfdi;
    ///
    /// let lfdi = Lfdi::parse("0x12ab").unwrap();
    /// assert_eq!(lfdi.as_str(), "12AB");
    /// ```
    pub fn parse(value: &str) -> Result<Self, LfdiError> {
        let trimmed = value.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.is_empty() {
            return Err(LfdiError::Empty);
        }
        if digits.len() > LFDI_MAX_DIGITS {
            return Err(LfdiError::TooLong(digits.len()));
        }
        if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(LfdiError::InvalidDigit(bad));
        }

        Ok(Self(digits.to_ascii_uppercase()))
    }

    /// Canonical string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Lfdi {
    type Error = LfdiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Lfdi> for String {
    fn from(lfdi: Lfdi) -> Self {
        lfdi.0
    }
}

impl std::str::FromStr for Lfdi {
    type Err = LfdiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Lfdi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors that can occur parsing an LFDI.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LfdiError {
    /// No digits were supplied
    #[error("LFDI is empty")]
    Empty,
    /// More than 160 bits of digits
    #[error("LFDI has {0} hex digits, at most 40 allowed")]
    TooLong(usize),
    /// A character outside `[0-9a-fA-F]`
    #[error("LFDI contains non-hex character {0:?}")]
    InvalidDigit(char),
}
