use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Registry-assigned number of one ownership record (`rnNum`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(u64);

impl RecordId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("taxpayer code must not be empty")]
pub struct EmptyTaxpayerCode;

/// Taxpayer registration code (RNOKPP) of a subject.
///
/// Empty codes are unrepresentable; the registry sends `""` for subjects
/// without a code, which decodes to `None` at the [`crate::Subject`] level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaxpayerCode(String);

impl TaxpayerCode {
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyTaxpayerCode> {
        let value = value.into();
        if value.trim().is_empty() {
            Err(EmptyTaxpayerCode)
        } else {
            Ok(Self(value))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TaxpayerCode {
    type Error = EmptyTaxpayerCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for TaxpayerCode {
    type Error = EmptyTaxpayerCode;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TaxpayerCode> for String {
    fn from(value: TaxpayerCode) -> Self {
        value.0
    }
}

impl AsRef<str> for TaxpayerCode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for TaxpayerCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl fmt::Display for TaxpayerCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Decode an optional taxpayer code, mapping blank strings to `None`.
pub(crate) fn deserialize_optional_code<'de, D>(
    deserializer: D,
) -> Result<Option<TaxpayerCode>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| TaxpayerCode::new(value).ok()))
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("realty registration number must not be empty")]
pub struct EmptyRealtyId;

/// Registration number of a real-property object (`realtyRnNum`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RealtyId(String);

impl RealtyId {
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyRealtyId> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Err(EmptyRealtyId)
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RealtyId {
    type Error = EmptyRealtyId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RealtyId> for String {
    fn from(value: RealtyId) -> Self {
        value.0
    }
}

impl fmt::Display for RealtyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
