//! Ownership records as decoded from one registry lookup.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::ids::{RecordId, TaxpayerCode, deserialize_optional_code};
use crate::{CommonKind, SubjectKind};

/// A legal actor named on an ownership record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    name: String,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_code",
        skip_serializing_if = "Option::is_none"
    )]
    taxpayer_code: Option<TaxpayerCode>,
    kind: SubjectKind,
}

impl Subject {
    #[must_use]
    pub fn new(name: impl Into<String>, taxpayer_code: Option<TaxpayerCode>, kind: SubjectKind) -> Self {
        Self {
            name: name.into(),
            taxpayer_code,
            kind,
        }
    }

    /// An individual with a taxpayer code. Blank codes are dropped.
    #[must_use]
    pub fn individual(name: impl Into<String>, taxpayer_code: &str) -> Self {
        Self::new(name, TaxpayerCode::new(taxpayer_code).ok(), SubjectKind::Individual)
    }

    /// An individual the registry lists without a code (typically a minor).
    #[must_use]
    pub fn individual_without_code(name: impl Into<String>) -> Self {
        Self::new(name, None, SubjectKind::Individual)
    }

    #[must_use]
    pub fn entity(name: impl Into<String>, taxpayer_code: Option<TaxpayerCode>) -> Self {
        Self::new(name, taxpayer_code, SubjectKind::Entity)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn taxpayer_code(&self) -> Option<&TaxpayerCode> {
        self.taxpayer_code.as_ref()
    }

    #[must_use]
    pub const fn kind(&self) -> SubjectKind {
        self.kind
    }

    #[must_use]
    pub fn is_individual(&self) -> bool {
        self.kind == SubjectKind::Individual
    }

    /// True when this subject's code equals `code`.
    #[must_use]
    pub fn has_code(&self, code: &str) -> bool {
        self.taxpayer_code.as_ref().is_some_and(|own| own == code)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("ownership record {0} names no subjects")]
    NoSubjects(RecordId),
}

/// One legal title entry on a property.
///
/// Always names at least one subject. A blank share size is stored as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawOwnershipRecord")]
pub struct OwnershipRecord {
    record_id: RecordId,
    #[serde(skip_serializing_if = "Option::is_none")]
    share_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    common_kind: Option<CommonKind>,
    subjects: Vec<Subject>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOwnershipRecord {
    record_id: RecordId,
    #[serde(default, deserialize_with = "deserialize_share_size")]
    share_size: Option<String>,
    #[serde(default)]
    common_kind: Option<CommonKind>,
    subjects: Vec<Subject>,
}

impl TryFrom<RawOwnershipRecord> for OwnershipRecord {
    type Error = RecordError;

    fn try_from(raw: RawOwnershipRecord) -> Result<Self, Self::Error> {
        let record = Self::new(raw.record_id, raw.subjects)?;
        Ok(Self {
            share_size: raw.share_size,
            common_kind: raw.common_kind,
            ..record
        })
    }
}

fn deserialize_share_size<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(normalize_share_size))
}

fn normalize_share_size(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}

impl OwnershipRecord {
    pub fn new(record_id: RecordId, subjects: Vec<Subject>) -> Result<Self, RecordError> {
        if subjects.is_empty() {
            return Err(RecordError::NoSubjects(record_id));
        }
        Ok(Self {
            record_id,
            share_size: None,
            common_kind: None,
            subjects,
        })
    }

    #[must_use]
    pub fn with_share_size(mut self, share_size: impl Into<String>) -> Self {
        self.share_size = normalize_share_size(share_size.into());
        self
    }

    #[must_use]
    pub fn with_common_kind(mut self, common_kind: CommonKind) -> Self {
        self.common_kind = Some(common_kind);
        self
    }

    #[must_use]
    pub const fn record_id(&self) -> RecordId {
        self.record_id
    }

    /// The declared share expression, if any.
    #[must_use]
    pub fn share_size(&self) -> Option<&str> {
        self.share_size.as_deref()
    }

    #[must_use]
    pub fn has_share_size(&self) -> bool {
        self.share_size.is_some()
    }

    #[must_use]
    pub const fn common_kind(&self) -> Option<CommonKind> {
        self.common_kind
    }

    #[must_use]
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    /// The only subject of this record, or `None` when there are several.
    #[must_use]
    pub fn sole_subject(&self) -> Option<&Subject> {
        match self.subjects.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }
}

/// Every ownership record of one real-property object.
///
/// Built fresh from one registry response and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyOwnershipSet {
    records: Vec<OwnershipRecord>,
}

impl PropertyOwnershipSet {
    #[must_use]
    pub fn new(records: Vec<OwnershipRecord>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn records(&self) -> &[OwnershipRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The record when the set holds exactly one.
    #[must_use]
    pub fn single_record(&self) -> Option<&OwnershipRecord> {
        match self.records.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    pub fn subjects(&self) -> impl Iterator<Item = &Subject> {
        self.records.iter().flat_map(OwnershipRecord::subjects)
    }
}

impl From<Vec<OwnershipRecord>> for PropertyOwnershipSet {
    fn from(records: Vec<OwnershipRecord>) -> Self {
        Self::new(records)
    }
}

impl<'a> IntoIterator for &'a PropertyOwnershipSet {
    type Item = &'a OwnershipRecord;
    type IntoIter = std::slice::Iter<'a, OwnershipRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// One identified individual co-owner, flattened out of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyOwnerInfo {
    pub full_name: String,
    pub taxpayer_code: TaxpayerCode,
    pub record_id: RecordId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_kind: Option<CommonKind>,
}
