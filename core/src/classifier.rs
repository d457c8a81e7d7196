//! Ownership classification and registry data-integrity checks.
//!
//! Everything here is a pure function of one [`PropertyOwnershipSet`]. Nothing
//! logs; anomalies come back as an [`InvalidReason`] so the caller decides how
//! to report them.

use std::collections::BTreeSet;
use std::fmt;

use drrp_types::{
    CommonKind, OwnershipRecord, OwnershipType, PropertyOwnerInfo, PropertyOwnershipSet, RecordId,
    TaxpayerCode,
};
use serde::Serialize;
use thiserror::Error;

use crate::shares::{MalformedShareExpression, Share, sum_shares};

// ============================================================================
// Verdicts
// ============================================================================

/// The anomaly check an [`InvalidReason`] came from, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyCheck {
    ShareSum,
    CoOwnerSubjects,
    SubjectKind,
}

/// Why a record set was judged untrustworthy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum InvalidReason {
    /// The only record names one subject and declares a share that is not the whole.
    SoleRecordShareMismatch { record_id: RecordId, sum: Share },
    /// Declared shares across several records do not add up to one, or some are missing.
    ShareSumMismatch { sum: Share, missing_share_sizes: bool },
    /// Joint ownership declared on a record with fewer than two subjects.
    SharedRecordWithoutCoOwners { record_id: RecordId },
    NonIndividualSubject { record_id: RecordId },
    /// Kept as a business rule even though minors legitimately lack a code.
    IndividualWithoutTaxpayerCode { record_id: RecordId },
}

impl InvalidReason {
    #[must_use]
    pub const fn check(&self) -> AnomalyCheck {
        match self {
            InvalidReason::SoleRecordShareMismatch { .. }
            | InvalidReason::ShareSumMismatch { .. } => AnomalyCheck::ShareSum,
            InvalidReason::SharedRecordWithoutCoOwners { .. } => AnomalyCheck::CoOwnerSubjects,
            InvalidReason::NonIndividualSubject { .. }
            | InvalidReason::IndividualWithoutTaxpayerCode { .. } => AnomalyCheck::SubjectKind,
        }
    }

    /// Stable machine-readable code, identical to the serialized tag.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            InvalidReason::SoleRecordShareMismatch { .. } => "sole_record_share_mismatch",
            InvalidReason::ShareSumMismatch { .. } => "share_sum_mismatch",
            InvalidReason::SharedRecordWithoutCoOwners { .. } => "shared_record_without_co_owners",
            InvalidReason::NonIndividualSubject { .. } => "non_individual_subject",
            InvalidReason::IndividualWithoutTaxpayerCode { .. } => {
                "individual_without_taxpayer_code"
            }
        }
    }

    /// Record the anomaly was found on, when it is tied to one.
    #[must_use]
    pub const fn record_id(&self) -> Option<RecordId> {
        match self {
            InvalidReason::SoleRecordShareMismatch { record_id, .. }
            | InvalidReason::SharedRecordWithoutCoOwners { record_id }
            | InvalidReason::NonIndividualSubject { record_id }
            | InvalidReason::IndividualWithoutTaxpayerCode { record_id } => Some(*record_id),
            InvalidReason::ShareSumMismatch { .. } => None,
        }
    }
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::SoleRecordShareMismatch { record_id, sum } => {
                write!(f, "record {record_id} has a single subject but its share sums to {sum}")
            }
            InvalidReason::ShareSumMismatch {
                sum,
                missing_share_sizes: true,
            } => write!(f, "share sizes sum to {sum} and some records have no share size"),
            InvalidReason::ShareSumMismatch {
                sum,
                missing_share_sizes: false,
            } => write!(f, "share sizes sum to {sum} instead of 1"),
            InvalidReason::SharedRecordWithoutCoOwners { record_id } => {
                write!(f, "record {record_id} is common shared but names fewer than two subjects")
            }
            InvalidReason::NonIndividualSubject { record_id } => {
                write!(f, "record {record_id} names a non-individual subject")
            }
            InvalidReason::IndividualWithoutTaxpayerCode { record_id } => {
                write!(f, "record {record_id} names an individual without a taxpayer code")
            }
        }
    }
}

/// Outcome of [`validate_ownership_set`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", content = "reason", rename_all = "camelCase")]
pub enum Verdict {
    Valid,
    Invalid(InvalidReason),
}

impl Verdict {
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }

    #[must_use]
    pub const fn reason(&self) -> Option<&InvalidReason> {
        match self {
            Verdict::Valid => None,
            Verdict::Invalid(reason) => Some(reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error(transparent)]
    MalformedShareExpression(#[from] MalformedShareExpression),
    /// No ownership type matched. A data-quality failure; retrying is pointless.
    #[error("failed to determine ownership type")]
    UndeterminedOwnershipType,
}

// ============================================================================
// Validation
// ============================================================================

/// Run the anomaly checks in order; the first one to fire decides the verdict.
pub fn validate_ownership_set(
    set: &PropertyOwnershipSet,
) -> Result<Verdict, MalformedShareExpression> {
    let sum = sum_shares(set)?;

    let reason = share_sum_anomaly(set, sum)
        .or_else(|| co_owner_anomaly(set))
        .or_else(|| subject_kind_anomaly(set));

    Ok(reason.map_or(Verdict::Valid, Verdict::Invalid))
}

fn share_sum_anomaly(set: &PropertyOwnershipSet, sum: Share) -> Option<InvalidReason> {
    if let Some(record) = set.single_record() {
        let mismatch = record.has_share_size() && !sum.is_one() && record.subjects().len() == 1;
        return mismatch.then(|| InvalidReason::SoleRecordShareMismatch {
            record_id: record.record_id(),
            sum,
        });
    }

    let declared = set.records().iter().any(OwnershipRecord::has_share_size);
    let missing_share_sizes = set.records().iter().any(|record| !record.has_share_size());

    (declared && (!sum.is_one() || missing_share_sizes)).then_some(InvalidReason::ShareSumMismatch {
        sum,
        missing_share_sizes,
    })
}

fn co_owner_anomaly(set: &PropertyOwnershipSet) -> Option<InvalidReason> {
    set.records()
        .iter()
        .find(|record| {
            record.common_kind() == Some(CommonKind::CommonShared) && record.subjects().len() < 2
        })
        .map(|record| InvalidReason::SharedRecordWithoutCoOwners {
            record_id: record.record_id(),
        })
}

fn subject_kind_anomaly(set: &PropertyOwnershipSet) -> Option<InvalidReason> {
    let non_individual = set
        .records()
        .iter()
        .find(|record| record.subjects().iter().any(|subject| !subject.is_individual()))
        .map(|record| InvalidReason::NonIndividualSubject {
            record_id: record.record_id(),
        });
    if non_individual.is_some() {
        return non_individual;
    }

    set.records()
        .iter()
        .find(|record| {
            record
                .subjects()
                .iter()
                .any(|subject| subject.is_individual() && subject.taxpayer_code().is_none())
        })
        .map(|record| InvalidReason::IndividualWithoutTaxpayerCode {
            record_id: record.record_id(),
        })
}

// ============================================================================
// Classification
// ============================================================================

/// How a single record is shaped, as far as the multi-record rules care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordShape {
    /// One subject holding a declared, explicitly partial share.
    PartialShare,
    /// Several subjects jointly holding a declared share.
    SharedShare,
    Other,
}

impl RecordShape {
    fn of(record: &OwnershipRecord) -> Self {
        if !record.has_share_size() {
            return RecordShape::Other;
        }
        match (record.subjects().len(), record.common_kind()) {
            (1, Some(CommonKind::CommonPartial)) => RecordShape::PartialShare,
            (n, Some(CommonKind::CommonShared)) if n > 1 => RecordShape::SharedShare,
            _ => RecordShape::Other,
        }
    }
}

/// Facts every predicate needs, computed once per set.
struct Holdings<'a> {
    set: &'a PropertyOwnershipSet,
    sum: Share,
    /// Distinct taxpayer codes across all subjects; a missing code counts as
    /// one more distinct holder.
    holders: BTreeSet<Option<&'a str>>,
}

impl<'a> Holdings<'a> {
    fn gather(set: &'a PropertyOwnershipSet) -> Result<Self, MalformedShareExpression> {
        let holders = set
            .subjects()
            .map(|subject| subject.taxpayer_code().map(TaxpayerCode::as_str))
            .collect();
        Ok(Self {
            set,
            sum: sum_shares(set)?,
            holders,
        })
    }

    /// The inquirer holds alongside at least one other holder.
    fn has_peer(&self, subject_id: &str) -> bool {
        self.holders.len() > 1 && self.holders.contains(&Some(subject_id))
    }

    fn all_records(&self, predicate: impl Fn(&OwnershipRecord) -> bool) -> bool {
        self.set.records().iter().all(predicate)
    }

    fn is_single(&self, subject_id: &str) -> bool {
        let held_alone = |record: &OwnershipRecord| {
            record
                .sole_subject()
                .is_some_and(|subject| subject.has_code(subject_id))
        };

        if let Some(record) = self.set.single_record() {
            let share_fits = self.sum.is_one() || !record.has_share_size();
            let kind_fits = matches!(record.common_kind(), None | Some(CommonKind::CommonPartial));
            return share_fits && kind_fits && held_alone(record);
        }

        self.sum.is_one()
            && self.all_records(|record| {
                RecordShape::of(record) == RecordShape::PartialShare && held_alone(record)
            })
    }

    fn is_common_partial(&self, subject_id: &str) -> bool {
        self.set.len() > 1
            && self.sum.is_one()
            && self.all_records(|record| RecordShape::of(record) == RecordShape::PartialShare)
            && self.has_peer(subject_id)
    }

    fn is_common_shared(&self, subject_id: &str) -> bool {
        if !self.has_peer(subject_id) {
            return false;
        }

        if let Some(record) = self.set.single_record() {
            return record.common_kind() == Some(CommonKind::CommonShared)
                && (self.sum.is_one() || !record.has_share_size());
        }

        // Joint shares, possibly mixed with single-subject partial shares. At
        // least one joint share is required; all-partial sets are common partial.
        self.sum.is_one()
            && self.all_records(|record| {
                matches!(
                    RecordShape::of(record),
                    RecordShape::SharedShare | RecordShape::PartialShare
                )
            })
            && self
                .set
                .records()
                .iter()
                .any(|record| RecordShape::of(record) == RecordShape::SharedShare)
    }
}

/// Decide the inquiring subject's ownership type.
///
/// Rules are tried in order: single, then common partial, then common shared.
/// Single goes first so a sole owner split across partial records is not read
/// as a partial co-owner of themselves.
///
/// Callers are expected to run [`validate_ownership_set`] first; on an invalid
/// set the answer is unspecified.
pub fn classify_ownership(
    set: &PropertyOwnershipSet,
    subject_id: &str,
) -> Result<OwnershipType, ClassifyError> {
    let holdings = Holdings::gather(set)?;

    if holdings.is_single(subject_id) {
        Ok(OwnershipType::Single)
    } else if holdings.is_common_partial(subject_id) {
        Ok(OwnershipType::CommonPartial)
    } else if holdings.is_common_shared(subject_id) {
        Ok(OwnershipType::CommonShared)
    } else {
        Err(ClassifyError::UndeterminedOwnershipType)
    }
}

/// The subject is the property's only owner.
pub fn is_single(
    set: &PropertyOwnershipSet,
    subject_id: &str,
) -> Result<bool, MalformedShareExpression> {
    Ok(Holdings::gather(set)?.is_single(subject_id))
}

/// The subject co-owns through separately titled partial shares.
pub fn is_common_partial(
    set: &PropertyOwnershipSet,
    subject_id: &str,
) -> Result<bool, MalformedShareExpression> {
    Ok(Holdings::gather(set)?.is_common_partial(subject_id))
}

/// The subject co-owns jointly with others.
pub fn is_common_shared(
    set: &PropertyOwnershipSet,
    subject_id: &str,
) -> Result<bool, MalformedShareExpression> {
    Ok(Holdings::gather(set)?.is_common_shared(subject_id))
}

// ============================================================================
// Owner extraction
// ============================================================================

/// Flatten every identified individual into one owner entry, in record order
/// and then subject order. Entities and individuals without a code are skipped.
#[must_use]
pub fn extract_individual_owners(set: &PropertyOwnershipSet) -> Vec<PropertyOwnerInfo> {
    set.records()
        .iter()
        .flat_map(|record| {
            record.subjects().iter().filter_map(move |subject| {
                let code = subject.taxpayer_code().filter(|_| subject.is_individual())?;
                Some(PropertyOwnerInfo {
                    full_name: subject.name().to_string(),
                    taxpayer_code: code.clone(),
                    record_id: record.record_id(),
                    share_size: record.share_size().map(str::to_string),
                    common_kind: record.common_kind(),
                })
            })
        })
        .collect()
}
