//! Narrow predecessors of the classifier, kept for existing call sites.
//!
//! Both compare the share sum with `>= 1` where the classifier demands
//! exactly one. That difference is deliberate compatibility behaviour: callers
//! still on these functions accept over-declared shares.

use drrp_types::{CommonKind, OwnershipRecord};

use crate::shares::{MalformedShareExpression, sum_shares};

/// Legacy sole-ownership test.
///
/// Looks only at the first subject of each record. True when those subjects
/// share one taxpayer code and the first record is either unqualified or
/// jointly held, or is partial with shares summing to at least one.
///
/// Disagrees with [`crate::classify_ownership`] on a lone joint record (true
/// here, common shared there) and on over-declared shares such as `3/2`
/// (true here, undetermined there).
#[deprecated(note = "use classify_ownership")]
pub fn is_sole_owner(records: &[OwnershipRecord]) -> Result<bool, MalformedShareExpression> {
    let Some(first) = records.first() else {
        return Ok(false);
    };

    let mut codes = records
        .iter()
        .filter_map(|record| record.subjects().first()?.taxpayer_code());
    let Some(owner) = codes.next() else {
        return Ok(false);
    };
    if codes.any(|code| code != owner) {
        return Ok(false);
    }

    first_record_shares_cover_property(first, records)
}

/// Legacy share-coverage test.
///
/// True for unqualified or jointly held property; for partial property, true
/// when the declared shares sum to at least one.
#[deprecated(note = "use validate_ownership_set")]
pub fn check_owners_shares(records: &[OwnershipRecord]) -> Result<bool, MalformedShareExpression> {
    match records.first() {
        Some(first) => first_record_shares_cover_property(first, records),
        None => Ok(false),
    }
}

fn first_record_shares_cover_property(
    first: &OwnershipRecord,
    records: &[OwnershipRecord],
) -> Result<bool, MalformedShareExpression> {
    match first.common_kind() {
        None | Some(CommonKind::CommonShared) => Ok(true),
        Some(CommonKind::CommonPartial) => Ok(sum_shares(records)?.is_at_least_one()),
    }
}
