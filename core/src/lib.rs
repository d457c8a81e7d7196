//! Ownership classification and data-integrity rules for DRRP records.
//!
//! Pure functions over [`drrp_types`] values: share arithmetic, validation of
//! a property's ownership set, classification of a subject's stake, and
//! extraction of individual owners. No IO happens here.

#![allow(clippy::missing_errors_doc)]

mod classifier;
mod legacy;
pub mod shares;

pub use classifier::{
    AnomalyCheck, ClassifyError, InvalidReason, Verdict, classify_ownership,
    extract_individual_owners, is_common_partial, is_common_shared, is_single,
    validate_ownership_set,
};
#[allow(deprecated)]
pub use legacy::{check_owners_shares, is_sole_owner};
pub use shares::{
    MalformedShareExpression, Share, ShareFault, evaluate_share, sum_expressions, sum_shares,
};
