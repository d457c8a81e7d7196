//! Core domain types for DRRP ownership records.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Registry display text lives in [`vocab`], never in the enums themselves.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod ids;
mod record;
pub mod vocab;

pub use ids::{EmptyRealtyId, EmptyTaxpayerCode, RealtyId, RecordId, TaxpayerCode};
pub use record::{OwnershipRecord, PropertyOwnerInfo, PropertyOwnershipSet, RecordError, Subject};

use serde::{Deserialize, Serialize};

// ============================================================================
// Discriminants
// ============================================================================

/// Legal kind of a subject named on a record.
///
/// Only individuals are eligible co-owners for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubjectKind {
    Individual,
    Entity,
}

/// Form of common ownership declared on a record (`prCommonKind`).
///
/// A record without one is sole or unspecified ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommonKind {
    /// Joint, undivided ownership among several subjects.
    CommonShared,
    /// Ownership split into explicit fractional shares.
    CommonPartial,
}

impl CommonKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            CommonKind::CommonShared => "commonShared",
            CommonKind::CommonPartial => "commonPartial",
        }
    }
}

/// Result of classifying an inquiring subject's stake in a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OwnershipType {
    Single,
    CommonShared,
    CommonPartial,
}

impl OwnershipType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            OwnershipType::Single => "single",
            OwnershipType::CommonShared => "commonShared",
            OwnershipType::CommonPartial => "commonPartial",
        }
    }
}

impl std::fmt::Display for OwnershipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
