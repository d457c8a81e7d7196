//! Fetch, validate, classify, extract.

use drrp_core::{
    ClassifyError, MalformedShareExpression, Verdict, classify_ownership,
    extract_individual_owners, validate_ownership_set,
};
use drrp_types::{OwnershipType, PropertyOwnerInfo, PropertyOwnershipSet, RealtyId};
use serde::Serialize;
use thiserror::Error;

use crate::source::{RegistryError, RegistrySource};

/// What the engine knows about one subject's stake in one property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub realty_id: RealtyId,
    pub verdict: Verdict,
    /// Present only when the verdict is valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ownership: Option<OwnershipType>,
    pub owners: Vec<PropertyOwnerInfo>,
}

impl Assessment {
    #[must_use]
    pub fn is_trusted(&self) -> bool {
        self.verdict.is_valid()
    }
}

#[derive(Debug, Error)]
pub enum AssessError {
    #[error("registry has no ownership records for realty {0}")]
    NotFound(RealtyId),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    MalformedShareExpression(#[from] MalformedShareExpression),
    #[error("failed to determine ownership type for realty {realty_id}")]
    UndeterminedOwnershipType {
        realty_id: RealtyId,
        process_code: Option<u32>,
    },
}

impl AssessError {
    /// Process code to report to the caller, when one is configured.
    #[must_use]
    pub fn process_code(&self) -> Option<u32> {
        match self {
            AssessError::Registry(err) => err.process_code(),
            AssessError::UndeterminedOwnershipType { process_code, .. } => *process_code,
            AssessError::NotFound(_) | AssessError::MalformedShareExpression(_) => None,
        }
    }
}

/// Answers ownership questions against a [`RegistrySource`].
///
/// The decision functions in `drrp_core` never log; the assessor is where
/// verdicts and failures are reported.
#[derive(Debug)]
pub struct Assessor<S> {
    source: S,
    invalid_data_process_code: Option<u32>,
}

impl<S: RegistrySource> Assessor<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            invalid_data_process_code: None,
        }
    }

    #[must_use]
    pub fn with_invalid_data_process_code(mut self, code: Option<u32>) -> Self {
        self.invalid_data_process_code = code;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Look the property up and assess `subject_id`'s stake in it.
    pub fn assess(&self, realty_id: &RealtyId, subject_id: &str) -> Result<Assessment, AssessError> {
        let set = self
            .source
            .ownership_set(realty_id)?
            .ok_or_else(|| AssessError::NotFound(realty_id.clone()))?;
        self.assess_set(realty_id, &set, subject_id)
    }

    /// Assess an ownership set that is already in hand.
    ///
    /// An invalid set is not an error: the verdict says why and no ownership
    /// type is reported. Owners are extracted either way.
    pub fn assess_set(
        &self,
        realty_id: &RealtyId,
        set: &PropertyOwnershipSet,
        subject_id: &str,
    ) -> Result<Assessment, AssessError> {
        let verdict = validate_ownership_set(set)?;
        let owners = extract_individual_owners(set);

        let ownership = match verdict.reason() {
            Some(reason) => {
                tracing::info!(
                    %realty_id,
                    code = reason.code(),
                    record_id = reason.record_id().map(|id| id.value()),
                    "Invalid DRRP data: {reason}"
                );
                None
            }
            None => Some(self.classify(realty_id, set, subject_id)?),
        };

        Ok(Assessment {
            realty_id: realty_id.clone(),
            verdict,
            ownership,
            owners,
        })
    }

    fn classify(
        &self,
        realty_id: &RealtyId,
        set: &PropertyOwnershipSet,
        subject_id: &str,
    ) -> Result<OwnershipType, AssessError> {
        match classify_ownership(set, subject_id) {
            Ok(ownership) => {
                tracing::debug!(%realty_id, ownership = ownership.as_str(), "Classified ownership");
                Ok(ownership)
            }
            Err(ClassifyError::MalformedShareExpression(err)) => Err(err.into()),
            Err(ClassifyError::UndeterminedOwnershipType) => {
                tracing::error!(
                    %realty_id,
                    records = set.len(),
                    "Failed to determine ownership type"
                );
                Err(AssessError::UndeterminedOwnershipType {
                    realty_id: realty_id.clone(),
                    process_code: self.invalid_data_process_code,
                })
            }
        }
    }
}
