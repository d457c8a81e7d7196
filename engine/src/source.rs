//! Where ownership sets come from.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use drrp_types::{PropertyOwnershipSet, RealtyId};
use thiserror::Error;

/// A registry that can answer "who owns this property".
///
/// `Ok(None)` means the registry has no such property.
pub trait RegistrySource: Send + Sync {
    fn ownership_set(
        &self,
        realty_id: &RealtyId,
    ) -> Result<Option<PropertyOwnershipSet>, RegistryError>;
}

impl<S: RegistrySource + ?Sized> RegistrySource for &S {
    fn ownership_set(
        &self,
        realty_id: &RealtyId,
    ) -> Result<Option<PropertyOwnershipSet>, RegistryError> {
        (**self).ownership_set(realty_id)
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry unavailable: {reason}")]
    Unavailable {
        reason: String,
        process_code: Option<u32>,
    },
    #[error("registry returned undecodable ownership data for realty {realty_id}: {source}")]
    Undecodable {
        realty_id: RealtyId,
        #[source]
        source: serde_json::Error,
    },
}

impl RegistryError {
    #[must_use]
    pub fn process_code(&self) -> Option<u32> {
        match self {
            RegistryError::Unavailable { process_code, .. } => *process_code,
            RegistryError::Undecodable { .. } => None,
        }
    }
}

/// Serves decoded ownership sets from `<dir>/<realty id>.json`.
///
/// Each file holds the JSON array of records for one property.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    dir: PathBuf,
    unavailable_process_code: Option<u32>,
}

impl FixtureSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            unavailable_process_code: None,
        }
    }

    #[must_use]
    pub fn with_unavailable_process_code(mut self, code: Option<u32>) -> Self {
        self.unavailable_process_code = code;
        self
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn fixture_path(&self, realty_id: &RealtyId) -> Option<PathBuf> {
        let id = realty_id.as_str();
        // Ids name a file inside the directory, never a path out of it.
        if id.contains(['/', '\\']) || id == "." || id == ".." {
            return None;
        }
        Some(self.dir.join(format!("{id}.json")))
    }
}

impl RegistrySource for FixtureSource {
    fn ownership_set(
        &self,
        realty_id: &RealtyId,
    ) -> Result<Option<PropertyOwnershipSet>, RegistryError> {
        let Some(path) = self.fixture_path(realty_id) else {
            tracing::debug!(%realty_id, "Realty id is not a fixture name");
            return Ok(None);
        };

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Failed to read fixture");
                return Err(RegistryError::Unavailable {
                    reason: format!("{}: {err}", path.display()),
                    process_code: self.unavailable_process_code,
                });
            }
        };

        serde_json::from_str(&content).map(Some).map_err(|err| {
            tracing::warn!(path = %path.display(), error = %err, "Failed to decode fixture");
            RegistryError::Undecodable {
                realty_id: realty_id.clone(),
                source: err,
            }
        })
    }
}
