//! Ownership assessment against a DRRP registry source.
//!
//! [`Assessor`] drives the pure rules in `drrp_core`: it fetches a property's
//! ownership set, validates it, classifies the inquiring subject and extracts
//! individual owners, logging each outcome.

#![allow(clippy::missing_errors_doc)]

mod assess;
mod source;

pub use assess::{AssessError, Assessment, Assessor};
pub use drrp_config::DrrpConfig;
pub use source::{FixtureSource, RegistryError, RegistrySource};

/// Build a fixture-backed assessor from configuration.
///
/// `fixtures_dir` overrides the configured directory. Returns `None` when
/// neither names one.
#[must_use]
pub fn fixture_assessor(
    config: &DrrpConfig,
    fixtures_dir: Option<std::path::PathBuf>,
) -> Option<Assessor<FixtureSource>> {
    let dir = fixtures_dir.or_else(|| config.fixtures_dir())?;
    let source =
        FixtureSource::new(dir).with_unavailable_process_code(config.unavailable_process_code());
    Some(Assessor::new(source).with_invalid_data_process_code(config.invalid_data_process_code()))
}
