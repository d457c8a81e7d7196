//! Assessment through a fixture registry configured from a config file.

use drrp_config::DrrpConfig;
use drrp_core::Verdict;
use drrp_engine::{AssessError, RegistrySource, fixture_assessor};
use drrp_types::{CommonKind, OwnershipType, RealtyId};
use insta::assert_snapshot;
use tempfile::tempdir;

use crate::common::{CO_OWNER, INQUIRER, person, record, set, write_fixture};

fn realty(id: &str) -> RealtyId {
    RealtyId::new(id).unwrap()
}

#[test]
fn configured_fixture_directory_answers_assessments() {
    let fixtures = tempdir().unwrap();
    write_fixture(
        fixtures.path(),
        "1712345678000",
        &set(vec![
            record(1, Some("1/2"), Some(CommonKind::CommonPartial), vec![person(INQUIRER)]),
            record(2, Some("1/2"), Some(CommonKind::CommonPartial), vec![person(CO_OWNER)]),
        ]),
    );

    let config_dir = tempdir().unwrap();
    let config_path = config_dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        format!(
            "[registry]\nfixtures_dir = {:?}\ninvalid_data_process_code = 1011\n",
            fixtures.path().display().to_string()
        ),
    )
    .unwrap();

    let config = DrrpConfig::load_from(&config_path).unwrap();
    let assessor = fixture_assessor(&config, None).unwrap();
    let assessment = assessor.assess(&realty("1712345678000"), INQUIRER).unwrap();

    assert_eq!(assessment.verdict, Verdict::Valid);
    assert_eq!(assessment.ownership, Some(OwnershipType::CommonPartial));
    assert_eq!(assessment.owners.len(), 2);
}

#[test]
fn invalid_fixture_is_reported_not_raised() {
    let fixtures = tempdir().unwrap();
    write_fixture(
        fixtures.path(),
        "55",
        &set(vec![record(9, Some("1/3"), None, vec![person(INQUIRER)])]),
    );

    let assessor = fixture_assessor(&DrrpConfig::default(), Some(fixtures.path().into())).unwrap();
    let assessment = assessor.assess(&realty("55"), INQUIRER).unwrap();

    assert_eq!(assessment.ownership, None);
    let json = serde_json::to_string_pretty(&assessment.verdict).unwrap();
    assert_snapshot!(json, @r#"
    {
      "verdict": "invalid",
      "reason": {
        "code": "sole_record_share_mismatch",
        "record_id": 9,
        "sum": "1/3"
      }
    }
    "#);
}

#[test]
fn undetermined_ownership_uses_configured_process_code() {
    let fixtures = tempdir().unwrap();
    write_fixture(
        fixtures.path(),
        "77",
        &set(vec![record(
            1,
            None,
            Some(CommonKind::CommonShared),
            vec![person(CO_OWNER), person("2000000002")],
        )]),
    );

    let config: DrrpConfig = DrrpConfig {
        registry: Some(drrp_config::RegistryConfig {
            invalid_data_process_code: Some(1011),
            ..Default::default()
        }),
        logging: None,
    };
    let assessor = fixture_assessor(&config, Some(fixtures.path().into())).unwrap();
    let err = assessor.assess(&realty("77"), INQUIRER).unwrap_err();

    assert!(matches!(err, AssessError::UndeterminedOwnershipType { .. }));
    assert_eq!(err.process_code(), Some(1011));
}

#[test]
fn unknown_property_is_not_found() {
    let fixtures = tempdir().unwrap();
    let assessor = fixture_assessor(&DrrpConfig::default(), Some(fixtures.path().into())).unwrap();

    assert!(assessor.source().ownership_set(&realty("404")).unwrap().is_none());
    assert!(matches!(
        assessor.assess(&realty("404"), INQUIRER),
        Err(AssessError::NotFound(_))
    ));
}
