//! End-to-end classification scenarios over decoded registry records.

use drrp_core::{
    AnomalyCheck, ClassifyError, InvalidReason, Share, Verdict, classify_ownership,
    extract_individual_owners, sum_shares, validate_ownership_set,
};
use drrp_types::{CommonKind, OwnershipRecord, OwnershipType, PropertyOwnershipSet, Subject};

use crate::common::{CO_OWNER, INQUIRER, OTHER, person, record, set};

#[test]
fn sole_owner_with_whole_share() {
    let records = set(vec![record(1, Some("1"), None, vec![person(INQUIRER)])]);

    assert_eq!(validate_ownership_set(&records).unwrap(), Verdict::Valid);
    assert_eq!(
        classify_ownership(&records, INQUIRER),
        Ok(OwnershipType::Single)
    );
}

#[test]
fn two_halves_held_by_different_people() {
    let records = set(vec![
        record(1, Some("1/2"), Some(CommonKind::CommonPartial), vec![person(INQUIRER)]),
        record(2, Some("1/2"), Some(CommonKind::CommonPartial), vec![person(CO_OWNER)]),
    ]);

    assert!(validate_ownership_set(&records).unwrap().is_valid());
    assert_eq!(
        classify_ownership(&records, INQUIRER),
        Ok(OwnershipType::CommonPartial)
    );
    assert_eq!(
        classify_ownership(&records, CO_OWNER),
        Ok(OwnershipType::CommonPartial)
    );
}

#[test]
fn joint_owners_on_one_record() {
    let records = set(vec![record(
        1,
        None,
        Some(CommonKind::CommonShared),
        vec![person(INQUIRER), person(CO_OWNER)],
    )]);

    assert!(validate_ownership_set(&records).unwrap().is_valid());
    assert_eq!(
        classify_ownership(&records, INQUIRER),
        Ok(OwnershipType::CommonShared)
    );
}

#[test]
fn lone_subject_with_half_share_is_untrustworthy() {
    let records = set(vec![record(7, Some("1/2"), None, vec![person(INQUIRER)])]);

    let verdict = validate_ownership_set(&records).unwrap();
    let reason = verdict.reason().unwrap();
    assert_eq!(reason.check(), AnomalyCheck::ShareSum);
    assert_eq!(
        reason,
        &InvalidReason::SoleRecordShareMismatch {
            record_id: drrp_types::RecordId::new(7),
            sum: Share::ratio(1, 2).unwrap(),
        }
    );
}

#[test]
fn entity_subject_is_untrustworthy() {
    let records = set(vec![record(
        3,
        None,
        Some(CommonKind::CommonShared),
        vec![person(INQUIRER), Subject::entity("TOV Zhytlobud", None)],
    )]);

    let verdict = validate_ownership_set(&records).unwrap();
    assert!(matches!(
        verdict,
        Verdict::Invalid(InvalidReason::NonIndividualSubject { .. })
    ));
    assert!(extract_individual_owners(&records)
        .iter()
        .all(|owner| owner.taxpayer_code.as_str() == INQUIRER));
}

#[test]
fn share_sums_match_documented_examples() {
    let none: [OwnershipRecord; 0] = [];
    assert_eq!(sum_shares(&none).unwrap(), Share::zero());

    let halves = set(vec![
        record(1, Some("1/2"), None, vec![person(INQUIRER)]),
        record(2, Some("1/2"), None, vec![person(CO_OWNER)]),
    ]);
    assert_eq!(sum_shares(&halves).unwrap(), Share::one());

    let third_and_blank = set(vec![
        record(1, Some("1/3"), None, vec![person(INQUIRER)]),
        record(2, None, None, vec![person(CO_OWNER)]),
    ]);
    assert_eq!(sum_shares(&third_and_blank).unwrap(), Share::ratio(1, 3).unwrap());
}

#[test]
fn registry_json_flows_through_every_operation() {
    let json = format!(
        r#"[
            {{
                "recordId": 41,
                "shareSize": "1/4",
                "commonKind": "commonShared",
                "subjects": [
                    {{"name": "Kovalenko Mariia", "taxpayerCode": "{INQUIRER}", "kind": "individual"}},
                    {{"name": "Kovalenko Petro", "taxpayerCode": "{CO_OWNER}", "kind": "individual"}}
                ]
            }},
            {{
                "recordId": 42,
                "shareSize": "3/4",
                "commonKind": "commonPartial",
                "subjects": [
                    {{"name": "Shevchuk Oleh", "taxpayerCode": "{OTHER}", "kind": "individual"}}
                ]
            }}
        ]"#
    );
    let records: PropertyOwnershipSet = serde_json::from_str(&json).unwrap();

    assert!(validate_ownership_set(&records).unwrap().is_valid());
    assert_eq!(
        classify_ownership(&records, INQUIRER),
        Ok(OwnershipType::CommonShared)
    );
    assert_eq!(
        classify_ownership(&records, OTHER),
        Ok(OwnershipType::CommonShared)
    );

    let owners = extract_individual_owners(&records);
    let codes: Vec<&str> = owners.iter().map(|owner| owner.taxpayer_code.as_str()).collect();
    assert_eq!(codes, [INQUIRER, CO_OWNER, OTHER]);
    assert_eq!(owners[2].share_size.as_deref(), Some("3/4"));
    assert_eq!(owners[2].common_kind, Some(CommonKind::CommonPartial));
}

#[test]
fn stranger_to_the_property_is_undetermined() {
    let records = set(vec![
        record(1, Some("1/2"), Some(CommonKind::CommonPartial), vec![person(INQUIRER)]),
        record(2, Some("1/2"), Some(CommonKind::CommonPartial), vec![person(CO_OWNER)]),
    ]);
    assert_eq!(
        classify_ownership(&records, OTHER),
        Err(ClassifyError::UndeterminedOwnershipType)
    );
}
