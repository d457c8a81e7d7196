//! Property tests for the classifier.
//!
//! Uses proptest to check that the ownership predicates never overlap, that
//! classification follows their precedence, and that every operation is a
//! pure function of its input.

use drrp_core::{
    ClassifyError, classify_ownership, extract_individual_owners, is_common_partial,
    is_common_shared, is_single, sum_shares, validate_ownership_set,
};
use drrp_types::{CommonKind, OwnershipRecord, OwnershipType, PropertyOwnershipSet, RecordId, Subject};
use proptest::prelude::*;

const CODES: [&str; 3] = ["1000000001", "1000000002", "1000000003"];

fn subject() -> impl Strategy<Value = Subject> {
    prop_oneof![
        8 => prop::sample::select(CODES.to_vec())
            .prop_map(|code| Subject::individual(format!("Owner {code}"), code)),
        1 => Just(Subject::individual_without_code("Minor")),
        1 => Just(Subject::entity("TOV Budinvest", None)),
    ]
}

fn share_size() -> impl Strategy<Value = Option<&'static str>> {
    prop::sample::select(vec![
        None,
        Some("1"),
        Some("1/2"),
        Some("1/3"),
        Some("2/3"),
        Some("1/4"),
        Some("3/4"),
    ])
}

fn common_kind() -> impl Strategy<Value = Option<CommonKind>> {
    prop::sample::select(vec![
        None,
        Some(CommonKind::CommonPartial),
        Some(CommonKind::CommonShared),
    ])
}

fn ownership_set() -> impl Strategy<Value = PropertyOwnershipSet> {
    prop::collection::vec(
        (share_size(), common_kind(), prop::collection::vec(subject(), 1..=3)),
        0..=4,
    )
    .prop_map(|parts| {
        let records = parts
            .into_iter()
            .zip(1u64..)
            .map(|((share, kind, subjects), id)| {
                let mut record = OwnershipRecord::new(RecordId::new(id), subjects).unwrap();
                if let Some(share) = share {
                    record = record.with_share_size(share);
                }
                if let Some(kind) = kind {
                    record = record.with_common_kind(kind);
                }
                record
            })
            .collect();
        PropertyOwnershipSet::new(records)
    })
}

fn inquirer() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![CODES[0], CODES[1], "9999999999"])
}

proptest! {
    #[test]
    fn predicates_never_overlap(set in ownership_set(), subject in inquirer()) {
        let holds = [
            is_single(&set, subject).unwrap(),
            is_common_partial(&set, subject).unwrap(),
            is_common_shared(&set, subject).unwrap(),
        ];
        prop_assert!(holds.iter().filter(|held| **held).count() <= 1, "{holds:?} for {set:?}");
    }

    #[test]
    fn classification_follows_predicate_precedence(set in ownership_set(), subject in inquirer()) {
        let expected = if is_single(&set, subject).unwrap() {
            Ok(OwnershipType::Single)
        } else if is_common_partial(&set, subject).unwrap() {
            Ok(OwnershipType::CommonPartial)
        } else if is_common_shared(&set, subject).unwrap() {
            Ok(OwnershipType::CommonShared)
        } else {
            Err(ClassifyError::UndeterminedOwnershipType)
        };
        prop_assert_eq!(classify_ownership(&set, subject), expected);
    }

    #[test]
    fn operations_are_idempotent(set in ownership_set(), subject in inquirer()) {
        prop_assert_eq!(sum_shares(&set).unwrap(), sum_shares(&set).unwrap());
        prop_assert_eq!(
            validate_ownership_set(&set).unwrap(),
            validate_ownership_set(&set).unwrap()
        );
        prop_assert_eq!(classify_ownership(&set, subject), classify_ownership(&set, subject));
        prop_assert_eq!(extract_individual_owners(&set), extract_individual_owners(&set));
    }

    #[test]
    fn extraction_keeps_only_identified_individuals(set in ownership_set()) {
        let owners = extract_individual_owners(&set);
        prop_assert!(owners.len() <= set.subjects().count());

        let eligible = set
            .subjects()
            .filter(|subject| subject.is_individual() && subject.taxpayer_code().is_some())
            .count();
        prop_assert_eq!(owners.len(), eligible);
        prop_assert!(owners.iter().all(|owner| CODES.contains(&owner.taxpayer_code.as_str())));
    }

    #[test]
    fn lone_unshared_record_is_single_for_its_subject(
        code in prop::sample::select(CODES.to_vec()),
        subject in inquirer(),
        kind in common_kind(),
    ) {
        let record = OwnershipRecord::new(
            RecordId::new(1),
            vec![Subject::individual("Owner", code)],
        )
        .unwrap();
        let record = match kind {
            Some(kind) => record.with_common_kind(kind),
            None => record,
        };
        let set = PropertyOwnershipSet::new(vec![record]);

        let expected = code == subject && kind != Some(CommonKind::CommonShared);
        prop_assert_eq!(is_single(&set, subject).unwrap(), expected);
    }
}
