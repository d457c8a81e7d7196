//! Shared builders for ownership sets.

#![allow(dead_code)]

use std::path::Path;

use drrp_types::{CommonKind, OwnershipRecord, PropertyOwnershipSet, RecordId, Subject};

pub const INQUIRER: &str = "3012345678";
pub const CO_OWNER: &str = "2987654321";
pub const OTHER: &str = "1122334455";

pub fn person(code: &str) -> Subject {
    Subject::individual(format!("Owner {code}"), code)
}

pub fn record(
    id: u64,
    share_size: Option<&str>,
    common_kind: Option<CommonKind>,
    subjects: Vec<Subject>,
) -> OwnershipRecord {
    let mut record = OwnershipRecord::new(RecordId::new(id), subjects).unwrap();
    if let Some(size) = share_size {
        record = record.with_share_size(size);
    }
    if let Some(kind) = common_kind {
        record = record.with_common_kind(kind);
    }
    record
}

pub fn set(records: Vec<OwnershipRecord>) -> PropertyOwnershipSet {
    PropertyOwnershipSet::new(records)
}

/// Write `set` as `<dir>/<realty id>.json`.
pub fn write_fixture(dir: &Path, realty_id: &str, set: &PropertyOwnershipSet) {
    let json = serde_json::to_string_pretty(set).unwrap();
    std::fs::write(dir.join(format!("{realty_id}.json")), json).unwrap();
}
