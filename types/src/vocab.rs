//! Registry vocabulary.
//!
//! The registry spells ownership kinds as Ukrainian display text. Domain enums
//! stay free of that text; this table is the only place it lives, and the CLI
//! uses it to label its output.

use crate::{CommonKind, OwnershipType};

impl CommonKind {
    /// Registry spelling of `prCommonKind`.
    #[must_use]
    pub const fn registry_label(self) -> &'static str {
        match self {
            CommonKind::CommonShared => "спільна сумісна",
            CommonKind::CommonPartial => "спільна часткова",
        }
    }
}

impl OwnershipType {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            OwnershipType::Single => "одноосібна власність",
            OwnershipType::CommonShared => "спільна сумісна власність",
            OwnershipType::CommonPartial => "спільна часткова власність",
        }
    }
}
