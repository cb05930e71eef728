use std::fmt;

use serde::{Deserialize, Serialize};

/// Primary key of a persisted record. Absent until the store assigns one.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct RecordId(pub i64);

impl RecordId {
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId(value)
    }
}

impl From<RecordId> for i64 {
    fn from(value: RecordId) -> Self {
        value.0
    }
}

/// Structural copy with explicit field classification.
///
/// Every implementation spells out what a copy carries:
/// the primary key is never copied, owned child collections are never
/// copied, and foreign-key scalars travel only when `with_foreign_keys`
/// is set. Value fields are copied structurally, so a clone shares no
/// identity with its source and can be inserted as a fresh record.
pub trait Record {
    fn clone_record(&self, with_foreign_keys: bool) -> Self;
}

pub(crate) fn fk(with_foreign_keys: bool, value: Option<RecordId>) -> Option<RecordId> {
    if with_foreign_keys { value } else { None }
}
