//! Active/inactive flag carried by every record.

use serde::{Deserialize, Serialize};

/// Record status.
///
/// The backend encodes this as an integer `estado` field: `1` is active and
/// every other value is treated as inactive. The client only ever writes `1`
/// or `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<i64>", into = "i64")]
pub enum Status {
    Active,
    Inactive,
}

impl Status {
    pub fn is_active(self) -> bool {
        self == Status::Active
    }

    /// The opposite status (used by the permission toggle).
    pub fn flipped(self) -> Self {
        match self {
            Status::Active => Status::Inactive,
            Status::Inactive => Status::Active,
        }
    }

    /// Status assumed for records that arrive without an `estado` field.
    pub(crate) fn absent() -> Self {
        Status::Inactive
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Inactive => "inactive",
        }
    }
}

impl From<i64> for Status {
    fn from(value: i64) -> Self {
        if value == 1 {
            Status::Active
        } else {
            Status::Inactive
        }
    }
}

impl From<Option<i64>> for Status {
    /// `null` is read as inactive.
    fn from(value: Option<i64>) -> Self {
        value.map_or(Status::Inactive, Status::from)
    }
}

impl From<Status> for i64 {
    fn from(value: Status) -> Self {
        match value {
            Status::Active => 1,
            Status::Inactive => 0,
        }
    }
}

impl From<bool> for Status {
    fn from(active: bool) -> Self {
        if active { Status::Active } else { Status::Inactive }
    }
}

impl core::fmt::Display for Status {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.pad(self.label())
    }
}
