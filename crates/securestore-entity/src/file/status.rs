//! File lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a file record.
///
/// The only legal transition is `Pending -> Uploaded`. A pending record may
/// also end by deletion when its upload is abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "file_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// Metadata exists, bytes not yet confirmed present.
    Pending,
    /// Bytes confirmed present and usable.
    Uploaded,
}

impl FileStatus {
    /// Check whether moving to `next` is a legal transition.
    pub fn can_transition_to(&self, next: FileStatus) -> bool {
        matches!((self, next), (Self::Pending, Self::Uploaded))
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Uploaded => "uploaded",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
