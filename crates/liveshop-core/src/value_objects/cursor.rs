//! Cursor value object
//!
//! A cursor marks "everything up to here has been seen" for a chat
//! subscription. The next poll asks only for items newer than the cursor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque last-seen position within a subscription.
///
/// Invariant: within a subscription's lifetime the cursor is monotonically
/// non-decreasing. `advance_to` enforces this by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(DateTime<Utc>);

impl Cursor {
    /// Create a cursor at the given instant
    #[must_use]
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    /// The instant this cursor marks
    #[inline]
    #[must_use]
    pub fn instant(&self) -> DateTime<Utc> {
        self.0
    }

    /// Advance to the candidate instant, never moving backwards
    #[must_use]
    pub fn advance_to(self, candidate: DateTime<Utc>) -> Self {
        Self(self.0.max(candidate))
    }
}

impl From<DateTime<Utc>> for Cursor {
    fn from(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
