//! Entry demo record.
//!
//! # Responsibility
//! - Define the concrete record the reference SQLite host persists.
//! - Show the intended embedding pattern for [`Timestamps`].
//!
//! # Invariants
//! - `uuid` is stable and never nil.
//! - `content` has at least one non-whitespace character.

use crate::model::timestamps::{Stamped, Timestamps};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every entry.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type EntryId = Uuid;

/// Validation failures for [`Entry`] payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryValidationError {
    NilUuid,
    BlankContent,
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilUuid => write!(f, "entry uuid must not be nil"),
            Self::BlankContent => write!(f, "entry content must not be blank"),
        }
    }
}

impl Error for EntryValidationError {}

/// Canonical record persisted by the reference host.
///
/// `stamps` is flattened so `created`/`modified` appear as top-level wire
/// fields, the same way they appear as columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Stable global ID used for linking and import mapping.
    pub uuid: EntryId,
    /// Free-form text payload.
    pub content: String,
    /// Mutable payload flag exercised by the update path.
    #[serde(default)]
    pub pinned: bool,
    /// Managed creation/modification times.
    #[serde(flatten)]
    pub stamps: Timestamps,
}

impl Entry {
    /// Creates a new unpinned entry with a generated stable ID.
    ///
    /// Timestamps stay unset until the first persistence.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            content: content.into(),
            pinned: false,
            stamps: Timestamps::new(),
        }
    }

    /// Creates an entry with a caller-provided stable ID.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(
        uuid: EntryId,
        content: impl Into<String>,
    ) -> Result<Self, EntryValidationError> {
        if uuid.is_nil() {
            return Err(EntryValidationError::NilUuid);
        }
        Ok(Self {
            uuid,
            content: content.into(),
            pinned: false,
            stamps: Timestamps::new(),
        })
    }

    /// Checks payload invariants ahead of persistence.
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if self.uuid.is_nil() {
            return Err(EntryValidationError::NilUuid);
        }
        if self.content.trim().is_empty() {
            return Err(EntryValidationError::BlankContent);
        }
        Ok(())
    }
}

impl Stamped for Entry {
    fn timestamps(&self) -> &Timestamps {
        &self.stamps
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.stamps
    }
}
