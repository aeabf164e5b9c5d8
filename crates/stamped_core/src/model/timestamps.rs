//! Timestamp bookkeeping for persisted records.
//!
//! # Responsibility
//! - Own the `created`/`modified` pair every stamped record carries.
//! - Apply the first-save vs. subsequent-save assignment policy.
//! - Provide manual overrides for data imported from external systems.
//!
//! # Invariants
//! - `created` receives at most one automatic assignment per record.
//! - `modified` is reassigned on every persistence unless overridden.
//! - Override latches never reach storage; records loaded back from a row
//!   resume fully automatic behavior.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Deserialized values always resume automatic behavior.
fn automatic() -> bool {
    true
}

/// Managed `created`/`modified` pair embedded in persistable records.
///
/// Both attributes stay `None` until the host persistence layer reports the
/// first durable write through [`Timestamps::on_first_persist`]. Only the
/// host knows whether a write is an insert or an update, so the policy is
/// driven entirely by which hook it calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    created: Option<DateTime<Utc>>,
    modified: Option<DateTime<Utc>>,
    /// In-memory only; `false` once `set_created_date` has been called.
    #[serde(skip, default = "automatic")]
    auto_created: bool,
    /// In-memory only; `false` once `set_modified_date` has been called.
    #[serde(skip, default = "automatic")]
    auto_modified: bool,
}

impl Timestamps {
    /// Creates an unstamped pair with automatic assignment armed.
    pub fn new() -> Self {
        Self {
            created: None,
            modified: None,
            auto_created: true,
            auto_modified: true,
        }
    }

    /// Rebuilds the pair from stored column values.
    ///
    /// Override latches are a property of the in-memory value that set
    /// them, not of the row, so loaded records are always automatic again.
    pub fn from_stored(created: DateTime<Utc>, modified: DateTime<Utc>) -> Self {
        Self {
            created: Some(created),
            modified: Some(modified),
            auto_created: true,
            auto_modified: true,
        }
    }

    /// Creation time; `None` until the record is first persisted.
    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created
    }

    /// Last-modified time; `None` until the record is first persisted.
    pub fn modified(&self) -> Option<DateTime<Utc>> {
        self.modified
    }

    /// First durable write of the owning record.
    ///
    /// # Contract
    /// - Assigns `now` to both attributes unless a manual override already
    ///   holds a value for that attribute.
    /// - Both attributes are `Some` after this call.
    /// - Returns the `(created, modified)` pair the host must write.
    pub fn on_first_persist(&mut self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        if self.auto_created || self.created.is_none() {
            self.created = Some(now);
        }
        if self.auto_modified || self.modified.is_none() {
            self.modified = Some(now);
        }
        (self.created.unwrap_or(now), self.modified.unwrap_or(now))
    }

    /// Every durable write after the first.
    ///
    /// # Contract
    /// - Reassigns `modified` to `now` unless a manual override already
    ///   holds a value.
    /// - Never touches `created`.
    /// - Returns the `modified` value the host must write.
    pub fn on_every_persist(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        if self.auto_modified || self.modified.is_none() {
            self.modified = Some(now);
        }
        self.modified.unwrap_or(now)
    }

    /// Assigns the creation time manually, bypassing automatic assignment
    /// for the lifetime of this in-memory value.
    ///
    /// Intended for importing data that already has a history; the next
    /// persistence writes exactly `value`.
    pub fn set_created_date(&mut self, value: DateTime<Utc>) {
        self.auto_created = false;
        self.created = Some(value);
    }

    /// Assigns the last-modified time manually; same lifetime rule as
    /// [`Timestamps::set_created_date`].
    pub fn set_modified_date(&mut self, value: DateTime<Utc>) {
        self.auto_modified = false;
        self.modified = Some(value);
    }
}

impl Default for Timestamps {
    fn default() -> Self {
        Self::new()
    }
}

/// Read/override surface shared by every record embedding [`Timestamps`].
///
/// Implementors wire up the two accessors; the attribute and override
/// methods are provided so call sites read the same on every record type.
pub trait Stamped {
    fn timestamps(&self) -> &Timestamps;
    fn timestamps_mut(&mut self) -> &mut Timestamps;

    /// Creation time; `None` until the record is first persisted.
    fn created(&self) -> Option<DateTime<Utc>> {
        self.timestamps().created()
    }

    /// Last-modified time; `None` until the record is first persisted.
    fn modified(&self) -> Option<DateTime<Utc>> {
        self.timestamps().modified()
    }

    /// Manually assigns the creation time. See
    /// [`Timestamps::set_created_date`].
    fn set_created_date(&mut self, value: DateTime<Utc>) {
        self.timestamps_mut().set_created_date(value);
    }

    /// Manually assigns the last-modified time. See
    /// [`Timestamps::set_modified_date`].
    fn set_modified_date(&mut self, value: DateTime<Utc>) {
        self.timestamps_mut().set_modified_date(value);
    }
}
