//! Domain model for timestamp-managed records.
//!
//! # Responsibility
//! - Define the reusable `created`/`modified` bookkeeping value type.
//! - Provide the demo record persisted by the reference SQLite host.
//!
//! # Invariants
//! - Timestamp assignment policy lives here; storage column ownership lives
//!   in the `db` migrations.
//! - Every persistable record embeds [`timestamps::Timestamps`] and
//!   implements [`timestamps::Stamped`].

pub mod entry;
pub mod timestamps;
