//! Automatic `created`/`modified` timestamp bookkeeping for persisted
//! records, plus a reference SQLite host exercising the policy end to end.
//! This crate is the single source of truth for the timestamp lifecycle
//! invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::entry::{Entry, EntryId, EntryValidationError};
pub use model::timestamps::{Stamped, Timestamps};
pub use repo::entry_repo::{
    EntryListQuery, EntryRepository, RepoError, RepoResult, SqliteEntryRepository,
};
pub use service::entry_service::{EntryService, ImportEntryRequest};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
