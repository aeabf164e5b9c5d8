//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - The repository is the only layer that knows insert-vs-update, so it is
//!   the only caller of the timestamp persistence hooks.
//! - Repository writes must enforce `Entry::validate()` before SQL
//!   mutations.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod entry_repo;
