//! Entry use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD entry points for core callers.
//! - Own the import use-case that backfills historical timestamps.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::entry::{Entry, EntryId};
use crate::model::timestamps::Stamped;
use crate::repo::entry_repo::{EntryListQuery, EntryRepository, RepoResult};
use chrono::{DateTime, Utc};

/// Use-case service wrapper for entry CRUD operations.
pub struct EntryService<R: EntryRepository> {
    repo: R,
}

/// Request model for importing an entry from an external system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEntryRequest {
    /// Stable ID carried over from the source system, when it has one.
    pub uuid: Option<EntryId>,
    /// Text payload.
    pub content: String,
    /// Historical creation time to keep verbatim.
    pub created: DateTime<Utc>,
    /// Historical modification time to keep verbatim.
    pub modified: DateTime<Utc>,
    /// Initial pinned state.
    pub pinned: bool,
}

impl<R: EntryRepository> EntryService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a new entry and returns it with its managed timestamps set.
    pub fn create_entry(&self, content: impl Into<String>) -> RepoResult<Entry> {
        let mut entry = Entry::new(content);
        self.repo.create_entry(&mut entry)?;
        Ok(entry)
    }

    /// Imports an entry while keeping its historical timestamps.
    ///
    /// # Contract
    /// - `created` and `modified` are persisted exactly as supplied, not
    ///   replaced by the current time.
    /// - A supplied `uuid` is kept; otherwise one is generated.
    pub fn import_entry(&self, request: &ImportEntryRequest) -> RepoResult<Entry> {
        let mut entry = match request.uuid {
            Some(uuid) => Entry::with_id(uuid, request.content.clone())?,
            None => Entry::new(request.content.clone()),
        };
        entry.pinned = request.pinned;
        entry.set_created_date(request.created);
        entry.set_modified_date(request.modified);
        self.repo.create_entry(&mut entry)?;
        Ok(entry)
    }

    /// Updates an existing entry by stable ID.
    ///
    /// Returns repository-level not-found or validation errors unchanged.
    pub fn update_entry(&self, entry: &mut Entry) -> RepoResult<()> {
        self.repo.update_entry(entry)
    }

    /// Gets one entry by ID.
    pub fn get_entry(&self, id: EntryId) -> RepoResult<Option<Entry>> {
        self.repo.get_entry(id)
    }

    /// Lists entries using filter and pagination options.
    pub fn list_entries(&self, query: &EntryListQuery) -> RepoResult<Vec<Entry>> {
        self.repo.list_entries(query)
    }

    /// Deletes an entry by ID.
    pub fn delete_entry(&self, id: EntryId) -> RepoResult<()> {
        self.repo.delete_entry(id)
    }
}
