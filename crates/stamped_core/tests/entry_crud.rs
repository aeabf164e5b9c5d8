use rusqlite::Connection;
use stamped_core::db::migrations::latest_version;
use stamped_core::db::open_db_in_memory;
use stamped_core::{
    Entry, EntryListQuery, EntryRepository, EntryService, RepoError, SqliteEntryRepository,
};
use std::collections::HashSet;
use uuid::Uuid;

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    let mut entry = Entry::new("first entry");
    let id = repo.create_entry(&mut entry).unwrap();

    let loaded = repo.get_entry(id).unwrap().unwrap();
    assert_eq!(loaded.uuid, entry.uuid);
    assert_eq!(loaded.content, "first entry");
    assert!(!loaded.pinned);
}

#[test]
fn get_unknown_id_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    assert!(repo.get_entry(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn update_existing_entry() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    let mut entry = Entry::new("draft");
    repo.create_entry(&mut entry).unwrap();

    entry.content = "updated".to_string();
    entry.pinned = true;
    repo.update_entry(&mut entry).unwrap();

    let loaded = repo.get_entry(entry.uuid).unwrap().unwrap();
    assert_eq!(loaded.content, "updated");
    assert!(loaded.pinned);
}

#[test]
fn update_of_never_persisted_entry_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    let mut entry = Entry::new("missing");
    let err = repo.update_entry(&mut entry).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == entry.uuid));
}

#[test]
fn delete_removes_the_row_and_repeated_delete_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    let mut entry = Entry::new("short lived");
    repo.create_entry(&mut entry).unwrap();

    repo.delete_entry(entry.uuid).unwrap();
    assert!(repo.get_entry(entry.uuid).unwrap().is_none());

    let err = repo.delete_entry(entry.uuid).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == entry.uuid));
}

#[test]
fn validation_failure_blocks_create_and_update() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    let mut blank = Entry::new("   ");
    let create_err = repo.create_entry(&mut blank).unwrap_err();
    assert!(matches!(create_err, RepoError::Validation(_)));

    let mut valid = Entry::new("fine");
    repo.create_entry(&mut valid).unwrap();

    valid.content = "".to_string();
    let update_err = repo.update_entry(&mut valid).unwrap_err();
    assert!(matches!(update_err, RepoError::Validation(_)));
}

#[test]
fn list_filters_by_pinned_state() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    let mut plain = Entry::new("plain");
    let mut pinned = Entry::new("pinned");
    pinned.pinned = true;
    repo.create_entry(&mut plain).unwrap();
    repo.create_entry(&mut pinned).unwrap();

    let query = EntryListQuery {
        pinned: Some(true),
        ..EntryListQuery::default()
    };
    let result = repo.list_entries(&query).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].uuid, pinned.uuid);

    let all = repo.list_entries(&EntryListQuery::default()).unwrap();
    assert_eq!(all.len(), 2);
}

#[test]
fn list_pagination_with_limit_and_offset_is_stable() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    let mut entry_a = entry_with_fixed_id("00000000-0000-4000-8000-000000000001", "a");
    let mut entry_b = entry_with_fixed_id("00000000-0000-4000-8000-000000000002", "b");
    let mut entry_c = entry_with_fixed_id("00000000-0000-4000-8000-000000000003", "c");
    repo.create_entry(&mut entry_c).unwrap();
    repo.create_entry(&mut entry_a).unwrap();
    repo.create_entry(&mut entry_b).unwrap();

    // Equal modification times force the uuid tiebreak, making page order
    // deterministic.
    conn.execute(
        "UPDATE entries SET modified_at = '2020-01-01T00:00:00+00:00';",
        [],
    )
    .unwrap();

    let query = EntryListQuery {
        limit: Some(2),
        offset: 1,
        ..EntryListQuery::default()
    };
    let page = repo.list_entries(&query).unwrap();

    assert_eq!(page.len(), 2);
    assert_eq!(page[0].uuid, entry_b.uuid);
    assert_eq!(page[1].uuid, entry_c.uuid);
}

#[test]
fn list_pagination_with_offset_only_path_is_stable() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    let mut entry_a = entry_with_fixed_id("00000000-0000-4000-8000-000000000001", "a");
    let mut entry_b = entry_with_fixed_id("00000000-0000-4000-8000-000000000002", "b");
    let mut entry_c = entry_with_fixed_id("00000000-0000-4000-8000-000000000003", "c");
    repo.create_entry(&mut entry_a).unwrap();
    repo.create_entry(&mut entry_b).unwrap();
    repo.create_entry(&mut entry_c).unwrap();

    conn.execute(
        "UPDATE entries SET modified_at = '2020-01-01T00:00:00+00:00';",
        [],
    )
    .unwrap();

    let query = EntryListQuery {
        offset: 1,
        ..EntryListQuery::default()
    };
    let page = repo.list_entries(&query).unwrap();

    assert_eq!(page.len(), 2);
    assert_eq!(page[0].uuid, entry_b.uuid);
    assert_eq!(page[1].uuid, entry_c.uuid);
}

#[test]
fn service_wraps_repository_calls() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();
    let service = EntryService::new(repo);

    let created = service.create_entry("from service").unwrap();

    let fetched = service.get_entry(created.uuid).unwrap().unwrap();
    assert_eq!(fetched.content, "from service");

    let ids: HashSet<_> = service
        .list_entries(&EntryListQuery::default())
        .unwrap()
        .into_iter()
        .map(|item| item.uuid)
        .collect();
    assert!(ids.contains(&created.uuid));

    service.delete_entry(created.uuid).unwrap();
    assert!(service.get_entry(created.uuid).unwrap().is_none());
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteEntryRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_required_entries_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteEntryRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("entries"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_entries_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE entries (
            uuid TEXT PRIMARY KEY NOT NULL,
            content TEXT NOT NULL,
            pinned INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteEntryRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "entries",
            column: "modified_at"
        })
    ));
}

fn entry_with_fixed_id(id: &str, content: &str) -> Entry {
    Entry::with_id(Uuid::parse_str(id).unwrap(), content).unwrap()
}
