use std::fs;
use stockroom_core::{
    JsonFileStore, NewRecord, RecordPatch, RecordStore, RepoError, Repository, RepositoryOptions,
    StoreError,
};
use tempfile::TempDir;

fn open_repo(dir: &TempDir) -> Repository<JsonFileStore> {
    Repository::open(
        JsonFileStore::new(dir.path().join("inventory.json")),
        RepositoryOptions::default(),
    )
}

#[test]
fn missing_file_opens_empty_without_warning() {
    let dir = tempfile::tempdir().unwrap();
    let repo = open_repo(&dir);

    assert!(repo.is_empty());
    assert!(repo.load_warning().is_none());
    assert!(!dir.path().join("inventory.json").exists());
}

#[test]
fn empty_file_opens_empty_without_warning() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("inventory.json"), "\n  \n").unwrap();

    let repo = open_repo(&dir);
    assert!(repo.is_empty());
    assert!(repo.load_warning().is_none());
}

#[test]
fn malformed_file_opens_empty_with_warning() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("inventory.json"), "{ not json").unwrap();

    let repo = open_repo(&dir);
    assert!(repo.is_empty());
    assert!(matches!(
        repo.load_warning(),
        Some(StoreError::Malformed { .. })
    ));
}

#[test]
fn records_survive_reopen_in_insertion_order() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut repo = open_repo(&dir);
        repo.add("b2", NewRecord::new("Mouse", 0, 3.0)).unwrap();
        repo.add("a1", NewRecord::new("Laptop Dell", 5, 10.0)).unwrap();
        repo.update("B2", &RecordPatch::quantity(7)).unwrap();
    }

    let reopened = open_repo(&dir);
    let ids: Vec<_> = reopened
        .list_all()
        .iter()
        .map(|record| record.id().to_string())
        .collect();
    assert_eq!(ids, vec!["B2", "A1"]);
    assert_eq!(reopened.get("b2").unwrap().quantity(), 7);
}

#[test]
fn persisted_layout_is_keyed_pretty_json() {
    let dir = tempfile::tempdir().unwrap();
    let mut repo = open_repo(&dir);
    repo.add("a1", NewRecord::new("Laptop", 5, 10.0)).unwrap();

    let text = fs::read_to_string(dir.path().join("inventory.json")).unwrap();
    let expected = "{\n  \"A1\": {\n    \"id\": \"A1\",\n    \"name\": \"Laptop\",\n    \"quantity\": 5,\n    \"price\": 10.0\n  }\n}\n";
    assert_eq!(text, expected);
}

#[test]
fn repeated_save_of_loaded_state_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inventory.json");
    {
        let mut repo = open_repo(&dir);
        repo.add("A1", NewRecord::new("Laptop", 5, 10.25)).unwrap();
        repo.add("A2", NewRecord::new("Mouse", 0, 3.0)).unwrap();
    }

    let mut store = JsonFileStore::new(&path);
    let first_records = store.load().unwrap();
    store.save(&first_records).unwrap();
    let first = fs::read(&path).unwrap();

    let second_records = store.load().unwrap();
    store.save(&second_records).unwrap();
    let second = fs::read(&path).unwrap();

    assert_eq!(first, second);
    assert_eq!(first_records, second_records);
}

#[test]
fn save_creates_missing_parent_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("data").join("inventory.json");
    let mut repo = Repository::open(JsonFileStore::new(&path), RepositoryOptions::default());

    repo.add("A1", NewRecord::new("Laptop", 1, 1.0)).unwrap();
    assert!(path.exists());
}

#[test]
fn failed_file_save_rolls_back_and_keeps_old_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inventory.json");
    let mut repo = open_repo(&dir);
    repo.add("A1", NewRecord::new("Laptop", 5, 10.0)).unwrap();
    let saved = fs::read_to_string(&path).unwrap();

    // Replacing the target with a directory makes the final rename fail.
    fs::remove_file(&path).unwrap();
    fs::create_dir(&path).unwrap();

    let err = repo.update("A1", &RecordPatch::quantity(99)).unwrap_err();
    assert!(matches!(err, RepoError::Persistence(StoreError::Io { .. })));
    assert_eq!(repo.get("A1").unwrap().quantity(), 5);

    fs::remove_dir(&path).unwrap();
    fs::write(&path, &saved).unwrap();
    let reopened = open_repo(&dir);
    assert_eq!(reopened.get("A1").unwrap().quantity(), 5);
}

#[test]
fn failed_save_leaves_no_temporary_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inventory.json");
    fs::create_dir(&path).unwrap();
    let mut repo = open_repo(&dir);

    assert!(repo.add("A1", NewRecord::new("Laptop", 1, 1.0)).is_err());
    assert!(repo.is_empty());

    let entries: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("inventory.json")]);
}

#[test]
fn successful_save_clears_load_warning() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("inventory.json"), "[1, 2, 3]").unwrap();

    let mut repo = open_repo(&dir);
    assert!(repo.load_warning().is_some());

    repo.add("A1", NewRecord::new("Laptop", 1, 1.0)).unwrap();
    assert!(repo.load_warning().is_none());
    assert_eq!(open_repo(&dir).len(), 1);
}

#[test]
fn backup_snapshot_reloads_and_leaves_live_file_alone() {
    let dir = tempfile::tempdir().unwrap();
    let live = dir.path().join("inventory.json");
    let backup = dir.path().join("backups").join("inventory_backup.json");
    let mut repo = open_repo(&dir);
    repo.add("PROD 1", NewRecord::new("Laptop", 2, 900.0)).unwrap();
    repo.add("P2", NewRecord::new("Mouse", 0, 15.5)).unwrap();
    let live_before = fs::read(&live).unwrap();

    repo.backup_to(&backup).unwrap();

    assert_eq!(fs::read(&live).unwrap(), live_before);
    assert_eq!(fs::read(&backup).unwrap(), live_before);
    let restored = Repository::open(JsonFileStore::new(&backup), RepositoryOptions::default());
    assert!(restored.load_warning().is_none());
    assert_eq!(restored.list_all(), repo.list_all());
}

#[test]
fn backup_to_unwritable_target_reports_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut repo = open_repo(&dir);
    repo.add("A1", NewRecord::new("Laptop", 1, 1.0)).unwrap();
    let target = dir.path().join("taken");
    fs::create_dir(&target).unwrap();

    let err = repo.backup_to(&target).unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }));
    assert_eq!(repo.len(), 1);
    assert!(repo.load_warning().is_none());
}
