use chrono::NaiveDate;
use std::fs;
use taskdesk_core::{LoadOutcome, StoreError, Task, TaskStatus, TaskStore};

fn sample_store() -> TaskStore {
    let mut store = TaskStore::new();
    store.add(Task::new(
        "Buy milk",
        "",
        NaiveDate::from_ymd_opt(2024, 3, 15),
        TaskStatus::Pending,
    ));
    store.add(Task::new("Pay rent", "monthly", None, TaskStatus::Pending));
    store
}

#[test]
fn save_then_load_reproduces_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.txt");
    let mut store = sample_store();

    store.sort_by_date();
    let titles: Vec<_> = store.get_all().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["Buy milk", "Pay rent"]);
    store.save_to_file(&path).unwrap();

    let mut fresh = TaskStore::new();
    let outcome = fresh.load_from_file(&path).unwrap();

    assert_eq!(
        outcome,
        LoadOutcome::Loaded {
            loaded: 2,
            skipped: 0
        }
    );
    assert_eq!(fresh, store);
}

#[test]
fn save_writes_one_terminated_line_per_task() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.txt");

    sample_store().save_to_file(&path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(
        content,
        "Buy milk||2024-03-15|En cours\nPay rent|monthly||En cours\n"
    );
}

#[test]
fn save_overwrites_previous_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.txt");
    fs::write(&path, "stale|line||En cours\nmore|stale||Terminé\nthird|x||Terminé\n").unwrap();

    let mut store = TaskStore::new();
    store.add(Task::new("only", "", None, TaskStatus::Completed));
    store.save_to_file(&path).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "only|||Terminé\n");
}

#[test]
fn save_into_missing_directory_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("tasks.txt");

    let err = sample_store().save_to_file(&path).unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }), "unexpected error: {err}");
}

#[test]
fn load_missing_file_keeps_existing_tasks() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = sample_store();
    let before = store.clone();

    let outcome = store.load_from_file(dir.path().join("absent.txt")).unwrap();

    assert_eq!(outcome, LoadOutcome::Missing);
    assert_eq!(store, before);
}

#[test]
fn load_replaces_instead_of_appending() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.txt");
    fs::write(&path, "From file|||Terminé\n").unwrap();

    let mut store = sample_store();
    store.load_from_file(&path).unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(store.get(0).unwrap().title, "From file");
    assert_eq!(store.get(0).unwrap().status, TaskStatus::Completed);
}

#[test]
fn load_skips_structurally_invalid_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.txt");
    fs::write(
        &path,
        "good|one||En cours\n\nbroken line\na|b|c|d|e\nstatus|unknown||Done\ngood|two|2024-01-31|Terminé\n",
    )
    .unwrap();

    let mut store = TaskStore::new();
    let outcome = store.load_from_file(&path).unwrap();

    assert_eq!(
        outcome,
        LoadOutcome::Loaded {
            loaded: 2,
            skipped: 4
        }
    );
    assert_eq!(store.get(1).unwrap().formatted_due_date(), "31/01/2024");
}

#[test]
fn load_aborts_on_malformed_date_and_keeps_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.txt");
    fs::write(&path, "ok|||En cours\nbad|date|2024-13-01|En cours\n").unwrap();

    let mut store = sample_store();
    let before = store.clone();
    let err = store.load_from_file(&path).unwrap_err();

    match err {
        StoreError::Format { line, .. } => assert_eq!(line, 2),
        other => panic!("expected format error, got {other}"),
    }
    assert_eq!(store, before);
}

#[test]
fn load_accepts_crlf_line_endings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.txt");
    fs::write(&path, "win|dows|2024-05-06|En cours\r\n").unwrap();

    let mut store = TaskStore::new();
    store.load_from_file(&path).unwrap();

    assert_eq!(store.get(0).unwrap().status, TaskStatus::Pending);
    assert_eq!(store.get(0).unwrap().formatted_due_date(), "06/05/2024");
}

#[test]
fn load_aborts_on_non_iso_date_shape() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.txt");
    fs::write(&path, "ok|||En cours\nshort|year|24-03-15|En cours\n").unwrap();

    let mut store = sample_store();
    let before = store.clone();
    let err = store.load_from_file(&path).unwrap_err();

    assert!(
        matches!(err, StoreError::Format { line: 2, .. }),
        "unexpected error: {err}"
    );
    assert_eq!(store, before);
}
