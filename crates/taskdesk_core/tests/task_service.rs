use chrono::NaiveDate;
use taskdesk_core::{
    LoadOutcome, TaskDraft, TaskService, TaskServiceError, TaskStatus, TaskValidationError,
};

fn draft(title: &str, due: &str) -> TaskDraft {
    TaskDraft {
        title: title.to_string(),
        due_date: due.to_string(),
        ..TaskDraft::default()
    }
}

#[test]
fn draft_is_trimmed_and_parsed() {
    let task = TaskDraft {
        title: "  Buy milk ".to_string(),
        description: "\n2 litres\n".to_string(),
        due_date: " 15/03/2024".to_string(),
        status: TaskStatus::Completed,
    }
    .into_task()
    .unwrap();

    assert_eq!(task.title, "Buy milk");
    assert_eq!(task.description, "2 litres");
    assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2024, 3, 15));
    assert_eq!(task.status, TaskStatus::Completed);
}

#[test]
fn draft_rejects_blank_title_and_bad_dates() {
    assert_eq!(
        draft("   ", "").into_task().unwrap_err(),
        TaskValidationError::EmptyTitle
    );
    assert_eq!(
        draft("x", "2024-03-15").into_task().unwrap_err(),
        TaskValidationError::InvalidDueDate("2024-03-15".to_string())
    );
    assert!(draft("x", "32/01/2024").into_task().is_err());
}

#[test]
fn rejected_create_leaves_store_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = TaskService::new(dir.path().join("tasks.txt"));
    service.create_task(TaskDraft::new("keep")).unwrap();

    let err = service.create_task(draft("", "")).unwrap_err();

    assert!(matches!(
        err,
        TaskServiceError::Validation(TaskValidationError::EmptyTitle)
    ));
    assert_eq!(service.tasks().len(), 1);
}

#[test]
fn modify_replaces_whole_task() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = TaskService::new(dir.path().join("tasks.txt"));
    service
        .create_task(TaskDraft {
            description: "old".to_string(),
            ..draft("first", "01/01/2024")
        })
        .unwrap();
    let old_id = service.task(0).unwrap().id;

    service.modify_task(0, draft("renamed", "")).unwrap();

    let task = service.task(0).unwrap();
    assert_eq!(task.title, "renamed");
    assert_eq!(task.description, "");
    assert_eq!(task.due_date, None);
    assert_ne!(task.id, old_id);
}

#[test]
fn positional_use_cases_report_missing_task() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = TaskService::new(dir.path().join("tasks.txt"));

    assert!(matches!(
        service.modify_task(0, TaskDraft::new("x")),
        Err(TaskServiceError::TaskNotFound(0))
    ));
    assert!(matches!(
        service.delete_task(3),
        Err(TaskServiceError::TaskNotFound(3))
    ));
    assert!(matches!(
        service.complete_task(1),
        Err(TaskServiceError::TaskNotFound(1))
    ));
}

#[test]
fn invalid_draft_on_missing_index_reports_missing_task_first() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = TaskService::new(dir.path().join("tasks.txt"));

    assert!(matches!(
        service.modify_task(0, draft("", "")),
        Err(TaskServiceError::TaskNotFound(0))
    ));
}

#[test]
fn blank_search_lists_everything() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = TaskService::new(dir.path().join("tasks.txt"));
    service.create_task(TaskDraft::new("alpha")).unwrap();
    service.create_task(TaskDraft::new("beta")).unwrap();
    service.complete_task(1).unwrap();

    assert_eq!(service.search("   "), service.tasks());
    let hits = service.search(" terminé ");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "beta");
}

#[test]
fn end_to_end_save_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.txt");

    let mut service = TaskService::open(&path).unwrap();
    assert!(service.tasks().is_empty());
    service.create_task(draft("Pay rent", "")).unwrap();
    service.create_task(draft("Buy milk", "15/03/2024")).unwrap();
    service.complete_task(0).unwrap();
    service.sort_by_date();
    service.save().unwrap();

    let mut reopened = TaskService::open(&path).unwrap();
    assert_eq!(reopened.tasks(), service.tasks());
    assert_eq!(reopened.tasks()[0].title, "Buy milk");

    reopened.sort_by_status();
    assert_eq!(reopened.tasks()[0].title, "Buy milk");
    assert_eq!(reopened.tasks()[1].status, TaskStatus::Completed);

    assert_eq!(
        reopened.reload().unwrap(),
        LoadOutcome::Loaded {
            loaded: 2,
            skipped: 0
        }
    );
    assert_eq!(reopened.path(), path.as_path());
}
