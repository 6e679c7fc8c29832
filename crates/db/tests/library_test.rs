//! Integration tests for the library repository and service.
//!
//! Each test gets a fresh in-memory SQLite database. The pool is capped at
//! one connection because every SQLite `:memory:` connection is a separate
//! database.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use futures::future::join_all;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set};
use tempfile::tempdir;

use libris_core::library::{
    BookMatch, IssueBookInput, LibraryError, LibraryService, LibraryStore, LoanScope,
};
use libris_db::{
    LibraryRepository, SAMPLE_STUDENTS,
    entities::{books, students, transactions},
    prepare, seed_sample_students,
};

async fn setup_db() -> DatabaseConnection {
    let db = libris_db::connect("sqlite::memory:", 1, 1)
        .await
        .expect("Failed to open in-memory database");
    prepare(&db, true).await.expect("Failed to prepare schema");
    db
}

fn service(db: &DatabaseConnection) -> LibraryService {
    LibraryService::new(Arc::new(LibraryRepository::new(db.clone())))
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 1, 9, 0, 0).unwrap()
}

fn charlottes_web(tag: &str) -> IssueBookInput {
    IssueBookInput::new(tag, "Charlotte's Web").with_author(Some("E.B. White".to_string()))
}

async fn row_counts(db: &DatabaseConnection) -> (u64, u64) {
    let books = books::Entity::find().count(db).await.unwrap();
    let loans = transactions::Entity::find().count(db).await.unwrap();
    (books, loans)
}

#[tokio::test]
async fn test_prepare_seeds_sample_students_once() {
    let db = setup_db().await;

    let again = seed_sample_students(&db).await.expect("reseed should succeed");
    assert_eq!(again, 0);

    let count = students::Entity::find().count(&db).await.unwrap();
    assert_eq!(count, SAMPLE_STUDENTS.len() as u64);
}

#[tokio::test]
async fn test_prepare_is_rerunnable() {
    let db = setup_db().await;
    let inserted = prepare(&db, true).await.expect("second prepare should succeed");
    assert_eq!(inserted, 0);
}

#[tokio::test]
async fn test_get_sample_student() {
    let db = setup_db().await;

    let student = service(&db)
        .get_student("123456789")
        .await
        .expect("student should exist");

    assert_eq!(student.name, "John Doe");
    assert_eq!(student.class_name.as_deref(), Some("10th Grade"));
    assert_eq!(student.roll_number.as_deref(), Some("1001"));
}

#[tokio::test]
async fn test_get_unknown_student_is_not_found() {
    let db = setup_db().await;

    let err = service(&db).get_student("000000000").await.unwrap_err();

    assert_eq!(err, LibraryError::StudentNotFound("000000000".to_string()));
}

#[tokio::test]
async fn test_issue_unknown_student_writes_nothing() {
    let db = setup_db().await;

    let err = service(&db)
        .issue_book(charlottes_web("000000000"), t0())
        .await
        .unwrap_err();

    assert_eq!(err, LibraryError::StudentNotFound("000000000".to_string()));
    assert_eq!(row_counts(&db).await, (0, 0));
}

#[tokio::test]
async fn test_issue_sets_due_date_fourteen_days_out() {
    let db = setup_db().await;

    let receipt = service(&db)
        .issue_book(charlottes_web("123456789"), t0())
        .await
        .expect("issue should succeed");

    assert_eq!(receipt.due_date().to_string(), "2026-10-15");

    let stored = transactions::Entity::find_by_id(receipt.transaction_id)
        .one(&db)
        .await
        .unwrap()
        .expect("transaction row should exist");
    assert_eq!(stored.issue_date, t0());
    assert_eq!(stored.return_date, t0() + Duration::days(14));
    assert!(!stored.returned);
}

#[tokio::test]
async fn test_same_title_and_author_reuses_book() {
    let db = setup_db().await;
    let svc = service(&db);

    let first = svc
        .issue_book(charlottes_web("123456789"), t0())
        .await
        .unwrap();
    let second = svc
        .issue_book(charlottes_web("987654321"), t0() + Duration::hours(1))
        .await
        .unwrap();

    assert!(first.book_created);
    assert!(!second.book_created);
    assert_eq!(first.book_id, second.book_id);
    assert_ne!(first.transaction_id, second.transaction_id);
    assert_eq!(row_counts(&db).await, (1, 2));
}

#[tokio::test]
async fn test_different_author_creates_new_book() {
    let db = setup_db().await;
    let svc = service(&db);

    svc.issue_book(charlottes_web("123456789"), t0())
        .await
        .unwrap();
    let other = svc
        .issue_book(
            IssueBookInput::new("987654321", "Charlotte's Web"),
            t0() + Duration::hours(1),
        )
        .await
        .unwrap();

    assert!(other.book_created);
    assert_eq!(row_counts(&db).await, (2, 2));
}

#[tokio::test]
async fn test_authorless_issue_reuses_book_with_empty_author() {
    let db = setup_db().await;
    let legacy = books::ActiveModel {
        book_name: Set("Matilda".to_string()),
        author: Set(Some(String::new())),
        isbn: Set(None),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    let receipt = service(&db)
        .issue_book(IssueBookInput::new("123456789", "Matilda"), t0())
        .await
        .unwrap();

    assert_eq!(receipt.book_id, legacy.id);
    assert!(!receipt.book_created);
    assert_eq!(row_counts(&db).await, (1, 1));
}

#[tokio::test]
async fn test_device_path_matches_on_title_only() {
    let db = setup_db().await;
    let svc = service(&db);

    let web = svc
        .issue_book(charlottes_web("123456789"), t0())
        .await
        .unwrap();
    let device = svc
        .issue_book(
            IssueBookInput::new("456789123", "Charlotte's Web").matching(BookMatch::TitleOnly),
            t0() + Duration::hours(1),
        )
        .await
        .unwrap();

    assert_eq!(web.book_id, device.book_id);
    assert!(!device.book_created);
}

#[tokio::test]
async fn test_new_book_keeps_isbn() {
    let db = setup_db().await;

    let receipt = service(&db)
        .issue_book(
            charlottes_web("123456789").with_isbn(Some("978-0064400558".to_string())),
            t0(),
        )
        .await
        .unwrap();

    let book = books::Entity::find_by_id(receipt.book_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(book.book_name, "Charlotte's Web");
    assert_eq!(book.author.as_deref(), Some("E.B. White"));
    assert_eq!(book.isbn.as_deref(), Some("978-0064400558"));
}

#[tokio::test]
async fn test_same_pair_may_have_multiple_open_loans() {
    let db = setup_db().await;
    let svc = service(&db);

    svc.issue_book(charlottes_web("123456789"), t0())
        .await
        .unwrap();
    svc.issue_book(charlottes_web("123456789"), t0() + Duration::minutes(5))
        .await
        .unwrap();

    let active = svc.list_active_transactions(t0()).await.unwrap();
    assert_eq!(active.len(), 2);
}

#[tokio::test]
async fn test_active_list_order_and_overdue_flags() {
    let db = setup_db().await;
    let svc = service(&db);

    let old = svc
        .issue_book(charlottes_web("123456789"), t0())
        .await
        .unwrap();
    let recent = svc
        .issue_book(
            IssueBookInput::new("987654321", "Dune"),
            t0() + Duration::days(10),
        )
        .await
        .unwrap();

    // Day 14 exactly: the first loan is due but not yet overdue
    let at_due = svc
        .list_active_transactions(t0() + Duration::days(14))
        .await
        .unwrap();
    assert_eq!(at_due[0].record.id, recent.transaction_id);
    assert_eq!(at_due[1].record.id, old.transaction_id);
    assert!(!at_due[1].overdue);

    let later = svc
        .list_active_transactions(t0() + Duration::days(14) + Duration::seconds(1))
        .await
        .unwrap();
    assert!(later[1].overdue);
    assert!(!later[0].overdue);
    assert_eq!(later[1].record.student_name, "John Doe");
    assert_eq!(later[1].record.class_name.as_deref(), Some("10th Grade"));
    assert_eq!(later[1].record.book_title, "Charlotte's Web");
}

#[tokio::test]
async fn test_return_moves_loan_out_of_active_list() {
    let db = setup_db().await;
    let svc = service(&db);

    let receipt = svc
        .issue_book(charlottes_web("123456789"), t0())
        .await
        .unwrap();
    let returned_at = t0() + Duration::days(3);

    svc.return_book(receipt.transaction_id, returned_at)
        .await
        .expect("return should succeed");

    let active = svc.list_active_transactions(returned_at).await.unwrap();
    assert!(active.is_empty());

    let all = svc.list_all_transactions().await.unwrap();
    assert_eq!(all.len(), 1);
    assert!(all[0].returned);
    assert_eq!(all[0].return_at, returned_at);
}

#[tokio::test]
async fn test_repeated_return_overwrites_timestamp() {
    let db = setup_db().await;
    let svc = service(&db);

    let receipt = svc
        .issue_book(charlottes_web("123456789"), t0())
        .await
        .unwrap();

    svc.return_book(receipt.transaction_id, t0() + Duration::days(1))
        .await
        .unwrap();
    svc.return_book(receipt.transaction_id, t0() + Duration::days(2))
        .await
        .expect("second return should also succeed");

    let stored = transactions::Entity::find_by_id(receipt.transaction_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.returned);
    assert_eq!(stored.return_date, t0() + Duration::days(2));
}

#[tokio::test]
async fn test_return_unknown_transaction_mutates_nothing() {
    let db = setup_db().await;
    let svc = service(&db);

    let receipt = svc
        .issue_book(charlottes_web("123456789"), t0())
        .await
        .unwrap();

    let err = svc
        .return_book(receipt.transaction_id + 100, t0())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        LibraryError::TransactionNotFound(receipt.transaction_id + 100)
    );

    let stored = transactions::Entity::find_by_id(receipt.transaction_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert!(!stored.returned);
    assert_eq!(stored.return_date, t0() + Duration::days(14));
}

#[tokio::test]
async fn test_repository_scope_filter() {
    let db = setup_db().await;
    let repo = LibraryRepository::new(db.clone());
    let svc = service(&db);

    let a = svc
        .issue_book(charlottes_web("123456789"), t0())
        .await
        .unwrap();
    svc.issue_book(IssueBookInput::new("987654321", "Dune"), t0() + Duration::hours(1))
        .await
        .unwrap();
    svc.return_book(a.transaction_id, t0() + Duration::hours(2))
        .await
        .unwrap();

    assert_eq!(repo.loans(LoanScope::Active).await.unwrap().len(), 1);
    assert_eq!(repo.loans(LoanScope::All).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_concurrent_issues_of_new_title_share_one_book() {
    let db = setup_db().await;
    let svc = service(&db);

    let handles: Vec<_> = SAMPLE_STUDENTS
        .iter()
        .enumerate()
        .map(|(i, student)| {
            let svc = svc.clone();
            let tag = student.rfid_id.to_string();
            let issued_at = t0() + Duration::seconds(i64::try_from(i).unwrap());
            tokio::spawn(async move {
                svc.issue_book(
                    IssueBookInput::new(tag, "The Hobbit")
                        .with_author(Some("J.R.R. Tolkien".to_string())),
                    issued_at,
                )
                .await
            })
        })
        .collect();

    for result in join_all(handles).await {
        result.expect("task should not panic").expect("issue should succeed");
    }

    assert_eq!(row_counts(&db).await, (1, SAMPLE_STUDENTS.len() as u64));
}

#[tokio::test]
async fn test_concurrent_issues_on_pooled_file_database() {
    const ROUNDS: usize = 10;
    const ISSUES_PER_ROUND: usize = 8;

    let dir = tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("library.db").display());
    let db = libris_db::connect(&url, 10, 1).await.unwrap();
    prepare(&db, true).await.unwrap();
    let svc = service(&db);

    for round in 0..ROUNDS {
        let title = format!("Round {round}");
        let handles: Vec<_> = (0..ISSUES_PER_ROUND)
            .map(|i| {
                let svc = svc.clone();
                let tag = SAMPLE_STUDENTS[i % SAMPLE_STUDENTS.len()].rfid_id;
                let input = IssueBookInput::new(tag, title.clone());
                tokio::spawn(async move { svc.issue_book(input, t0()).await })
            })
            .collect();

        for result in join_all(handles).await {
            result.expect("task should not panic").expect("issue should succeed");
        }
    }

    assert_eq!(
        row_counts(&db).await,
        (ROUNDS as u64, (ROUNDS * ISSUES_PER_ROUND) as u64)
    );
}
