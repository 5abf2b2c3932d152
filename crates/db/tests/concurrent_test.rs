//! Concurrent approval stress test.
//!
//! Verifies that of two simultaneous decisions on the same pending
//! transaction exactly one wins; the loser observes an invalid
//! transition and the final row carries one consistent reviewer.
//!
//! Runs against a migrated Postgres database; skips silently when
//! `DATABASE_URL` is not set.

use chrono::NaiveDate;
use futures::future::join_all;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tokio::sync::Barrier;
use uuid::Uuid;

use amanah_core::workflow::{Role, TransactionKind, WorkflowError};
use amanah_db::entities::sea_orm_active_enums::{TransactionStatus as DbStatus, UserRole};
use amanah_db::repositories::{
    ApprovalRepository, CreateTransactionInput, TransactionRepository, UserRepository,
};

const THRESHOLD: Decimal = dec!(1_000_000);

async fn test_db() -> Option<sea_orm::DatabaseConnection> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("skipping: DATABASE_URL not set");
        return None;
    };
    Some(
        amanah_db::connect(&url)
            .await
            .expect("Failed to connect to database"),
    )
}

async fn seed_reviewer(db: &sea_orm::DatabaseConnection, name: &str) -> Uuid {
    let repo = UserRepository::new(db.clone());
    let email = format!("{name}-{}@test.amanah.id", Uuid::new_v4());
    repo.create(name, &email, "hash", UserRole::Ketua)
        .await
        .expect("Failed to seed reviewer")
        .id
}

async fn seed_pending_expense(db: &sea_orm::DatabaseConnection) -> Uuid {
    let repo = TransactionRepository::new(db.clone());
    let tx = repo
        .create(
            CreateTransactionInput {
                kind: TransactionKind::Expense,
                category: "Renovasi".to_string(),
                amount: dec!(4_000_000),
                description: None,
                proof_path: Some("transactions/kwitansi.jpg".to_string()),
                occurred_on: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
                recorded_by: None,
            },
            THRESHOLD,
        )
        .await
        .expect("Failed to seed pending expense");
    assert_eq!(tx.status, DbStatus::Pending);
    tx.uuid
}

#[tokio::test]
async fn test_two_simultaneous_approves_one_winner() {
    let Some(db) = test_db().await else { return };

    let reviewer_a = seed_reviewer(&db, "ketua-a").await;
    let reviewer_b = seed_reviewer(&db, "ketua-b").await;
    let tx_uuid = seed_pending_expense(&db).await;

    let barrier = Arc::new(Barrier::new(2));
    let mut tasks = Vec::new();
    for reviewer in [reviewer_a, reviewer_b] {
        let db = db.clone();
        let barrier = Arc::clone(&barrier);
        tasks.push(tokio::spawn(async move {
            let repo = ApprovalRepository::new(db);
            barrier.wait().await;
            repo.approve(tx_uuid, reviewer, Role::Ketua).await
        }));
    }

    let outcomes: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked"))
        .collect();

    let successes = outcomes.iter().filter(|r| r.is_ok()).count();
    let losers = outcomes
        .iter()
        .filter(|r| matches!(r, Err(WorkflowError::InvalidTransition { .. })))
        .count();
    assert_eq!(successes, 1, "exactly one approve must win");
    assert_eq!(losers, 1, "the other must observe a non-pending state");

    // The stored reviewer is the winner's id.
    let winner = outcomes
        .iter()
        .find_map(|r| r.as_ref().ok())
        .expect("one winner");
    let final_row = TransactionRepository::new(db)
        .find_by_uuid(tx_uuid)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(final_row.status, DbStatus::Approved);
    assert_eq!(final_row.approved_by, winner.approved_by);
    assert!(final_row.approved_at.is_some());
}

#[tokio::test]
async fn test_concurrent_approve_and_reject_single_decision() {
    let Some(db) = test_db().await else { return };

    let reviewer = seed_reviewer(&db, "ketua-c").await;
    let tx_uuid = seed_pending_expense(&db).await;

    let barrier = Arc::new(Barrier::new(2));

    let approve_task = {
        let db = db.clone();
        let barrier = Arc::clone(&barrier);
        tokio::spawn(async move {
            let repo = ApprovalRepository::new(db);
            barrier.wait().await;
            repo.approve(tx_uuid, reviewer, Role::Ketua).await
        })
    };
    let reject_task = {
        let db = db.clone();
        let barrier = Arc::clone(&barrier);
        tokio::spawn(async move {
            let repo = ApprovalRepository::new(db);
            barrier.wait().await;
            repo.reject(tx_uuid, reviewer, Role::Ketua, "duplicate entry".to_string())
                .await
        })
    };

    let approve_result = approve_task.await.expect("task panicked");
    let reject_result = reject_task.await.expect("task panicked");

    assert_eq!(
        u8::from(approve_result.is_ok()) + u8::from(reject_result.is_ok()),
        1,
        "exactly one decision must take effect"
    );

    let final_row = TransactionRepository::new(db)
        .find_by_uuid(tx_uuid)
        .await
        .unwrap()
        .unwrap();
    match final_row.status {
        DbStatus::Approved => assert!(final_row.rejection_reason.is_none()),
        DbStatus::Rejected => {
            assert_eq!(final_row.rejection_reason.as_deref(), Some("duplicate entry"));
        }
        DbStatus::Pending => panic!("transaction must have been decided"),
    }
}
