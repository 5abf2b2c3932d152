//! Integration tests for the transaction approval workflow.
//!
//! These tests run against a migrated Postgres database; they skip
//! silently when `DATABASE_URL` is not set.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use amanah_core::workflow::{Role, TransactionKind, WorkflowError};
use amanah_db::entities::sea_orm_active_enums::{
    TransactionStatus as DbStatus, UserRole,
};
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

async fn seed_reviewer(db: &sea_orm::DatabaseConnection) -> Uuid {
    let repo = UserRepository::new(db.clone());
    let email = format!("ketua-{}@test.amanah.id", Uuid::new_v4());
    repo.create("Pak Ketua", &email, "hash", UserRole::Ketua)
        .await
        .expect("Failed to seed reviewer")
        .id
}

fn expense(amount: Decimal) -> CreateTransactionInput {
    CreateTransactionInput {
        kind: TransactionKind::Expense,
        category: "Renovasi".to_string(),
        amount,
        description: Some("perbaikan atap".to_string()),
        proof_path: Some("transactions/kwitansi.jpg".to_string()),
        occurred_on: NaiveDate::from_ymd_opt(2026, 1, 20).unwrap(),
        recorded_by: None,
    }
}

fn income(amount: Decimal) -> CreateTransactionInput {
    CreateTransactionInput {
        kind: TransactionKind::Income,
        category: "Kotak Jumat".to_string(),
        amount,
        description: None,
        proof_path: None,
        occurred_on: NaiveDate::from_ymd_opt(2026, 1, 20).unwrap(),
        recorded_by: None,
    }
}

#[tokio::test]
async fn test_approve_transaction_not_found() {
    let Some(db) = test_db().await else { return };
    let reviewer = seed_reviewer(&db).await;
    let repo = ApprovalRepository::new(db);

    let missing = Uuid::new_v4();
    let result = repo.approve(missing, reviewer, Role::Ketua).await;

    match result {
        Err(WorkflowError::TransactionNotFound(id)) => assert_eq!(id, missing),
        other => panic!("Expected TransactionNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_income_is_immediately_approved() {
    let Some(db) = test_db().await else { return };
    let repo = TransactionRepository::new(db);

    let tx = repo
        .create(income(dec!(15_000_000)), THRESHOLD)
        .await
        .expect("Failed to create income");

    assert_eq!(tx.status, DbStatus::Approved);
    assert!(tx.approved_at.is_some());
    assert!(tx.approved_by.is_none());
    assert!(tx.rejection_reason.is_none());
}

#[tokio::test]
async fn test_create_small_expense_auto_approved() {
    let Some(db) = test_db().await else { return };
    let repo = TransactionRepository::new(db);

    let tx = repo
        .create(expense(dec!(500_000)), THRESHOLD)
        .await
        .expect("Failed to create expense");

    assert_eq!(tx.status, DbStatus::Approved);
    assert!(tx.approved_at.is_some());
    assert!(tx.approved_by.is_none());
}

#[tokio::test]
async fn test_create_expense_without_proof_persists_nothing() {
    let Some(db) = test_db().await else { return };
    let repo = TransactionRepository::new(db.clone());

    let before = repo.count().await.unwrap();

    let mut input = expense(dec!(200_000));
    input.proof_path = None;
    let result = repo.create(input, THRESHOLD).await;
    assert!(matches!(result, Err(WorkflowError::ProofRequired)));

    let after = repo.count().await.unwrap();
    assert_eq!(before, after, "validation failure must not persist a row");
}

#[tokio::test]
async fn test_large_expense_goes_through_approval() {
    let Some(db) = test_db().await else { return };
    let reviewer = seed_reviewer(&db).await;
    let tx_repo = TransactionRepository::new(db.clone());
    let approval_repo = ApprovalRepository::new(db);

    let tx = tx_repo
        .create(expense(dec!(2_000_000)), THRESHOLD)
        .await
        .expect("Failed to create expense");
    assert_eq!(tx.status, DbStatus::Pending);
    assert!(tx.approved_at.is_none());

    let approved = approval_repo
        .approve(tx.uuid, reviewer, Role::Ketua)
        .await
        .expect("Failed to approve");
    assert_eq!(approved.status, DbStatus::Approved);
    assert_eq!(approved.approved_by, Some(reviewer));
    assert!(approved.approved_at.is_some());
}

#[tokio::test]
async fn test_reject_with_reason() {
    let Some(db) = test_db().await else { return };
    let reviewer = seed_reviewer(&db).await;
    let tx_repo = TransactionRepository::new(db.clone());
    let approval_repo = ApprovalRepository::new(db);

    let tx = tx_repo
        .create(expense(dec!(3_000_000)), THRESHOLD)
        .await
        .expect("Failed to create expense");

    let rejected = approval_repo
        .reject(
            tx.uuid,
            reviewer,
            Role::Ketua,
            "insufficient documentation".to_string(),
        )
        .await
        .expect("Failed to reject");

    assert_eq!(rejected.status, DbStatus::Rejected);
    assert_eq!(
        rejected.rejection_reason.as_deref(),
        Some("insufficient documentation")
    );
    assert_eq!(rejected.approved_by, Some(reviewer));
    assert!(rejected.approved_at.is_some());
}

#[tokio::test]
async fn test_approve_already_decided_fails_without_mutation() {
    let Some(db) = test_db().await else { return };
    let reviewer = seed_reviewer(&db).await;
    let tx_repo = TransactionRepository::new(db.clone());
    let approval_repo = ApprovalRepository::new(db);

    let tx = tx_repo
        .create(expense(dec!(2_000_000)), THRESHOLD)
        .await
        .unwrap();
    let approved = approval_repo
        .approve(tx.uuid, reviewer, Role::Ketua)
        .await
        .unwrap();

    let second_reviewer = Uuid::new_v4();
    let result = approval_repo
        .approve(tx.uuid, second_reviewer, Role::SuperAdmin)
        .await;
    assert!(matches!(
        result,
        Err(WorkflowError::InvalidTransition { .. })
    ));

    // The row still carries the first decision.
    let current = tx_repo.find_by_uuid(tx.uuid).await.unwrap().unwrap();
    assert_eq!(current.approved_by, approved.approved_by);
    assert_eq!(current.approved_at, approved.approved_at);
}

#[tokio::test]
async fn test_reject_without_reason_performs_no_mutation() {
    let Some(db) = test_db().await else { return };
    let reviewer = seed_reviewer(&db).await;
    let tx_repo = TransactionRepository::new(db.clone());
    let approval_repo = ApprovalRepository::new(db);

    let tx = tx_repo
        .create(expense(dec!(2_000_000)), THRESHOLD)
        .await
        .unwrap();

    let result = approval_repo
        .reject(tx.uuid, reviewer, Role::Ketua, "   ".to_string())
        .await;
    assert!(matches!(
        result,
        Err(WorkflowError::RejectionReasonRequired)
    ));

    let current = tx_repo.find_by_uuid(tx.uuid).await.unwrap().unwrap();
    assert_eq!(current.status, DbStatus::Pending);
    assert!(current.rejection_reason.is_none());
}

#[tokio::test]
async fn test_roles_without_capability_are_refused() {
    let Some(db) = test_db().await else { return };
    let reviewer = seed_reviewer(&db).await;
    let tx_repo = TransactionRepository::new(db.clone());
    let approval_repo = ApprovalRepository::new(db);

    let tx = tx_repo
        .create(expense(dec!(2_000_000)), THRESHOLD)
        .await
        .unwrap();

    for role in [Role::Bendahara, Role::Marbot] {
        let result = approval_repo.approve(tx.uuid, reviewer, role).await;
        assert!(matches!(
            result,
            Err(WorkflowError::NotAuthorizedToApprove { .. })
        ));
    }

    let queue = approval_repo
        .list_pending_above_threshold(Role::Bendahara, THRESHOLD)
        .await;
    assert!(matches!(
        queue,
        Err(WorkflowError::NotAuthorizedToApprove { .. })
    ));
}

#[tokio::test]
async fn test_pending_queue_filters_and_orders() {
    let Some(db) = test_db().await else { return };
    let tx_repo = TransactionRepository::new(db.clone());
    let approval_repo = ApprovalRepository::new(db);

    let big = tx_repo
        .create(expense(dec!(5_000_000)), THRESHOLD)
        .await
        .unwrap();
    let bigger = tx_repo
        .create(expense(dec!(7_000_000)), THRESHOLD)
        .await
        .unwrap();

    let queue = approval_repo
        .list_pending_above_threshold(Role::Ketua, THRESHOLD)
        .await
        .expect("Failed to list queue");

    let uuids: Vec<Uuid> = queue.iter().map(|p| p.transaction.uuid).collect();
    let pos_big = uuids.iter().position(|u| *u == big.uuid).unwrap();
    let pos_bigger = uuids.iter().position(|u| *u == bigger.uuid).unwrap();
    assert!(
        pos_bigger < pos_big,
        "most recently created must come first"
    );

    // Everything in the queue is pending and above the threshold.
    for item in &queue {
        assert_eq!(item.transaction.status, DbStatus::Pending);
        assert!(item.transaction.amount > THRESHOLD);
    }

    // Raising the threshold hides rows from the view without touching them.
    let raised = approval_repo
        .list_pending_above_threshold(Role::Ketua, dec!(6_000_000))
        .await
        .unwrap();
    assert!(raised.iter().all(|p| p.transaction.uuid != big.uuid));
    let untouched = tx_repo.find_by_uuid(big.uuid).await.unwrap().unwrap();
    assert_eq!(untouched.status, DbStatus::Pending);
}

#[tokio::test]
async fn test_delete_by_uuid() {
    let Some(db) = test_db().await else { return };
    let repo = TransactionRepository::new(db);

    let tx = repo.create(income(dec!(100_000)), THRESHOLD).await.unwrap();
    repo.delete_by_uuid(tx.uuid).await.expect("Failed to delete");

    assert!(repo.find_by_uuid(tx.uuid).await.unwrap().is_none());
    assert!(matches!(
        repo.delete_by_uuid(tx.uuid).await,
        Err(WorkflowError::TransactionNotFound(_))
    ));
}
