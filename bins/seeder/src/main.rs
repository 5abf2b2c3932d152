//! Database seeder for Amanah development and testing.
//!
//! Seeds one user per role plus a handful of sample transactions so the
//! dashboard, transparency page, and approval queue all have data.
//!
//! Usage: cargo run --bin seeder

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use amanah_core::auth::hash_password;
use amanah_core::workflow::TransactionKind;
use amanah_db::entities::sea_orm_active_enums::UserRole;
use amanah_db::repositories::{CreateTransactionInput, TransactionRepository, UserRepository};

/// Default approval threshold used when seeding (matches config default).
const APPROVAL_THRESHOLD: Decimal = dec!(1_000_000);

/// Development password for every seeded account.
const DEV_PASSWORD: &str = "password";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = amanah_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding users...");
    let bendahara = seed_users(&db).await;

    println!("Seeding sample transactions...");
    seed_transactions(&db, bendahara).await;

    println!("Seeding complete!");
}

/// Creates one account per role; returns the treasurer's id for use as
/// the recorder of the sample transactions.
async fn seed_users(db: &sea_orm::DatabaseConnection) -> Uuid {
    let repo = UserRepository::new(db.clone());
    let accounts = [
        ("Admin Masjid", "admin@masjid.test", UserRole::SuperAdmin),
        ("Pak Ketua", "ketua@masjid.test", UserRole::Ketua),
        ("Bu Bendahara", "bendahara@masjid.test", UserRole::Bendahara),
        ("Kang Marbot", "marbot@masjid.test", UserRole::Marbot),
    ];

    let mut bendahara_id = None;
    for (name, email, role) in accounts {
        let id = if repo.email_exists(email).await.expect("Failed to check email") {
            repo.find_by_email(email)
                .await
                .expect("Failed to look up user")
                .expect("user exists")
                .id
        } else {
            let hash = hash_password(DEV_PASSWORD).expect("Failed to hash password");
            let user = repo
                .create(name, email, &hash, role.clone())
                .await
                .expect("Failed to seed user");
            println!("  created {email}");
            user.id
        };
        if role == UserRole::Bendahara {
            bendahara_id = Some(id);
        }
    }

    bendahara_id.expect("treasurer account seeded")
}

async fn seed_transactions(db: &sea_orm::DatabaseConnection, recorded_by: Uuid) {
    let repo = TransactionRepository::new(db.clone());
    let today = Utc::now().date_naive();

    let samples = [
        // Friday collection box: income, auto-approved.
        CreateTransactionInput {
            kind: TransactionKind::Income,
            category: "Kotak Jumat".to_string(),
            amount: dec!(2_750_000),
            description: Some("Kotak amal shalat Jumat".to_string()),
            proof_path: None,
            occurred_on: today - Duration::days(3),
            recorded_by: Some(recorded_by),
        },
        // Small expense: auto-approved under the threshold.
        CreateTransactionInput {
            kind: TransactionKind::Expense,
            category: "Operasional".to_string(),
            amount: dec!(350_000),
            description: Some("Tagihan listrik".to_string()),
            proof_path: Some("transactions/listrik-jan.jpg".to_string()),
            occurred_on: today - Duration::days(2),
            recorded_by: Some(recorded_by),
        },
        // Large expense: lands in the approval queue.
        CreateTransactionInput {
            kind: TransactionKind::Expense,
            category: "Renovasi".to_string(),
            amount: dec!(5_000_000),
            description: Some("Perbaikan atap serambi".to_string()),
            proof_path: Some("transactions/atap-rab.pdf".to_string()),
            occurred_on: today - Duration::days(1),
            recorded_by: Some(recorded_by),
        },
    ];

    for input in samples {
        let category = input.category.clone();
        let tx = repo
            .create(input, APPROVAL_THRESHOLD)
            .await
            .expect("Failed to seed transaction");
        println!("  {} -> {:?}", category, tx.status);
    }
}
