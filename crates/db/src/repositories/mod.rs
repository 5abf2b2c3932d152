//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application.

pub mod approval;
pub mod transaction;
pub mod user;

pub use approval::{ApprovalRepository, PendingTransaction};
pub use transaction::{
    CreateTransactionInput, MonthlyTotals, TransactionFilter, TransactionRepository,
};
pub use user::UserRepository;
