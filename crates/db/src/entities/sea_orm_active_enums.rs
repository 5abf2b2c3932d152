//! `SeaORM` active enums mapping the Postgres enum types.

use amanah_core::workflow;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction kind (`transaction_kind` Postgres enum).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_kind")]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money in.
    #[sea_orm(string_value = "income")]
    Income,
    /// Money out.
    #[sea_orm(string_value = "expense")]
    Expense,
}

/// Transaction approval status (`transaction_status` Postgres enum).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_status")]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Awaiting chairperson review.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Approved (terminal).
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Rejected (terminal).
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// User role (`user_role` Postgres enum).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Caretaker.
    #[sea_orm(string_value = "marbot")]
    Marbot,
    /// Treasurer.
    #[sea_orm(string_value = "bendahara")]
    Bendahara,
    /// Chairperson.
    #[sea_orm(string_value = "ketua")]
    Ketua,
    /// Administrator.
    #[sea_orm(string_value = "super_admin")]
    SuperAdmin,
}

impl From<workflow::TransactionKind> for TransactionKind {
    fn from(kind: workflow::TransactionKind) -> Self {
        match kind {
            workflow::TransactionKind::Income => Self::Income,
            workflow::TransactionKind::Expense => Self::Expense,
        }
    }
}

impl From<&TransactionKind> for workflow::TransactionKind {
    fn from(kind: &TransactionKind) -> Self {
        match kind {
            TransactionKind::Income => Self::Income,
            TransactionKind::Expense => Self::Expense,
        }
    }
}

impl From<workflow::TransactionStatus> for TransactionStatus {
    fn from(status: workflow::TransactionStatus) -> Self {
        match status {
            workflow::TransactionStatus::Pending => Self::Pending,
            workflow::TransactionStatus::Approved => Self::Approved,
            workflow::TransactionStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<&TransactionStatus> for workflow::TransactionStatus {
    fn from(status: &TransactionStatus) -> Self {
        match status {
            TransactionStatus::Pending => Self::Pending,
            TransactionStatus::Approved => Self::Approved,
            TransactionStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<&UserRole> for workflow::Role {
    fn from(role: &UserRole) -> Self {
        match role {
            UserRole::Marbot => Self::Marbot,
            UserRole::Bendahara => Self::Bendahara,
            UserRole::Ketua => Self::Ketua,
            UserRole::SuperAdmin => Self::SuperAdmin,
        }
    }
}

impl From<workflow::Role> for UserRole {
    fn from(role: workflow::Role) -> Self {
        match role {
            workflow::Role::Marbot => Self::Marbot,
            workflow::Role::Bendahara => Self::Bendahara,
            workflow::Role::Ketua => Self::Ketua,
            workflow::Role::SuperAdmin => Self::SuperAdmin,
        }
    }
}
