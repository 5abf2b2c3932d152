//! `SeaORM` Entity for the transactions table.
//!
//! `id` is the internal storage key and never leaves the repository
//! layer; `uuid` is the public identifier, assigned once at creation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{TransactionKind, TransactionStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub uuid: Uuid,
    pub kind: TransactionKind,
    pub category: String,
    pub amount: Decimal,
    pub description: Option<String>,
    pub proof_path: Option<String>,
    pub recorded_by: Option<Uuid>,
    pub occurred_on: Date,
    pub status: TransactionStatus,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTimeWithTimeZone>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::RecordedBy",
        to = "super::users::Column::Id"
    )]
    RecordedBy,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ApprovedBy",
        to = "super::users::Column::Id"
    )]
    ApprovedBy,
}

impl ActiveModelBehavior for ActiveModel {}
