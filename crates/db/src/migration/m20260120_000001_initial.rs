//! Initial database migration.
//!
//! Creates the enum types, users and transactions tables, indexes, and
//! the `updated_at` trigger.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(TRANSACTIONS_SQL).await?;
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- User roles at the masjid
CREATE TYPE user_role AS ENUM (
    'marbot',
    'bendahara',
    'ketua',
    'super_admin'
);

-- Transaction kind
CREATE TYPE transaction_kind AS ENUM ('income', 'expense');

-- Approval status; approved and rejected are terminal
CREATE TYPE transaction_status AS ENUM ('pending', 'approved', 'rejected');
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    role user_role NOT NULL DEFAULT 'marbot',
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_users_role ON users(role);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id BIGSERIAL PRIMARY KEY,
    -- Public identifier for sharing transaction links
    uuid UUID NOT NULL UNIQUE,
    kind transaction_kind NOT NULL,
    -- Category, e.g. 'Kotak Jumat', 'Renovasi', 'Operasional'
    category VARCHAR(100) NOT NULL,
    amount NUMERIC(15, 2) NOT NULL,
    description TEXT,
    -- Reference to the uploaded proof (required for expenses)
    proof_path VARCHAR(255),
    -- User who recorded this transaction
    recorded_by UUID REFERENCES users(id) ON DELETE SET NULL,
    -- When the transaction happened, not when it was recorded
    occurred_on DATE NOT NULL,
    status transaction_status NOT NULL,
    -- Reviewer who decided a pending transaction; NULL when auto-approved
    approved_by UUID REFERENCES users(id) ON DELETE SET NULL,
    approved_at TIMESTAMPTZ,
    rejection_reason TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_txn_amount_non_negative CHECK (amount >= 0),
    CONSTRAINT chk_txn_expense_has_proof CHECK (kind <> 'expense' OR proof_path IS NOT NULL),
    CONSTRAINT chk_txn_rejection_reason CHECK ((status = 'rejected') = (rejection_reason IS NOT NULL))
);

CREATE INDEX idx_txn_kind_occurred ON transactions(kind, occurred_on);
CREATE INDEX idx_txn_category ON transactions(category);
CREATE INDEX idx_txn_occurred ON transactions(occurred_on);
CREATE INDEX idx_txn_status ON transactions(status);
CREATE INDEX idx_txn_pending_queue ON transactions(created_at) WHERE status = 'pending';
";

const TRIGGERS_SQL: &str = r"
-- FUNCTION: touch_updated_at
-- Keeps updated_at current on every row update
CREATE OR REPLACE FUNCTION touch_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = NOW();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_users_touch_updated_at
BEFORE UPDATE ON users
FOR EACH ROW
EXECUTE FUNCTION touch_updated_at();

CREATE TRIGGER trg_txn_touch_updated_at
BEFORE UPDATE ON transactions
FOR EACH ROW
EXECUTE FUNCTION touch_updated_at();
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS transactions CASCADE;
DROP TABLE IF EXISTS users CASCADE;
DROP FUNCTION IF EXISTS touch_updated_at CASCADE;
DROP TYPE IF EXISTS transaction_status;
DROP TYPE IF EXISTS transaction_kind;
DROP TYPE IF EXISTS user_role;
";
