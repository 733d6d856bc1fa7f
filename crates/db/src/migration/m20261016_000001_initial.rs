//! Initial database migration.
//!
//! Creates the enums, tables, constraints and triggers for suppliers,
//! drivers, accounts, leaf collections, loans, advances, products,
//! product orders and payments.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: PEOPLE & LOGINS
        // ============================================================
        db.execute_unprepared(SUPPLIERS_SQL).await?;
        db.execute_unprepared(DRIVERS_SQL).await?;
        db.execute_unprepared(ACCOUNTS_SQL).await?;

        // ============================================================
        // PART 3: LEAF COLLECTIONS
        // ============================================================
        db.execute_unprepared(LEAF_COLLECTIONS_SQL).await?;

        // ============================================================
        // PART 4: LOANS & ADVANCES
        // ============================================================
        db.execute_unprepared(LOANS_SQL).await?;
        db.execute_unprepared(ADVANCES_SQL).await?;

        // ============================================================
        // PART 5: PRODUCTS & ORDERS
        // ============================================================
        db.execute_unprepared(PRODUCTS_SQL).await?;
        db.execute_unprepared(PRODUCT_ORDERS_SQL).await?;

        // ============================================================
        // PART 6: PAYMENTS
        // ============================================================
        db.execute_unprepared(PAYMENTS_SQL).await?;

        // ============================================================
        // PART 7: TRIGGERS & FUNCTIONS
        // ============================================================
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
CREATE TYPE account_role AS ENUM ('supplier', 'driver', 'admin');

-- 'successful' = fully settled, no longer deducted
CREATE TYPE loan_status AS ENUM ('pending', 'approved', 'successful');

-- 'transferred' = recovered, no longer deducted
CREATE TYPE advance_status AS ENUM ('pending', 'transferred');

CREATE TYPE product_kind AS ENUM ('fertilizer', 'tea_packet');

CREATE TYPE order_status AS ENUM ('pending', 'delivered', 'completed', 'cancelled');

CREATE TYPE settlement_status AS ENUM ('pending', 'processing', 'transferred');
";

const SUPPLIERS_SQL: &str = r"
CREATE TABLE suppliers (
    id                  VARCHAR(32) PRIMARY KEY CHECK (id ~ '^[A-Za-z0-9-]+$'),
    name                VARCHAR(255) NOT NULL,
    phone               VARCHAR(32),
    address             TEXT,
    bank_name           VARCHAR(255),
    bank_account_no     VARCHAR(64),
    bank_branch         VARCHAR(255),
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const DRIVERS_SQL: &str = r"
CREATE TABLE drivers (
    id                  VARCHAR(32) PRIMARY KEY CHECK (id ~ '^[A-Za-z0-9-]+$'),
    name                VARCHAR(255) NOT NULL,
    phone               VARCHAR(32),
    vehicle_number      VARCHAR(32),
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id                  UUID PRIMARY KEY,
    login               VARCHAR(64) NOT NULL UNIQUE,
    password_hash       VARCHAR(255) NOT NULL,
    role                account_role NOT NULL,
    supplier_id         VARCHAR(32) REFERENCES suppliers(id) ON DELETE CASCADE,
    driver_id           VARCHAR(32) REFERENCES drivers(id) ON DELETE CASCADE,
    is_active           BOOLEAN NOT NULL DEFAULT true,
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_account_owner CHECK (
        (role = 'supplier' AND supplier_id IS NOT NULL AND driver_id IS NULL) OR
        (role = 'driver' AND driver_id IS NOT NULL AND supplier_id IS NULL) OR
        (role = 'admin' AND supplier_id IS NULL AND driver_id IS NULL)
    )
);
";

const LEAF_COLLECTIONS_SQL: &str = r"
CREATE TABLE leaf_collections (
    id                  UUID PRIMARY KEY,
    supplier_id         VARCHAR(32) NOT NULL REFERENCES suppliers(id) ON DELETE RESTRICT,
    driver_id           VARCHAR(32) REFERENCES drivers(id) ON DELETE SET NULL,
    rate_at_collection  NUMERIC(12, 2) NOT NULL CHECK (rate_at_collection >= 0),
    gross_weight_kg     NUMERIC(12, 3) NOT NULL CHECK (gross_weight_kg > 0),
    water_weight_kg     NUMERIC(12, 3) NOT NULL CHECK (water_weight_kg >= 0),
    bag_weight_kg       NUMERIC(12, 3) NOT NULL CHECK (bag_weight_kg >= 0),
    net_weight_kg       NUMERIC(12, 3) NOT NULL,
    collected_at        TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_net_weight CHECK (
        net_weight_kg = gross_weight_kg - water_weight_kg - bag_weight_kg
    ),
    CONSTRAINT chk_deductions_within_gross CHECK (
        water_weight_kg + bag_weight_kg <= gross_weight_kg
    )
);

CREATE INDEX idx_leaf_collections_supplier ON leaf_collections(supplier_id, collected_at DESC);
";

const LOANS_SQL: &str = r"
CREATE TABLE loans (
    id                  UUID PRIMARY KEY,
    supplier_id         VARCHAR(32) NOT NULL REFERENCES suppliers(id) ON DELETE RESTRICT,
    principal_amount    NUMERIC(14, 2) NOT NULL CHECK (principal_amount > 0),
    duration_months     INTEGER NOT NULL CHECK (duration_months >= 0),
    purpose             TEXT NOT NULL,
    monthly_installment NUMERIC(14, 2) NOT NULL,
    issued_on           DATE NOT NULL,
    due_date            DATE NOT NULL,
    status              loan_status NOT NULL DEFAULT 'pending',
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_loans_supplier ON loans(supplier_id, status);
";

const ADVANCES_SQL: &str = r"
CREATE TABLE advances (
    id                  UUID PRIMARY KEY,
    supplier_id         VARCHAR(32) NOT NULL REFERENCES suppliers(id) ON DELETE RESTRICT,
    amount              NUMERIC(14, 2) NOT NULL CHECK (amount > 0),
    advance_date        DATE NOT NULL,
    status              advance_status NOT NULL DEFAULT 'pending',
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_advances_supplier ON advances(supplier_id, status);
";

const PRODUCTS_SQL: &str = r"
CREATE TABLE products (
    id                  UUID PRIMARY KEY,
    name                VARCHAR(255) NOT NULL UNIQUE,
    kind                product_kind NOT NULL,
    rate_per_bag        NUMERIC(12, 2) NOT NULL CHECK (rate_per_bag >= 0),
    stock_bags          INTEGER NOT NULL DEFAULT 0 CHECK (stock_bags >= 0),
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const PRODUCT_ORDERS_SQL: &str = r"
CREATE TABLE product_orders (
    id                  UUID PRIMARY KEY,
    supplier_id         VARCHAR(32) NOT NULL REFERENCES suppliers(id) ON DELETE RESTRICT,
    product_id          UUID NOT NULL REFERENCES products(id) ON DELETE RESTRICT,
    quantity            INTEGER NOT NULL CHECK (quantity > 0),
    status              order_status NOT NULL DEFAULT 'pending',
    rate_at_completion  NUMERIC(12, 2),
    completed_at        TIMESTAMPTZ,
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_completion_snapshot CHECK (
        (status = 'completed' AND rate_at_completion IS NOT NULL AND completed_at IS NOT NULL) OR
        (status <> 'completed' AND rate_at_completion IS NULL)
    )
);

CREATE INDEX idx_product_orders_supplier ON product_orders(supplier_id, status);
";

const PAYMENTS_SQL: &str = r"
CREATE TABLE payments (
    id                  UUID PRIMARY KEY,
    supplier_id         VARCHAR(32) NOT NULL REFERENCES suppliers(id) ON DELETE RESTRICT,
    gross_income        NUMERIC(14, 2) NOT NULL CHECK (gross_income >= 0),
    loan_amount         NUMERIC(14, 2) NOT NULL CHECK (loan_amount >= 0),
    advance_amount      NUMERIC(14, 2) NOT NULL CHECK (advance_amount >= 0),
    products_amount     NUMERIC(14, 2) NOT NULL CHECK (products_amount >= 0),
    transport_charge    NUMERIC(14, 2) NOT NULL CHECK (transport_charge >= 0),
    final_total         NUMERIC(14, 2) NOT NULL,
    payment_date        DATE NOT NULL,
    status              settlement_status NOT NULL DEFAULT 'pending',
    idempotency_key     VARCHAR(128),
    archived_at         TIMESTAMPTZ,
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    -- final_total may be negative: the supplier owes the factory
    CONSTRAINT chk_final_total CHECK (
        final_total = gross_income - loan_amount - advance_amount - products_amount - transport_charge
    )
);

CREATE INDEX idx_payments_supplier ON payments(supplier_id, created_at DESC)
    WHERE archived_at IS NULL;

CREATE UNIQUE INDEX uq_payments_idempotency ON payments(supplier_id, idempotency_key)
    WHERE idempotency_key IS NOT NULL;
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: update_updated_at
-- ============================================================
CREATE OR REPLACE FUNCTION update_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = NOW();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_suppliers_updated_at BEFORE UPDATE ON suppliers
    FOR EACH ROW EXECUTE FUNCTION update_updated_at();
CREATE TRIGGER trg_drivers_updated_at BEFORE UPDATE ON drivers
    FOR EACH ROW EXECUTE FUNCTION update_updated_at();
CREATE TRIGGER trg_accounts_updated_at BEFORE UPDATE ON accounts
    FOR EACH ROW EXECUTE FUNCTION update_updated_at();
CREATE TRIGGER trg_leaf_collections_updated_at BEFORE UPDATE ON leaf_collections
    FOR EACH ROW EXECUTE FUNCTION update_updated_at();
CREATE TRIGGER trg_loans_updated_at BEFORE UPDATE ON loans
    FOR EACH ROW EXECUTE FUNCTION update_updated_at();
CREATE TRIGGER trg_advances_updated_at BEFORE UPDATE ON advances
    FOR EACH ROW EXECUTE FUNCTION update_updated_at();
CREATE TRIGGER trg_products_updated_at BEFORE UPDATE ON products
    FOR EACH ROW EXECUTE FUNCTION update_updated_at();
CREATE TRIGGER trg_product_orders_updated_at BEFORE UPDATE ON product_orders
    FOR EACH ROW EXECUTE FUNCTION update_updated_at();
CREATE TRIGGER trg_payments_updated_at BEFORE UPDATE ON payments
    FOR EACH ROW EXECUTE FUNCTION update_updated_at();

-- ============================================================
-- FUNCTION: prevent_payment_amount_change
-- Payments are snapshots: only status and archived_at may change
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_payment_amount_change()
RETURNS TRIGGER AS $$
BEGIN
    IF NEW.supplier_id IS DISTINCT FROM OLD.supplier_id
        OR NEW.gross_income IS DISTINCT FROM OLD.gross_income
        OR NEW.loan_amount IS DISTINCT FROM OLD.loan_amount
        OR NEW.advance_amount IS DISTINCT FROM OLD.advance_amount
        OR NEW.products_amount IS DISTINCT FROM OLD.products_amount
        OR NEW.transport_charge IS DISTINCT FROM OLD.transport_charge
        OR NEW.final_total IS DISTINCT FROM OLD.final_total
        OR NEW.payment_date IS DISTINCT FROM OLD.payment_date THEN
        RAISE EXCEPTION 'Payment amounts are immutable once recorded.';
    END IF;

    IF OLD.archived_at IS NOT NULL THEN
        RAISE EXCEPTION 'Cannot modify archived payment.';
    END IF;

    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_prevent_payment_amount_change
BEFORE UPDATE ON payments
FOR EACH ROW
EXECUTE FUNCTION prevent_payment_amount_change();

CREATE OR REPLACE FUNCTION prevent_payment_delete()
RETURNS TRIGGER AS $$
BEGIN
    RAISE EXCEPTION 'Payments are archived, not deleted.';
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_prevent_payment_delete
BEFORE DELETE ON payments
FOR EACH ROW
EXECUTE FUNCTION prevent_payment_delete();
";

const DROP_ALL_SQL: &str = r"
-- ============================================================
-- DROP ALL: Rollback migration
-- Order matters due to foreign key constraints
-- ============================================================

DROP TABLE IF EXISTS payments CASCADE;
DROP TABLE IF EXISTS product_orders CASCADE;
DROP TABLE IF EXISTS products CASCADE;
DROP TABLE IF EXISTS advances CASCADE;
DROP TABLE IF EXISTS loans CASCADE;
DROP TABLE IF EXISTS leaf_collections CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;
DROP TABLE IF EXISTS drivers CASCADE;
DROP TABLE IF EXISTS suppliers CASCADE;

DROP FUNCTION IF EXISTS prevent_payment_delete() CASCADE;
DROP FUNCTION IF EXISTS prevent_payment_amount_change() CASCADE;
DROP FUNCTION IF EXISTS update_updated_at() CASCADE;

DROP TYPE IF EXISTS settlement_status;
DROP TYPE IF EXISTS order_status;
DROP TYPE IF EXISTS product_kind;
DROP TYPE IF EXISTS advance_status;
DROP TYPE IF EXISTS loan_status;
DROP TYPE IF EXISTS account_role;
";
