//! # Records Repository
//!
//! Read-only access to the four append-only record collections:
//! distributions, sales, returns, payments.
//!
//! Records are written exclusively by the ledger executor inside its
//! transactions; this repository only lists and looks them up. Snapshot
//! name fields make every listing self-describing without joins, so history
//! survives hard deletes of the entities it mentions.

use sqlx::SqlitePool;

use crate::error::StoreResult;
use konsi_core::{Distribution, Payment, Return, Sale};

const DISTRIBUTION_COLUMNS: &str = "id, partner_id, product_id, partner_name, product_name, qty, \
                                    unit_price, date, req_date, status, delivered_at";

const SALE_COLUMNS: &str = "id, product_id, partner_id, product_name, partner_name, buyer_name, \
                            qty, unit_price, total, payment_method, is_direct, date";

/// Repository for the append-only record collections.
#[derive(Debug, Clone)]
pub struct RecordsRepository {
    pool: SqlitePool,
}

impl RecordsRepository {
    /// Creates a new RecordsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RecordsRepository { pool }
    }

    /// Lists all distributions, newest first.
    pub async fn list_distributions(&self) -> StoreResult<Vec<Distribution>> {
        let records = sqlx::query_as::<_, Distribution>(&format!(
            "SELECT {DISTRIBUTION_COLUMNS} FROM distributions ORDER BY date DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Gets a distribution by ID.
    pub async fn get_distribution(&self, id: &str) -> StoreResult<Option<Distribution>> {
        let record = sqlx::query_as::<_, Distribution>(&format!(
            "SELECT {DISTRIBUTION_COLUMNS} FROM distributions WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Lists all sales, newest first.
    pub async fn list_sales(&self) -> StoreResult<Vec<Sale>> {
        let records = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales ORDER BY date DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Lists sales recorded through one partner, newest first.
    pub async fn list_sales_for_partner(&self, partner_id: &str) -> StoreResult<Vec<Sale>> {
        let records = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE partner_id = ?1 ORDER BY date DESC"
        ))
        .bind(partner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Lists all returns, newest first.
    pub async fn list_returns(&self) -> StoreResult<Vec<Return>> {
        let records = sqlx::query_as::<_, Return>(
            "SELECT id, partner_id, product_id, partner_name, product_name, qty, reason, \
                    credit, date \
             FROM returns ORDER BY date DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Lists all payments, newest first.
    pub async fn list_payments(&self) -> StoreResult<Vec<Payment>> {
        let records = sqlx::query_as::<_, Payment>(
            "SELECT id, partner_id, partner_name, amount, date \
             FROM payments ORDER BY date DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Returns the unit price frozen on the most recent shipment of a
    /// product to a partner, if any. Used by the shipment-price return
    /// policy.
    pub async fn latest_shipment_unit_price(
        &self,
        partner_id: &str,
        product_id: &str,
    ) -> StoreResult<Option<i64>> {
        let price: Option<i64> = sqlx::query_scalar(
            "SELECT unit_price FROM distributions \
             WHERE partner_id = ?1 AND product_id = ?2 \
             ORDER BY date DESC LIMIT 1",
        )
        .bind(partner_id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(price)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
