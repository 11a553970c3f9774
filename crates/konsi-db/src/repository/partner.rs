//! # Partner Repository
//!
//! Partner CRUD plus consigned-inventory loading.
//!
//! ## Inventory Loading
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Partner rows don't carry inventory; it lives relationally:            │
//! │                                                                         │
//! │  partners                    partner_inventory                         │
//! │  ┌──────────────┐            ┌──────────────────────────────┐          │
//! │  │ id, name,    │   1 : N    │ partner_id, product_id, qty  │          │
//! │  │ debt, ...    │◄───────────│ PRIMARY KEY (partner, product)│          │
//! │  └──────────────┘            └──────────────────────────────┘          │
//! │                                                                         │
//! │  Every read here hydrates the full map, so `Partner::held()` works    │
//! │  the same whether the value came from the store or a pure test.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `debt` and `total_paid` are ledger-owned balances: the update surface
//! here deliberately cannot touch them.

use chrono::Utc;
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use konsi_core::validation::validate_required_fields;
use konsi_core::{LedgerError, Partner};

const PARTNER_COLUMNS: &str = "id, name, owner, address, phone, debt, total_paid, credit_limit, \
                               created_at, updated_at, version";

/// Input for creating a partner.
#[derive(Debug, Clone)]
pub struct NewPartner {
    pub name: String,
    pub owner: String,
    pub address: String,
    pub phone: String,
    /// Optional credit limit in minor units; 0 means no limit.
    pub credit_limit: i64,
}

/// Admin-editable fields of a partner. Balances are excluded on purpose.
#[derive(Debug, Clone)]
pub struct PartnerUpdate {
    pub name: String,
    pub owner: String,
    pub address: String,
    pub phone: String,
    pub credit_limit: i64,
}

/// Repository for partner operations.
#[derive(Debug, Clone)]
pub struct PartnerRepository {
    pool: SqlitePool,
}

impl PartnerRepository {
    /// Creates a new PartnerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PartnerRepository { pool }
    }

    /// Lists all partners with inventories hydrated, ordered by name.
    pub async fn list(&self) -> StoreResult<Vec<Partner>> {
        let mut partners = sqlx::query_as::<_, Partner>(&format!(
            "SELECT {PARTNER_COLUMNS} FROM partners ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        // One query for all inventory rows, grouped in memory
        let rows: Vec<(String, String, i64)> =
            sqlx::query_as("SELECT partner_id, product_id, qty FROM partner_inventory")
                .fetch_all(&self.pool)
                .await?;

        let mut by_partner: HashMap<String, HashMap<String, i64>> = HashMap::new();
        for (partner_id, product_id, qty) in rows {
            by_partner
                .entry(partner_id)
                .or_default()
                .insert(product_id, qty);
        }

        for partner in &mut partners {
            if let Some(inventory) = by_partner.remove(&partner.id) {
                partner.inventory = inventory;
            }
        }

        Ok(partners)
    }

    /// Gets a partner by ID with inventory hydrated.
    pub async fn get_by_id(&self, id: &str) -> StoreResult<Option<Partner>> {
        let partner = sqlx::query_as::<_, Partner>(&format!(
            "SELECT {PARTNER_COLUMNS} FROM partners WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(mut partner) = partner else {
            return Ok(None);
        };
        partner.inventory = self.load_inventory(id).await?;
        Ok(Some(partner))
    }

    /// Creates a new partner with zeroed balances.
    pub async fn create(&self, input: NewPartner) -> StoreResult<Partner> {
        validate_required_fields(&[
            ("name", input.name.as_str()),
            ("owner", input.owner.as_str()),
            ("address", input.address.as_str()),
            ("phone", input.phone.as_str()),
        ])
        .map_err(LedgerError::from)?;

        let now = Utc::now();
        let partner = Partner {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            owner: input.owner.trim().to_string(),
            address: input.address.trim().to_string(),
            phone: input.phone.trim().to_string(),
            debt: 0,
            total_paid: 0,
            credit_limit: input.credit_limit,
            inventory: HashMap::new(),
            created_at: now,
            updated_at: now,
            version: 0,
        };

        debug!(id = %partner.id, name = %partner.name, "Creating partner");

        sqlx::query(
            "INSERT INTO partners \
             (id, name, owner, address, phone, debt, total_paid, credit_limit, \
              created_at, updated_at, version) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )
        .bind(&partner.id)
        .bind(&partner.name)
        .bind(&partner.owner)
        .bind(&partner.address)
        .bind(&partner.phone)
        .bind(partner.debt)
        .bind(partner.total_paid)
        .bind(partner.credit_limit)
        .bind(partner.created_at)
        .bind(partner.updated_at)
        .bind(partner.version)
        .execute(&self.pool)
        .await?;

        Ok(partner)
    }

    /// Updates a partner's profile fields. Balances are untouchable here.
    pub async fn update(&self, id: &str, update: PartnerUpdate) -> StoreResult<Partner> {
        validate_required_fields(&[
            ("name", update.name.as_str()),
            ("owner", update.owner.as_str()),
            ("address", update.address.as_str()),
            ("phone", update.phone.as_str()),
        ])
        .map_err(LedgerError::from)?;

        debug!(id = %id, "Updating partner");

        let result = sqlx::query(
            "UPDATE partners \
             SET name = ?1, owner = ?2, address = ?3, phone = ?4, credit_limit = ?5, \
                 updated_at = ?6, version = version + 1 \
             WHERE id = ?7",
        )
        .bind(update.name.trim())
        .bind(update.owner.trim())
        .bind(update.address.trim())
        .bind(update.phone.trim())
        .bind(update.credit_limit)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Partner", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| StoreError::not_found("Partner", id))
    }

    /// Hard-deletes a partner. Inventory rows cascade; historical records
    /// keep their name snapshot and are deliberately left alone.
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        debug!(id = %id, "Deleting partner");

        let result = sqlx::query("DELETE FROM partners WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Partner", id));
        }

        Ok(())
    }

    /// Returns the total number of partners.
    pub async fn count(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM partners")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn load_inventory(&self, partner_id: &str) -> StoreResult<HashMap<String, i64>> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT product_id, qty FROM partner_inventory WHERE partner_id = ?1")
                .bind(partner_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn toko_berkah() -> NewPartner {
        NewPartner {
            name: "Toko Berkah Utama".to_string(),
            owner: "Budi Santoso".to_string(),
            address: "Jl. Melati No. 5".to_string(),
            phone: "08123456789".to_string(),
            credit_limit: 0,
        }
    }

    #[tokio::test]
    async fn test_create_starts_with_zero_balances() {
        let db = db().await;
        let partner = db.partners().create(toko_berkah()).await.unwrap();

        assert_eq!(partner.debt, 0);
        assert_eq!(partner.total_paid, 0);
        assert!(partner.inventory.is_empty());
    }

    #[tokio::test]
    async fn test_create_reports_all_missing_fields() {
        let db = db().await;
        let mut input = toko_berkah();
        input.owner = String::new();
        input.phone = "  ".to_string();

        let err = db.partners().create(input).await.unwrap_err();
        assert!(err.to_string().contains("owner"));
        assert!(err.to_string().contains("phone"));
    }

    #[tokio::test]
    async fn test_get_hydrates_inventory() {
        let db = db().await;
        let repo = db.partners();
        let partner = repo.create(toko_berkah()).await.unwrap();

        sqlx::query(
            "INSERT INTO partner_inventory (partner_id, product_id, qty) VALUES (?1, ?2, ?3)",
        )
        .bind(&partner.id)
        .bind("p1")
        .bind(7_i64)
        .execute(db.pool())
        .await
        .unwrap();

        let fetched = repo.get_by_id(&partner.id).await.unwrap().unwrap();
        assert_eq!(fetched.held("p1"), 7);
        assert_eq!(fetched.held("p2"), 0);
    }

    #[tokio::test]
    async fn test_update_cannot_touch_balances() {
        let db = db().await;
        let repo = db.partners();
        let partner = repo.create(toko_berkah()).await.unwrap();

        sqlx::query("UPDATE partners SET debt = 500000 WHERE id = ?1")
            .bind(&partner.id)
            .execute(db.pool())
            .await
            .unwrap();

        let updated = repo
            .update(
                &partner.id,
                PartnerUpdate {
                    name: "Toko Berkah Baru".to_string(),
                    owner: partner.owner.clone(),
                    address: partner.address.clone(),
                    phone: partner.phone.clone(),
                    credit_limit: 1_000_000,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Toko Berkah Baru");
        assert_eq!(updated.debt, 500_000);
        assert_eq!(updated.credit_limit, 1_000_000);
    }

    #[tokio::test]
    async fn test_delete_cascades_inventory() {
        let db = db().await;
        let repo = db.partners();
        let partner = repo.create(toko_berkah()).await.unwrap();

        sqlx::query(
            "INSERT INTO partner_inventory (partner_id, product_id, qty) VALUES (?1, 'p1', 3)",
        )
        .bind(&partner.id)
        .execute(db.pool())
        .await
        .unwrap();

        repo.delete(&partner.id).await.unwrap();

        let rows: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM partner_inventory WHERE partner_id = ?1")
                .bind(&partner.id)
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!(rows, 0);
    }
}
