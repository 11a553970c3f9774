//! # Product Repository
//!
//! Catalog CRUD and search for warehouse products.
//!
//! ## Ownership Boundary
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Admin surface (THIS MODULE)          Ledger surface (crate::ledger)   │
//! │  ──────────────────────────           ──────────────────────────────   │
//! │  create / update / delete             ship, sale, return move stock    │
//! │  name, category, price, discount      version-guarded (CAS) writes     │
//! │  direct stock correction                                               │
//! │                                                                         │
//! │  Admin writes are last-write-wins but still bump `version`, so any    │
//! │  in-flight ledger operation racing an admin edit loses its CAS and    │
//! │  retries on a fresh snapshot.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use konsi_core::validation::{validate_discount, validate_required_fields};
use konsi_core::{LedgerError, Product, ValidationError};

const PRODUCT_COLUMNS: &str =
    "id, name, category, price, stock, discount_percent, created_at, updated_at, version";

/// Input for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    /// Unit price in minor currency units.
    pub price: i64,
    /// Initial warehouse stock.
    pub stock: i64,
    /// Standing discount percentage (0-100).
    pub discount_percent: u32,
}

/// Admin-editable fields of a product.
///
/// `stock` is included for manual corrections; routine stock movement goes
/// through the ledger operations.
#[derive(Debug, Clone)]
pub struct ProductUpdate {
    pub name: String,
    pub category: String,
    pub price: i64,
    pub stock: i64,
    pub discount_percent: u32,
}

/// Repository for product catalog operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists all products, ordered by name.
    pub async fn list(&self) -> StoreResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Searches products by name or category, case-insensitive substring
    /// match, ordered by name.
    pub async fn search(&self, query: &str) -> StoreResult<Vec<Product>> {
        let pattern = format!("%{}%", query.trim());

        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE name LIKE ?1 OR category LIKE ?1 \
             ORDER BY name"
        ))
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets a product by ID.
    pub async fn get_by_id(&self, id: &str) -> StoreResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Creates a new product after validating its fields.
    pub async fn create(&self, input: NewProduct) -> StoreResult<Product> {
        validate_required_fields(&[
            ("name", input.name.as_str()),
            ("category", input.category.as_str()),
        ])
        .map_err(LedgerError::from)?;
        validate_discount(input.discount_percent as i64).map_err(LedgerError::from)?;
        if input.price <= 0 {
            return Err(LedgerError::from(ValidationError::MustBePositive {
                field: "price".to_string(),
            })
            .into());
        }
        if input.stock < 0 {
            return Err(LedgerError::from(ValidationError::MustBePositive {
                field: "stock".to_string(),
            })
            .into());
        }

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            category: input.category.trim().to_string(),
            price: input.price,
            stock: input.stock,
            discount_percent: input.discount_percent,
            created_at: now,
            updated_at: now,
            version: 0,
        };

        debug!(id = %product.id, name = %product.name, "Creating product");

        sqlx::query(
            "INSERT INTO products \
             (id, name, category, price, stock, discount_percent, created_at, updated_at, version) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.price)
        .bind(product.stock)
        .bind(product.discount_percent)
        .bind(product.created_at)
        .bind(product.updated_at)
        .bind(product.version)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Updates a product's admin-editable fields.
    ///
    /// Last-write-wins, but bumps `version` so concurrent ledger operations
    /// detect the change.
    pub async fn update(&self, id: &str, update: ProductUpdate) -> StoreResult<Product> {
        validate_required_fields(&[
            ("name", update.name.as_str()),
            ("category", update.category.as_str()),
        ])
        .map_err(LedgerError::from)?;
        validate_discount(update.discount_percent as i64).map_err(LedgerError::from)?;

        debug!(id = %id, "Updating product");

        let result = sqlx::query(
            "UPDATE products \
             SET name = ?1, category = ?2, price = ?3, stock = ?4, \
                 discount_percent = ?5, updated_at = ?6, version = version + 1 \
             WHERE id = ?7",
        )
        .bind(update.name.trim())
        .bind(update.category.trim())
        .bind(update.price)
        .bind(update.stock)
        .bind(update.discount_percent)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Product", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| StoreError::not_found("Product", id))
    }

    /// Hard-deletes a product.
    ///
    /// Live consigned-inventory rows for the product are removed too;
    /// historical records keep their snapshot of the product's name and are
    /// deliberately left alone.
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Product", id));
        }

        sqlx::query("DELETE FROM partner_inventory WHERE product_id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Returns the total number of products.
    pub async fn count(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
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

    fn kopi() -> NewProduct {
        NewProduct {
            name: "Kopi Arabika 250g".to_string(),
            category: "Minuman".to_string(),
            price: 45_000,
            stock: 150,
            discount_percent: 0,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = db().await;
        let repo = db.products();

        let created = repo.create(kopi()).await.unwrap();
        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();

        assert_eq!(fetched.name, "Kopi Arabika 250g");
        assert_eq!(fetched.price, 45_000);
        assert_eq!(fetched.stock, 150);
        assert_eq!(fetched.version, 0);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let db = db().await;
        let mut input = kopi();
        input.name = "   ".to_string();

        let err = db.products().create(input).await.unwrap_err();
        assert!(matches!(err, StoreError::Domain(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_discount() {
        let db = db().await;
        let mut input = kopi();
        input.discount_percent = 101;

        assert!(db.products().create(input).await.is_err());
    }

    #[tokio::test]
    async fn test_search_matches_name_and_category() {
        let db = db().await;
        let repo = db.products();
        repo.create(kopi()).await.unwrap();
        repo.create(NewProduct {
            name: "Gula Aren Cair".to_string(),
            category: "Bahan Baku".to_string(),
            price: 25_000,
            stock: 10,
            discount_percent: 0,
        })
        .await
        .unwrap();

        assert_eq!(repo.search("kopi").await.unwrap().len(), 1);
        assert_eq!(repo.search("bahan").await.unwrap().len(), 1);
        assert_eq!(repo.search("zzz").await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_update_bumps_version() {
        let db = db().await;
        let repo = db.products();
        let created = repo.create(kopi()).await.unwrap();

        let updated = repo
            .update(
                &created.id,
                ProductUpdate {
                    name: created.name.clone(),
                    category: created.category.clone(),
                    price: 50_000,
                    stock: created.stock,
                    discount_percent: 10,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.price, 50_000);
        assert_eq!(updated.discount_percent, 10);
        assert_eq!(updated.version, 1);
    }

    #[tokio::test]
    async fn test_delete_is_hard() {
        let db = db().await;
        let repo = db.products();
        let created = repo.create(kopi()).await.unwrap();

        repo.delete(&created.id).await.unwrap();
        assert!(repo.get_by_id(&created.id).await.unwrap().is_none());

        let err = repo.delete(&created.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
