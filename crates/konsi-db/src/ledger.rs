//! # Transactional Ledger Executor
//!
//! Applies the pure plans from `konsi_core::ledger` to SQLite, one
//! transaction per operation.
//!
//! ## Plan, Then Apply
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     One Operation, One Transaction                      │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    │                                                                    │
//! │    ├── load snapshots of the touched aggregates                         │
//! │    │                                                                    │
//! │    ├── konsi_core::ledger::plan_*()   ← pure validation + computation   │
//! │    │       │                                                            │
//! │    │       └── Err? ROLLBACK, nothing written                           │
//! │    │                                                                    │
//! │    ├── UPDATE aggregates  WHERE id = ? AND version = ?  ← CAS guard     │
//! │    │       │                                                            │
//! │    │       └── 0 rows? another writer won; ROLLBACK with Conflict       │
//! │    │                                                                    │
//! │    ├── INSERT the append-only record                                    │
//! │    │                                                                    │
//! │  COMMIT ← every write of the operation lands, or none does             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The version guard makes the read-plan-write sequence safe even though
//! the reads and writes are separate statements: a concurrent writer bumps
//! the version, our guarded UPDATE matches zero rows, and the whole
//! transaction rolls back. Callers retry on [`StoreError::Conflict`].

use chrono::{NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::HashMap;
use tracing::{debug, info};

use konsi_core::ledger::{plan_delivery, plan_payment, plan_return, plan_sale, plan_shipment};
use konsi_core::ledger::{SaleEffect, SalePlan, SaleRequest, SaleSource};
use konsi_core::{
    derive_notifications, Distribution, DistributionStatus, LedgerSnapshot, Money, Notification,
    Partner, Payment, PaymentMethod, Product, Return, ReturnPricing, Sale, Settings,
};

use crate::error::{StoreError, StoreResult};

/// Input for recording a sale.
#[derive(Debug, Clone)]
pub struct NewSale {
    pub product_id: String,
    /// Selling partner; None records a direct warehouse sale.
    pub partner_id: Option<String>,
    pub qty: i64,
    /// Agreed unit price in minor units. None uses the product's effective
    /// (discounted) catalog price.
    pub unit_price: Option<i64>,
    pub buyer_name: String,
    pub payment_method: PaymentMethod,
}

/// Executes ledger operations against the store.
///
/// Obtained via `Database::ledger(settings)`. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Ledger {
    pool: SqlitePool,
    settings: Settings,
}

impl Ledger {
    /// Creates a new ledger executor.
    pub fn new(pool: SqlitePool, settings: Settings) -> Self {
        Ledger { pool, settings }
    }

    /// The settings this executor was built with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // =========================================================================
    // The Five Operations
    // =========================================================================

    /// Ships consigned stock to a partner.
    ///
    /// Decrements warehouse stock, accrues `price * qty` of debt, and
    /// creates an in-transit distribution. Debt accrues *now*, not at
    /// delivery confirmation.
    pub async fn ship_to_partner(
        &self,
        product_id: &str,
        partner_id: &str,
        qty: i64,
        req_date: NaiveDate,
    ) -> StoreResult<Distribution> {
        let mut tx = self.pool.begin().await?;

        let product = load_product(&mut tx, product_id).await?;
        let partner = load_partner(&mut tx, partner_id).await?;

        let plan = plan_shipment(&product, &partner, qty, req_date, Utc::now())?;

        apply_product(&mut tx, &plan.product).await?;
        apply_partner(&mut tx, &plan.partner).await?;
        insert_distribution(&mut tx, &plan.distribution).await?;

        tx.commit().await?;

        info!(
            distribution_id = %plan.distribution.id,
            product = %product.name,
            partner = %partner.name,
            qty,
            value = %plan.distribution.value(),
            "Shipped stock to partner"
        );
        Ok(plan.distribution)
    }

    /// Confirms arrival of an in-transit distribution.
    ///
    /// Moves the shipped units into the partner's consigned inventory.
    /// Confirming twice fails the second time with
    /// [`konsi_core::LedgerError::AlreadyDelivered`]; nothing is
    /// double-counted.
    pub async fn confirm_delivery(&self, distribution_id: &str) -> StoreResult<Distribution> {
        let mut tx = self.pool.begin().await?;

        let distribution = load_distribution(&mut tx, distribution_id).await?;
        let partner = load_partner(&mut tx, &distribution.partner_id).await?;

        let plan = plan_delivery(&distribution, &partner, Utc::now())?;

        // Status guard in the WHERE clause backs up the plan's own check
        let result = sqlx::query(
            "UPDATE distributions SET status = ?1, delivered_at = ?2 \
             WHERE id = ?3 AND status = ?4",
        )
        .bind(DistributionStatus::Delivered)
        .bind(plan.distribution.delivered_at)
        .bind(distribution_id)
        .bind(DistributionStatus::InTransit)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::conflict("Distribution", distribution_id));
        }

        apply_partner(&mut tx, &plan.partner).await?;
        sync_inventory(
            &mut tx,
            &plan.partner.id,
            &distribution.product_id,
            plan.partner.held(&distribution.product_id),
        )
        .await?;

        tx.commit().await?;

        info!(
            distribution_id = %distribution_id,
            partner = %partner.name,
            qty = distribution.qty,
            "Delivery confirmed"
        );
        Ok(plan.distribution)
    }

    /// Records a sale, direct from the warehouse or through a partner.
    ///
    /// Partner sales reduce the partner's consigned inventory and their
    /// debt by the sale total; direct sales reduce warehouse stock. The
    /// total is always recomputed server-side.
    pub async fn record_sale(&self, request: NewSale) -> StoreResult<Sale> {
        let mut tx = self.pool.begin().await?;

        let product = load_product(&mut tx, &request.product_id).await?;
        let partner = match &request.partner_id {
            Some(id) => Some(load_partner(&mut tx, id).await?),
            None => None,
        };

        let unit_price = match request.unit_price {
            Some(minor) => Money::from_minor(minor),
            None => product.effective_price(),
        };
        let source = match &partner {
            Some(p) => SaleSource::Partner(p),
            None => SaleSource::Warehouse,
        };

        let SalePlan { effect, sale } = plan_sale(
            SaleRequest {
                product: &product,
                source,
                qty: request.qty,
                unit_price,
                buyer_name: &request.buyer_name,
                payment_method: request.payment_method,
            },
            Utc::now(),
        )?;

        match &effect {
            SaleEffect::Warehouse { product } => {
                apply_product(&mut tx, product).await?;
            }
            SaleEffect::Partner { partner } => {
                apply_partner(&mut tx, partner).await?;
                sync_inventory(&mut tx, &partner.id, &product.id, partner.held(&product.id))
                    .await?;
            }
        }
        insert_sale(&mut tx, &sale).await?;

        tx.commit().await?;

        info!(
            sale_id = %sale.id,
            product = %product.name,
            qty = sale.qty,
            total = %sale.total(),
            is_direct = sale.is_direct,
            "Sale recorded"
        );
        Ok(sale)
    }

    /// Records a return of consigned goods back to the warehouse.
    ///
    /// Restores warehouse stock, reduces the partner's inventory, and
    /// credits their debt. The credit price follows the configured
    /// [`ReturnPricing`] policy.
    pub async fn record_return(
        &self,
        partner_id: &str,
        product_id: &str,
        qty: i64,
        reason: &str,
    ) -> StoreResult<Return> {
        let mut tx = self.pool.begin().await?;

        let product = load_product(&mut tx, product_id).await?;
        let partner = load_partner(&mut tx, partner_id).await?;

        let credit_unit_price = match self.settings.return_pricing {
            ReturnPricing::CurrentPrice => product.price,
            ReturnPricing::ShipmentPrice => {
                latest_shipment_price(&mut tx, partner_id, product_id)
                    .await?
                    .unwrap_or(product.price)
            }
        };
        debug!(
            policy = ?self.settings.return_pricing,
            credit_unit_price,
            "Resolved return credit price"
        );

        let plan = plan_return(
            &product,
            &partner,
            qty,
            reason,
            Money::from_minor(credit_unit_price),
            Utc::now(),
        )?;

        apply_product(&mut tx, &plan.product).await?;
        apply_partner(&mut tx, &plan.partner).await?;
        sync_inventory(&mut tx, partner_id, product_id, plan.partner.held(product_id)).await?;
        insert_return(&mut tx, &plan.record).await?;

        tx.commit().await?;

        info!(
            return_id = %plan.record.id,
            partner = %partner.name,
            qty,
            credit = plan.record.credit,
            "Return recorded"
        );
        Ok(plan.record)
    }

    /// Records a cash payment against a partner's receivable.
    ///
    /// Increases `total_paid` only; overpayment is permitted and leaves
    /// the partner with a credit balance.
    pub async fn record_payment(&self, partner_id: &str, amount: i64) -> StoreResult<Payment> {
        let mut tx = self.pool.begin().await?;

        let partner = load_partner(&mut tx, partner_id).await?;
        let plan = plan_payment(&partner, Money::from_minor(amount), Utc::now())?;

        apply_partner(&mut tx, &plan.partner).await?;
        insert_payment(&mut tx, &plan.record).await?;

        tx.commit().await?;

        info!(
            payment_id = %plan.record.id,
            partner = %partner.name,
            amount = %Money::from_minor(amount),
            receivable = %plan.partner.receivable(),
            "Payment recorded"
        );
        Ok(plan.record)
    }

    // =========================================================================
    // Derived Views
    // =========================================================================

    /// Derives the current alert list from a fresh snapshot of the store.
    pub async fn notifications(&self) -> StoreResult<Vec<Notification>> {
        let products = crate::repository::product::ProductRepository::new(self.pool.clone())
            .list()
            .await?;
        let partners = crate::repository::partner::PartnerRepository::new(self.pool.clone())
            .list()
            .await?;
        let distributions = crate::repository::records::RecordsRepository::new(self.pool.clone())
            .list_distributions()
            .await?;

        Ok(derive_notifications(
            &LedgerSnapshot {
                products: &products,
                partners: &partners,
                distributions: &distributions,
            },
            &self.settings,
            Utc::now(),
        ))
    }
}

// =============================================================================
// Snapshot Loads (inside the operation's transaction)
// =============================================================================

async fn load_product(conn: &mut SqliteConnection, id: &str) -> StoreResult<Product> {
    sqlx::query_as::<_, Product>(
        "SELECT id, name, category, price, stock, discount_percent, \
                created_at, updated_at, version \
         FROM products WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| StoreError::not_found("Product", id))
}

async fn load_partner(conn: &mut SqliteConnection, id: &str) -> StoreResult<Partner> {
    let partner = sqlx::query_as::<_, Partner>(
        "SELECT id, name, owner, address, phone, debt, total_paid, credit_limit, \
                created_at, updated_at, version \
         FROM partners WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(mut partner) = partner else {
        return Err(StoreError::not_found("Partner", id));
    };

    let rows: Vec<(String, i64)> =
        sqlx::query_as("SELECT product_id, qty FROM partner_inventory WHERE partner_id = ?1")
            .bind(id)
            .fetch_all(&mut *conn)
            .await?;
    partner.inventory = rows.into_iter().collect::<HashMap<_, _>>();

    Ok(partner)
}

async fn load_distribution(conn: &mut SqliteConnection, id: &str) -> StoreResult<Distribution> {
    sqlx::query_as::<_, Distribution>(
        "SELECT id, partner_id, product_id, partner_name, product_name, qty, unit_price, \
                date, req_date, status, delivered_at \
         FROM distributions WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| StoreError::not_found("Distribution", id))
}

async fn latest_shipment_price(
    conn: &mut SqliteConnection,
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
    .fetch_optional(&mut *conn)
    .await?;

    Ok(price)
}

// =============================================================================
// Guarded Writes
// =============================================================================

/// Writes a product's ledger-owned field (stock) with a version guard.
async fn apply_product(conn: &mut SqliteConnection, product: &Product) -> StoreResult<()> {
    let result = sqlx::query(
        "UPDATE products SET stock = ?1, updated_at = ?2, version = version + 1 \
         WHERE id = ?3 AND version = ?4",
    )
    .bind(product.stock)
    .bind(Utc::now())
    .bind(&product.id)
    .bind(product.version)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::conflict("Product", &product.id));
    }
    Ok(())
}

/// Writes a partner's ledger-owned balances with a version guard.
async fn apply_partner(conn: &mut SqliteConnection, partner: &Partner) -> StoreResult<()> {
    let result = sqlx::query(
        "UPDATE partners SET debt = ?1, total_paid = ?2, updated_at = ?3, \
                version = version + 1 \
         WHERE id = ?4 AND version = ?5",
    )
    .bind(partner.debt)
    .bind(partner.total_paid)
    .bind(Utc::now())
    .bind(&partner.id)
    .bind(partner.version)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::conflict("Partner", &partner.id));
    }
    Ok(())
}

/// Writes the absolute consigned quantity for one (partner, product) pair.
async fn sync_inventory(
    conn: &mut SqliteConnection,
    partner_id: &str,
    product_id: &str,
    qty: i64,
) -> StoreResult<()> {
    sqlx::query(
        "INSERT INTO partner_inventory (partner_id, product_id, qty) VALUES (?1, ?2, ?3) \
         ON CONFLICT(partner_id, product_id) DO UPDATE SET qty = excluded.qty",
    )
    .bind(partner_id)
    .bind(product_id)
    .bind(qty)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

// =============================================================================
// Record Inserts
// =============================================================================

async fn insert_distribution(
    conn: &mut SqliteConnection,
    dist: &Distribution,
) -> StoreResult<()> {
    sqlx::query(
        "INSERT INTO distributions \
         (id, partner_id, product_id, partner_name, product_name, qty, unit_price, \
          date, req_date, status, delivered_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    )
    .bind(&dist.id)
    .bind(&dist.partner_id)
    .bind(&dist.product_id)
    .bind(&dist.partner_name)
    .bind(&dist.product_name)
    .bind(dist.qty)
    .bind(dist.unit_price)
    .bind(dist.date)
    .bind(dist.req_date)
    .bind(dist.status)
    .bind(dist.delivered_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn insert_sale(conn: &mut SqliteConnection, sale: &Sale) -> StoreResult<()> {
    sqlx::query(
        "INSERT INTO sales \
         (id, product_id, partner_id, product_name, partner_name, buyer_name, qty, \
          unit_price, total, payment_method, is_direct, date) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
    )
    .bind(&sale.id)
    .bind(&sale.product_id)
    .bind(&sale.partner_id)
    .bind(&sale.product_name)
    .bind(&sale.partner_name)
    .bind(&sale.buyer_name)
    .bind(sale.qty)
    .bind(sale.unit_price)
    .bind(sale.total)
    .bind(sale.payment_method)
    .bind(sale.is_direct)
    .bind(sale.date)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn insert_return(conn: &mut SqliteConnection, record: &Return) -> StoreResult<()> {
    sqlx::query(
        "INSERT INTO returns \
         (id, partner_id, product_id, partner_name, product_name, qty, reason, credit, date) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )
    .bind(&record.id)
    .bind(&record.partner_id)
    .bind(&record.product_id)
    .bind(&record.partner_name)
    .bind(&record.product_name)
    .bind(record.qty)
    .bind(&record.reason)
    .bind(record.credit)
    .bind(record.date)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn insert_payment(conn: &mut SqliteConnection, record: &Payment) -> StoreResult<()> {
    sqlx::query(
        "INSERT INTO payments (id, partner_id, partner_name, amount, date) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(&record.id)
    .bind(&record.partner_id)
    .bind(&record.partner_name)
    .bind(record.amount)
    .bind(record.date)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

// =============================================================================
// Integration Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::partner::NewPartner;
    use crate::repository::product::NewProduct;
    use konsi_core::{LedgerError, NotificationKind};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_product(db: &Database, price: i64, stock: i64) -> Product {
        db.products()
            .create(NewProduct {
                name: "Kopi Arabika 250g".to_string(),
                category: "Minuman".to_string(),
                price,
                stock,
                discount_percent: 0,
            })
            .await
            .unwrap()
    }

    async fn seed_partner(db: &Database) -> Partner {
        db.partners()
            .create(NewPartner {
                name: "Toko Berkah Utama".to_string(),
                owner: "Budi Santoso".to_string(),
                address: "Jl. Melati No. 5".to_string(),
                phone: "08123456789".to_string(),
                credit_limit: 0,
            })
            .await
            .unwrap()
    }

    fn req_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
    }

    #[tokio::test]
    async fn test_shipment_persists_all_three_writes() {
        let db = db().await;
        let product = seed_product(&db, 45_000, 15).await;
        let partner = seed_partner(&db).await;
        let ledger = db.ledger(Settings::default());

        let dist = ledger
            .ship_to_partner(&product.id, &partner.id, 10, req_date())
            .await
            .unwrap();

        assert_eq!(dist.status, DistributionStatus::InTransit);
        assert_eq!(dist.unit_price, 45_000);

        let product = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(product.stock, 5);
        assert_eq!(product.version, 1);

        let partner = db.partners().get_by_id(&partner.id).await.unwrap().unwrap();
        assert_eq!(partner.debt, 450_000);
        // Inventory only moves at delivery confirmation
        assert_eq!(partner.held(&dist.product_id), 0);
    }

    #[tokio::test]
    async fn test_shipment_shortfall_writes_nothing() {
        let db = db().await;
        let product = seed_product(&db, 45_000, 5).await;
        let partner = seed_partner(&db).await;
        let ledger = db.ledger(Settings::default());

        let err = ledger
            .ship_to_partner(&product.id, &partner.id, 10, req_date())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Domain(LedgerError::InsufficientWarehouseStock { .. })
        ));

        let product = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(product.stock, 5);
        let partner = db.partners().get_by_id(&partner.id).await.unwrap().unwrap();
        assert_eq!(partner.debt, 0);
        assert!(db.records().list_distributions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delivery_moves_inventory_exactly_once() {
        let db = db().await;
        let product = seed_product(&db, 45_000, 15).await;
        let partner = seed_partner(&db).await;
        let ledger = db.ledger(Settings::default());

        let dist = ledger
            .ship_to_partner(&product.id, &partner.id, 5, req_date())
            .await
            .unwrap();

        let confirmed = ledger.confirm_delivery(&dist.id).await.unwrap();
        assert_eq!(confirmed.status, DistributionStatus::Delivered);
        assert!(confirmed.delivered_at.is_some());

        let loaded = db.partners().get_by_id(&partner.id).await.unwrap().unwrap();
        assert_eq!(loaded.held(&product.id), 5);

        // Second confirmation fails, inventory unchanged
        let err = ledger.confirm_delivery(&dist.id).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Domain(LedgerError::AlreadyDelivered(_))
        ));
        let loaded = db.partners().get_by_id(&partner.id).await.unwrap().unwrap();
        assert_eq!(loaded.held(&product.id), 5);
    }

    #[tokio::test]
    async fn test_direct_sale_reduces_warehouse_stock() {
        let db = db().await;
        let product = seed_product(&db, 45_000, 10).await;
        let ledger = db.ledger(Settings::default());

        let sale = ledger
            .record_sale(NewSale {
                product_id: product.id.clone(),
                partner_id: None,
                qty: 3,
                unit_price: None,
                buyer_name: "Ibu Ani".to_string(),
                payment_method: PaymentMethod::Cash,
            })
            .await
            .unwrap();

        assert!(sale.is_direct);
        // Defaults to the catalog price when no price is agreed
        assert_eq!(sale.unit_price, 45_000);
        assert_eq!(sale.total, 135_000);

        let product = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(product.stock, 7);
    }

    #[tokio::test]
    async fn test_partner_sale_reduces_inventory_and_debt() {
        let db = db().await;
        let product = seed_product(&db, 20_000, 50).await;
        let partner = seed_partner(&db).await;
        let ledger = db.ledger(Settings::default());

        let dist = ledger
            .ship_to_partner(&product.id, &partner.id, 5, req_date())
            .await
            .unwrap();
        ledger.confirm_delivery(&dist.id).await.unwrap();

        let sale = ledger
            .record_sale(NewSale {
                product_id: product.id.clone(),
                partner_id: Some(partner.id.clone()),
                qty: 2,
                unit_price: Some(10_000),
                buyer_name: "Pak Joko".to_string(),
                payment_method: PaymentMethod::Transfer,
            })
            .await
            .unwrap();

        assert!(!sale.is_direct);
        assert_eq!(sale.partner_name.as_deref(), Some("Toko Berkah Utama"));
        assert_eq!(sale.total, 20_000);

        let loaded = db.partners().get_by_id(&partner.id).await.unwrap().unwrap();
        assert_eq!(loaded.held(&product.id), 3);
        // Shipped 100,000 worth, sold 20,000 through the partner
        assert_eq!(loaded.debt, 80_000);
        // Warehouse stock untouched by a partner sale
        let loaded_product = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(loaded_product.stock, 45);
    }

    #[tokio::test]
    async fn test_partner_sale_shortfall_writes_nothing() {
        let db = db().await;
        let product = seed_product(&db, 20_000, 50).await;
        let partner = seed_partner(&db).await;
        let ledger = db.ledger(Settings::default());

        let dist = ledger
            .ship_to_partner(&product.id, &partner.id, 2, req_date())
            .await
            .unwrap();
        ledger.confirm_delivery(&dist.id).await.unwrap();

        let err = ledger
            .record_sale(NewSale {
                product_id: product.id.clone(),
                partner_id: Some(partner.id.clone()),
                qty: 3,
                unit_price: None,
                buyer_name: "Pak Joko".to_string(),
                payment_method: PaymentMethod::Cash,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Domain(LedgerError::InsufficientPartnerStock { .. })
        ));

        let loaded = db.partners().get_by_id(&partner.id).await.unwrap().unwrap();
        assert_eq!(loaded.held(&product.id), 2);
        assert_eq!(loaded.debt, 40_000);
        assert!(db.records().list_sales().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_return_credits_at_current_price_by_default() {
        let db = db().await;
        let product = seed_product(&db, 45_000, 15).await;
        let partner = seed_partner(&db).await;
        let ledger = db.ledger(Settings::default());

        let dist = ledger
            .ship_to_partner(&product.id, &partner.id, 10, req_date())
            .await
            .unwrap();
        ledger.confirm_delivery(&dist.id).await.unwrap();

        let ret = ledger
            .record_return(&partner.id, &product.id, 4, "kemasan rusak")
            .await
            .unwrap();
        assert_eq!(ret.credit, 180_000);

        let loaded_product = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(loaded_product.stock, 9);
        let loaded = db.partners().get_by_id(&partner.id).await.unwrap().unwrap();
        assert_eq!(loaded.held(&product.id), 6);
        assert_eq!(loaded.debt, 270_000);
    }

    #[tokio::test]
    async fn test_return_can_credit_at_frozen_shipment_price() {
        let db = db().await;
        let product = seed_product(&db, 40_000, 15).await;
        let partner = seed_partner(&db).await;

        let mut settings = Settings::default();
        settings.return_pricing = ReturnPricing::ShipmentPrice;
        let ledger = db.ledger(settings);

        let dist = ledger
            .ship_to_partner(&product.id, &partner.id, 10, req_date())
            .await
            .unwrap();
        ledger.confirm_delivery(&dist.id).await.unwrap();

        // Price rises after the shipment; the credit stays at 40,000
        db.products()
            .update(
                &product.id,
                crate::repository::product::ProductUpdate {
                    name: product.name.clone(),
                    category: product.category.clone(),
                    price: 50_000,
                    stock: 5,
                    discount_percent: 0,
                },
            )
            .await
            .unwrap();

        let ret = ledger
            .record_return(&partner.id, &product.id, 2, "tidak laku")
            .await
            .unwrap();
        assert_eq!(ret.credit, 80_000);
    }

    #[tokio::test]
    async fn test_return_more_than_held_is_rejected() {
        let db = db().await;
        let product = seed_product(&db, 45_000, 15).await;
        let partner = seed_partner(&db).await;
        let ledger = db.ledger(Settings::default());

        let dist = ledger
            .ship_to_partner(&product.id, &partner.id, 3, req_date())
            .await
            .unwrap();
        ledger.confirm_delivery(&dist.id).await.unwrap();

        let err = ledger
            .record_return(&partner.id, &product.id, 4, "rusak")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Domain(LedgerError::InsufficientPartnerStock { .. })
        ));
        assert!(db.records().list_returns().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_payment_and_overpayment() {
        let db = db().await;
        let product = seed_product(&db, 20_000, 50).await;
        let partner = seed_partner(&db).await;
        let ledger = db.ledger(Settings::default());

        ledger
            .ship_to_partner(&product.id, &partner.id, 5, req_date())
            .await
            .unwrap();

        ledger.record_payment(&partner.id, 30_000).await.unwrap();
        let loaded = db.partners().get_by_id(&partner.id).await.unwrap().unwrap();
        assert_eq!(loaded.total_paid, 30_000);
        assert_eq!(loaded.debt, 100_000);
        assert_eq!(loaded.receivable().minor(), 70_000);

        // Overpayment is allowed and yields a credit balance
        ledger.record_payment(&partner.id, 100_000).await.unwrap();
        let loaded = db.partners().get_by_id(&partner.id).await.unwrap().unwrap();
        assert_eq!(loaded.receivable().minor(), -30_000);

        assert_eq!(db.records().list_payments().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_payment_rejects_non_positive() {
        let db = db().await;
        let partner = seed_partner(&db).await;
        let ledger = db.ledger(Settings::default());

        assert!(ledger.record_payment(&partner.id, 0).await.is_err());
        assert!(ledger.record_payment(&partner.id, -500).await.is_err());
    }

    #[tokio::test]
    async fn test_unknown_entities_are_not_found() {
        let db = db().await;
        let ledger = db.ledger(Settings::default());

        let err = ledger
            .ship_to_partner("nope", "nope", 1, req_date())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));

        let err = ledger.confirm_delivery("nope").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_notifications_from_store_snapshot() {
        let db = db().await;
        // 15 left after shipping: below the default threshold of 20
        let product = seed_product(&db, 45_000, 25).await;
        let partner = seed_partner(&db).await;
        let ledger = db.ledger(Settings::default());

        ledger
            .ship_to_partner(&product.id, &partner.id, 10, req_date())
            .await
            .unwrap();

        let alerts = ledger.notifications().await.unwrap();
        assert!(alerts
            .iter()
            .any(|a| a.kind == NotificationKind::LowStock));
        // 450,000 debt is below the 5,000,000 default limit
        assert!(!alerts
            .iter()
            .any(|a| a.kind == NotificationKind::HighDebt));
    }
}
