//! # Domain Types
//!
//! Core entity types for the consignment ledger.
//!
//! ## Entity Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Ledger Entities                              │
//! │                                                                     │
//! │  Mutable aggregates (read-modify-write, version-guarded):           │
//! │  ┌─────────────────┐   ┌──────────────────────────────┐             │
//! │  │    Product      │   │          Partner             │             │
//! │  │  ─────────────  │   │  ──────────────────────────  │             │
//! │  │  stock          │   │  debt, total_paid            │             │
//! │  │  price          │   │  inventory: product → qty    │             │
//! │  └─────────────────┘   └──────────────────────────────┘             │
//! │                                                                     │
//! │  Append-only records (immutable once created):                      │
//! │  Distribution (one state transition) · Sale · Return · Payment      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Fields
//! Records carry `product_name` / `partner_name` copied at creation time.
//! Renaming a partner later never rewrites history; the stored name is a
//! deliberate snapshot, not a live foreign-key join.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product owned by the central warehouse.
///
/// `stock` counts units held centrally, not yet shipped to any partner.
/// Only ledger operations move stock in or out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Category label (free-form, e.g. "Minuman").
    pub category: String,

    /// Unit price in minor currency units.
    pub price: i64,

    /// Warehouse stock level. Never negative after an accepted operation.
    pub stock: i64,

    /// Standing discount percentage (0-100).
    pub discount_percent: u32,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,

    /// Optimistic-concurrency version, bumped on every write.
    pub version: i64,
}

impl Product {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_minor(self.price)
    }

    /// Returns the unit price after the standing discount.
    #[inline]
    pub fn effective_price(&self) -> Money {
        self.unit_price().with_discount(self.discount_percent)
    }
}

// =============================================================================
// Partner
// =============================================================================

/// A partner store holding consigned goods.
///
/// `debt` and `total_paid` are derived ledger balances, never edited
/// directly: debt accrues at shipment and unwinds through partner sales and
/// returns; `total_paid` only ever grows through payments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Partner {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Store name.
    pub name: String,

    /// Owner's name.
    pub owner: String,

    /// Street address.
    pub address: String,

    /// Contact phone number.
    pub phone: String,

    /// Cumulative value of goods shipped, minus partner sales and returns.
    /// Minor currency units.
    pub debt: i64,

    /// Cumulative payments recorded. Minor currency units.
    pub total_paid: i64,

    /// Optional credit limit in minor units; 0 means no limit.
    pub credit_limit: i64,

    /// Consigned inventory: product id → units held.
    /// Stored relationally; loaded as a full map.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub inventory: HashMap<String, i64>,

    /// When the partner was created.
    pub created_at: DateTime<Utc>,

    /// When the partner was last updated.
    pub updated_at: DateTime<Utc>,

    /// Optimistic-concurrency version, bumped on every write.
    pub version: i64,
}

impl Partner {
    /// The amount currently owed in cash terms: `debt - total_paid`.
    ///
    /// Negative means the partner holds a credit balance (overpayment is
    /// permitted by design).
    #[inline]
    pub fn receivable(&self) -> Money {
        Money::from_minor(self.debt - self.total_paid)
    }

    /// Units of a product currently held by this partner.
    #[inline]
    pub fn held(&self, product_id: &str) -> i64 {
        self.inventory.get(product_id).copied().unwrap_or(0)
    }
}

// =============================================================================
// Distribution
// =============================================================================

/// The status of a distribution (shipment to a partner).
///
/// The only state machine in the system: `InTransit → Delivered`, exactly
/// once, never reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum DistributionStatus {
    /// Shipped; warehouse stock already decremented, debt already accrued.
    InTransit,
    /// Arrival confirmed; partner inventory incremented. Terminal.
    Delivered,
}

/// A shipment of consigned stock from the warehouse to a partner.
///
/// Debt accrues at *shipment* time, not at delivery confirmation: creating
/// a distribution already decremented warehouse stock and increased partner
/// debt by `unit_price * qty`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Distribution {
    pub id: String,
    pub partner_id: String,
    pub product_id: String,
    /// Partner name at ship time (frozen).
    pub partner_name: String,
    /// Product name at ship time (frozen).
    pub product_name: String,
    /// Units shipped, always > 0.
    pub qty: i64,
    /// Unit price at ship time (frozen); the debt accrued is
    /// `unit_price * qty`.
    pub unit_price: i64,
    /// When the shipment left the warehouse.
    pub date: DateTime<Utc>,
    /// Requested delivery date.
    pub req_date: NaiveDate,
    pub status: DistributionStatus,
    /// When delivery was confirmed, if it has been.
    pub delivered_at: Option<DateTime<Utc>>,
}

impl Distribution {
    /// Total shipment value: `unit_price * qty`.
    #[inline]
    pub fn value(&self) -> Money {
        Money::from_minor(self.unit_price).multiply_quantity(self.qty)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// How a sale was paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash ("tunai").
    Cash,
    /// Bank transfer.
    Transfer,
}

/// A completed sale. Immutable once created: there is no edit or cancel
/// operation.
///
/// A *direct* sale draws from warehouse stock. A partner sale draws from the
/// partner's consigned inventory and reduces their debt by `total`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,
    pub product_id: String,
    /// Source partner; None for direct warehouse sales.
    pub partner_id: Option<String>,
    /// Product name at sale time (frozen).
    pub product_name: String,
    /// Partner name at sale time (frozen); None for direct sales.
    pub partner_name: Option<String>,
    pub buyer_name: String,
    /// Units sold, always > 0.
    pub qty: i64,
    /// Agreed unit price in minor units (may differ from the catalog price).
    pub unit_price: i64,
    /// Always computed as `unit_price * qty`; never trusted from a client.
    pub total: i64,
    pub payment_method: PaymentMethod,
    /// True when fulfilled from warehouse stock.
    pub is_direct: bool,
    pub date: DateTime<Utc>,
}

impl Sale {
    /// Returns the sale total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_minor(self.total)
    }
}

// =============================================================================
// Return
// =============================================================================

/// Goods flowing back from a partner to the warehouse.
///
/// Always reduces partner inventory, restores warehouse stock, and credits
/// the partner's debt by `credit` (priced per the configured return policy).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Return {
    pub id: String,
    pub partner_id: String,
    pub product_id: String,
    /// Partner name at return time (frozen).
    pub partner_name: String,
    /// Product name at return time (frozen).
    pub product_name: String,
    /// Units returned, always > 0.
    pub qty: i64,
    pub reason: String,
    /// Value credited against partner debt, in minor units.
    pub credit: i64,
    pub date: DateTime<Utc>,
}

// =============================================================================
// Payment
// =============================================================================

/// A cash payment by a partner against their receivable.
///
/// Strictly increases `total_paid`; never touches `debt` directly. There is
/// deliberately no upper bound against the outstanding receivable:
/// overpayment produces a partner credit balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Payment {
    pub id: String,
    pub partner_id: String,
    /// Partner name at payment time (frozen).
    pub partner_name: String,
    /// Amount paid in minor units, always > 0.
    pub amount: i64,
    pub date: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn partner() -> Partner {
        Partner {
            id: "m1".to_string(),
            name: "Toko Berkah Utama".to_string(),
            owner: "Budi Santoso".to_string(),
            address: "Jl. Melati No. 5".to_string(),
            phone: "08123456789".to_string(),
            debt: 500_000,
            total_paid: 200_000,
            credit_limit: 0,
            inventory: HashMap::from([("p1".to_string(), 12)]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            version: 0,
        }
    }

    #[test]
    fn test_receivable() {
        let p = partner();
        assert_eq!(p.receivable().minor(), 300_000);
    }

    #[test]
    fn test_receivable_can_be_credit() {
        let mut p = partner();
        p.total_paid = 600_000;
        assert!(p.receivable().is_negative());
    }

    #[test]
    fn test_held_defaults_to_zero() {
        let p = partner();
        assert_eq!(p.held("p1"), 12);
        assert_eq!(p.held("missing"), 0);
    }

    #[test]
    fn test_effective_price() {
        let product = Product {
            id: "p1".to_string(),
            name: "Kopi Arabika 250g".to_string(),
            category: "Minuman".to_string(),
            price: 45_000,
            stock: 150,
            discount_percent: 10,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            version: 0,
        };
        assert_eq!(product.effective_price().minor(), 40_500);
    }

    #[test]
    fn test_distribution_value() {
        let dist = Distribution {
            id: "d1".to_string(),
            partner_id: "m1".to_string(),
            product_id: "p1".to_string(),
            partner_name: "Toko Berkah Utama".to_string(),
            product_name: "Kopi Arabika 250g".to_string(),
            qty: 5,
            unit_price: 45_000,
            date: Utc::now(),
            req_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            status: DistributionStatus::InTransit,
            delivered_at: None,
        };
        assert_eq!(dist.value().minor(), 225_000);
    }
}
