//! # Settings
//!
//! Thresholds and policy choices injected into the ledger and notification
//! layers. The core never hardcodes these at call sites; callers pass a
//! `Settings` value (the store/app layer decides where it comes from).

use serde::{Deserialize, Serialize};

/// Default low-stock alert threshold (units).
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 20;

/// Default high-receivable alert threshold (minor currency units).
pub const DEFAULT_DEBT_LIMIT: i64 = 5_000_000;

/// Default age in days after which an in-transit shipment is flagged.
pub const DEFAULT_PENDING_SHIPMENT_DAYS: i64 = 3;

/// How a return is priced when crediting the partner's debt.
///
/// The legacy behavior credits at the product's *current* price, which
/// drifts from the value accrued at shipment if the price changed in
/// between. Kept as the default; `ShipmentPrice` credits at the unit price
/// frozen on the most recent shipment of that product to that partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnPricing {
    /// Credit at the product's current catalog price.
    CurrentPrice,
    /// Credit at the unit price snapshotted on the latest shipment to the
    /// partner (falls back to current price if none exists).
    ShipmentPrice,
}

/// Injected configuration for the ledger and notification deriver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Products with `0 < stock < low_stock_threshold` raise a low-stock
    /// alert.
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,

    /// Partners with a receivable at or above this raise a high-debt alert.
    /// Minor currency units.
    #[serde(default = "default_debt_limit")]
    pub debt_limit: i64,

    /// In-transit distributions older than this many days raise an alert.
    #[serde(default = "default_pending_shipment_days")]
    pub pending_shipment_days: i64,

    /// Return crediting policy.
    #[serde(default = "default_return_pricing")]
    pub return_pricing: ReturnPricing,
}

fn default_low_stock_threshold() -> i64 {
    DEFAULT_LOW_STOCK_THRESHOLD
}

fn default_debt_limit() -> i64 {
    DEFAULT_DEBT_LIMIT
}

fn default_pending_shipment_days() -> i64 {
    DEFAULT_PENDING_SHIPMENT_DAYS
}

fn default_return_pricing() -> ReturnPricing {
    ReturnPricing::CurrentPrice
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            debt_limit: DEFAULT_DEBT_LIMIT,
            pending_shipment_days: DEFAULT_PENDING_SHIPMENT_DAYS,
            return_pricing: ReturnPricing::CurrentPrice,
        }
    }
}

impl Settings {
    /// Parses settings from a JSON document, filling absent fields with
    /// defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes settings to a pretty-printed JSON document.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
