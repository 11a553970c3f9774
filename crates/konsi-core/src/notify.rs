//! # Notification Deriver
//!
//! A pure function over ledger snapshots producing a read-only list of
//! alerts. Never written back to the store; the caller derives a fresh list
//! whenever its snapshot changes.
//!
//! Alert sources:
//! - out-of-stock and low-stock products
//! - shipments in transit longer than the configured number of days
//!   (measured from the ship `date`, not the requested delivery date)
//! - partners whose receivable reaches the debt limit
//! - partners exceeding their own credit limit (when one is set)

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::settings::Settings;
use crate::types::{Distribution, DistributionStatus, Partner, Product};

// =============================================================================
// Notification Types
// =============================================================================

/// What triggered an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    OutOfStock,
    LowStock,
    PendingDistribution,
    HighDebt,
    CreditLimitExceeded,
}

/// Display urgency for an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Danger,
}

/// A derived, read-only alert.
///
/// `id` is deterministic per source entity so re-derivation over the same
/// snapshot yields the same ids (the presentation layer can dedupe).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Read-only view of the ledger state the deriver consumes.
#[derive(Debug, Clone, Copy)]
pub struct LedgerSnapshot<'a> {
    pub products: &'a [Product],
    pub partners: &'a [Partner],
    pub distributions: &'a [Distribution],
}

// =============================================================================
// Deriver
// =============================================================================

/// Derives all alerts from a snapshot, sorted newest-derived-first.
///
/// Thresholds come from [`Settings`]; nothing is hardcoded here.
pub fn derive_notifications(
    snapshot: &LedgerSnapshot<'_>,
    settings: &Settings,
    now: DateTime<Utc>,
) -> Vec<Notification> {
    let mut alerts = Vec::new();

    check_out_of_stock(snapshot.products, now, &mut alerts);
    check_low_stock(snapshot.products, settings.low_stock_threshold, now, &mut alerts);
    check_pending_distributions(
        snapshot.distributions,
        settings.pending_shipment_days,
        now,
        &mut alerts,
    );
    check_high_debt(snapshot.partners, settings.debt_limit, now, &mut alerts);
    check_credit_limits(snapshot.partners, now, &mut alerts);

    // Stable sort: newest first, source order preserved for equal timestamps
    alerts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    alerts
}

fn check_out_of_stock(products: &[Product], now: DateTime<Utc>, out: &mut Vec<Notification>) {
    for product in products.iter().filter(|p| p.stock == 0) {
        out.push(Notification {
            id: format!("out-of-stock-{}", product.id),
            kind: NotificationKind::OutOfStock,
            severity: Severity::Danger,
            title: "Out of stock".to_string(),
            message: format!("{} is out of stock", product.name),
            timestamp: now,
        });
    }
}

fn check_low_stock(
    products: &[Product],
    threshold: i64,
    now: DateTime<Utc>,
    out: &mut Vec<Notification>,
) {
    for product in products
        .iter()
        .filter(|p| p.stock > 0 && p.stock < threshold)
    {
        out.push(Notification {
            id: format!("low-stock-{}", product.id),
            kind: NotificationKind::LowStock,
            severity: Severity::Warning,
            title: "Low stock".to_string(),
            message: format!("{} down to {} units", product.name, product.stock),
            timestamp: now,
        });
    }
}

fn check_pending_distributions(
    distributions: &[Distribution],
    max_days: i64,
    now: DateTime<Utc>,
    out: &mut Vec<Notification>,
) {
    let cutoff = Duration::days(max_days);
    for dist in distributions
        .iter()
        .filter(|d| d.status == DistributionStatus::InTransit)
        // Age from the ship date, not the requested delivery date
        .filter(|d| now.signed_duration_since(d.date) > cutoff)
    {
        out.push(Notification {
            id: format!("pending-dist-{}", dist.id),
            kind: NotificationKind::PendingDistribution,
            severity: Severity::Warning,
            title: "Shipment overdue".to_string(),
            message: format!(
                "{} to {} has been in transit for more than {} days",
                dist.product_name, dist.partner_name, max_days
            ),
            timestamp: now,
        });
    }
}

fn check_high_debt(
    partners: &[Partner],
    debt_limit: i64,
    now: DateTime<Utc>,
    out: &mut Vec<Notification>,
) {
    for partner in partners
        .iter()
        .filter(|p| p.receivable() >= Money::from_minor(debt_limit))
    {
        out.push(Notification {
            id: format!("high-debt-{}", partner.id),
            kind: NotificationKind::HighDebt,
            severity: Severity::Info,
            title: "High receivable".to_string(),
            message: format!("{} owes {}", partner.name, partner.receivable()),
            timestamp: now,
        });
    }
}

fn check_credit_limits(partners: &[Partner], now: DateTime<Utc>, out: &mut Vec<Notification>) {
    for partner in partners
        .iter()
        .filter(|p| p.credit_limit > 0 && p.receivable() > Money::from_minor(p.credit_limit))
    {
        out.push(Notification {
            id: format!("credit-limit-{}", partner.id),
            kind: NotificationKind::CreditLimitExceeded,
            severity: Severity::Danger,
            title: "Credit limit exceeded".to_string(),
            message: format!(
                "{} exceeds their credit limit of {}",
                partner.name,
                Money::from_minor(partner.credit_limit)
            ),
            timestamp: now,
        });
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
