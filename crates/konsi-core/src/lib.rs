//! # konsi-core: Pure Business Logic for Konsi
//!
//! This crate is the **heart** of the Konsi consignment tracker. It contains
//! the ledger and inventory-consistency engine as pure functions with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Konsi Architecture                            │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐    │
//! │  │                  Application / UI layer                     │    │
//! │  │       (out of scope: forms, tables, print templates)        │    │
//! │  └─────────────────────────────┬───────────────────────────────┘    │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐    │
//! │  │                ★ konsi-core (THIS CRATE) ★                  │    │
//! │  │                                                             │    │
//! │  │  ┌─────────┐ ┌────────┐ ┌──────────┐ ┌────────────────┐     │    │
//! │  │  │  types  │ │ money  │ │  ledger  │ │   validation   │     │    │
//! │  │  │ Product │ │ Money  │ │ planning │ │     rules      │     │    │
//! │  │  │ Partner │ │ (i64)  │ │  (pure)  │ │    checks      │     │    │
//! │  │  └─────────┘ └────────┘ └──────────┘ └────────────────┘     │    │
//! │  │  ┌──────────┐ ┌──────────┐                                  │    │
//! │  │  │  notify  │ │ settings │                                  │    │
//! │  │  └──────────┘ └──────────┘                                  │    │
//! │  │                                                             │    │
//! │  │  NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS         │    │
//! │  └─────────────────────────────┬───────────────────────────────┘    │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐    │
//! │  │                konsi-db (Entity Store Layer)                │    │
//! │  │     SQLite queries, migrations, transactional ledger ops    │    │
//! │  └─────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entity types (Product, Partner, Distribution, Sale, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Pure business-rule predicates
//! - [`ledger`] - The five ledger operations as pure planning functions
//! - [`notify`] - Read-only alert derivation from ledger snapshots
//! - [`settings`] - Injected thresholds and policy choices
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: every plan is deterministic in its inputs
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are minor units (i64)
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//! 5. **Single Snapshot**: each operation validates and computes its writes
//!    from one snapshot; stale-read/fresh-write mismatches cannot happen
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{NaiveDate, Utc};
//! use konsi_core::ledger::plan_shipment;
//! # use std::collections::HashMap;
//! # let product = konsi_core::Product {
//! #     id: "p1".into(), name: "Kopi".into(), category: "Minuman".into(),
//! #     price: 45_000, stock: 15, discount_percent: 0,
//! #     created_at: Utc::now(), updated_at: Utc::now(), version: 0,
//! # };
//! # let partner = konsi_core::Partner {
//! #     id: "m1".into(), name: "Toko".into(), owner: "Budi".into(),
//! #     address: "Jl.".into(), phone: "0812".into(), debt: 0, total_paid: 0,
//! #     credit_limit: 0, inventory: HashMap::new(),
//! #     created_at: Utc::now(), updated_at: Utc::now(), version: 0,
//! # };
//!
//! let req_date = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
//! let plan = plan_shipment(&product, &partner, 10, req_date, Utc::now())?;
//!
//! // Stock moved and debt accrued from the same snapshot
//! assert_eq!(plan.product.stock, 5);
//! assert_eq!(plan.partner.debt, 450_000);
//! # Ok::<(), konsi_core::LedgerError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod money;
pub mod notify;
pub mod settings;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use konsi_core::Money` instead of
// `use konsi_core::money::Money`

pub use error::{LedgerError, LedgerResult, ValidationError};
pub use money::Money;
pub use notify::{derive_notifications, LedgerSnapshot, Notification, NotificationKind, Severity};
pub use settings::{ReturnPricing, Settings};
pub use types::*;
