//! # konsi-db: Entity Store for Konsi
//!
//! This crate persists the consignment ledger in SQLite and applies the
//! pure plans from `konsi-core` transactionally.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Konsi Data Flow                                  │
//! │                                                                         │
//! │  Application call (ship_to_partner, record_sale, ...)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     konsi-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌────────────────┐   ┌──────────────┐   │   │
//! │  │   │   Database    │   │  Repositories  │   │    Ledger    │   │   │
//! │  │   │   (pool.rs)   │   │ product/partner│   │ (ledger.rs)  │   │   │
//! │  │   │               │   │ /records       │   │              │   │   │
//! │  │   │ SqlitePool    │◄──│ CRUD + search  │   │ plan → apply │   │   │
//! │  │   │ + migrations  │   │                │   │ in one tx    │   │   │
//! │  │   └───────────────┘   └────────────────┘   └──────┬───────┘   │   │
//! │  │                                                   │           │   │
//! │  │                          konsi-core::ledger ◄─────┘           │   │
//! │  │                          (pure planning, no I/O)              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database (WAL mode)                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Store error types
//! - [`repository`] - Product/partner CRUD and record listings
//! - [`ledger`] - The five ledger operations, one transaction each
//!
//! ## Usage
//!
//! ```rust,ignore
//! use konsi_core::Settings;
//! use konsi_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/konsi.db")).await?;
//!
//! let ledger = db.ledger(Settings::default());
//! let dist = ledger.ship_to_partner(&product_id, &partner_id, 10, req_date).await?;
//! ledger.confirm_delivery(&dist.id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use ledger::{Ledger, NewSale};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::partner::PartnerRepository;
pub use repository::product::ProductRepository;
pub use repository::records::RecordsRepository;
