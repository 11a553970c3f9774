//! # Repository Implementations
//!
//! One repository per aggregate plus a read-only records repository.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Repository Organization                             │
//! │                                                                         │
//! │  ProductRepository   ← catalog CRUD + search (admin surface)           │
//! │  PartnerRepository   ← partner CRUD + consigned inventory loading      │
//! │  RecordsRepository   ← read-only history (distributions, sales, ...)   │
//! │                                                                         │
//! │  NOT here: the five ledger operations. Those live in `crate::ledger`   │
//! │  because they span aggregates and must commit atomically.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories hold a pool clone and are cheap to construct per call.

pub mod partner;
pub mod product;
pub mod records;
