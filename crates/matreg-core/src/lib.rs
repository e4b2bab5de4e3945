//! # matreg-core: Pure Domain Rules for the Material Registry
//!
//! This crate holds every rule about materials and suppliers that can be
//! decided without looking at stored state. The registries in `matreg-db`
//! call into it before they touch the database.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Material Registry Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  apps/api (axum JSON gateway)                   │   │
//! │  │    /api/materials, /api/suppliers, envelope, error mapping      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ drafts / patches                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ matreg-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │ validation│  │   │
//! │  │   │ Material  │  │   Money   │  │ PriceCat. │  │   rules   │  │   │
//! │  │   │ Supplier  │  │           │  │           │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  matreg-db (Registries on SQLite)               │   │
//! │  │         uniqueness, references, delete guard, persistence       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records (Material, Supplier) plus drafts and patches
//! - [`money`] - Money type with integer cents
//! - [`pricing`] - Buy-price categorization
//! - [`error`] - Domain error types
//! - [`validation`] - Field-level validation helpers
//!
//! ## Example Usage
//!
//! ```rust
//! use matreg_core::money::Money;
//! use matreg_core::pricing::{categorize, PriceCategory};
//!
//! let price: Money = "150.00".parse().unwrap();
//! assert_eq!(categorize(price), PriceCategory::Budget);
//! assert_eq!(categorize(price).label(), "Budget (100-499)");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use pricing::{categorize, PriceCategory};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Lowest buy price a material may carry, in cents (100.00).
pub const MIN_BUY_PRICE_CENTS: i64 = 10_000;

/// Page size used when a list call does not specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Upper bound for a single page.
///
/// Keeps a stray `limit=999999999` from pulling the whole table into memory.
pub const MAX_PAGE_SIZE: u32 = 1_000;
