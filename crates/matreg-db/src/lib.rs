//! # matreg-db: Persistence Layer for the Material Registry
//!
//! This crate stores suppliers and materials in SQLite and enforces every
//! rule that needs stored state: uniqueness, supplier resolution, the
//! supplier delete guard and derived-field upkeep.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Material Registry Data Flow                        │
//! │                                                                         │
//! │  HTTP handler (POST /api/materials)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     matreg-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌──────────────────┐   ┌─────────────┐  │   │
//! │  │   │   Database    │    │    Registries    │   │ Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  (repository/)   │   │ (embedded)  │  │   │
//! │  │   │               │    │                  │   │             │  │   │
//! │  │   │ SqlitePool    │◄───│ SupplierRegistry │   │ 001_initial │  │   │
//! │  │   │ WAL, FKs on   │    │ MaterialRegistry │   │ _schema.sql │  │   │
//! │  │   └───────────────┘    └──────────────────┘   └─────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ./matreg.db (MATREG_DATABASE_PATH)                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Supplier and material registries
//!
//! ## Usage
//!
//! ```rust,ignore
//! use matreg_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./matreg.db")).await?;
//!
//! let options = db.suppliers().dropdown().await?;
//! let material = db.materials().get(&id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Registry re-exports for convenience
pub use repository::material::MaterialRegistry;
pub use repository::supplier::SupplierRegistry;
