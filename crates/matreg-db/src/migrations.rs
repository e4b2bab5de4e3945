//! # Database Migrations
//!
//! Embedded SQL migrations for the material registry.
//!
//! ## How Migrations Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Migration Process                                  │
//! │                                                                         │
//! │  Database::new()                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Check _sqlx_migrations table (create if missing)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Compare embedded migrations vs applied                                │
//! │       │                                                                 │
//! │       ├── 001_initial_schema.sql  suppliers, materials, indexes        │
//! │       └── 002_search_folding.sql  *_folded search columns              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Run pending migrations in order, record each in _sqlx_migrations      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Backfill *_folded on rows still holding ''                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Adding New Migrations
//!
//! 1. Create a new file in `migrations/sqlite/` with the next sequence number
//! 2. Name format: `NNN_description.sql`
//! 3. **NEVER** modify existing migrations - always add new ones

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;
use crate::repository::{begin_write, fold_case};

/// Embedded migrations from the workspace `migrations/sqlite` directory.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Runs all pending database migrations.
///
/// Idempotent: already-applied migrations are skipped by checksum.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("Checking for pending migrations");

    MIGRATOR.run(pool).await?;
    backfill_folded_columns(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}

/// Fills the case-folded search columns of rows written before they existed.
///
/// Folding happens here rather than in SQL because SQLite's `lower()` leaves
/// non-ASCII letters alone. Returns the number of rows touched.
pub async fn backfill_folded_columns(pool: &SqlitePool) -> DbResult<usize> {
    let mut tx = begin_write(pool).await?;

    let suppliers: Vec<(String, String, Option<String>)> =
        sqlx::query_as("SELECT id, name, email FROM suppliers WHERE name_folded = ''")
            .fetch_all(&mut *tx)
            .await?;
    for (id, name, email) in &suppliers {
        sqlx::query("UPDATE suppliers SET name_folded = ?2, email_folded = ?3 WHERE id = ?1")
            .bind(id)
            .bind(fold_case(name))
            .bind(fold_case(email.as_deref().unwrap_or_default()))
            .execute(&mut *tx)
            .await?;
    }

    let materials: Vec<(String, String, String)> =
        sqlx::query_as("SELECT id, code, name FROM materials WHERE code_folded = ''")
            .fetch_all(&mut *tx)
            .await?;
    for (id, code, name) in &materials {
        sqlx::query("UPDATE materials SET code_folded = ?2, name_folded = ?3 WHERE id = ?1")
            .bind(id)
            .bind(fold_case(code))
            .bind(fold_case(name))
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    let touched = suppliers.len() + materials.len();
    if touched > 0 {
        info!(suppliers = suppliers.len(), materials = materials.len(), "Backfilled search columns");
    }
    Ok(touched)
}

/// Returns `(known_migrations, applied_migrations)`.
///
/// ## Usage
/// For diagnostics and health checks. A failed count is an error, never a
/// zero.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let known = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await?;

    Ok((known, applied as usize))
}
