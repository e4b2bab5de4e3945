//! # Registry Module
//!
//! The two registries that own the stored records.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Write, One Transaction                           │
//! │                                                                         │
//! │  db.materials().create(draft)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  draft.validate()          ← matreg-core, no I/O                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │  ├── code taken?           ← stored-state checks                       │
//! │  ├── supplier exists?                                                  │
//! │  ├── INSERT                ← UNIQUE / FK constraints as backstop       │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any failure before COMMIT drops the transaction: nothing is written.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Registries
//!
//! - [`SupplierRegistry`](supplier::SupplierRegistry) - Supplier CRUD, dropdown, delete guard
//! - [`MaterialRegistry`](material::MaterialRegistry) - Material CRUD, type filter, autocomplete

pub mod material;
pub mod supplier;

use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::warn;
use uuid::Uuid;

use crate::error::{DbError, DbResult};

/// Generates a new record ID (UUID v4).
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Opens a write transaction holding SQLite's write lock from the start.
///
/// Concurrent writers queue on the busy timeout instead of failing when
/// their read snapshot goes stale, so the checks they ran still hold when
/// they write.
pub(crate) async fn begin_write(pool: &SqlitePool) -> DbResult<Transaction<'static, Sqlite>> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}

/// Maps a failed single-record read to NotFound when the stored row could
/// not be decoded. Other failures keep their usual mapping.
pub(crate) fn unreadable_as_not_found(err: sqlx::Error, entity: &str, id: &str) -> DbError {
    match err {
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            warn!(entity, id, error = %err, "Stored row could not be decoded");
            DbError::not_found(entity, id)
        }
        other => other.into(),
    }
}

/// Lowercases text for the `*_folded` search columns.
///
/// SQLite's `LIKE` and `lower()` only fold ASCII, so searches compare
/// values folded here on both sides.
pub(crate) fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Builds a `LIKE ... ESCAPE '\'` pattern matching the case-folded `term`
/// anywhere in a `*_folded` column.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in fold_case(term).chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
