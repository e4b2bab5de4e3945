//! # Supplier Registry
//!
//! Database operations for suppliers.
//!
//! ## Rules Enforced Here
//! - Supplier names are unique (checked in the write transaction, UNIQUE
//!   constraint behind it)
//! - A supplier referenced by any material cannot be deleted
//! - Renaming a supplier rewrites `supplier_name` on its materials in the
//!   same transaction
//!
//! ## Delete Guard
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DELETE supplier "Acme"                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │  SELECT ..., (SELECT COUNT(*) FROM materials ...) AS material_count     │
//! │       │                                                                 │
//! │       ├── material_count > 0 → ROLLBACK, "Cannot delete supplier ..."  │
//! │       │                                                                 │
//! │       └── 0 → DELETE, COMMIT                                           │
//! │                                                                         │
//! │  ON DELETE RESTRICT catches a material inserted by a racing writer.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use matreg_core::validation::{ensure_supplier_deletable, validate_search_query};
use matreg_core::{
    DeletedSupplier, NameSearchHit, Page, Paged, Supplier, SupplierDetail, SupplierDraft,
    SupplierMaterial, SupplierOption, SupplierPatch, ValidationError,
};

use super::{begin_write, contains_pattern, fold_case, generate_id, unreadable_as_not_found};
use crate::error::{DbError, DbResult};

const SELECT_SUPPLIER: &str = r#"
    SELECT
        s.id,
        s.name,
        s.email,
        s.phone,
        s.address,
        (SELECT COUNT(*) FROM materials m WHERE m.supplier_id = s.id) AS material_count,
        s.created_at,
        s.updated_at
    FROM suppliers s
"#;

const SEARCH_FILTER: &str = r#"
    WHERE ?1 IS NULL
       OR s.name_folded LIKE ?1 ESCAPE '\'
       OR s.email_folded LIKE ?1 ESCAPE '\'
"#;

/// Stored supplier row, before the completeness check.
#[derive(Debug, sqlx::FromRow)]
struct SupplierRow {
    id: String,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    material_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SupplierRow {
    /// Returns `None` for a row with a blank name.
    fn into_supplier(self) -> Option<Supplier> {
        if self.name.trim().is_empty() {
            warn!(id = %self.id, "Supplier row has a blank name");
            return None;
        }

        Some(Supplier {
            id: self.id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            material_count: self.material_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Registry for supplier records.
///
/// ## Usage
/// ```rust,ignore
/// let registry = SupplierRegistry::new(pool);
///
/// let acme = registry
///     .create(SupplierDraft { name: Some("Acme".into()), ..Default::default() })
///     .await?;
///
/// let detail = registry.get(&acme.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct SupplierRegistry {
    pool: SqlitePool,
}

impl SupplierRegistry {
    /// Creates a new SupplierRegistry.
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRegistry { pool }
    }

    /// Creates a supplier.
    ///
    /// ## Returns
    /// * `Ok(Supplier)` - New supplier with `material_count = 0`
    /// * `Err(DbError::Domain)` - Blank name, duplicate name or bad email
    pub async fn create(&self, draft: SupplierDraft) -> DbResult<Supplier> {
        let new = draft.validate()?;

        let mut tx = begin_write(&self.pool).await?;

        if name_taken(&mut tx, &new.name, None).await? {
            return Err(ValidationError::duplicate("Supplier", "name", &new.name).into());
        }

        let now = Utc::now();
        let supplier = Supplier {
            id: generate_id(),
            name: new.name,
            email: new.email,
            phone: new.phone,
            address: new.address,
            material_count: 0,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO suppliers (
                id, name, email, phone, address,
                name_folded, email_folded,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&supplier.id)
        .bind(&supplier.name)
        .bind(&supplier.email)
        .bind(&supplier.phone)
        .bind(&supplier.address)
        .bind(fold_case(&supplier.name))
        .bind(fold_case(supplier.email.as_deref().unwrap_or_default()))
        .bind(supplier.created_at)
        .bind(supplier.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| DbError::from(e).with_duplicate_value(&supplier.name))?;

        tx.commit().await?;

        info!(id = %supplier.id, name = %supplier.name, "Supplier created");
        Ok(supplier)
    }

    /// Applies a partial update.
    ///
    /// A missing supplier is reported before the fields are validated. Only
    /// supplied fields change. A rename is checked against every other
    /// supplier and is copied onto the supplier's materials.
    pub async fn update(&self, id: &str, patch: SupplierPatch) -> DbResult<Supplier> {
        let mut tx = begin_write(&self.pool).await?;

        let mut supplier = fetch_supplier(&mut tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Supplier", id))?;

        let changes = patch.validate()?;

        if changes.is_empty() {
            return Ok(supplier);
        }

        let renamed_to = changes.renamed_from(&supplier.name).map(str::to_string);
        if let Some(new_name) = &renamed_to {
            if name_taken(&mut tx, new_name, Some(id)).await? {
                return Err(ValidationError::duplicate("Supplier", "name", new_name).into());
            }
        }

        changes.apply_to(&mut supplier);
        supplier.updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE suppliers SET
                name = ?2,
                email = ?3,
                phone = ?4,
                address = ?5,
                name_folded = ?6,
                email_folded = ?7,
                updated_at = ?8
            WHERE id = ?1
            "#,
        )
        .bind(&supplier.id)
        .bind(&supplier.name)
        .bind(&supplier.email)
        .bind(&supplier.phone)
        .bind(&supplier.address)
        .bind(fold_case(&supplier.name))
        .bind(fold_case(supplier.email.as_deref().unwrap_or_default()))
        .bind(supplier.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| DbError::from(e).with_duplicate_value(&supplier.name))?;

        if let Some(new_name) = &renamed_to {
            let synced = sqlx::query("UPDATE materials SET supplier_name = ?2 WHERE supplier_id = ?1")
                .bind(&supplier.id)
                .bind(new_name)
                .execute(&mut *tx)
                .await?;
            debug!(
                id = %supplier.id,
                materials = synced.rows_affected(),
                "Resynced supplier name on materials"
            );
        }

        tx.commit().await?;

        info!(id = %supplier.id, "Supplier updated");
        Ok(supplier)
    }

    /// Deletes a supplier no material references.
    ///
    /// ## Returns
    /// * `Ok(DeletedSupplier)` - What was deleted
    /// * `Err(DbError::NotFound)` - No such supplier
    /// * `Err(DbError::Domain)` - Supplier still in use; nothing deleted
    pub async fn delete(&self, id: &str) -> DbResult<DeletedSupplier> {
        let mut tx = begin_write(&self.pool).await?;

        let supplier = fetch_supplier(&mut tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Supplier", id))?;

        ensure_supplier_deletable(&supplier.name, supplier.material_count)?;

        sqlx::query("DELETE FROM suppliers WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(id = %supplier.id, name = %supplier.name, "Supplier deleted");
        Ok(DeletedSupplier {
            id: supplier.id,
            name: supplier.name,
            material_count: supplier.material_count,
        })
    }

    /// Gets a supplier with the materials referencing it (ordered by code).
    ///
    /// The whole record counts as missing when any part of it cannot be read
    /// back, including a listed material with a blank code or name.
    pub async fn get(&self, id: &str) -> DbResult<SupplierDetail> {
        let mut conn = self.pool.acquire().await?;

        let supplier = fetch_supplier(&mut conn, id)
            .await?
            .ok_or_else(|| DbError::not_found("Supplier", id))?;

        let materials = sqlx::query_as::<_, SupplierMaterial>(
            r#"
            SELECT id, code, name, material_type, buy_price_cents
            FROM materials
            WHERE supplier_id = ?1
            ORDER BY code, id
            "#,
        )
        .bind(id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| unreadable_as_not_found(e, "Supplier", id))?;

        if let Some(broken) = materials
            .iter()
            .find(|m| m.code.trim().is_empty() || m.name.trim().is_empty())
        {
            warn!(id, material = %broken.id, "Supplier lists an incomplete material");
            return Err(DbError::not_found("Supplier", id));
        }

        Ok(SupplierDetail {
            supplier,
            materials,
        })
    }

    /// Lists suppliers ordered by name.
    ///
    /// A non-blank `search` keeps suppliers whose name or email contains it,
    /// ignoring case. `total_count` counts all matches.
    pub async fn list(&self, search: Option<&str>, page: Page) -> DbResult<Paged<Supplier>> {
        let search = validate_search_query(search)?;
        let pattern = search.as_deref().map(contains_pattern);

        debug!(search = ?search, limit = page.limit, offset = page.offset, "Listing suppliers");

        let total_count: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM suppliers s {SEARCH_FILTER}"))
                .bind(&pattern)
                .fetch_one(&self.pool)
                .await?;

        let rows = sqlx::query_as::<_, SupplierRow>(&format!(
            "{SELECT_SUPPLIER} {SEARCH_FILTER} ORDER BY s.name, s.id LIMIT ?2 OFFSET ?3"
        ))
        .bind(&pattern)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(Paged {
            items: rows.into_iter().filter_map(SupplierRow::into_supplier).collect(),
            total_count,
            page,
        })
    }

    /// Every supplier as `(id, name, material_count)`, ordered by name.
    pub async fn dropdown(&self) -> DbResult<Vec<SupplierOption>> {
        let options = sqlx::query_as::<_, SupplierOption>(
            r#"
            SELECT
                s.id,
                s.name,
                (SELECT COUNT(*) FROM materials m WHERE m.supplier_id = s.id) AS material_count
            FROM suppliers s
            ORDER BY s.name, s.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(options)
    }

    /// Autocomplete over name and email. A blank term lists the first
    /// `limit` suppliers by name.
    pub async fn name_search(&self, term: &str, limit: u32) -> DbResult<Vec<NameSearchHit>> {
        let term = validate_search_query(Some(term))?;
        let pattern = term.as_deref().map(contains_pattern);

        let hits: Vec<(String, String)> = sqlx::query_as(&format!(
            "SELECT s.id, s.name FROM suppliers s {SEARCH_FILTER} ORDER BY s.name, s.id LIMIT ?2"
        ))
        .bind(&pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(hits
            .into_iter()
            .map(|(id, display_name)| NameSearchHit { id, display_name })
            .collect())
    }

    /// Counts suppliers (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM suppliers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Transaction-scoped helpers
// =============================================================================

async fn fetch_supplier(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Supplier>> {
    let row = sqlx::query_as::<_, SupplierRow>(&format!("{SELECT_SUPPLIER} WHERE s.id = ?1"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| unreadable_as_not_found(e, "Supplier", id))?;

    Ok(row.and_then(SupplierRow::into_supplier))
}

async fn name_taken(
    conn: &mut SqliteConnection,
    name: &str,
    exclude_id: Option<&str>,
) -> DbResult<bool> {
    let taken: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM suppliers WHERE name = ?1 AND (?2 IS NULL OR id <> ?2))",
    )
    .bind(name)
    .bind(exclude_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(taken)
}

// =============================================================================
// Unit Tests
// =============================================================================
