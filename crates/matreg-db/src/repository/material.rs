//! # Material Registry
//!
//! Database operations for materials.
//!
//! ## Create Checks, In Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  MaterialDraft                                                          │
//! │       │                                                                 │
//! │       ▼  matreg-core (no I/O)                                           │
//! │  1. required: material_code, material_name, material_type,             │
//! │               material_buy_price, supplier_id                           │
//! │  2. material_type ∈ {fabric, jeans, cotton}                             │
//! │  3. material_buy_price ≥ 100.00                                         │
//! │       │                                                                 │
//! │       ▼  this module, inside BEGIN ... COMMIT                           │
//! │  4. material_code not taken                                             │
//! │  5. supplier_id resolves → supplier_name                                │
//! │  6. price_category = categorize(price)                                  │
//! │  7. INSERT                                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The first failing check is reported and nothing is written.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use matreg_core::validation::validate_search_query;
use matreg_core::{
    categorize, display_name, DeletedMaterial, Material, MaterialDraft, MaterialPatch,
    MaterialType, NameSearchHit, Page, Paged, PriceCategory, ValidationError,
};

use super::{begin_write, contains_pattern, fold_case, generate_id, unreadable_as_not_found};
use crate::error::{DbError, DbResult};

const SELECT_MATERIAL: &str = r#"
    SELECT
        id,
        code,
        name,
        material_type,
        buy_price_cents,
        supplier_id,
        supplier_name,
        price_category,
        created_at,
        updated_at
    FROM materials
"#;

/// Stored material row, before the completeness check.
#[derive(Debug, sqlx::FromRow)]
struct MaterialRow {
    id: String,
    code: String,
    name: String,
    material_type: MaterialType,
    buy_price_cents: i64,
    supplier_id: String,
    supplier_name: Option<String>,
    price_category: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MaterialRow {
    /// Returns `None` for a row missing its code, name or derived columns.
    fn into_material(self) -> Option<Material> {
        let supplier_name = self.supplier_name.filter(|n| !n.trim().is_empty());
        let price_category = self
            .price_category
            .as_deref()
            .and_then(PriceCategory::from_label);

        match (supplier_name, price_category) {
            (Some(supplier_name), Some(price_category))
                if !self.code.trim().is_empty() && !self.name.trim().is_empty() =>
            {
                Some(Material {
                    id: self.id,
                    code: self.code,
                    name: self.name,
                    material_type: self.material_type,
                    buy_price_cents: self.buy_price_cents,
                    supplier_id: self.supplier_id,
                    supplier_name,
                    price_category,
                    created_at: self.created_at,
                    updated_at: self.updated_at,
                })
            }
            _ => {
                warn!(id = %self.id, "Material row is incomplete");
                None
            }
        }
    }
}

/// Registry for material records.
///
/// ## Usage
/// ```rust,ignore
/// let registry = MaterialRegistry::new(pool);
///
/// let material = registry.create(draft).await?;
/// assert_eq!(material.display_name(), "[M1] Cotton Roll");
///
/// let cotton = registry.list(Some("cotton"), Page { limit: 20, offset: 0 }).await?;
/// ```
#[derive(Debug, Clone)]
pub struct MaterialRegistry {
    pool: SqlitePool,
}

impl MaterialRegistry {
    /// Creates a new MaterialRegistry.
    pub fn new(pool: SqlitePool) -> Self {
        MaterialRegistry { pool }
    }

    /// Creates a material. All-or-nothing.
    ///
    /// ## Returns
    /// * `Ok(Material)` - Stored material with both derived fields set
    /// * `Err(DbError::Domain)` - First failing check (see module docs)
    pub async fn create(&self, draft: MaterialDraft) -> DbResult<Material> {
        let new = draft.validate()?;

        let mut tx = begin_write(&self.pool).await?;

        if code_taken(&mut tx, &new.code, None).await? {
            return Err(ValidationError::duplicate("Material", "code", &new.code).into());
        }

        let supplier_name = resolve_supplier(&mut tx, &new.supplier_id).await?;
        let material = new.into_material(generate_id(), supplier_name, Utc::now());

        sqlx::query(
            r#"
            INSERT INTO materials (
                id, code, name, material_type, buy_price_cents,
                supplier_id, supplier_name, price_category,
                code_folded, name_folded,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&material.id)
        .bind(&material.code)
        .bind(&material.name)
        .bind(material.material_type)
        .bind(material.buy_price_cents)
        .bind(&material.supplier_id)
        .bind(&material.supplier_name)
        .bind(material.price_category.label())
        .bind(fold_case(&material.code))
        .bind(fold_case(&material.name))
        .bind(material.created_at)
        .bind(material.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| DbError::from(e).with_duplicate_value(&material.code))?;

        tx.commit().await?;

        info!(
            id = %material.id,
            code = %material.code,
            category = %material.price_category,
            "Material created"
        );
        Ok(material)
    }

    /// Applies a partial update.
    ///
    /// A missing material is reported before any field is looked at. Each
    /// supplied field is then validated; untouched fields keep their stored
    /// values. `price_category` and `supplier_name` are recomputed before the
    /// write.
    pub async fn update(&self, id: &str, patch: MaterialPatch) -> DbResult<Material> {
        let mut tx = begin_write(&self.pool).await?;

        let mut material = fetch_material(&mut tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Material", id))?;

        let changes = patch.validate()?;

        if changes.is_empty() {
            return Ok(material);
        }

        if let Some(code) = changes.code.as_deref().filter(|c| *c != material.code) {
            if code_taken(&mut tx, code, Some(id)).await? {
                return Err(ValidationError::duplicate("Material", "code", code).into());
            }
        }

        changes.apply_to(&mut material);

        if changes.supplier_id.is_some() {
            material.supplier_name = resolve_supplier(&mut tx, &material.supplier_id).await?;
        }
        material.price_category = categorize(material.buy_price());
        material.updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE materials SET
                code = ?2,
                name = ?3,
                material_type = ?4,
                buy_price_cents = ?5,
                supplier_id = ?6,
                supplier_name = ?7,
                price_category = ?8,
                code_folded = ?9,
                name_folded = ?10,
                updated_at = ?11
            WHERE id = ?1
            "#,
        )
        .bind(&material.id)
        .bind(&material.code)
        .bind(&material.name)
        .bind(material.material_type)
        .bind(material.buy_price_cents)
        .bind(&material.supplier_id)
        .bind(&material.supplier_name)
        .bind(material.price_category.label())
        .bind(fold_case(&material.code))
        .bind(fold_case(&material.name))
        .bind(material.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| DbError::from(e).with_duplicate_value(&material.code))?;

        tx.commit().await?;

        info!(id = %material.id, code = %material.code, "Material updated");
        Ok(material)
    }

    /// Deletes a material. Nothing references materials, so this never
    /// needs a guard.
    pub async fn delete(&self, id: &str) -> DbResult<DeletedMaterial> {
        let mut tx = begin_write(&self.pool).await?;

        let material = fetch_material(&mut tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Material", id))?;

        sqlx::query("DELETE FROM materials WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(id = %material.id, code = %material.code, "Material deleted");
        Ok(DeletedMaterial {
            id: material.id,
            code: material.code,
            name: material.name,
        })
    }

    /// Gets a material by ID. A row that cannot be read back counts as
    /// missing.
    pub async fn get(&self, id: &str) -> DbResult<Material> {
        let mut conn = self.pool.acquire().await?;

        fetch_material(&mut conn, id)
            .await?
            .ok_or_else(|| DbError::not_found("Material", id))
    }

    /// Lists materials ordered by code.
    ///
    /// `type_filter` only applies when it names a known type; anything else
    /// lists every type. `total_count` counts all matches.
    pub async fn list(&self, type_filter: Option<&str>, page: Page) -> DbResult<Paged<Material>> {
        let material_type = type_filter.and_then(|t| match t.parse::<MaterialType>() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                debug!(type_filter = %t, "Ignoring unknown material type filter");
                None
            }
        });

        debug!(
            material_type = ?material_type,
            limit = page.limit,
            offset = page.offset,
            "Listing materials"
        );

        let total_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM materials WHERE ?1 IS NULL OR material_type = ?1",
        )
        .bind(material_type)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, MaterialRow>(&format!(
            "{SELECT_MATERIAL} WHERE ?1 IS NULL OR material_type = ?1 \
             ORDER BY code, id LIMIT ?2 OFFSET ?3"
        ))
        .bind(material_type)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(Paged {
            items: rows.into_iter().filter_map(MaterialRow::into_material).collect(),
            total_count,
            page,
        })
    }

    /// Every material of one type (or all of them), ordered by code.
    pub async fn list_by_type(&self, material_type: Option<MaterialType>) -> DbResult<Vec<Material>> {
        let rows = sqlx::query_as::<_, MaterialRow>(&format!(
            "{SELECT_MATERIAL} WHERE ?1 IS NULL OR material_type = ?1 ORDER BY code, id"
        ))
        .bind(material_type)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().filter_map(MaterialRow::into_material).collect())
    }

    /// Autocomplete over code and name, labelled `"[code] name"`.
    ///
    /// Matching ignores case, including non-ASCII letters. A blank term lists the first `limit` materials by code.
    pub async fn name_search(&self, term: &str, limit: u32) -> DbResult<Vec<NameSearchHit>> {
        let term = validate_search_query(Some(term))?;
        let pattern = term.as_deref().map(contains_pattern);

        let hits: Vec<(String, String, String)> = sqlx::query_as(
            r#"
            SELECT id, code, name
            FROM materials
            WHERE ?1 IS NULL
               OR code_folded LIKE ?1 ESCAPE '\'
               OR name_folded LIKE ?1 ESCAPE '\'
            ORDER BY code, id
            LIMIT ?2
            "#,
        )
        .bind(&pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(hits
            .into_iter()
            .map(|(id, code, name)| NameSearchHit {
                id,
                display_name: display_name(&code, &name),
            })
            .collect())
    }

    /// Counts materials (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM materials")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Transaction-scoped helpers
// =============================================================================

async fn fetch_material(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Material>> {
    let row = sqlx::query_as::<_, MaterialRow>(&format!("{SELECT_MATERIAL} WHERE id = ?1"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| unreadable_as_not_found(e, "Material", id))?;

    Ok(row.and_then(MaterialRow::into_material))
}

async fn code_taken(
    conn: &mut SqliteConnection,
    code: &str,
    exclude_id: Option<&str>,
) -> DbResult<bool> {
    let taken: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM materials WHERE code = ?1 AND (?2 IS NULL OR id <> ?2))",
    )
    .bind(code)
    .bind(exclude_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(taken)
}

/// Looks up the supplier's name, failing validation when it does not exist.
async fn resolve_supplier(conn: &mut SqliteConnection, supplier_id: &str) -> DbResult<String> {
    let name: Option<String> = sqlx::query_scalar("SELECT name FROM suppliers WHERE id = ?1")
        .bind(supplier_id)
        .fetch_optional(&mut *conn)
        .await?;

    name.ok_or_else(|| ValidationError::unknown_reference("Supplier", supplier_id).into())
}

// =============================================================================
// Unit Tests
// =============================================================================
