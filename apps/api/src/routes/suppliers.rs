//! `/api/suppliers` endpoints.
//!
//! Deleting a supplier that still has materials answers 400 with the
//! registry's "Cannot delete supplier ..." message.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};

use matreg_core::validation::{validate_pagination, validate_search_query};
use matreg_core::{
    DeletedSupplier, MaterialType, NameSearchHit, Supplier, SupplierDetail, SupplierDraft,
    SupplierMaterial, SupplierOption, SupplierPatch,
};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiQuery};
use crate::response::ApiResponse;
use crate::routes::iso_timestamp;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/suppliers", get(list_suppliers).post(create_supplier))
        .route("/api/suppliers/dropdown", get(supplier_dropdown))
        .route("/api/suppliers/search", get(search_suppliers))
        .route(
            "/api/suppliers/{id}",
            get(get_supplier).put(update_supplier).delete(delete_supplier),
        )
}

// =============================================================================
// Wire Shapes
// =============================================================================

#[derive(Debug, Serialize)]
pub struct SupplierDto {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub material_count: i64,
    pub create_date: String,
    pub write_date: String,
}

impl From<Supplier> for SupplierDto {
    fn from(s: Supplier) -> Self {
        SupplierDto {
            create_date: iso_timestamp(&s.created_at),
            write_date: iso_timestamp(&s.updated_at),
            id: s.id,
            name: s.name,
            email: s.email,
            phone: s.phone,
            address: s.address,
            material_count: s.material_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SupplierMaterialDto {
    pub id: String,
    pub material_code: String,
    pub material_name: String,
    pub material_type: MaterialType,
    pub material_buy_price: f64,
}

impl From<SupplierMaterial> for SupplierMaterialDto {
    fn from(m: SupplierMaterial) -> Self {
        SupplierMaterialDto {
            material_buy_price: m.buy_price().to_f64(),
            id: m.id,
            material_code: m.code,
            material_name: m.name,
            material_type: m.material_type,
        }
    }
}

/// Supplier plus its materials, for the detail view.
#[derive(Debug, Serialize)]
pub struct SupplierDetailDto {
    #[serde(flatten)]
    pub supplier: SupplierDto,
    pub materials: Vec<SupplierMaterialDto>,
}

impl From<SupplierDetail> for SupplierDetailDto {
    fn from(d: SupplierDetail) -> Self {
        SupplierDetailDto {
            supplier: d.supplier.into(),
            materials: d.materials.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeletedSupplierDto {
    pub id: String,
    pub name: String,
    pub material_count: i64,
}

impl From<DeletedSupplier> for DeletedSupplierDto {
    fn from(d: DeletedSupplier) -> Self {
        DeletedSupplierDto {
            id: d.id,
            name: d.name,
            material_count: d.material_count,
        }
    }
}

/// Body of POST and PUT. On PUT an empty string clears an optional field
/// while an absent (or null) field is left alone.
#[derive(Debug, Default, Deserialize)]
pub struct SupplierBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl From<SupplierBody> for SupplierDraft {
    fn from(b: SupplierBody) -> Self {
        SupplierDraft {
            name: b.name,
            email: b.email,
            phone: b.phone,
            address: b.address,
        }
    }
}

impl From<SupplierBody> for SupplierPatch {
    fn from(b: SupplierBody) -> Self {
        SupplierPatch {
            name: b.name,
            email: b.email,
            phone: b.phone,
            address: b.address,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<i64>,
}

// =============================================================================
// Handlers
// =============================================================================

async fn list_suppliers(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<ApiResponse<Vec<SupplierDto>>, ApiError> {
    let page = validate_pagination(
        params.limit,
        params.offset,
        state.default_page_size,
        state.max_page_size,
    )?;
    let search = validate_search_query(params.search.as_deref())?;

    let suppliers = state.suppliers().list(search.as_deref(), page).await?;
    Ok(ApiResponse::paged(suppliers, "suppliers", SupplierDto::from))
}

async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<SupplierDetailDto>, ApiError> {
    let detail = state.suppliers().get(&id).await?;
    Ok(ApiResponse::ok(detail.into(), "Supplier retrieved successfully"))
}

async fn create_supplier(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SupplierBody>,
) -> Result<ApiResponse<SupplierDto>, ApiError> {
    let supplier = state.suppliers().create(body.into()).await?;
    Ok(ApiResponse::ok(supplier.into(), "Supplier created successfully"))
}

async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<SupplierBody>,
) -> Result<ApiResponse<SupplierDto>, ApiError> {
    let supplier = state.suppliers().update(&id, body.into()).await?;
    Ok(ApiResponse::ok(supplier.into(), "Supplier updated successfully"))
}

async fn delete_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<DeletedSupplierDto>, ApiError> {
    let deleted = state.suppliers().delete(&id).await?;
    Ok(ApiResponse::ok(deleted.into(), "Supplier deleted successfully"))
}

async fn supplier_dropdown(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<SupplierOption>>, ApiError> {
    let options = state.suppliers().dropdown().await?;
    Ok(ApiResponse::ok(
        options,
        "Suppliers for dropdown retrieved successfully",
    ))
}

async fn search_suppliers(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<ApiResponse<Vec<NameSearchHit>>, ApiError> {
    let term = validate_search_query(params.q.as_deref())?.unwrap_or_default();
    let page = validate_pagination(params.limit, None, state.default_page_size, state.max_page_size)?;

    let hits = state.suppliers().name_search(&term, page.limit).await?;
    let message = format!("Found {} suppliers", hits.len());

    Ok(ApiResponse::ok(hits, message))
}
