//! `/api/materials` endpoints.
//!
//! | Method | Path                    | Registry call                |
//! |--------|-------------------------|------------------------------|
//! | GET    | `/api/materials`        | `MaterialRegistry::list`     |
//! | POST   | `/api/materials`        | `MaterialRegistry::create`   |
//! | GET    | `/api/materials/types`  | static                       |
//! | GET    | `/api/materials/search` | `MaterialRegistry::name_search` |
//! | GET    | `/api/materials/{id}`   | `MaterialRegistry::get`      |
//! | PUT    | `/api/materials/{id}`   | `MaterialRegistry::update`   |
//! | DELETE | `/api/materials/{id}`   | `MaterialRegistry::delete`   |
//!
//! Request bodies accept both the long field names (`material_code`) and
//! the short aliases (`code`, `buyPrice`, `supplierId`, ...).

use axum::extract::{Path, State};
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use matreg_core::validation::{validate_pagination, validate_search_query};
use matreg_core::{
    DeletedMaterial, Material, MaterialDraft, MaterialPatch, MaterialType, NameSearchHit, Money,
    ValidationError,
};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiQuery};
use crate::response::ApiResponse;
use crate::routes::{iso_timestamp, parse_reference};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/materials", get(list_materials).post(create_material))
        .route("/api/materials/types", get(material_types))
        .route("/api/materials/search", get(search_materials))
        .route(
            "/api/materials/{id}",
            get(get_material).put(update_material).delete(delete_material),
        )
}

// =============================================================================
// Wire Shapes
// =============================================================================

/// A material as the API returns it.
#[derive(Debug, Serialize)]
pub struct MaterialDto {
    pub id: String,
    pub material_code: String,
    pub material_name: String,
    pub material_type: MaterialType,
    pub material_buy_price: f64,
    pub supplier_id: String,
    pub supplier_name: String,
    pub price_category: &'static str,
    pub create_date: String,
    pub write_date: String,
}

impl From<Material> for MaterialDto {
    fn from(m: Material) -> Self {
        MaterialDto {
            material_buy_price: m.buy_price().to_f64(),
            price_category: m.price_category.label(),
            create_date: iso_timestamp(&m.created_at),
            write_date: iso_timestamp(&m.updated_at),
            id: m.id,
            material_code: m.code,
            material_name: m.name,
            material_type: m.material_type,
            supplier_id: m.supplier_id,
            supplier_name: m.supplier_name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeletedMaterialDto {
    pub id: String,
    pub material_code: String,
    pub material_name: String,
}

impl From<DeletedMaterial> for DeletedMaterialDto {
    fn from(d: DeletedMaterial) -> Self {
        DeletedMaterialDto {
            id: d.id,
            material_code: d.code,
            material_name: d.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MaterialTypeOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Body of POST and PUT. Every field is optional here; the registry
/// decides which ones are required.
///
/// The price arrives as a JSON number or a decimal string, and the supplier
/// id as a string or a number.
#[derive(Debug, Default, Deserialize)]
pub struct MaterialBody {
    #[serde(default, alias = "code")]
    pub material_code: Option<String>,

    #[serde(default, alias = "name")]
    pub material_name: Option<String>,

    #[serde(default, alias = "type")]
    pub material_type: Option<String>,

    #[serde(default, alias = "buy_price", alias = "buyPrice")]
    pub material_buy_price: Option<Value>,

    #[serde(default, alias = "supplierId")]
    pub supplier_id: Option<Value>,
}

impl MaterialBody {
    pub fn into_draft(self) -> Result<MaterialDraft, ValidationError> {
        Ok(MaterialDraft {
            buy_price: parse_price(self.material_buy_price)?,
            supplier_id: parse_reference("supplier_id", self.supplier_id)?,
            code: self.material_code,
            name: self.material_name,
            material_type: self.material_type,
        })
    }

    pub fn into_patch(self) -> Result<MaterialPatch, ValidationError> {
        Ok(MaterialPatch {
            buy_price: parse_price(self.material_buy_price)?,
            supplier_id: parse_reference("supplier_id", self.supplier_id)?,
            code: self.material_code,
            name: self.material_name,
            material_type: self.material_type,
        })
    }
}

/// Reads a price from a JSON number or decimal string.
///
/// Numbers go through their textual form so `99.99` stays exactly 9999
/// cents. A null or blank value counts as absent.
fn parse_price(value: Option<Value>) -> Result<Option<Money>, ValidationError> {
    let raw = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s,
        Some(_) => {
            return Err(ValidationError::InvalidFormat {
                field: "material_buy_price".to_string(),
                reason: "must be a number".to_string(),
            })
        }
    };

    raw.parse::<Money>().map(Some).map_err(|e| match e {
        ValidationError::InvalidFormat { reason, .. } => ValidationError::InvalidFormat {
            field: "material_buy_price".to_string(),
            reason,
        },
        other => other,
    })
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub material_type: Option<String>,
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

async fn list_materials(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<ApiResponse<Vec<MaterialDto>>, ApiError> {
    let page = validate_pagination(
        params.limit,
        params.offset,
        state.default_page_size,
        state.max_page_size,
    )?;
    let type_filter = params
        .material_type
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let materials = state.materials().list(type_filter, page).await?;
    debug!(total = materials.total_count, "Listed materials");

    Ok(ApiResponse::paged(materials, "materials", MaterialDto::from))
}

async fn get_material(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<MaterialDto>, ApiError> {
    let material = state.materials().get(&id).await?;
    Ok(ApiResponse::ok(material.into(), "Material retrieved successfully"))
}

async fn create_material(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<MaterialBody>,
) -> Result<ApiResponse<MaterialDto>, ApiError> {
    let material = state.materials().create(body.into_draft()?).await?;
    Ok(ApiResponse::ok(material.into(), "Material created successfully"))
}

async fn update_material(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<MaterialBody>,
) -> Result<ApiResponse<MaterialDto>, ApiError> {
    // A body that does not parse still answers 404 for a missing material
    let patch = match body.into_patch() {
        Ok(patch) => patch,
        Err(e) => {
            state.materials().get(&id).await?;
            return Err(e.into());
        }
    };

    let material = state.materials().update(&id, patch).await?;
    Ok(ApiResponse::ok(material.into(), "Material updated successfully"))
}

async fn delete_material(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<DeletedMaterialDto>, ApiError> {
    let deleted = state.materials().delete(&id).await?;
    Ok(ApiResponse::ok(deleted.into(), "Material deleted successfully"))
}

async fn material_types() -> ApiResponse<Vec<MaterialTypeOption>> {
    let types = MaterialType::ALL
        .iter()
        .map(|t| MaterialTypeOption {
            value: t.as_str(),
            label: t.label(),
        })
        .collect();

    ApiResponse::ok(types, "Material types retrieved successfully")
}

async fn search_materials(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<ApiResponse<Vec<NameSearchHit>>, ApiError> {
    let term = validate_search_query(params.q.as_deref())?.unwrap_or_default();
    let page = validate_pagination(params.limit, None, state.default_page_size, state.max_page_size)?;

    let hits = state.materials().name_search(&term, page.limit).await?;
    let message = format!("Found {} materials", hits.len());

    Ok(ApiResponse::ok(hits, message))
}
