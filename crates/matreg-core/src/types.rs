//! # Domain Types
//!
//! Core domain types used throughout the material registry.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────────┐   ┌────────────────┐   │
//! │  │    Supplier     │   │       Material       │   │  MaterialType  │   │
//! │  │  ─────────────  │   │  ──────────────────  │   │  ────────────  │   │
//! │  │  id (UUID)      │◄──│  supplier_id (FK)    │   │  Fabric        │   │
//! │  │  name (unique)  │   │  code (unique)       │   │  Jeans         │   │
//! │  │  email?         │   │  name                │   │  Cotton        │   │
//! │  │  material_count │   │  buy_price_cents     │   └────────────────┘   │
//! │  └─────────────────┘   │  price_category  ◄── derived from price       │
//! │                        │  supplier_name   ◄── copied from supplier     │
//! │                        └──────────────────────┘                         │
//! │                                                                         │
//! │  Input shapes                                                           │
//! │  ├── *Draft   raw create input, every field optional                   │
//! │  ├── New*     validated create input                                   │
//! │  ├── *Patch   raw partial update                                       │
//! │  └── *Changes validated partial update, merged with apply_to()         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for relations and URLs
//! - Business key: material `code` / supplier `name` - unique, editable

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::pricing::{categorize, PriceCategory};
use crate::validation::{
    validate_buy_price, validate_code, validate_email, validate_material_name,
    validate_optional_text, validate_supplier_name, ValidationResult,
};

// =============================================================================
// Material Type
// =============================================================================

/// The kind of material. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum MaterialType {
    Fabric,
    Jeans,
    Cotton,
}

impl MaterialType {
    /// All types, in display order.
    pub const ALL: [MaterialType; 3] = [
        MaterialType::Fabric,
        MaterialType::Jeans,
        MaterialType::Cotton,
    ];

    /// Wire / storage value.
    pub const fn as_str(&self) -> &'static str {
        match self {
            MaterialType::Fabric => "fabric",
            MaterialType::Jeans => "jeans",
            MaterialType::Cotton => "cotton",
        }
    }

    /// Display label.
    pub const fn label(&self) -> &'static str {
        match self {
            MaterialType::Fabric => "Fabric",
            MaterialType::Jeans => "Jeans",
            MaterialType::Cotton => "Cotton",
        }
    }
}

impl fmt::Display for MaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact, case-sensitive match on the wire value.
impl FromStr for MaterialType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MaterialType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "material_type".to_string(),
                allowed: MaterialType::ALL
                    .iter()
                    .map(|t| t.as_str().to_string())
                    .collect(),
            })
    }
}

// =============================================================================
// Supplier
// =============================================================================

/// A vendor that supplies zero or more materials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Supplier {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Unique display name.
    pub name: String,

    /// Contact email; always contains '@' when present.
    pub email: Option<String>,

    pub phone: Option<String>,

    pub address: Option<String>,

    /// Number of materials referencing this supplier, counted at read time.
    pub material_count: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// A material as listed under its supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SupplierMaterial {
    pub id: String,
    pub code: String,
    pub name: String,
    pub material_type: MaterialType,
    pub buy_price_cents: i64,
}

impl SupplierMaterial {
    /// Returns the buy price as Money.
    #[inline]
    pub fn buy_price(&self) -> Money {
        Money::from_cents(self.buy_price_cents)
    }
}

/// A supplier together with the materials referencing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SupplierDetail {
    #[serde(flatten)]
    pub supplier: Supplier,
    pub materials: Vec<SupplierMaterial>,
}

/// Minimal supplier projection for selection lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SupplierOption {
    pub id: String,
    pub name: String,
    pub material_count: i64,
}

/// What is left of a supplier after deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DeletedSupplier {
    pub id: String,
    pub name: String,
    pub material_count: i64,
}

/// Raw supplier create input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplierDraft {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Validated supplier create input.
///
/// Only stored-state checks (name uniqueness) are left for the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSupplier {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl SupplierDraft {
    /// Validates field shapes.
    ///
    /// ## Rules
    /// - `name` required, trimmed, non-empty
    /// - `email` optional; blank means absent; otherwise must contain '@'
    /// - `phone` / `address` free text; blank means absent
    pub fn validate(self) -> ValidationResult<NewSupplier> {
        let name = validate_supplier_name(self.name.as_deref().unwrap_or(""))?;
        let email = validate_email(self.email.as_deref())?;

        Ok(NewSupplier {
            name,
            email,
            phone: validate_optional_text(self.phone.as_deref()),
            address: validate_optional_text(self.address.as_deref()),
        })
    }
}

/// Raw supplier partial update.
///
/// `None` leaves a field untouched. For the optional contact fields,
/// `Some("")` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplierPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Validated supplier partial update.
///
/// The outer `Option` says whether the field was supplied, the inner one is
/// the new (possibly cleared) value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupplierChanges {
    pub name: Option<String>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub address: Option<Option<String>>,
}

impl SupplierPatch {
    /// Validates each supplied field independently.
    pub fn validate(self) -> ValidationResult<SupplierChanges> {
        let name = self
            .name
            .as_deref()
            .map(validate_supplier_name)
            .transpose()?;
        let email = match self.email.as_deref() {
            Some(raw) => Some(validate_email(Some(raw))?),
            None => None,
        };

        Ok(SupplierChanges {
            name,
            email,
            phone: self.phone.as_deref().map(|p| validate_optional_text(Some(p))),
            address: self
                .address
                .as_deref()
                .map(|a| validate_optional_text(Some(a))),
        })
    }
}

impl SupplierChanges {
    /// Returns true when nothing was supplied.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none() && self.address.is_none()
    }

    /// Returns the new name if it differs from the current one.
    pub fn renamed_from(&self, current: &str) -> Option<&str> {
        self.name.as_deref().filter(|name| *name != current)
    }

    /// Merges the supplied fields into `supplier`.
    pub fn apply_to(&self, supplier: &mut Supplier) {
        if let Some(name) = &self.name {
            supplier.name = name.clone();
        }
        if let Some(email) = &self.email {
            supplier.email = email.clone();
        }
        if let Some(phone) = &self.phone {
            supplier.phone = phone.clone();
        }
        if let Some(address) = &self.address {
            supplier.address = address.clone();
        }
    }
}

// =============================================================================
// Material
// =============================================================================

/// An inventory item of a fixed type, tied to exactly one supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Material {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Business identifier, unique across materials.
    pub code: String,

    pub name: String,

    pub material_type: MaterialType,

    /// Buy price in cents; never below 100.00 once stored.
    pub buy_price_cents: i64,

    pub supplier_id: String,

    /// Copy of the supplier's name, kept in sync by the registries.
    pub supplier_name: String,

    /// Derived from the buy price.
    pub price_category: PriceCategory,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Material {
    /// Returns the buy price as Money.
    #[inline]
    pub fn buy_price(&self) -> Money {
        Money::from_cents(self.buy_price_cents)
    }

    /// Sets the buy price and recomputes the price category.
    pub fn set_buy_price(&mut self, price: Money) {
        self.buy_price_cents = price.cents();
        self.price_category = categorize(price);
    }

    /// Label used by autocomplete lookups: `"[<code>] <name>"`.
    pub fn display_name(&self) -> String {
        display_name(&self.code, &self.name)
    }
}

/// Formats the `"[<code>] <name>"` label for any code/name pair.
pub fn display_name(code: &str, name: &str) -> String {
    format!("[{}] {}", code, name)
}

/// What is left of a material after deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DeletedMaterial {
    pub id: String,
    pub code: String,
    pub name: String,
}

/// One autocomplete hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NameSearchHit {
    pub id: String,
    pub display_name: String,
}

/// Raw material create input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialDraft {
    pub code: Option<String>,
    pub name: Option<String>,
    pub material_type: Option<String>,
    pub buy_price: Option<Money>,
    pub supplier_id: Option<String>,
}

/// Validated material create input.
///
/// Code uniqueness and supplier resolution are left for the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMaterial {
    pub code: String,
    pub name: String,
    pub material_type: MaterialType,
    pub buy_price: Money,
    pub supplier_id: String,
}

impl MaterialDraft {
    /// Validates a create request.
    ///
    /// ## Order of Checks
    /// ```text
    /// 1. presence, in order: material_code, material_name, material_type,
    ///    material_buy_price, supplier_id  (first missing one is reported;
    ///    blank strings and a zero price count as missing)
    /// 2. material_type ∈ {fabric, jeans, cotton}
    /// 3. material_buy_price ≥ 100.00
    /// 4. code / name shape (trimmed, length)
    /// ```
    pub fn validate(self) -> ValidationResult<NewMaterial> {
        let code = present(self.code, "material_code")?;
        let name = present(self.name, "material_name")?;
        let material_type = present(self.material_type, "material_type")?;
        let buy_price = self
            .buy_price
            .filter(|p| !p.is_zero())
            .ok_or_else(|| ValidationError::required("material_buy_price"))?;
        let supplier_id = present(self.supplier_id, "supplier_id")?;

        let material_type: MaterialType = material_type.parse()?;
        let buy_price = validate_buy_price(buy_price)?;

        Ok(NewMaterial {
            code: validate_code(&code)?,
            name: validate_material_name(&name)?,
            material_type,
            buy_price,
            supplier_id,
        })
    }
}

impl NewMaterial {
    /// Builds the stored record, computing both derived fields.
    pub fn into_material(self, id: String, supplier_name: String, now: DateTime<Utc>) -> Material {
        Material {
            id,
            code: self.code,
            name: self.name,
            material_type: self.material_type,
            buy_price_cents: self.buy_price.cents(),
            supplier_id: self.supplier_id,
            supplier_name,
            price_category: categorize(self.buy_price),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Raw material partial update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialPatch {
    pub code: Option<String>,
    pub name: Option<String>,
    pub material_type: Option<String>,
    pub buy_price: Option<Money>,
    pub supplier_id: Option<String>,
}

/// Validated material partial update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialChanges {
    pub code: Option<String>,
    pub name: Option<String>,
    pub material_type: Option<MaterialType>,
    pub buy_price: Option<Money>,
    pub supplier_id: Option<String>,
}

impl MaterialPatch {
    /// Validates each supplied field independently.
    pub fn validate(self) -> ValidationResult<MaterialChanges> {
        let code = self.code.as_deref().map(validate_code).transpose()?;
        let name = self
            .name
            .as_deref()
            .map(validate_material_name)
            .transpose()?;
        let material_type = self
            .material_type
            .as_deref()
            .map(MaterialType::from_str)
            .transpose()?;
        let buy_price = self.buy_price.map(validate_buy_price).transpose()?;
        let supplier_id = match self.supplier_id {
            Some(id) => Some(present(Some(id), "supplier_id")?),
            None => None,
        };

        Ok(MaterialChanges {
            code,
            name,
            material_type,
            buy_price,
            supplier_id,
        })
    }
}

impl MaterialChanges {
    /// Returns true when nothing was supplied.
    pub fn is_empty(&self) -> bool {
        self.code.is_none()
            && self.name.is_none()
            && self.material_type.is_none()
            && self.buy_price.is_none()
            && self.supplier_id.is_none()
    }

    /// Merges the supplied fields into `material`.
    ///
    /// Recomputes `price_category` when the price changes. `supplier_name`
    /// is left to the caller, who has to resolve the new supplier anyway.
    pub fn apply_to(&self, material: &mut Material) {
        if let Some(code) = &self.code {
            material.code = code.clone();
        }
        if let Some(name) = &self.name {
            material.name = name.clone();
        }
        if let Some(material_type) = self.material_type {
            material.material_type = material_type;
        }
        if let Some(price) = self.buy_price {
            material.set_buy_price(price);
        }
        if let Some(supplier_id) = &self.supplier_id {
            material.supplier_id = supplier_id.clone();
        }
    }
}

fn present(value: Option<String>, field: &str) -> ValidationResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ValidationError::required(field))
}

// =============================================================================
// Pagination
// =============================================================================

/// A validated limit/offset window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Page {
    pub limit: u32,
    pub offset: u32,
}

/// One page of results plus the unpaginated match count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total_count: i64,
    pub page: Page,
}

// =============================================================================
// Unit Tests
// =============================================================================
