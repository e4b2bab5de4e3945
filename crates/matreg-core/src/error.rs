//! # Error Types
//!
//! Domain-specific error types for matreg-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  matreg-core errors (this file)                                        │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  matreg-db errors (separate crate)                                     │
//! │  └── DbError          - Registry / database failures                   │
//! │                                                                         │
//! │  API errors (apps/api)                                                 │
//! │  └── ApiError         - What HTTP clients see (JSON envelope)          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant here is a caller mistake that can be fixed by correcting the
//! input, so the gateway maps all of them to HTTP 400.

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations that need more than one field to decide.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Supplier still referenced by at least one material.
    ///
    /// ## User Workflow
    /// ```text
    /// DELETE /api/suppliers/{id}
    ///      │
    ///      ▼
    /// Count referencing materials: 2
    ///      │
    ///      ▼
    /// SupplierInUse { name: "Acme", material_count: 2 }
    ///      │
    ///      ▼
    /// 400: reassign or delete the materials first
    /// ```
    #[error(
        "Cannot delete supplier \"{name}\" because it has {material_count} associated materials. \
         Please remove or reassign the materials first."
    )]
    SupplierInUse { name: String, material_count: i64 },

    /// Validation error (wraps ValidationError).
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("Field \"{field}\" is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Monetary value under its floor.
    #[error("{field} must be at least {min}. Current price: {actual}")]
    BelowMinimum {
        field: String,
        min: Money,
        actual: Money,
    },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., email without '@', malformed price).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {}", .allowed.join(", "))]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate business key (material code, supplier name).
    #[error(
        "{entity} {field} must be unique. A {} with {field} \"{value}\" already exists.",
        .entity.to_lowercase()
    )]
    Duplicate {
        entity: String,
        field: String,
        value: String,
    },

    /// A reference to another record that does not resolve.
    #[error("{entity} with ID {id} not found")]
    UnknownReference { entity: String, id: String },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Shorthand for [`ValidationError::Duplicate`].
    pub fn duplicate(
        entity: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        ValidationError::Duplicate {
            entity: entity.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    /// Shorthand for [`ValidationError::UnknownReference`].
    pub fn unknown_reference(entity: impl Into<String>, id: impl Into<String>) -> Self {
        ValidationError::UnknownReference {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
