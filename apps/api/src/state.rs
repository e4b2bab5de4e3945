//! Shared handler state.

use matreg_db::{Database, MaterialRegistry, SupplierRegistry};

use crate::config::ApiConfig;

/// Cloned into every handler by axum; the pool inside is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,

    /// `limit` applied when a list request omits it
    pub default_page_size: u32,

    /// Largest `limit` a list request may ask for
    pub max_page_size: u32,
}

impl AppState {
    pub fn new(db: Database, config: &ApiConfig) -> Self {
        AppState {
            db,
            default_page_size: config.default_page_size,
            max_page_size: config.max_page_size,
        }
    }

    pub fn materials(&self) -> MaterialRegistry {
        self.db.materials()
    }

    pub fn suppliers(&self) -> SupplierRegistry {
        self.db.suppliers()
    }
}
