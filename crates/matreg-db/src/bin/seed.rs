//! # Seed Data Generator
//!
//! Populates the database with demo suppliers and materials for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./matreg_dev.db
//! cargo run -p matreg-db --bin seed
//!
//! # Specify database path
//! cargo run -p matreg-db --bin seed -- --db ./data/matreg.db
//! ```
//!
//! ## Generated Data
//! - 4 suppliers, one of them without any materials
//! - 12 materials spread across every type and every price tier
//!
//! Re-running is safe: records whose name or code already exists are skipped.

use std::env;

use anyhow::Context;
use matreg_core::{CoreError, MaterialDraft, Money, SupplierDraft, ValidationError};
use matreg_db::{Database, DbConfig, DbError};

/// (name, email, phone, address)
const SUPPLIERS: &[(&str, &str, &str, &str)] = &[
    ("Acme Textiles", "sales@acme-textiles.test", "+1 555 0100", "12 Mill Road, Leeds"),
    ("Blue Thread Co", "orders@bluethread.test", "+1 555 0110", "4 Harbour St, Porto"),
    ("Cotton Fields Ltd", "hello@cottonfields.test", "", "Plot 9, Tiruppur"),
    ("Northwind Fabrics", "", "+1 555 0199", ""),
];

/// (code, name, type, buy price, supplier index)
const MATERIALS: &[(&str, &str, &str, i64, usize)] = &[
    ("COT-001", "Combed Cotton Jersey", "cotton", 12_500, 2),
    ("COT-002", "Organic Cotton Twill", "cotton", 48_000, 2),
    ("COT-003", "Egyptian Cotton Sateen", "cotton", 135_000, 2),
    ("FAB-001", "Polyester Lining", "fabric", 10_000, 0),
    ("FAB-002", "Wool Blend Melton", "fabric", 62_000, 0),
    ("FAB-003", "Silk Charmeuse", "fabric", 99_999, 0),
    ("FAB-004", "Technical Softshell", "fabric", 210_000, 0),
    ("JNS-001", "Rigid Denim 12oz", "jeans", 35_000, 1),
    ("JNS-002", "Stretch Denim 10oz", "jeans", 49_999, 1),
    ("JNS-003", "Selvedge Denim 14oz", "jeans", 120_000, 1),
    ("JNS-004", "Black Coated Denim", "jeans", 75_000, 1),
    ("COT-004", "Cotton Canvas Duck", "cotton", 50_000, 0),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./matreg_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Material Registry Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./matreg_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Material Registry Seed Data Generator");
    println!("========================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .with_context(|| format!("opening {db_path}"))?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");
    println!();

    // Resolve every supplier name to an id, creating the missing ones.
    let existing = db.suppliers().dropdown().await?;
    let mut supplier_ids = Vec::with_capacity(SUPPLIERS.len());
    let mut created_suppliers = 0;

    for (name, email, phone, address) in SUPPLIERS {
        if let Some(found) = existing.iter().find(|s| s.name == *name) {
            supplier_ids.push(found.id.clone());
            continue;
        }

        let supplier = db
            .suppliers()
            .create(SupplierDraft {
                name: Some(name.to_string()),
                email: Some(email.to_string()),
                phone: Some(phone.to_string()),
                address: Some(address.to_string()),
            })
            .await
            .with_context(|| format!("creating supplier {name}"))?;

        supplier_ids.push(supplier.id);
        created_suppliers += 1;
    }

    println!(
        "✓ Suppliers: {} created, {} already present",
        created_suppliers,
        SUPPLIERS.len() - created_suppliers
    );

    let mut created_materials = 0;
    let mut skipped_materials = 0;

    for (code, name, material_type, price_cents, supplier_idx) in MATERIALS {
        let draft = MaterialDraft {
            code: Some(code.to_string()),
            name: Some(name.to_string()),
            material_type: Some(material_type.to_string()),
            buy_price: Some(Money::from_cents(*price_cents)),
            supplier_id: Some(supplier_ids[*supplier_idx].clone()),
        };

        match db.materials().create(draft).await {
            Ok(material) => {
                created_materials += 1;
                println!("  + {:<40} {}", material.display_name(), material.price_category);
            }
            Err(DbError::Domain(CoreError::Validation(ValidationError::Duplicate { .. }))) => {
                skipped_materials += 1;
            }
            Err(e) => return Err(e).with_context(|| format!("creating material {code}")),
        }
    }

    println!();
    println!(
        "✓ Materials: {} created, {} already present",
        created_materials, skipped_materials
    );
    println!(
        "  Totals: {} suppliers, {} materials",
        db.suppliers().count().await?,
        db.materials().count().await?
    );

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
