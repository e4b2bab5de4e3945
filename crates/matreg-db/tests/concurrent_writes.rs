//! Racing writers against one file-backed database.
//!
//! Every race must end with exactly one winner, losers must see an input
//! error rather than a server error, and no material may outlive its
//! supplier.

use std::path::PathBuf;

use matreg_core::{MaterialDraft, Money, SupplierDraft};
use matreg_db::{Database, DbConfig, DbResult};

const WRITERS: usize = 8;

/// A database file under the temp dir, removed with its WAL files on drop.
struct FileDb {
    path: PathBuf,
    db: Database,
}

impl FileDb {
    async fn open() -> Self {
        let path =
            std::env::temp_dir().join(format!("matreg-race-{}.db", uuid::Uuid::new_v4()));
        let db = Database::new(DbConfig::new(path.clone()).max_connections(WRITERS as u32))
            .await
            .unwrap();
        FileDb { path, db }
    }
}

impl Drop for FileDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", self.path.display(), suffix));
        }
    }
}

fn material(code: &str, supplier_id: &str) -> MaterialDraft {
    MaterialDraft {
        code: Some(code.to_string()),
        name: Some(format!("Material {code}")),
        material_type: Some("jeans".to_string()),
        buy_price: Some(Money::from_cents(25_000)),
        supplier_id: Some(supplier_id.to_string()),
    }
}

fn supplier(name: &str) -> SupplierDraft {
    SupplierDraft {
        name: Some(name.to_string()),
        ..Default::default()
    }
}

/// Asserts one success, and that every failure blames the input.
fn assert_single_winner<T: std::fmt::Debug>(results: &[DbResult<T>]) {
    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "results: {:?}", results);

    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        assert!(err.is_client_error(), "server-side failure: {:?}", err);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_same_material_code_has_one_winner() {
    let file = FileDb::open().await;
    let acme = file.db.suppliers().create(supplier("Acme")).await.unwrap();

    let mut handles = Vec::with_capacity(WRITERS);
    for _ in 0..WRITERS {
        let registry = file.db.materials();
        let draft = material("DUP", &acme.id);
        handles.push(tokio::spawn(async move { registry.create(draft).await }));
    }

    let mut results = Vec::with_capacity(WRITERS);
    for handle in handles {
        results.push(handle.await.unwrap());
    }

    assert_single_winner(&results);
    assert_eq!(file.db.materials().count().await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_same_supplier_name_has_one_winner() {
    let file = FileDb::open().await;

    let mut handles = Vec::with_capacity(WRITERS);
    for _ in 0..WRITERS {
        let registry = file.db.suppliers();
        handles.push(tokio::spawn(async move { registry.create(supplier("Globex")).await }));
    }

    let mut results = Vec::with_capacity(WRITERS);
    for handle in handles {
        results.push(handle.await.unwrap());
    }

    assert_single_winner(&results);
    assert_eq!(file.db.suppliers().count().await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_supplier_delete_racing_material_create() {
    let file = FileDb::open().await;

    for round in 0..WRITERS {
        let target = file
            .db
            .suppliers()
            .create(supplier(&format!("Supplier {round}")))
            .await
            .unwrap();

        let suppliers = file.db.suppliers();
        let target_id = target.id.clone();
        let delete = tokio::spawn(async move { suppliers.delete(&target_id).await.map(|_| ()) });

        let materials = file.db.materials();
        let draft = material(&format!("R-{round}"), &target.id);
        let create = tokio::spawn(async move { materials.create(draft).await.map(|_| ()) });

        let results = [delete.await.unwrap(), create.await.unwrap()];
        assert_single_winner(&results);
    }

    let orphans: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM materials m LEFT JOIN suppliers s ON s.id = m.supplier_id \
         WHERE s.id IS NULL",
    )
    .fetch_one(file.db.pool())
    .await
    .unwrap();
    assert_eq!(orphans, 0);

    // Each round left either a supplier with its material or nothing at all
    assert_eq!(
        file.db.suppliers().count().await.unwrap(),
        file.db.materials().count().await.unwrap()
    );
}
