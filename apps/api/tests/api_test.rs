//! End-to-end tests driving the router with `oneshot` against an in-memory
//! database.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use matreg_api::{app, AppState};
use matreg_db::{Database, DbConfig};

async fn test_app() -> Router {
    test_app_with_db().await.0
}

/// The router plus a handle on its database, for tests that edit rows
/// behind the registries' back.
async fn test_app_with_db() -> (Router, Database) {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let router = app(AppState {
        db: db.clone(),
        default_page_size: 100,
        max_page_size: 1000,
    });
    (router, db)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn create_supplier(app: &Router, name: &str) -> String {
    let (status, body) = send(app, "POST", "/api/suppliers", Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn create_material(app: &Router, code: &str, price: Value, supplier_id: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/materials",
        Some(json!({
            "material_code": code,
            "material_name": format!("Material {code}"),
            "material_type": "fabric",
            "material_buy_price": price,
            "supplier_id": supplier_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"].clone()
}

#[tokio::test]
async fn test_health() {
    let app = test_app().await;
    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn test_material_lifecycle() {
    let app = test_app().await;
    let acme = create_supplier(&app, "Acme").await;

    let created = create_material(&app, "M1", json!(150), &acme).await;
    assert_eq!(created["material_code"], "M1");
    assert_eq!(created["material_buy_price"], 150.0);
    assert_eq!(created["price_category"], "Budget (100-499)");
    assert_eq!(created["supplier_name"], "Acme");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "GET", &format!("/api/materials/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Material retrieved successfully");
    assert_eq!(body["data"]["material_type"], "fabric");

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/materials/{id}"),
        Some(json!({ "buyPrice": "1200.50" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["price_category"], "Premium (1000+)");
    assert_eq!(body["data"]["material_code"], "M1");

    let (status, body) = send(&app, "DELETE", &format!("/api/materials/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["material_code"], "M1");
    assert_eq!(body["message"], "Material deleted successfully");

    let (status, body) = send(&app, "GET", &format!("/api/materials/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error_type"], "not_found");
    assert_eq!(body["error"], format!("Material with ID {id} not found"));
}

#[tokio::test]
async fn test_material_validation_errors() {
    let app = test_app().await;
    let acme = create_supplier(&app, "Acme").await;

    let (status, body) = send(&app, "POST", "/api/materials", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "validation");
    assert_eq!(body["error"], "Field \"material_code\" is required");

    let (status, body) = send(
        &app,
        "POST",
        "/api/materials",
        Some(json!({
            "code": "M1",
            "name": "Cheap",
            "type": "fabric",
            "buy_price": 99.99,
            "supplierId": acme,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "material_buy_price must be at least 100.00. Current price: 99.99"
    );

    let (status, body) = send(
        &app,
        "POST",
        "/api/materials",
        Some(json!({
            "code": "M1",
            "name": "Wool",
            "type": "wool",
            "buy_price": 150,
            "supplierId": acme,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "material_type must be one of: fabric, jeans, cotton");

    create_material(&app, "M1", json!(100), &acme).await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/materials",
        Some(json!({
            "code": "M1",
            "name": "Again",
            "type": "cotton",
            "buy_price": 200,
            "supplierId": acme,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Material code must be unique. A material with code \"M1\" already exists."
    );

    let (status, body) = send(
        &app,
        "POST",
        "/api/materials",
        Some(json!({
            "code": "M2",
            "name": "Orphan",
            "type": "cotton",
            "buy_price": 200,
            "supplierId": "missing",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Supplier with ID missing not found");

    let (_, body) = send(&app, "GET", "/api/materials", None).await;
    assert_eq!(body["total_count"], 1);
}

#[tokio::test]
async fn test_malformed_input_is_validation() {
    let app = test_app().await;

    let req = Request::builder()
        .method("POST")
        .uri("/api/materials")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error_type"], "validation");

    let (status, body) = send(&app, "GET", "/api/materials?limit=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "validation");

    let (status, _) = send(&app, "GET", "/api/suppliers?limit=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_material_list_paging_and_filter() {
    let app = test_app().await;
    let acme = create_supplier(&app, "Acme").await;
    for code in ["C", "A", "B"] {
        create_material(&app, code, json!(150), &acme).await;
    }

    let (status, body) = send(&app, "GET", "/api/materials?limit=2&offset=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 3);
    assert_eq!(body["limit"], 2);
    assert_eq!(body["offset"], 1);
    assert_eq!(body["message"], "Retrieved 2 materials successfully");
    let codes: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["material_code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["B", "C"]);

    let (_, body) = send(&app, "GET", "/api/materials?material_type=jeans", None).await;
    assert_eq!(body["total_count"], 0);

    // Unknown type means no filter
    let (_, body) = send(&app, "GET", "/api/materials?material_type=wool", None).await;
    assert_eq!(body["total_count"], 3);
}

#[tokio::test]
async fn test_material_types_and_search() {
    let app = test_app().await;

    let (status, body) = send(&app, "GET", "/api/materials/types", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!([
            { "value": "fabric", "label": "Fabric" },
            { "value": "jeans", "label": "Jeans" },
            { "value": "cotton", "label": "Cotton" },
        ])
    );

    let acme = create_supplier(&app, "Acme").await;
    create_material(&app, "DEN-1", json!(150), &acme).await;
    create_material(&app, "SLK-1", json!(150), &acme).await;

    let (status, body) = send(&app, "GET", "/api/materials/search?q=den", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["display_name"], "[DEN-1] Material DEN-1");
}

#[tokio::test]
async fn test_supplier_endpoints() {
    let app = test_app().await;

    let (status, body) = send(&app, "POST", "/api/suppliers", Some(json!({ "email": "a@b.c" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Field \"name\" is required");

    let (status, body) = send(
        &app,
        "POST",
        "/api/suppliers",
        Some(json!({ "name": "Acme", "email": "not-an-email" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "validation");

    let acme = create_supplier(&app, "Acme").await;
    let (status, body) = send(&app, "POST", "/api/suppliers", Some(json!({ "name": "Acme" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Supplier name must be unique. A supplier with name \"Acme\" already exists."
    );

    create_supplier(&app, "Blue Thread").await;
    let material = create_material(&app, "M1", json!(150), &acme).await;

    let (status, body) = send(&app, "GET", &format!("/api/suppliers/{acme}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Acme");
    assert_eq!(body["data"]["material_count"], 1);
    assert_eq!(body["data"]["materials"][0]["material_code"], "M1");

    let (_, body) = send(&app, "GET", "/api/suppliers?search=ACM", None).await;
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["message"], "Retrieved 1 suppliers successfully");

    let (_, body) = send(&app, "GET", "/api/suppliers/dropdown", None).await;
    assert_eq!(body["data"][0]["name"], "Acme");
    assert_eq!(body["data"][0]["material_count"], 1);
    assert_eq!(body["data"][1]["name"], "Blue Thread");

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/suppliers/{acme}"),
        Some(json!({ "name": "Acme Textiles" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Acme Textiles");

    let material_id = material["id"].as_str().unwrap();
    let (_, body) = send(&app, "GET", &format!("/api/materials/{material_id}"), None).await;
    assert_eq!(body["data"]["supplier_name"], "Acme Textiles");

    let (status, body) = send(&app, "DELETE", &format!("/api/suppliers/{acme}"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Cannot delete supplier \"Acme Textiles\" because it has 1 associated materials. \
         Please remove or reassign the materials first."
    );

    send(&app, "DELETE", &format!("/api/materials/{material_id}"), None).await;
    let (status, body) = send(&app, "DELETE", &format!("/api/suppliers/{acme}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["material_count"], 0);

    let (status, body) = send(&app, "GET", &format!("/api/suppliers/{acme}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], format!("Supplier with ID {acme} not found"));
}

#[tokio::test]
async fn test_update_of_missing_record_is_not_found_even_with_bad_body() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        "PUT",
        "/api/materials/nope",
        Some(json!({ "material_type": "silk" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{body}");
    assert_eq!(body["error"], "Material with ID nope not found");

    let (status, body) = send(
        &app,
        "PUT",
        "/api/materials/nope",
        Some(json!({ "material_buy_price": "abc" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{body}");

    let (status, body) = send(
        &app,
        "PUT",
        "/api/suppliers/nope",
        Some(json!({ "email": "bad" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{body}");
    assert_eq!(body["error"], "Supplier with ID nope not found");

    // The same bodies on an existing record are still rejected as input errors
    let acme = create_supplier(&app, "Acme").await;
    let material = create_material(&app, "M1", json!(150), &acme).await;
    let material_id = material["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/materials/{material_id}"),
        Some(json!({ "material_buy_price": "abc" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/suppliers/{acme}"),
        Some(json!({ "email": "bad" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unreadable_rows_answer_not_found() {
    let (app, db) = test_app_with_db().await;
    let acme = create_supplier(&app, "Acme").await;
    let material = create_material(&app, "M1", json!(150), &acme).await;
    let material_id = material["id"].as_str().unwrap();

    sqlx::query("UPDATE materials SET created_at = 'garbage' WHERE id = ?1")
        .bind(material_id)
        .execute(db.pool())
        .await
        .unwrap();

    let (status, body) = send(&app, "GET", &format!("/api/materials/{material_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{body}");
    assert_eq!(body["error_type"], "not_found");

    sqlx::query("UPDATE materials SET created_at = updated_at, code = '' WHERE id = ?1")
        .bind(material_id)
        .execute(db.pool())
        .await
        .unwrap();

    let (status, body) = send(&app, "GET", &format!("/api/suppliers/{acme}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{body}");
    assert_eq!(body["error"], format!("Supplier with ID {acme} not found"));
}

#[tokio::test]
async fn test_search_ignores_non_ascii_case() {
    let app = test_app().await;
    let elan = create_supplier(&app, "Élan Textiles").await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/materials",
        Some(json!({
            "material_code": "ÉT-01",
            "material_name": "Étoffe",
            "material_type": "fabric",
            "material_buy_price": 150,
            "supplier_id": elan,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // "étoffe" and "ÉLAN", percent-encoded
    let (status, body) = send(&app, "GET", "/api/materials/search?q=%C3%A9toffe", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["display_name"], "[ÉT-01] Étoffe");

    let (status, body) = send(&app, "GET", "/api/suppliers?search=%C3%89LAN", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], elan);
}
