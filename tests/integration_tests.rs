use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use product_catalog::{
    app::products::model::Product,
    build_app,
    config::Config,
};
use serde_json::{json, Value};
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};
use tower::ServiceExt; // for oneshot()

struct TestApp {
    _dir: TempDir,
    data_path: PathBuf,
    router: Router,
}

impl TestApp {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        let data_path = dir.path().join("models").join("products.json");

        let mut config = Config::default();
        config.storage.data_path = data_path.clone();

        Self {
            router: build_app(&config),
            data_path,
            _dir: dir,
        }
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, value)
    }

    async fn create(&self, code: &str) -> (StatusCode, Value) {
        self.send("POST", "/products", Some(product_body(code))).await
    }

    fn stored(&self) -> Vec<Product> {
        let data = std::fs::read(&self.data_path).unwrap();
        serde_json::from_slice(&data).unwrap()
    }
}

fn product_body(code: &str) -> Value {
    json!({
        "title": format!("Product {}", code),
        "description": "integration product",
        "price": 12.5,
        "code": code,
        "stock": 8,
        "thumbnail": ["front.png"]
    })
}

#[tokio::test]
async fn test_welcome() {
    let app = TestApp::new();

    let (status, body) = app.send("GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("/products"));
}

#[tokio::test]
async fn test_create_assigns_ids_and_persists() {
    let app = TestApp::new();

    let (status, body) = app.create("A1").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Successfully created product"));
    assert_eq!(body["data"]["id"], json!(1));

    let (_, body) = app.create("B2").await;
    assert_eq!(body["data"]["id"], json!(2));

    let stored = app.stored();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].code, "A1");
    assert_eq!(stored[0].thumbnail, vec!["front.png".to_string()]);
    assert_eq!(stored[1].id, 2);
}

#[tokio::test]
async fn test_create_duplicate_code_is_rejected() {
    let app = TestApp::new();
    app.create("A1").await;

    let (status, body) = app.create("A1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Product already exists"));
    assert_eq!(app.stored().len(), 1);
}

#[tokio::test]
async fn test_create_missing_fields_short_circuits() {
    let app = TestApp::new();

    let (status, body) = app
        .send("POST", "/products", Some(json!({"title": "Lamp"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("All fields are required"));
    assert!(!app.data_path.exists());
}

#[tokio::test]
async fn test_create_malformed_json() {
    let app = TestApp::new();

    let request = Request::builder()
        .method("POST")
        .uri("/products")
        .header("content-type", "application/json")
        .body(Body::from("{\"title\":"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_full_and_limited() {
    let app = TestApp::new();
    for code in ["A", "B", "C", "D", "E"] {
        app.create(code).await;
    }

    let (status, body) = app.send("GET", "/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 5);

    let (status, body) = app.send("GET", "/products?limit=2", None).await;
    assert_eq!(status, StatusCode::PARTIAL_CONTENT);
    let ids: Vec<u64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2]);

    let (status, body) = app.send("GET", "/products?limit=0", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 5);

    let (status, _) = app.send("GET", "/products?limit=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_fresh_store_is_empty_array() {
    let app = TestApp::new();

    let (status, body) = app.send("GET", "/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
    assert!(app.data_path.exists());
}

#[tokio::test]
async fn test_get_by_id() {
    let app = TestApp::new();
    app.create("A1").await;

    let (status, body) = app.send("GET", "/products/1", None).await;
    assert_eq!(status, StatusCode::OK);
    let product: Product = serde_json::from_value(body["data"].clone()).unwrap();
    assert_eq!(product, app.stored()[0]);

    let (status, body) = app.send("GET", "/products/9", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("NOT_FOUND"));

    let (status, _) = app.send("GET", "/products/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_partial_fields() {
    let app = TestApp::new();
    app.create("A1").await;
    let before = app.stored()[0].clone();

    let (status, body) = app
        .send("PUT", "/products/1", Some(json!({"stock": 5})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["stock"], json!(5));

    let after = app.stored()[0].clone();
    assert_eq!(after.stock, 5);
    assert_eq!(after.title, before.title);
    assert_eq!(after.description, before.description);
    assert_eq!(after.price, before.price);
    assert_eq!(after.code, before.code);
}

#[tokio::test]
async fn test_update_rejects_id_and_code() {
    let app = TestApp::new();
    app.create("A1").await;
    let before = app.stored();

    for patch in [json!({"id": 99}), json!({"code": "x"})] {
        let (status, body) = app.send("PUT", "/products/1", Some(patch)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], json!("Cannot update 'id' or 'code' property"));
    }
    assert_eq!(app.stored(), before);
}

#[tokio::test]
async fn test_update_unknown_product() {
    let app = TestApp::new();

    let (status, body) = app
        .send("PUT", "/products/4", Some(json!({"stock": 1})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], json!("Product with id: 4 not found."));
}

#[tokio::test]
async fn test_update_invalid_field_type() {
    let app = TestApp::new();
    app.create("A1").await;

    let (status, _) = app
        .send("PUT", "/products/1", Some(json!({"price": "free"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_then_get_not_found() {
    let app = TestApp::new();
    app.create("A1").await;
    app.create("B2").await;

    let (status, body) = app.send("DELETE", "/products/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Product with id: 1 was removed"));
    assert_eq!(body["data"], Value::Null);

    let stored = app.stored();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, 2);

    let (status, _) = app.send("GET", "/products/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send("DELETE", "/products/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_file_reflects_operation_sequence() {
    let app = TestApp::new();
    app.create("A").await;
    app.create("B").await;
    app.create("C").await;
    app.send("PUT", "/products/2", Some(json!({"title": "Renamed", "price": 3.0})))
        .await;
    app.send("DELETE", "/products/1", None).await;
    app.create("B").await; // duplicate, ignored

    let stored = app.stored();
    let summary: Vec<(u64, &str, &str)> = stored
        .iter()
        .map(|p| (p.id, p.code.as_str(), p.title.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![(2, "B", "Renamed"), (3, "C", "Product C")]
    );
    assert_eq!(stored[0].price, 3.0);
}

#[tokio::test]
async fn test_request_id_header_and_health() {
    let app = TestApp::new();
    app.create("A1").await;

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], json!("healthy"));
    assert_eq!(body["storage"]["products"], json!(1));
}

#[tokio::test]
async fn test_create_zero_price_or_stock_is_rejected() {
    let app = TestApp::new();

    for (price, stock) in [(0.0, 8), (12.5, 0)] {
        let mut body = product_body("Z");
        body["price"] = json!(price);
        body["stock"] = json!(stock);

        let (status, body) = app.send("POST", "/products", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], json!("All fields are required"));
    }
    assert!(!app.data_path.exists());
}

#[tokio::test]
async fn test_corrupt_store_returns_internal_error() {
    let app = TestApp::new();
    app.create("A1").await;
    std::fs::write(&app.data_path, "oops").unwrap();

    let requests = [
        ("GET", "/products", None),
        ("GET", "/products/1", None),
        ("POST", "/products", Some(product_body("B2"))),
        ("PUT", "/products/1", Some(json!({"stock": 3}))),
        ("DELETE", "/products/1", None),
    ];
    for (method, uri, body) in requests {
        let (status, body) = app.send(method, uri, body).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{} {}", method, uri);
        assert_eq!(body["error"], json!("INTERNAL_SERVER_ERROR"));
        assert!(body["message"].as_str().unwrap().contains("JSON"));
    }
    assert_eq!(std::fs::read_to_string(&app.data_path).unwrap(), "oops");
}
