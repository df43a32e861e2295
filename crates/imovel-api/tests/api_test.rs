mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use helpers::{png_bytes, setup_test_app, setup_test_app_with_base_url};

#[tokio::test]
async fn test_health() {
    let app = setup_test_app().await;
    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_openapi_document_served() {
    let app = setup_test_app().await;
    let response = app.server.get("/api/openapi.json").await;
    assert_eq!(response.status_code(), 200);
    let doc: serde_json::Value = response.json();
    assert!(doc["paths"].get("/api/upload/images").is_some());
}

#[tokio::test]
async fn test_custom_public_base_url_serves_files() {
    let app = setup_test_app_with_base_url("/static/imagens").await;

    let form = MultipartForm::new().add_part(
        "images",
        Part::bytes(png_bytes(24, 24))
            .file_name("capa.png".to_string())
            .mime_type("image/png".to_string()),
    );
    let response = app.server.post("/api/upload/images").multipart(form).await;
    assert_eq!(response.status_code(), 200);

    // returned URLs and the static mount follow the configured prefix
    let body: serde_json::Value = response.json();
    let url = body["files"][0]["url"].as_str().unwrap();
    assert!(url.starts_with("/static/imagens/"));

    let served = app.server.get(url).await;
    assert_eq!(served.status_code(), 200);
}

#[tokio::test]
async fn test_request_log_records_requests() {
    let app = setup_test_app().await;

    app.server.get("/health").await;
    app.server.get("/health").await;

    let response = app.server.get("/api/logs").await;
    assert_eq!(response.status_code(), 200);

    let records: serde_json::Value = response.json();
    let records = records.as_array().expect("records array");
    assert!(records.len() >= 2);
    // newest first; every record carries method, path, status
    assert_eq!(records[0]["method"], "GET");
    assert!(records.iter().any(|r| r["path"] == "/health"));
    assert!(records
        .iter()
        .all(|r| r["status"].as_u64().is_some() && r["durationMs"].as_f64().is_some()));
}
