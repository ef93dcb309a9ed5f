//! Reference backend endpoints through `axum-test`

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tenant_branding::backend::server::{create_app, ServerConfig};

fn create_test_server() -> TestServer {
    let config = ServerConfig {
        port: 3000,
        public_base_url: Some("https://cdn.test".to_string()),
        max_upload_bytes: 1024,
    };
    TestServer::new(create_app(&config)).unwrap()
}

#[tokio::test]
async fn test_unknown_customization_returns_null_data() {
    let server = create_test_server();
    let response = server.get("/customizations/42").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!({ "success": true, "data": null }));
}

#[tokio::test]
async fn test_upsert_then_read() {
    let server = create_test_server();

    let created = server
        .put("/customizations/7")
        .json(&json!({ "bg_color": "#112233", "banner_image": "Hi" }))
        .await;
    assert_eq!(created.json::<Value>()["message"], "Customization created");

    let updated = server
        .put("/customizations/7")
        .json(&json!({ "bg_color": "#AABBCC" }))
        .await;
    assert_eq!(updated.json::<Value>()["message"], "Customization updated");

    let body = server.get("/customizations/7").await.json::<Value>();
    assert_eq!(body["data"]["bg_color"], "#aabbcc");
    assert_eq!(body["data"]["status"], "locked");
}

#[tokio::test]
async fn test_put_does_not_undo_force_lock() {
    let server = create_test_server();
    server
        .post("/customizations/request-unlock")
        .json(&json!({ "company_id": 9 }))
        .await
        .assert_status_ok();
    server
        .post("/customizations/unlock")
        .json(&json!({ "company_id": 9 }))
        .await
        .assert_status_ok();
    server
        .post("/customizations/lock")
        .json(&json!({ "company_id": 9 }))
        .await
        .assert_status_ok();

    // a tenant that has not noticed the lock yet
    server
        .put("/customizations/9")
        .json(&json!({ "bg_color": "#010203", "status": "unlocked" }))
        .await
        .assert_status_ok();

    let body = server.get("/customizations/9").await.json::<Value>();
    assert_eq!(body["data"]["bg_color"], "#010203");
    assert_eq!(body["data"]["status"], "locked");
}

#[tokio::test]
async fn test_invalid_color_is_rejected() {
    let server = create_test_server();
    let response = server
        .put("/customizations/7")
        .json(&json!({ "btn_color": "orange" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["success"], false);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_unlock_lifecycle() {
    let server = create_test_server();
    let company = json!({ "company_id": 7 });

    // grant without a pending request
    let response = server.post("/customizations/unlock").json(&company).await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    server
        .post("/customizations/request-unlock")
        .json(&company)
        .await
        .assert_status_ok();
    let body = server.get("/customizations/7").await.json::<Value>();
    assert_eq!(body["data"]["status"], "unlock_requested");

    server
        .post("/customizations/unlock")
        .json(&company)
        .await
        .assert_status_ok();
    let body = server.get("/customizations/7").await.json::<Value>();
    assert_eq!(body["data"]["status"], "unlocked");

    for _ in 0..2 {
        server
            .post("/customizations/lock")
            .json(&company)
            .await
            .assert_status_ok();
    }
    let body = server.get("/customizations/7").await.json::<Value>();
    assert_eq!(body["data"]["status"], "locked");
}

#[tokio::test]
async fn test_company_domain_lookups() {
    let server = create_test_server();
    let response = server
        .post("/company")
        .json(&json!({ "id": 700, "domain": "salon.example" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let body = server.get("/company/700").await.json::<Value>();
    assert_eq!(body["data"], json!({ "id": 700, "domain": "salon.example" }));

    let body = server
        .get("/companies/domain/salon.example")
        .await
        .json::<Value>();
    assert_eq!(body["data"]["id"], 700);

    let missing = server.get("/company/1").await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_and_serve_logo() {
    let server = create_test_server();
    let form = MultipartForm::new().add_part(
        "logo",
        Part::bytes(vec![7u8; 512])
            .file_name("logo.png")
            .mime_type("image/png"),
    );

    let body = server
        .post("/customizations/upload-logo")
        .multipart(form)
        .await
        .json::<Value>();
    assert_eq!(body["success"], true);
    let url = body["url"].as_str().unwrap().to_string();
    assert!(url.starts_with("https://cdn.test/uploads/"), "{}", url);
    assert!(url.ends_with("-logo.png"), "{}", url);

    let path = url.trim_start_matches("https://cdn.test");
    let file = server.get(path).await;
    file.assert_status_ok();
    assert_eq!(file.header("content-type"), "image/png");
    assert!(file.header("last-modified").to_str().unwrap().ends_with(" GMT"));
    assert_eq!(file.as_bytes().len(), 512);
}

#[tokio::test]
async fn test_upload_rejections() {
    let server = create_test_server();

    let too_big = MultipartForm::new().add_part(
        "logo",
        Part::bytes(vec![0u8; 2048])
            .file_name("big.png")
            .mime_type("image/png"),
    );
    let response = server
        .post("/customizations/upload-logo")
        .multipart(too_big)
        .await;
    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);

    let not_image = MultipartForm::new().add_part(
        "logo",
        Part::bytes(b"plain".to_vec())
            .file_name("a.txt")
            .mime_type("text/plain"),
    );
    let response = server
        .post("/customizations/upload-logo")
        .multipart(not_image)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let wrong_field = MultipartForm::new().add_text("name", "logo");
    let response = server
        .post("/customizations/upload-logo")
        .multipart(wrong_field)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}
