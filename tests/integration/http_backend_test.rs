//! `HttpBackend` against a mocked server

use std::sync::Arc;

use serde_json::json;
use tenant_branding::client::{
    ApiError, BackendApi, CustomizationStore, LogoFile, ReplicatedWriter,
};
use tenant_branding::shared::{
    CompanyId, CustomizationData, CustomizationRecord, DescriptionField, LockStatus,
};
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::*;

#[tokio::test]
async fn test_get_customization_decodes_record() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "GET",
        "/customizations/7",
        200,
        json!({
            "success": true,
            "data": { "bg_color": "#112233", "status": "unlock_requested" }
        }),
    )
    .await;

    let backend = http_backend(&server, "primary", DescriptionField::BannerImage);
    let data = assert_ok!(backend.get_customization(CompanyId(7)).await).unwrap();
    assert_eq!(data.bg_color.as_deref(), Some("#112233"));
    assert_eq!(data.status, Some(LockStatus::UnlockRequested));
}

#[tokio::test]
async fn test_missing_rows_are_not_errors() {
    let server = MockServer::start().await;
    mount_json(&server, "GET", "/customizations/1", 200, json!({ "success": true, "data": null })).await;
    mount_json(&server, "GET", "/customizations/2", 404, json!({ "success": false })).await;
    mount_json(
        &server,
        "GET",
        "/customizations/5",
        200,
        json!({ "success": false, "message": "Customization not found" }),
    )
    .await;

    let backend = http_backend(&server, "primary", DescriptionField::BannerImage);
    assert_eq!(assert_ok!(backend.get_customization(CompanyId(1)).await), None);
    assert_eq!(assert_ok!(backend.get_customization(CompanyId(2)).await), None);
    assert_eq!(assert_ok!(backend.get_customization(CompanyId(5)).await), None);

    let store = CustomizationStore::new(Arc::new(backend));
    let record = assert_ok!(store.fetch(Some(CompanyId(5))).await);
    assert_eq!(record, CustomizationRecord::default_for(Some(CompanyId(5))));
    assert_eq!(record.status(), LockStatus::Locked);
}

#[tokio::test]
async fn test_unknown_status_reads_as_locked() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "GET",
        "/customizations/3",
        200,
        json!({ "success": true, "data": { "status": "pending_review" } }),
    )
    .await;

    let backend = http_backend(&server, "primary", DescriptionField::BannerImage);
    let data = assert_ok!(backend.get_customization(CompanyId(3)).await);
    let record = CustomizationRecord::from_wire(CompanyId(3), data);
    assert_eq!(record.status(), LockStatus::Locked);
}

#[tokio::test]
async fn test_request_unlock_posts_company_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/customizations/request-unlock"))
        .and(body_json(json!({ "company_id": 7 })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "message": "Unlock requested" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let backend = http_backend(&server, "primary", DescriptionField::BannerImage);
    assert_eq!(
        assert_ok!(backend.request_unlock(CompanyId(7)).await),
        "Unlock requested"
    );
}

#[tokio::test]
async fn test_error_statuses() {
    let server = MockServer::start().await;
    mount_json(&server, "POST", "/customizations/lock", 503, json!({ "error": "down" })).await;
    mount_json(
        &server,
        "PUT",
        "/customizations/7",
        200,
        json!({ "success": false, "error": "Company not found" }),
    )
    .await;

    let backend = http_backend(&server, "primary", DescriptionField::BannerImage);
    assert_err!(
        backend.lock(CompanyId(7)).await,
        ApiError::Status { status: 503, .. }
    );
    assert_eq!(
        backend
            .put_customization(CompanyId(7), &CustomizationData::default())
            .await,
        Err(ApiError::rejected("Company not found"))
    );
}

#[tokio::test]
async fn test_upload_returns_url() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "POST",
        "/customizations/upload-logo",
        200,
        json!({ "success": true, "url": "https://x/y.png" }),
    )
    .await;

    let backend = http_backend(&server, "primary", DescriptionField::BannerImage);
    let file = LogoFile::new("y.png", "image/png", vec![1u8; 512]);
    assert_eq!(assert_ok!(backend.upload_logo(&file).await), "https://x/y.png");
}

#[tokio::test]
async fn test_unreachable_backend_is_a_network_error() {
    let backend = tenant_branding::client::HttpBackend::new(
        "primary",
        tenant_branding::shared::BackendEndpoint::new("http://127.0.0.1:1", DescriptionField::BannerImage),
        std::time::Duration::from_secs(2),
    )
    .unwrap();

    assert_err!(
        backend.get_customization(CompanyId(7)).await,
        ApiError::Network { .. }
    );
}

#[tokio::test]
async fn test_replication_maps_fields_per_backend() {
    let primary_server = MockServer::start().await;
    let mirror_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/customizations/7"))
        .and(body_partial_json(json!({ "banner_image": "Hello" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&primary_server)
        .await;
    mount_company(&primary_server, 7, "salon.example").await;

    mount_company(&mirror_server, 700, "salon.example").await;
    Mock::given(method("PUT"))
        .and(path("/customizations/700"))
        .and(body_partial_json(json!({ "description": "Hello" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&mirror_server)
        .await;

    let writer = ReplicatedWriter::new(
        std::sync::Arc::new(http_backend(&primary_server, "primary", DescriptionField::BannerImage)),
        Some(std::sync::Arc::new(http_backend(
            &mirror_server,
            "mirror",
            DescriptionField::Description,
        ))),
    );
    let mut record = CustomizationRecord::default_for(Some(CompanyId(7)));
    record.branding.assets.description = "Hello".to_string();

    let outcome = writer.update(CompanyId(7), &record).await;
    assert!(outcome.success, "{}", outcome.message);
    assert!(!outcome.is_partial(), "{}", outcome.message);
}

#[tokio::test]
async fn test_mirror_unknown_domain_is_partial() {
    let primary_server = MockServer::start().await;
    let mirror_server = MockServer::start().await;
    mount_put_ok(&primary_server, 7).await;
    mount_company(&primary_server, 7, "salon.example").await;
    mount_json(
        &mirror_server,
        "GET",
        "/companies/domain/salon.example",
        404,
        json!({ "success": false, "error": "not found" }),
    )
    .await;

    let writer = ReplicatedWriter::new(
        std::sync::Arc::new(http_backend(&primary_server, "primary", DescriptionField::BannerImage)),
        Some(std::sync::Arc::new(http_backend(
            &mirror_server,
            "mirror",
            DescriptionField::Description,
        ))),
    );
    let outcome = writer
        .update(CompanyId(7), &CustomizationRecord::default_for(Some(CompanyId(7))))
        .await;
    assert!(outcome.success);
    assert!(outcome.is_partial());
}
