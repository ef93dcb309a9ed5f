//! Mock server helpers for integration tests
//!
//! Thin wrappers around `wiremock` that mount the customization endpoints
//! with canned JSON bodies.

use std::time::Duration;

use serde_json::{json, Value};
use tenant_branding::client::HttpBackend;
use tenant_branding::shared::{BackendEndpoint, DescriptionField};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// An `HttpBackend` pointed at a mock server
pub fn http_backend(server: &MockServer, label: &str, field: DescriptionField) -> HttpBackend {
    HttpBackend::new(
        label,
        BackendEndpoint::new(server.uri(), field),
        Duration::from_secs(2),
    )
    .expect("client should build")
}

/// Mount a JSON response for `verb path`
pub async fn mount_json(server: &MockServer, verb: &str, route: &str, status: u16, body: Value) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount `GET /company/{id}` and `GET /companies/domain/{domain}`
pub async fn mount_company(server: &MockServer, id: u64, domain: &str) {
    let body = json!({ "success": true, "data": { "id": id, "domain": domain } });
    mount_json(server, "GET", &format!("/company/{}", id), 200, body.clone()).await;
    mount_json(server, "GET", &format!("/companies/domain/{}", domain), 200, body).await;
}

/// Mount a successful `PUT /customizations/{id}`
pub async fn mount_put_ok(server: &MockServer, id: u64) {
    mount_json(
        server,
        "PUT",
        &format!("/customizations/{}", id),
        200,
        json!({ "success": true, "message": "Customization updated" }),
    )
    .await;
}
