//! Customization HTTP Handlers
//!
//! Tenant endpoints (`/customizations/*`, `/company/{id}`,
//! `/companies/domain/{domain}`) and the administrator endpoints used to
//! grant unlocks and register routing domains.

use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::backend::customization::state::Upsert;
use crate::backend::error::BackendError;
use crate::backend::server::state::{AppState, RegistryHandle};
use crate::shared::api::{
    CompanyIdRequest, CompanyInfo, DataResponse, MessageResponse, UploadResponse,
};
use crate::shared::customization::{CompanyId, CustomizationData};
use crate::shared::lock::LockTransition;

/// `GET /customizations/{id}`; an unknown company yields `data: null`
pub async fn get_customization(
    State(registry): State<RegistryHandle>,
    Path(company_id): Path<u64>,
) -> Json<DataResponse<CustomizationData>> {
    let registry = registry.read().await;
    match registry.get(CompanyId(company_id)) {
        Some(data) => Json(DataResponse::found(data.clone())),
        None => Json(DataResponse::empty()),
    }
}

/// `PUT /customizations/{id}`
pub async fn put_customization(
    State(registry): State<RegistryHandle>,
    Path(company_id): Path<u64>,
    Json(data): Json<CustomizationData>,
) -> Result<Json<MessageResponse>, BackendError> {
    let company_id = CompanyId(company_id);
    let result = registry.write().await.upsert(company_id, data)?;
    tracing::info!("Customization for company {} {:?}", company_id, result);
    Ok(Json(MessageResponse::ok(match result {
        Upsert::Created => "Customization created",
        Upsert::Updated => "Customization updated",
    })))
}

/// `POST /customizations/request-unlock`
pub async fn request_unlock(
    State(registry): State<RegistryHandle>,
    Json(request): Json<CompanyIdRequest>,
) -> Result<Json<MessageResponse>, BackendError> {
    registry
        .write()
        .await
        .transition(request.company_id, LockTransition::RequestUnlock)?;
    Ok(Json(MessageResponse::ok("Unlock requested")))
}

/// `POST /customizations/lock`, idempotent from any status
pub async fn lock(
    State(registry): State<RegistryHandle>,
    Json(request): Json<CompanyIdRequest>,
) -> Result<Json<MessageResponse>, BackendError> {
    registry
        .write()
        .await
        .transition(request.company_id, LockTransition::ForceLock)?;
    Ok(Json(MessageResponse::ok("Customization locked")))
}

/// `POST /customizations/unlock` (administrator grant)
pub async fn grant_unlock(
    State(registry): State<RegistryHandle>,
    Json(request): Json<CompanyIdRequest>,
) -> Result<Json<MessageResponse>, BackendError> {
    registry
        .write()
        .await
        .transition(request.company_id, LockTransition::GrantUnlock)?;
    Ok(Json(MessageResponse::ok("Customization unlocked")))
}

/// `POST /customizations/upload-logo`, multipart field `logo`
pub async fn upload_logo(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, BackendError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| BackendError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("logo") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("logo").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await.map_err(|e| {
            BackendError::handler(
                StatusCode::PAYLOAD_TOO_LARGE,
                format!("Failed to read upload: {}", e),
            )
        })?;

        if bytes.is_empty() {
            return Err(BackendError::bad_request("File is empty"));
        }
        if bytes.len() > state.max_upload_bytes {
            return Err(BackendError::handler(
                StatusCode::PAYLOAD_TOO_LARGE,
                format!(
                    "File is {} bytes, the limit is {} bytes",
                    bytes.len(),
                    state.max_upload_bytes
                ),
            ));
        }
        if !content_type.starts_with("image/") {
            return Err(BackendError::bad_request(format!(
                "'{}' is not an image type",
                content_type
            )));
        }

        let name = state
            .registry
            .write()
            .await
            .store_upload(&file_name, &content_type, bytes);
        let url = state.upload_url(&name);
        tracing::info!("Stored logo {} ({})", name, content_type);

        return Ok(Json(UploadResponse {
            success: true,
            url: Some(url),
            message: None,
        }));
    }

    Err(BackendError::bad_request("Missing 'logo' field"))
}

/// `GET /uploads/{name}`
pub async fn serve_upload(
    State(registry): State<RegistryHandle>,
    Path(name): Path<String>,
) -> Result<Response, BackendError> {
    let registry = registry.read().await;
    let upload = registry
        .upload(&name)
        .ok_or_else(|| BackendError::not_found(format!("Upload {} not found", name)))?;
    let body: Bytes = upload.bytes.clone();
    Ok((
        [
            (header::CONTENT_TYPE, upload.content_type.clone()),
            (header::LAST_MODIFIED, upload.last_modified()),
        ],
        body,
    )
        .into_response())
}

/// `GET /company/{id}`
pub async fn get_company(
    State(registry): State<RegistryHandle>,
    Path(company_id): Path<u64>,
) -> Result<Json<DataResponse<CompanyInfo>>, BackendError> {
    let company_id = CompanyId(company_id);
    let registry = registry.read().await;
    let domain = registry
        .domain_of(company_id)
        .ok_or_else(|| BackendError::not_found(format!("Company {} not found", company_id)))?;
    Ok(Json(DataResponse::found(CompanyInfo {
        id: company_id,
        domain: domain.to_string(),
    })))
}

/// `GET /companies/domain/{domain}`
pub async fn company_by_domain(
    State(registry): State<RegistryHandle>,
    Path(domain): Path<String>,
) -> Result<Json<DataResponse<CompanyInfo>>, BackendError> {
    let registry = registry.read().await;
    let company_id = registry.company_for_domain(&domain).ok_or_else(|| {
        BackendError::not_found(format!("No company for domain {}", domain))
    })?;
    Ok(Json(DataResponse::found(CompanyInfo {
        id: company_id,
        domain: domain.trim().to_ascii_lowercase(),
    })))
}

/// `POST /company` (administrator)
pub async fn register_company(
    State(registry): State<RegistryHandle>,
    Json(company): Json<CompanyInfo>,
) -> Result<(StatusCode, Json<MessageResponse>), BackendError> {
    registry
        .write()
        .await
        .register_company(company.id, &company.domain)?;
    tracing::info!("Registered company {} at {}", company.id, company.domain);
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::ok("Company registered")),
    ))
}
