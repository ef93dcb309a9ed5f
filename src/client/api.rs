//! Customization API Client
//!
//! [`BackendApi`] is the contract every backend system exposes (primary and
//! mirror alike). [`HttpBackend`] implements it over HTTP with `reqwest`.
//!
//! # Endpoints
//!
//! - `GET  /customizations/{id}`
//! - `PUT  /customizations/{id}` (upsert)
//! - `POST /customizations/request-unlock`
//! - `POST /customizations/lock`
//! - `POST /customizations/upload-logo` (multipart, field `logo`)
//! - `GET  /company/{id}` (routing domain)
//! - `GET  /companies/domain/{domain}` (id for a domain)
//!
//! All failures resolve to [`ApiError`]; nothing here panics.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

use crate::client::upload::LogoFile;
use crate::shared::api::{
    CompanyIdRequest, CompanyInfo, DataResponse, MessageResponse, UploadResponse,
};
use crate::shared::config::BackendEndpoint;
use crate::shared::customization::{CompanyId, CustomizationData, DescriptionField};

/// Errors returned by a backend call
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, TLS)
    #[error("Network error: {message}")]
    Network { message: String },

    /// Non-success HTTP status
    #[error("Request failed: {status} - {body}")]
    Status { status: u16, body: String },

    /// The backend answered `success: false`
    #[error("Backend rejected request: {message}")]
    Rejected { message: String },

    /// The requested entity does not exist
    #[error("Not found: {what}")]
    NotFound { what: String },

    /// The response body could not be decoded
    #[error("Failed to parse response: {message}")]
    Decode { message: String },
}

impl ApiError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode {
                message: err.to_string(),
            }
        } else {
            Self::network(err.to_string())
        }
    }
}

/// Operations of one backend system
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// Short name used in log lines ("primary", "mirror")
    fn label(&self) -> &str;

    /// Wire name of this backend's free-text/asset field
    fn description_field(&self) -> DescriptionField;

    /// Fetch a record. `Ok(None)` when the backend has no row.
    async fn get_customization(
        &self,
        company_id: CompanyId,
    ) -> Result<Option<CustomizationData>, ApiError>;

    /// Upsert a record
    async fn put_customization(
        &self,
        company_id: CompanyId,
        data: &CustomizationData,
    ) -> Result<String, ApiError>;

    /// Set `status = unlock_requested`
    async fn request_unlock(&self, company_id: CompanyId) -> Result<String, ApiError>;

    /// Set `status = locked`
    async fn lock(&self, company_id: CompanyId) -> Result<String, ApiError>;

    /// Upload a logo, returning its persisted URL
    async fn upload_logo(&self, file: &LogoFile) -> Result<String, ApiError>;

    /// Routing domain of a tenant
    async fn company_domain(&self, company_id: CompanyId) -> Result<String, ApiError>;

    /// This backend's tenant id for a routing domain
    async fn resolve_domain(&self, domain: &str) -> Result<CompanyId, ApiError>;
}

/// HTTP implementation of [`BackendApi`]
#[derive(Debug, Clone)]
pub struct HttpBackend {
    label: String,
    endpoint: BackendEndpoint,
    client: Client,
}

impl HttpBackend {
    pub fn new(
        label: impl Into<String>,
        endpoint: BackendEndpoint,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            label: label.into(),
            endpoint,
            client,
        })
    }

    pub fn endpoint(&self) -> &BackendEndpoint {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        self.endpoint.url(path)
    }

    /// `/companies/domain/{domain}` with the domain percent-encoded as one
    /// path segment
    fn domain_url(&self, domain: &str) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.url("/companies/domain")).map_err(|e| {
            ApiError::network(format!("Invalid base URL {}: {}", self.endpoint.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                ApiError::network(format!(
                    "Base URL {} cannot carry a path",
                    self.endpoint.base_url
                ))
            })?
            .push(domain);
        Ok(url)
    }

    async fn post_company_id(&self, path: &str, company_id: CompanyId) -> Result<String, ApiError> {
        let url = self.url(path);
        tracing::debug!("[{}] POST {} company_id={}", self.label, url, company_id);

        let response = self
            .client
            .post(&url)
            .json(&CompanyIdRequest { company_id })
            .send()
            .await?;

        let body: MessageResponse = read_json(response).await?;
        accept_message(body)
    }
}

/// Check the status code, then decode the JSON body
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| status.to_string());
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
        });
    }

    response.json::<T>().await.map_err(|e| ApiError::Decode {
        message: e.to_string(),
    })
}

fn accept_message(body: MessageResponse) -> Result<String, ApiError> {
    if body.success {
        Ok(body.message.unwrap_or_default())
    } else {
        Err(ApiError::rejected(
            body.message.unwrap_or_else(|| "no reason given".to_string()),
        ))
    }
}

#[async_trait]
impl BackendApi for HttpBackend {
    fn label(&self) -> &str {
        &self.label
    }

    fn description_field(&self) -> DescriptionField {
        self.endpoint.description_field
    }

    async fn get_customization(
        &self,
        company_id: CompanyId,
    ) -> Result<Option<CustomizationData>, ApiError> {
        let url = self.url(&format!("/customizations/{}", company_id));
        tracing::debug!("[{}] GET {}", self.label, url);

        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body: DataResponse<CustomizationData> = read_json(response).await?;
        match (body.success, body.data) {
            (true, data) => Ok(data),
            (false, None) => {
                tracing::debug!(
                    "[{}] no customization for company {}: {}",
                    self.label,
                    company_id,
                    body.message.as_deref().unwrap_or("no row")
                );
                Ok(None)
            }
            (false, Some(_)) => Err(ApiError::rejected(
                body.message.unwrap_or_else(|| "no reason given".to_string()),
            )),
        }
    }

    async fn put_customization(
        &self,
        company_id: CompanyId,
        data: &CustomizationData,
    ) -> Result<String, ApiError> {
        let url = self.url(&format!("/customizations/{}", company_id));
        tracing::debug!("[{}] PUT {}", self.label, url);

        let response = self.client.put(&url).json(data).send().await?;
        let body: MessageResponse = read_json(response).await?;
        accept_message(body)
    }

    async fn request_unlock(&self, company_id: CompanyId) -> Result<String, ApiError> {
        self.post_company_id("/customizations/request-unlock", company_id)
            .await
    }

    async fn lock(&self, company_id: CompanyId) -> Result<String, ApiError> {
        self.post_company_id("/customizations/lock", company_id).await
    }

    async fn upload_logo(&self, file: &LogoFile) -> Result<String, ApiError> {
        let url = self.url("/customizations/upload-logo");
        tracing::debug!(
            "[{}] POST {} ({} bytes, {})",
            self.label,
            url,
            file.len(),
            file.content_type
        );

        let part = reqwest::multipart::Part::bytes(file.bytes.to_vec())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)?;
        let form = reqwest::multipart::Form::new().part("logo", part);

        let response = self.client.post(&url).multipart(form).send().await?;
        let body: UploadResponse = read_json(response).await?;
        match (body.success, body.url) {
            (true, Some(url)) if !url.is_empty() => Ok(url),
            (true, _) => Err(ApiError::Decode {
                message: "upload succeeded without a url".to_string(),
            }),
            (false, _) => Err(ApiError::rejected(
                body.message.unwrap_or_else(|| "upload rejected".to_string()),
            )),
        }
    }

    async fn company_domain(&self, company_id: CompanyId) -> Result<String, ApiError> {
        let url = self.url(&format!("/company/{}", company_id));
        tracing::debug!("[{}] GET {}", self.label, url);

        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::not_found(format!("company {}", company_id)));
        }
        let body: DataResponse<CompanyInfo> = read_json(response).await?;
        match body.data {
            Some(company) if body.success && !company.domain.trim().is_empty() => {
                Ok(company.domain)
            }
            Some(_) if body.success => Err(ApiError::not_found(format!(
                "domain for company {}",
                company_id
            ))),
            _ => Err(ApiError::not_found(format!("company {}", company_id))),
        }
    }

    async fn resolve_domain(&self, domain: &str) -> Result<CompanyId, ApiError> {
        let url = self.domain_url(domain)?;
        tracing::debug!("[{}] GET {}", self.label, url);

        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::not_found(format!("company for domain {}", domain)));
        }
        let body: DataResponse<CompanyInfo> = read_json(response).await?;
        match body.data {
            Some(company) if body.success => Ok(company.id),
            _ => Err(ApiError::not_found(format!("company for domain {}", domain))),
        }
    }
}
